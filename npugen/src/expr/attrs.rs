//! Attribute payloads attached to calls and functions.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tensor::DType;

/// Attribute value. Serialized untagged so documents stay readable; the
/// variant order decides how ambiguous JSON values are read back. An empty
/// list always reads back as `IntList`, and a `DType` reads back as `Str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntList(Vec<i64>),
    FloatList(Vec<f64>),
    StrList(Vec<String>),
    IntGrid(Vec<Vec<i64>>),
    DType(DType),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int_grid(&self) -> Option<&[Vec<i64>]> {
        match self {
            AttrValue::IntGrid(rows) => Some(rows),
            _ => None,
        }
    }

    /// Variant name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
            AttrValue::IntList(_) => "int list",
            AttrValue::FloatList(_) => "float list",
            AttrValue::StrList(_) => "string list",
            AttrValue::IntGrid(_) => "int grid",
            AttrValue::DType(_) => "dtype",
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(value: Vec<i64>) -> Self {
        AttrValue::IntList(value)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(value: Vec<f64>) -> Self {
        AttrValue::FloatList(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::StrList(value)
    }
}

impl From<Vec<Vec<i64>>> for AttrValue {
    fn from(value: Vec<Vec<i64>>) -> Self {
        AttrValue::IntGrid(value)
    }
}

impl From<DType> for AttrValue {
    fn from(value: DType) -> Self {
        AttrValue::DType(value)
    }
}

/// Named attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: AttrValue,
}

/// Attribute set kept in insertion order; names are unique.
///
/// Documents store attributes as a JSON object keyed by name, so a saved
/// and reloaded set comes back sorted by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, AttrValue>",
    into = "BTreeMap<String, AttrValue>"
)]
pub struct Attrs {
    pub items: Vec<Attr>,
}

impl Attrs {
    /// Build an empty attribute set.
    pub fn none() -> Self {
        Self { items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map(|item| &item.value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    /// Insert or override an attribute, keeping its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => item.value = value,
            None => self.items.push(Attr { name, value }),
        }
    }

    /// Builder form of [`Attrs::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Copy every attribute of `other` into `self`, overriding duplicates.
    pub fn extend_from(&mut self, other: &Attrs) {
        for item in &other.items {
            self.set(item.name.clone(), item.value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.items
            .iter()
            .map(|item| (item.name.as_str(), &item.value))
    }
}

impl From<BTreeMap<String, AttrValue>> for Attrs {
    fn from(map: BTreeMap<String, AttrValue>) -> Self {
        Self {
            items: map
                .into_iter()
                .map(|(name, value)| Attr { name, value })
                .collect(),
        }
    }
}

impl From<Attrs> for BTreeMap<String, AttrValue> {
    fn from(attrs: Attrs) -> Self {
        attrs
            .items
            .into_iter()
            .map(|item| (item.name, item.value))
            .collect()
    }
}
