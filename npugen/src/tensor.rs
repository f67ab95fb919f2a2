//! Constant tensor payloads carried by expression constants.
//!
//! Constants reached during serialization are registered as `const` graph
//! nodes and reported in the parameter table, so they need a serializable
//! representation but no arithmetic.
use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Element types understood by the downstream engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    I8,
    U8,
    I32,
    I64,
    F32,
}

impl DType {
    /// Name used in graph JSON attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::I8 => "int8",
            DType::U8 => "uint8",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F32 => "float32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "int8" | "i8" => Ok(DType::I8),
            "uint8" | "u8" => Ok(DType::U8),
            "int32" | "i32" => Ok(DType::I32),
            "int64" | "i64" => Ok(DType::I64),
            "float32" | "f32" => Ok(DType::F32),
            _ => Err(anyhow!("unsupported dtype {}", value)),
        }
    }
}

/// Static type of a variable: element type and concrete shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorType {
    pub dtype: DType,
    pub shape: Vec<usize>,
}

impl TensorType {
    pub fn new(dtype: DType, shape: Vec<usize>) -> Self {
        Self { dtype, shape }
    }
}

/// Flat element storage for a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorData {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
}

impl TensorData {
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::I8(_) => DType::I8,
            TensorData::U8(_) => DType::U8,
            TensorData::I32(_) => DType::I32,
            TensorData::I64(_) => DType::I64,
            TensorData::F32(_) => DType::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::I8(values) => values.len(),
            TensorData::U8(values) => values.len(),
            TensorData::I32(values) => values.len(),
            TensorData::I64(values) => values.len(),
            TensorData::F32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first_to_string(&self) -> Option<String> {
        match self {
            TensorData::I8(values) => values.first().map(|v| v.to_string()),
            TensorData::U8(values) => values.first().map(|v| v.to_string()),
            TensorData::I32(values) => values.first().map(|v| v.to_string()),
            TensorData::I64(values) => values.first().map(|v| v.to_string()),
            TensorData::F32(values) => values.first().map(|v| v.to_string()),
        }
    }
}

/// Element count of `shape`, or `None` when it does not fit in `usize`.
pub fn numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, dim| acc.checked_mul(*dim))
}

/// Constant tensor value. Scalars have an empty shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstTensor {
    pub shape: Vec<usize>,
    pub data: TensorData,
}

impl ConstTensor {
    /// Build a constant, checking the element count against the shape.
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self> {
        let expected = numel(&shape).ok_or_else(|| anyhow!("shape {:?} overflows", shape))?;
        if data.len() != expected {
            return Err(anyhow!(
                "constant of shape {:?} expects {} elements, got {}",
                shape,
                expected,
                data.len()
            ));
        }
        Ok(Self { shape, data })
    }

    pub fn scalar_f32(value: f32) -> Self {
        Self {
            shape: Vec::new(),
            data: TensorData::F32(vec![value]),
        }
    }

    pub fn scalar_i32(value: i32) -> Self {
        Self {
            shape: Vec::new(),
            data: TensorData::I32(vec![value]),
        }
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Short human-readable form: the value for scalars, `dtype[shape]` otherwise.
    pub fn describe(&self) -> String {
        if self.is_scalar() {
            if let Some(value) = self.data.first_to_string() {
                return value;
            }
        }
        format!("{}{:?}", self.dtype(), self.shape)
    }
}
