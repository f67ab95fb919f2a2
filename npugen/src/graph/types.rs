//! Emitted kernel graph types.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::{AttrValue, Attrs};
use crate::tensor::ConstTensor;

/// Role of an emitted node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOp {
    Input,
    Const,
    Kernel,
}

impl NodeOp {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeOp::Input => "input",
            NodeOp::Const => "const",
            NodeOp::Kernel => "kernel",
        }
    }

    /// Inputs and constants are graph arguments.
    pub fn is_arg(self) -> bool {
        matches!(self, NodeOp::Input | NodeOp::Const)
    }
}

impl fmt::Display for NodeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to one output of a registered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: usize,
    pub index: usize,
    pub version: usize,
}

impl NodeEntry {
    pub fn new(id: usize, index: usize) -> Self {
        Self {
            id,
            index,
            version: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub op: NodeOp,
    pub name: String,
    pub inputs: Vec<NodeEntry>,
    pub num_outputs: usize,
    pub attrs: Attrs,
}

impl GraphNode {
    pub fn kernel(name: impl Into<String>, inputs: Vec<NodeEntry>, num_outputs: usize) -> Self {
        Self {
            op: NodeOp::Kernel,
            name: name.into(),
            inputs,
            num_outputs,
            attrs: Attrs::none(),
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self {
            op: NodeOp::Input,
            name: name.into(),
            inputs: Vec::new(),
            num_outputs: 1,
            attrs: Attrs::none(),
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self {
            op: NodeOp::Const,
            name: name.into(),
            inputs: Vec::new(),
            num_outputs: 1,
            attrs: Attrs::none(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.set(name, value);
    }

    /// Copy every attribute of a matched call onto this node.
    pub fn copy_attrs(&mut self, attrs: &Attrs) {
        self.attrs.extend_from(attrs);
    }
}

/// Result of serializing one function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedGraph {
    pub symbol: String,
    pub nodes: Vec<GraphNode>,
    pub arg_nodes: Vec<usize>,
    pub heads: Vec<NodeEntry>,
    pub params: Vec<(String, ConstTensor)>,
}

impl SerializedGraph {
    pub fn node(&self, id: usize) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn resolve(&self, entry: NodeEntry) -> Option<&GraphNode> {
        self.node(entry.id)
    }

    pub fn kernels(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.op == NodeOp::Kernel)
    }

    pub fn param(&self, name: &str) -> Option<&ConstTensor> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, tensor)| tensor)
    }

    pub fn const_names(&self) -> Vec<String> {
        self.params.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Cumulative output offsets, one past each node.
    pub fn node_row_ptr(&self) -> Vec<usize> {
        let mut ptr = Vec::with_capacity(self.nodes.len() + 1);
        let mut total = 0usize;
        ptr.push(total);
        for node in &self.nodes {
            total += node.num_outputs;
            ptr.push(total);
        }
        ptr
    }
}
