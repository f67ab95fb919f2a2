//! Operator identities that appear inside composite bodies.
use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Primitive operator recognized by the composite unpackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    Conv2d,
    QnnConv2d,
    Dense,
    QnnDense,
    BiasAdd,
    Add,
    Requantize,
    Pad,
    Quantize,
    Dequantize,
    Softmax,
    Sigmoid,
    Cast,
    AvgPool2d,
    MaxPool2d,
}

const ALL_OPS: &[OpKind] = &[
    OpKind::Conv2d,
    OpKind::QnnConv2d,
    OpKind::Dense,
    OpKind::QnnDense,
    OpKind::BiasAdd,
    OpKind::Add,
    OpKind::Requantize,
    OpKind::Pad,
    OpKind::Quantize,
    OpKind::Dequantize,
    OpKind::Softmax,
    OpKind::Sigmoid,
    OpKind::Cast,
    OpKind::AvgPool2d,
    OpKind::MaxPool2d,
];

static BY_NAME: Lazy<HashMap<&'static str, OpKind>> =
    Lazy::new(|| ALL_OPS.iter().map(|op| (op.as_str(), *op)).collect());

impl OpKind {
    /// Operator name as emitted by the partitioner.
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Conv2d => "nn.conv2d",
            OpKind::QnnConv2d => "qnn.conv2d",
            OpKind::Dense => "nn.dense",
            OpKind::QnnDense => "qnn.dense",
            OpKind::BiasAdd => "nn.bias_add",
            OpKind::Add => "add",
            OpKind::Requantize => "qnn.requantize",
            OpKind::Pad => "nn.pad",
            OpKind::Quantize => "qnn.quantize",
            OpKind::Dequantize => "qnn.dequantize",
            OpKind::Softmax => "nn.softmax",
            OpKind::Sigmoid => "sigmoid",
            OpKind::Cast => "cast",
            OpKind::AvgPool2d => "nn.avg_pool2d",
            OpKind::MaxPool2d => "nn.max_pool2d",
        }
    }

    /// Parse an op kind from its string name.
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OpKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_name(value).ok_or_else(|| anyhow!("unsupported op {}", value))
    }
}
