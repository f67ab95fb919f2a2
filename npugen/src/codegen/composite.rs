//! The closed set of composite names the partitioner may emit.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CodegenError;

/// Composite name as declared on the function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeKind {
    Dense,
    QnnDense,
    Conv2d,
    QnnConv2d,
    QnnSoftmax,
    QnnSigmoid,
    QnnAvgPool2d,
    AvgPool2d,
    MaxPool2d,
}

/// Unpacker/builder pair that handles a composite kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Conv,
    Dense,
    QnnSoftmax,
    QnnSigmoid,
    QnnAvgPool,
    Pool,
}

impl CompositeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeKind::Dense => "vsi_npu.dense",
            CompositeKind::QnnDense => "vsi_npu.qnn_dense",
            CompositeKind::Conv2d => "vsi_npu.conv2d",
            CompositeKind::QnnConv2d => "vsi_npu.qnn_conv2d",
            CompositeKind::QnnSoftmax => "vsi_npu.qnn_softmax",
            CompositeKind::QnnSigmoid => "vsi_npu.qnn_sigmoid",
            CompositeKind::QnnAvgPool2d => "vsi_npu.qnn_avg_pool2d",
            CompositeKind::AvgPool2d => "vsi_npu.avg_pool2d",
            CompositeKind::MaxPool2d => "vsi_npu.max_pool2d",
        }
    }

    pub fn family(self) -> Family {
        match self {
            CompositeKind::Dense | CompositeKind::QnnDense => Family::Dense,
            CompositeKind::Conv2d | CompositeKind::QnnConv2d => Family::Conv,
            CompositeKind::QnnSoftmax => Family::QnnSoftmax,
            CompositeKind::QnnSigmoid => Family::QnnSigmoid,
            CompositeKind::QnnAvgPool2d => Family::QnnAvgPool,
            CompositeKind::AvgPool2d | CompositeKind::MaxPool2d => Family::Pool,
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CompositeKind {
    type Err = CodegenError;

    fn from_str(value: &str) -> Result<Self, CodegenError> {
        match value {
            "vsi_npu.dense" => Ok(CompositeKind::Dense),
            "vsi_npu.qnn_dense" => Ok(CompositeKind::QnnDense),
            "vsi_npu.conv2d" => Ok(CompositeKind::Conv2d),
            "vsi_npu.qnn_conv2d" => Ok(CompositeKind::QnnConv2d),
            "vsi_npu.qnn_softmax" => Ok(CompositeKind::QnnSoftmax),
            "vsi_npu.qnn_sigmoid" => Ok(CompositeKind::QnnSigmoid),
            "vsi_npu.qnn_avg_pool2d" => Ok(CompositeKind::QnnAvgPool2d),
            "vsi_npu.avg_pool2d" => Ok(CompositeKind::AvgPool2d),
            "vsi_npu.max_pool2d" => Ok(CompositeKind::MaxPool2d),
            _ => Err(CodegenError::UnknownPattern {
                name: value.to_string(),
            }),
        }
    }
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Conv => "convolution",
            Family::Dense => "dense",
            Family::QnnSoftmax => "quantized softmax",
            Family::QnnSigmoid => "quantized sigmoid",
            Family::QnnAvgPool => "quantized avg pool",
            Family::Pool => "pool",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
