//! Calls matched inside a composite body, one record per family.
//!
//! Required links are plain references; optional links are `Option`, where
//! `None` means the link was legitimately absent from the chain.
use crate::expr::Call;
use crate::ops::OpKind;

use super::composite::CompositeKind;

/// `[requantize] [bias] conv2d [pad]`, output first.
#[derive(Debug, Clone, Copy)]
pub struct ConvPattern<'a> {
    pub pad: Option<&'a Call>,
    pub conv: &'a Call,
    pub bias: Option<&'a Call>,
    pub requantize: Option<&'a Call>,
}

impl ConvPattern<'_> {
    pub fn is_quantized(&self) -> bool {
        self.requantize.is_some()
    }

    pub fn composite_kind(&self) -> CompositeKind {
        if self.is_quantized() {
            CompositeKind::QnnConv2d
        } else {
            CompositeKind::Conv2d
        }
    }

    pub fn output_name(&self) -> &'static str {
        if self.is_quantized() {
            OpKind::QnnConv2d.as_str()
        } else {
            OpKind::Conv2d.as_str()
        }
    }
}

/// `[requantize] [bias] dense`, output first.
#[derive(Debug, Clone, Copy)]
pub struct DensePattern<'a> {
    pub dense: &'a Call,
    pub bias: Option<&'a Call>,
    pub requantize: Option<&'a Call>,
}

impl DensePattern<'_> {
    pub fn is_quantized(&self) -> bool {
        self.requantize.is_some()
    }

    pub fn composite_kind(&self) -> CompositeKind {
        if self.is_quantized() {
            CompositeKind::QnnDense
        } else {
            CompositeKind::Dense
        }
    }

    pub fn output_name(&self) -> &'static str {
        if self.is_quantized() {
            OpKind::QnnDense.as_str()
        } else {
            OpKind::Dense.as_str()
        }
    }
}

/// `quantize <- activation <- dequantize`; shared by softmax and sigmoid.
#[derive(Debug, Clone, Copy)]
pub struct QnnActivationPattern<'a> {
    pub dequantize: &'a Call,
    pub activation: &'a Call,
    pub quantize: &'a Call,
}

pub type QnnSoftmaxPattern<'a> = QnnActivationPattern<'a>;
pub type QnnSigmoidPattern<'a> = QnnActivationPattern<'a>;

/// `cast <- avg_pool2d <- cast`.
#[derive(Debug, Clone, Copy)]
pub struct QnnAvgPoolPattern<'a> {
    pub pre_cast: &'a Call,
    pub avg_pool: &'a Call,
    pub post_cast: &'a Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Avg,
    Max,
}

impl PoolKind {
    pub fn op(self) -> OpKind {
        match self {
            PoolKind::Avg => OpKind::AvgPool2d,
            PoolKind::Max => OpKind::MaxPool2d,
        }
    }
}

/// `pool2d [pad]`.
#[derive(Debug, Clone, Copy)]
pub struct PoolPattern<'a> {
    pub pad: Option<&'a Call>,
    pub pool: &'a Call,
    pub kind: PoolKind,
}

impl PoolPattern<'_> {
    pub fn composite_kind(&self) -> CompositeKind {
        match self.kind {
            PoolKind::Avg => CompositeKind::AvgPool2d,
            PoolKind::Max => CompositeKind::MaxPool2d,
        }
    }

    pub fn output_name(&self) -> &'static str {
        self.kind.op().as_str()
    }
}
