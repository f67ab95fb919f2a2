//! Walk composite bodies from the output call back towards the input.
//!
//! Each step follows argument 0 of the current call. Required links must be
//! present with the exact operator; optional links are taken only when the
//! current call matches, otherwise the walk stays where it is.
use anyhow::Result;

use crate::errors::CodegenError;
use crate::expr::Call;
use crate::ops::OpKind;

use super::composite::Family;
use super::patterns::{
    ConvPattern, DensePattern, PoolKind, PoolPattern, QnnActivationPattern, QnnAvgPoolPattern,
};

struct ChainWalker<'a> {
    family: Family,
    current: Option<&'a Call>,
}

impl<'a> ChainWalker<'a> {
    /// Start at the body of the function called by `root`.
    fn start(root: &'a Call, family: Family) -> Result<Self> {
        let func = root.callee_function().ok_or_else(|| CodegenError::UnsupportedCall {
            type_key: root.describe(),
        })?;
        let body = func
            .body
            .as_call()
            .ok_or_else(|| CodegenError::mismatch(family, "a call body", func.body.type_key()))?;
        Ok(Self {
            family,
            current: Some(body),
        })
    }

    fn found(&self) -> String {
        match self.current {
            Some(call) => call.describe(),
            None => "no call".to_string(),
        }
    }

    fn advance(&mut self, call: &'a Call) {
        self.current = call.parent_call();
    }

    /// Take the current call if it is one of `ops`.
    fn take_if(&mut self, ops: &[OpKind]) -> Option<&'a Call> {
        let call = self.current?;
        if ops.iter().any(|op| call.is_op(*op)) {
            self.advance(call);
            Some(call)
        } else {
            None
        }
    }

    /// Require the current call to be `op`.
    fn expect(&mut self, op: OpKind) -> Result<&'a Call> {
        match self.take_if(&[op]) {
            Some(call) => Ok(call),
            None => Err(CodegenError::mismatch(self.family, op.as_str(), self.found()).into()),
        }
    }
}

pub fn unpack_conv(root: &Call) -> Result<ConvPattern<'_>> {
    let mut walker = ChainWalker::start(root, Family::Conv)?;
    let requantize = walker.take_if(&[OpKind::Requantize]);
    let bias = walker.take_if(&[OpKind::BiasAdd, OpKind::Add]);
    let conv = if requantize.is_some() {
        walker.expect(OpKind::QnnConv2d)?
    } else {
        walker.expect(OpKind::Conv2d)?
    };
    let pad = walker.take_if(&[OpKind::Pad]);
    Ok(ConvPattern {
        pad,
        conv,
        bias,
        requantize,
    })
}

pub fn unpack_dense(root: &Call) -> Result<DensePattern<'_>> {
    let mut walker = ChainWalker::start(root, Family::Dense)?;
    let requantize = walker.take_if(&[OpKind::Requantize]);
    let bias = walker.take_if(&[OpKind::BiasAdd, OpKind::Add]);
    let dense = if requantize.is_some() {
        walker.expect(OpKind::QnnDense)?
    } else {
        walker.expect(OpKind::Dense)?
    };
    Ok(DensePattern {
        dense,
        bias,
        requantize,
    })
}

fn unpack_qnn_activation(
    root: &Call,
    family: Family,
    activation: OpKind,
) -> Result<QnnActivationPattern<'_>> {
    let mut walker = ChainWalker::start(root, family)?;
    let quantize = walker.expect(OpKind::Quantize)?;
    let activation = walker.expect(activation)?;
    let dequantize = walker.expect(OpKind::Dequantize)?;
    Ok(QnnActivationPattern {
        dequantize,
        activation,
        quantize,
    })
}

pub fn unpack_qnn_softmax(root: &Call) -> Result<QnnActivationPattern<'_>> {
    unpack_qnn_activation(root, Family::QnnSoftmax, OpKind::Softmax)
}

pub fn unpack_qnn_sigmoid(root: &Call) -> Result<QnnActivationPattern<'_>> {
    unpack_qnn_activation(root, Family::QnnSigmoid, OpKind::Sigmoid)
}

pub fn unpack_qnn_avg_pool(root: &Call) -> Result<QnnAvgPoolPattern<'_>> {
    let mut walker = ChainWalker::start(root, Family::QnnAvgPool)?;
    let post_cast = walker.expect(OpKind::Cast)?;
    let avg_pool = walker.expect(OpKind::AvgPool2d)?;
    let pre_cast = walker.expect(OpKind::Cast)?;
    Ok(QnnAvgPoolPattern {
        pre_cast,
        avg_pool,
        post_cast,
    })
}

pub fn unpack_pool(root: &Call) -> Result<PoolPattern<'_>> {
    let mut walker = ChainWalker::start(root, Family::Pool)?;
    let (pool, kind) = if let Some(call) = walker.take_if(&[OpKind::AvgPool2d]) {
        (call, PoolKind::Avg)
    } else if let Some(call) = walker.take_if(&[OpKind::MaxPool2d]) {
        (call, PoolKind::Max)
    } else {
        return Err(CodegenError::mismatch(
            Family::Pool,
            format!("{} or {}", OpKind::AvgPool2d, OpKind::MaxPool2d),
            walker.found(),
        )
        .into());
    };
    let pad = walker.take_if(&[OpKind::Pad]);
    Ok(PoolPattern { pad, pool, kind })
}
