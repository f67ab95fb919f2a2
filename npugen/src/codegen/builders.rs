//! Turn matched patterns into kernel nodes.
//!
//! Input order is the contract with the downstream engine and must not be
//! rearranged:
//!
//! | family | inputs |
//! |---|---|
//! | conv / dense | data, weight, [izp, wzp, iscale, wscale], [bias], [oscale, ozp, bscale, bzp] |
//! | qnn softmax / sigmoid | data, iscale, izp, oscale, ozp |
//! | qnn avg pool / pool | data |
use anyhow::Result;

use crate::errors::CodegenError;
use crate::expr::{Call, Expr};
use crate::graph::{GraphNode, NodeEntry};

use super::composite::Family;
use super::padding::{
    padding_from_pad, validate_conv_layout, validate_pool_layout, PADDING_ATTR,
};
use super::patterns::{
    ConvPattern, DensePattern, PoolPattern, QnnActivationPattern, QnnAvgPoolPattern,
};
use super::serializer::Serializer;

const QNN_SOFTMAX: &str = "qnn.softmax";
const QNN_SIGMOID: &str = "qnn.sigmoid";
const QNN_AVG_POOL2D: &str = "qnn.avg_pool2d";

fn operand<'a>(call: &'a Call, index: usize, what: &str, family: Family) -> Result<&'a Expr> {
    call.arg(index).ok_or_else(|| {
        CodegenError::precondition(
            family,
            format!(
                "{} has {} arguments, missing {} at position {}",
                call.describe(),
                call.args.len(),
                what,
                index
            ),
        )
        .into()
    })
}

struct InputList<'s> {
    serializer: &'s mut Serializer,
    family: Family,
    entries: Vec<NodeEntry>,
}

impl<'s> InputList<'s> {
    fn new(serializer: &'s mut Serializer, family: Family) -> Self {
        Self {
            serializer,
            family,
            entries: Vec::new(),
        }
    }

    fn push_expr(&mut self, expr: &Expr) -> Result<()> {
        let entry = self.serializer.visit_first(expr)?;
        self.entries.push(entry);
        Ok(())
    }

    fn push_arg(&mut self, call: &Call, index: usize, what: &str) -> Result<()> {
        let expr = operand(call, index, what, self.family)?;
        self.push_expr(expr)
    }

    fn finish(self) -> Vec<NodeEntry> {
        self.entries
    }
}

/// Shared by convolution and dense: both follow the same operand contract.
fn push_compute_inputs(
    inputs: &mut InputList<'_>,
    root: &Call,
    compute: &Call,
    bias: Option<&Call>,
    requantize: Option<&Call>,
) -> Result<()> {
    inputs.push_arg(root, 0, "data")?;
    inputs.push_arg(compute, 1, "weight")?;
    if requantize.is_some() {
        inputs.push_arg(compute, 2, "input zero point")?;
        inputs.push_arg(compute, 3, "weight zero point")?;
        inputs.push_arg(compute, 4, "input scale")?;
        inputs.push_arg(compute, 5, "weight scale")?;
    }
    if let Some(bias) = bias {
        inputs.push_arg(bias, 1, "bias")?;
    }
    if let Some(requantize) = requantize {
        inputs.push_arg(requantize, 3, "output scale")?;
        inputs.push_arg(requantize, 4, "output zero point")?;
        inputs.push_arg(requantize, 1, "bias scale")?;
        inputs.push_arg(requantize, 2, "bias zero point")?;
    }
    Ok(())
}

pub fn build_conv(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &ConvPattern<'_>,
) -> Result<GraphNode> {
    validate_conv_layout(nodes.conv)?;

    let mut inputs = InputList::new(serializer, Family::Conv);
    push_compute_inputs(&mut inputs, root, nodes.conv, nodes.bias, nodes.requantize)?;

    let mut node = GraphNode::kernel(nodes.output_name(), inputs.finish(), 1);
    node.copy_attrs(&nodes.conv.attrs);
    if let Some(pad) = nodes.pad {
        node.set_attr(PADDING_ATTR, padding_from_pad(pad, Family::Conv)?);
    }
    Ok(node)
}

pub fn build_dense(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &DensePattern<'_>,
) -> Result<GraphNode> {
    let mut inputs = InputList::new(serializer, Family::Dense);
    push_compute_inputs(&mut inputs, root, nodes.dense, nodes.bias, nodes.requantize)?;

    let mut node = GraphNode::kernel(nodes.output_name(), inputs.finish(), 1);
    node.copy_attrs(&nodes.dense.attrs);
    Ok(node)
}

fn build_qnn_activation(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &QnnActivationPattern<'_>,
    family: Family,
    name: &str,
) -> Result<GraphNode> {
    let mut inputs = InputList::new(serializer, family);
    inputs.push_arg(root, 0, "data")?;
    inputs.push_arg(nodes.dequantize, 1, "input scale")?;
    inputs.push_arg(nodes.dequantize, 2, "input zero point")?;
    inputs.push_arg(nodes.quantize, 1, "output scale")?;
    inputs.push_arg(nodes.quantize, 2, "output zero point")?;

    let mut node = GraphNode::kernel(name, inputs.finish(), 1);
    node.copy_attrs(&nodes.activation.attrs);
    Ok(node)
}

pub fn build_qnn_softmax(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &QnnActivationPattern<'_>,
) -> Result<GraphNode> {
    build_qnn_activation(serializer, root, nodes, Family::QnnSoftmax, QNN_SOFTMAX)
}

pub fn build_qnn_sigmoid(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &QnnActivationPattern<'_>,
) -> Result<GraphNode> {
    build_qnn_activation(serializer, root, nodes, Family::QnnSigmoid, QNN_SIGMOID)
}

pub fn build_qnn_avg_pool(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &QnnAvgPoolPattern<'_>,
) -> Result<GraphNode> {
    let mut inputs = InputList::new(serializer, Family::QnnAvgPool);
    inputs.push_arg(root, 0, "data")?;

    let mut node = GraphNode::kernel(QNN_AVG_POOL2D, inputs.finish(), 1);
    node.copy_attrs(&nodes.avg_pool.attrs);
    Ok(node)
}

pub fn build_pool(
    serializer: &mut Serializer,
    root: &Call,
    nodes: &PoolPattern<'_>,
) -> Result<GraphNode> {
    let mut inputs = InputList::new(serializer, Family::Pool);
    inputs.push_arg(root, 0, "data")?;

    let mut node = GraphNode::kernel(nodes.output_name(), inputs.finish(), 1);
    node.copy_attrs(&nodes.pool.attrs);
    if let Some(pad) = nodes.pad {
        validate_pool_layout(nodes.pool)?;
        node.set_attr(PADDING_ATTR, padding_from_pad(pad, Family::Pool)?);
    }
    Ok(node)
}
