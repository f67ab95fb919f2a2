//! Depth-first serializer that lowers an expression tree into a kernel graph.
use anyhow::{anyhow, Result};

use crate::errors::CodegenError;
use crate::expr::{Call, Callee, Expr, ExprKind, Function, Var, COMPOSITE_ATTR};
use crate::graph::{GraphNode, NodeEntry, NodeRegistry, SerializedGraph};
use crate::ops::OpKind;
use crate::tensor::ConstTensor;
use crate::{error, trace, warning};

use super::builders::{
    build_conv, build_dense, build_pool, build_qnn_avg_pool, build_qnn_sigmoid, build_qnn_softmax,
};
use super::composite::{CompositeKind, Family};
use super::unpack::{
    unpack_conv, unpack_dense, unpack_pool, unpack_qnn_avg_pool, unpack_qnn_sigmoid,
    unpack_qnn_softmax,
};

/// Walks one function and registers every reached expression exactly once.
pub struct Serializer {
    symbol: String,
    registry: NodeRegistry,
}

impl Serializer {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            registry: NodeRegistry::new(),
        }
    }

    /// Serialize `func`: params first so argument order is stable, then the body.
    pub fn serialize(mut self, func: &Function) -> Result<SerializedGraph> {
        for param in &func.params {
            self.visit(param)?;
        }
        let heads = self.visit(&func.body)?;
        let (nodes, arg_nodes, params) = self.registry.into_parts();
        Ok(SerializedGraph {
            symbol: self.symbol,
            nodes,
            arg_nodes,
            heads,
            params,
        })
    }

    /// Entries produced by `expr`, registering it on first visit.
    pub fn visit(&mut self, expr: &Expr) -> Result<Vec<NodeEntry>> {
        if let Some(entries) = self.registry.lookup(expr.id()) {
            return Ok(entries.to_vec());
        }
        match expr.kind() {
            ExprKind::Var(var) => Ok(self.visit_var(expr, var)),
            ExprKind::Constant(tensor) => Ok(self.visit_constant(expr, tensor)),
            ExprKind::Call(call) => self.visit_call(expr, call),
            ExprKind::Function(_) => Err(CodegenError::UnsupportedCall {
                type_key: expr.type_key().to_string(),
            }
            .into()),
        }
    }

    /// First output of `expr`.
    pub fn visit_first(&mut self, expr: &Expr) -> Result<NodeEntry> {
        self.visit(expr)?
            .first()
            .copied()
            .ok_or_else(|| anyhow!("{} produced no outputs", expr.type_key()))
    }

    fn visit_var(&mut self, expr: &Expr, var: &Var) -> Vec<NodeEntry> {
        let mut node = GraphNode::input(var.name.clone());
        if let Some(ty) = &var.ty {
            node.set_attr("dtype", ty.dtype);
            node.set_attr("shape", ty.shape.iter().map(|dim| *dim as i64).collect::<Vec<_>>());
        }
        self.registry.add_node(node, expr.id())
    }

    fn visit_constant(&mut self, expr: &Expr, tensor: &ConstTensor) -> Vec<NodeEntry> {
        let name = format!("{}_const_{}", self.symbol, self.registry.param_count());
        let mut node = GraphNode::constant(name.clone());
        node.set_attr("dtype", tensor.dtype());
        node.set_attr(
            "shape",
            tensor.shape.iter().map(|dim| *dim as i64).collect::<Vec<_>>(),
        );
        self.registry.add_param(name, tensor.clone());
        self.registry.add_node(node, expr.id())
    }

    fn visit_call(&mut self, expr: &Expr, call: &Call) -> Result<Vec<NodeEntry>> {
        match &call.callee {
            Callee::Op(name) => self.visit_op_call(expr, name, call),
            Callee::Expr(callee) => match callee.kind() {
                ExprKind::Function(func) => self.visit_composite(expr, call, func),
                _ => Err(CodegenError::UnsupportedCall {
                    type_key: callee.type_key().to_string(),
                }
                .into()),
            },
        }
    }

    /// Plain operator call: one kernel fed by every argument.
    fn visit_op_call(&mut self, expr: &Expr, name: &str, call: &Call) -> Result<Vec<NodeEntry>> {
        if OpKind::from_name(name).is_none() {
            warning!("{}: emitting unrecognized operator {} as-is", self.symbol, name);
        }
        let mut inputs = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            inputs.extend(self.visit(arg)?);
        }
        let mut node = GraphNode::kernel(name, inputs, 1);
        node.copy_attrs(&call.attrs);
        Ok(self.registry.add_node(node, expr.id()))
    }

    fn visit_composite(&mut self, expr: &Expr, call: &Call, func: &Function) -> Result<Vec<NodeEntry>> {
        let name = func
            .attrs
            .get_str(COMPOSITE_ATTR)
            .ok_or(CodegenError::NotComposite {
                attr: COMPOSITE_ATTR,
            })?;
        let kind = name.parse::<CompositeKind>().map_err(|err| {
            error!("{}", err);
            err
        })?;
        let node = self.lower_composite(kind, call).map_err(|err| {
            error!("failed to lower {}: {}", kind, err);
            err
        })?;
        trace!(
            "lowered {} ({}) -> {} with {} inputs",
            kind,
            kind.family(),
            node.name,
            node.inputs.len()
        );
        Ok(self.registry.add_node(node, expr.id()))
    }

    fn lower_composite(&mut self, kind: CompositeKind, call: &Call) -> Result<GraphNode> {
        match kind.family() {
            Family::Conv => {
                let nodes = unpack_conv(call)?;
                check_declared(kind, nodes.composite_kind())?;
                build_conv(self, call, &nodes)
            }
            Family::Dense => {
                let nodes = unpack_dense(call)?;
                check_declared(kind, nodes.composite_kind())?;
                build_dense(self, call, &nodes)
            }
            Family::QnnSoftmax => {
                let nodes = unpack_qnn_softmax(call)?;
                build_qnn_softmax(self, call, &nodes)
            }
            Family::QnnSigmoid => {
                let nodes = unpack_qnn_sigmoid(call)?;
                build_qnn_sigmoid(self, call, &nodes)
            }
            Family::QnnAvgPool => {
                let nodes = unpack_qnn_avg_pool(call)?;
                build_qnn_avg_pool(self, call, &nodes)
            }
            Family::Pool => {
                let nodes = unpack_pool(call)?;
                check_declared(kind, nodes.composite_kind())?;
                build_pool(self, call, &nodes)
            }
        }
    }
}

/// The variant found in the body must be the one the name declares.
fn check_declared(declared: CompositeKind, found: CompositeKind) -> Result<()> {
    if declared != found {
        return Err(CodegenError::mismatch(
            declared.family(),
            format!("a {} body", declared),
            format!("a {} body", found),
        )
        .into());
    }
    Ok(())
}
