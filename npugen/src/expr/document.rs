//! JSON document form of an expression tree.
//!
//! Nodes are stored in a flat list where children reference earlier
//! entries by index, so shared sub-expressions load back as one node.
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tensor::{ConstTensor, TensorType};

use super::attrs::Attrs;
use super::types::{Call, Callee, Expr, ExprId, ExprKind, Function, Var};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprRecord {
    Var {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<TensorType>,
    },
    Constant {
        tensor: ConstTensor,
    },
    Call {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        op: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        callee: Option<usize>,
        args: Vec<usize>,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
    },
    Function {
        params: Vec<usize>,
        body: usize,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExprDocument {
    pub nodes: Vec<ExprRecord>,
    pub root: usize,
}

impl ExprDocument {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Flatten an expression tree, emitting each shared node once.
    pub fn from_expr(root: &Expr) -> Self {
        let mut writer = DocumentWriter::default();
        let root = writer.record(root);
        Self {
            nodes: writer.nodes,
            root,
        }
    }

    /// Rebuild the expression tree.
    pub fn build(&self) -> Result<Expr> {
        let mut built: Vec<Expr> = Vec::with_capacity(self.nodes.len());
        for (index, record) in self.nodes.iter().enumerate() {
            let resolve = |child: usize| -> Result<Expr> {
                built.get(child).cloned().ok_or_else(|| {
                    anyhow!(
                        "node {} references {} which is not an earlier node",
                        index,
                        child
                    )
                })
            };
            let kind = match record {
                ExprRecord::Var { name, ty } => ExprKind::Var(Var {
                    name: name.clone(),
                    ty: ty.clone(),
                }),
                ExprRecord::Constant { tensor } => {
                    ExprKind::Constant(ConstTensor::new(tensor.shape.clone(), tensor.data.clone())?)
                }
                ExprRecord::Call {
                    op,
                    callee,
                    args,
                    attrs,
                } => {
                    let callee = match (op, callee) {
                        (Some(op), None) => Callee::Op(op.clone()),
                        (None, Some(callee)) => Callee::Expr(resolve(*callee)?),
                        _ => {
                            return Err(anyhow!(
                                "call node {} needs exactly one of op or callee",
                                index
                            ))
                        }
                    };
                    let args = args
                        .iter()
                        .map(|arg| resolve(*arg))
                        .collect::<Result<Vec<_>>>()?;
                    ExprKind::Call(Call {
                        callee,
                        args,
                        attrs: attrs.clone(),
                    })
                }
                ExprRecord::Function {
                    params,
                    body,
                    attrs,
                } => {
                    let params = params
                        .iter()
                        .map(|param| resolve(*param))
                        .collect::<Result<Vec<_>>>()?;
                    for param in &params {
                        if param.as_var().is_none() {
                            return Err(anyhow!(
                                "function node {} has a {} parameter",
                                index,
                                param.type_key()
                            ));
                        }
                    }
                    ExprKind::Function(Function {
                        params,
                        body: resolve(*body)?,
                        attrs: attrs.clone(),
                    })
                }
            };
            built.push(Expr::new(kind));
        }
        built
            .get(self.root)
            .cloned()
            .ok_or_else(|| anyhow!("root index {} out of range", self.root))
    }
}

#[derive(Default)]
struct DocumentWriter {
    nodes: Vec<ExprRecord>,
    seen: HashMap<ExprId, usize>,
}

impl DocumentWriter {
    fn record(&mut self, expr: &Expr) -> usize {
        if let Some(&index) = self.seen.get(&expr.id()) {
            return index;
        }
        let record = match expr.kind() {
            ExprKind::Var(var) => ExprRecord::Var {
                name: var.name.clone(),
                ty: var.ty.clone(),
            },
            ExprKind::Constant(tensor) => ExprRecord::Constant {
                tensor: tensor.clone(),
            },
            ExprKind::Call(call) => {
                let (op, callee) = match &call.callee {
                    Callee::Op(name) => (Some(name.clone()), None),
                    Callee::Expr(callee) => (None, Some(self.record(callee))),
                };
                let args = call.args.iter().map(|arg| self.record(arg)).collect();
                ExprRecord::Call {
                    op,
                    callee,
                    args,
                    attrs: call.attrs.clone(),
                }
            }
            ExprKind::Function(func) => {
                let params = func.params.iter().map(|param| self.record(param)).collect();
                let body = self.record(&func.body);
                ExprRecord::Function {
                    params,
                    body,
                    attrs: func.attrs.clone(),
                }
            }
        };
        let index = self.nodes.len();
        self.nodes.push(record);
        self.seen.insert(expr.id(), index);
        index
    }
}
