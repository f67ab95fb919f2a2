//! Core expression node types.
//!
//! Expressions form an immutable, acyclic tree. Every node gets a fresh
//! identity when it is constructed; cloning an [`Expr`] handle shares the
//! node and therefore its identity, which is what the serializer memoizes on.
use std::ops::Deref;
use std::rc::Rc;

use uuid::Uuid;

use crate::ops::OpKind;
use crate::tensor::{ConstTensor, TensorType};

use super::attrs::Attrs;

/// Stable identity of an expression node.
pub type ExprId = Uuid;

/// Shared handle to an immutable expression node.
#[derive(Debug, Clone)]
pub struct Expr(Rc<ExprNode>);

#[derive(Debug)]
pub struct ExprNode {
    id: ExprId,
    kind: ExprKind,
}

#[derive(Debug)]
pub enum ExprKind {
    Var(Var),
    Constant(ConstTensor),
    Call(Call),
    Function(Function),
}

/// Free variable; becomes a graph input.
#[derive(Debug, Clone)]
pub struct Var {
    pub name: String,
    pub ty: Option<TensorType>,
}

/// Target of a call: a primitive operator or another expression.
#[derive(Debug, Clone)]
pub enum Callee {
    Op(String),
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct Call {
    pub callee: Callee,
    pub args: Vec<Expr>,
    pub attrs: Attrs,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<Expr>,
    pub body: Expr,
    pub attrs: Attrs,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self(Rc::new(ExprNode {
            id: Uuid::new_v4(),
            kind,
        }))
    }

    pub fn id(&self) -> ExprId {
        self.0.id
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self.kind() {
            ExprKind::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self.kind() {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self.kind() {
            ExprKind::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Node type name used in diagnostics.
    pub fn type_key(&self) -> &'static str {
        self.kind().type_key()
    }
}

impl Deref for Expr {
    type Target = ExprNode;

    fn deref(&self) -> &ExprNode {
        &self.0
    }
}

impl ExprKind {
    pub fn type_key(&self) -> &'static str {
        match self {
            ExprKind::Var(_) => "Var",
            ExprKind::Constant(_) => "Constant",
            ExprKind::Call(_) => "Call",
            ExprKind::Function(_) => "Function",
        }
    }
}

impl Call {
    /// Operator name when the callee is a primitive operator.
    pub fn op_name(&self) -> Option<&str> {
        match &self.callee {
            Callee::Op(name) => Some(name),
            Callee::Expr(_) => None,
        }
    }

    pub fn is_op(&self, op: OpKind) -> bool {
        self.op_name() == Some(op.as_str())
    }

    /// Function definition when the callee is a function.
    pub fn callee_function(&self) -> Option<&Function> {
        match &self.callee {
            Callee::Op(_) => None,
            Callee::Expr(expr) => expr.as_function(),
        }
    }

    pub fn arg(&self, index: usize) -> Option<&Expr> {
        self.args.get(index)
    }

    /// The call feeding argument 0, i.e. the next step up the data-flow chain.
    pub fn parent_call(&self) -> Option<&Call> {
        self.args.first().and_then(Expr::as_call)
    }

    /// Short description of the callee for diagnostics.
    pub fn describe(&self) -> String {
        match &self.callee {
            Callee::Op(name) => name.clone(),
            Callee::Expr(expr) => format!("call to {}", expr.type_key()),
        }
    }
}
