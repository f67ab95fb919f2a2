//! Direct constructors for expression trees.
use crate::ops::OpKind;
use crate::tensor::{ConstTensor, DType, TensorType};

use super::attrs::Attrs;
use super::types::{Call, Callee, Expr, ExprKind, Function, Var};

/// Attribute naming the partitioner family of a composite function.
pub const COMPOSITE_ATTR: &str = "Composite";
/// Attribute carrying the external symbol of a compiled function.
pub const GLOBAL_SYMBOL_ATTR: &str = "global_symbol";

pub fn var(name: impl Into<String>) -> Expr {
    Expr::new(ExprKind::Var(Var {
        name: name.into(),
        ty: None,
    }))
}

pub fn typed_var(name: impl Into<String>, dtype: DType, shape: Vec<usize>) -> Expr {
    Expr::new(ExprKind::Var(Var {
        name: name.into(),
        ty: Some(TensorType::new(dtype, shape)),
    }))
}

pub fn constant(tensor: ConstTensor) -> Expr {
    Expr::new(ExprKind::Constant(tensor))
}

pub fn scalar_f32(value: f32) -> Expr {
    constant(ConstTensor::scalar_f32(value))
}

pub fn scalar_i32(value: i32) -> Expr {
    constant(ConstTensor::scalar_i32(value))
}

/// Call a primitive operator by name.
pub fn op_call(op: impl Into<String>, args: Vec<Expr>, attrs: Attrs) -> Expr {
    Expr::new(ExprKind::Call(Call {
        callee: Callee::Op(op.into()),
        args,
        attrs,
    }))
}

/// Call a known primitive operator.
pub fn call(op: OpKind, args: Vec<Expr>, attrs: Attrs) -> Expr {
    op_call(op.as_str(), args, attrs)
}

/// Call an arbitrary expression, typically a function definition.
pub fn call_expr(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Call(Call {
        callee: Callee::Expr(callee),
        args,
        attrs: Attrs::none(),
    }))
}

pub fn function(params: Vec<Expr>, body: Expr, attrs: Attrs) -> Expr {
    Expr::new(ExprKind::Function(Function {
        params,
        body,
        attrs,
    }))
}

/// Function tagged with a composite family name.
pub fn composite(name: &str, params: Vec<Expr>, body: Expr) -> Expr {
    function(params, body, Attrs::none().with(COMPOSITE_ATTR, name))
}

/// Function exported under `symbol`.
pub fn global_function(symbol: &str, params: Vec<Expr>, body: Expr) -> Expr {
    function(params, body, Attrs::none().with(GLOBAL_SYMBOL_ATTR, symbol))
}
