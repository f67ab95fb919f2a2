mod attrs;
pub mod builder;
mod document;
mod types;

pub use attrs::{Attr, AttrValue, Attrs};
pub use builder::{COMPOSITE_ATTR, GLOBAL_SYMBOL_ATTR};
pub use document::{ExprDocument, ExprRecord};
pub use types::{Call, Callee, Expr, ExprId, ExprKind, ExprNode, Function, Var};
