//! Fatal codegen errors.
//!
//! The public API returns `anyhow::Result`; callers that need to classify a
//! failure can `downcast_ref::<CodegenError>()`.

use thiserror::Error;

use crate::codegen::Family;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A call target is neither a primitive operator nor a function.
    #[error("unsupported call target: {type_key}")]
    UnsupportedCall { type_key: String },

    /// A function call whose function carries no composite attribute.
    #[error("only composite functions are supported, function has no {attr} attribute")]
    NotComposite { attr: &'static str },

    /// The composite attribute names a family outside the recognized set.
    #[error("unrecognized composite pattern: {name}")]
    UnknownPattern { name: String },

    /// The body of a composite does not have the shape its name declares.
    #[error("{family} composite: expected {expected}, found {found}")]
    StructuralMismatch {
        family: Family,
        expected: String,
        found: String,
    },

    /// A matched call violates an invariant on its own attributes or operands.
    #[error("{family} composite: {message}")]
    Precondition { family: Family, message: String },

    /// A function handed to the compiler has no external symbol.
    #[error("function has no {attr} attribute and no symbol was supplied")]
    MissingSymbol { attr: &'static str },
}

impl CodegenError {
    pub fn mismatch(family: Family, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            family,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn precondition(family: Family, message: impl Into<String>) -> Self {
        Self::Precondition {
            family,
            message: message.into(),
        }
    }
}
