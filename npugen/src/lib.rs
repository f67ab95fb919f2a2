//! Lowering of partitioned, fused operator subgraphs into the kernel-graph
//! representation consumed by an NPU runtime.
//!
//! Each offloaded function is walked once. Calls to composite functions are
//! matched against the recognized fused patterns and emitted as single
//! kernel nodes; everything else falls through to a plain operator node.

pub mod logging;
mod macros;

pub mod codegen;
mod errors;
pub mod expr;
pub mod graph;
pub mod ops;
mod tensor;

pub use codegen::{compile, compile_with_symbol, CompiledModule, CompositeKind, Family, Serializer};
pub use errors::CodegenError;
pub use expr::{ExprDocument, Expr};
pub use graph::{GraphSerialize, SerializedGraph};
pub use ops::OpKind;
pub use tensor::{numel, ConstTensor, DType, TensorData, TensorType};
