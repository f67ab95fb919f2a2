mod registry;
mod serde;
mod types;

pub use self::serde::{encode_attr, params_table, GraphSerialize};
pub use registry::NodeRegistry;
pub use types::{GraphNode, NodeEntry, NodeOp, SerializedGraph};
