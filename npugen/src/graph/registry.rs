//! Arena of emitted nodes keyed by expression identity.
use std::collections::HashMap;

use crate::expr::ExprId;
use crate::tensor::ConstTensor;

use super::types::{GraphNode, NodeEntry};

/// Owns emitted nodes and remembers which expression produced which entries.
///
/// Nodes are appended after their inputs, so the arena order is already a
/// topological order.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<GraphNode>,
    memo: HashMap<ExprId, Vec<NodeEntry>>,
    arg_nodes: Vec<usize>,
    params: Vec<(String, ConstTensor)>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries previously registered for `id`.
    pub fn lookup(&self, id: ExprId) -> Option<&[NodeEntry]> {
        self.memo.get(&id).map(Vec::as_slice)
    }

    /// Register `node` as the value of expression `id` and return its outputs.
    pub fn add_node(&mut self, node: GraphNode, id: ExprId) -> Vec<NodeEntry> {
        let node_id = self.nodes.len();
        let entries: Vec<NodeEntry> = (0..node.num_outputs)
            .map(|index| NodeEntry::new(node_id, index))
            .collect();
        if node.op.is_arg() {
            self.arg_nodes.push(node_id);
        }
        self.nodes.push(node);
        self.memo.insert(id, entries.clone());
        entries
    }

    /// Record the payload of a constant node.
    pub fn add_param(&mut self, name: impl Into<String>, tensor: ConstTensor) {
        self.params.push((name.into(), tensor));
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<usize>, Vec<(String, ConstTensor)>) {
        (self.nodes, self.arg_nodes, self.params)
    }
}
