use anyhow::Result;
use serde_json::{json, Map, Value};

use crate::expr::AttrValue;
use crate::tensor::ConstTensor;

use super::types::{GraphNode, NodeEntry, NodeOp, SerializedGraph};

pub struct GraphSerialize;

impl GraphSerialize {
    /// Encode a graph in the kernel-graph JSON layout.
    pub fn json(graph: &SerializedGraph) -> Value {
        let nodes: Vec<Value> = graph.nodes.iter().map(node_json).collect();
        let heads: Vec<Value> = graph.heads.iter().map(entry_json).collect();
        json!({
            "nodes": nodes,
            "arg_nodes": graph.arg_nodes,
            "heads": heads,
            "node_row_ptr": graph.node_row_ptr(),
        })
    }

    pub fn to_string(graph: &SerializedGraph, pretty: bool) -> Result<String> {
        let value = Self::json(graph);
        if pretty {
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(serde_json::to_string(&value)?)
        }
    }

    /// Constant table keyed by node name.
    pub fn params_json(graph: &SerializedGraph) -> Result<Value> {
        params_table(&graph.params)
    }
}

/// Encode `(name, tensor)` pairs as a JSON object keyed by name.
pub fn params_table(params: &[(String, ConstTensor)]) -> Result<Value> {
    let mut out = Map::new();
    for (name, tensor) in params {
        out.insert(name.clone(), serde_json::to_value(tensor)?);
    }
    Ok(Value::Object(out))
}

fn entry_json(entry: &NodeEntry) -> Value {
    json!([entry.id, entry.index, entry.version])
}

fn node_json(node: &GraphNode) -> Value {
    let mut attrs = Map::new();
    for (name, value) in node.attrs.iter() {
        attrs.insert(name.to_string(), encode_attr(value));
    }
    if node.op == NodeOp::Kernel {
        attrs.insert(
            "num_inputs".to_string(),
            Value::String(node.inputs.len().to_string()),
        );
        attrs.insert(
            "num_outputs".to_string(),
            Value::String(node.num_outputs.to_string()),
        );
    }
    let mut out = Map::new();
    out.insert("op".to_string(), Value::String(node.op.as_str().to_string()));
    out.insert("name".to_string(), Value::String(node.name.clone()));
    out.insert(
        "inputs".to_string(),
        Value::Array(node.inputs.iter().map(entry_json).collect()),
    );
    if !attrs.is_empty() {
        out.insert("attrs".to_string(), Value::Object(attrs));
    }
    Value::Object(out)
}

fn strings<T: ToString>(values: &[T]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|value| Value::String(value.to_string()))
            .collect(),
    )
}

/// Every attribute is a list holding string lists; scalars become one-element lists.
pub fn encode_attr(value: &AttrValue) -> Value {
    let rows = match value {
        AttrValue::Bool(flag) => vec![strings(&[if *flag { "1" } else { "0" }])],
        AttrValue::Int(v) => vec![strings(&[v])],
        AttrValue::Float(v) => vec![strings(&[v])],
        AttrValue::Str(v) => vec![strings(&[v])],
        AttrValue::IntList(values) => vec![strings(values)],
        AttrValue::FloatList(values) => vec![strings(values)],
        AttrValue::StrList(values) => vec![strings(values)],
        AttrValue::IntGrid(rows) => rows.iter().map(|row| strings(row)).collect(),
        AttrValue::DType(dtype) => vec![strings(&[dtype.as_str()])],
    };
    Value::Array(rows)
}
