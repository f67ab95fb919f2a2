use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CodegenError;
use crate::expr::{Expr, GLOBAL_SYMBOL_ATTR};
use crate::graph::{params_table, GraphSerialize, SerializedGraph};
use crate::tensor::ConstTensor;
use crate::trace;

use super::serializer::Serializer;

/// Everything the runtime needs to instantiate one offloaded function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledModule {
    pub symbol: String,
    pub graph_json: String,
    pub const_names: Vec<String>,
    pub params: Vec<(String, ConstTensor)>,
}

impl CompiledModule {
    fn from_graph(graph: SerializedGraph) -> Result<Self> {
        let graph_json = GraphSerialize::to_string(&graph, false)?;
        let const_names = graph.const_names();
        Ok(Self {
            symbol: graph.symbol,
            graph_json,
            const_names,
            params: graph.params,
        })
    }

    /// Constant table keyed by const node name.
    pub fn params_json(&self) -> Result<Value> {
        params_table(&self.params)
    }
}

/// Compile a function carrying a `global_symbol` attribute.
pub fn compile(expr: &Expr) -> Result<CompiledModule> {
    compile_with_symbol(expr, None)
}

/// Like [`compile`], using `fallback` when the function has no symbol.
pub fn compile_with_symbol(expr: &Expr, fallback: Option<&str>) -> Result<CompiledModule> {
    let func = expr.as_function().ok_or_else(|| CodegenError::UnsupportedCall {
        type_key: expr.type_key().to_string(),
    })?;
    let symbol = func
        .attrs
        .get_str(GLOBAL_SYMBOL_ATTR)
        .or(fallback)
        .ok_or(CodegenError::MissingSymbol {
            attr: GLOBAL_SYMBOL_ATTR,
        })?;
    trace!("compiling {} ({} params)", symbol, func.params.len());
    let graph = Serializer::new(symbol).serialize(func)?;
    trace!(
        "{}: {} nodes, {} constants",
        graph.symbol,
        graph.nodes.len(),
        graph.params.len()
    );
    CompiledModule::from_graph(graph)
}
