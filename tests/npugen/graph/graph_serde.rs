use anyhow::Result;
use npugen::expr::AttrValue;
use npugen::graph::encode_attr;
use npugen::{DType, GraphSerialize};
use serde_json::{json, Value};

use crate::common::{self, ComputeChain};

#[test]
fn attributes_encode_as_string_grids() {
    assert_eq!(encode_attr(&AttrValue::Bool(true)), json!([["1"]]));
    assert_eq!(encode_attr(&AttrValue::Int(-3)), json!([["-3"]]));
    assert_eq!(encode_attr(&AttrValue::Float(0.5)), json!([["0.5"]]));
    assert_eq!(encode_attr(&AttrValue::Str("NCHW".into())), json!([["NCHW"]]));
    assert_eq!(encode_attr(&AttrValue::IntList(vec![1, 2])), json!([["1", "2"]]));
    assert_eq!(
        encode_attr(&AttrValue::IntGrid(vec![vec![0, 0], vec![1, 2]])),
        json!([["0", "0"], ["1", "2"]])
    );
    assert_eq!(encode_attr(&AttrValue::DType(DType::F32)), json!([["float32"]]));
}

#[test]
fn graph_arguments_carry_dtype_attributes() -> Result<()> {
    let chain = ComputeChain::float();
    let graph = common::lower_single("vsi_npu.conv2d", |p| common::conv_body(p, &chain))?;
    assert_eq!(graph.nodes[0].attr("dtype"), Some(&AttrValue::DType(DType::I8)));
    assert_eq!(graph.nodes[1].attr("dtype"), Some(&AttrValue::DType(DType::I8)));
    assert_eq!(graph.nodes[1].attr("shape"), Some(&AttrValue::IntList(vec![4, 3, 3, 3])));
    Ok(())
}

#[test]
fn qnn_conv_graph_json_layout() -> Result<()> {
    let chain = ComputeChain::qnn()
        .with_bias()
        .with_pad(vec![vec![0, 0], vec![0, 0], vec![1, 1], vec![1, 1]]);
    let graph = common::lower_single("vsi_npu.qnn_conv2d", |p| common::conv_body(p, &chain))?;
    let value: Value = serde_json::from_str(&GraphSerialize::to_string(&graph, false)?)?;

    let nodes = value["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 12);
    assert_eq!(nodes[0]["op"], "input");
    assert_eq!(nodes[0]["name"], "data");
    assert_eq!(nodes[0]["attrs"]["dtype"], json!([["int8"]]));
    assert_eq!(nodes[0]["attrs"]["shape"], json!([["1", "3", "8", "8"]]));
    assert_eq!(nodes[1]["op"], "const");
    assert_eq!(nodes[1]["name"], "vsi_npu_0_const_0");

    let kernel = &nodes[11];
    assert_eq!(kernel["op"], "kernel");
    assert_eq!(kernel["name"], "qnn.conv2d");
    assert_eq!(kernel["attrs"]["num_inputs"], "11");
    assert_eq!(kernel["attrs"]["num_outputs"], "1");
    assert_eq!(kernel["attrs"]["padding"], json!([["1", "1", "1", "1"]]));
    assert_eq!(kernel["inputs"][0], json!([0, 0, 0]));
    assert_eq!(kernel["inputs"].as_array().map(Vec::len), Some(11));

    assert_eq!(value["arg_nodes"], json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]));
    assert_eq!(value["heads"], json!([[11, 0, 0]]));
    assert_eq!(
        value["node_row_ptr"],
        json!([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
    );
    Ok(())
}

#[test]
fn untyped_input_has_no_attrs() -> Result<()> {
    use npugen::expr::builder::{global_function, var};

    let x = var("x");
    let body = npugen::op!(Sigmoid(x));
    let graph = common::serialize(&global_function(common::SYMBOL, vec![x], body))?;
    let value = GraphSerialize::json(&graph);
    assert!(value["nodes"][0].get("attrs").is_none());
    assert_eq!(value["nodes"][1]["attrs"]["num_inputs"], "1");
    Ok(())
}

#[test]
fn params_table_is_keyed_by_const_name() -> Result<()> {
    let graph = common::lower_single("vsi_npu.qnn_softmax", |p| {
        common::qnn_activation_body(p, npugen::OpKind::Softmax)
    })?;
    let params = GraphSerialize::params_json(&graph)?;
    let table = params.as_object().expect("params object");
    assert_eq!(table.len(), 4);
    assert_eq!(params["vsi_npu_0_const_0"]["data"], json!({ "f32": [0.1f32] }));
    assert_eq!(params["vsi_npu_0_const_3"]["data"], json!({ "i32": [5] }));
    Ok(())
}
