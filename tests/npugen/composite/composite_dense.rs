use anyhow::Result;
use npugen::OpKind;

use crate::common::{self, ComputeChain};

#[test]
fn float_dense() -> Result<()> {
    let chain = ComputeChain::float();
    let graph = common::lower_single("vsi_npu.dense", |p| common::dense_body(p, &chain))?;
    let node = common::head(&graph);
    assert_eq!(node.name, OpKind::Dense.as_str());
    assert_eq!(
        common::describe_inputs(&graph, node),
        common::strings(&["data", "int8[10, 16]"])
    );
    Ok(())
}

#[test]
fn float_dense_with_bias() -> Result<()> {
    let chain = ComputeChain::float().with_bias();
    let graph = common::lower_single("vsi_npu.dense", |p| common::dense_body(p, &chain))?;
    let node = common::head(&graph);
    assert_eq!(
        common::describe_inputs(&graph, node),
        common::strings(&["data", "int8[10, 16]", "int32[10]"])
    );
    Ok(())
}

#[test]
fn qnn_dense_follows_compute_operand_order() -> Result<()> {
    let chain = ComputeChain::qnn().with_bias();
    let graph = common::lower_single("vsi_npu.qnn_dense", |p| common::dense_body(p, &chain))?;
    let node = common::head(&graph);
    assert_eq!(node.name, OpKind::QnnDense.as_str());
    assert_eq!(
        common::describe_inputs(&graph, node),
        common::strings(&[
            "data",
            "int8[10, 16]",
            "1",
            "2",
            "0.25",
            "0.5",
            "int32[10]",
            "0.75",
            "4",
            "0.125",
            "3",
        ])
    );
    Ok(())
}
