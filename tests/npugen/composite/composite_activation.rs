use anyhow::Result;
use npugen::expr::builder::{global_function, scalar_f32, scalar_i32};
use npugen::expr::AttrValue;
use npugen::{op, OpKind};

use crate::common;

#[test]
fn qnn_softmax_scale_order() -> Result<()> {
    let graph = common::lower_single("vsi_npu.qnn_softmax", |p| {
        common::qnn_activation_body(p, OpKind::Softmax)
    })?;
    let node = common::head(&graph);
    assert_eq!(node.name, "qnn.softmax");
    assert_eq!(
        common::describe_inputs(&graph, node),
        common::strings(&["data", "0.1", "0", "0.2", "5"])
    );
    assert_eq!(node.attr("axis"), Some(&AttrValue::Int(-1)));
    Ok(())
}

#[test]
fn qnn_sigmoid_scale_order() -> Result<()> {
    let graph = common::lower_single("vsi_npu.qnn_sigmoid", |p| {
        common::qnn_activation_body(p, OpKind::Sigmoid)
    })?;
    let node = common::head(&graph);
    assert_eq!(node.name, "qnn.sigmoid");
    assert_eq!(
        common::describe_inputs(&graph, node),
        common::strings(&["data", "0.1", "0", "0.2", "5"])
    );
    Ok(())
}

#[test]
fn shared_constant_is_registered_once() -> Result<()> {
    let data = common::data_input();
    let scale = scalar_f32(0.05);
    let zero = scalar_i32(0);
    let call = common::composite_call("vsi_npu.qnn_softmax", &data, |p| {
        let deq = op!(Dequantize(p, scale, zero));
        let act = op!(Softmax(deq));
        op!(Quantize(act, scale, zero))
    });
    let graph = common::serialize(&global_function(common::SYMBOL, vec![data], call))?;
    let node = common::head(&graph);
    assert_eq!(node.inputs[1], node.inputs[3]);
    assert_eq!(node.inputs[2], node.inputs[4]);
    assert_eq!(graph.params.len(), 2);
    assert_eq!(
        graph.const_names(),
        common::strings(&["vsi_npu_0_const_0", "vsi_npu_0_const_1"])
    );
    Ok(())
}

#[test]
fn constant_shared_across_composites_is_one_entry() -> Result<()> {
    let data = common::data_input();
    let scale = scalar_f32(0.05);
    let zero = scalar_i32(0);
    let body = |p: &npugen::Expr, activation: OpKind| {
        let deq = op!(Dequantize(p, scale, zero));
        let act = npugen::expr::builder::call(activation, vec![deq], npugen::expr::Attrs::none());
        op!(Quantize(act, scale, zero))
    };
    let softmax = common::composite_call("vsi_npu.qnn_softmax", &data, |p| body(p, OpKind::Softmax));
    let sigmoid =
        common::composite_call("vsi_npu.qnn_sigmoid", &softmax, |p| body(p, OpKind::Sigmoid));
    let graph = common::serialize(&global_function(common::SYMBOL, vec![data], sigmoid))?;

    let kernels: Vec<_> = graph.kernels().collect();
    assert_eq!(kernels.len(), 2);
    let (first, second) = (kernels[0], kernels[1]);
    assert_eq!(first.name, "qnn.softmax");
    assert_eq!(second.name, "qnn.sigmoid");
    assert_eq!(first.inputs[1..], second.inputs[1..]);
    assert_eq!(first.inputs[1], first.inputs[3]);
    assert_eq!(graph.params.len(), 2);
    assert_eq!(common::describe_inputs(&graph, second)[0], "qnn.softmax");
    Ok(())
}

#[test]
fn softmax_body_order_is_checked() -> Result<()> {
    let result = common::lower_single("vsi_npu.qnn_softmax", |p| {
        common::qnn_activation_body(p, OpKind::Sigmoid)
    });
    let err = common::codegen_error(result);
    assert!(err.to_string().contains("nn.softmax"), "{}", err);
    assert!(err.to_string().contains("sigmoid"), "{}", err);
    Ok(())
}

#[test]
fn qnn_avg_pool_uses_avg_pool_attributes() -> Result<()> {
    let graph = common::lower_single("vsi_npu.qnn_avg_pool2d", common::qnn_avg_pool_body)?;
    let node = common::head(&graph);
    assert_eq!(node.name, "qnn.avg_pool2d");
    assert_eq!(common::describe_inputs(&graph, node), common::strings(&["data"]));
    assert_eq!(node.attr("pool_size"), Some(&AttrValue::IntList(vec![2, 2])));
    // Cast attributes stay behind.
    assert!(node.attr("dtype").is_none());
    Ok(())
}
