use anyhow::Result;
use npugen::expr::builder::{call_expr, function, global_function, var};
use npugen::expr::Attrs;
use npugen::{attrs, CodegenError, Family, OpKind};

use crate::common::{self, ComputeChain};

#[test]
fn dense_declared_over_conv_body() -> Result<()> {
    let chain = ComputeChain::float();
    let result = common::lower_single("vsi_npu.dense", |p| common::conv_body(p, &chain));
    match common::codegen_error(result) {
        CodegenError::StructuralMismatch {
            family,
            expected,
            found,
        } => {
            assert_eq!(family, Family::Dense);
            assert_eq!(expected, OpKind::Dense.as_str());
            assert_eq!(found, OpKind::Conv2d.as_str());
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn requantize_over_float_conv() -> Result<()> {
    let chain = ComputeChain {
        requantize: true,
        ..ComputeChain::float()
    };
    let result = common::lower_single("vsi_npu.qnn_conv2d", |p| common::conv_body(p, &chain));
    match common::codegen_error(result) {
        CodegenError::StructuralMismatch { expected, found, .. } => {
            assert_eq!(expected, "qnn.conv2d");
            assert_eq!(found, "nn.conv2d");
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn qnn_conv_without_requantize() -> Result<()> {
    let chain = ComputeChain {
        quantized: true,
        ..ComputeChain::float()
    };
    let result = common::lower_single("vsi_npu.qnn_conv2d", |p| common::conv_body(p, &chain));
    match common::codegen_error(result) {
        CodegenError::StructuralMismatch { expected, found, .. } => {
            assert_eq!(expected, "nn.conv2d");
            assert_eq!(found, "qnn.conv2d");
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn requantize_over_float_dense() -> Result<()> {
    let chain = ComputeChain {
        requantize: true,
        ..ComputeChain::float()
    };
    let result = common::lower_single("vsi_npu.qnn_dense", |p| common::dense_body(p, &chain));
    let err = common::codegen_error(result);
    assert!(
        matches!(err, CodegenError::StructuralMismatch { family: Family::Dense, .. }),
        "{}",
        err
    );
    Ok(())
}

#[test]
fn quantized_name_over_float_body() -> Result<()> {
    let chain = ComputeChain::float();
    let result = common::lower_single("vsi_npu.qnn_conv2d", |p| common::conv_body(p, &chain));
    let err = common::codegen_error(result);
    assert!(
        matches!(err, CodegenError::StructuralMismatch { family: Family::Conv, .. }),
        "{}",
        err
    );
    Ok(())
}

#[test]
fn conv_layout_precondition() -> Result<()> {
    let chain = ComputeChain::float().with_attrs(attrs! { "data_layout" => "NHWC" });
    let result = common::lower_single("vsi_npu.conv2d", |p| common::conv_body(p, &chain));
    let err = common::codegen_error(result);
    assert!(
        matches!(err, CodegenError::Precondition { family: Family::Conv, .. }),
        "{}",
        err
    );
    assert!(err.to_string().contains("NHWC"), "{}", err);

    let chain = ComputeChain::float().with_attrs(attrs! { "kernel_layout" => "HWIO" });
    let result = common::lower_single("vsi_npu.conv2d", |p| common::conv_body(p, &chain));
    assert!(err_is_precondition(common::codegen_error(result)));
    Ok(())
}

fn err_is_precondition(err: CodegenError) -> bool {
    matches!(err, CodegenError::Precondition { .. })
}

#[test]
fn missing_operand_is_a_precondition() -> Result<()> {
    let result = common::lower_single("vsi_npu.conv2d", |p| npugen::op!(Conv2d(p)));
    assert!(err_is_precondition(common::codegen_error(result)));
    Ok(())
}

#[test]
fn unknown_composite_name() -> Result<()> {
    let chain = ComputeChain::float();
    let result = common::lower_single("vsi_npu.conv3d", |p| common::conv_body(p, &chain));
    match common::codegen_error(result) {
        CodegenError::UnknownPattern { name } => assert_eq!(name, "vsi_npu.conv3d"),
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn function_without_composite_attribute() -> Result<()> {
    let data = common::data_input();
    let param = var("p0");
    let inner = function(vec![param.clone()], npugen::op!(Sigmoid(param)), Attrs::none());
    let call = call_expr(inner, vec![data.clone()]);
    let result = common::serialize(&global_function(common::SYMBOL, vec![data], call));
    assert!(matches!(
        common::codegen_error(result),
        CodegenError::NotComposite { .. }
    ));
    Ok(())
}

#[test]
fn call_to_non_function_value() -> Result<()> {
    let data = common::data_input();
    let call = call_expr(var("f"), vec![data.clone()]);
    let result = common::serialize(&global_function(common::SYMBOL, vec![data], call));
    match common::codegen_error(result) {
        CodegenError::UnsupportedCall { type_key } => assert_eq!(type_key, "Var"),
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn function_as_value_is_unsupported() -> Result<()> {
    let data = common::data_input();
    let param = var("p0");
    let inner = function(vec![param.clone()], param, Attrs::none());
    let body = npugen::op!(Add(data, inner));
    let result = common::serialize(&global_function(common::SYMBOL, vec![data], body));
    assert!(matches!(
        common::codegen_error(result),
        CodegenError::UnsupportedCall { .. }
    ));
    Ok(())
}

#[test]
fn composite_with_non_call_body() -> Result<()> {
    let result = common::lower_single("vsi_npu.conv2d", |p| p.clone());
    let err = common::codegen_error(result);
    assert!(
        matches!(err, CodegenError::StructuralMismatch { family: Family::Conv, .. }),
        "{}",
        err
    );
    Ok(())
}
