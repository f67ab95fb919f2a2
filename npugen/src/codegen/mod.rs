//! Lowering of fused composite calls into kernel-graph nodes.
mod builders;
mod compile;
mod composite;
mod padding;
mod patterns;
mod serializer;
mod unpack;

pub use builders::{
    build_conv, build_dense, build_pool, build_qnn_avg_pool, build_qnn_sigmoid, build_qnn_softmax,
};
pub use compile::{compile, compile_with_symbol, CompiledModule};
pub use composite::{CompositeKind, Family};
pub use padding::{
    padding_from_pad, padding_from_pad_width, validate_conv_layout, validate_pool_layout,
    Conv2dLayout, DATA_LAYOUT_NCHW, KERNEL_LAYOUT_OIHW, PADDING_ATTR, PAD_WIDTH_ATTR,
};
pub use patterns::{
    ConvPattern, DensePattern, PoolKind, PoolPattern, QnnActivationPattern, QnnAvgPoolPattern,
    QnnSigmoidPattern, QnnSoftmaxPattern,
};
pub use serializer::Serializer;
pub use unpack::{
    unpack_conv, unpack_dense, unpack_pool, unpack_qnn_avg_pool, unpack_qnn_sigmoid,
    unpack_qnn_softmax,
};
