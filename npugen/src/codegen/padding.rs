//! Layout checks and pad-rectangle extraction.
//!
//! Padding is read from dimensions 2 and 3 of the pad width, which are only
//! height and width in a channel-major layout, so the layout is validated
//! before any padding is extracted.
use anyhow::Result;

use crate::errors::CodegenError;
use crate::expr::{AttrValue, Call};

use super::composite::Family;

pub const DATA_LAYOUT_NCHW: &str = "NCHW";
pub const KERNEL_LAYOUT_OIHW: &str = "OIHW";

pub const PAD_WIDTH_ATTR: &str = "pad_width";
pub const PADDING_ATTR: &str = "padding";

const HEIGHT_AXIS: usize = 2;
const WIDTH_AXIS: usize = 3;

fn layout_attr<'a>(call: &'a Call, name: &str, default: &'a str, family: Family) -> Result<&'a str> {
    match call.attrs.get(name) {
        None => Ok(default),
        Some(AttrValue::Str(value)) => Ok(value),
        Some(other) => Err(CodegenError::precondition(
            family,
            format!("{} must be a string, got {}", name, other.kind_name()),
        )
        .into()),
    }
}

/// Layout attributes of a convolution with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conv2dLayout {
    pub data_layout: String,
    pub kernel_layout: String,
}

impl Conv2dLayout {
    pub fn from_call(conv: &Call) -> Result<Self> {
        Ok(Self {
            data_layout: layout_attr(conv, "data_layout", DATA_LAYOUT_NCHW, Family::Conv)?
                .to_string(),
            kernel_layout: layout_attr(conv, "kernel_layout", KERNEL_LAYOUT_OIHW, Family::Conv)?
                .to_string(),
        })
    }

    /// Only NCHW data with OIHW kernels can be lowered.
    pub fn validate(&self) -> Result<()> {
        if self.kernel_layout != KERNEL_LAYOUT_OIHW {
            return Err(CodegenError::precondition(
                Family::Conv,
                format!(
                    "kernel layout must be {}, got {}; has the module been pre-processed correctly?",
                    KERNEL_LAYOUT_OIHW, self.kernel_layout
                ),
            )
            .into());
        }
        if self.data_layout != DATA_LAYOUT_NCHW {
            return Err(CodegenError::precondition(
                Family::Conv,
                format!(
                    "input data layout must be {}, got {}; has the module been pre-processed correctly?",
                    DATA_LAYOUT_NCHW, self.data_layout
                ),
            )
            .into());
        }
        Ok(())
    }
}

pub fn validate_conv_layout(conv: &Call) -> Result<()> {
    Conv2dLayout::from_call(conv)?.validate()
}

/// Pools carrying a pad link must be NCHW.
pub fn validate_pool_layout(pool: &Call) -> Result<()> {
    let layout = layout_attr(pool, "layout", DATA_LAYOUT_NCHW, Family::Pool)?;
    if layout != DATA_LAYOUT_NCHW {
        return Err(CodegenError::precondition(
            Family::Pool,
            format!("pool layout must be {}, got {}", DATA_LAYOUT_NCHW, layout),
        )
        .into());
    }
    Ok(())
}

/// Convert an NCHW pad width into `[top, left, bottom, right]` strings.
pub fn padding_from_pad_width(pad_width: &[Vec<i64>]) -> Option<Vec<String>> {
    if pad_width.len() != 4 || pad_width.iter().any(|row| row.len() != 2) {
        return None;
    }
    let height = &pad_width[HEIGHT_AXIS];
    let width = &pad_width[WIDTH_AXIS];
    Some(vec![
        height[0].to_string(),
        width[0].to_string(),
        height[1].to_string(),
        width[1].to_string(),
    ])
}

/// Read the padding attribute off a matched pad call.
pub fn padding_from_pad(pad: &Call, family: Family) -> Result<Vec<String>> {
    let pad_width = pad
        .attrs
        .get(PAD_WIDTH_ATTR)
        .and_then(AttrValue::as_int_grid)
        .ok_or_else(|| {
            CodegenError::precondition(family, format!("pad call has no integer {}", PAD_WIDTH_ATTR))
        })?;
    padding_from_pad_width(pad_width).ok_or_else(|| {
        CodegenError::precondition(
            family,
            format!("{} must be 4 rows of (before, after), got {:?}", PAD_WIDTH_ATTR, pad_width),
        )
        .into()
    })
}
