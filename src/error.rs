//! Error type for caller contract violations.
//!
//! Degenerate-but-legal geometry (empty spans, zero-point polygons, zero
//! angular span) is never an error; it simply draws nothing or a simpler
//! shape. Internal invariant violations are panics, not variants here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("negative span: x_span = {x_span}, y_span = {y_span}")]
    NegativeSpan { x_span: i32, y_span: i32 },
    #[error("invalid angle {name} = {value}: must be finite")]
    NonFiniteAngle { name: &'static str, value: f64 },
    #[error("start angle {0} out of range [0, 360)")]
    StartAngleOutOfRange(f64),
    #[error("angular span {0} out of range [0, 360]")]
    AngularSpanOutOfRange(f64),
    #[error("stipple factor {0} out of range [1, 256]")]
    InvalidStippleFactor(u32),
    #[error("channel mask {0:#010x} is wider than 8 bits")]
    MaskTooWide(u32),
    #[error("channel mask {0:#010x} is not a contiguous run of bits")]
    MaskNotContiguous(u32),
    #[error("channel masks overlap")]
    OverlappingMasks,
    #[error("pixel format {0} is already registered")]
    DuplicatePixelFormat(u32),
    #[error("unknown pixel format id {0}")]
    UnknownPixelFormat(u32),
    #[error("point count {count} exceeds coordinate arrays ({xs_len} xs, {ys_len} ys)")]
    PointCountOutOfBounds {
        count: usize,
        xs_len: usize,
        ys_len: usize,
    },
    #[error("source rectangle is not covered by the source pixels")]
    SourceRectOutOfBounds,
}

pub type Result<T> = std::result::Result<T, RasterError>;
