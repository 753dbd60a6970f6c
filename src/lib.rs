//! # clip-raster
//!
//! Pixel-exact clipped 2D rasterization. Points, stippled lines,
//! rectangles, ovals, arcs and polygons are drawn against an arbitrary
//! rectangular clip and handed pixel by pixel (or run by run) to a
//! caller-supplied [`PixelSink`]. There is no anti-aliasing: every pixel
//! is either drawn or not, and no pixel outside the clip is ever emitted.
//!
//! Guarantees:
//!
//! - clipping never changes which pixels inside the clip are drawn;
//! - with a translucent color, no pixel of a line, oval outline or
//!   polygon outline is emitted twice in one call;
//! - fills contain their outline;
//! - ovals of any size up to the full `i32` range, with tiers picked by
//!   an injectable [`SizePolicy`].
//!
//! ## Layout
//!
//! 1. **Foundation**: rectangles, rounding, errors, configuration,
//!    geometry and angle utilities, stipple patterns, scratch buffers.
//! 2. **Drawers**: lines, rectangles, ovals (direct, brute-force and
//!    polygon tiers), polygons.
//! 3. **Pixel utilities**: ARGB32 color math, mask-based pixel formats,
//!    nearest-neighbor scaling, an owned framebuffer sink.
//! 4. **Surface**: [`RendererPrimitives`], the public primitive set.

// Foundation
pub mod basics;
pub mod clip_liang_barsky;
pub mod config;
pub mod error;
pub mod math;
pub mod scratch;
pub mod sink;
pub mod stipple;

// Drawers
pub mod line_drawer;
pub mod oval_drawer;
pub mod oval_huge;
pub mod polygon_drawer;
pub mod rect_drawer;

// Pixel utilities
pub mod color;
pub mod image_scaler;
pub mod pixel_buffer;
pub mod pixel_format;

// Surface
pub mod renderer_primitives;

pub use basics::GRect;
pub use config::{RasterConfig, SizePolicy};
pub use error::{RasterError, Result};
pub use math::AngularRange;
pub use pixel_buffer::PixelBuffer;
pub use renderer_primitives::RendererPrimitives;
pub use sink::{PixelSink, RecordingSink};
pub use stipple::LineStipple;
