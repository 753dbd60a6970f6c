//! Pixel sinks: where the rasterizer sends its output.
//!
//! The engine never owns a framebuffer. Every primitive ends in calls on a
//! [`PixelSink`], and every coordinate handed to a sink is already known to
//! lie inside the clip. Only [`PixelSink::draw_point_in_clip`] is required;
//! the run and rectangle methods have point-by-point defaults that a sink
//! overrides when it can do better (memset rows, blit columns, ...).

use std::collections::{BTreeSet, HashMap};

use crate::basics::GRect;
use crate::line_drawer;
use crate::stipple::LineStipple;

// ============================================================================
// PixelSink trait
// ============================================================================

pub trait PixelSink {
    /// Paint one pixel. `(x, y)` is inside the clip.
    fn draw_point_in_clip(&mut self, x: i32, y: i32);

    /// Paint the run from `x1` to `x2` (inclusive, either order) on row
    /// `y`, walking from `x1`. Every pixel is inside the clip.
    ///
    /// `pixel_num` is the stipple counter of the pixel at `x1`; returns the
    /// counter after the run.
    fn draw_horizontal_line_in_clip(
        &mut self,
        x1: i32,
        x2: i32,
        y: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        line_drawer::draw_horizontal_line_points(self, x1, x2, y, stipple, pixel_num)
    }

    /// Vertical counterpart of [`PixelSink::draw_horizontal_line_in_clip`].
    fn draw_vertical_line_in_clip(
        &mut self,
        x: i32,
        y1: i32,
        y2: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        line_drawer::draw_vertical_line_points(self, x, y1, y2, stipple, pixel_num)
    }

    /// Bresenham line from `(x1, y1)` to `(x2, y2)`, both endpoints (and so
    /// every pixel of the line) inside the clip.
    #[allow(clippy::too_many_arguments)]
    fn draw_general_line_in_clip(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        line_drawer::draw_general_line_points(self, x1, y1, x2, y2, stipple, pixel_num)
    }

    /// Fill a rectangle inside the clip. `are_hor_ver_flipped` hints that
    /// columns are cheaper than rows for this destination; sinks are free to
    /// ignore it.
    fn fill_rect_in_clip(
        &mut self,
        x: i32,
        y: i32,
        x_span: i32,
        y_span: i32,
        are_hor_ver_flipped: bool,
    ) {
        if x_span <= 0 || y_span <= 0 {
            return;
        }
        let x_max = x + (x_span - 1);
        let y_max = y + (y_span - 1);
        if are_hor_ver_flipped {
            for i in x..=x_max {
                self.draw_vertical_line_in_clip(i, y, y_max, LineStipple::PLAIN, 0);
            }
        } else {
            for j in y..=y_max {
                self.draw_horizontal_line_in_clip(x, x_max, j, LineStipple::PLAIN, 0);
            }
        }
    }

    /// True if painting a pixel twice gives the same result as painting it
    /// once. When false, the drawers guarantee each pixel of an outline is
    /// emitted at most once per call.
    fn is_color_opaque(&self) -> bool {
        true
    }
}

impl<S: PixelSink + ?Sized> PixelSink for &mut S {
    fn draw_point_in_clip(&mut self, x: i32, y: i32) {
        (**self).draw_point_in_clip(x, y);
    }

    fn draw_horizontal_line_in_clip(
        &mut self,
        x1: i32,
        x2: i32,
        y: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        (**self).draw_horizontal_line_in_clip(x1, x2, y, stipple, pixel_num)
    }

    fn draw_vertical_line_in_clip(
        &mut self,
        x: i32,
        y1: i32,
        y2: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        (**self).draw_vertical_line_in_clip(x, y1, y2, stipple, pixel_num)
    }

    fn draw_general_line_in_clip(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        (**self).draw_general_line_in_clip(x1, y1, x2, y2, stipple, pixel_num)
    }

    fn fill_rect_in_clip(
        &mut self,
        x: i32,
        y: i32,
        x_span: i32,
        y_span: i32,
        are_hor_ver_flipped: bool,
    ) {
        (**self).fill_rect_in_clip(x, y, x_span, y_span, are_hor_ver_flipped);
    }

    fn is_color_opaque(&self) -> bool {
        (**self).is_color_opaque()
    }
}

// ============================================================================
// RecordingSink
// ============================================================================

/// Sink that records how many times each pixel was emitted.
///
/// Useful to check pixel sets, clip containment and the no-double-paint
/// guarantee without a real framebuffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    hits: HashMap<(i32, i32), u32>,
    fill_rects: Vec<GRect>,
    opaque: bool,
}

impl RecordingSink {
    /// Sink reporting an opaque color.
    pub fn new() -> Self {
        Self {
            hits: HashMap::new(),
            fill_rects: Vec::new(),
            opaque: true,
        }
    }

    /// Sink reporting a translucent color, so drawers take their
    /// no-double-paint paths.
    pub fn new_translucent() -> Self {
        Self {
            opaque: false,
            ..Self::new()
        }
    }

    pub fn clear(&mut self) {
        self.hits.clear();
        self.fill_rects.clear();
    }

    /// Number of distinct pixels emitted.
    pub fn pixel_count(&self) -> usize {
        self.hits.len()
    }

    /// Number of times `(x, y)` was emitted.
    pub fn hits_at(&self, x: i32, y: i32) -> u32 {
        self.hits.get(&(x, y)).copied().unwrap_or(0)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.hits.contains_key(&(x, y))
    }

    /// Largest per-pixel emission count, 0 if nothing was drawn.
    pub fn max_hits(&self) -> u32 {
        self.hits.values().copied().max().unwrap_or(0)
    }

    /// Emitted pixels in `(y, x)` order, handy for deterministic comparisons.
    pub fn pixels(&self) -> BTreeSet<(i32, i32)> {
        self.hits.keys().map(|&(x, y)| (y, x)).collect()
    }

    /// Rectangles received through [`PixelSink::fill_rect_in_clip`].
    pub fn fill_rects(&self) -> &[GRect] {
        &self.fill_rects
    }

    /// True if every emitted pixel lies in `clip`.
    pub fn is_within(&self, clip: &GRect) -> bool {
        self.hits.keys().all(|&(x, y)| clip.contains(x, y))
    }
}

impl PixelSink for RecordingSink {
    fn draw_point_in_clip(&mut self, x: i32, y: i32) {
        *self.hits.entry((x, y)).or_insert(0) += 1;
    }

    fn fill_rect_in_clip(
        &mut self,
        x: i32,
        y: i32,
        x_span: i32,
        y_span: i32,
        _are_hor_ver_flipped: bool,
    ) {
        self.fill_rects
            .push(GRect::new_trimmed(x, y, x_span, y_span));
        for j in 0..y_span {
            for i in 0..x_span {
                self.draw_point_in_clip(x + i, y + j);
            }
        }
    }

    fn is_color_opaque(&self) -> bool {
        self.opaque
    }
}

// ============================================================================
// Tests
// ============================================================================
