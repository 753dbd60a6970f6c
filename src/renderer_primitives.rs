//! Clipped primitive renderer.
//!
//! The public drawing surface: points, plain and stippled lines,
//! rectangles, ovals, arcs and polygons, each drawn against a clip
//! rectangle into a caller-supplied [`PixelSink`]. The renderer owns the
//! size policy, the scratch buffers reused across calls and a current
//! position with stipple state for `move_to`/`line_to` chains. Use one
//! renderer per thread.

use crate::basics::GRect;
use crate::config::{RasterConfig, SizePolicy};
use crate::error::{RasterError, Result};
use crate::line_drawer;
use crate::math::AngularRange;
use crate::oval_drawer;
use crate::polygon_drawer;
use crate::rect_drawer;
use crate::scratch::Scratch;
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

// ============================================================================
// RendererPrimitives
// ============================================================================

pub struct RendererPrimitives<P: SizePolicy = RasterConfig> {
    policy: P,
    scratch: Scratch,
    are_hor_ver_flipped: bool,
    line_stipple: LineStipple,
    pixel_num: u32,
    curr_x: i32,
    curr_y: i32,
}

impl RendererPrimitives<RasterConfig> {
    /// Renderer using `config` both as size policy and for the scratch
    /// reuse cap.
    pub fn with_config(config: RasterConfig) -> Self {
        let scratch = Scratch::new(config.scratch_max_reuse_capacity());
        Self::with_scratch(config, scratch)
    }
}

impl Default for RendererPrimitives<RasterConfig> {
    fn default() -> Self {
        Self::with_config(RasterConfig::default())
    }
}

impl<P: SizePolicy> RendererPrimitives<P> {
    /// Renderer with a custom size policy and default scratch pools.
    pub fn new(policy: P) -> Self {
        Self::with_scratch(policy, Scratch::default())
    }

    pub fn with_scratch(policy: P, scratch: Scratch) -> Self {
        Self {
            policy,
            scratch,
            are_hor_ver_flipped: false,
            line_stipple: LineStipple::PLAIN,
            pixel_num: 0,
            curr_x: 0,
            curr_y: 0,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Hint forwarded to [`PixelSink::fill_rect_in_clip`]: set when the
    /// destination is rotated so columns are cheaper than rows.
    pub fn set_hor_ver_flipped(&mut self, flipped: bool) {
        self.are_hor_ver_flipped = flipped;
    }

    pub fn are_hor_ver_flipped(&self) -> bool {
        self.are_hor_ver_flipped
    }

    // ------------------------------------------------------------------------
    // Points and lines
    // ------------------------------------------------------------------------

    pub fn draw_point<S: PixelSink + ?Sized>(&mut self, clip: &GRect, x: i32, y: i32, sink: &mut S) {
        line_drawer::draw_point(clip, x, y, sink);
    }

    /// Plain line, both endpoints included.
    pub fn draw_line<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        sink: &mut S,
    ) {
        line_drawer::draw_line(clip, x1, y1, x2, y2, LineStipple::PLAIN, 0, sink);
    }

    /// Stippled line starting at counter `pixel_num`. Returns the counter
    /// for the next segment.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line_stipple<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        stipple: LineStipple,
        pixel_num: u32,
        sink: &mut S,
    ) -> u32 {
        line_drawer::draw_line(clip, x1, y1, x2, y2, stipple, pixel_num, sink)
    }

    /// Line between real-valued endpoints that may lie outside the clip.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_general_line_clipped<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stipple: LineStipple,
        pixel_num: u32,
        sink: &mut S,
    ) -> u32 {
        line_drawer::draw_general_line_clipped(clip, x1, y1, x2, y2, stipple, pixel_num, sink)
    }

    /// Stipple used by [`Self::line_to`], restarting its counter at
    /// `pixel_num`.
    pub fn set_line_stipple(&mut self, stipple: LineStipple, pixel_num: u32) {
        self.line_stipple = stipple;
        self.pixel_num = pixel_num;
    }

    pub fn line_stipple(&self) -> LineStipple {
        self.line_stipple
    }

    /// Counter the next [`Self::line_to`] segment starts at.
    pub fn pixel_num(&self) -> u32 {
        self.pixel_num
    }

    pub fn current_position(&self) -> (i32, i32) {
        (self.curr_x, self.curr_y)
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.curr_x = x;
        self.curr_y = y;
    }

    /// Line from the current position to `(x, y)` with the current
    /// stipple, which then becomes the current position. The joint pixel
    /// is shared with the previous segment.
    pub fn line_to<S: PixelSink + ?Sized>(&mut self, clip: &GRect, x: i32, y: i32, sink: &mut S) {
        self.pixel_num = line_drawer::draw_line(
            clip,
            self.curr_x,
            self.curr_y,
            x,
            y,
            self.line_stipple,
            self.pixel_num,
            sink,
        );
        self.move_to(x, y);
    }

    // ------------------------------------------------------------------------
    // Rectangles and ovals
    // ------------------------------------------------------------------------

    pub fn draw_rect<S: PixelSink + ?Sized>(&mut self, clip: &GRect, rect: &GRect, sink: &mut S) {
        rect_drawer::draw_rect(clip, rect, sink);
    }

    pub fn fill_rect<S: PixelSink + ?Sized>(&mut self, clip: &GRect, rect: &GRect, sink: &mut S) {
        rect_drawer::fill_rect(clip, rect, self.are_hor_ver_flipped, sink);
    }

    /// Outline of the oval inscribed in `bbox`.
    pub fn draw_oval<S: PixelSink + ?Sized>(&mut self, clip: &GRect, bbox: &GRect, sink: &mut S) {
        oval_drawer::draw_oval(clip, bbox, &self.policy, &mut self.scratch, sink);
    }

    pub fn fill_oval<S: PixelSink + ?Sized>(&mut self, clip: &GRect, bbox: &GRect, sink: &mut S) {
        oval_drawer::fill_oval(
            clip,
            bbox,
            self.are_hor_ver_flipped,
            &self.policy,
            &mut self.scratch,
            sink,
        );
    }

    /// Arc of the oval inscribed in `bbox`, from `start_deg` counter-clockwise
    /// over `span_deg` degrees.
    pub fn draw_arc<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        bbox: &GRect,
        start_deg: f64,
        span_deg: f64,
        sink: &mut S,
    ) -> Result<()> {
        let range = AngularRange::new(start_deg, span_deg)?;
        oval_drawer::draw_arc(clip, bbox, &range, &self.policy, &mut self.scratch, sink);
        Ok(())
    }

    /// Pie slice: the arc's sector, center included.
    pub fn fill_arc<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        bbox: &GRect,
        start_deg: f64,
        span_deg: f64,
        sink: &mut S,
    ) -> Result<()> {
        let range = AngularRange::new(start_deg, span_deg)?;
        oval_drawer::fill_arc(
            clip,
            bbox,
            &range,
            self.are_hor_ver_flipped,
            &self.policy,
            &mut self.scratch,
            sink,
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Polygons
    // ------------------------------------------------------------------------

    /// Open chain through the first `point_count` vertices.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_polyline<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        xs: &[i32],
        ys: &[i32],
        point_count: usize,
        stipple: LineStipple,
        pixel_num: u32,
        sink: &mut S,
    ) -> Result<u32> {
        check_point_count(point_count, xs, ys)?;
        Ok(polygon_drawer::draw_polyline(
            clip,
            &xs[..point_count],
            &ys[..point_count],
            stipple,
            pixel_num,
            &mut self.scratch.bytes,
            sink,
        ))
    }

    /// Closed outline through the first `point_count` vertices.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_polygon<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        xs: &[i32],
        ys: &[i32],
        point_count: usize,
        stipple: LineStipple,
        pixel_num: u32,
        sink: &mut S,
    ) -> Result<u32> {
        check_point_count(point_count, xs, ys)?;
        Ok(polygon_drawer::draw_polygon(
            clip,
            &xs[..point_count],
            &ys[..point_count],
            stipple,
            pixel_num,
            &mut self.scratch.bytes,
            sink,
        ))
    }

    /// Even-odd fill of the first `point_count` vertices, edges included.
    pub fn fill_polygon<S: PixelSink + ?Sized>(
        &mut self,
        clip: &GRect,
        xs: &[i32],
        ys: &[i32],
        point_count: usize,
        sink: &mut S,
    ) -> Result<()> {
        check_point_count(point_count, xs, ys)?;
        polygon_drawer::fill_polygon(
            clip,
            &xs[..point_count],
            &ys[..point_count],
            self.are_hor_ver_flipped,
            &mut self.scratch.bytes,
            sink,
        );
        Ok(())
    }
}

fn check_point_count(count: usize, xs: &[i32], ys: &[i32]) -> Result<()> {
    if count > xs.len() || count > ys.len() {
        return Err(RasterError::PointCountOutOfBounds {
            count,
            xs_len: xs.len(),
            ys_len: ys.len(),
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
