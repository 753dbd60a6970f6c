//! Ovals and arcs: dispatch, degenerate and direct (midpoint) tiers.
//!
//! An oval is the ellipse inscribed in the edges of its bounding box,
//! evaluated exactly by [`OvalShape`]. Every tier draws the same pixel
//! set; they only differ in how fast they get there:
//!
//! - degenerate boxes (a span of 1) are straight segments,
//! - ordinary ovals use the incremental midpoint algorithm below,
//! - huge ovals use the brute-force or polygon tiers of
//!   [`crate::oval_huge`], chosen through the injected [`SizePolicy`].
//!
//! Arcs filter pixels by direction from the center with the oval
//! normalized to a circle; filled arcs are pie slices.

use log::{debug, trace};

use crate::basics::GRect;
use crate::config::SizePolicy;
use crate::line_drawer::{draw_horizontal_line, draw_line, draw_point, draw_vertical_line};
use crate::math::{must_draw_figure, must_fill_figure, AngularRange, OvalShape};
use crate::oval_huge;
use crate::rect_drawer;
use crate::scratch::Scratch;
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

/// Outline or interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureMode {
    Draw,
    Fill,
}

// ============================================================================
// Public entry points
// ============================================================================

/// Draw the outline of the oval inscribed in `bbox`.
pub fn draw_oval<S, P>(clip: &GRect, bbox: &GRect, policy: &P, scratch: &mut Scratch, sink: &mut S)
where
    S: PixelSink + ?Sized,
    P: SizePolicy + ?Sized,
{
    rasterize_oval(
        clip,
        bbox,
        &AngularRange::FULL,
        FigureMode::Draw,
        false,
        policy,
        scratch,
        sink,
    );
}

/// Fill the oval inscribed in `bbox`, outline included.
pub fn fill_oval<S, P>(
    clip: &GRect,
    bbox: &GRect,
    are_hor_ver_flipped: bool,
    policy: &P,
    scratch: &mut Scratch,
    sink: &mut S,
) where
    S: PixelSink + ?Sized,
    P: SizePolicy + ?Sized,
{
    rasterize_oval(
        clip,
        bbox,
        &AngularRange::FULL,
        FigureMode::Fill,
        are_hor_ver_flipped,
        policy,
        scratch,
        sink,
    );
}

/// Draw the part of the oval outline lying in `range`.
pub fn draw_arc<S, P>(
    clip: &GRect,
    bbox: &GRect,
    range: &AngularRange,
    policy: &P,
    scratch: &mut Scratch,
    sink: &mut S,
) where
    S: PixelSink + ?Sized,
    P: SizePolicy + ?Sized,
{
    rasterize_oval(clip, bbox, range, FigureMode::Draw, false, policy, scratch, sink);
}

/// Fill the pie slice of the oval lying in `range`.
#[allow(clippy::too_many_arguments)]
pub fn fill_arc<S, P>(
    clip: &GRect,
    bbox: &GRect,
    range: &AngularRange,
    are_hor_ver_flipped: bool,
    policy: &P,
    scratch: &mut Scratch,
    sink: &mut S,
) where
    S: PixelSink + ?Sized,
    P: SizePolicy + ?Sized,
{
    rasterize_oval(
        clip,
        bbox,
        range,
        FigureMode::Fill,
        are_hor_ver_flipped,
        policy,
        scratch,
        sink,
    );
}

// ============================================================================
// Dispatch
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn rasterize_oval<S, P>(
    clip: &GRect,
    bbox: &GRect,
    range: &AngularRange,
    mode: FigureMode,
    are_hor_ver_flipped: bool,
    policy: &P,
    scratch: &mut Scratch,
    sink: &mut S,
) where
    S: PixelSink + ?Sized,
    P: SizePolicy + ?Sized,
{
    if bbox.is_empty() || range.is_empty() {
        return;
    }
    let visible = clip.intersected(bbox);
    if visible.is_empty() {
        return;
    }
    let threshold = policy.accurate_must_draw_area_threshold();
    let must = match mode {
        FigureMode::Draw => must_draw_figure(clip, bbox, threshold),
        FigureMode::Fill => must_fill_figure(clip, bbox, threshold),
    };
    if !must {
        return;
    }

    let oval = OvalShape::new(bbox);
    if bbox.x_span() == 1 || bbox.y_span() == 1 {
        draw_degenerate(clip, bbox, range, sink);
        return;
    }

    if range.is_full() {
        if bbox.x_span() <= 2 && bbox.y_span() <= 2 {
            // Every pixel of a 2x2 box is both inside and on the outline.
            match mode {
                FigureMode::Draw => rect_drawer::draw_rect(clip, bbox, sink),
                FigureMode::Fill => rect_drawer::fill_rect(clip, bbox, are_hor_ver_flipped, sink),
            }
            return;
        }
        if clip_inside_oval(&oval, &visible, mode) {
            if mode == FigureMode::Fill {
                debug!(
                    "oval {}x{}: clip inside oval, filling as a rectangle",
                    bbox.x_span(),
                    bbox.y_span()
                );
                rect_drawer::fill_rect(clip, &visible, are_hor_ver_flipped, sink);
            }
            return;
        }
    }

    if !policy.must_use_huge_algorithm(bbox.x_span(), bbox.y_span()) {
        rasterize_direct(&visible, &oval, range, mode, scratch, sink);
    } else if policy.must_use_brute_force(visible.area()) {
        debug!(
            "oval {}x{}: brute force over {} visible pixels",
            bbox.x_span(),
            bbox.y_span(),
            visible.area()
        );
        oval_huge::rasterize_brute_force(&visible, &oval, range, mode, sink);
    } else {
        debug!(
            "oval {}x{}: polygon approximation over {} visible pixels",
            bbox.x_span(),
            bbox.y_span(),
            visible.area()
        );
        oval_huge::rasterize_as_polygon(
            clip,
            &visible,
            &oval,
            range,
            mode,
            are_hor_ver_flipped,
            &mut scratch.bytes,
            sink,
        );
    }
}

/// True if the whole visible area is covered by the fill (fill mode), or
/// holds no outline pixel because every pixel and its neighbours are
/// inside the oval (draw mode). The oval being convex, checking corners
/// is enough.
fn clip_inside_oval(oval: &OvalShape, visible: &GRect, mode: FigureMode) -> bool {
    let margin = match mode {
        FigureMode::Fill => 0,
        FigureMode::Draw => 1,
    };
    let x1 = visible.x() as i64 - margin;
    let y1 = visible.y() as i64 - margin;
    let x2 = visible.x_max() as i64 + margin;
    let y2 = visible.y_max() as i64 + margin;
    oval.contains_pixel(x1, y1)
        && oval.contains_pixel(x2, y1)
        && oval.contains_pixel(x1, y2)
        && oval.contains_pixel(x2, y2)
}

// ============================================================================
// Degenerate tier
// ============================================================================

/// Box one pixel wide or tall: the oval is the box itself, outline and
/// interior alike. Arcs keep each half segment whose direction is in
/// range; the center pixel, when there is one, is always kept.
fn draw_degenerate<S: PixelSink + ?Sized>(
    clip: &GRect,
    bbox: &GRect,
    range: &AngularRange,
    sink: &mut S,
) {
    let plain = LineStipple::PLAIN;
    if range.is_full() {
        draw_line(
            clip,
            bbox.x(),
            bbox.y(),
            bbox.x_max(),
            bbox.y_max(),
            plain,
            0,
            sink,
        );
        return;
    }
    if bbox.x_span() == 1 {
        let x = bbox.x();
        let span = bbox.y_span();
        let half = span / 2;
        if half > 0 && range.contains(0.0, 1.0) {
            draw_vertical_line(clip, x, bbox.y(), bbox.y() + (half - 1), plain, 0, sink);
        }
        if span % 2 == 1 {
            draw_point(clip, x, bbox.y() + half, sink);
        }
        if half > 0 && range.contains(0.0, -1.0) {
            draw_vertical_line(clip, x, bbox.y_max() - (half - 1), bbox.y_max(), plain, 0, sink);
        }
    } else {
        let y = bbox.y();
        let span = bbox.x_span();
        let half = span / 2;
        if half > 0 && range.contains(-1.0, 0.0) {
            draw_horizontal_line(clip, bbox.x(), bbox.x() + (half - 1), y, plain, 0, sink);
        }
        if span % 2 == 1 {
            draw_point(clip, bbox.x() + half, y, sink);
        }
        if half > 0 && range.contains(1.0, 0.0) {
            draw_horizontal_line(clip, bbox.x_max() - (half - 1), bbox.x_max(), y, plain, 0, sink);
        }
    }
}

// ============================================================================
// Direct (midpoint) tier
// ============================================================================

/// Half-widths of the top half of the oval.
///
/// `extents[k]` is the largest doubled offset `X` such that the pixel at
/// `X` on row `k` is inside the oval, or -1 if the row holds no pixel
/// (even widths only: the innermost offset is then 1, not 0). Rows are
/// walked from the top toward
/// the center, where the extent only grows, keeping the midpoint decision
/// variable `d = x_span² y_span² - X² y_span² - Y² x_span²` up to date
/// instead of re-evaluating the ellipse equation.
pub(crate) fn row_extents(oval: &OvalShape, extents: &mut [i64]) {
    let xs = oval.x_span() as i128;
    let ys = oval.y_span() as i128;
    let xs2 = xs * xs;
    let ys2 = ys * ys;
    let mut xe: i64 = (oval.x_span() - 1) & 1;
    let mut dy: i64 = -(oval.y_span() - 1);
    let mut d: i128 = xs2 * ys2 - (xe as i128 * xe as i128) * ys2 - (dy as i128 * dy as i128) * xs2;
    for e in extents.iter_mut() {
        if d < 0 {
            *e = -1;
            d -= (4 * dy as i128 + 4) * xs2;
            dy += 2;
            continue;
        }
        loop {
            let next = d - (4 * xe as i128 + 4) * ys2;
            if next < 0 {
                break;
            }
            d = next;
            xe += 2;
        }
        *e = xe;
        d -= (4 * dy as i128 + 4) * xs2;
        dy += 2;
    }
}

fn rasterize_direct<S: PixelSink + ?Sized>(
    visible: &GRect,
    oval: &OvalShape,
    range: &AngularRange,
    mode: FigureMode,
    scratch: &mut Scratch,
    sink: &mut S,
) {
    let y_span = oval.y_span();
    let half = ((y_span + 1) / 2) as usize;
    let mut extents = scratch.longs.take(half);
    row_extents(oval, &mut extents);
    trace!("direct oval tier: {} row extents", half);

    let top = oval.pixel_y(-(y_span - 1));
    let extent_at = |k: i64| -> Option<i64> {
        if k < 0 || k >= y_span {
            None
        } else {
            Some(extents[k.min(y_span - 1 - k) as usize])
        }
    };

    for py in visible.y()..=visible.y_max() {
        let py = py as i64;
        let k = py - top;
        let e = match extent_at(k) {
            Some(e) if e >= 0 => e,
            _ => continue,
        };
        match mode {
            FigureMode::Fill => emit_doubled_run(visible, oval, range, py, -e, e, sink),
            FigureMode::Draw => {
                let up = extent_at(k - 1).unwrap_or(-1);
                let down = extent_at(k + 1).unwrap_or(-1);
                let inner = (e - 2).min(up).min(down);
                if inner < 0 {
                    emit_doubled_run(visible, oval, range, py, -e, e, sink);
                } else {
                    emit_doubled_run(visible, oval, range, py, -e, -inner - 2, sink);
                    emit_doubled_run(visible, oval, range, py, inner + 2, e, sink);
                }
            }
        }
    }
    scratch.longs.give(extents);
}

#[inline]
fn emit_doubled_run<S: PixelSink + ?Sized>(
    visible: &GRect,
    oval: &OvalShape,
    range: &AngularRange,
    py: i64,
    dx1: i64,
    dx2: i64,
    sink: &mut S,
) {
    emit_oval_run(visible, oval, range, py, oval.pixel_x(dx1), oval.pixel_x(dx2), sink);
}

/// Emit the pixels `px1..=px2` of row `py` that lie in `visible` and, for
/// arcs, in `range`. `py` must be a row of `visible`.
pub(crate) fn emit_oval_run<S: PixelSink + ?Sized>(
    visible: &GRect,
    oval: &OvalShape,
    range: &AngularRange,
    py: i64,
    px1: i64,
    px2: i64,
    sink: &mut S,
) {
    let a = px1.max(visible.x() as i64);
    let b = px2.min(visible.x_max() as i64);
    if a > b {
        return;
    }
    let y = py as i32;
    if range.is_full() {
        sink.draw_horizontal_line_in_clip(a as i32, b as i32, y, LineStipple::PLAIN, 0);
        return;
    }
    let mut run_start: Option<i64> = None;
    for px in a..=b {
        let (u, v) = oval.normalized_direction(px, py);
        if range.contains(u, v) {
            if run_start.is_none() {
                run_start = Some(px);
            }
        } else if let Some(s) = run_start.take() {
            sink.draw_horizontal_line_in_clip(s as i32, (px - 1) as i32, y, LineStipple::PLAIN, 0);
        }
    }
    if let Some(s) = run_start {
        sink.draw_horizontal_line_in_clip(s as i32, b as i32, y, LineStipple::PLAIN, 0);
    }
}

// ============================================================================
// Tests
// ============================================================================
