//! Polygon and polyline drawing, polygon fill.
//!
//! Vertices come as parallel `xs`/`ys` slices; the closing edge from the
//! last vertex back to the first is implicit. Fewer than three vertices
//! degrade to nothing, a point or a line.
//!
//! Filling first draws (and flags) the edges, then resolves everything
//! else in a single top-to-bottom pass over a per-pixel flag buffer: a run
//! of unflagged pixels inherits its state from the row above when it can,
//! and only falls back to the even-odd point-in-polygon test when nothing
//! above it is known. The cost is O(max(area, vertex count)) rather than
//! O(rows × vertex count).

use log::{debug, trace};

use crate::basics::GRect;
use crate::line_drawer::draw_line;
use crate::math::segments_intersect;
use crate::rect_drawer::fill_rect;
use crate::scratch::ScratchPool;
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

// ============================================================================
// Pixel flags
// ============================================================================

pub const FLAG_PENDING: u8 = 0;
pub const FLAG_EDGE: u8 = 1;
pub const FLAG_IN: u8 = 2;
pub const FLAG_OUT: u8 = 3;

/// Sink forwarding each pixel the first time it is seen and flagging it
/// as an edge pixel.
struct FlaggingSink<'a, S: PixelSink + ?Sized> {
    inner: &'a mut S,
    flags: &'a mut [u8],
    area: GRect,
}

impl<'a, S: PixelSink + ?Sized> FlaggingSink<'a, S> {
    fn new(inner: &'a mut S, flags: &'a mut [u8], area: GRect) -> Self {
        debug_assert_eq!(flags.len() as u64, area.area());
        Self { inner, flags, area }
    }
}

impl<S: PixelSink + ?Sized> PixelSink for FlaggingSink<'_, S> {
    fn draw_point_in_clip(&mut self, x: i32, y: i32) {
        debug_assert!(self.area.contains(x, y));
        let idx = (y - self.area.y()) as usize * self.area.x_span() as usize
            + (x - self.area.x()) as usize;
        if self.flags[idx] == FLAG_PENDING {
            self.flags[idx] = FLAG_EDGE;
            self.inner.draw_point_in_clip(x, y);
        }
    }

    fn is_color_opaque(&self) -> bool {
        self.inner.is_color_opaque()
    }
}

// ============================================================================
// Outlines
// ============================================================================

/// Draw the open chain of edges through the vertices. Returns the
/// advanced stipple counter.
#[allow(clippy::too_many_arguments)]
pub fn draw_polyline<S: PixelSink + ?Sized>(
    clip: &GRect,
    xs: &[i32],
    ys: &[i32],
    stipple: LineStipple,
    pixel_num: u32,
    flags: &mut ScratchPool<u8>,
    sink: &mut S,
) -> u32 {
    draw_outline(clip, xs, ys, false, stipple, pixel_num, flags, sink)
}

/// Draw the closed outline through the vertices. Returns the advanced
/// stipple counter.
#[allow(clippy::too_many_arguments)]
pub fn draw_polygon<S: PixelSink + ?Sized>(
    clip: &GRect,
    xs: &[i32],
    ys: &[i32],
    stipple: LineStipple,
    pixel_num: u32,
    flags: &mut ScratchPool<u8>,
    sink: &mut S,
) -> u32 {
    draw_outline(clip, xs, ys, true, stipple, pixel_num, flags, sink)
}

#[allow(clippy::too_many_arguments)]
fn draw_outline<S: PixelSink + ?Sized>(
    clip: &GRect,
    xs: &[i32],
    ys: &[i32],
    closed: bool,
    stipple: LineStipple,
    pixel_num: u32,
    flags: &mut ScratchPool<u8>,
    sink: &mut S,
) -> u32 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len().min(ys.len());
    match n {
        0 => return pixel_num,
        1 => return draw_line(clip, xs[0], ys[0], xs[0], ys[0], stipple, pixel_num, sink),
        2 => return draw_line(clip, xs[0], ys[0], xs[1], ys[1], stipple, pixel_num, sink),
        _ => {}
    }
    if sink.is_color_opaque() {
        return draw_edges(clip, &xs[..n], &ys[..n], closed, stipple, pixel_num, sink);
    }
    let area = visible_bounds(clip, &xs[..n], &ys[..n]);
    if area.is_empty() {
        return draw_edges(clip, &xs[..n], &ys[..n], closed, stipple, pixel_num, sink);
    }
    let mut buf = flags.take(area.area() as usize);
    let pixel_num = {
        let mut flagging = FlaggingSink::new(sink, &mut buf, area);
        draw_edges(&area, &xs[..n], &ys[..n], closed, stipple, pixel_num, &mut flagging)
    };
    flags.give(buf);
    pixel_num
}

/// Draw every edge in vertex order, chaining the stipple counter.
fn draw_edges<S: PixelSink + ?Sized>(
    clip: &GRect,
    xs: &[i32],
    ys: &[i32],
    closed: bool,
    stipple: LineStipple,
    mut pixel_num: u32,
    sink: &mut S,
) -> u32 {
    let n = xs.len();
    for i in 1..n {
        pixel_num = draw_line(clip, xs[i - 1], ys[i - 1], xs[i], ys[i], stipple, pixel_num, sink);
    }
    if closed {
        pixel_num = draw_line(clip, xs[n - 1], ys[n - 1], xs[0], ys[0], stipple, pixel_num, sink);
    }
    pixel_num
}

/// Part of `clip` covered by the vertices' bounding box. The box itself
/// may span the whole `i32` range, more than a `GRect` can hold.
fn visible_bounds(clip: &GRect, xs: &[i32], ys: &[i32]) -> GRect {
    let (mut x1, mut x2) = (i32::MAX, i32::MIN);
    let (mut y1, mut y2) = (i32::MAX, i32::MIN);
    for (&x, &y) in xs.iter().zip(ys) {
        x1 = x1.min(x);
        x2 = x2.max(x);
        y1 = y1.min(y);
        y2 = y2.max(y);
    }
    clip.intersected_corners(x1 as i64, y1 as i64, x2 as i64, y2 as i64)
}

// ============================================================================
// Fill
// ============================================================================

/// Fill the polygon, edges included, under the even-odd rule.
pub fn fill_polygon<S: PixelSink + ?Sized>(
    clip: &GRect,
    xs: &[i32],
    ys: &[i32],
    are_hor_ver_flipped: bool,
    flags: &mut ScratchPool<u8>,
    sink: &mut S,
) {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len().min(ys.len());
    let (xs, ys) = (&xs[..n], &ys[..n]);
    match n {
        0 => return,
        1 | 2 => {
            draw_line(clip, xs[0], ys[0], xs[n - 1], ys[n - 1], LineStipple::PLAIN, 0, sink);
            return;
        }
        _ => {}
    }

    let visible = visible_bounds(clip, xs, ys);
    if visible.is_empty() {
        return;
    }

    if is_axis_aligned_rect(xs, ys) {
        // The rectangle is its own bounding box.
        debug!(
            "polygon fill: axis-aligned rectangle, {}x{} visible",
            visible.x_span(),
            visible.y_span()
        );
        fill_rect(clip, &visible, are_hor_ver_flipped, sink);
        return;
    }

    if !any_edge_touches(xs, ys, &visible) {
        // No edge pixel can be visible: the whole area is on one side.
        let inside = point_in_polygon(xs, ys, visible.x() as i64, visible.y() as i64);
        debug!(
            "polygon fill: no edge crosses the clip, {}",
            if inside { "filling the clip" } else { "nothing to fill" }
        );
        if inside {
            fill_rect(clip, &visible, are_hor_ver_flipped, sink);
        }
        return;
    }

    let width = visible.x_span() as usize;
    let height = visible.y_span() as usize;
    trace!("polygon fill: {}x{} flag buffer, {} vertices", width, height, n);
    let mut buf = flags.take(width * height);
    {
        let mut flagging = FlaggingSink::new(&mut *sink, &mut buf, visible);
        draw_edges(&visible, xs, ys, true, LineStipple::PLAIN, 0, &mut flagging);
    }

    for j in 0..height {
        let y = visible.y() + j as i32;
        let row = j * width;
        let mut i = 0;
        while i < width {
            if buf[row + i] == FLAG_EDGE {
                i += 1;
                continue;
            }
            let start = i;
            while i < width && buf[row + i] != FLAG_EDGE {
                i += 1;
            }
            let end = i - 1;

            let inherited = if j > 0 {
                let above = row - width;
                buf[above + start..=above + end]
                    .iter()
                    .copied()
                    .find(|&f| f == FLAG_IN || f == FLAG_OUT)
            } else {
                None
            };
            let state = inherited.unwrap_or_else(|| {
                let x = visible.x() as i64 + start as i64;
                if point_in_polygon(xs, ys, x, y as i64) {
                    FLAG_IN
                } else {
                    FLAG_OUT
                }
            });
            buf[row + start..=row + end].fill(state);
            if state == FLAG_IN {
                sink.draw_horizontal_line_in_clip(
                    visible.x() + start as i32,
                    visible.x() + end as i32,
                    y,
                    LineStipple::PLAIN,
                    0,
                );
            }
        }
    }
    flags.give(buf);
}

/// True for a 4-vertex polygon whose edges alternate between horizontal
/// and vertical.
fn is_axis_aligned_rect(xs: &[i32], ys: &[i32]) -> bool {
    if xs.len() != 4 {
        return false;
    }
    let h_first = ys[0] == ys[1] && xs[1] == xs[2] && ys[2] == ys[3] && xs[3] == xs[0];
    let v_first = xs[0] == xs[1] && ys[1] == ys[2] && xs[2] == xs[3] && ys[3] == ys[0];
    h_first || v_first
}

/// True if some edge comes within a pixel of `area`, which is the only
/// way an edge pixel can land in it.
fn any_edge_touches(xs: &[i32], ys: &[i32], area: &GRect) -> bool {
    let x1 = area.x() as i64 - 1;
    let y1 = area.y() as i64 - 1;
    let x2 = area.x_max() as i64 + 1;
    let y2 = area.y_max() as i64 + 1;
    let sides = [
        ((x1, y1), (x2, y1)),
        ((x2, y1), (x2, y2)),
        ((x2, y2), (x1, y2)),
        ((x1, y2), (x1, y1)),
    ];
    let n = xs.len();
    (0..n).any(|i| {
        let j = if i == 0 { n - 1 } else { i - 1 };
        let a = (xs[j] as i64, ys[j] as i64);
        let b = (xs[i] as i64, ys[i] as i64);
        let inside = |p: (i64, i64)| p.0 >= x1 && p.0 <= x2 && p.1 >= y1 && p.1 <= y2;
        inside(a)
            || inside(b)
            || sides.iter().any(|&(s1, s2)| segments_intersect(a, b, s1, s2))
    })
}

/// Even-odd point-in-polygon test, exact on integer coordinates.
///
/// A horizontal ray is cast toward +x; an edge counts when its endpoints
/// lie strictly on opposite sides of the ray's row in the half-open sense
/// (`y > py` versus `y <= py`), so a vertex lying exactly on the row is
/// never counted twice.
pub fn point_in_polygon(xs: &[i32], ys: &[i32], px: i64, py: i64) -> bool {
    let n = xs.len().min(ys.len());
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = (xs[i] as i64, ys[i] as i64);
        let (xj, yj) = (xs[j] as i64, ys[j] as i64);
        if (yi > py) != (yj > py) {
            // px < xi + (py - yi) * (xj - xi) / (yj - yi)
            let lhs = (px - xi) as i128 * (yj - yi) as i128;
            let rhs = (py - yi) as i128 * (xj - xi) as i128;
            let crosses = if yj > yi { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// ============================================================================
// Tests
// ============================================================================
