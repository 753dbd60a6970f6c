//! Clipped point and line rasterization.
//!
//! Lines are walked from their first endpoint to their second so the
//! stipple phase is fully determined by the caller. Every drawing function
//! returns the advanced stipple counter, allowing polylines and polygon
//! edges to chain it.
//!
//! Clipping never changes which pixels a line is made of: the pixel at
//! step `i` is computed in closed form, so entering the line in the middle
//! lands on exactly the pixel the full walk would have reached.

use crate::basics::{round_toward, GRect};
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

// ============================================================================
// BresenhamLine
// ============================================================================

/// Integer Bresenham line between two pixels.
///
/// The major axis is x when `|dx| >= |dy|`. At major step `i` the minor
/// offset is `round(i * minor_delta / major_delta)`, exact half-pixel ties
/// resolved away from the first endpoint. Arithmetic is done on 64 and 128
/// bits so that spans up to 2^32 cannot overflow.
#[derive(Debug, Clone, Copy)]
pub struct BresenhamLine {
    x1: i32,
    y1: i32,
    x_major: bool,
    major_delta: i64,
    minor_delta: i64,
    major_step: i64,
    minor_step: i64,
}

impl BresenhamLine {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let dx = x2 as i64 - x1 as i64;
        let dy = y2 as i64 - y1 as i64;
        let x_major = dx.abs() >= dy.abs();
        let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
        Self {
            x1,
            y1,
            x_major,
            major_delta: major.abs(),
            minor_delta: minor.abs(),
            major_step: if major < 0 { -1 } else { 1 },
            minor_step: if minor < 0 { -1 } else { 1 },
        }
    }

    #[inline]
    pub fn is_x_major(&self) -> bool {
        self.x_major
    }

    /// Number of pixels of the whole line, endpoints included.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.major_delta as u64 + 1
    }

    /// Minor-axis offset (in absolute value) at major step `i`.
    #[inline]
    pub fn minor_offset(&self, i: i64) -> i64 {
        if self.major_delta == 0 {
            return 0;
        }
        let num = 2 * i as i128 * self.minor_delta as i128 + self.major_delta as i128;
        (num / (2 * self.major_delta as i128)) as i64
    }

    /// Pixel at step `i` (0 is the first endpoint).
    #[inline]
    pub fn point_at(&self, i: i64) -> (i32, i32) {
        self.point_from_offsets(i, self.minor_offset(i))
    }

    #[inline]
    fn point_from_offsets(&self, i: i64, m: i64) -> (i32, i32) {
        let (mj0, mn0) = if self.x_major {
            (self.x1 as i64, self.y1 as i64)
        } else {
            (self.y1 as i64, self.x1 as i64)
        };
        let major = (mj0 + self.major_step * i) as i32;
        let minor = (mn0 + self.minor_step * m) as i32;
        if self.x_major {
            (major, minor)
        } else {
            (minor, major)
        }
    }

    /// Inclusive range of steps whose pixels lie in `clip`, or `None`.
    pub fn clipped_steps(&self, clip: &GRect) -> Option<(i64, i64)> {
        if clip.is_empty() {
            return None;
        }
        let (mj0, mn0, mj_clip, mn_clip) = if self.x_major {
            (
                self.x1 as i64,
                self.y1 as i64,
                (clip.x() as i64, clip.x_max() as i64),
                (clip.y() as i64, clip.y_max() as i64),
            )
        } else {
            (
                self.y1 as i64,
                self.x1 as i64,
                (clip.y() as i64, clip.y_max() as i64),
                (clip.x() as i64, clip.x_max() as i64),
            )
        };

        let (i_lo, i_hi) = offsets_range(mj0, self.major_step, mj_clip);
        let (k_lo, k_hi) = offsets_range(mn0, self.minor_step, mn_clip);

        let mut lo = i_lo.max(0);
        let mut hi = i_hi.min(self.major_delta);
        if k_hi < 0 || k_lo > self.minor_delta || k_lo > k_hi {
            return None;
        }
        if self.minor_delta == 0 {
            // Minor offset is always 0.
            if k_lo > 0 || k_hi < 0 {
                return None;
            }
        } else {
            let two_mn = 2 * self.minor_delta as i128;
            let mj = self.major_delta as i128;
            // minor_offset(i) >= k  <=>  i >= ceil((2k - 1) * major / (2 * minor))
            if k_lo > 0 {
                let first = ceil_div((2 * k_lo as i128 - 1) * mj, two_mn);
                lo = lo.max(first as i64);
            }
            // minor_offset(i) <= k  <=>  i <= ceil((2k + 1) * major / (2 * minor)) - 1
            if k_hi < self.minor_delta {
                let last = ceil_div((2 * k_hi as i128 + 1) * mj, two_mn) - 1;
                hi = hi.min(last as i64);
            }
        }
        if lo > hi {
            None
        } else {
            Some((lo, hi))
        }
    }

    /// Call `f(x, y, i)` for every step in `first..=last`, incrementally.
    pub fn walk<F: FnMut(i32, i32, i64)>(&self, first: i64, last: i64, mut f: F) {
        if first > last {
            return;
        }
        if self.major_delta == 0 {
            let (x, y) = self.point_at(0);
            f(x, y, 0);
            return;
        }
        let two_mj = 2 * self.major_delta;
        let two_mn = 2 * self.minor_delta;
        let num = 2 * first as i128 * self.minor_delta as i128 + self.major_delta as i128;
        let mut m = (num / two_mj as i128) as i64;
        let mut err = (num % two_mj as i128) as i64;
        let mut i = first;
        loop {
            let (x, y) = self.point_from_offsets(i, m);
            f(x, y, i);
            if i == last {
                break;
            }
            i += 1;
            err += two_mn;
            if err >= two_mj {
                err -= two_mj;
                m += 1;
            }
        }
    }
}

/// Offsets `o` (from `start`, moving by `step`) that land in `[lo, hi]`.
#[inline]
fn offsets_range(start: i64, step: i64, (lo, hi): (i64, i64)) -> (i64, i64) {
    if step > 0 {
        (lo - start, hi - start)
    } else {
        (start - hi, start - lo)
    }
}

#[inline]
fn ceil_div(a: i128, b: i128) -> i128 {
    debug_assert!(b > 0);
    -((-a).div_euclid(b))
}

// ============================================================================
// Unclipped walkers (sink defaults)
// ============================================================================

/// Point-by-point horizontal run, every pixel inside the clip.
pub fn draw_horizontal_line_points<S: PixelSink + ?Sized>(
    sink: &mut S,
    x1: i32,
    x2: i32,
    y: i32,
    stipple: LineStipple,
    pixel_num: u32,
) -> u32 {
    let step: i64 = if x2 >= x1 { 1 } else { -1 };
    let count = (x2 as i64 - x1 as i64).unsigned_abs() + 1;
    for k in 0..count {
        if stipple.is_plain() || stipple.must_draw(stipple.pixel_num_at(pixel_num, k)) {
            sink.draw_point_in_clip((x1 as i64 + step * k as i64) as i32, y);
        }
    }
    stipple.advanced(pixel_num, count)
}

/// Point-by-point vertical run, every pixel inside the clip.
pub fn draw_vertical_line_points<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y1: i32,
    y2: i32,
    stipple: LineStipple,
    pixel_num: u32,
) -> u32 {
    let step: i64 = if y2 >= y1 { 1 } else { -1 };
    let count = (y2 as i64 - y1 as i64).unsigned_abs() + 1;
    for k in 0..count {
        if stipple.is_plain() || stipple.must_draw(stipple.pixel_num_at(pixel_num, k)) {
            sink.draw_point_in_clip(x, (y1 as i64 + step * k as i64) as i32);
        }
    }
    stipple.advanced(pixel_num, count)
}

/// Point-by-point Bresenham line, every pixel inside the clip.
#[allow(clippy::too_many_arguments)]
pub fn draw_general_line_points<S: PixelSink + ?Sized>(
    sink: &mut S,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    stipple: LineStipple,
    pixel_num: u32,
) -> u32 {
    let line = BresenhamLine::new(x1, y1, x2, y2);
    let count = line.pixel_count();
    line.walk(0, count as i64 - 1, |x, y, i| {
        if stipple.is_plain() || stipple.must_draw(stipple.pixel_num_at(pixel_num, i as u64)) {
            sink.draw_point_in_clip(x, y);
        }
    });
    stipple.advanced(pixel_num, count)
}

// ============================================================================
// Clipped drawing
// ============================================================================

/// Draw a single pixel if it lies in the clip.
pub fn draw_point<S: PixelSink + ?Sized>(clip: &GRect, x: i32, y: i32, sink: &mut S) {
    if clip.contains(x, y) {
        sink.draw_point_in_clip(x, y);
    }
}

/// Draw a line from `(x1, y1)` to `(x2, y2)`, both endpoints included,
/// dispatching on its orientation.
#[allow(clippy::too_many_arguments)]
pub fn draw_line<S: PixelSink + ?Sized>(
    clip: &GRect,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    stipple: LineStipple,
    pixel_num: u32,
    sink: &mut S,
) -> u32 {
    if x1 == x2 && y1 == y2 {
        if clip.contains(x1, y1) && (stipple.is_plain() || stipple.must_draw(pixel_num)) {
            sink.draw_point_in_clip(x1, y1);
        }
        stipple.advanced(pixel_num, 1)
    } else if y1 == y2 {
        draw_horizontal_line(clip, x1, x2, y1, stipple, pixel_num, sink)
    } else if x1 == x2 {
        draw_vertical_line(clip, x1, y1, y2, stipple, pixel_num, sink)
    } else {
        draw_general_line(clip, x1, y1, x2, y2, stipple, pixel_num, sink)
    }
}

#[allow(clippy::too_many_arguments)]
pub fn draw_horizontal_line<S: PixelSink + ?Sized>(
    clip: &GRect,
    x1: i32,
    x2: i32,
    y: i32,
    stipple: LineStipple,
    pixel_num: u32,
    sink: &mut S,
) -> u32 {
    let count = (x2 as i64 - x1 as i64).unsigned_abs() + 1;
    if let Some((from, to, offset)) = clipped_run(x1, x2, clip.x(), clip.x_max(), clip) {
        if y >= clip.y() && y <= clip.y_max() {
            sink.draw_horizontal_line_in_clip(
                from,
                to,
                y,
                stipple,
                stipple.pixel_num_at(pixel_num, offset),
            );
        }
    }
    stipple.advanced(pixel_num, count)
}

#[allow(clippy::too_many_arguments)]
pub fn draw_vertical_line<S: PixelSink + ?Sized>(
    clip: &GRect,
    x: i32,
    y1: i32,
    y2: i32,
    stipple: LineStipple,
    pixel_num: u32,
    sink: &mut S,
) -> u32 {
    let count = (y2 as i64 - y1 as i64).unsigned_abs() + 1;
    if let Some((from, to, offset)) = clipped_run(y1, y2, clip.y(), clip.y_max(), clip) {
        if x >= clip.x() && x <= clip.x_max() {
            sink.draw_vertical_line_in_clip(
                x,
                from,
                to,
                stipple,
                stipple.pixel_num_at(pixel_num, offset),
            );
        }
    }
    stipple.advanced(pixel_num, count)
}

/// Visible part of the 1-D run `a..=b` inside `[lo, hi]`, as
/// `(from, to, offset_of_from)` preserving the walking direction.
#[inline]
fn clipped_run(a: i32, b: i32, lo: i32, hi: i32, clip: &GRect) -> Option<(i32, i32, u64)> {
    if clip.is_empty() {
        return None;
    }
    let vis_lo = a.min(b).max(lo);
    let vis_hi = a.max(b).min(hi);
    if vis_lo > vis_hi {
        return None;
    }
    if a <= b {
        Some((vis_lo, vis_hi, (vis_lo as i64 - a as i64) as u64))
    } else {
        Some((vis_hi, vis_lo, (a as i64 - vis_hi as i64) as u64))
    }
}

/// Bresenham line for arbitrary slopes.
#[allow(clippy::too_many_arguments)]
pub fn draw_general_line<S: PixelSink + ?Sized>(
    clip: &GRect,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    stipple: LineStipple,
    pixel_num: u32,
    sink: &mut S,
) -> u32 {
    let line = BresenhamLine::new(x1, y1, x2, y2);
    let count = line.pixel_count();
    if clip.contains(x1, y1) && clip.contains(x2, y2) {
        return sink.draw_general_line_in_clip(x1, y1, x2, y2, stipple, pixel_num);
    }
    if let Some((first, last)) = line.clipped_steps(clip) {
        line.walk(first, last, |x, y, i| {
            if stipple.is_plain() || stipple.must_draw(stipple.pixel_num_at(pixel_num, i as u64))
            {
                sink.draw_point_in_clip(x, y);
            }
        });
    }
    stipple.advanced(pixel_num, count)
}

// ============================================================================
// Real-valued clipped line
// ============================================================================

/// Line between real-valued endpoints, which may lie outside the clip.
///
/// Pixels are chosen along the steeper axis: major pixels run from the
/// rounded first endpoint to the rounded second one, and the minor
/// coordinate at each of them is the rounded exact line value. Exact ties
/// are resolved in the direction of travel on each axis, so the set of
/// pixels drawn inside `clip` is the set the unclipped line would have
/// drawn there.
#[allow(clippy::too_many_arguments)]
pub fn draw_general_line_clipped<S: PixelSink + ?Sized>(
    clip: &GRect,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    stipple: LineStipple,
    pixel_num: u32,
    sink: &mut S,
) -> u32 {
    let line = RealLine::new(x1, y1, x2, y2);
    let count = line.pixel_count();
    if let Some((first, last)) = line.clipped_steps(clip) {
        for i in first..=last {
            let (x, y) = line.point_at(i);
            if stipple.is_plain() || stipple.must_draw(stipple.pixel_num_at(pixel_num, i as u64))
            {
                sink.draw_point_in_clip(x, y);
            }
        }
    }
    stipple.advanced(pixel_num, count)
}

/// Pixel model of a real-valued segment, see [`draw_general_line_clipped`].
#[derive(Debug, Clone, Copy)]
struct RealLine {
    x_major: bool,
    /// First and last major pixel.
    major_a: i64,
    major_b: i64,
    major_step: i64,
    /// Exact-line parameters: minor = minor0 + (major - major0) * slope.
    major0: f64,
    minor0: f64,
    slope: f64,
    minor_positive: bool,
}

impl RealLine {
    fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let x_major = dx.abs() >= dy.abs();
        let (mj1, mn1, mj2, d_major, d_minor) = if x_major {
            (x1, y1, x2, dx, dy)
        } else {
            (y1, x1, y2, dy, dx)
        };
        let major_positive = d_major >= 0.0;
        let major_a = round_toward(mj1, major_positive) as i64;
        let major_b = round_toward(mj2, major_positive) as i64;
        Self {
            x_major,
            major_a,
            major_b,
            major_step: if major_b >= major_a { 1 } else { -1 },
            major0: mj1,
            minor0: mn1,
            slope: if d_major == 0.0 { 0.0 } else { d_minor / d_major },
            minor_positive: d_minor >= 0.0,
        }
    }

    fn pixel_count(&self) -> u64 {
        (self.major_b - self.major_a).unsigned_abs() + 1
    }

    #[inline]
    fn major_at(&self, i: i64) -> i64 {
        self.major_a + self.major_step * i
    }

    #[inline]
    fn minor_at(&self, i: i64) -> f64 {
        let v = self.minor0 + (self.major_at(i) as f64 - self.major0) * self.slope;
        round_toward(v, self.minor_positive)
    }

    #[inline]
    fn point_at(&self, i: i64) -> (i32, i32) {
        let major = self.major_at(i) as i32;
        let minor = self.minor_at(i) as i32;
        if self.x_major {
            (major, minor)
        } else {
            (minor, major)
        }
    }

    fn clipped_steps(&self, clip: &GRect) -> Option<(i64, i64)> {
        if clip.is_empty() {
            return None;
        }
        let (mj_lo, mj_hi, mn_lo, mn_hi) = if self.x_major {
            (clip.x() as i64, clip.x_max() as i64, clip.y() as f64, clip.y_max() as f64)
        } else {
            (clip.y() as i64, clip.y_max() as i64, clip.x() as f64, clip.x_max() as f64)
        };
        let (i_lo, i_hi) = offsets_range(self.major_a, self.major_step, (mj_lo, mj_hi));
        let lo = i_lo.max(0);
        let hi = i_hi.min(self.pixel_count() as i64 - 1);
        if lo > hi {
            return None;
        }
        // The minor pixel is monotonic in i: bisect both ends.
        let (first, last) = if self.minor_positive {
            (
                partition_point(lo, hi, |i| self.minor_at(i) < mn_lo),
                partition_point(lo, hi, |i| self.minor_at(i) <= mn_hi) - 1,
            )
        } else {
            (
                partition_point(lo, hi, |i| self.minor_at(i) > mn_hi),
                partition_point(lo, hi, |i| self.minor_at(i) >= mn_lo) - 1,
            )
        };
        if first > last {
            None
        } else {
            Some((first, last))
        }
    }
}

/// First `i` in `lo..=hi` for which `pred` is false (`hi + 1` if none),
/// `pred` being true on a prefix of the range.
fn partition_point<P: Fn(i64) -> bool>(lo: i64, hi: i64, pred: P) -> i64 {
    let mut a = lo;
    let mut b = hi + 1;
    while a < b {
        let mid = a + (b - a) / 2;
        if pred(mid) {
            a = mid + 1;
        } else {
            b = mid;
        }
    }
    a
}

// ============================================================================
// Tests
// ============================================================================
