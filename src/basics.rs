//! Foundation types and rounding helpers.
//!
//! Everything the drawers share: the integer clip rectangle [`GRect`],
//! direction-aware rounding and degree to radian conversion.

use crate::error::{RasterError, Result};

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round `v` to the nearest integer, resolving exact half-pixel ties in
/// the direction of travel: up when `toward_positive`, down otherwise.
///
/// Used wherever a real-valued coordinate has to be mapped to a pixel
/// index along a walked path, so that the chosen pixel only depends on
/// the path direction and never on where the path got clipped.
#[inline]
pub fn round_toward(v: f64, toward_positive: bool) -> f64 {
    if toward_positive {
        (v + 0.5).floor()
    } else {
        (v - 0.5).ceil()
    }
}

/// Clamp a 64-bit value into `i32` range.
#[inline]
pub fn clamp_to_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ============================================================================
// Mathematical constants
// ============================================================================

pub const PI: f64 = std::f64::consts::PI;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

// ============================================================================
// GRect
// ============================================================================

/// Axis-aligned integer rectangle defined by its top-left pixel and spans.
///
/// Spans are never negative, and `x + x_span - 1` always fits in `i32`:
/// spans that would overflow are trimmed on construction, because huge
/// figures are a supported case rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GRect {
    x: i32,
    y: i32,
    x_span: i32,
    y_span: i32,
}

impl GRect {
    /// A clip large enough for any realistic drawing, still far from
    /// coordinate overflow.
    pub const DEFAULT_HUGE: GRect = GRect {
        x: i32::MIN >> 1,
        y: i32::MIN >> 1,
        x_span: i32::MAX,
        y_span: i32::MAX,
    };

    pub const DEFAULT_EMPTY: GRect = GRect {
        x: 0,
        y: 0,
        x_span: 0,
        y_span: 0,
    };

    /// Create a rectangle, rejecting negative spans.
    /// Spans reaching past `i32::MAX` are trimmed.
    pub fn new(x: i32, y: i32, x_span: i32, y_span: i32) -> Result<Self> {
        if x_span < 0 || y_span < 0 {
            return Err(RasterError::NegativeSpan { x_span, y_span });
        }
        Ok(Self::new_trimmed(x, y, x_span, y_span))
    }

    /// Create a rectangle, turning negative spans into empty ones and
    /// trimming spans that would overflow.
    pub fn new_trimmed(x: i32, y: i32, x_span: i32, y_span: i32) -> Self {
        Self {
            x,
            y,
            x_span: trimmed_span(x, x_span),
            y_span: trimmed_span(y, y_span),
        }
    }

    /// Rectangle from inclusive corners. Empty if `x_max < x` or `y_max < y`.
    pub fn from_corners(x: i32, y: i32, x_max: i32, y_max: i32) -> Self {
        let x_span = (x_max as i64 - x as i64 + 1).clamp(0, i32::MAX as i64) as i32;
        let y_span = (y_max as i64 - y as i64 + 1).clamp(0, i32::MAX as i64) as i32;
        Self::new_trimmed(x, y, x_span, y_span)
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }
    #[inline]
    pub fn x_span(&self) -> i32 {
        self.x_span
    }
    #[inline]
    pub fn y_span(&self) -> i32 {
        self.y_span
    }

    /// Last column. Only meaningful for non-empty rectangles.
    #[inline]
    pub fn x_max(&self) -> i32 {
        (self.x as i64 + self.x_span as i64 - 1) as i32
    }

    /// Last row. Only meaningful for non-empty rectangles.
    #[inline]
    pub fn y_max(&self) -> i32 {
        (self.y as i64 + self.y_span as i64 - 1) as i32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_span <= 0 || self.y_span <= 0
    }

    /// Number of pixels, computed without overflow.
    #[inline]
    pub fn area(&self) -> u64 {
        self.x_span.max(0) as u64 * self.y_span.max(0) as u64
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.x && x <= self.x_max() && y >= self.y && y <= self.y_max()
    }

    /// True if `other` is non-empty and lies entirely inside `self`.
    pub fn contains_rect(&self, other: &GRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.x_max() <= self.x_max()
            && other.y_max() <= self.y_max()
    }

    /// True if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &GRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.x <= self.x_max()
            && other.x_max() >= self.x
            && other.y <= self.y_max()
            && other.y_max() >= self.y
    }

    /// Intersection of the two rectangles, [`GRect::DEFAULT_EMPTY`] if none.
    pub fn intersected(&self, other: &GRect) -> GRect {
        if !self.overlaps(other) {
            return GRect::DEFAULT_EMPTY;
        }
        GRect::from_corners(
            self.x.max(other.x),
            self.y.max(other.y),
            self.x_max().min(other.x_max()),
            self.y_max().min(other.y_max()),
        )
    }

    /// Intersection with the box of inclusive corners `(x1, y1)` and
    /// `(x2, y2)`. The box may be wider than any `GRect`; the result
    /// always fits since it lies inside `self`.
    pub fn intersected_corners(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> GRect {
        if self.is_empty() {
            return GRect::DEFAULT_EMPTY;
        }
        let a = x1.max(self.x as i64);
        let b = y1.max(self.y as i64);
        let c = x2.min(self.x_max() as i64);
        let d = y2.min(self.y_max() as i64);
        if a > c || b > d {
            return GRect::DEFAULT_EMPTY;
        }
        GRect::from_corners(a as i32, b as i32, c as i32, d as i32)
    }
}

// ============================================================================
// BoxD
// ============================================================================

/// Real-valued box given by its corners, used for reasoning about pixel
/// areas with sub-pixel margins (pixel `(x, y)` covers
/// `[x - 0.5, x + 0.5] x [y - 0.5, y + 0.5]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxD {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoxD {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box spanning the pixel centers of a non-empty rectangle, grown by
    /// `margin` on each side.
    pub fn from_rect_centers(r: &GRect, margin: f64) -> Self {
        Self {
            x1: r.x() as f64 - margin,
            y1: r.y() as f64 - margin,
            x2: r.x_max() as f64 + margin,
            y2: r.y_max() as f64 + margin,
        }
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Corners in clockwise screen order starting top-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x1, self.y1),
            (self.x2, self.y1),
            (self.x2, self.y2),
            (self.x1, self.y2),
        ]
    }
}

/// Largest span not exceeding `span` such that `start + span - 1 <= i32::MAX`.
#[inline]
fn trimmed_span(start: i32, span: i32) -> i32 {
    if span <= 0 {
        return 0;
    }
    let max_span = i32::MAX as i64 - start as i64 + 1;
    (span as i64).min(max_span) as i32
}

// ============================================================================
// Tests
// ============================================================================
