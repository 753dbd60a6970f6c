//! Geometric and angular utilities.
//!
//! Distances, angle normalization, orientation tests, angular-range
//! containment, exact point-in-oval predicates, segment intersection and
//! the "must this figure be drawn at all" pre-checks shared by the
//! drawers. No state.

use crate::basics::{deg2rad, GRect};
use crate::error::{RasterError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Relative tolerance of angular tests, biased toward "in range" so that
/// pixels exactly on an arc boundary are never dropped.
pub const ANGLE_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Distances and angles
// ============================================================================

/// Euclidean length of segment (x1,y1)→(x2,y2).
#[inline]
pub fn calc_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

/// Angle in radians brought into `[0, 2π)`.
#[inline]
pub fn normalize_radians(rad: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let r = rad.rem_euclid(two_pi);
    // rem_euclid can round up to the modulus itself.
    if r >= two_pi {
        0.0
    } else {
        r
    }
}

/// Z component of `a × b`. Positive when `b` is counter-clockwise of `a`
/// in a y-up frame.
#[inline]
pub fn cross(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// True if `b` is strictly clockwise of `a` (y-up frame).
#[inline]
pub fn is_clockwise(ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    cross(ax, ay, bx, by) < 0.0
}

/// True if `b` is strictly counter-clockwise of `a` (y-up frame).
#[inline]
pub fn is_counter_clockwise(ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    cross(ax, ay, bx, by) > 0.0
}

// ============================================================================
// AngularRange
// ============================================================================

/// Arc angular range, `start` and `span` in degrees, positive angles
/// counter-clockwise in a y-up frame.
///
/// Containment is tested on direction vectors, not on computed angles:
/// for a span up to 180 degrees a point must be counter-clockwise of the
/// start vector and clockwise of the end vector, beyond 180 degrees either
/// condition is enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularRange {
    start_deg: f64,
    span_deg: f64,
    start: (f64, f64),
    end: (f64, f64),
}

impl AngularRange {
    /// The whole turn.
    pub const FULL: AngularRange = AngularRange {
        start_deg: 0.0,
        span_deg: 360.0,
        start: (1.0, 0.0),
        end: (1.0, 0.0),
    };

    /// Validate and build a range: `start_deg` in `[0, 360)`, `span_deg`
    /// in `[0, 360]`. A span of 360 is the whole turn.
    pub fn new(start_deg: f64, span_deg: f64) -> Result<Self> {
        if !start_deg.is_finite() {
            return Err(RasterError::NonFiniteAngle {
                name: "start",
                value: start_deg,
            });
        }
        if !span_deg.is_finite() {
            return Err(RasterError::NonFiniteAngle {
                name: "span",
                value: span_deg,
            });
        }
        if !(0.0..360.0).contains(&start_deg) {
            return Err(RasterError::StartAngleOutOfRange(start_deg));
        }
        if !(0.0..=360.0).contains(&span_deg) {
            return Err(RasterError::AngularSpanOutOfRange(span_deg));
        }
        if span_deg == 360.0 {
            return Ok(Self::FULL);
        }
        let (s0, c0) = deg2rad(start_deg).sin_cos();
        let (s1, c1) = deg2rad(start_deg + span_deg).sin_cos();
        Ok(Self {
            start_deg,
            span_deg,
            start: (c0, s0),
            end: (c1, s1),
        })
    }

    #[inline]
    pub fn start_deg(&self) -> f64 {
        self.start_deg
    }

    #[inline]
    pub fn span_deg(&self) -> f64 {
        self.span_deg
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.span_deg >= 360.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span_deg == 0.0
    }

    /// Start angle in radians.
    #[inline]
    pub fn start_rad(&self) -> f64 {
        deg2rad(self.start_deg)
    }

    /// Span in radians.
    #[inline]
    pub fn span_rad(&self) -> f64 {
        deg2rad(self.span_deg)
    }

    /// True if the direction `(u, v)` lies in the range. The origin is
    /// always in range.
    pub fn contains(&self, u: f64, v: f64) -> bool {
        if self.is_full() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        if u == 0.0 && v == 0.0 {
            return true;
        }
        let tol = ANGLE_TOLERANCE * (u.abs() + v.abs());
        let after_start = cross(self.start.0, self.start.1, u, v) >= -tol;
        let before_end = cross(self.end.0, self.end.1, u, v) <= tol;
        if self.span_deg <= 180.0 {
            after_start && before_end
        } else {
            after_start || before_end
        }
    }
}

// ============================================================================
// Oval geometry
// ============================================================================

/// Oval inscribed in the edges of a bounding box, evaluated exactly.
///
/// Pixel `(px, py)` maps to the doubled offsets
/// `X = 2 (px - x) - (x_span - 1)`, `Y = 2 (py - y) - (y_span - 1)` from
/// the (possibly half-pixel) center, and belongs to the oval when
/// `X² y_span² + Y² x_span² <= x_span² y_span²`. The outline is the set of
/// oval pixels with at least one 4-neighbour outside the oval, so outline
/// and fill always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvalShape {
    x: i64,
    y: i64,
    x_span: i64,
    y_span: i64,
    xs2: i128,
    ys2: i128,
    rhs: i128,
}

impl OvalShape {
    /// Oval of a non-empty bounding box.
    pub fn new(bbox: &GRect) -> Self {
        let x_span = bbox.x_span() as i64;
        let y_span = bbox.y_span() as i64;
        let xs2 = x_span as i128 * x_span as i128;
        let ys2 = y_span as i128 * y_span as i128;
        Self {
            x: bbox.x() as i64,
            y: bbox.y() as i64,
            x_span,
            y_span,
            xs2,
            ys2,
            rhs: xs2 * ys2,
        }
    }

    #[inline]
    pub fn x_span(&self) -> i64 {
        self.x_span
    }

    #[inline]
    pub fn y_span(&self) -> i64 {
        self.y_span
    }

    /// Real-valued center.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + (self.x_span - 1) as f64 * 0.5,
            self.y as f64 + (self.y_span - 1) as f64 * 0.5,
        )
    }

    /// Semi-axes, reaching the bounding box edges.
    #[inline]
    pub fn radii(&self) -> (f64, f64) {
        (self.x_span as f64 * 0.5, self.y_span as f64 * 0.5)
    }

    #[inline]
    pub fn doubled_x(&self, px: i64) -> i64 {
        2 * (px - self.x) - (self.x_span - 1)
    }

    #[inline]
    pub fn doubled_y(&self, py: i64) -> i64 {
        2 * (py - self.y) - (self.y_span - 1)
    }

    /// Inverse of [`OvalShape::doubled_x`], `dx` having the right parity.
    #[inline]
    pub fn pixel_x(&self, dx: i64) -> i64 {
        (dx + self.x_span - 1) / 2 + self.x
    }

    #[inline]
    pub fn pixel_y(&self, dy: i64) -> i64 {
        (dy + self.y_span - 1) / 2 + self.y
    }

    /// Exact test on doubled offsets.
    #[inline]
    pub fn contains_doubled(&self, dx: i64, dy: i64) -> bool {
        let dx = dx as i128;
        let dy = dy as i128;
        dx * dx * self.ys2 + dy * dy * self.xs2 <= self.rhs
    }

    /// True if the pixel belongs to the filled oval.
    #[inline]
    pub fn contains_pixel(&self, px: i64, py: i64) -> bool {
        self.contains_doubled(self.doubled_x(px), self.doubled_y(py))
    }

    /// True if the pixel belongs to the oval outline.
    pub fn is_outline_pixel(&self, px: i64, py: i64) -> bool {
        let dx = self.doubled_x(px);
        let dy = self.doubled_y(py);
        self.contains_doubled(dx, dy)
            && (!self.contains_doubled(dx - 2, dy)
                || !self.contains_doubled(dx + 2, dy)
                || !self.contains_doubled(dx, dy - 2)
                || !self.contains_doubled(dx, dy + 2))
    }

    /// Direction of the pixel from the center with the oval normalized to
    /// a circle, y pointing up. Feed this to [`AngularRange::contains`].
    #[inline]
    pub fn normalized_direction(&self, px: i64, py: i64) -> (f64, f64) {
        (
            self.doubled_x(px) as f64 / self.x_span as f64,
            -(self.doubled_y(py) as f64) / self.y_span as f64,
        )
    }

    /// Real-valued point-in-oval test.
    #[inline]
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        let (cx, cy) = self.center();
        let (rx, ry) = self.radii();
        let u = (px - cx) / rx;
        let v = (py - cy) / ry;
        u * u + v * v <= 1.0
    }
}

// ============================================================================
// Segment intersection
// ============================================================================

/// Exact sign of `(b - a) × (c - a)`.
#[inline]
fn orientation(a: (i64, i64), b: (i64, i64), c: (i64, i64)) -> i32 {
    let v = (b.0 - a.0) as i128 * (c.1 - a.1) as i128 - (b.1 - a.1) as i128 * (c.0 - a.0) as i128;
    v.signum() as i32
}

#[inline]
fn on_segment(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

/// True if segments `a1-a2` and `b1-b2` share at least one point,
/// touching and collinear overlap included. Exact on integer coordinates.
pub fn segments_intersect(a1: (i64, i64), a2: (i64, i64), b1: (i64, i64), b2: (i64, i64)) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment(b1, b2, a1))
        || (d2 == 0 && on_segment(b1, b2, a2))
        || (d3 == 0 && on_segment(a1, a2, b1))
        || (d4 == 0 && on_segment(a1, a2, b2))
}

// ============================================================================
// Figure pre-checks
// ============================================================================

/// Squared normalized distances (nearest, farthest) from the oval center
/// to the pixel-center box of `area` grown by `margin` pixels.
fn normalized_box_distances(oval: &OvalShape, area: &GRect, margin: f64) -> (f64, f64) {
    let (cx, cy) = oval.center();
    let (rx, ry) = oval.radii();
    let u1 = (area.x() as f64 - margin - cx) / rx;
    let u2 = (area.x_max() as f64 + margin - cx) / rx;
    let v1 = (area.y() as f64 - margin - cy) / ry;
    let v2 = (area.y_max() as f64 + margin - cy) / ry;
    let near_u = 0.0_f64.clamp(u1, u2);
    let near_v = 0.0_f64.clamp(v1, v2);
    let far_u = u1.abs().max(u2.abs());
    let far_v = v1.abs().max(v2.abs());
    (near_u * near_u + near_v * near_v, far_u * far_u + far_v * far_v)
}

/// True if filling the oval of `bbox` may paint something in `clip`.
///
/// Below `accurate_area_threshold` this is plain overlap. Above it, the
/// ellipse equation is checked against the clipped box grown by a pixel,
/// so the answer may be a false positive but never a false negative.
pub fn must_fill_figure(clip: &GRect, bbox: &GRect, accurate_area_threshold: u64) -> bool {
    if !clip.overlaps(bbox) {
        return false;
    }
    if bbox.area() <= accurate_area_threshold {
        return true;
    }
    let area = clip.intersected(bbox);
    let oval = OvalShape::new(bbox);
    let (near, _) = normalized_box_distances(&oval, &area, 1.0);
    near <= 1.0 + ANGLE_TOLERANCE
}

/// True if drawing the outline of the oval of `bbox` may paint something
/// in `clip`. Also rejects clips lying deep inside the oval.
pub fn must_draw_figure(clip: &GRect, bbox: &GRect, accurate_area_threshold: u64) -> bool {
    if !must_fill_figure(clip, bbox, accurate_area_threshold) {
        return false;
    }
    if bbox.area() <= accurate_area_threshold {
        return true;
    }
    let area = clip.intersected(bbox);
    let oval = OvalShape::new(bbox);
    let (_, far) = normalized_box_distances(&oval, &area, 1.5);
    far >= 1.0 - ANGLE_TOLERANCE
}

// ============================================================================
// Tests
// ============================================================================
