//! Segment-versus-box clipping.
//!
//! Cohen-Sutherland outcodes for quick rejection, and the Liang-Barsky
//! parametric clip for the exact visible parameter interval. Used by the
//! fill shortcuts to decide whether any polygon edge or oval chord can
//! touch a clip box at all.

use crate::basics::BoxD;

// ============================================================================
// Clipping flags (Cohen-Sutherland outcodes)
// ============================================================================

pub const CLIPPING_FLAGS_X1_CLIPPED: u32 = 4;
pub const CLIPPING_FLAGS_X2_CLIPPED: u32 = 1;
pub const CLIPPING_FLAGS_Y1_CLIPPED: u32 = 8;
pub const CLIPPING_FLAGS_Y2_CLIPPED: u32 = 2;
pub const CLIPPING_FLAGS_X_CLIPPED: u32 = CLIPPING_FLAGS_X1_CLIPPED | CLIPPING_FLAGS_X2_CLIPPED;
pub const CLIPPING_FLAGS_Y_CLIPPED: u32 = CLIPPING_FLAGS_Y1_CLIPPED | CLIPPING_FLAGS_Y2_CLIPPED;

/// Outcode of point (x, y) against `clip_box`.
///
/// ```text
///        |        |
///  1100  |  1000  | 1001
///        |        |
/// -------+--------+-------- clip_box.y1
///        |        |
///  0100  |  0000  | 0001
///        |        |
/// -------+--------+-------- clip_box.y2
///        |        |
///  0110  |  0010  | 0011
///        |        |
///  clip_box.x1  clip_box.x2
/// ```
#[inline]
pub fn clipping_flags(x: f64, y: f64, clip_box: &BoxD) -> u32 {
    (x > clip_box.x2) as u32
        | (((y > clip_box.y2) as u32) << 1)
        | (((x < clip_box.x1) as u32) << 2)
        | (((y < clip_box.y1) as u32) << 3)
}

// ============================================================================
// Liang-Barsky parametric clipping
// ============================================================================

/// Parameter interval `[t0, t1]` (within `[0, 1]`) of the part of segment
/// (x1,y1)→(x2,y2) lying in `clip_box`, boundary included. `None` if the
/// segment misses the box.
pub fn clip_liang_barsky(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    clip_box: &BoxD,
) -> Option<(f64, f64)> {
    let f1 = clipping_flags(x1, y1, clip_box);
    let f2 = clipping_flags(x2, y2, clip_box);
    if f1 == 0 && f2 == 0 {
        return Some((0.0, 1.0));
    }
    if (f1 & f2) != 0 {
        // Both endpoints beyond the same side.
        return None;
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let checks = [
        (-dx, x1 - clip_box.x1),
        (dx, clip_box.x2 - x1),
        (-dy, y1 - clip_box.y1),
        (dy, clip_box.y2 - y1),
    ];
    for &(p, q) in &checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }
    Some((t0, t1))
}

/// True if segment (x1,y1)→(x2,y2) has at least one point in `clip_box`.
#[inline]
pub fn segment_hits_box(x1: f64, y1: f64, x2: f64, y2: f64, clip_box: &BoxD) -> bool {
    clip_liang_barsky(x1, y1, x2, y2, clip_box).is_some()
}

// ============================================================================
// Tests
// ============================================================================
