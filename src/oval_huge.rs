//! Tiers for ovals whose bounding box is too large to walk.
//!
//! Brute force classifies every visible pixel with the exact oval
//! predicate, so it agrees bit for bit with the direct tier. When even the
//! visible area is too large for that, the oval is approximated by a
//! polygon that is exact only where it can be seen: the arc is sampled
//! finely inside the extended clipped oval box (ecob) and replaced by
//! straight jumps outside of it, then handed to the polygon drawer.
//! Outlines walk the same samples but emit only pixels that pass the exact
//! outline test, so they match the other tiers away from arc ends.

use std::cmp::Ordering;
use std::collections::HashSet;

use log::trace;

use crate::basics::{clamp_to_i32, BoxD, GRect};
use crate::clip_liang_barsky::segment_hits_box;
use crate::line_drawer::draw_line;
use crate::math::{normalize_radians, AngularRange, OvalShape};
use crate::oval_drawer::FigureMode;
use crate::polygon_drawer;
use crate::scratch::ScratchPool;
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

/// Margin added around the visible pixel centers to build the ecob.
/// Above half a pixel, so that rounded jump vertices on its border
/// never land on a visible pixel.
pub const ECOB_MARGIN: f64 = 0.75;

/// Ecob margin for outlines. Each visible outline pixel has a boundary
/// point less than a pixel away, which must be sampled.
pub const OUTLINE_ECOB_MARGIN: f64 = 1.5;

/// Largest angular gap between two consecutive jump vertices.
const MAX_JUMP_ANGLE: f64 = std::f64::consts::FRAC_PI_4;

/// Largest distance, in pixels, between two consecutive arc samples.
const MAX_SAMPLE_DISTANCE: f64 = 0.5;

// ============================================================================
// Brute force
// ============================================================================

/// Exact classification shared by every tier that tests single pixels.
#[inline]
fn is_selected(oval: &OvalShape, range: &AngularRange, mode: FigureMode, px: i64, py: i64) -> bool {
    let on = match mode {
        FigureMode::Fill => oval.contains_pixel(px, py),
        FigureMode::Draw => oval.is_outline_pixel(px, py),
    };
    if !on {
        return false;
    }
    if range.is_full() {
        return true;
    }
    let (u, v) = oval.normalized_direction(px, py);
    range.contains(u, v)
}

/// Classify each pixel of `visible` against the oval and emit the
/// selected ones as horizontal runs.
pub(crate) fn rasterize_brute_force<S: PixelSink + ?Sized>(
    visible: &GRect,
    oval: &OvalShape,
    range: &AngularRange,
    mode: FigureMode,
    sink: &mut S,
) {
    let is_selected = |px: i64, py: i64| is_selected(oval, range, mode, px, py);

    let x1 = visible.x() as i64;
    let x2 = visible.x_max() as i64;
    for py in visible.y()..=visible.y_max() {
        let mut run_start: Option<i64> = None;
        for px in x1..=x2 {
            if is_selected(px, py as i64) {
                if run_start.is_none() {
                    run_start = Some(px);
                }
            } else if let Some(s) = run_start.take() {
                sink.draw_horizontal_line_in_clip(
                    s as i32,
                    (px - 1) as i32,
                    py,
                    LineStipple::PLAIN,
                    0,
                );
            }
        }
        if let Some(s) = run_start {
            sink.draw_horizontal_line_in_clip(s as i32, x2 as i32, py, LineStipple::PLAIN, 0);
        }
    }
}

// ============================================================================
// Waypoints
// ============================================================================

/// What a waypoint marks along the arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointKind {
    /// Arc start.
    Start,
    /// Arc crosses an ecob edge toward the inside.
    Entering,
    /// Ecob corner inside the oval and in range. Not on the arc.
    Corner,
    /// Intermediate arc point bounding the angle of straight jumps.
    Guide,
    /// Arc crosses an ecob edge toward the outside.
    Exiting,
    /// Arc end.
    End,
}

impl WaypointKind {
    /// Order among waypoints at the same angle.
    fn tie_rank(self) -> u8 {
        match self {
            WaypointKind::Start => 0,
            WaypointKind::Entering => 1,
            WaypointKind::Corner => 2,
            WaypointKind::Guide => 3,
            WaypointKind::Exiting => 4,
            WaypointKind::End => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Angle from the arc start, in `[0, span]`.
    pub rel: f64,
    pub kind: WaypointKind,
    pub x: f64,
    pub y: f64,
}

/// Total order on waypoints: by angle from the arc start, then
/// start < entering < corner < guide < exiting < end.
pub fn compare_waypoints(a: &Waypoint, b: &Waypoint) -> Ordering {
    a.rel
        .total_cmp(&b.rel)
        .then_with(|| a.kind.tie_rank().cmp(&b.kind.tie_rank()))
}

/// Parametric oval, angles normalized to a circle, y up.
#[derive(Debug, Clone, Copy)]
struct EllipseParam {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start: f64,
    span: f64,
}

impl EllipseParam {
    fn new(oval: &OvalShape, range: &AngularRange) -> Self {
        let (cx, cy) = oval.center();
        let (rx, ry) = oval.radii();
        let (start, span) = if range.is_full() {
            (0.0, 2.0 * std::f64::consts::PI)
        } else {
            (range.start_rad(), range.span_rad())
        };
        Self {
            cx,
            cy,
            rx,
            ry,
            start,
            span,
        }
    }

    #[inline]
    fn point_at(&self, rel: f64) -> (f64, f64) {
        let (s, c) = (self.start + rel).sin_cos();
        (self.cx + self.rx * c, self.cy - self.ry * s)
    }

    /// Length of the derivative, in pixels per radian.
    #[inline]
    fn speed(&self, rel: f64) -> f64 {
        let (s, c) = (self.start + rel).sin_cos();
        (self.rx * self.rx * s * s + self.ry * self.ry * c * c).sqrt()
    }

    /// Angle from the arc start of the direction of `(x, y)`.
    #[inline]
    fn rel_of(&self, x: f64, y: f64) -> f64 {
        let theta = (-(y - self.cy) / self.ry).atan2((x - self.cx) / self.rx);
        normalize_radians(theta - self.start)
    }

    /// Tangent direction at `rel`, in screen coordinates.
    #[inline]
    fn tangent(&self, rel: f64) -> (f64, f64) {
        let (s, c) = (self.start + rel).sin_cos();
        (-self.rx * s, -self.ry * c)
    }
}

fn collect_waypoints(
    param: &EllipseParam,
    oval: &OvalShape,
    range: &AngularRange,
    ecob: &BoxD,
) -> Vec<Waypoint> {
    let mut wps = Vec::new();
    let (sx, sy) = param.point_at(0.0);
    wps.push(Waypoint {
        rel: 0.0,
        kind: WaypointKind::Start,
        x: sx,
        y: sy,
    });
    let (ex, ey) = param.point_at(param.span);
    wps.push(Waypoint {
        rel: param.span,
        kind: WaypointKind::End,
        x: ex,
        y: ey,
    });

    let mut k = 1.0;
    while k * MAX_JUMP_ANGLE < param.span {
        let rel = k * MAX_JUMP_ANGLE;
        let (x, y) = param.point_at(rel);
        wps.push(Waypoint {
            rel,
            kind: WaypointKind::Guide,
            x,
            y,
        });
        k += 1.0;
    }

    // Oval against each ecob edge: (edge coordinate, vertical?, entering
    // when the tangent component along the edge normal has this sign).
    let edges = [
        (ecob.x1, true, 1.0),
        (ecob.x2, true, -1.0),
        (ecob.y1, false, 1.0),
        (ecob.y2, false, -1.0),
    ];
    for &(c, vertical, inward) in &edges {
        let t = if vertical {
            (c - param.cx) / param.rx
        } else {
            -(c - param.cy) / param.ry
        };
        if t.abs() > 1.0 {
            continue;
        }
        let w = (1.0 - t * t).sqrt();
        for &sign in &[1.0, -1.0] {
            let (x, y) = if vertical {
                (c, param.cy - param.ry * sign * w)
            } else {
                (param.cx + param.rx * sign * w, c)
            };
            let on_edge = if vertical {
                y >= ecob.y1 && y <= ecob.y2
            } else {
                x >= ecob.x1 && x <= ecob.x2
            };
            if !on_edge {
                continue;
            }
            let rel = param.rel_of(x, y);
            if rel > param.span {
                continue;
            }
            let (tx, ty) = param.tangent(rel);
            let normal_component = if vertical { tx } else { ty };
            let kind = if normal_component * inward > 0.0 {
                WaypointKind::Entering
            } else {
                WaypointKind::Exiting
            };
            wps.push(Waypoint { rel, kind, x, y });
        }
    }

    for &(x, y) in &ecob.corners() {
        if !oval.contains_point(x, y) {
            continue;
        }
        let (u, v) = ((x - param.cx) / param.rx, -(y - param.cy) / param.ry);
        if !range.contains(u, v) {
            continue;
        }
        let mut rel = param.rel_of(x, y);
        if rel > param.span {
            // Accepted by the tolerance of the range test: snap to the
            // nearer end.
            rel = if rel - param.span < 2.0 * std::f64::consts::PI - rel {
                param.span
            } else {
                0.0
            };
        }
        wps.push(Waypoint {
            rel,
            kind: WaypointKind::Corner,
            x,
            y,
        });
    }

    wps.sort_by(compare_waypoints);
    wps
}

// ============================================================================
// Path construction
// ============================================================================

/// Polygon approximating the arc, plus the index ranges of the vertices
/// that sample the arc inside the ecob.
#[derive(Debug, Default)]
struct ArcPath {
    vertices: Vec<(f64, f64)>,
    inside_pieces: Vec<(usize, usize)>,
    corner_count: usize,
}

fn build_path(param: &EllipseParam, wps: &[Waypoint], ecob: &BoxD) -> ArcPath {
    let mut path = ArcPath::default();
    let first = match wps.first() {
        Some(w) => *w,
        None => return path,
    };
    assert_eq!(first.kind, WaypointKind::Start, "waypoints must begin with the arc start");
    path.vertices.push((first.x, first.y));

    let mut prev_rel = first.rel;
    let mut pending_corners: Vec<(f64, f64)> = Vec::new();
    for wp in &wps[1..] {
        if wp.kind == WaypointKind::Corner {
            pending_corners.push((wp.x, wp.y));
            continue;
        }
        let (a, b) = (prev_rel, wp.rel);
        debug_assert!(b >= a, "waypoints out of order");
        let inside = b > a && {
            let (mx, my) = param.point_at(0.5 * (a + b));
            ecob.contains(mx, my)
        };
        if inside {
            let piece_start = path.vertices.len() - 1;
            sample_arc(param, a, b, &mut path.vertices);
            path.inside_pieces.push((piece_start, path.vertices.len() - 1));
        } else {
            let jumped = b > a || !pending_corners.is_empty();
            path.corner_count += pending_corners.len();
            path.vertices.append(&mut pending_corners);
            if jumped {
                path.vertices.push((wp.x, wp.y));
            }
        }
        pending_corners.clear();
        prev_rel = b;
    }
    path
}

/// Append samples of the arc over `(a, b]`, consecutive samples at most
/// [`MAX_SAMPLE_DISTANCE`] apart.
fn sample_arc(param: &EllipseParam, a: f64, b: f64, out: &mut Vec<(f64, f64)>) {
    let mut t = a;
    let mut step = MAX_SAMPLE_DISTANCE / param.speed(a).max(f64::MIN_POSITIVE);
    while t < b {
        let speed = param.speed(t).max(param.speed(t + step));
        step = MAX_SAMPLE_DISTANCE / speed.max(f64::MIN_POSITIVE);
        t = (t + step).min(b);
        out.push(param.point_at(t));
    }
}

// ============================================================================
// Polygon tier
// ============================================================================

/// Rasterize a huge oval, arc or pie through its polygon approximation.
#[allow(clippy::too_many_arguments)]
pub(crate) fn rasterize_as_polygon<S: PixelSink + ?Sized>(
    clip: &GRect,
    visible: &GRect,
    oval: &OvalShape,
    range: &AngularRange,
    mode: FigureMode,
    are_hor_ver_flipped: bool,
    flags: &mut ScratchPool<u8>,
    sink: &mut S,
) {
    let margin = match mode {
        FigureMode::Draw => OUTLINE_ECOB_MARGIN,
        FigureMode::Fill => ECOB_MARGIN,
    };
    let ecob = BoxD::from_rect_centers(visible, margin);
    let param = EllipseParam::new(oval, range);
    let wps = collect_waypoints(&param, oval, range, &ecob);
    let path = build_path(&param, &wps, &ecob);
    trace!(
        "polygon oval tier: {} waypoints, {} vertices, {} inside pieces",
        wps.len(),
        path.vertices.len(),
        path.inside_pieces.len()
    );

    match mode {
        FigureMode::Draw => draw_inside_pieces(clip, oval, range, &path, sink),
        FigureMode::Fill => {
            if path.inside_pieces.is_empty() && path.corner_count == 0 {
                // The arc misses the ecob and no ecob corner lies in the
                // figure; only a pie radius can still cross it.
                let radius_hits = |rel: f64| {
                    let (x, y) = param.point_at(rel);
                    segment_hits_box(param.cx, param.cy, x, y, &ecob)
                };
                if range.is_full() || !(radius_hits(0.0) || radius_hits(param.span)) {
                    return;
                }
            }
            let with_center = !range.is_full();
            let n = path.vertices.len() + with_center as usize;
            let mut xs = Vec::with_capacity(n);
            let mut ys = Vec::with_capacity(n);
            if with_center {
                xs.push(to_pixel(param.cx));
                ys.push(to_pixel(param.cy));
            }
            for &(x, y) in &path.vertices {
                xs.push(to_pixel(x));
                ys.push(to_pixel(y));
            }
            polygon_drawer::fill_polygon(clip, &xs, &ys, are_hor_ver_flipped, flags, sink);
        }
    }
}

#[inline]
fn to_pixel(v: f64) -> i32 {
    clamp_to_i32(v.round() as i64)
}

/// Outline of the inside pieces. The samples, snapped to pixel centers,
/// are joined into a pixel chain that stays within a pixel of every
/// visible outline pixel; the chain and its 8 neighbours are tested
/// against the exact outline.
fn draw_inside_pieces<S: PixelSink + ?Sized>(
    clip: &GRect,
    oval: &OvalShape,
    range: &AngularRange,
    path: &ArcPath,
    sink: &mut S,
) {
    let mut snap = OutlineSnapper {
        clip,
        oval,
        range,
        emitted: HashSet::new(),
        inner: sink,
    };
    for &(from, to) in &path.inside_pieces {
        for w in path.vertices[from..=to].windows(2) {
            let (x1, y1) = (to_pixel(w[0].0), to_pixel(w[0].1));
            let (x2, y2) = (to_pixel(w[1].0), to_pixel(w[1].1));
            // Vertices stay within the ecob, so the chain needs no clip.
            draw_line(&GRect::DEFAULT_HUGE, x1, y1, x2, y2, LineStipple::PLAIN, 0, &mut snap);
        }
    }
    trace!("polygon oval tier: {} outline pixels", snap.emitted.len());
}

// ============================================================================
// OutlineSnapper
// ============================================================================

/// Takes the pixels of a chain following the boundary and forwards, once
/// each, those of their 3x3 neighbourhoods that are in the clip and on the
/// exact outline.
struct OutlineSnapper<'a, S: PixelSink + ?Sized> {
    clip: &'a GRect,
    oval: &'a OvalShape,
    range: &'a AngularRange,
    emitted: HashSet<(i32, i32)>,
    inner: &'a mut S,
}

impl<S: PixelSink + ?Sized> PixelSink for OutlineSnapper<'_, S> {
    fn draw_point_in_clip(&mut self, x: i32, y: i32) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (Ok(nx), Ok(ny)) = (i32::try_from(x as i64 + dx), i32::try_from(y as i64 + dy))
                else {
                    continue;
                };
                if !self.clip.contains(nx, ny)
                    || !is_selected(self.oval, self.range, FigureMode::Draw, nx as i64, ny as i64)
                {
                    continue;
                }
                if self.emitted.insert((nx, ny)) {
                    self.inner.draw_point_in_clip(nx, ny);
                }
            }
        }
    }

    fn is_color_opaque(&self) -> bool {
        self.inner.is_color_opaque()
    }
}

// ============================================================================
// Tests
// ============================================================================
