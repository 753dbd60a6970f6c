//! Cross-module properties of the public drawing surface: clip
//! invariance, no double painting, fill/outline consistency, stipple
//! continuity and agreement between oval tiers.

use std::collections::BTreeSet;

use clip_raster::color::{demultiply_argb, premultiply_argb};
use clip_raster::image_scaler::{ImageSource, ScaledRectDrawer};
use clip_raster::pixel_format::PixelFormatRegistry;
use clip_raster::{GRect, LineStipple, PixelBuffer, RasterConfig, RecordingSink, RendererPrimitives};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> GRect {
    GRect::new(x, y, w, h).unwrap()
}

/// Pixels of `full` that lie in `clip`, in `(y, x)` order.
fn restricted(full: &RecordingSink, clip: &GRect) -> BTreeSet<(i32, i32)> {
    full.pixels()
        .into_iter()
        .filter(|&(y, x)| clip.contains(x, y))
        .collect()
}

fn clips() -> Vec<GRect> {
    vec![
        rect(5, 4, 10, 7),
        rect(-10, -10, 20, 15),
        rect(10, 0, 3, 100),
        rect(0, 8, 100, 1),
        rect(17, 13, 1, 1),
        rect(-50, -50, 200, 200),
    ]
}

/// Draw with `draw` unclipped and under each clip, checking that clipping
/// only removes pixels outside the clip.
fn assert_clip_invariant<F>(what: &str, mut draw: F)
where
    F: FnMut(&GRect, &mut RecordingSink),
{
    let mut full = RecordingSink::new_translucent();
    draw(&GRect::DEFAULT_HUGE, &mut full);
    for clip in clips() {
        let mut clipped = RecordingSink::new_translucent();
        draw(&clip, &mut clipped);
        assert!(clipped.is_within(&clip), "{}: pixel outside {:?}", what, clip);
        assert_eq!(
            clipped.pixels(),
            restricted(&full, &clip),
            "{}: clip {:?} changed the pixel set",
            what,
            clip
        );
    }
}

// ============================================================================
// Clip invariance
// ============================================================================

#[test]
fn test_lines_clip_invariant() {
    init();
    let lines = [
        (0, 0, 37, 11),
        (5, 30, -20, -3),
        (-8, 2, 40, 2),
        (3, -10, 3, 25),
        (0, 0, 20, 20),
        (30, 1, 2, 29),
        (12, 6, 12, 6),
    ];
    let mut r = RendererPrimitives::default();
    for &(x1, y1, x2, y2) in &lines {
        assert_clip_invariant("line", |clip, sink| r.draw_line(clip, x1, y1, x2, y2, sink));
    }
}

#[test]
fn test_stippled_lines_clip_invariant() {
    init();
    let stipple = LineStipple::new(2, 0x0F0F).unwrap();
    let mut r = RendererPrimitives::default();
    for &(x1, y1, x2, y2) in &[(0, 0, 37, 11), (30, 1, 2, 29), (-8, 9, 40, 9)] {
        let mut counters = Vec::new();
        assert_clip_invariant("stippled line", |clip, sink| {
            counters.push(r.draw_line_stipple(clip, x1, y1, x2, y2, stipple, 3, sink));
        });
        // The counter only depends on the line, never on the clip.
        assert!(counters.windows(2).all(|w| w[0] == w[1]));
    }
}

#[test]
fn test_ovals_clip_invariant() {
    init();
    let boxes = [rect(0, 0, 23, 17), rect(-5, -3, 40, 41), rect(2, 2, 8, 3), rect(0, 0, 64, 64)];
    let mut r = RendererPrimitives::default();
    for bbox in &boxes {
        assert_clip_invariant("oval", |clip, sink| r.draw_oval(clip, bbox, sink));
        assert_clip_invariant("filled oval", |clip, sink| r.fill_oval(clip, bbox, sink));
        assert_clip_invariant("arc", |clip, sink| {
            r.draw_arc(clip, bbox, 30.0, 200.0, sink).unwrap()
        });
        assert_clip_invariant("pie", |clip, sink| {
            r.fill_arc(clip, bbox, 300.0, 120.0, sink).unwrap()
        });
    }
}

#[test]
fn test_polygons_clip_invariant() {
    init();
    let shapes: Vec<(Vec<i32>, Vec<i32>)> = vec![
        (vec![2, 30, 14], vec![1, 6, 25]),
        // Concave star.
        (
            vec![15, 18, 28, 20, 24, 15, 6, 10, 2, 12],
            vec![0, 9, 10, 16, 27, 20, 27, 16, 10, 9],
        ),
        // Bowtie.
        (vec![0, 24, 0, 24], vec![0, 18, 18, 0]),
        (vec![-6, 20, 20, 8, 8, -6], vec![-2, -2, 9, 9, 22, 22]),
    ];
    let mut r = RendererPrimitives::default();
    for (xs, ys) in &shapes {
        let n = xs.len();
        assert_clip_invariant("polygon", |clip, sink| {
            r.draw_polygon(clip, xs, ys, n, LineStipple::PLAIN, 0, sink).unwrap();
        });
        assert_clip_invariant("polyline", |clip, sink| {
            r.draw_polyline(clip, xs, ys, n, LineStipple::PLAIN, 0, sink).unwrap();
        });
        assert_clip_invariant("filled polygon", |clip, sink| {
            r.fill_polygon(clip, xs, ys, n, sink).unwrap();
        });
    }
}

// ============================================================================
// No double painting and fill/outline consistency
// ============================================================================

#[test]
fn test_translucent_draws_each_pixel_once() {
    init();
    let clip = GRect::DEFAULT_HUGE;
    let mut r = RendererPrimitives::default();

    let mut sink = RecordingSink::new_translucent();
    r.draw_rect(&clip, &rect(3, 3, 9, 6), &mut sink);
    assert_eq!(sink.max_hits(), 1);
    assert_eq!(sink.pixel_count(), 2 * 9 + 2 * 4);

    let xs = [0, 12, 12, 6, 0];
    let ys = [0, 0, 12, 4, 12];
    let mut outline = RecordingSink::new_translucent();
    r.draw_polygon(&clip, &xs, &ys, 5, LineStipple::PLAIN, 0, &mut outline).unwrap();
    assert_eq!(outline.max_hits(), 1);

    let mut filled = RecordingSink::new_translucent();
    r.fill_polygon(&clip, &xs, &ys, 5, &mut filled).unwrap();
    assert_eq!(filled.max_hits(), 1);

    for bbox in [rect(0, 0, 31, 19), rect(0, 0, 6, 40)] {
        let mut oval = RecordingSink::new_translucent();
        r.draw_oval(&clip, &bbox, &mut oval);
        assert_eq!(oval.max_hits(), 1);
        let mut disk = RecordingSink::new_translucent();
        r.fill_oval(&clip, &bbox, &mut disk);
        assert_eq!(disk.max_hits(), 1);
    }
}

#[test]
fn test_fills_contain_outlines() {
    init();
    let clip = GRect::DEFAULT_HUGE;
    let mut r = RendererPrimitives::default();
    let check = |outline: &RecordingSink, fill: &RecordingSink| {
        assert!(outline.pixel_count() > 0);
        for (y, x) in outline.pixels() {
            assert!(fill.contains(x, y), "outline pixel ({}, {}) not filled", x, y);
        }
    };

    let bbox = rect(-4, 2, 27, 15);
    let (mut o, mut f) = (RecordingSink::new(), RecordingSink::new());
    r.draw_oval(&clip, &bbox, &mut o);
    r.fill_oval(&clip, &bbox, &mut f);
    check(&o, &f);

    let (mut o, mut f) = (RecordingSink::new(), RecordingSink::new());
    r.draw_arc(&clip, &bbox, 45.0, 100.0, &mut o).unwrap();
    r.fill_arc(&clip, &bbox, 45.0, 100.0, &mut f).unwrap();
    check(&o, &f);

    let (mut o, mut f) = (RecordingSink::new(), RecordingSink::new());
    r.draw_rect(&clip, &bbox, &mut o);
    r.fill_rect(&clip, &bbox, &mut f);
    check(&o, &f);

    let xs = [1, 25, 9, 20, 3];
    let ys = [2, 4, 11, 22, 17];
    let (mut o, mut f) = (RecordingSink::new(), RecordingSink::new());
    r.draw_polygon(&clip, &xs, &ys, 5, LineStipple::PLAIN, 0, &mut o).unwrap();
    r.fill_polygon(&clip, &xs, &ys, 5, &mut f).unwrap();
    check(&o, &f);
}

// ============================================================================
// Degenerate figures
// ============================================================================

#[test]
fn test_degenerate_figures_are_lines() {
    init();
    let clip = GRect::DEFAULT_HUGE;
    let mut r = RendererPrimitives::default();

    for bbox in [rect(3, 4, 1, 9), rect(3, 4, 9, 1), rect(3, 4, 1, 1)] {
        let mut line = RecordingSink::new();
        r.draw_line(&clip, bbox.x(), bbox.y(), bbox.x_max(), bbox.y_max(), &mut line);
        let mut reversed = RecordingSink::new();
        r.draw_line(&clip, bbox.x_max(), bbox.y_max(), bbox.x(), bbox.y(), &mut reversed);
        assert_eq!(line.pixels(), reversed.pixels());

        let (mut oval, mut disk, mut frame) =
            (RecordingSink::new(), RecordingSink::new(), RecordingSink::new());
        r.draw_oval(&clip, &bbox, &mut oval);
        r.fill_oval(&clip, &bbox, &mut disk);
        r.draw_rect(&clip, &bbox, &mut frame);
        assert_eq!(oval.pixels(), line.pixels(), "oval {:?}", bbox);
        assert_eq!(disk.pixels(), line.pixels(), "filled oval {:?}", bbox);
        assert_eq!(frame.pixels(), line.pixels(), "rect {:?}", bbox);
    }

    // Polygons with fewer than three points.
    let mut line = RecordingSink::new();
    r.draw_line(&clip, 2, 2, 9, 5, &mut line);
    let mut poly = RecordingSink::new();
    r.fill_polygon(&clip, &[2, 9], &[2, 5], 2, &mut poly).unwrap();
    assert_eq!(poly.pixels(), line.pixels());

    let mut point = RecordingSink::new();
    r.draw_polygon(&clip, &[7], &[1], 1, LineStipple::PLAIN, 0, &mut point).unwrap();
    assert_eq!(point.pixels(), BTreeSet::from([(1, 7)]));

    let mut nothing = RecordingSink::new();
    let n = r.draw_polyline(&clip, &[], &[], 0, LineStipple::PLAIN, 5, &mut nothing).unwrap();
    assert_eq!(n, 5);
    assert_eq!(nothing.pixel_count(), 0);
}

#[test]
fn test_empty_figures_draw_nothing() {
    init();
    let clip = rect(0, 0, 50, 50);
    let empty = rect(10, 10, 0, 7);
    let mut r = RendererPrimitives::default();
    let mut sink = RecordingSink::new();
    r.draw_rect(&clip, &empty, &mut sink);
    r.fill_rect(&clip, &empty, &mut sink);
    r.draw_oval(&clip, &empty, &mut sink);
    r.fill_oval(&clip, &empty, &mut sink);
    r.fill_arc(&clip, &rect(0, 0, 20, 20), 10.0, 0.0, &mut sink).unwrap();
    assert_eq!(sink.pixel_count(), 0);

    // Nothing drawn outside an empty clip either.
    let none = rect(5, 5, 0, 0);
    r.draw_line(&none, 0, 0, 20, 20, &mut sink);
    r.fill_oval(&none, &rect(0, 0, 20, 20), &mut sink);
    assert_eq!(sink.pixel_count(), 0);
}

// ============================================================================
// Stipple continuity
// ============================================================================

#[test]
fn test_stipple_continues_across_segments() {
    init();
    let stipple = LineStipple::new(1, 0xAAAA).unwrap();
    let mut r = RendererPrimitives::default();
    r.set_line_stipple(stipple, 0);
    r.move_to(0, 0);

    let mut sink = RecordingSink::new();
    r.line_to(&GRect::DEFAULT_HUGE, 5, 0, &mut sink);
    assert_eq!(r.pixel_num(), 6);
    r.line_to(&GRect::DEFAULT_HUGE, 10, 0, &mut sink);
    assert_eq!(r.pixel_num(), 12);
    // The joint is counted by both segments: 5 is counter 5 then 6.
    let xs: Vec<i32> = sink.pixels().into_iter().map(|(_, x)| x).collect();
    assert_eq!(xs, vec![1, 3, 5, 6, 8, 10]);
    assert_eq!(sink.hits_at(5, 0), 1);

    // Same chain, clipped: phase and counters are unchanged.
    r.set_line_stipple(stipple, 0);
    r.move_to(0, 0);
    let clip = rect(3, 0, 6, 1);
    let mut clipped = RecordingSink::new();
    r.line_to(&clip, 5, 0, &mut clipped);
    r.line_to(&clip, 10, 0, &mut clipped);
    assert_eq!(r.pixel_num(), 12);
    let xs: Vec<i32> = clipped.pixels().into_iter().map(|(_, x)| x).collect();
    assert_eq!(xs, vec![3, 5, 6, 8]);
}

/// `(x1, y1, x2, y2)` of a line.
type Segment = (i32, i32, i32, i32);

fn draw_stippled(
    r: &mut RendererPrimitives,
    clip: &GRect,
    (x1, y1, x2, y2): Segment,
    stipple: LineStipple,
    pixel_num: u32,
    sink: &mut RecordingSink,
) -> u32 {
    r.draw_line_stipple(clip, x1, y1, x2, y2, stipple, pixel_num, sink)
}

#[test]
fn test_adjacent_segments_match_one_long_line() {
    init();
    // Each pair splits the whole line into two halves of equal length,
    // the second starting one pixel past the end of the first.
    let cases: [(Segment, Segment, Segment); 4] = [
        ((0, 0, 4, 0), (5, 0, 9, 0), (0, 0, 9, 0)),
        ((2, 0, 2, 6), (2, 7, 2, 13), (2, 0, 2, 13)),
        ((9, 9, 5, 5), (4, 4, 0, 0), (9, 9, 0, 0)),
        ((0, 11, 5, 6), (6, 5, 11, 0), (0, 11, 11, 0)),
    ];
    let stipples = [
        LineStipple::new(1, 0xAAAA).unwrap(),
        LineStipple::new(2, 0x0F35).unwrap(),
        LineStipple::new(3, 0x1C7B).unwrap(),
    ];
    let mut r = RendererPrimitives::default();
    for (first, second, whole) in cases {
        for stipple in stipples {
            let mut all_clips = clips();
            all_clips.push(GRect::DEFAULT_HUGE);
            // Cuts between the halves or hides one half entirely.
            all_clips.push(rect(3, 0, 4, 14));
            all_clips.push(rect(6, 0, 20, 20));
            for clip in all_clips {
                let mut chained = RecordingSink::new();
                let mid = draw_stippled(&mut r, &clip, first, stipple, 0, &mut chained);
                let end = draw_stippled(&mut r, &clip, second, stipple, mid, &mut chained);

                let mut single = RecordingSink::new();
                let whole_end = draw_stippled(&mut r, &clip, whole, stipple, 0, &mut single);

                assert_eq!(end, whole_end, "{:?} {:?}", whole, stipple);
                assert_eq!(end, 2 * mid, "{:?} {:?}", whole, stipple);
                assert_eq!(
                    chained.pixels(),
                    single.pixels(),
                    "{:?} {:?} under {:?}",
                    whole,
                    stipple,
                    clip
                );
                assert!(chained.max_hits() <= 1);
            }
        }
    }
}

/// Pixels of a stippled chain of adjacent segments, worked out from the
/// plain pixels: a pixel's counter is its distance along the major axis
/// from the segment start, plus the length of the segments before it.
fn expected_chain(
    r: &mut RendererPrimitives,
    clip: &GRect,
    segments: &[Segment],
    stipple: LineStipple,
) -> BTreeSet<(i32, i32)> {
    let mut expected = BTreeSet::new();
    let mut base = 0u32;
    for &(x1, y1, x2, y2) in segments {
        let mut plain = RecordingSink::new();
        r.draw_line(&GRect::DEFAULT_HUGE, x1, y1, x2, y2, &mut plain);
        let x_major = (x2 - x1).abs() >= (y2 - y1).abs();
        for (y, x) in plain.pixels() {
            let k = if x_major { (x - x1).abs() } else { (y - y1).abs() } as u32;
            if clip.contains(x, y) && stipple.must_draw(base + k) {
                expected.insert((y, x));
            }
        }
        base += (x2 - x1).abs().max((y2 - y1).abs()) as u32 + 1;
    }
    expected
}

#[test]
fn test_adjacent_sloped_segments_continue_counter() {
    init();
    let chains: [[Segment; 2]; 3] = [
        [(0, 0, 7, 3), (8, 4, 15, 6)],
        [(0, 0, 3, 8), (4, 9, 5, 17)],
        [(20, 3, 9, 8), (8, 9, -4, 10)],
    ];
    let stipple = LineStipple::new(2, 0x0F35).unwrap();
    let mut r = RendererPrimitives::default();
    for segments in chains {
        for clip in [GRect::DEFAULT_HUGE, rect(3, 1, 9, 5), rect(9, 0, 20, 20)] {
            let mut sink = RecordingSink::new();
            let mut n = 0;
            for &segment in &segments {
                n = draw_stippled(&mut r, &clip, segment, stipple, n, &mut sink);
            }
            let expected = expected_chain(&mut r, &clip, &segments, stipple);
            assert_eq!(sink.pixels(), expected, "{:?} under {:?}", segments, clip);
        }
    }
}

#[test]
fn test_stipple_follows_direction() {
    init();
    let stipple = LineStipple::new(1, 0xAAAA).unwrap();
    let mut r = RendererPrimitives::default();
    let mut sink = RecordingSink::new();
    let n = r.draw_line_stipple(&GRect::DEFAULT_HUGE, 10, 0, 0, 0, stipple, 0, &mut sink);
    assert_eq!(n, 11);
    let xs: Vec<i32> = sink.pixels().into_iter().map(|(_, x)| x).collect();
    assert_eq!(xs, vec![1, 3, 5, 7, 9]);
}

#[test]
fn test_polygon_stipple_chains_through_vertices() {
    init();
    let stipple = LineStipple::new(1, 0x5555).unwrap();
    let mut r = RendererPrimitives::default();
    let mut sink = RecordingSink::new();
    let xs = [0, 4, 4];
    let ys = [0, 0, 4];
    let n = r
        .draw_polyline(&GRect::DEFAULT_HUGE, &xs, &ys, 3, stipple, 0, &mut sink)
        .unwrap();
    // Two segments of 5 pixels each.
    assert_eq!(n, 10);
    // Second segment starts at counter 5: odd counters are off.
    assert!(sink.contains(0, 0));
    assert!(!sink.contains(1, 0));
    assert!(sink.contains(4, 0));
    assert!(sink.contains(4, 1));
    assert!(!sink.contains(4, 2));
    assert!(sink.contains(4, 3));
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_small_circle_outline() {
    init();
    let bbox = rect(0, 0, 5, 5);
    let mut r = RendererPrimitives::default();
    let mut sink = RecordingSink::new_translucent();
    r.draw_oval(&bbox, &bbox, &mut sink);
    assert_eq!(sink.pixel_count(), 12);
    assert!(!sink.contains(2, 2));
    assert!(!sink.contains(0, 0));
    assert!(!sink.contains(4, 4));
}

#[test]
fn test_square_polygon_fill() {
    init();
    let mut r = RendererPrimitives::default();
    let mut sink = RecordingSink::new_translucent();
    r.fill_polygon(&GRect::DEFAULT_HUGE, &[0, 7, 7, 0], &[0, 0, 7, 7], 4, &mut sink)
        .unwrap();
    assert_eq!(sink.pixel_count(), 64);
    assert_eq!(sink.max_hits(), 1);
    assert!(sink.is_within(&rect(0, 0, 8, 8)));

    let clip = rect(0, 0, 10, 10);
    let mut inner = RecordingSink::new();
    r.fill_polygon(&clip, &[1, 8, 8, 1], &[1, 1, 8, 8], 4, &mut inner).unwrap();
    assert_eq!(inner.pixel_count(), 64);
    assert_eq!(inner.fill_rects(), &[rect(1, 1, 8, 8)]);
}

// ============================================================================
// Oval tiers
// ============================================================================

fn brute_force_config() -> RasterConfig {
    let mut config = RasterConfig::new();
    config.set_huge_span_threshold(0);
    config
}

fn polygon_config() -> RasterConfig {
    let mut config = RasterConfig::new();
    config.set_huge_span_threshold(0).set_brute_force_max_area(0);
    config
}

#[test]
fn test_brute_force_tier_matches_direct() {
    init();
    let bbox = rect(-3, 5, 200, 140);
    let mut direct = RendererPrimitives::default();
    let mut brute = RendererPrimitives::with_config(brute_force_config());
    for clip in [GRect::DEFAULT_HUGE, rect(0, 0, 60, 60), rect(90, 60, 300, 20)] {
        let (mut a, mut b) = (RecordingSink::new(), RecordingSink::new());
        direct.draw_oval(&clip, &bbox, &mut a);
        brute.draw_oval(&clip, &bbox, &mut b);
        assert_eq!(a.pixels(), b.pixels(), "outline under {:?}", clip);

        let (mut a, mut b) = (RecordingSink::new(), RecordingSink::new());
        direct.fill_oval(&clip, &bbox, &mut a);
        brute.fill_oval(&clip, &bbox, &mut b);
        assert_eq!(a.pixels(), b.pixels(), "fill under {:?}", clip);

        let (mut a, mut b) = (RecordingSink::new(), RecordingSink::new());
        direct.draw_arc(&clip, &bbox, 100.0, 250.0, &mut a).unwrap();
        brute.draw_arc(&clip, &bbox, 100.0, 250.0, &mut b).unwrap();
        assert_eq!(a.pixels(), b.pixels(), "arc under {:?}", clip);

        let (mut a, mut b) = (RecordingSink::new(), RecordingSink::new());
        direct.fill_arc(&clip, &bbox, 340.0, 75.0, &mut a).unwrap();
        brute.fill_arc(&clip, &bbox, 340.0, 75.0, &mut b).unwrap();
        assert_eq!(a.pixels(), b.pixels(), "pie under {:?}", clip);
    }
}

#[test]
fn test_polygon_tier_stays_close_to_exact() {
    init();
    // A 100000x60000 oval seen through a window on its left flank, where
    // the boundary crosses row 28100 near x = 100.
    let bbox = rect(0, 0, 100_000, 60_000);
    let clip = rect(0, 28_000, 200, 200);
    let mut exact = RendererPrimitives::default();
    let mut approx = RendererPrimitives::with_config(polygon_config());

    let (mut e, mut a) = (RecordingSink::new(), RecordingSink::new_translucent());
    exact.fill_oval(&clip, &bbox, &mut e);
    approx.fill_oval(&clip, &bbox, &mut a);
    assert!(a.is_within(&clip));
    assert_eq!(a.max_hits(), 1);
    assert!(a.contains(180, 28_100));
    assert!(!a.contains(50, 28_100));
    let diff = e.pixel_count().abs_diff(a.pixel_count());
    assert!(diff <= 200, "{} pixels apart", diff);

    let (mut e, mut a) = (RecordingSink::new(), RecordingSink::new());
    exact.draw_oval(&clip, &bbox, &mut e);
    approx.draw_oval(&clip, &bbox, &mut a);
    assert!(a.is_within(&clip));
    assert!(a.pixel_count() > 0);
    let exact_pixels = e.pixels();
    for (y, x) in a.pixels() {
        let near = (-2..=2).any(|dy| (-2..=2).any(|dx| exact_pixels.contains(&(y + dy, x + dx))));
        assert!(near, "({}, {}) far from the exact outline", x, y);
    }
}

#[test]
fn test_polygon_tier_outline_matches_exact_on_diagonals() {
    init();
    // Windows where the boundary runs at about 45 degrees: the upper-left
    // flank of a circle and the upper-right flank of a wide oval.
    let cases = [
        (rect(0, 0, 100_000, 100_000), rect(14_544, 14_544, 200, 200)),
        (rect(0, 0, 1_000_000, 600_000), rect(853_450, 87_770, 200, 200)),
    ];
    let mut exact = RendererPrimitives::default();
    let mut approx = RendererPrimitives::with_config(polygon_config());
    for (bbox, clip) in cases {
        let (mut e, mut a) = (RecordingSink::new(), RecordingSink::new_translucent());
        exact.draw_oval(&clip, &bbox, &mut e);
        approx.draw_oval(&clip, &bbox, &mut a);
        assert!(e.pixel_count() > 150, "{:?}", clip);
        assert_eq!(a.max_hits(), 1);
        assert_eq!(a.pixels(), e.pixels(), "outline under {:?}", clip);
    }
}

#[test]
fn test_huge_oval_full_range() {
    init();
    // Spans up to the full i32 range stay well-defined.
    let bbox = GRect::DEFAULT_HUGE;
    let clip = rect(-100, -100, 200, 200);
    let mut r = RendererPrimitives::default();
    let mut fill = RecordingSink::new();
    r.fill_oval(&clip, &bbox, &mut fill);
    assert_eq!(fill.pixel_count(), 200 * 200);
    let mut outline = RecordingSink::new();
    r.draw_oval(&clip, &bbox, &mut outline);
    assert_eq!(outline.pixel_count(), 0);
}

// ============================================================================
// Pixel utilities
// ============================================================================

#[test]
fn test_pixel_format_round_trip() {
    init();
    let mut reg = PixelFormatRegistry::new();
    reg.add_format(1, 0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF).unwrap();
    reg.add_format(2, 0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000).unwrap();
    reg.add_format(3, 0, 0xF800, 0x07E0, 0x001F).unwrap();
    for argb in [0u32, 0xFFFF_FFFF, 0x8012_34FE, 0x01AB_CDEF] {
        for id in [1, 2] {
            let pixel = reg.from_argb32(id, argb).unwrap();
            assert_eq!(reg.to_argb32(id, pixel), Ok(argb));
        }
    }
    for pixel in 0..=0xFFFFu32 {
        let argb = reg.to_argb32(3, pixel).unwrap();
        assert_eq!(argb >> 24, 0xFF);
        assert_eq!(reg.from_argb32(3, argb), Ok(pixel));
    }
}

#[test]
fn test_opaque_colors_survive_premultiplication() {
    for argb in [0xFF00_0000u32, 0xFFFF_FFFF, 0xFF12_3456, 0xFF80_7F01] {
        assert_eq!(premultiply_argb(argb), argb);
        assert_eq!(demultiply_argb(premultiply_argb(argb)), argb);
    }
}

#[test]
fn test_scale_into_pixel_buffer() {
    init();
    let src_pixels = [0xFF00_0001u32, 0xFF00_0002, 0xFF00_0003, 0xFF00_0004];
    let src = ImageSource::full(&src_pixels, 2, 2).unwrap();
    let scaler = ScaledRectDrawer::new(src, rect(1, 1, 4, 4));
    let mut buf = PixelBuffer::new(5, 5);
    scaler.draw(&mut buf);
    assert_eq!(buf.pixel(0, 0), Some(0));
    assert_eq!(buf.pixel(1, 1), Some(0xFF00_0001));
    assert_eq!(buf.pixel(2, 2), Some(0xFF00_0001));
    assert_eq!(buf.pixel(3, 2), Some(0xFF00_0002));
    assert_eq!(buf.pixel(4, 4), Some(0xFF00_0004));
}

#[test]
fn test_draw_into_pixel_buffer() {
    init();
    let mut buf = PixelBuffer::new(16, 16);
    buf.set_color(0x80FF_0000);
    let clip = buf.bounds();
    let mut r = RendererPrimitives::default();
    r.draw_polygon(&clip, &[1, 14, 14, 1], &[1, 1, 14, 14], 4, LineStipple::PLAIN, 0, &mut buf)
        .unwrap();
    // One blend per pixel: corners look like edges.
    assert_eq!(buf.pixel(1, 1), buf.pixel(7, 1));
    assert_eq!(buf.pixel(14, 14), buf.pixel(14, 7));
    assert_eq!(buf.pixel(7, 7), Some(0));
}
