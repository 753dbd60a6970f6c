//! Rectangle outline and fill.

use crate::basics::GRect;
use crate::line_drawer::{draw_horizontal_line, draw_vertical_line};
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

/// Draw the 1-pixel outline of `rect`.
///
/// The four sides are laid out as a pinwheel, each one stopping a pixel
/// before the next corner, so no corner is emitted twice.
pub fn draw_rect<S: PixelSink + ?Sized>(clip: &GRect, rect: &GRect, sink: &mut S) {
    if rect.is_empty() || !clip.overlaps(rect) {
        return;
    }
    let (x1, y1, x2, y2) = (rect.x(), rect.y(), rect.x_max(), rect.y_max());
    let plain = LineStipple::PLAIN;
    if x1 == x2 {
        draw_vertical_line(clip, x1, y1, y2, plain, 0, sink);
        return;
    }
    if y1 == y2 {
        draw_horizontal_line(clip, x1, x2, y1, plain, 0, sink);
        return;
    }
    // Skip sides that can't reach the clip.
    let inner = GRect::from_corners(x1 + 1, y1 + 1, x2 - 1, y2 - 1);
    if !inner.is_empty() && inner.contains_rect(clip) {
        return;
    }
    draw_horizontal_line(clip, x1, x2 - 1, y1, plain, 0, sink);
    draw_vertical_line(clip, x2, y1, y2 - 1, plain, 0, sink);
    draw_horizontal_line(clip, x2, x1 + 1, y2, plain, 0, sink);
    draw_vertical_line(clip, x1, y2, y1 + 1, plain, 0, sink);
}

/// Fill `rect` with a single `fill_rect_in_clip` call on its visible part.
pub fn fill_rect<S: PixelSink + ?Sized>(
    clip: &GRect,
    rect: &GRect,
    are_hor_ver_flipped: bool,
    sink: &mut S,
) {
    let visible = clip.intersected(rect);
    if visible.is_empty() {
        return;
    }
    sink.fill_rect_in_clip(
        visible.x(),
        visible.y(),
        visible.x_span(),
        visible.y_span(),
        are_hor_ver_flipped,
    );
}

// ============================================================================
// Tests
// ============================================================================
