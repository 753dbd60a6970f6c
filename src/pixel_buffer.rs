//! Owned ARGB32 framebuffer.
//!
//! Pixels are stored premultiplied, one `u32` per pixel, rows packed
//! without padding. The current color is copied when opaque and blended
//! source-over otherwise, which is why the drawers' no-double-paint
//! guarantee matters here.

use crate::basics::GRect;
use crate::color::{
    blend_src_over_premul, demultiply_argb, is_opaque, premultiply_argb, TRANSPARENT,
};
use crate::image_scaler::RowDrawer;
use crate::sink::PixelSink;
use crate::stipple::LineStipple;

// ============================================================================
// PixelBuffer
// ============================================================================

#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    /// Current color, premultiplied.
    color: u32,
}

impl PixelBuffer {
    /// Transparent buffer with an opaque black current color.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width as usize * height as usize],
            color: premultiply_argb(crate::color::OPAQUE_BLACK),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole buffer as a clip rectangle.
    pub fn bounds(&self) -> GRect {
        GRect::new_trimmed(0, 0, self.width as i32, self.height as i32)
    }

    /// Set the current color from straight ARGB.
    pub fn set_color(&mut self, argb: u32) {
        self.color = premultiply_argb(argb);
    }

    /// Current color as straight ARGB.
    pub fn color(&self) -> u32 {
        demultiply_argb(self.color)
    }

    /// Fill the whole buffer with straight ARGB `argb`, ignoring the
    /// current color.
    pub fn clear(&mut self, argb: u32) {
        self.pixels.fill(premultiply_argb(argb));
    }

    /// Premultiplied pixel at `(x, y)`, `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Straight ARGB pixel at `(x, y)`, `None` outside the buffer.
    pub fn pixel_argb(&self, x: i32, y: i32) -> Option<u32> {
        self.pixel(x, y).map(demultiply_argb)
    }

    /// Premultiplied pixels, row after row.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Index of `(x, y)`, which the sink contract places inside the clip
    /// and so inside the buffer.
    #[inline]
    fn index_in_clip(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.index(x, y).is_some());
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    fn paint(dst: &mut u32, color: u32) {
        *dst = if is_opaque(color) {
            color
        } else {
            blend_src_over_premul(*dst, color)
        };
    }
}

impl PixelSink for PixelBuffer {
    #[inline]
    fn draw_point_in_clip(&mut self, x: i32, y: i32) {
        let i = self.index_in_clip(x, y);
        Self::paint(&mut self.pixels[i], self.color);
    }

    fn draw_horizontal_line_in_clip(
        &mut self,
        x1: i32,
        x2: i32,
        y: i32,
        stipple: LineStipple,
        pixel_num: u32,
    ) -> u32 {
        if !stipple.is_plain() {
            return crate::line_drawer::draw_horizontal_line_points(
                self, x1, x2, y, stipple, pixel_num,
            );
        }
        let (a, b) = (x1.min(x2), x1.max(x2));
        let start = self.index_in_clip(a, y);
        let end = self.index_in_clip(b, y);
        let color = self.color;
        if is_opaque(color) {
            self.pixels[start..=end].fill(color);
        } else {
            for p in &mut self.pixels[start..=end] {
                Self::paint(p, color);
            }
        }
        pixel_num
    }

    fn fill_rect_in_clip(
        &mut self,
        x: i32,
        y: i32,
        x_span: i32,
        y_span: i32,
        _are_hor_ver_flipped: bool,
    ) {
        // Rows are contiguous here, so the flip hint doesn't help.
        for j in y..y + y_span.max(0) {
            if x_span > 0 {
                self.draw_horizontal_line_in_clip(x, x + x_span - 1, j, LineStipple::PLAIN, 0);
            }
        }
    }

    fn is_color_opaque(&self) -> bool {
        is_opaque(self.color)
    }
}

impl RowDrawer for PixelBuffer {
    /// Copy premultiplied pixels, dropping whatever falls outside the
    /// buffer.
    fn draw_row(&mut self, pixels: &[u32], offset: usize, dst_x: i32, dst_y: i32, len: usize) {
        if dst_y < 0 || dst_y as u32 >= self.height {
            return;
        }
        let x1 = dst_x as i64;
        let x2 = x1 + len as i64;
        let from = x1.max(0);
        let to = x2.min(self.width as i64);
        if from >= to {
            return;
        }
        let src_start = offset + (from - x1) as usize;
        let n = (to - from) as usize;
        let dst_start = dst_y as usize * self.width as usize + from as usize;
        self.pixels[dst_start..dst_start + n].copy_from_slice(&pixels[src_start..src_start + n]);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{OPAQUE_BLACK, OPAQUE_WHITE};

    #[test]
    fn test_new_is_transparent() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.pixels().len(), 12);
        assert!(buf.pixels().iter().all(|&p| p == TRANSPARENT));
        assert_eq!(buf.bounds(), GRect::new(0, 0, 4, 3).unwrap());
        assert_eq!(buf.pixel(4, 0), None);
        assert_eq!(buf.color(), OPAQUE_BLACK);
    }

    #[test]
    fn test_opaque_copy() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set_color(0xFF10_2030);
        assert!(buf.is_color_opaque());
        buf.draw_point_in_clip(1, 2);
        buf.draw_point_in_clip(1, 2);
        assert_eq!(buf.pixel(1, 2), Some(0xFF10_2030));
        buf.draw_horizontal_line_in_clip(3, 0, 0, LineStipple::PLAIN, 0);
        assert!((0..4).all(|x| buf.pixel(x, 0) == Some(0xFF10_2030)));
    }

    #[test]
    fn test_translucent_blend_accumulates() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.clear(OPAQUE_BLACK);
        buf.set_color(0x80FF_FFFF);
        assert!(!buf.is_color_opaque());
        buf.draw_point_in_clip(0, 0);
        let once = buf.pixel(0, 0).unwrap();
        buf.draw_point_in_clip(0, 0);
        let twice = buf.pixel(0, 0).unwrap();
        assert!(twice & 0xFF > once & 0xFF);
        assert_eq!(once >> 24, 0xFF);
    }

    #[test]
    fn test_fill_rect() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.set_color(OPAQUE_WHITE);
        buf.fill_rect_in_clip(1, 1, 3, 2, true);
        let count = buf.pixels().iter().filter(|&&p| p == OPAQUE_WHITE).count();
        assert_eq!(count, 6);
        assert_eq!(buf.pixel(3, 2), Some(OPAQUE_WHITE));
        assert_eq!(buf.pixel(3, 3), Some(TRANSPARENT));
    }

    #[test]
    fn test_stippled_run() {
        let mut buf = PixelBuffer::new(8, 1);
        buf.set_color(OPAQUE_WHITE);
        let stipple = LineStipple::new(1, 0x5555).unwrap();
        let n = buf.draw_horizontal_line_in_clip(0, 7, 0, stipple, 0);
        assert_eq!(n, 8);
        let drawn: Vec<bool> = (0..8).map(|x| buf.pixel(x, 0) == Some(OPAQUE_WHITE)).collect();
        assert_eq!(drawn, vec![true, false, true, false, true, false, true, false]);
    }

    #[test]
    fn test_row_drawer_clips() {
        let mut buf = PixelBuffer::new(3, 2);
        buf.draw_row(&[9, 1, 2, 3, 4], 1, -1, 1, 4);
        assert_eq!(&buf.pixels()[3..], &[2, 3, 4]);
        buf.draw_row(&[7, 7], 0, 0, 5, 2);
        assert_eq!(&buf.pixels()[..3], &[0, 0, 0]);
    }
}
