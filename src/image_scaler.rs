//! Nearest-neighbor image scaling.
//!
//! A source rectangle of ARGB32 pixels is stretched onto a destination
//! rectangle one destination row at a time, each row handed to a
//! [`RowDrawer`]. Destination rows are independent, so the work can be
//! cut into row ranges and run on several threads; the source is only
//! ever read.
//!
//! Index mapping along each axis:
//!
//! ```text
//! src = round(((dst + 0.5) * (1 / dst_len)) * src_len - 0.5)
//! ```
//!
//! clamped to `[0, src_len - 1]`.

use std::ops::Range;

use log::trace;

use crate::basics::GRect;
use crate::config::RasterConfig;
use crate::error::{RasterError, Result};

// ============================================================================
// RowDrawer
// ============================================================================

/// Destination of scaled rows.
pub trait RowDrawer {
    /// Draw `pixels[offset..offset + len]` at `(dst_x, dst_y)` and the
    /// following `len - 1` columns.
    fn draw_row(&mut self, pixels: &[u32], offset: usize, dst_x: i32, dst_y: i32, len: usize);
}

impl<D: RowDrawer + ?Sized> RowDrawer for &mut D {
    fn draw_row(&mut self, pixels: &[u32], offset: usize, dst_x: i32, dst_y: i32, len: usize) {
        (**self).draw_row(pixels, offset, dst_x, dst_y, len);
    }
}

// ============================================================================
// ImageSource
// ============================================================================

/// Read-only view of a rectangle of a row-major ARGB32 pixel array.
#[derive(Debug, Clone, Copy)]
pub struct ImageSource<'a> {
    pixels: &'a [u32],
    stride: usize,
    rect: GRect,
}

impl<'a> ImageSource<'a> {
    /// `rect` must lie inside the `stride`-wide array.
    pub fn new(pixels: &'a [u32], stride: usize, rect: GRect) -> Result<Self> {
        if !rect.is_empty() {
            let inside = rect.x() >= 0
                && rect.y() >= 0
                && (rect.x_max() as usize) < stride
                && (rect.y_max() as usize)
                    .checked_mul(stride)
                    .and_then(|v| v.checked_add(rect.x_max() as usize))
                    .map_or(false, |last| last < pixels.len());
            if !inside {
                return Err(RasterError::SourceRectOutOfBounds);
            }
        }
        Ok(Self {
            pixels,
            stride,
            rect,
        })
    }

    /// Whole `width × height` array.
    pub fn full(pixels: &'a [u32], width: usize, height: usize) -> Result<Self> {
        let rect = GRect::new(0, 0, width as i32, height as i32)?;
        Self::new(pixels, width, rect)
    }

    pub fn rect(&self) -> GRect {
        self.rect
    }

    /// The `x_span` source pixels of row `j` of the rectangle.
    #[inline]
    fn row(&self, j: usize) -> &'a [u32] {
        let start = (self.rect.y() as usize + j) * self.stride + self.rect.x() as usize;
        &self.pixels[start..start + self.rect.x_span() as usize]
    }
}

/// Nearest source index for destination index `dst` along an axis.
#[inline]
pub fn source_index(dst: i64, dst_len: i64, src_len: i64) -> i64 {
    if dst_len <= 0 || src_len <= 0 {
        return 0;
    }
    let inv = 1.0 / dst_len as f64;
    let v = (((dst as f64 + 0.5) * inv) * src_len as f64 - 0.5).round() as i64;
    v.clamp(0, src_len - 1)
}

// ============================================================================
// ScaledRectDrawer
// ============================================================================

/// Maps a source rectangle onto a destination rectangle.
#[derive(Debug, Clone)]
pub struct ScaledRectDrawer<'a> {
    src: ImageSource<'a>,
    dst: GRect,
    /// Source column per destination column; `None` without horizontal
    /// scaling, in which case source rows are passed through as-is.
    columns: Option<Vec<usize>>,
}

impl<'a> ScaledRectDrawer<'a> {
    pub fn new(src: ImageSource<'a>, dst: GRect) -> Self {
        let (sx, dx) = (src.rect.x_span() as i64, dst.x_span() as i64);
        let columns = (sx != dx).then(|| {
            (0..dx)
                .map(|i| source_index(i, dx, sx) as usize)
                .collect()
        });
        Self { src, dst, columns }
    }

    pub fn dst(&self) -> GRect {
        self.dst
    }

    /// Draw destination rows `rows`, given relative to the destination
    /// rectangle's top and trimmed to it.
    pub fn draw_rows<D: RowDrawer + ?Sized>(&self, rows: Range<i32>, drawer: &mut D) {
        let (sx, sy) = (self.src.rect.x_span(), self.src.rect.y_span() as i64);
        let (dx, dy) = (self.dst.x_span(), self.dst.y_span() as i64);
        if sx <= 0 || sy <= 0 || dx <= 0 || dy <= 0 {
            return;
        }
        let rows = rows.start.max(0)..rows.end.min(dy as i32);
        let mut scaled: Vec<u32> = Vec::new();
        let mut last_src_row = None;
        for j in rows {
            let src_row = source_index(j as i64, dy, sy) as usize;
            let dst_y = self.dst.y() + j;
            match &self.columns {
                None => {
                    let row = self.src.row(src_row);
                    drawer.draw_row(row, 0, self.dst.x(), dst_y, row.len());
                }
                Some(columns) => {
                    if last_src_row != Some(src_row) {
                        let row = self.src.row(src_row);
                        scaled.clear();
                        scaled.extend(columns.iter().map(|&c| row[c]));
                        last_src_row = Some(src_row);
                    }
                    drawer.draw_row(&scaled, 0, self.dst.x(), dst_y, scaled.len());
                }
            }
        }
    }

    /// Draw every destination row.
    pub fn draw<D: RowDrawer + ?Sized>(&self, drawer: &mut D) {
        self.draw_rows(0..self.dst.y_span(), drawer);
    }

    /// Draw every destination row, splitting them into ranges run on
    /// scoped threads once the destination area exceeds the configured
    /// [`RasterConfig::scaling_split_area_threshold`]. `make_drawer` builds
    /// one drawer per range; the drawers are returned in range order.
    ///
    /// Ranges never overlap, so drawers writing to a shared destination
    /// only need to keep their own rows apart.
    pub fn draw_scaled_parallel<D, F>(
        &self,
        config: &RasterConfig,
        max_workers: usize,
        make_drawer: F,
    ) -> Vec<D>
    where
        D: RowDrawer + Send,
        F: Fn(Range<i32>) -> D + Sync,
    {
        let ranges = split_row_ranges(
            self.dst.y_span(),
            self.dst.x_span(),
            config.scaling_split_area_threshold(),
            max_workers,
        );
        trace!(
            "scaling {}x{} into {} row range(s)",
            self.dst.x_span(),
            self.dst.y_span(),
            ranges.len()
        );
        if ranges.len() <= 1 {
            return ranges
                .into_iter()
                .map(|r| {
                    let mut d = make_drawer(r.clone());
                    self.draw_rows(r, &mut d);
                    d
                })
                .collect();
        }
        std::thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .map(|r| {
                    let make_drawer = &make_drawer;
                    scope.spawn(move || {
                        let mut d = make_drawer(r.clone());
                        self.draw_rows(r, &mut d);
                        d
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }
}

/// Cut `rows` rows of `row_width` pixels into at most `max_parts`
/// contiguous ranges of near-equal height, one range when the area is at
/// most `split_area_threshold`. No range is empty.
pub fn split_row_ranges(
    rows: i32,
    row_width: i32,
    split_area_threshold: u64,
    max_parts: usize,
) -> Vec<Range<i32>> {
    if rows <= 0 {
        return Vec::new();
    }
    let area = rows as u64 * row_width.max(0) as u64;
    if area <= split_area_threshold || max_parts <= 1 {
        return vec![0..rows];
    }
    let wanted = area.div_ceil(split_area_threshold.max(1));
    let parts = wanted.min(max_parts as u64).min(rows as u64) as i32;
    let base = rows / parts;
    let extra = rows % parts;
    let mut ranges = Vec::with_capacity(parts as usize);
    let mut start = 0;
    for k in 0..parts {
        let len = base + (k < extra) as i32;
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Worker count for [`ScaledRectDrawer::draw_scaled_parallel`]: the
/// available parallelism, or 1 if unknown.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects rows as `(dst_x, dst_y, pixels)`.
    #[derive(Default)]
    struct Rows(Vec<(i32, i32, Vec<u32>)>);

    impl RowDrawer for Rows {
        fn draw_row(&mut self, pixels: &[u32], offset: usize, dst_x: i32, dst_y: i32, len: usize) {
            self.0.push((dst_x, dst_y, pixels[offset..offset + len].to_vec()));
        }
    }

    fn source_pixels(w: usize, h: usize) -> Vec<u32> {
        (0..w * h).map(|i| i as u32).collect()
    }

    #[test]
    fn test_source_index() {
        // Identity.
        for i in 0..10 {
            assert_eq!(source_index(i, 10, 10), i);
        }
        // Upscale x2 repeats each pixel.
        let up: Vec<i64> = (0..6).map(|i| source_index(i, 6, 3)).collect();
        assert_eq!(up, vec![0, 0, 1, 1, 2, 2]);
        // Downscale /2.
        let down: Vec<i64> = (0..3).map(|i| source_index(i, 3, 6)).collect();
        assert_eq!(down, vec![1, 3, 5]);
        assert_eq!(source_index(0, 1, 1), 0);
    }

    #[test]
    fn test_source_bounds_checked() {
        let px = source_pixels(4, 4);
        assert!(ImageSource::new(&px, 4, GRect::new(1, 1, 3, 3).unwrap()).is_ok());
        assert_eq!(
            ImageSource::new(&px, 4, GRect::new(2, 0, 3, 1).unwrap()).err(),
            Some(RasterError::SourceRectOutOfBounds)
        );
        assert!(ImageSource::new(&px, 4, GRect::new(0, 3, 4, 2).unwrap()).is_err());
        assert!(ImageSource::new(&px, 4, GRect::new(-1, 0, 1, 1).unwrap()).is_err());
    }

    #[test]
    fn test_unscaled_rows_pass_through() {
        let px = source_pixels(4, 3);
        let src = ImageSource::new(&px, 4, GRect::new(1, 1, 2, 2).unwrap()).unwrap();
        let drawer = ScaledRectDrawer::new(src, GRect::new(10, 20, 2, 2).unwrap());
        let mut rows = Rows::default();
        drawer.draw(&mut rows);
        assert_eq!(
            rows.0,
            vec![(10, 20, vec![5, 6]), (10, 21, vec![9, 10])]
        );
    }

    #[test]
    fn test_upscale() {
        let px = source_pixels(2, 2);
        let src = ImageSource::full(&px, 2, 2).unwrap();
        let drawer = ScaledRectDrawer::new(src, GRect::new(0, 0, 4, 3).unwrap());
        let mut rows = Rows::default();
        drawer.draw(&mut rows);
        let pixels: Vec<Vec<u32>> = rows.0.into_iter().map(|r| r.2).collect();
        assert_eq!(
            pixels,
            vec![vec![0, 0, 1, 1], vec![2, 2, 3, 3], vec![2, 2, 3, 3]]
        );
    }

    #[test]
    fn test_split_row_ranges() {
        assert_eq!(split_row_ranges(10, 10, 1000, 4), vec![0..10]);
        assert_eq!(split_row_ranges(10, 10, 25, 4), vec![0..3, 3..6, 6..8, 8..10]);
        assert_eq!(split_row_ranges(3, 100, 1, 8), vec![0..1, 1..2, 2..3]);
        assert_eq!(split_row_ranges(10, 10, 50, 1), vec![0..10]);
        assert!(split_row_ranges(0, 10, 1, 4).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let px = source_pixels(7, 5);
        let src = ImageSource::full(&px, 7, 5).unwrap();
        let drawer = ScaledRectDrawer::new(src, GRect::new(3, 4, 19, 23).unwrap());

        let mut sequential = Rows::default();
        drawer.draw(&mut sequential);

        let mut config = RasterConfig::new();
        config.set_scaling_split_area_threshold(40);
        let parts = drawer.draw_scaled_parallel(&config, 4, |_| Rows::default());
        assert_eq!(parts.len(), 4);
        let parallel: Vec<_> = parts.into_iter().flat_map(|r| r.0).collect();
        assert_eq!(parallel, sequential.0);
    }

    /// Remembers the row range it was built for.
    struct Band(Range<i32>);

    impl RowDrawer for Band {
        fn draw_row(&mut self, _: &[u32], _: usize, _: i32, _: i32, _: usize) {}
    }

    fn bands(drawer: &ScaledRectDrawer<'_>, config: &RasterConfig) -> Vec<Range<i32>> {
        drawer
            .draw_scaled_parallel(config, 8, Band)
            .into_iter()
            .map(|b| b.0)
            .collect()
    }

    #[test]
    fn test_parallel_split_follows_config() {
        let px = source_pixels(7, 5);
        let src = ImageSource::full(&px, 7, 5).unwrap();
        // 19 x 23 = 437 destination pixels.
        let drawer = ScaledRectDrawer::new(src, GRect::new(0, 0, 19, 23).unwrap());

        assert_eq!(bands(&drawer, &RasterConfig::new()), vec![0..23]);

        let mut config = RasterConfig::new();
        config.set_scaling_split_area_threshold(437);
        assert_eq!(bands(&drawer, &config), vec![0..23]);

        config.set_scaling_split_area_threshold(200);
        assert_eq!(bands(&drawer, &config), vec![0..8, 8..16, 16..23]);
    }
}
