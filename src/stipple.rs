//! Line stipple patterns.
//!
//! A stipple is a 16-bit on/off mask applied along a line's pixels, each
//! bit repeated `factor` times, consumed from bit 0 upward. The position
//! along the pattern is a running pixel counter that callers thread
//! through consecutive segments so dashes stay continuous across joints.

use crate::error::{RasterError, Result};

/// Pattern with every bit set: no stippling at all.
pub const PLAIN_PATTERN: u16 = 0xFFFF;

pub const MIN_FACTOR: u32 = 1;
pub const MAX_FACTOR: u32 = 256;

/// Validated stipple state (factor and pattern). The pixel counter is
/// passed alongside rather than stored, since it changes on every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineStipple {
    factor: u32,
    pattern: u16,
}

impl LineStipple {
    pub const PLAIN: LineStipple = LineStipple {
        factor: 1,
        pattern: PLAIN_PATTERN,
    };

    pub fn new(factor: u32, pattern: u16) -> Result<Self> {
        if !(MIN_FACTOR..=MAX_FACTOR).contains(&factor) {
            return Err(RasterError::InvalidStippleFactor(factor));
        }
        Ok(Self { factor, pattern })
    }

    #[inline]
    pub fn factor(&self) -> u32 {
        self.factor
    }

    #[inline]
    pub fn pattern(&self) -> u16 {
        self.pattern
    }

    /// True if every pixel is painted and the counter can be ignored.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.pattern == PLAIN_PATTERN
    }

    /// True if the pixel at counter position `pixel_num` must be painted.
    #[inline]
    pub fn must_draw(&self, pixel_num: u32) -> bool {
        must_draw(self.factor, self.pattern, pixel_num)
    }

    /// Counter after `count` more pixels. Plain stipples leave the
    /// counter untouched.
    #[inline]
    pub fn advanced(&self, pixel_num: u32, count: u64) -> u32 {
        if self.is_plain() {
            pixel_num
        } else {
            normalize_pixel_num(self.factor, pixel_num as u64 + count)
        }
    }

    /// Counter of the pixel `offset` positions after `pixel_num`.
    #[inline]
    pub fn pixel_num_at(&self, pixel_num: u32, offset: u64) -> u32 {
        normalize_pixel_num(self.factor, pixel_num as u64 + offset)
    }
}

impl Default for LineStipple {
    fn default() -> Self {
        Self::PLAIN
    }
}

/// Bit `(pixel_num / factor) mod 16` of `pattern`.
#[inline]
pub fn must_draw(factor: u32, pattern: u16, pixel_num: u32) -> bool {
    let bit = (pixel_num / factor) & 0xF;
    (pattern >> bit) & 1 != 0
}

/// Wrap a wide counter modulo `factor * 65536`, a multiple of the pattern
/// period, so it fits back in 32 bits without changing the phase.
#[inline]
pub fn normalize_pixel_num(factor: u32, pixel_num: u64) -> u32 {
    (pixel_num % (factor as u64 * 65536)) as u32
}

// ============================================================================
// Tests
// ============================================================================
