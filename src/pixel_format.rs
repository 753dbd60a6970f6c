//! Mask-based packed pixel formats.
//!
//! A format is four channel masks over a 32-bit word. Formats are
//! registered once under an id and then looked up on every conversion;
//! a registered format never changes.

use std::collections::HashMap;

use crate::color::pack_argb;
use crate::error::{RasterError, Result};

// ============================================================================
// ChannelMask
// ============================================================================

/// One validated channel: a contiguous run of at most 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelMask {
    mask: u32,
    shift: u32,
    width: u32,
}

impl ChannelMask {
    pub fn new(mask: u32) -> Result<Self> {
        if mask == 0 {
            return Ok(Self::default());
        }
        let shift = mask.trailing_zeros();
        let width = 32 - mask.leading_zeros() - shift;
        if width > 8 {
            return Err(RasterError::MaskTooWide(mask));
        }
        if (mask >> shift).count_ones() != width {
            return Err(RasterError::MaskNotContiguous(mask));
        }
        Ok(Self { mask, shift, width })
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Number of bits, 0 for an absent channel.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The channel of `pixel` widened to 8 bits by replicating its high
    /// bits into the low ones, so full scale maps to 0xFF.
    #[inline]
    pub fn extract(&self, pixel: u32) -> u8 {
        if self.width == 0 {
            return 0;
        }
        let mut v = (pixel & self.mask) >> self.shift;
        let mut bits = self.width;
        while bits < 8 {
            v = v << bits | v;
            bits *= 2;
        }
        (v >> (bits - 8)) as u8
    }

    /// Top `width` bits of `v` moved into place.
    #[inline]
    pub fn insert(&self, v: u8) -> u32 {
        if self.width == 0 {
            return 0;
        }
        ((v as u32) >> (8 - self.width)) << self.shift
    }
}

// ============================================================================
// PixelFormat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub a: ChannelMask,
    pub r: ChannelMask,
    pub g: ChannelMask,
    pub b: ChannelMask,
}

impl PixelFormat {
    pub fn new(a_mask: u32, r_mask: u32, g_mask: u32, b_mask: u32) -> Result<Self> {
        let masks = [a_mask, r_mask, g_mask, b_mask];
        for i in 0..masks.len() {
            for j in i + 1..masks.len() {
                if masks[i] & masks[j] != 0 {
                    return Err(RasterError::OverlappingMasks);
                }
            }
        }
        Ok(Self {
            a: ChannelMask::new(a_mask)?,
            r: ChannelMask::new(r_mask)?,
            g: ChannelMask::new(g_mask)?,
            b: ChannelMask::new(b_mask)?,
        })
    }

    pub fn has_alpha(&self) -> bool {
        self.a.width() != 0
    }

    /// Pixel to `0xAARRGGBB`. Formats without alpha are opaque.
    pub fn to_argb32(&self, pixel: u32) -> u32 {
        let a = if self.has_alpha() { self.a.extract(pixel) } else { 0xFF };
        pack_argb(a, self.r.extract(pixel), self.g.extract(pixel), self.b.extract(pixel))
    }

    /// `0xAARRGGBB` to a pixel, truncating each channel to its width.
    pub fn from_argb32(&self, argb: u32) -> u32 {
        self.a.insert((argb >> 24) as u8)
            | self.r.insert((argb >> 16) as u8)
            | self.g.insert((argb >> 8) as u8)
            | self.b.insert(argb as u8)
    }
}

// ============================================================================
// PixelFormatRegistry
// ============================================================================

/// Formats by id.
#[derive(Debug, Clone, Default)]
pub struct PixelFormatRegistry {
    formats: HashMap<u32, PixelFormat>,
}

impl PixelFormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a format. Ids can't be reused.
    pub fn add_format(
        &mut self,
        id: u32,
        a_mask: u32,
        r_mask: u32,
        g_mask: u32,
        b_mask: u32,
    ) -> Result<()> {
        if self.formats.contains_key(&id) {
            return Err(RasterError::DuplicatePixelFormat(id));
        }
        let format = PixelFormat::new(a_mask, r_mask, g_mask, b_mask)?;
        self.formats.insert(id, format);
        Ok(())
    }

    pub fn format(&self, id: u32) -> Result<&PixelFormat> {
        self.formats
            .get(&id)
            .ok_or(RasterError::UnknownPixelFormat(id))
    }

    pub fn to_argb32(&self, id: u32, pixel: u32) -> Result<u32> {
        Ok(self.format(id)?.to_argb32(pixel))
    }

    pub fn from_argb32(&self, id: u32, argb: u32) -> Result<u32> {
        Ok(self.format(id)?.from_argb32(argb))
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
