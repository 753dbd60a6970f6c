//! Packed ARGB32 colors and alpha arithmetic.
//!
//! Colors travel through the engine as `u32` words laid out `0xAARRGGBB`.
//! Straight (non-premultiplied) and premultiplied words share the layout;
//! which one a word holds is up to the caller. Conversions saturate each
//! color channel to `[0, alpha]` so malformed premultiplied input never
//! overflows on the way back.

pub const BASE_SHIFT: u32 = 8;
pub const BASE_SCALE: u32 = 1 << BASE_SHIFT;
pub const BASE_MASK: u32 = BASE_SCALE - 1;
pub const BASE_MSB: u32 = 1 << (BASE_SHIFT - 1);

pub const OPAQUE_BLACK: u32 = 0xFF00_0000;
pub const OPAQUE_WHITE: u32 = 0xFFFF_FFFF;
pub const TRANSPARENT: u32 = 0;

// ============================================================================
// Channel arithmetic
// ============================================================================

/// `a * b / 255`, rounded to nearest.
#[inline]
pub fn multiply(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + BASE_MSB;
    (((t >> BASE_SHIFT) + t) >> BASE_SHIFT) as u8
}

/// `v * 255 / a`, rounded to nearest, with `v` first saturated to `a`.
/// Zero alpha yields zero.
#[inline]
pub fn demultiply_value(v: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = v.min(a) as u32;
    let a = a as u32;
    ((v * BASE_MASK + a / 2) / a) as u8
}

// ============================================================================
// Packing
// ============================================================================

#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// `(a, r, g, b)` channels of an ARGB word.
#[inline]
pub fn unpack_argb(argb: u32) -> (u8, u8, u8, u8) {
    (
        (argb >> 24) as u8,
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
    )
}

#[inline]
pub fn alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

#[inline]
pub fn is_opaque(argb: u32) -> bool {
    alpha(argb) == BASE_MASK as u8
}

// ============================================================================
// Premultiplication
// ============================================================================

/// Straight ARGB to premultiplied ARGB.
pub fn premultiply_argb(argb: u32) -> u32 {
    let (a, r, g, b) = unpack_argb(argb);
    match a {
        255 => argb,
        0 => TRANSPARENT,
        _ => pack_argb(a, multiply(r, a), multiply(g, a), multiply(b, a)),
    }
}

/// Premultiplied ARGB to straight ARGB. Channels above alpha are
/// saturated to alpha first.
pub fn demultiply_argb(premul: u32) -> u32 {
    let (a, r, g, b) = unpack_argb(premul);
    match a {
        255 => premul,
        0 => TRANSPARENT,
        _ => pack_argb(
            a,
            demultiply_value(r, a),
            demultiply_value(g, a),
            demultiply_value(b, a),
        ),
    }
}

/// Saturate each color channel of a premultiplied word to its alpha.
pub fn saturate_premul(premul: u32) -> u32 {
    let (a, r, g, b) = unpack_argb(premul);
    pack_argb(a, r.min(a), g.min(a), b.min(a))
}

/// Porter-Duff source-over on premultiplied words.
#[inline]
pub fn blend_src_over_premul(dst: u32, src: u32) -> u32 {
    let sa = alpha(src);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;
    let (da, dr, dg, db) = unpack_argb(dst);
    let (_, sr, sg, sb) = unpack_argb(src);
    pack_argb(
        sa.saturating_add(multiply(da, inv)),
        sr.saturating_add(multiply(dr, inv)),
        sg.saturating_add(multiply(dg, inv)),
        sb.saturating_add(multiply(db, inv)),
    )
}

// ============================================================================
// Native-endian RGBA
// ============================================================================

/// ARGB word to `[r, g, b, a]` bytes.
#[inline]
pub fn argb_to_rgba_bytes(argb: u32) -> [u8; 4] {
    let (a, r, g, b) = unpack_argb(argb);
    [r, g, b, a]
}

#[inline]
pub fn rgba_bytes_to_argb(bytes: [u8; 4]) -> u32 {
    pack_argb(bytes[3], bytes[0], bytes[1], bytes[2])
}

/// ARGB word to the word whose in-memory bytes read `r, g, b, a` on this
/// platform.
#[inline]
pub fn argb_to_native_rgba(argb: u32) -> u32 {
    u32::from_ne_bytes(argb_to_rgba_bytes(argb))
}

#[inline]
pub fn native_rgba_to_argb(rgba: u32) -> u32 {
    rgba_bytes_to_argb(rgba.to_ne_bytes())
}

/// Premultiplied ARGB to native RGBA bytes, saturating channels first.
pub fn premul_argb_to_native_rgba(premul: u32) -> u32 {
    argb_to_native_rgba(saturate_premul(premul))
}

// ============================================================================
// Tests
// ============================================================================
