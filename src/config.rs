//! Tunable thresholds and the size-policy seam.
//!
//! The values below are rough performance knobs, not correctness
//! parameters: every tier produces valid output for every figure, the
//! thresholds only decide which one is cheapest. Being off by an order of
//! magnitude costs time, never pixels.

// ============================================================================
// SizePolicy
// ============================================================================

/// Backend-specific decisions about which algorithm tier to use.
///
/// Injected into the renderer so that performance tuning for a given
/// backend never requires touching the algorithms themselves.
pub trait SizePolicy {
    /// True if an oval of the given spans is too large for the direct
    /// midpoint algorithm.
    fn must_use_huge_algorithm(&self, x_span: i32, y_span: i32) -> bool;

    /// True if a huge oval whose visible (clipped) part covers
    /// `clipped_area` pixels is cheaper to classify pixel by pixel than to
    /// approximate with a polygon.
    fn must_use_brute_force(&self, clipped_area: u64) -> bool;

    /// Bounding box area above which must-draw/must-fill checks use the
    /// conservative ellipse test instead of plain box overlap.
    fn accurate_must_draw_area_threshold(&self) -> u64;
}

// ============================================================================
// RasterConfig
// ============================================================================

pub const DEFAULT_HUGE_SPAN_THRESHOLD: i32 = 1 << 14;
pub const DEFAULT_BRUTE_FORCE_MAX_AREA: u64 = 1 << 18;
pub const DEFAULT_ACCURATE_MUST_DRAW_AREA_THRESHOLD: u64 = 1 << 16;
pub const DEFAULT_SCALING_SPLIT_AREA_THRESHOLD: u64 = 1 << 16;
pub const DEFAULT_SCRATCH_MAX_REUSE_CAPACITY: usize = 1 << 20;

/// Default [`SizePolicy`] implementation plus the other tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterConfig {
    huge_span_threshold: i32,
    brute_force_max_area: u64,
    accurate_must_draw_area_threshold: u64,
    scaling_split_area_threshold: u64,
    scratch_max_reuse_capacity: usize,
}

impl RasterConfig {
    pub fn new() -> Self {
        Self {
            huge_span_threshold: DEFAULT_HUGE_SPAN_THRESHOLD,
            brute_force_max_area: DEFAULT_BRUTE_FORCE_MAX_AREA,
            accurate_must_draw_area_threshold: DEFAULT_ACCURATE_MUST_DRAW_AREA_THRESHOLD,
            scaling_split_area_threshold: DEFAULT_SCALING_SPLIT_AREA_THRESHOLD,
            scratch_max_reuse_capacity: DEFAULT_SCRATCH_MAX_REUSE_CAPACITY,
        }
    }

    pub fn huge_span_threshold(&self) -> i32 {
        self.huge_span_threshold
    }

    /// Ovals with a span strictly above this use the huge tiers.
    pub fn set_huge_span_threshold(&mut self, v: i32) -> &mut Self {
        self.huge_span_threshold = v.max(0);
        self
    }

    pub fn brute_force_max_area(&self) -> u64 {
        self.brute_force_max_area
    }

    pub fn set_brute_force_max_area(&mut self, v: u64) -> &mut Self {
        self.brute_force_max_area = v;
        self
    }

    pub fn set_accurate_must_draw_area_threshold(&mut self, v: u64) -> &mut Self {
        self.accurate_must_draw_area_threshold = v;
        self
    }

    pub fn scaling_split_area_threshold(&self) -> u64 {
        self.scaling_split_area_threshold
    }

    pub fn set_scaling_split_area_threshold(&mut self, v: u64) -> &mut Self {
        self.scaling_split_area_threshold = v;
        self
    }

    pub fn scratch_max_reuse_capacity(&self) -> usize {
        self.scratch_max_reuse_capacity
    }

    pub fn set_scratch_max_reuse_capacity(&mut self, v: usize) -> &mut Self {
        self.scratch_max_reuse_capacity = v;
        self
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SizePolicy for RasterConfig {
    fn must_use_huge_algorithm(&self, x_span: i32, y_span: i32) -> bool {
        x_span > self.huge_span_threshold || y_span > self.huge_span_threshold
    }

    fn must_use_brute_force(&self, clipped_area: u64) -> bool {
        clipped_area <= self.brute_force_max_area
    }

    fn accurate_must_draw_area_threshold(&self) -> u64 {
        self.accurate_must_draw_area_threshold
    }
}

// ============================================================================
// Tests
// ============================================================================
