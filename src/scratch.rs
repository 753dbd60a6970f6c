//! Reusable scratch buffers.
//!
//! Drawers borrow a buffer for the duration of one top-level call and hand
//! it back when done. The pool belongs to whoever owns the renderer, so
//! each rendering thread keeps its own and no synchronization is needed.
//! Buffers whose capacity exceeds the reuse cap are dropped on return
//! rather than kept, bounding the memory a pool can retain.

// ============================================================================
// ScratchPool
// ============================================================================

/// Pool of one reusable `Vec<T>`.
#[derive(Debug, Clone)]
pub struct ScratchPool<T> {
    buf: Option<Vec<T>>,
    max_reuse_len: usize,
}

impl<T: Copy + Default> ScratchPool<T> {
    /// Pool keeping returned buffers of at most `max_reuse_len` elements.
    pub fn new(max_reuse_len: usize) -> Self {
        Self {
            buf: None,
            max_reuse_len,
        }
    }

    /// A buffer of exactly `len` elements, all set to `T::default()`.
    pub fn take(&mut self, len: usize) -> Vec<T> {
        let mut buf = if len <= self.max_reuse_len {
            // Round up to 256 elements to reduce regrowth.
            self.buf
                .take()
                .unwrap_or_else(|| Vec::with_capacity(((len + 255) >> 8) << 8))
        } else {
            Vec::with_capacity(len)
        };
        buf.clear();
        buf.resize(len, T::default());
        buf
    }

    /// Return a buffer taken from this pool.
    pub fn give(&mut self, buf: Vec<T>) {
        if buf.capacity() <= self.max_reuse_len.max(256) {
            self.buf = Some(buf);
        }
    }

    /// Capacity currently held for reuse.
    pub fn retained_capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, Vec::capacity)
    }

    pub fn max_reuse_len(&self) -> usize {
        self.max_reuse_len
    }
}

// ============================================================================
// Scratch
// ============================================================================

/// The scratch pools a renderer threads through its drawers: bytes for
/// pixel flags, 64-bit integers for per-row extents.
#[derive(Debug, Clone)]
pub struct Scratch {
    pub bytes: ScratchPool<u8>,
    pub longs: ScratchPool<i64>,
}

impl Scratch {
    /// Pools retaining at most `max_reuse_bytes` bytes each.
    pub fn new(max_reuse_bytes: usize) -> Self {
        Self {
            bytes: ScratchPool::new(max_reuse_bytes),
            longs: ScratchPool::new(max_reuse_bytes / std::mem::size_of::<i64>()),
        }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SCRATCH_MAX_REUSE_CAPACITY)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_is_zeroed() {
        let mut pool = ScratchPool::<u8>::new(1024);
        let mut b = pool.take(10);
        assert_eq!(b.len(), 10);
        b[3] = 7;
        pool.give(b);
        let b = pool.take(20);
        assert!(b.iter().all(|&v| v == 0));
        assert_eq!(b.len(), 20);
    }

    #[test]
    fn test_buffer_is_reused() {
        let mut pool = ScratchPool::<u8>::new(1024);
        let b = pool.take(100);
        let cap = b.capacity();
        assert!(cap >= 256);
        pool.give(b);
        assert_eq!(pool.retained_capacity(), cap);
        let b = pool.take(50);
        assert_eq!(b.capacity(), cap);
    }

    #[test]
    fn test_oversized_buffers_are_not_retained() {
        let mut pool = ScratchPool::<u8>::new(1024);
        let b = pool.take(5000);
        pool.give(b);
        assert_eq!(pool.retained_capacity(), 0);
    }

    #[test]
    fn test_scratch_default() {
        let s = Scratch::default();
        assert_eq!(s.bytes.max_reuse_len(), 1 << 20);
        assert_eq!(s.longs.max_reuse_len(), 1 << 17);
    }
}
