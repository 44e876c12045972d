//! Scratch buffer pool for reading frame headers.
//!
//! Every frame read needs a 9-byte scratch buffer for its header. The pool
//! keeps a small free list of those buffers so a busy connection does not
//! allocate one per frame.
//!
//! # Design
//!
//! - The pool is an explicit object passed by reference (or owned by a
//!   [`FrameReader`](crate::reader::FrameReader)), not process-wide state.
//! - [`HeaderPool::checkout`] hands out a [`PooledHeader`] guard; dropping the
//!   guard returns the buffer, so it goes back on every exit path including
//!   errors and early returns.
//! - A buffer is only held for the 9-byte header read. Payloads never touch
//!   pooled memory.
//! - An empty pool creates a new buffer instead of blocking.
//!
//! # Usage
//!
//! ```
//! use h2_framing::protocol::HeaderPool;
//!
//! let pool = HeaderPool::new();
//! {
//!     let mut buf = pool.checkout();
//!     buf[0] = 0xff;
//! } // buffer returned here
//! assert_eq!(pool.available(), 1);
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::wire_format::{FRAME_HEADER_LEN, HEADER_POOL_SIZE};

type HeaderBuf = [u8; FRAME_HEADER_LEN];

/// A pool of reusable 9-byte header buffers.
///
/// `Send + Sync`; concurrent readers each get their own checkout.
#[derive(Debug)]
pub struct HeaderPool {
    /// Buffers not currently checked out.
    free: Mutex<Vec<HeaderBuf>>,
    /// Upper bound on retained buffers.
    capacity: usize,
    /// Buffers currently checked out.
    outstanding: AtomicUsize,
}

impl HeaderPool {
    /// Create a pool retaining up to `HEADER_POOL_SIZE` buffers.
    pub fn new() -> Self {
        Self::with_capacity(HEADER_POOL_SIZE)
    }

    /// Create a pool retaining up to `capacity` buffers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            outstanding: AtomicUsize::new(0),
        }
    }

    /// Check out a buffer.
    ///
    /// The buffer content is NOT cleared - it may contain an old header.
    pub fn checkout(&self) -> PooledHeader<'_> {
        let buf = self
            .free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop()
            .unwrap_or([0u8; FRAME_HEADER_LEN]);
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        PooledHeader { pool: self, buf }
    }

    fn release(&self, buf: HeaderBuf) {
        self.outstanding.fetch_sub(1, Ordering::AcqRel);
        let mut free = self
            .free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if free.len() < self.capacity {
            free.push(buf);
        }
    }

    /// Number of idle buffers ready for checkout.
    pub fn available(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Number of buffers currently checked out.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Maximum number of idle buffers retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HeaderPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A checked-out header buffer. Returned to its pool on drop.
pub struct PooledHeader<'p> {
    pool: &'p HeaderPool,
    buf: HeaderBuf,
}

impl Deref for PooledHeader<'_> {
    type Target = [u8; FRAME_HEADER_LEN];

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledHeader<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledHeader<'_> {
    fn drop(&mut self) {
        self.pool.release(self.buf);
    }
}
