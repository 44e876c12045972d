//! Reading frames from a byte source.
//!
//! A frame read is two exact reads: the 9-byte header into a pooled scratch
//! buffer, then `length` payload bytes into a fresh allocation. The pooled
//! buffer is returned before the payload read starts, so a large or slow
//! payload never pins it.
//!
//! A source that ends early (in the header or in the payload) yields
//! [`Error::UnexpectedEof`]; it is a transport failure, not a protocol error.
//!
//! # Example
//!
//! ```
//! use h2_framing::protocol::{Frame, HeaderPool};
//! use h2_framing::reader::read_frame;
//!
//! let wire: &[u8] = &[0, 0, 5, 0, 1, 0, 0, 0, 1, b'h', b'e', b'l', b'l', b'o'];
//! let pool = HeaderPool::new();
//! let raw = read_frame(&pool, &mut &wire[..]).unwrap();
//!
//! match raw.parse().unwrap() {
//!     Frame::Data(data) => {
//!         assert_eq!(data.data, b"hello");
//!         assert!(data.stream_ended());
//!     }
//!     other => panic!("unexpected frame {:?}", other),
//! }
//! ```

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::protocol::{FrameHeader, HeaderPool, RawFrame, MAX_FRAME_LEN};

/// Read one frame (header + payload) from a blocking source.
///
/// Accepts any length the 24-bit field can express. Use [`FrameReader`] to
/// enforce a maximum frame size.
pub fn read_frame<R: Read>(pool: &HeaderPool, src: &mut R) -> Result<RawFrame> {
    read_frame_limited(pool, src, MAX_FRAME_LEN)
}

/// Read one frame from a tokio source.
///
/// Cancelling the returned future mid-frame leaves the source at an unknown
/// position; treat it like a short read.
pub async fn read_frame_async<R>(pool: &HeaderPool, src: &mut R) -> Result<RawFrame>
where
    R: AsyncRead + Unpin,
{
    read_frame_limited_async(pool, src, MAX_FRAME_LEN).await
}

fn read_frame_limited<R: Read>(pool: &HeaderPool, src: &mut R, max_frame_size: u32) -> Result<RawFrame> {
    let header = {
        let mut buf = pool.checkout();
        src.read_exact(&mut buf[..])?;
        FrameHeader::decode(&buf[..])?
    };
    check_length(&header, max_frame_size)?;

    let mut payload = vec![0u8; header.length as usize];
    src.read_exact(&mut payload)?;
    Ok(RawFrame::new(header, Bytes::from(payload)))
}

async fn read_frame_limited_async<R>(
    pool: &HeaderPool,
    src: &mut R,
    max_frame_size: u32,
) -> Result<RawFrame>
where
    R: AsyncRead + Unpin,
{
    let header = {
        let mut buf = pool.checkout();
        src.read_exact(&mut buf[..]).await?;
        FrameHeader::decode(&buf[..])?
    };
    check_length(&header, max_frame_size)?;

    let mut payload = vec![0u8; header.length as usize];
    src.read_exact(&mut payload).await?;
    Ok(RawFrame::new(header, Bytes::from(payload)))
}

fn check_length(header: &FrameHeader, max_frame_size: u32) -> Result<()> {
    tracing::trace!(
        frame_type = %header.frame_type,
        flags = header.flags.bits(),
        stream_id = header.stream_id,
        length = header.length,
        "read frame header"
    );
    if header.length > max_frame_size {
        tracing::debug!(
            length = header.length,
            max = max_frame_size,
            "frame exceeds maximum size"
        );
        return Err(Error::frame_size(
            header.frame_type,
            header.length as usize,
            format!("at most {}", max_frame_size),
        ));
    }
    Ok(())
}

/// Reads frames from one connection's byte source.
///
/// Frames are returned in arrival order. The header pool may be shared with
/// other readers.
pub struct FrameReader<R> {
    inner: R,
    pool: Arc<HeaderPool>,
    config: CodecConfig,
}

impl<R> FrameReader<R> {
    /// Create a reader with the default configuration and its own pool.
    pub fn new(inner: R) -> Self {
        let config = CodecConfig::default();
        Self {
            inner,
            pool: Arc::new(HeaderPool::with_capacity(config.header_pool_size)),
            config,
        }
    }

    /// Create a reader with a validated configuration and its own pool.
    pub fn with_config(inner: R, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner,
            pool: Arc::new(HeaderPool::with_capacity(config.header_pool_size)),
            config,
        })
    }

    /// Create a reader sharing an existing pool.
    pub fn with_pool(inner: R, pool: Arc<HeaderPool>, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner,
            pool,
            config,
        })
    }

    /// Raise or lower the accepted frame size, e.g. after a SETTINGS
    /// exchange changed MAX_FRAME_SIZE.
    pub fn set_max_frame_size(&mut self, max_frame_size: u32) -> Result<()> {
        let config = self.config.with_max_frame_size(max_frame_size);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<HeaderPool> {
        &self.pool
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> FrameReader<R> {
    /// Read the next frame.
    pub fn read_frame(&mut self) -> Result<RawFrame> {
        read_frame_limited(&self.pool, &mut self.inner, self.config.max_frame_size)
    }
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Read the next frame asynchronously.
    pub async fn read_frame_async(&mut self) -> Result<RawFrame> {
        read_frame_limited_async(&self.pool, &mut self.inner, self.config.max_frame_size).await
    }
}
