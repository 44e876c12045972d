//! Writing frames to a byte sink.
//!
//! [`write_frame`] and [`write_frame_async`] encode and write one frame.
//! [`FrameWriter`] queues several encoded frames in one buffer and writes
//! them with a single call on flush, which keeps small control frames
//! (SETTINGS ACK, PING, WINDOW_UPDATE) from costing a syscall each.
//!
//! Frames are written in the order they were queued.

use std::io::Write;

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::protocol::{Frame, FRAME_HEADER_LEN};

/// Flush threshold for [`FrameWriter`], in bytes.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 16 * 1024;

/// Encode `frame` and write it to a blocking sink.
pub fn write_frame<W: Write>(dst: &mut W, frame: &Frame<'_>) -> Result<()> {
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + frame.header().length as usize);
    frame.encode(&mut buf)?;
    dst.write_all(&buf)?;
    Ok(())
}

/// Encode `frame` and write it to a tokio sink, then flush.
pub async fn write_frame_async<W>(dst: &mut W, frame: &Frame<'_>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + frame.header().length as usize);
    frame.encode(&mut buf)?;
    dst.write_all(&buf).await?;
    dst.flush().await?;
    Ok(())
}

/// Batches encoded frames for one sink.
///
/// Nothing reaches the sink until [`flush`](Self::flush) or
/// [`flush_async`](Self::flush_async) is called, or [`queue`](Self::queue)
/// reports the threshold was crossed.
pub struct FrameWriter<W> {
    inner: W,
    buf: BytesMut,
    queued: usize,
    flush_threshold: usize,
}

impl<W> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_flush_threshold(inner, DEFAULT_FLUSH_THRESHOLD)
    }

    pub fn with_flush_threshold(inner: W, flush_threshold: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(flush_threshold),
            queued: 0,
            flush_threshold,
        }
    }

    /// Encode `frame` onto the pending batch.
    ///
    /// Returns `true` once the batch has reached the flush threshold. A frame
    /// that fails to encode leaves the batch unchanged.
    pub fn queue(&mut self, frame: &Frame<'_>) -> Result<bool> {
        let mark = self.buf.len();
        if let Err(e) = frame.encode(&mut self.buf) {
            self.buf.truncate(mark);
            return Err(e);
        }
        self.queued += 1;
        Ok(self.buf.len() >= self.flush_threshold)
    }

    /// Frames waiting to be flushed.
    pub fn queued_frames(&self) -> usize {
        self.queued
    }

    /// Bytes waiting to be flushed.
    pub fn queued_bytes(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn take_batch(&mut self) -> Option<BytesMut> {
        if self.buf.is_empty() {
            return None;
        }
        tracing::trace!(frames = self.queued, bytes = self.buf.len(), "flushing frames");
        self.queued = 0;
        Some(self.buf.split())
    }
}

impl<W: Write> FrameWriter<W> {
    /// Write every queued frame to the sink.
    ///
    /// The batch is taken before writing. If the write fails, the queued
    /// frames are dropped and the sink is left mid-frame; treat the error as
    /// fatal for the connection.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(batch) = self.take_batch() {
            self.inner.write_all(&batch)?;
        }
        self.inner.flush()?;
        Ok(())
    }
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Write every queued frame to the sink.
    ///
    /// On error the queued frames are dropped, as with [`flush`](Self::flush).
    pub async fn flush_async(&mut self) -> Result<()> {
        if let Some(batch) = self.take_batch() {
            self.inner.write_all(&batch).await?;
        }
        self.inner.flush().await?;
        Ok(())
    }
}
