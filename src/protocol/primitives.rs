//! Byte-slice readers shared by the payload parsers.
//!
//! Each reader takes the remaining input and returns the rest plus the value,
//! or [`Error::UnexpectedEof`] if the slice is too short. Nothing is copied.

use super::wire_format::STREAM_ID_MASK;
use crate::error::{Error, Result};

/// Read one byte.
#[inline]
pub fn read_u8(p: &[u8]) -> Result<(&[u8], u8)> {
    match p.split_first() {
        Some((&b, rest)) => Ok((rest, b)),
        None => Err(Error::UnexpectedEof),
    }
}

/// Read a big-endian 16-bit word.
#[inline]
pub fn read_u16(p: &[u8]) -> Result<(&[u8], u16)> {
    let (head, rest) = take(p, 2)?;
    Ok((rest, u16::from_be_bytes([head[0], head[1]])))
}

/// Read a big-endian 32-bit word.
#[inline]
pub fn read_u32(p: &[u8]) -> Result<(&[u8], u32)> {
    let (head, rest) = take(p, 4)?;
    Ok((rest, u32::from_be_bytes([head[0], head[1], head[2], head[3]])))
}

/// Read a 32-bit word and split it into (reserved bit, 31-bit value).
#[inline]
pub fn read_u31(p: &[u8]) -> Result<(&[u8], bool, u32)> {
    let (rest, v) = read_u32(p)?;
    Ok((rest, v & !STREAM_ID_MASK != 0, v & STREAM_ID_MASK))
}

/// Split off the first `n` bytes.
#[inline]
pub fn take(p: &[u8], n: usize) -> Result<(&[u8], &[u8])> {
    if p.len() < n {
        return Err(Error::UnexpectedEof);
    }
    Ok(p.split_at(n))
}

/// Drop `pad_len` trailing bytes.
///
/// Returns `None` when the padding is longer than what is left.
#[inline]
pub fn strip_trailing(p: &[u8], pad_len: u8) -> Option<&[u8]> {
    let len = p.len().checked_sub(pad_len as usize)?;
    Some(&p[..len])
}
