//! Frame flag constants.
//!
//! The flags byte is interpreted per frame type, so the same bit can carry
//! different meanings: `0x1` is END_STREAM on DATA and HEADERS but ACK on
//! SETTINGS and PING.
//!
//! | Bit  | DATA       | HEADERS     | SETTINGS | PUSH_PROMISE | PING | CONTINUATION |
//! |------|------------|-------------|----------|--------------|------|--------------|
//! | 0x01 | END_STREAM | END_STREAM  | ACK      |              | ACK  |              |
//! | 0x04 |            | END_HEADERS |          | END_HEADERS  |      | END_HEADERS  |
//! | 0x08 | PADDED     | PADDED      |          | PADDED       |      |              |
//! | 0x20 |            | PRIORITY    |          |              |      |              |

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Flags byte of a frame header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// No flags set.
    #[inline]
    pub const fn empty() -> Self {
        Flags(0)
    }

    /// Wrap a raw flags byte. Every value is accepted; unknown bits are kept.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Flags(bits)
    }

    /// Raw flags byte.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if every bit of `flag` is set.
    #[inline]
    pub const fn has(self, flag: Flags) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Set the bits of `flag`.
    #[inline]
    pub fn insert(&mut self, flag: Flags) {
        self.0 |= flag.0;
    }

    /// Clear the bits of `flag`.
    #[inline]
    pub fn remove(&mut self, flag: Flags) {
        self.0 &= !flag.0;
    }

    /// Return a copy with `flag` set or cleared.
    #[inline]
    pub fn with(mut self, flag: Flags, on: bool) -> Self {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
        self
    }
}

impl BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    #[inline]
    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl From<u8> for Flags {
    #[inline]
    fn from(bits: u8) -> Self {
        Flags(bits)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags(0x{:02x})", self.0)
    }
}

/// DATA, HEADERS: last frame the sender will send on this stream.
pub const END_STREAM: Flags = Flags(0x01);
/// SETTINGS, PING: acknowledgment of a frame from the peer.
pub const ACK: Flags = Flags(0x01);
/// HEADERS, PUSH_PROMISE, CONTINUATION: header block is complete.
pub const END_HEADERS: Flags = Flags(0x04);
/// DATA, HEADERS, PUSH_PROMISE: payload starts with a pad length byte.
pub const PADDED: Flags = Flags(0x08);
/// HEADERS: payload carries a priority block.
pub const PRIORITY: Flags = Flags(0x20);

/// Check if a specific flag is set.
#[inline]
pub fn has_flag(flags: Flags, flag: Flags) -> bool {
    flags.has(flag)
}
