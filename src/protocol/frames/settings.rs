//! SETTINGS frame.
//!
//! The payload is a sequence of 6-byte entries:
//! ```text
//! ┌────────────┬──────────────┐
//! │ Identifier │ Value        │
//! │ uint16 BE  │ uint32 BE    │
//! └────────────┴──────────────┘
//! ```
//!
//! A payload whose length is not a multiple of 6 is rejected with a
//! frame-size error rather than truncated.

use std::collections::HashMap;
use std::fmt;

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use super::{expect_type, put_header, require_connection};
use crate::error::{Error, Result};
use crate::protocol::flags::{self, Flags};
use crate::protocol::primitives::{read_u16, read_u32};
use crate::protocol::wire_format::{FrameHeader, FrameType};

/// Size of one setting entry on the wire.
pub const SETTING_ENTRY_LEN: usize = 6;

/// Setting identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingId(pub u16);

impl SettingId {
    pub const HEADER_TABLE_SIZE: SettingId = SettingId(0x1);
    pub const ENABLE_PUSH: SettingId = SettingId(0x2);
    pub const MAX_CONCURRENT_STREAMS: SettingId = SettingId(0x3);
    pub const INITIAL_WINDOW_SIZE: SettingId = SettingId(0x4);
    pub const MAX_FRAME_SIZE: SettingId = SettingId(0x5);
    pub const MAX_HEADER_LIST_SIZE: SettingId = SettingId(0x6);

    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0x1 => "HEADER_TABLE_SIZE",
            0x2 => "ENABLE_PUSH",
            0x3 => "MAX_CONCURRENT_STREAMS",
            0x4 => "INITIAL_WINDOW_SIZE",
            0x5 => "MAX_FRAME_SIZE",
            0x6 => "MAX_HEADER_LIST_SIZE",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for SettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN_SETTING_0x{:x}", self.0),
        }
    }
}

/// One (identifier, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,
    pub value: u32,
}

/// SETTINGS frame.
///
/// Entries are keyed by identifier; a repeated identifier keeps the value
/// that appears last in the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFrame {
    pub header: FrameHeader,
    pub settings: HashMap<SettingId, Setting>,
}

impl SettingsFrame {
    /// Create a SETTINGS frame. Later entries overwrite earlier ones.
    pub fn new<I>(settings: I) -> Self
    where
        I: IntoIterator<Item = Setting>,
    {
        let settings: HashMap<_, _> = settings.into_iter().map(|s| (s.id, s)).collect();
        let length = (settings.len() * SETTING_ENTRY_LEN) as u32;
        Self {
            header: FrameHeader::new(FrameType::Settings, Flags::empty(), 0, length),
            settings,
        }
    }

    /// Create an empty SETTINGS acknowledgment.
    pub fn ack() -> Self {
        Self {
            header: FrameHeader::new(FrameType::Settings, flags::ACK, 0, 0),
            settings: HashMap::new(),
        }
    }

    /// Parse a SETTINGS payload.
    ///
    /// # Errors
    ///
    /// - Connection PROTOCOL_ERROR if the stream ID is not 0.
    /// - Frame-size error if an ACK carries a payload or the length is not a
    ///   multiple of 6.
    pub fn parse(header: &FrameHeader, payload: &[u8]) -> Result<Self> {
        expect_type(header, FrameType::Settings)?;
        require_connection(header)?;

        if header.has_flag(flags::ACK) && !payload.is_empty() {
            return Err(Error::frame_size(FrameType::Settings, payload.len(), "0"));
        }
        if payload.len() % SETTING_ENTRY_LEN != 0 {
            return Err(Error::frame_size(
                FrameType::Settings,
                payload.len(),
                "a multiple of 6",
            ));
        }

        let mut settings = HashMap::with_capacity(payload.len() / SETTING_ENTRY_LEN);
        for entry in payload.chunks_exact(SETTING_ENTRY_LEN) {
            let (rest, id) = read_u16(entry)?;
            let (_, value) = read_u32(rest)?;
            let id = SettingId(id);
            settings.insert(id, Setting { id, value });
        }

        Ok(Self {
            header: *header,
            settings,
        })
    }

    /// Check if this is an acknowledgment.
    #[inline]
    pub fn is_ack(&self) -> bool {
        self.header.has_flag(flags::ACK)
    }

    /// Value of a setting, if present.
    pub fn get(&self, id: SettingId) -> Option<u32> {
        self.settings.get(&id).map(|s| s.value)
    }

    /// Entries sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = Setting> + '_ {
        let mut entries: Vec<Setting> = self.settings.values().copied().collect();
        entries.sort_by_key(|s| s.id);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Encode the complete frame, entries in identifier order.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        let length = self.settings.len() * SETTING_ENTRY_LEN;
        put_header(dst, FrameType::Settings, self.header.flags, self.header.stream_id, length)?;
        for setting in self.iter() {
            dst.put_u16(setting.id.0);
            dst.put_u32(setting.value);
        }
        Ok(())
    }
}
