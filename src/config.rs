//! Codec configuration.
//!
//! # Example
//!
//! ```
//! use h2_framing::CodecConfig;
//!
//! let config = CodecConfig::from_json(r#"{ "max_frame_size": 65536 }"#).unwrap();
//! assert_eq!(config.max_frame_size, 65536);
//! assert_eq!(config.header_pool_size, 16);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::{DEFAULT_MAX_FRAME_SIZE, HEADER_POOL_SIZE, MAX_FRAME_LEN};

/// Settings for [`FrameReader`](crate::reader::FrameReader) and
/// [`FrameBuffer`](crate::protocol::FrameBuffer) (via `with_config`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest payload accepted before a frame-size error (16 KiB..16 MiB).
    pub max_frame_size: u32,
    /// Idle header buffers kept by the reader's pool.
    pub header_pool_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            header_pool_size: HEADER_POOL_SIZE,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum accepted payload length.
    pub fn with_max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Set the number of idle header buffers to retain.
    pub fn with_header_pool_size(mut self, header_pool_size: usize) -> Self {
        self.header_pool_size = header_pool_size;
        self
    }

    /// Check the values are within protocol limits.
    pub fn validate(&self) -> Result<()> {
        if !(DEFAULT_MAX_FRAME_SIZE..=MAX_FRAME_LEN).contains(&self.max_frame_size) {
            return Err(Error::Config(format!(
                "max_frame_size {} outside {}..={}",
                self.max_frame_size, DEFAULT_MAX_FRAME_SIZE, MAX_FRAME_LEN
            )));
        }
        if self.header_pool_size == 0 {
            return Err(Error::Config("header_pool_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CodecConfig::default();
        assert_eq!(config.max_frame_size, 16_384);
        assert_eq!(config.header_pool_size, HEADER_POOL_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CodecConfig::new()
            .with_max_frame_size(MAX_FRAME_LEN)
            .with_header_pool_size(2);
        assert!(config.validate().is_ok());
        assert_eq!(config.header_pool_size, 2);
    }

    #[test]
    fn test_frame_size_bounds() {
        assert!(CodecConfig::new().with_max_frame_size(16_383).validate().is_err());
        assert!(CodecConfig::new()
            .with_max_frame_size(MAX_FRAME_LEN + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_pool_rejected() {
        let err = CodecConfig::new().with_header_pool_size(0).validate().unwrap_err();
        assert!(err.to_string().contains("header_pool_size"));
    }

    #[test]
    fn test_from_json_defaults() {
        let config = CodecConfig::from_json("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(CodecConfig::from_json("not json"), Err(Error::Json(_))));
        assert!(matches!(
            CodecConfig::from_json(r#"{ "max_frame_size": 10 }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CodecConfig::new().with_max_frame_size(32_768);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CodecConfig::from_json(&json).unwrap(), config);
    }
}
