//! Configuration management for streamio readers, writers and copiers.

use serde::{Deserialize, Serialize};
#[cfg(feature = "toml")]
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Default decoder pull size and copy buffer size, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
    pub copy: CopyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Bytes requested from the stream per pull, independent of how many
    /// characters the caller asked for.
    pub chunk_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub line_separator: LineSeparator,
    /// Encoded bytes held back before forwarding. Zero writes through.
    pub buffer_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            line_separator: LineSeparator::Lf,
            buffer_capacity: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub buffer_size: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Line separator emitted by writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSeparator {
    #[default]
    Lf,
    CrLf,
}

impl LineSeparator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
        }
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate()?;
        tracing::debug!(
            chunk_size = config.reader.chunk_size,
            copy_buffer_size = config.copy.buffer_size,
            "Loaded stream configuration"
        );
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Reject sizes the stream layer cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.reader.chunk_size == 0 {
            return Err(CoreError::InvalidConfig(
                "reader.chunk_size must be positive".to_string(),
            ));
        }
        if self.copy.buffer_size == 0 {
            return Err(CoreError::InvalidConfig(
                "copy.buffer_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
