//! Core functionality shared across the streamio workspace.
//!
//! This crate provides the capability and mode vocabulary, configuration
//! loading, and logging setup used by the stream layer.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{Config, CopyConfig, LineSeparator, ReaderConfig, WriterConfig, DEFAULT_BUFFER_SIZE};
pub use error::{CoreError, CoreResult};
pub use types::{Capabilities, FileAccess, FileMode, SeekOrigin};
