//! Shared stream vocabulary: capability sets and the mode/access/seek constants.
//!
//! Device providers resolve [`FileMode`] and [`FileAccess`] when they construct a
//! stream; the rest of the workspace only looks at the resulting [`Capabilities`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Capability flags of a stream, fixed when the stream is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Stream can be read from
    pub can_read: bool,
    /// Stream can be written to
    pub can_write: bool,
    /// Stream pointer can be moved
    pub can_seek: bool,
    /// Stream honours read/write timeouts
    pub can_timeout: bool,
}

impl Capabilities {
    /// Read, write and seek, without timeouts.
    pub const fn full() -> Self {
        Self {
            can_read: true,
            can_write: true,
            can_seek: true,
            can_timeout: false,
        }
    }

    /// Read-only, forward-only.
    pub const fn read_only() -> Self {
        Self {
            can_read: true,
            can_write: false,
            can_seek: false,
            can_timeout: false,
        }
    }

    /// Write-only, forward-only.
    pub const fn write_only() -> Self {
        Self {
            can_read: false,
            can_write: true,
            can_seek: false,
            can_timeout: false,
        }
    }

    /// Same flags with seeking enabled.
    pub const fn seekable(mut self) -> Self {
        self.can_seek = true;
        self
    }

    /// Same flags with timeout support enabled.
    pub const fn with_timeout(mut self) -> Self {
        self.can_timeout = true;
        self
    }
}

/// Reference point for a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekOrigin {
    /// Relative to the beginning of the stream
    Origin,
    /// Relative to the current stream pointer
    Current,
    /// Relative to the end of the stream
    End,
}

/// How a device provider opens its backing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileMode {
    /// Writes always land at the end; created if missing
    #[serde(rename = "append")]
    Append,
    /// Truncated if present, created if missing
    #[serde(rename = "create")]
    Create,
    /// Created; fails if it already exists
    #[serde(rename = "create-new")]
    CreateNew,
    /// Opened; fails if missing
    #[serde(rename = "open")]
    Open,
    /// Opened, created empty if missing
    #[serde(rename = "open-create", alias = "open-or-create")]
    OpenOrCreate,
    /// Truncated; fails if missing
    #[serde(rename = "truncate")]
    Truncate,
}

impl FileMode {
    /// Symbolic name of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FileMode::Append => "append",
            FileMode::Create => "create",
            FileMode::CreateNew => "create-new",
            FileMode::Open => "open",
            FileMode::OpenOrCreate => "open-create",
            FileMode::Truncate => "truncate",
        }
    }

    /// Modes that modify the resource on open need write access.
    pub const fn requires_write(&self) -> bool {
        matches!(self, FileMode::Append | FileMode::Truncate)
    }

    /// Check a mode/access pairing before a provider acts on it.
    pub fn check_access(&self, access: FileAccess) -> Result<(), CoreError> {
        if self.requires_write() && !access.capabilities().can_write {
            return Err(CoreError::InvalidConfig(format!(
                "mode '{}' requires write access, got '{}'",
                self, access
            )));
        }
        Ok(())
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(FileMode::Append),
            "create" => Ok(FileMode::Create),
            "create-new" => Ok(FileMode::CreateNew),
            "open" => Ok(FileMode::Open),
            "open-create" | "open-or-create" => Ok(FileMode::OpenOrCreate),
            "truncate" => Ok(FileMode::Truncate),
            other => Err(CoreError::Parse(format!("unknown file mode '{}'", other))),
        }
    }
}

/// Access requested from a device provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileAccess {
    /// Read access
    #[serde(rename = "read")]
    Read,
    /// Read-write access
    #[serde(rename = "read-write")]
    ReadWrite,
    /// Write access
    #[serde(rename = "write")]
    Write,
}

impl FileAccess {
    /// Symbolic name of the access level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FileAccess::Read => "read",
            FileAccess::ReadWrite => "read-write",
            FileAccess::Write => "write",
        }
    }

    /// Read/write flags implied by this access level. Seek and timeout support
    /// depend on the device and are left unset.
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_read: matches!(self, FileAccess::Read | FileAccess::ReadWrite),
            can_write: matches!(self, FileAccess::Write | FileAccess::ReadWrite),
            can_seek: false,
            can_timeout: false,
        }
    }
}

impl fmt::Display for FileAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileAccess {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(FileAccess::Read),
            "read-write" => Ok(FileAccess::ReadWrite),
            "write" => Ok(FileAccess::Write),
            other => Err(CoreError::Parse(format!("unknown file access '{}'", other))),
        }
    }
}
