//! In-memory byte device.

use std::io;

use streamio_core::{Capabilities, SeekOrigin};

use crate::error::{StreamError, StreamResult};
use crate::stream::{check_open, check_readable, check_seekable, check_writable, resolve_seek, Stream};

/// A growable byte buffer implementing [`Stream`].
///
/// Seeking past the end is allowed; a later write zero-fills the gap. The
/// contents stay inspectable after disposal.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    data: Vec<u8>,
    position: u64,
    capabilities: Capabilities,
    read_timeout: Option<u64>,
    write_timeout: Option<u64>,
    disposed: bool,
}

impl MemoryStream {
    /// Empty readable, writable, seekable stream.
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Readable, writable, seekable stream over `data`, positioned at 0.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::with_capabilities(data, Capabilities::full())
    }

    /// Seekable stream over `data` that rejects writes.
    pub fn read_only(data: impl Into<Vec<u8>>) -> Self {
        Self::with_capabilities(data, Capabilities::read_only().seekable())
    }

    /// Stream over `data` with an explicit capability set.
    pub fn with_capabilities(data: impl Into<Vec<u8>>, capabilities: Capabilities) -> Self {
        Self {
            data: data.into(),
            position: 0,
            capabilities,
            read_timeout: None,
            write_timeout: None,
            disposed: false,
        }
    }

    /// Current contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream, returning its contents.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self) -> StreamResult<usize> {
        usize::try_from(self.position).map_err(|_| {
            StreamError::Io(io::Error::new(
                io::ErrorKind::Other,
                "position exceeds addressable memory",
            ))
        })
    }

    fn check_timeout(&self) -> StreamResult<()> {
        check_open(self)?;
        if !self.capabilities.can_timeout {
            return Err(StreamError::InvalidOperation(
                "timeouts are not supported by this stream".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for MemoryStream {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn length(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(Some(self.data.len() as u64))
    }

    fn position(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(Some(self.position))
    }

    fn read_into(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        check_readable(self, "read")?;
        if buf.is_empty() {
            return Err(StreamError::invalid_argument("length", "must be positive"));
        }
        if self.position >= self.data.len() as u64 {
            return Ok(0);
        }
        let start = self.offset()?;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.position += n as u64;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        check_writable(self, "write")?;
        if data.is_empty() {
            return Ok(());
        }
        let start = self.offset()?;
        let end = start.checked_add(data.len()).ok_or_else(|| {
            StreamError::Io(io::Error::new(io::ErrorKind::Other, "write overflows stream"))
        })?;
        if start > self.data.len() {
            tracing::trace!(gap = start - self.data.len(), "Zero-filling sparse region");
        }
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(data);
        self.position = end as u64;
        Ok(())
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> StreamResult<u64> {
        check_seekable(self, "seek")?;
        self.position = resolve_seek(offset, origin, self.position, self.data.len() as u64)?;
        Ok(self.position)
    }

    fn set_length(&mut self, length: u64) -> StreamResult<()> {
        check_open(self)?;
        if !(self.capabilities.can_write && self.capabilities.can_seek) {
            return Err(StreamError::not_supported("set_length"));
        }
        if length == 0 {
            return Err(StreamError::invalid_argument("length", "must be positive"));
        }
        let length = usize::try_from(length).map_err(|_| {
            StreamError::invalid_argument("length", "exceeds addressable memory")
        })?;
        self.data.resize(length, 0);
        Ok(())
    }

    fn read_timeout(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(self.read_timeout.filter(|_| self.capabilities.can_timeout))
    }

    fn set_read_timeout(&mut self, ms: u64) -> StreamResult<()> {
        self.check_timeout()?;
        self.read_timeout = Some(ms);
        Ok(())
    }

    fn write_timeout(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(self.write_timeout.filter(|_| self.capabilities.can_timeout))
    }

    fn set_write_timeout(&mut self, ms: u64) -> StreamResult<()> {
        self.check_timeout()?;
        self.write_timeout = Some(ms);
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        check_open(self)
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            tracing::trace!(length = self.data.len(), "Memory stream disposed");
        }
    }
}
