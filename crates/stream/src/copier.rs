//! Fixed-buffer copy between streams.

use streamio_core::{CopyConfig, DEFAULT_BUFFER_SIZE};

use crate::error::{StreamError, StreamResult};
use crate::stream::{check_readable, check_writable, Stream};

/// Pumps bytes from one stream to another through a buffer of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCopier {
    buffer_size: usize,
}

impl StreamCopier {
    /// Copier using a `buffer_size`-byte buffer.
    pub fn new(buffer_size: usize) -> StreamResult<Self> {
        if buffer_size == 0 {
            return Err(StreamError::invalid_argument("buffer_size", "must be positive"));
        }
        Ok(Self { buffer_size })
    }

    /// Copier sized from `config`.
    pub fn with_config(config: &CopyConfig) -> StreamResult<Self> {
        Self::new(config.buffer_size)
    }

    /// Buffer size in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Copy from the current position of `source` to its end, returning the
    /// number of bytes copied.
    ///
    /// A failed write stops the copy immediately; bytes written before it stay
    /// written.
    pub fn copy<S, D>(&self, source: &mut S, destination: &mut D) -> StreamResult<u64>
    where
        S: Stream + ?Sized,
        D: Stream + ?Sized,
    {
        check_readable(&*source, "read")?;
        check_writable(&*destination, "write")?;

        let mut buf = vec![0u8; self.buffer_size];
        let mut total = 0u64;
        loop {
            let n = source.read_into(&mut buf)?;
            if n == 0 {
                break;
            }
            if let Err(e) = destination.write(&buf[..n]) {
                tracing::debug!(copied = total, error = %e, "Stream copy aborted by write failure");
                return Err(e);
            }
            total += n as u64;
        }
        tracing::debug!(copied = total, buffer_size = self.buffer_size, "Stream copy complete");
        Ok(total)
    }
}

impl Default for StreamCopier {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Copy `source` into `destination` with a `buffer_size`-byte buffer.
pub fn copy<S, D>(source: &mut S, destination: &mut D, buffer_size: usize) -> StreamResult<u64>
where
    S: Stream + ?Sized,
    D: Stream + ?Sized,
{
    StreamCopier::new(buffer_size)?.copy(source, destination)
}
