//! Forward-only adapters over `std::io` endpoints.
//!
//! [`PipeStream`] wraps a reader and [`SinkStream`] wraps a writer. Neither can
//! seek, so both report an unknown position and length. The byte count moved so
//! far is available from `transferred()`.

use std::io::{Read, Write};

use streamio_core::{Capabilities, SeekOrigin};

use crate::error::{StreamError, StreamResult};
use crate::stream::{check_open, check_readable, check_writable, Stream};

/// Read-only, non-seekable stream over any [`Read`].
#[derive(Debug)]
pub struct PipeStream<R> {
    inner: Option<R>,
    transferred: u64,
}

impl<R: Read> PipeStream<R> {
    /// Wrap `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner: Some(inner),
            transferred: 0,
        }
    }

    /// Bytes read so far.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Unwrap the reader, `None` once disposed.
    pub fn into_inner(self) -> Option<R> {
        self.inner
    }
}

impl<R: Read> Stream for PipeStream<R> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::read_only()
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_none()
    }

    fn length(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(None)
    }

    fn position(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(None)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        check_readable(self, "read")?;
        if buf.is_empty() {
            return Err(StreamError::invalid_argument("length", "must be positive"));
        }
        let inner = self.inner.as_mut().ok_or(StreamError::disposed("stream"))?;
        let n = inner.read(buf)?;
        self.transferred += n as u64;
        Ok(n)
    }

    fn write(&mut self, _data: &[u8]) -> StreamResult<()> {
        check_writable(self, "write")
    }

    fn seek(&mut self, _offset: i64, _origin: SeekOrigin) -> StreamResult<u64> {
        check_open(self)?;
        Err(StreamError::not_supported("seek"))
    }

    fn set_length(&mut self, _length: u64) -> StreamResult<()> {
        check_open(self)?;
        Err(StreamError::not_supported("set_length"))
    }

    fn flush(&mut self) -> StreamResult<()> {
        check_open(self)
    }

    fn dispose(&mut self) {
        if self.inner.take().is_some() {
            tracing::trace!(transferred = self.transferred, "Pipe stream disposed");
        }
    }
}

/// Write-only, non-seekable stream over any [`Write`].
#[derive(Debug)]
pub struct SinkStream<W> {
    inner: Option<W>,
    transferred: u64,
}

impl<W: Write> SinkStream<W> {
    /// Wrap `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            transferred: 0,
        }
    }

    /// Borrow the writer, `None` once disposed.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Bytes written so far.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Unwrap the writer, `None` once disposed.
    pub fn into_inner(self) -> Option<W> {
        self.inner
    }
}

impl<W: Write> Stream for SinkStream<W> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::write_only()
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_none()
    }

    fn length(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(None)
    }

    fn position(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(None)
    }

    fn read_into(&mut self, _buf: &mut [u8]) -> StreamResult<usize> {
        check_readable(self, "read")?;
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        check_writable(self, "write")?;
        let inner = self.inner.as_mut().ok_or(StreamError::disposed("stream"))?;
        inner.write_all(data)?;
        self.transferred += data.len() as u64;
        Ok(())
    }

    fn seek(&mut self, _offset: i64, _origin: SeekOrigin) -> StreamResult<u64> {
        check_open(self)?;
        Err(StreamError::not_supported("seek"))
    }

    fn set_length(&mut self, _length: u64) -> StreamResult<()> {
        check_open(self)?;
        Err(StreamError::not_supported("set_length"))
    }

    fn flush(&mut self) -> StreamResult<()> {
        let inner = self.inner.as_mut().ok_or(StreamError::disposed("stream"))?;
        inner.flush()?;
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            if let Err(e) = inner.flush() {
                tracing::warn!(error = %e, "Flush failed while disposing sink stream");
            }
        }
    }
}
