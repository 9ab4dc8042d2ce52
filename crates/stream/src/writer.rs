//! Character-oriented writer over a borrowed [`Stream`].

use std::fmt;

use streamio_core::{LineSeparator, WriterConfig};

use crate::encoder::EncodingBuffer;
use crate::error::{StreamError, StreamResult};
use crate::stream::{check_open, check_writable, Stream};

/// Writes UTF-8 text to a stream it does not own.
///
/// Every `write*` call encodes its whole input before anything is forwarded.
/// If forwarding fails, that call's bytes are dropped and earlier buffered
/// bytes stay pending. [`StreamWriter::write_line`] issues two writes, so on
/// failure the text part may already be visible downstream.
///
/// # Example
/// ```
/// use streamio_stream::{MemoryStream, StreamWriter};
///
/// let mut stream = MemoryStream::new();
/// let mut writer = StreamWriter::new(&mut stream)?;
/// writer.write_line("Hello")?;
/// writer.write("World")?;
/// writer.flush()?;
/// drop(writer);
/// assert_eq!(stream.as_bytes(), b"Hello\nWorld");
/// # Ok::<(), streamio_stream::StreamError>(())
/// ```
#[derive(Debug)]
pub struct StreamWriter<'a, S: Stream + ?Sized> {
    stream: &'a mut S,
    buffer: EncodingBuffer,
    separator: LineSeparator,
    disposed: bool,
}

impl<'a, S: Stream + ?Sized> StreamWriter<'a, S> {
    /// Write-through writer using `\n` line endings.
    pub fn new(stream: &'a mut S) -> StreamResult<Self> {
        Self::with_config(stream, &WriterConfig::default())
    }

    /// Writer configured by `config`.
    ///
    /// Fails if `stream` is disposed or cannot be written.
    pub fn with_config(stream: &'a mut S, config: &WriterConfig) -> StreamResult<Self> {
        check_writable(&*stream, "write")?;
        tracing::debug!(
            buffer_capacity = config.buffer_capacity,
            line_separator = ?config.line_separator,
            "Stream writer created"
        );
        Ok(Self {
            stream,
            buffer: EncodingBuffer::new(config.buffer_capacity),
            separator: config.line_separator,
            disposed: false,
        })
    }

    fn ensure_open(&self) -> StreamResult<()> {
        if self.disposed {
            return Err(StreamError::disposed("stream writer"));
        }
        Ok(())
    }

    /// Fails if either this handle or the borrowed stream is disposed.
    fn ensure_usable(&self) -> StreamResult<()> {
        self.ensure_open()?;
        check_open(&*self.stream)
    }

    /// Encode with `encode`, then forward if the buffer is full. On failure
    /// the freshly encoded bytes are rolled back.
    fn commit<F>(&mut self, encode: F) -> StreamResult<usize>
    where
        F: FnOnce(&mut EncodingBuffer) -> usize,
    {
        self.ensure_usable()?;
        let mark = self.buffer.len();
        let substituted = encode(&mut self.buffer);
        if substituted > 0 {
            tracing::debug!(substituted, "Replaced unencodable characters");
        }
        if self.buffer.is_full() {
            if let Err(e) = self.buffer.drain_to(&mut *self.stream) {
                self.buffer.truncate(mark);
                return Err(e);
            }
        }
        Ok(substituted)
    }

    /// The stream being written.
    pub fn base_stream(&self) -> StreamResult<&S> {
        self.ensure_open()?;
        Ok(&*self.stream)
    }

    /// Mutable access to the stream. Call [`StreamWriter::flush`] first if
    /// output is buffered.
    pub fn base_stream_mut(&mut self) -> StreamResult<&mut S> {
        self.ensure_open()?;
        Ok(&mut *self.stream)
    }

    /// Line separator appended by [`StreamWriter::write_line`].
    pub fn line_separator(&self) -> LineSeparator {
        self.separator
    }

    /// Encoded bytes not yet forwarded to the stream.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Write `text`.
    pub fn write(&mut self, text: &str) -> StreamResult<()> {
        self.commit(|buffer| {
            buffer.encode_str(text);
            0
        })
        .map(|_| ())
    }

    /// Write one character.
    pub fn write_char(&mut self, c: char) -> StreamResult<()> {
        self.commit(|buffer| {
            buffer.encode_char(c);
            0
        })
        .map(|_| ())
    }

    /// Write UTF-16 code units. Each unpaired surrogate is written as U+FFFD;
    /// returns how many were replaced.
    pub fn write_utf16(&mut self, units: &[u16]) -> StreamResult<usize> {
        self.commit(|buffer| buffer.encode_utf16(units))
    }

    /// Write code point values. Each surrogate or value above U+10FFFF is
    /// written as U+FFFD; returns how many were replaced.
    pub fn write_code_points(&mut self, values: &[u32]) -> StreamResult<usize> {
        self.commit(|buffer| buffer.encode_code_points(values))
    }

    /// Write `text` followed by the line separator.
    pub fn write_line(&mut self, text: &str) -> StreamResult<()> {
        self.write(text)?;
        let separator = self.separator.as_str();
        self.write(separator)
    }

    /// Forward buffered bytes and flush the stream.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.ensure_usable()?;
        self.buffer.drain_to(&mut *self.stream)?;
        self.stream.flush()
    }

    /// Forward buffered bytes and release the writer. The stream itself stays
    /// open. If forwarding fails the writer remains usable.
    pub fn dispose(&mut self) -> StreamResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.buffer.drain_to(&mut *self.stream)?;
        self.disposed = true;
        tracing::debug!("Stream writer disposed");
        Ok(())
    }

    /// Whether [`StreamWriter::dispose`] has completed.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<S: Stream + ?Sized> fmt::Write for StreamWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s).map_err(|_| fmt::Error)
    }
}

impl<S: Stream + ?Sized> Drop for StreamWriter<'_, S> {
    fn drop(&mut self) {
        if self.disposed || self.buffer.is_empty() {
            return;
        }
        if let Err(e) = self.buffer.drain_to(&mut *self.stream) {
            tracing::warn!(
                error = %e,
                pending = self.buffer.len(),
                "Dropping stream writer lost buffered output"
            );
        }
    }
}
