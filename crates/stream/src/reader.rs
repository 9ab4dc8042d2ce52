//! Character-oriented reader over a borrowed [`Stream`].

use streamio_core::ReaderConfig;

use crate::decoder::DecodingBuffer;
use crate::error::{StreamError, StreamResult};
use crate::stream::{check_open, check_readable, Stream};

/// Reads validated UTF-8 text from a stream it does not own.
///
/// No split code point or ill-formed sequence ever reaches the caller: invalid
/// input comes out as U+FFFD. "No data" is always `None`; `read` never returns
/// an empty string.
///
/// Moving the stream through [`StreamReader::base_stream_mut`] leaves the
/// buffered read-ahead stale; call [`StreamReader::flush`] afterwards.
///
/// # Example
/// ```
/// use streamio_stream::{MemoryStream, StreamReader};
///
/// let mut stream = MemoryStream::from_bytes("Hello\nWorld".as_bytes().to_vec());
/// let mut reader = StreamReader::new(&mut stream)?;
/// assert_eq!(reader.read_line()?.as_deref(), Some("Hello"));
/// assert_eq!(reader.read(3)?.as_deref(), Some("Wor"));
/// # Ok::<(), streamio_stream::StreamError>(())
/// ```
#[derive(Debug)]
pub struct StreamReader<'a, S: Stream + ?Sized> {
    stream: &'a mut S,
    buffer: DecodingBuffer,
    disposed: bool,
}

impl<'a, S: Stream + ?Sized> StreamReader<'a, S> {
    /// Reader with the default chunk size.
    pub fn new(stream: &'a mut S) -> StreamResult<Self> {
        Self::with_config(stream, &ReaderConfig::default())
    }

    /// Reader configured by `config`.
    ///
    /// Fails if `stream` is disposed or cannot be read.
    pub fn with_config(stream: &'a mut S, config: &ReaderConfig) -> StreamResult<Self> {
        check_readable(&*stream, "read")?;
        let buffer = DecodingBuffer::with_config(config)?;
        tracing::debug!(chunk_size = buffer.chunk_size(), "Stream reader created");
        Ok(Self {
            stream,
            buffer,
            disposed: false,
        })
    }

    fn ensure_open(&self) -> StreamResult<()> {
        if self.disposed {
            return Err(StreamError::disposed("stream reader"));
        }
        Ok(())
    }

    /// Fails if either this handle or the borrowed stream is disposed.
    fn ensure_usable(&self) -> StreamResult<()> {
        self.ensure_open()?;
        check_open(&*self.stream)
    }

    /// The stream being read.
    pub fn base_stream(&self) -> StreamResult<&S> {
        self.ensure_open()?;
        Ok(&*self.stream)
    }

    /// Mutable access to the stream being read.
    pub fn base_stream_mut(&mut self) -> StreamResult<&mut S> {
        self.ensure_open()?;
        Ok(&mut *self.stream)
    }

    /// Read up to `max_chars` characters; `None` once no data remains.
    pub fn read(&mut self, max_chars: usize) -> StreamResult<Option<String>> {
        self.ensure_usable()?;
        self.buffer.read_chars(&mut *self.stream, max_chars)
    }

    /// Read a single character.
    pub fn read_char(&mut self) -> StreamResult<Option<char>> {
        Ok(self.read(1)?.and_then(|s| s.chars().next()))
    }

    /// Read the next line without its `\n` or `\r\n`. A final line without a
    /// separator is returned as-is; `None` once no data remains.
    pub fn read_line(&mut self) -> StreamResult<Option<String>> {
        self.ensure_usable()?;
        self.buffer.read_line(&mut *self.stream)
    }

    /// Read everything that is left.
    pub fn read_to_end(&mut self) -> StreamResult<String> {
        self.ensure_usable()?;
        let mut text = String::new();
        while let Some(part) = self.buffer.read_chars(&mut *self.stream, usize::MAX)? {
            text.push_str(&part);
        }
        Ok(text)
    }

    /// Iterate over the remaining lines.
    pub fn lines(&mut self) -> Lines<'_, 'a, S> {
        Lines { reader: self }
    }

    /// Whether every byte of the stream has been consumed. May block while it
    /// asks the stream for more data.
    pub fn is_end_of_stream(&mut self) -> StreamResult<bool> {
        self.ensure_usable()?;
        self.buffer.at_end(&mut *self.stream)
    }

    /// Discard buffered data so the next read starts from the stream's
    /// current position. Use after moving the stream externally.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.ensure_usable()?;
        self.buffer.discard(&mut *self.stream)
    }

    /// Release the reader. The stream itself stays open.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.buffer.clear();
            tracing::debug!("Stream reader disposed");
        }
    }

    /// Whether [`StreamReader::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Iterator returned by [`StreamReader::lines`].
#[derive(Debug)]
pub struct Lines<'r, 'a, S: Stream + ?Sized> {
    reader: &'r mut StreamReader<'a, S>,
}

impl<S: Stream + ?Sized> Iterator for Lines<'_, '_, S> {
    type Item = StreamResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_line().transpose()
    }
}
