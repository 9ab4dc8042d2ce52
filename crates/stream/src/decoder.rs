//! Incremental UTF-8 decoding over a [`Stream`].
//!
//! [`DecodingBuffer`] pulls fixed-size chunks from a stream and hands out
//! validated characters. Bytes that were pulled but not yet handed out stay in
//! the buffer: complete sequences as read-ahead, and at most three trailing
//! bytes of a character cut off by the chunk boundary. Those trailing bytes
//! wait for the next pull to complete them, or become one substitute once the
//! stream reports its end.

use streamio_core::{ReaderConfig, SeekOrigin};
use tracing::{debug, trace};

use crate::error::{StreamError, StreamResult};
use crate::stream::Stream;
use crate::utf8::{decode_lossy, decode_step, Step, REPLACEMENT_CHARACTER};

/// Byte accumulator and decode state for one reader.
#[derive(Debug)]
pub struct DecodingBuffer {
    buf: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    exhausted: bool,
    /// Stream position right after the last pull, when the stream is seekable.
    fill_mark: Option<u64>,
}

impl DecodingBuffer {
    /// Buffer pulling `chunk_size` bytes at a time.
    pub fn new(chunk_size: usize) -> StreamResult<Self> {
        if chunk_size == 0 {
            return Err(StreamError::invalid_argument("chunk_size", "must be positive"));
        }
        Ok(Self {
            buf: Vec::with_capacity(chunk_size),
            pos: 0,
            chunk_size,
            exhausted: false,
            fill_mark: None,
        })
    }

    /// Buffer sized from `config`.
    pub fn with_config(config: &ReaderConfig) -> StreamResult<Self> {
        Self::new(config.chunk_size)
    }

    /// Bytes requested per pull.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Pulled bytes not yet turned into characters.
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    /// Whether the stream has reported the end of its data.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Pull one chunk from `stream`, returning the number of bytes received.
    /// A zero-byte pull marks the buffer exhausted. On error nothing changes.
    pub fn fill<S: Stream + ?Sized>(&mut self, stream: &mut S) -> StreamResult<usize> {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        let start = self.buf.len();
        self.buf.resize(start + self.chunk_size, 0);
        let n = match stream.read_into(&mut self.buf[start..]) {
            Ok(n) => n,
            Err(e) => {
                self.buf.truncate(start);
                return Err(e);
            }
        };
        self.buf.truncate(start + n);
        if n == 0 {
            self.exhausted = true;
        }
        if stream.can_seek() {
            self.fill_mark = match stream.position() {
                Ok(position) => position,
                Err(e) => {
                    debug!(error = %e, "Position unavailable after pull; flush will not rewind");
                    None
                }
            };
        }
        trace!(
            requested = self.chunk_size,
            received = n,
            buffered = self.buf.len(),
            "Pulled chunk from stream"
        );
        Ok(n)
    }

    /// Move up to `max_chars` characters from the buffer into `out` without
    /// touching the stream. Returns how many were produced.
    pub fn decode(&mut self, max_chars: usize, out: &mut String) -> usize {
        let mut produced = 0;
        while produced < max_chars && self.pos < self.buf.len() {
            match decode_step(&self.buf[self.pos..]) {
                Step::Char(c, width) => {
                    out.push(c);
                    self.pos += width;
                }
                Step::Invalid(width) => {
                    trace!(offset = self.pos, width, "Substituting ill-formed sequence");
                    out.push(REPLACEMENT_CHARACTER);
                    self.pos += width;
                }
                Step::Incomplete if self.exhausted => {
                    trace!(
                        width = self.buf.len() - self.pos,
                        "Substituting sequence truncated by end of stream"
                    );
                    out.push(REPLACEMENT_CHARACTER);
                    self.pos = self.buf.len();
                }
                Step::Incomplete => break,
            }
            produced += 1;
        }
        produced
    }

    /// Read between 1 and `max_chars` characters, pulling from `stream` only
    /// while nothing has been produced. `None` means no data remains.
    pub fn read_chars<S: Stream + ?Sized>(
        &mut self,
        stream: &mut S,
        max_chars: usize,
    ) -> StreamResult<Option<String>> {
        if max_chars == 0 {
            return Err(StreamError::invalid_argument("max_chars", "must be positive"));
        }
        let mut out = String::new();
        loop {
            if self.decode(max_chars, &mut out) > 0 {
                return Ok(Some(out));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fill(stream)?;
        }
    }

    /// Read up to the next `\n`, consuming it. A `\r` right before the `\n` is
    /// dropped too. At the end of the stream any partial line is returned.
    ///
    /// Nothing is consumed unless a line is returned, so a failed pull leaves
    /// the buffer as it was.
    pub fn read_line<S: Stream + ?Sized>(&mut self, stream: &mut S) -> StreamResult<Option<String>> {
        // 0x0A never occurs inside a multi-byte sequence, so the raw bytes can
        // be searched directly.
        let mut scanned = 0;
        loop {
            let pending = &self.buf[self.pos..];
            if let Some(i) = pending[scanned..].iter().position(|&b| b == b'\n') {
                let newline = scanned + i;
                let content = match pending[..newline].last() {
                    Some(b'\r') => &pending[..newline - 1],
                    _ => &pending[..newline],
                };
                let line = decode_lossy(content);
                self.pos += newline + 1;
                return Ok(Some(line));
            }
            scanned = pending.len();

            if self.exhausted {
                if pending.is_empty() {
                    return Ok(None);
                }
                let line = decode_lossy(pending);
                self.pos = self.buf.len();
                return Ok(Some(line));
            }
            self.fill(stream)?;
        }
    }

    /// True once every pulled byte is consumed and the stream is exhausted.
    /// May pull from `stream` to find out.
    pub fn at_end<S: Stream + ?Sized>(&mut self, stream: &mut S) -> StreamResult<bool> {
        if self.pos < self.buf.len() {
            return Ok(false);
        }
        if !self.exhausted {
            self.fill(stream)?;
        }
        Ok(self.exhausted && self.pos >= self.buf.len())
    }

    /// Drop all buffered bytes and the end-of-stream flag.
    ///
    /// If `stream` has not moved since the last pull, it is rewound over the
    /// unconsumed bytes so the next read sees them again. If it has moved, the
    /// next read starts from wherever it now is. A stream that cannot seek
    /// cannot have moved either, so its unconsumed bytes are kept.
    pub fn discard<S: Stream + ?Sized>(&mut self, stream: &mut S) -> StreamResult<()> {
        if !stream.can_seek() {
            self.exhausted = false;
            self.fill_mark = None;
            return Ok(());
        }
        let unread = self.buf.len() - self.pos;
        let rewind = match self.fill_mark {
            Some(mark) if unread > 0 => stream.position()? == Some(mark),
            _ => false,
        };
        if rewind {
            let offset = i64::try_from(unread)
                .map_err(|_| StreamError::invalid_argument("offset", "rewind too large"))?;
            stream.seek(-offset, SeekOrigin::Current)?;
            trace!(rewound = unread, "Rewound stream over discarded read-ahead");
        }
        self.clear();
        Ok(())
    }

    /// Forget all state without touching the stream.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.pos = 0;
        self.exhausted = false;
        self.fill_mark = None;
    }
}
