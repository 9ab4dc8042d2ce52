//! The byte stream contract.
//!
//! [`Stream`] is implemented by concrete devices (memory buffers, pipes, files,
//! sockets). Readers, writers and the copier only ever talk to this trait.

use streamio_core::{Capabilities, SeekOrigin, DEFAULT_BUFFER_SIZE};

use crate::error::{StreamError, StreamResult};

/// Largest buffer [`Stream::read`] allocates when the remaining length is unknown.
pub const UNSIZED_READ_LIMIT: usize = DEFAULT_BUFFER_SIZE * 16;

/// A possibly-seekable source/sink of bytes with fixed capability flags.
///
/// Implementations check, in order: disposal, capability, arguments. A failed
/// `read`/`write` must leave the position where it was.
pub trait Stream {
    /// Capability flags, fixed at construction.
    fn capabilities(&self) -> Capabilities;

    /// Is the stream able to be read from.
    fn can_read(&self) -> bool {
        self.capabilities().can_read
    }

    /// Is the stream able to be written to.
    fn can_write(&self) -> bool {
        self.capabilities().can_write
    }

    /// Is the stream pointer able to be adjusted.
    fn can_seek(&self) -> bool {
        self.capabilities().can_seek
    }

    /// Is the stream able to time out.
    fn can_timeout(&self) -> bool {
        self.capabilities().can_timeout
    }

    /// Whether [`Stream::dispose`] has been called.
    fn is_disposed(&self) -> bool;

    /// Length of the stream contents in bytes, `None` if unknown.
    fn length(&self) -> StreamResult<Option<u64>>;

    /// Current byte offset, `None` if unknown. For seekable streams the value
    /// is usable with [`SeekOrigin::Origin`].
    fn position(&self) -> StreamResult<Option<u64>>;

    /// Read up to `buf.len()` bytes into `buf`.
    ///
    /// Blocks until at least one byte is available, the end of the stream is
    /// reached, or an error occurs. May return fewer bytes than requested
    /// without being at the end. Returns `0` only at the true end of data.
    /// An empty `buf` fails with [`StreamError::InvalidArgument`].
    fn read_into(&mut self, buf: &mut [u8]) -> StreamResult<usize>;

    /// Read up to `length` bytes. An empty result means end of data.
    ///
    /// The buffer is sized to the bytes remaining when length and position are
    /// known, and to at most [`UNSIZED_READ_LIMIT`] bytes otherwise; a larger
    /// `length` yields a short read.
    fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
        if length == 0 {
            check_readable(self, "read")?;
            return Err(StreamError::invalid_argument("length", "must be positive"));
        }
        let capacity = match (self.length(), self.position()) {
            (Ok(Some(end)), Ok(Some(position))) => {
                let remaining = usize::try_from(end.saturating_sub(position)).unwrap_or(usize::MAX);
                length.min(remaining.max(1))
            }
            _ => length.min(UNSIZED_READ_LIMIT),
        };
        let mut buf = vec![0u8; capacity];
        let n = self.read_into(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Write all of `data` at the current position.
    fn write(&mut self, data: &[u8]) -> StreamResult<()>;

    /// Write at most `length` bytes of `data`.
    fn write_len(&mut self, data: &[u8], length: usize) -> StreamResult<()> {
        let n = length.min(data.len());
        self.write(&data[..n])
    }

    /// Move the stream pointer and return the new absolute position.
    ///
    /// Positions past the end are allowed; a negative result fails with
    /// [`StreamError::InvalidArgument`].
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> StreamResult<u64>;

    /// Truncate or extend the stream. Extended content is undefined.
    /// Requires write and seek capability; a zero length is rejected.
    fn set_length(&mut self, length: u64) -> StreamResult<()>;

    /// Read timeout in milliseconds, `None` when timeouts are unsupported.
    fn read_timeout(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(None)
    }

    /// Set the read timeout in milliseconds.
    fn set_read_timeout(&mut self, _ms: u64) -> StreamResult<()> {
        check_open(self)?;
        Err(timeouts_unsupported())
    }

    /// Write timeout in milliseconds, `None` when timeouts are unsupported.
    fn write_timeout(&self) -> StreamResult<Option<u64>> {
        check_open(self)?;
        Ok(None)
    }

    /// Set the write timeout in milliseconds.
    fn set_write_timeout(&mut self, _ms: u64) -> StreamResult<()> {
        check_open(self)?;
        Err(timeouts_unsupported())
    }

    /// Push any buffered writes to the underlying device.
    fn flush(&mut self) -> StreamResult<()>;

    /// Release the underlying resources. Idempotent.
    fn dispose(&mut self);

    /// Pump the rest of this stream into `destination`, returning the number of
    /// bytes copied. `buffer_size` defaults to [`DEFAULT_BUFFER_SIZE`].
    fn copy_to(
        &mut self,
        destination: &mut dyn Stream,
        buffer_size: Option<usize>,
    ) -> StreamResult<u64> {
        crate::copier::copy(self, destination, buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE))
    }
}

/// Fail with [`StreamError::ObjectDisposed`] once `stream` is disposed.
pub fn check_open<S: Stream + ?Sized>(stream: &S) -> StreamResult<()> {
    if stream.is_disposed() {
        return Err(StreamError::disposed("stream"));
    }
    Ok(())
}

/// Disposal and `can_read` check for `operation`.
pub fn check_readable<S: Stream + ?Sized>(stream: &S, operation: &'static str) -> StreamResult<()> {
    check_open(stream)?;
    if !stream.can_read() {
        return Err(StreamError::not_supported(operation));
    }
    Ok(())
}

/// Disposal and `can_write` check for `operation`.
pub fn check_writable<S: Stream + ?Sized>(stream: &S, operation: &'static str) -> StreamResult<()> {
    check_open(stream)?;
    if !stream.can_write() {
        return Err(StreamError::not_supported(operation));
    }
    Ok(())
}

/// Disposal and `can_seek` check for `operation`.
pub fn check_seekable<S: Stream + ?Sized>(stream: &S, operation: &'static str) -> StreamResult<()> {
    check_open(stream)?;
    if !stream.can_seek() {
        return Err(StreamError::not_supported(operation));
    }
    Ok(())
}

/// Resolve `offset` against `origin`, rejecting negative or overflowing results.
pub fn resolve_seek(offset: i64, origin: SeekOrigin, current: u64, length: u64) -> StreamResult<u64> {
    let base = match origin {
        SeekOrigin::Origin => 0,
        SeekOrigin::Current => current,
        SeekOrigin::End => length,
    };
    let target = i128::from(base) + i128::from(offset);
    if target < 0 {
        return Err(StreamError::invalid_argument(
            "offset",
            format!("seek to {} lands before the start of the stream", target),
        ));
    }
    u64::try_from(target)
        .map_err(|_| StreamError::invalid_argument("offset", "seek target overflows"))
}

fn timeouts_unsupported() -> StreamError {
    StreamError::InvalidOperation("timeouts are not supported by this stream".to_string())
}
