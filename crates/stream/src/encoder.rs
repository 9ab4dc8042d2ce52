//! Character to UTF-8 byte conversion for writers.

use crate::error::StreamResult;
use crate::stream::Stream;
use crate::utf8::REPLACEMENT_CHARACTER;

/// Encoded output waiting to be forwarded to a stream.
///
/// Characters are encoded as soon as they arrive; only bytes are held. With a
/// capacity of zero every write goes straight through.
#[derive(Debug, Default)]
pub struct EncodingBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl EncodingBuffer {
    /// Buffer holding up to `capacity` bytes before forwarding.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Encoded bytes not yet forwarded.
    pub fn pending(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of encoded bytes not yet forwarded.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing is waiting to be forwarded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the pending bytes should be forwarded now.
    pub fn is_full(&self) -> bool {
        !self.bytes.is_empty() && self.bytes.len() >= self.capacity
    }

    /// Append the UTF-8 form of `text`.
    pub fn encode_str(&mut self, text: &str) {
        self.bytes.extend_from_slice(text.as_bytes());
    }

    /// Append one character.
    pub fn encode_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        self.bytes.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
    }

    /// Append UTF-16 code units, substituting each unpaired surrogate.
    /// Returns the number of substitutions.
    pub fn encode_utf16(&mut self, units: &[u16]) -> usize {
        let mut substituted = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            let c = decoded.unwrap_or_else(|_| {
                substituted += 1;
                REPLACEMENT_CHARACTER
            });
            self.encode_char(c);
        }
        substituted
    }

    /// Append code point values, substituting each surrogate or out-of-range
    /// value. Returns the number of substitutions.
    pub fn encode_code_points(&mut self, values: &[u32]) -> usize {
        let mut substituted = 0;
        for &value in values {
            let c = char::from_u32(value).unwrap_or_else(|| {
                substituted += 1;
                REPLACEMENT_CHARACTER
            });
            self.encode_char(c);
        }
        substituted
    }

    /// Drop bytes appended after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Forward all pending bytes to `stream` in one write. On error the bytes
    /// stay pending.
    pub fn drain_to<S: Stream + ?Sized>(&mut self, stream: &mut S) -> StreamResult<usize> {
        if self.bytes.is_empty() {
            return Ok(0);
        }
        stream.write(&self.bytes)?;
        let n = self.bytes.len();
        self.bytes.clear();
        tracing::trace!(bytes = n, "Forwarded encoded output");
        Ok(n)
    }
}
