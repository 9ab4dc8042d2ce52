//! Streamio Stream
//!
//! A byte stream contract with UTF-8 text readers and writers layered on top,
//! plus a fixed-buffer stream copier.

#![warn(missing_docs)]

pub mod copier;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod memory;
pub mod pipe;
pub mod reader;
pub mod stream;
pub mod utf8;
pub mod writer;

pub use copier::StreamCopier;
pub use decoder::DecodingBuffer;
pub use encoder::EncodingBuffer;
pub use error::{StreamError, StreamResult};
pub use memory::MemoryStream;
pub use pipe::{PipeStream, SinkStream};
pub use reader::{Lines, StreamReader};
pub use stream::Stream;
pub use utf8::REPLACEMENT_CHARACTER;
pub use writer::StreamWriter;

pub use streamio_core::{Capabilities, SeekOrigin};
