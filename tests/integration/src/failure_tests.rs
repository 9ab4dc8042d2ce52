//! Behaviour when the underlying stream fails part-way
//!
//! Failures propagate unchanged, nothing already buffered is lost, and a
//! healed stream picks up where it left off.

use crate::test_utils::*;
use std::io;
use streamio_core::{ReaderConfig, WriterConfig};
use streamio_stream::{
    MemoryStream, PipeStream, Stream, StreamCopier, StreamError, StreamReader, StreamWriter,
};

fn is_injected(err: &StreamError) -> bool {
    matches!(err, StreamError::Io(e) if e.kind() == io::ErrorKind::ConnectionReset)
}

#[test]
fn test_failed_pull_keeps_read_ahead() {
    init_test_logging();
    let mut stream =
        FaultyStream::new(MemoryStream::from_bytes(b"hello world\nrest".to_vec())).failing_reads_after(2);
    let mut reader = StreamReader::with_config(&mut stream, &ReaderConfig { chunk_size: 4 }).unwrap();

    let err = reader.read_line().unwrap_err();
    assert!(is_injected(&err), "unexpected error {:?}", err);
    assert!(is_injected(&reader.read_line().unwrap_err()));

    let inner = reader.base_stream_mut().unwrap();
    assert_eq!(inner.position().unwrap(), Some(8));
    inner.heal();

    assert_eq!(reader.read_line().unwrap().as_deref(), Some("hello world"));
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("rest"));
    assert_eq!(reader.read_line().unwrap(), None);
}

#[test]
fn test_failed_pull_during_char_read() {
    let mut stream = FaultyStream::new(MemoryStream::from_bytes("a€b".as_bytes().to_vec())).failing_reads_after(1);
    let mut reader = StreamReader::with_config(&mut stream, &ReaderConfig { chunk_size: 2 }).unwrap();

    // First pull yields "a" plus the lead byte of "€"
    assert_eq!(reader.read(5).unwrap().as_deref(), Some("a"));
    assert!(is_injected(&reader.read(5).unwrap_err()));

    reader.base_stream_mut().unwrap().heal();
    assert_eq!(reader.read_to_end().unwrap(), "€b");
}

#[test]
fn test_copy_stops_at_first_write_failure() {
    let payload: Vec<u8> = (0u8..10).collect();
    let mut source = MemoryStream::from_bytes(payload.clone());
    let mut destination = FaultyStream::new(MemoryStream::new()).failing_writes_after(2);

    let err = StreamCopier::new(3)
        .unwrap()
        .copy(&mut source, &mut destination)
        .unwrap_err();
    assert!(is_injected(&err));
    assert_eq!(destination.contents(), &payload[..6]);
    assert_eq!(source.position().unwrap(), Some(9));
}

#[test]
fn test_copy_propagates_read_failure() {
    let mut source = FaultyStream::new(MemoryStream::from_bytes(vec![1u8; 64])).failing_reads_after(3);
    let mut destination = MemoryStream::new();

    let err = source.copy_to(&mut destination, Some(8)).unwrap_err();
    assert!(is_injected(&err));
    assert_eq!(destination.as_bytes().len(), 24);
}

#[test]
fn test_write_through_failure_drops_only_that_call() {
    let mut stream = FaultyStream::new(MemoryStream::new()).failing_writes_after(1);
    {
        let mut writer = StreamWriter::new(&mut stream).unwrap();
        writer.write("ok").unwrap();
        assert!(is_injected(&writer.write("lost").unwrap_err()));
        assert_eq!(writer.pending_len(), 0);

        writer.base_stream_mut().unwrap().heal();
        writer.write("back").unwrap();
    }
    assert_eq!(stream.contents(), b"okback");
}

#[test]
fn test_buffered_failure_keeps_earlier_bytes() {
    let mut stream = FaultyStream::new(MemoryStream::new()).failing_writes_after(0);
    {
        let config = WriterConfig {
            buffer_capacity: 4,
            ..WriterConfig::default()
        };
        let mut writer = StreamWriter::with_config(&mut stream, &config).unwrap();
        writer.write("ab").unwrap();
        assert!(is_injected(&writer.write("cdef").unwrap_err()));
        assert_eq!(writer.pending_len(), 2);

        assert!(is_injected(&writer.flush().unwrap_err()));
        assert_eq!(writer.pending_len(), 2);

        writer.base_stream_mut().unwrap().heal();
        writer.flush().unwrap();
        assert_eq!(writer.pending_len(), 0);
    }
    assert_eq!(stream.contents(), b"ab");
    assert_eq!(stream.flushes, 1);
}

#[test]
fn test_write_line_text_visible_when_separator_fails() {
    let mut stream = FaultyStream::new(MemoryStream::new()).failing_writes_after(1);
    {
        let mut writer = StreamWriter::new(&mut stream).unwrap();
        assert!(is_injected(&writer.write_line("text").unwrap_err()));
    }
    assert_eq!(stream.contents(), b"text");
}

#[test]
fn test_failed_dispose_leaves_writer_usable() {
    let mut stream = FaultyStream::new(MemoryStream::new()).failing_writes_after(0);
    {
        let config = WriterConfig {
            buffer_capacity: 64,
            ..WriterConfig::default()
        };
        let mut writer = StreamWriter::with_config(&mut stream, &config).unwrap();
        writer.write("pending").unwrap();

        assert!(is_injected(&writer.dispose().unwrap_err()));
        assert!(!writer.is_disposed());

        writer.base_stream_mut().unwrap().heal();
        writer.dispose().unwrap();
        assert!(writer.is_disposed());
    }
    assert_eq!(stream.contents(), b"pending");
}

#[test]
fn test_drop_with_failing_stream_does_not_panic() {
    let mut stream = FaultyStream::new(MemoryStream::new()).failing_writes_after(0);
    {
        let config = WriterConfig {
            buffer_capacity: 64,
            ..WriterConfig::default()
        };
        let mut writer = StreamWriter::with_config(&mut stream, &config).unwrap();
        writer.write("never arrives").unwrap();
    }
    assert!(stream.contents().is_empty());
}

#[test]
fn test_writer_flush_reaches_stream_but_reader_flush_does_not() {
    let mut stream = FaultyStream::new(MemoryStream::new());
    {
        let mut writer = StreamWriter::new(&mut stream).unwrap();
        writer.write("abc").unwrap();
        writer.flush().unwrap();
        writer.flush().unwrap();
    }
    assert_eq!(stream.flushes, 2);

    stream.seek(0, streamio_core::SeekOrigin::Origin).unwrap();
    {
        let mut reader = StreamReader::new(&mut stream).unwrap();
        assert_eq!(reader.read(1).unwrap().as_deref(), Some("a"));
        reader.flush().unwrap();
        assert_eq!(reader.read(5).unwrap().as_deref(), Some("bc"));
    }
    assert_eq!(stream.flushes, 2);
}

#[test]
fn test_flush_on_forward_only_stream_keeps_read_ahead() {
    let text = "abcdefgh\nünïcödé 😀\n";
    let straight = {
        let mut pipe = PipeStream::new(text.as_bytes());
        let mut reader = StreamReader::with_config(&mut pipe, &ReaderConfig { chunk_size: 5 }).unwrap();
        reader.read_to_end().unwrap()
    };

    let mut pipe = PipeStream::new(text.as_bytes());
    let mut reader = StreamReader::with_config(&mut pipe, &ReaderConfig { chunk_size: 5 }).unwrap();
    let mut flushed = String::new();
    while let Some(part) = reader.read(3).unwrap() {
        flushed.push_str(&part);
        reader.flush().unwrap();
    }
    assert_eq!(flushed, straight);
    assert!(reader.is_end_of_stream().unwrap());
}

#[test]
fn test_disposing_base_stream_stops_buffered_reader() {
    let mut stream = MemoryStream::from_bytes(b"first\nsecond\n".to_vec());
    let mut reader = StreamReader::new(&mut stream).unwrap();
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("first"));

    reader.base_stream_mut().unwrap().dispose();
    assert!(reader.read_line().unwrap_err().is_disposed());
    assert!(reader.read(1).unwrap_err().is_disposed());
    assert!(reader.is_end_of_stream().unwrap_err().is_disposed());
}

#[test]
fn test_disposing_base_stream_stops_buffered_writer() {
    let mut stream = MemoryStream::new();
    {
        let config = WriterConfig {
            buffer_capacity: 32,
            ..WriterConfig::default()
        };
        let mut writer = StreamWriter::with_config(&mut stream, &config).unwrap();
        writer.write("queued").unwrap();

        writer.base_stream_mut().unwrap().dispose();
        assert!(writer.write("x").unwrap_err().is_disposed());
        assert!(writer.write_line("x").unwrap_err().is_disposed());
        assert!(writer.flush().unwrap_err().is_disposed());
        assert_eq!(writer.pending_len(), 6);
    }
    assert!(stream.as_bytes().is_empty());
}
