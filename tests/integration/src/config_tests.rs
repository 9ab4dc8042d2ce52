//! Configuration documents driving the stream layer

use crate::test_utils::*;
use serde_json::json;
use streamio_core::{Capabilities, Config, CoreError, FileAccess, FileMode, LineSeparator, SeekOrigin};
use streamio_stream::{MemoryStream, Stream, StreamCopier, StreamReader, StreamWriter};

const DOCUMENT: &str = r#"
[reader]
chunk_size = 2

[writer]
line_separator = "crlf"
buffer_capacity = 8

[copy]
buffer_size = 3
"#;

#[test]
fn test_document_configures_every_component() {
    init_test_logging();
    let config = Config::from_toml_str(DOCUMENT).unwrap();
    assert_eq!(config.writer.line_separator, LineSeparator::CrLf);

    let mut stream = MemoryStream::new();
    {
        let mut writer = StreamWriter::with_config(&mut stream, &config.writer).unwrap();
        writer.write_line("één").unwrap();
        assert_eq!(writer.pending_len(), 7);
        writer.write_line("twee").unwrap();
        assert_eq!(writer.pending_len(), 2);
    }
    assert_eq!(stream.as_bytes(), "één\r\ntwee\r\n".as_bytes());

    stream.seek(0, SeekOrigin::Origin).unwrap();
    let mut copy = MemoryStream::new();
    let copier = StreamCopier::with_config(&config.copy).unwrap();
    assert_eq!(copier.buffer_size(), 3);
    assert_eq!(copier.copy(&mut stream, &mut copy).unwrap(), 13);

    copy.seek(0, SeekOrigin::Origin).unwrap();
    let mut reader = StreamReader::with_config(&mut copy, &config.reader).unwrap();
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("één"));
    assert_eq!(reader.read_line().unwrap().as_deref(), Some("twee"));
    assert!(reader.is_end_of_stream().unwrap());
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
}

#[test]
fn test_invalid_documents() {
    assert!(matches!(
        Config::from_toml_str("[reader]\nchunk_size = 0\n"),
        Err(CoreError::InvalidConfig(_))
    ));
    assert!(matches!(
        Config::from_toml_str("[reader]\nchunk_size = \"large\"\n"),
        Err(CoreError::Parse(_))
    ));
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("streamio-config-{}.toml", std::process::id()));
    std::fs::write(&path, DOCUMENT).unwrap();
    let loaded = Config::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    let config = loaded.unwrap();
    assert_eq!(config.reader.chunk_size, 2);
    assert_eq!(config.copy.buffer_size, 3);
}

#[test]
fn test_capabilities_serialize_as_flags() {
    let value = serde_json::to_value(Capabilities::read_only().seekable()).unwrap();
    assert_eq!(
        value,
        json!({
            "can_read": true,
            "can_write": false,
            "can_seek": true,
            "can_timeout": false,
        })
    );

    let stream = MemoryStream::read_only(Vec::new());
    let round: Capabilities = serde_json::from_value(value).unwrap();
    assert_eq!(round, stream.capabilities());
}

#[test]
fn test_mode_and_access_from_json() {
    let (mode, access): (FileMode, FileAccess) =
        serde_json::from_value(json!(["open-create", "read-write"])).unwrap();
    assert_eq!(mode, FileMode::OpenOrCreate);
    assert_eq!(access, FileAccess::ReadWrite);
    assert!(mode.check_access(access).is_ok());

    assert!(FileMode::Append.check_access(FileAccess::Read).is_err());
}
