use std::io::Cursor;
use std::path::{Path, PathBuf};

use postgen::error::Error;
use postgen::hooks::{get_base_dir, HookPayload};
use serde_json::json;

#[test]
fn test_full_payload() {
    let content = r#"{
        "template_dir": "/path/to/template",
        "output_dir": "/path/to/output",
        "context": {"database": "sqlite", "render_html": false}
    }"#;
    let payload = HookPayload::from_json(content).unwrap();

    assert_eq!(payload.template_dir(), Some(PathBuf::from("/path/to/template")));
    assert_eq!(payload.output_dir(), Some(PathBuf::from("/path/to/output")));
    assert_eq!(payload.context(), json!({"database": "sqlite", "render_html": false}));
}

#[test]
fn test_empty_payload() {
    let payload = HookPayload::from_json("").unwrap();
    assert_eq!(payload.template_dir(), None);
    assert_eq!(payload.output_dir(), None);
    assert_eq!(payload.context(), json!({}));
}

#[test]
fn test_missing_and_null_fields() {
    let payload = HookPayload::from_json(r#"{"output_dir": "", "context": null}"#).unwrap();
    assert_eq!(payload.output_dir(), None);
    assert_eq!(payload.context(), json!({}));
}

#[test]
fn test_invalid_payload() {
    let result = HookPayload::from_json(r#"{"context": {"key": "value""#);
    match result {
        Err(Error::HookError(msg)) => assert!(msg.contains("Failed to parse payload as JSON")),
        other => panic!("Expected HookError, got {:?}", other),
    }

    assert!(matches!(HookPayload::from_json(r#"{"context": 42}"#), Err(Error::HookError(_))));
}

#[test]
fn test_read_from_reader() {
    let reader = Cursor::new(br#"{"output_dir": "out", "context": {"a": 1}}"#.to_vec());
    let payload = HookPayload::read_from(reader).unwrap();
    assert_eq!(payload.output_dir(), Some(PathBuf::from("out")));
    assert_eq!(payload.context(), json!({"a": 1}));
}

#[test]
fn test_base_dir_precedence() {
    let payload = HookPayload::from_json(r#"{"output_dir": "/generated"}"#).unwrap();

    let base = get_base_dir(Some(Path::new("/override")), &payload).unwrap();
    assert_eq!(base, PathBuf::from("/override"));

    let base = get_base_dir(None, &payload).unwrap();
    assert_eq!(base, PathBuf::from("/generated"));

    let empty = HookPayload::from_json("").unwrap();
    let base = get_base_dir(None, &empty).unwrap();
    assert_eq!(base, std::env::current_dir().unwrap());
}
