//! Integration tests for host startup through [`HostSession`].

mod common;

use common::{HELLO_WAT, START_WAT, SharedBuffer, wasm};
use std::sync::Arc;
use wasmlog_core::logging::{LineFormat, LogCollector, WriterCollector};
use wasmlog_host::HostConfig;
use wasmlog_host::wasm::{ModuleSource, WasmRuntimeConfig};

fn quiet_config() -> HostConfig {
    HostConfig::default()
        .with_echo_to_console(false)
        .with_runtime(WasmRuntimeConfig::testing())
}

#[tokio::test]
async fn test_start_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hshg.wasm");
    std::fs::write(&path, wasm(HELLO_WAT)).unwrap();

    let config = quiet_config().with_module(&path);
    let mut session = wasmlog_host::HostSession::start(config).await.unwrap();

    assert!(session.records().is_empty());
    assert_eq!(session.instance().module_name(), "hshg.wasm");

    session.instance_mut().call_void("hello").unwrap();

    let records = session.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "Hello");
    assert_eq!(records[0].instance_id, Some(session.instance().id()));
}

#[tokio::test]
async fn test_start_missing_module() {
    let dir = tempfile::tempdir().unwrap();
    let config = quiet_config().with_module(dir.path().join("hshg.wasm"));

    let err = wasmlog_host::HostSession::start(config)
        .await
        .err()
        .expect("missing module should fail startup");

    assert_eq!(err.code(), "E101");
    assert!(err.is_startup_error());
}

#[tokio::test]
async fn test_start_invalid_module() {
    let config = quiet_config();
    let source = ModuleSource::bytes("garbage.wasm", b"not wasm".to_vec());

    let err = wasmlog_host::HostSession::start_with_source(config, source)
        .await
        .err()
        .expect("invalid module should fail startup");

    assert_eq!(err.code(), "E102");
}

#[tokio::test]
async fn test_start_rejects_invalid_config() {
    let config = quiet_config().with_buffer_capacity(0);
    let source = ModuleSource::bytes("hello.wasm", wasm(HELLO_WAT));

    let err = wasmlog_host::HostSession::start_with_source(config, source)
        .await
        .err()
        .expect("zero capacity should be rejected");

    assert_eq!(err.code(), "E802");
}

#[test]
fn test_start_blocking_from_bytes() {
    let source = ModuleSource::bytes("hello.wasm", wasm(HELLO_WAT));
    let mut session =
        wasmlog_host::HostSession::start_blocking_with_source(quiet_config(), source).unwrap();

    session.instance_mut().call_void("hello").unwrap();
    session.instance_mut().call_void("invalid_utf8").unwrap();

    let messages: Vec<String> = session.records().into_iter().map(|r| r.message).collect();
    assert_eq!(messages, vec!["Hello", "H\u{FFFD}i"]);
}

#[test]
fn test_start_function_records_available_after_start() {
    let source = ModuleSource::bytes("start.wasm", wasm(START_WAT));
    let session =
        wasmlog_host::HostSession::start_blocking_with_source(quiet_config(), source).unwrap();

    let records = session.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "booted");
    assert_eq!(records[0].module.as_deref(), Some("start.wasm"));
}

#[test]
fn test_buffer_capacity_bounds_records() {
    let source = ModuleSource::bytes("hello.wasm", wasm(HELLO_WAT));
    let config = quiet_config().with_buffer_capacity(2);
    let mut session = wasmlog_host::HostSession::start_blocking_with_source(config, source).unwrap();

    session
        .instance_mut()
        .call("log_n", &[wasmtime::Val::I32(5)])
        .unwrap();

    assert_eq!(session.records().len(), 2);
    assert_eq!(session.instance().bridge_calls(), 5);
}

#[test]
fn test_echo_to_console_still_buffers() {
    let source = ModuleSource::bytes("hello.wasm", wasm(HELLO_WAT));
    let config = quiet_config().with_echo_to_console(true);
    let mut session = wasmlog_host::HostSession::start_blocking_with_source(config, source).unwrap();

    session.instance_mut().call_void("hello").unwrap();

    assert_eq!(session.records().len(), 1);
}

#[test]
fn test_sink_sees_records_the_buffer_evicts() {
    let output = SharedBuffer::default();
    let sink = Arc::new(WriterCollector::new(output.clone(), LineFormat::Text));
    let source = ModuleSource::bytes("hello.wasm", wasm(HELLO_WAT));
    let config = quiet_config().with_buffer_capacity(2);
    let mut session = wasmlog_host::HostSession::start_blocking_with_sink(
        config,
        source,
        sink.clone() as Arc<dyn LogCollector>,
    )
    .unwrap();

    session.instance_mut().call_void("log_five").unwrap();

    assert_eq!(session.records().len(), 2);
    assert_eq!(sink.len(), 5);
    let lines = output.lines();
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|line| line.ends_with("Hello")));
}

#[tokio::test]
async fn test_sink_sees_start_function_records() {
    let output = SharedBuffer::default();
    let sink = Arc::new(WriterCollector::new(output.clone(), LineFormat::Json));
    let source = ModuleSource::bytes("start.wasm", wasm(START_WAT));

    let _session = wasmlog_host::HostSession::start_with_sink(quiet_config(), source, sink)
        .await
        .unwrap();

    let lines = output.lines();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record["message"], "booted");
    assert_eq!(record["id"], 1);
}
