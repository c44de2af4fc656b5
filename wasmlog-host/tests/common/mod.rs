//! Common test utilities for integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use wasmlog_core::error::Result;
use wasmlog_core::logging::BufferedCollector;
use wasmlog_host::wasm::{BridgeConfig, ModuleInstance, WasmRuntime, WasmRuntimeConfig};

/// A module that logs from a one-page memory holding "Hello" at offset 0
/// and an invalid UTF-8 sequence at offset 16.
pub const HELLO_WAT: &str = r#"
    (module
        (import "imports" "console_log" (func $log (param i32 i32)))
        (memory (export "memory") 1)
        (data (i32.const 0) "Hello")
        (data (i32.const 16) "H\ffi")
        (func (export "hello")
            (call $log (i32.const 0) (i32.const 5)))
        (func (export "empty")
            (call $log (i32.const 0) (i32.const 0)))
        (func (export "invalid_utf8")
            (call $log (i32.const 16) (i32.const 3)))
        (func (export "log") (param i32 i32)
            (call $log (local.get 0) (local.get 1)))
        (func (export "log_then_clobber")
            (call $log (i32.const 0) (i32.const 5))
            (i32.store8 (i32.const 0) (i32.const 74)))
        (func $log_n (export "log_n") (param $n i32)
            (block $done
                (loop $next
                    (br_if $done (i32.eqz (local.get $n)))
                    (call $log (i32.const 0) (i32.const 5))
                    (local.set $n (i32.sub (local.get $n) (i32.const 1)))
                    (br $next))))
        (func (export "log_five")
            (call $log_n (i32.const 5)))
        (func (export "grow") (result i32)
            (memory.grow (i32.const 1)))
        (func (export "boom")
            unreachable))
"#;

/// A module whose bridge import carries auxiliary values.
pub const AUX_WAT: &str = r#"
    (module
        (import "imports" "console_log" (func $log (param i32 i32 i32 f64 i64)))
        (memory (export "memory") 1)
        (data (i32.const 0) "cells")
        (func (export "stats")
            (call $log (i32.const 0) (i32.const 5)
                (i32.const 7) (f64.const 2.5) (i64.const -1))))
"#;

/// A module that logs from its start function.
pub const START_WAT: &str = r#"
    (module
        (import "imports" "console_log" (func $log (param i32 i32)))
        (memory (export "memory") 1)
        (data (i32.const 0) "booted")
        (func $main
            (call $log (i32.const 0) (i32.const 6)))
        (start $main))
"#;

/// Compile WAT text to module bytes.
pub fn wasm(wat: &str) -> Vec<u8> {
    wat::parse_str(wat).expect("Failed to parse WAT")
}

/// Create a runtime with test limits.
pub fn test_runtime() -> WasmRuntime {
    WasmRuntime::new(WasmRuntimeConfig::testing()).expect("Failed to create runtime")
}

/// Instantiate `wat` with the default bridge and a fresh buffer.
pub fn instantiate(wat: &str) -> (ModuleInstance, Arc<BufferedCollector>) {
    instantiate_with(wat, &BridgeConfig::default())
}

/// Instantiate `wat` on `runtime`, returning the startup result.
pub fn try_instantiate(
    runtime: &WasmRuntime,
    wat: &str,
    bridge: &BridgeConfig,
) -> Result<(ModuleInstance, Arc<BufferedCollector>)> {
    let module = runtime.compile("test.wasm", &wasm(wat))?;
    let collector = Arc::new(BufferedCollector::new(1_000));
    let instance = ModuleInstance::instantiate(runtime, module, bridge, collector.clone())?;
    Ok((instance, collector))
}

/// Instantiate `wat` with a specific bridge config and a fresh buffer.
pub fn instantiate_with(
    wat: &str,
    bridge: &BridgeConfig,
) -> (ModuleInstance, Arc<BufferedCollector>) {
    let runtime = test_runtime();
    let module = runtime
        .compile("test.wasm", &wasm(wat))
        .expect("Failed to compile module");
    let collector = Arc::new(BufferedCollector::new(1_000));
    let instance = ModuleInstance::instantiate(&runtime, module, bridge, collector.clone())
        .expect("Failed to instantiate module");
    (instance, collector)
}

/// A `Write` handle onto a shared byte buffer, for capturing streamed lines.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
