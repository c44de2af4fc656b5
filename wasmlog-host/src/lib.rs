//! wasmlog host - runs WebAssembly modules with the `console_log` bridge.
//!
//! This crate provides:
//! - Wasmtime runtime configuration and module caching
//! - Module acquisition from the conventional artifact location
//! - The logging bridge that turns guest memory ranges into log records
//! - Host sessions that order startup before any guest call
//! - A process-wide instance handle
//! - Tracing subscriber setup

#![warn(missing_docs)]

pub mod config;
pub mod observability;
pub mod session;
pub mod wasm;

pub use config::HostConfig;
pub use session::HostSession;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::HostConfig;
    pub use crate::observability::{LogFormat, TracingConfig, init_tracing};
    pub use crate::session::HostSession;
    pub use crate::wasm::{
        BridgeConfig, CompiledModule, ModuleInstance, ModuleLoader, ModuleSource, WasmRuntime,
        WasmRuntimeConfig,
    };
    pub use wasmlog_core::prelude::*;
}
