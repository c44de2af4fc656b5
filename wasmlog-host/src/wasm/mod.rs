//! WebAssembly hosting with the logging bridge.
//!
//! # Architecture
//!
//! - **WasmRuntime**: Wasmtime engine, compilation, module cache
//! - **ModuleLoader**: acquires the module artifact (blocking or async)
//! - **ModuleInstance**: store + instance; owns the module's linear memory
//! - **Bridge**: the `console_log` import and its host state
//! - **Memory**: copy-on-read snapshots of guest memory
//! - **global**: the single process-wide instance
//!
//! # Module ABI
//!
//! Modules must export:
//!
//! ```text
//! memory: Memory
//! ```
//!
//! Modules may import (namespace and name are configurable):
//!
//! ```text
//! imports.console_log(ptr: i32, len: i32, ...aux) -> ()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wasmlog_core::logging::BufferedCollector;
//! use wasmlog_host::wasm::{BridgeConfig, ModuleInstance, ModuleLoader, ModuleSource, WasmRuntime};
//!
//! let runtime = Arc::new(WasmRuntime::with_defaults()?);
//! let module = ModuleLoader::new(runtime.clone()).load_blocking(&ModuleSource::conventional())?;
//! let collector = Arc::new(BufferedCollector::with_default_capacity());
//! let mut instance =
//!     ModuleInstance::instantiate(&runtime, module, &BridgeConfig::default(), collector.clone())?;
//! instance.call_void("main")?;
//! ```

mod bridge;
pub mod global;
mod instance;
mod loader;
mod memory;
mod runtime;

pub use bridge::{
    BridgeConfig, DEFAULT_IMPORT_NAME, DEFAULT_IMPORT_NAMESPACE, HostState, MEMORY_EXPORT,
    aux_value, bridge_signature, define_bridge,
};
pub use instance::ModuleInstance;
pub use loader::{CONVENTIONAL_MODULE_FILE, ModuleLoader, ModuleSource};
pub use memory::{WasmPtr, decode_text, snapshot};
pub use runtime::{CompiledModule, WASM_PAGE_SIZE, WasmRuntime, WasmRuntimeConfig};
