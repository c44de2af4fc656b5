//! Process-wide module instance.
//!
//! The conventional bootstrap keeps exactly one instance for the lifetime of
//! the process. It is installed once after startup completes and is never
//! torn down. Code that needs several instances uses [`ModuleInstance`]
//! values directly instead.

use super::instance::ModuleInstance;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use wasmlog_core::error::{Result, WasmlogError};

static INSTANCE: OnceCell<Mutex<ModuleInstance>> = OnceCell::new();

/// Install the process-wide instance.
///
/// Fails with [`WasmlogError::AlreadyInitialized`] if one is installed.
pub fn install(instance: ModuleInstance) -> Result<()> {
    let id = instance.id();
    INSTANCE
        .set(Mutex::new(instance))
        .map_err(|_| WasmlogError::AlreadyInitialized)?;
    tracing::info!(instance = %id, "Process-wide instance installed");
    Ok(())
}

/// Whether the process-wide instance has been installed.
pub fn is_initialized() -> bool {
    INSTANCE.get().is_some()
}

/// Run `f` with exclusive access to the process-wide instance.
///
/// Fails with [`WasmlogError::NotInitialized`] before [`install`].
pub fn with_instance<R>(f: impl FnOnce(&mut ModuleInstance) -> R) -> Result<R> {
    let cell = INSTANCE.get().ok_or(WasmlogError::NotInitialized)?;
    let mut guard = cell.lock();
    Ok(f(&mut guard))
}
