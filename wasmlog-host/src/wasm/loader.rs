//! Module acquisition.
//!
//! The artifact is read from a fixed location (by convention `hshg.wasm` in
//! the working directory) and compiled. There is no retry, timeout or
//! cancellation: a failure here is a startup fault.

use super::runtime::{CompiledModule, WasmRuntime};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wasmlog_core::error::{Result, WasmlogError};

/// Conventional filename of the module artifact.
pub const CONVENTIONAL_MODULE_FILE: &str = "hshg.wasm";

/// Where a module artifact comes from.
#[derive(Debug, Clone)]
pub enum ModuleSource {
    /// A file on disk.
    Path(PathBuf),
    /// Bytes already in memory.
    Bytes {
        /// Name used in errors and log records.
        name: String,
        /// Raw module bytes (binary or text format).
        bytes: Vec<u8>,
    },
}

impl ModuleSource {
    /// The conventional artifact location.
    pub fn conventional() -> Self {
        Self::Path(PathBuf::from(CONVENTIONAL_MODULE_FILE))
    }

    /// A file on disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// In-memory bytes.
    pub fn bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Name used in errors and log records: the file name for paths.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

impl Default for ModuleSource {
    fn default() -> Self {
        Self::conventional()
    }
}

/// Reads and compiles module artifacts.
#[derive(Clone)]
pub struct ModuleLoader {
    runtime: Arc<WasmRuntime>,
}

impl ModuleLoader {
    /// Create a loader backed by `runtime`.
    pub fn new(runtime: Arc<WasmRuntime>) -> Self {
        Self { runtime }
    }

    /// The runtime modules are compiled with.
    pub fn runtime(&self) -> &Arc<WasmRuntime> {
        &self.runtime
    }

    /// Read and compile a module on the current thread.
    pub fn load_blocking(&self, source: &ModuleSource) -> Result<Arc<CompiledModule>> {
        let name = source.name();
        match source {
            ModuleSource::Path(path) => {
                let bytes = read_artifact(path)?;
                self.runtime.compile(&name, &bytes)
            }
            ModuleSource::Bytes { bytes, .. } => self.runtime.compile(&name, bytes),
        }
    }

    /// Read and compile a module without blocking the async runtime.
    ///
    /// The returned future is meant to be awaited once at startup.
    pub async fn load(&self, source: ModuleSource) -> Result<Arc<CompiledModule>> {
        let name = source.name();
        let bytes = match source {
            ModuleSource::Path(path) => {
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| WasmlogError::ModuleRead {
                        path: path.clone(),
                        cause: e.to_string(),
                    })?
            }
            ModuleSource::Bytes { bytes, .. } => bytes,
        };

        tracing::debug!(module = %name, bytes = bytes.len(), "Module artifact acquired");

        let runtime = Arc::clone(&self.runtime);
        let task_name = name.clone();
        tokio::task::spawn_blocking(move || runtime.compile(&task_name, &bytes))
            .await
            .map_err(|e| WasmlogError::ModuleCompile {
                module: name,
                cause: format!("Task join error: {}", e),
            })?
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| WasmlogError::ModuleRead {
        path: path.to_path_buf(),
        cause: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Module artifact acquired");
    Ok(bytes)
}
