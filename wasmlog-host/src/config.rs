//! Host configuration.
//!
//! Loaded from YAML, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `WASMLOG_MODULE` | `module` |
//! | `WASMLOG_IMPORT_NAMESPACE` | `bridge.namespace` |
//! | `WASMLOG_BUFFER_CAPACITY` | `buffer_capacity` |
//!
//! ```yaml
//! module: build/hshg.wasm
//! bridge:
//!   namespace: imports
//!   name: console_log
//! buffer_capacity: 5000
//! echo_to_console: true
//! runtime:
//!   fuel_enabled: true
//!   fuel_amount: 50000000
//! ```

use crate::wasm::{BridgeConfig, CONVENTIONAL_MODULE_FILE, WasmRuntimeConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wasmlog_core::error::{Result, WasmlogError};
use wasmlog_core::logging::DEFAULT_BUFFER_CAPACITY;

/// Configuration for a host session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Path of the module artifact.
    #[serde(default = "default_module")]
    pub module: PathBuf,

    /// Where the logging bridge is exposed.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Capacity of the in-memory record buffer.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Also forward bridge records to the console sink.
    #[serde(default = "default_echo_to_console")]
    pub echo_to_console: bool,

    /// Engine and store limits.
    #[serde(default)]
    pub runtime: WasmRuntimeConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            module: default_module(),
            bridge: BridgeConfig::default(),
            buffer_capacity: default_buffer_capacity(),
            echo_to_console: default_echo_to_console(),
            runtime: WasmRuntimeConfig::default(),
        }
    }
}

impl HostConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| WasmlogError::ConfigParse {
            path: PathBuf::from("<inline>"),
            cause: e.to_string(),
        })
    }

    /// Load a config from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WasmlogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| WasmlogError::ConfigParse {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(module) = lookup("WASMLOG_MODULE") {
            self.module = PathBuf::from(module);
        }
        if let Some(namespace) = lookup("WASMLOG_IMPORT_NAMESPACE") {
            self.bridge.namespace = namespace;
        }
        if let Some(capacity) = lookup("WASMLOG_BUFFER_CAPACITY") {
            self.buffer_capacity =
                capacity
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| WasmlogError::ConfigValue {
                        field: "buffer_capacity".to_string(),
                        cause: e.to_string(),
                    })?;
        }
        Ok(self)
    }

    /// Set the module path.
    pub fn with_module(mut self, module: impl Into<PathBuf>) -> Self {
        self.module = module.into();
        self
    }

    /// Set the bridge location.
    pub fn with_bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = bridge;
        self
    }

    /// Set the record buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Enable or disable forwarding to the console sink.
    pub fn with_echo_to_console(mut self, echo: bool) -> Self {
        self.echo_to_console = echo;
        self
    }

    /// Set the runtime configuration.
    pub fn with_runtime(mut self, runtime: WasmRuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Check that the config is usable.
    pub fn validate(&self) -> Result<()> {
        if self.bridge.namespace.is_empty() {
            return Err(config_value("bridge.namespace", "must not be empty"));
        }
        if self.bridge.name.is_empty() {
            return Err(config_value("bridge.name", "must not be empty"));
        }
        if self.buffer_capacity == 0 {
            return Err(config_value("buffer_capacity", "must be greater than zero"));
        }
        if self.runtime.max_memory_pages == 0 {
            return Err(config_value(
                "runtime.max_memory_pages",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn config_value(field: &str, cause: &str) -> WasmlogError {
    WasmlogError::ConfigValue {
        field: field.to_string(),
        cause: cause.to_string(),
    }
}

fn default_module() -> PathBuf {
    PathBuf::from(CONVENTIONAL_MODULE_FILE)
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_echo_to_console() -> bool {
    true
}
