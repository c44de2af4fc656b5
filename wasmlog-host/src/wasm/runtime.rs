//! WASM runtime management using Wasmtime.
//!
//! Provides engine configuration, module compilation, and caching.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wasmlog_core::error::{Result, WasmlogError};
use wasmtime::{Config, Engine, Module};

/// Size of one wasm page in bytes.
pub const WASM_PAGE_SIZE: usize = 64 * 1024;

/// Default maximum memory pages (64 KB per page).
const DEFAULT_MAX_MEMORY_PAGES: u32 = 1024; // 64 MB

/// Default fuel amount for execution limiting.
const DEFAULT_FUEL: u64 = 10_000_000;

/// Default epoch deadline, in ticks, when epoch interruption is enabled.
const DEFAULT_EPOCH_DEADLINE: u64 = 1;

/// Configuration for the WASM runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasmRuntimeConfig {
    /// Maximum memory pages an instance may grow to (64 KB per page).
    pub max_memory_pages: u32,
    /// Whether to enable fuel-based execution limiting.
    pub fuel_enabled: bool,
    /// Initial fuel amount when fuel is enabled.
    pub fuel_amount: u64,
    /// Whether to enable epoch-based interruption.
    pub epoch_interruption: bool,
    /// Epoch ticks a store may run before it is interrupted.
    pub epoch_deadline: u64,
    /// Whether to cache compiled modules.
    pub cache_modules: bool,
    /// Enable debug info in compiled modules.
    pub debug_info: bool,
}

impl Default for WasmRuntimeConfig {
    fn default() -> Self {
        Self {
            max_memory_pages: DEFAULT_MAX_MEMORY_PAGES,
            fuel_enabled: false,
            fuel_amount: DEFAULT_FUEL,
            epoch_interruption: false,
            epoch_deadline: DEFAULT_EPOCH_DEADLINE,
            cache_modules: true,
            debug_info: false,
        }
    }
}

impl WasmRuntimeConfig {
    /// Create a configuration for testing with stricter limits.
    pub fn testing() -> Self {
        Self {
            max_memory_pages: 256, // 16 MB
            fuel_enabled: true,
            fuel_amount: 1_000_000,
            epoch_interruption: false,
            epoch_deadline: DEFAULT_EPOCH_DEADLINE,
            cache_modules: false,
            debug_info: true,
        }
    }

    /// Set maximum memory pages.
    pub fn with_max_memory_pages(mut self, pages: u32) -> Self {
        self.max_memory_pages = pages;
        self
    }

    /// Enable or disable fuel-based limiting.
    pub fn with_fuel(mut self, enabled: bool, amount: u64) -> Self {
        self.fuel_enabled = enabled;
        self.fuel_amount = amount;
        self
    }

    /// Enable or disable epoch interruption.
    pub fn with_epoch_interruption(mut self, enabled: bool, deadline: u64) -> Self {
        self.epoch_interruption = enabled;
        self.epoch_deadline = deadline;
        self
    }

    /// Enable or disable module caching.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_modules = enabled;
        self
    }

    /// Maximum linear memory size in bytes.
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_pages as usize * WASM_PAGE_SIZE
    }

    /// Create a Wasmtime Config from this configuration.
    fn to_wasmtime_config(&self) -> Config {
        let mut config = Config::new();
        config.epoch_interruption(self.epoch_interruption);
        config.consume_fuel(self.fuel_enabled);
        config.debug_info(self.debug_info);
        config.strategy(wasmtime::Strategy::Cranelift);
        config
    }
}

/// A compiled WASM module ready for instantiation.
#[derive(Debug)]
pub struct CompiledModule {
    module: Module,
    /// Name used in errors and log records.
    name: String,
    /// Hash of the original WASM bytes (for caching).
    hash: u64,
}

impl CompiledModule {
    /// Get the underlying Wasmtime module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Get the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the hash of this module.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// List the module's imports as `(namespace, name)` pairs.
    pub fn imports(&self) -> Vec<(String, String)> {
        self.module
            .imports()
            .map(|import| (import.module().to_string(), import.name().to_string()))
            .collect()
    }

    /// List the module's export names.
    pub fn exports(&self) -> Vec<String> {
        self.module
            .exports()
            .map(|export| export.name().to_string())
            .collect()
    }
}

/// WASM runtime managing the Wasmtime engine and compiled modules.
pub struct WasmRuntime {
    /// The Wasmtime engine (thread-safe, can be shared).
    engine: Engine,
    config: WasmRuntimeConfig,
    /// Cache of compiled modules by their content hash.
    module_cache: DashMap<u64, Arc<CompiledModule>>,
}

impl WasmRuntime {
    /// Create a new WASM runtime with the given configuration.
    pub fn new(config: WasmRuntimeConfig) -> Result<Self> {
        let wasmtime_config = config.to_wasmtime_config();
        let engine = Engine::new(&wasmtime_config).map_err(|e| WasmlogError::ModuleCompile {
            module: "engine".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self {
            engine,
            config,
            module_cache: DashMap::new(),
        })
    }

    /// Create a new runtime with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(WasmRuntimeConfig::default())
    }

    /// Get the Wasmtime engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get the runtime configuration.
    pub fn config(&self) -> &WasmRuntimeConfig {
        &self.config
    }

    /// Compile WASM bytes into a module.
    ///
    /// If caching is enabled and the same bytes were compiled before, the
    /// cached module is returned (keeping its original name).
    pub fn compile(&self, name: &str, wasm_bytes: &[u8]) -> Result<Arc<CompiledModule>> {
        let hash = hash_bytes(wasm_bytes);

        if self.config.cache_modules {
            if let Some(cached) = self.module_cache.get(&hash) {
                tracing::debug!(module = %name, hash, "Module cache hit");
                return Ok(Arc::clone(&cached));
            }
        }

        let module = Module::new(&self.engine, wasm_bytes).map_err(|e| {
            WasmlogError::ModuleCompile {
                module: name.to_string(),
                cause: e.to_string(),
            }
        })?;

        tracing::debug!(module = %name, hash, bytes = wasm_bytes.len(), "Module compiled");

        let compiled = Arc::new(CompiledModule {
            module,
            name: name.to_string(),
            hash,
        });

        if self.config.cache_modules {
            self.module_cache.insert(hash, Arc::clone(&compiled));
        }

        Ok(compiled)
    }

    /// Get the number of cached modules.
    pub fn cache_size(&self) -> usize {
        self.module_cache.len()
    }

    /// Get the initial fuel amount for new stores.
    pub fn initial_fuel(&self) -> Option<u64> {
        if self.config.fuel_enabled {
            Some(self.config.fuel_amount)
        } else {
            None
        }
    }

    /// Get the epoch deadline for new stores.
    pub fn epoch_deadline(&self) -> Option<u64> {
        if self.config.epoch_interruption {
            Some(self.config.epoch_deadline)
        } else {
            None
        }
    }
}

/// Compute a hash of bytes (for cache key).
fn hash_bytes(bytes: &[u8]) -> u64 {
    use std::hash::{Hash, Hasher};

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_config_default() {
        let config = WasmRuntimeConfig::default();
        assert_eq!(config.max_memory_pages, DEFAULT_MAX_MEMORY_PAGES);
        assert!(!config.fuel_enabled);
        assert!(!config.epoch_interruption);
        assert!(config.cache_modules);
        assert_eq!(config.max_memory_bytes(), 64 * 1024 * 1024);
    }

    #[test]
    fn runtime_config_testing() {
        let config = WasmRuntimeConfig::testing();
        assert!(config.fuel_enabled);
        assert!(config.debug_info);
        assert!(!config.cache_modules);
    }

    #[test]
    fn runtime_config_deserializes_partial_yaml() {
        let config: WasmRuntimeConfig =
            serde_yaml::from_str("fuel_enabled: true\nmax_memory_pages: 16\n").unwrap();
        assert!(config.fuel_enabled);
        assert_eq!(config.max_memory_pages, 16);
        assert_eq!(config.fuel_amount, DEFAULT_FUEL);
    }

    #[test]
    fn runtime_creation() {
        let runtime = WasmRuntime::with_defaults().expect("Failed to create runtime");
        assert_eq!(runtime.cache_size(), 0);
        assert_eq!(runtime.initial_fuel(), None);
        assert_eq!(runtime.epoch_deadline(), None);
    }

    #[test]
    fn runtime_config_builders() {
        let config = WasmRuntimeConfig::default()
            .with_max_memory_pages(4)
            .with_fuel(true, 500)
            .with_epoch_interruption(true, 10)
            .with_cache(false);

        assert_eq!(config.max_memory_bytes(), 4 * WASM_PAGE_SIZE);

        let runtime = WasmRuntime::new(config).expect("Failed to create runtime");
        assert_eq!(runtime.initial_fuel(), Some(500));
        assert_eq!(runtime.epoch_deadline(), Some(10));
    }

    #[test]
    fn compile_cache_reuses_modules() {
        let bytes = wat::parse_str("(module (memory (export \"memory\") 1))").unwrap();

        let cached = WasmRuntime::with_defaults().unwrap();
        let a = cached.compile("a.wasm", &bytes).unwrap();
        let b = cached.compile("b.wasm", &bytes).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cached.cache_size(), 1);

        let uncached = WasmRuntime::new(WasmRuntimeConfig::default().with_cache(false)).unwrap();
        uncached.compile("a.wasm", &bytes).unwrap();
        assert_eq!(uncached.cache_size(), 0);
    }

    #[test]
    fn hash_bytes_consistency() {
        let data = b"test data for hashing";
        assert_eq!(hash_bytes(data), hash_bytes(data));
        assert_ne!(hash_bytes(data), hash_bytes(b"different data"));
    }
}
