//! Module instances.
//!
//! A [`ModuleInstance`] owns its store and therefore its linear memory. Host
//! code reaches that memory only through the instance, and the bridge only
//! ever copies out of it.

use super::bridge::{BridgeConfig, HostState, MEMORY_EXPORT, define_bridge};
use super::memory::{WasmPtr, snapshot, write_at};
use super::runtime::{CompiledModule, WasmRuntime};
use std::sync::Arc;
use wasmlog_core::error::{Result, WasmlogError};
use wasmlog_core::logging::LogCollector;
use wasmlog_core::types::InstanceId;
use wasmtime::{Instance, Linker, Memory, Store, StoreLimitsBuilder, Val, ValType};

/// An instantiated module with the logging bridge wired in.
pub struct ModuleInstance {
    id: InstanceId,
    module: Arc<CompiledModule>,
    store: Store<HostState>,
    instance: Instance,
    memory: Memory,
    /// Whether the module imports the bridge at all.
    bridged: bool,
}

impl ModuleInstance {
    /// Instantiate `module`, defining the bridge with the signature the
    /// module declares for it.
    ///
    /// A start function runs here, so bridge records may already exist when
    /// this returns. A host fault raised by the start function (such as a
    /// boundary violation) is returned as itself rather than as
    /// [`WasmlogError::Instantiate`].
    pub fn instantiate(
        runtime: &WasmRuntime,
        module: Arc<CompiledModule>,
        bridge: &BridgeConfig,
        collector: Arc<dyn LogCollector>,
    ) -> Result<Self> {
        let id = InstanceId::next();
        let limits = StoreLimitsBuilder::new()
            .memory_size(runtime.config().max_memory_bytes())
            .build();
        let state = HostState::new(id, module.name(), collector, limits);

        let mut store = Store::new(runtime.engine(), state);
        store.limiter(|state| &mut state.limits);

        if let Some(fuel) = runtime.initial_fuel() {
            store
                .set_fuel(fuel)
                .map_err(|e| instantiate_error(&module, format!("Failed to set fuel: {}", e)))?;
        }
        if let Some(deadline) = runtime.epoch_deadline() {
            store.set_epoch_deadline(deadline);
        }

        let mut linker = Linker::new(runtime.engine());
        let bridged = define_bridge(&mut linker, module.module(), bridge)?;

        let instance = linker
            .instantiate(&mut store, module.module())
            .map_err(|e| start_error(&module, e))?;

        let memory = instance
            .get_memory(&mut store, MEMORY_EXPORT)
            .ok_or_else(|| WasmlogError::MissingExport {
                module: module.name().to_string(),
                export: MEMORY_EXPORT.to_string(),
            })?;

        tracing::info!(
            instance = %id,
            module = %module.name(),
            bridged,
            memory_bytes = memory.data_size(&store),
            "Module instantiated"
        );

        Ok(Self {
            id,
            module,
            store,
            instance,
            memory,
            bridged,
        })
    }

    /// Instance ID.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Module name.
    pub fn module_name(&self) -> &str {
        self.module.name()
    }

    /// The compiled module this instance was created from.
    pub fn module(&self) -> &Arc<CompiledModule> {
        &self.module
    }

    /// Whether the module imports the logging bridge.
    pub fn is_bridged(&self) -> bool {
        self.bridged
    }

    /// The sink bridge records go to.
    pub fn collector(&self) -> &Arc<dyn LogCollector> {
        self.store.data().collector()
    }

    /// Number of bridge calls that produced a record.
    pub fn bridge_calls(&self) -> u64 {
        self.store.data().bridge_calls()
    }

    /// Call a function export.
    ///
    /// A host fault raised inside the call (such as a boundary violation in
    /// the bridge) is returned as itself; any other trap becomes
    /// [`WasmlogError::GuestTrap`].
    pub fn call(&mut self, export: &str, args: &[Val]) -> Result<Vec<Val>> {
        let func = self
            .instance
            .get_func(&mut self.store, export)
            .ok_or_else(|| WasmlogError::ExportNotFound {
                module: self.module.name().to_string(),
                export: export.to_string(),
            })?;

        let mut results: Vec<Val> = func
            .ty(&self.store)
            .results()
            .map(default_val)
            .collect();

        tracing::trace!(instance = %self.id, export, "Calling export");

        func.call(&mut self.store, args, &mut results)
            .map_err(|e| call_error(export, e))?;
        Ok(results)
    }

    /// Call an export that takes no arguments, discarding results.
    pub fn call_void(&mut self, export: &str) -> Result<()> {
        self.call(export, &[]).map(|_| ())
    }

    /// Current linear memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.memory.data_size(&self.store)
    }

    /// Copy `len` bytes at `ptr` out of linear memory.
    pub fn read_memory(&self, ptr: u32, len: u32) -> Result<Vec<u8>> {
        snapshot(self.memory.data(&self.store), WasmPtr::new(ptr, len))
    }

    /// Write `data` into linear memory at `ptr`.
    pub fn write_memory(&mut self, ptr: u32, data: &[u8]) -> Result<()> {
        write_at(self.memory.data_mut(&mut self.store), ptr, data)
    }

    /// Grow linear memory by `pages`, returning the previous size in pages.
    pub fn grow_memory(&mut self, pages: u64) -> Result<u64> {
        self.memory
            .grow(&mut self.store, pages)
            .map_err(|e| WasmlogError::HostFunction {
                function: "memory.grow".to_string(),
                cause: e.to_string(),
            })
    }
}

fn instantiate_error(module: &CompiledModule, cause: String) -> WasmlogError {
    WasmlogError::Instantiate {
        module: module.name().to_string(),
        cause,
    }
}

/// A host fault raised by the start function is returned as itself.
fn start_error(module: &CompiledModule, err: wasmtime::Error) -> WasmlogError {
    match err.downcast::<WasmlogError>() {
        Ok(host_fault) => host_fault,
        Err(err) => instantiate_error(module, format!("{:#}", err)),
    }
}

fn call_error(export: &str, err: wasmtime::Error) -> WasmlogError {
    match err.downcast::<WasmlogError>() {
        Ok(host_fault) => host_fault,
        Err(err) => WasmlogError::GuestTrap {
            function: export.to_string(),
            cause: format!("{:#}", err),
        },
    }
}

/// Placeholder result slot for a value type.
fn default_val(ty: ValType) -> Val {
    match ty {
        ValType::I64 => Val::I64(0),
        ValType::F32 => Val::F32(0),
        ValType::F64 => Val::F64(0),
        _ => Val::I32(0),
    }
}
