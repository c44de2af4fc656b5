//! The logging bridge: the `console_log` import.
//!
//! ```text
//! console_log(ptr: i32, len: i32, ...aux) -> ()
//! ```
//!
//! Wasm imports have fixed signatures, so the trailing auxiliary values are
//! taken from the signature each module declares for the import. Any number
//! of extra parameters of any value type is accepted; they are forwarded in
//! order as [`AuxValue`]s.

use super::memory::{WasmPtr, decode_text, snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wasmlog_core::error::{Result, WasmlogError};
use wasmlog_core::logging::{AuxValue, LogCollector, LogEvent};
use wasmlog_core::types::InstanceId;
use wasmtime::{Caller, Extern, ExternType, FuncType, Linker, Module, StoreLimits, Val, ValType};

/// Import namespace used by the conventional bootstrap.
pub const DEFAULT_IMPORT_NAMESPACE: &str = "imports";

/// Import name of the logging bridge.
pub const DEFAULT_IMPORT_NAME: &str = "console_log";

/// Name of the memory export the bridge reads from.
pub const MEMORY_EXPORT: &str = "memory";

/// Where the bridge is exposed to guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Import namespace.
    pub namespace: String,
    /// Import name.
    pub name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_IMPORT_NAMESPACE.to_string(),
            name: DEFAULT_IMPORT_NAME.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Create a bridge config with a custom namespace and name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Fully qualified import name, `namespace::name`.
    pub fn qualified(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }
}

/// State provided to host functions through the store.
pub struct HostState {
    instance_id: InstanceId,
    module: String,
    /// Sink for bridge records.
    collector: Arc<dyn LogCollector>,
    /// Number of completed bridge calls.
    bridge_calls: u64,
    pub(crate) limits: StoreLimits,
}

impl HostState {
    /// Create new host state.
    pub fn new(
        instance_id: InstanceId,
        module: impl Into<String>,
        collector: Arc<dyn LogCollector>,
        limits: StoreLimits,
    ) -> Self {
        Self {
            instance_id,
            module: module.into(),
            collector,
            bridge_calls: 0,
            limits,
        }
    }

    /// Instance this state belongs to.
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Module name.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The sink bridge records go to.
    pub fn collector(&self) -> &Arc<dyn LogCollector> {
        &self.collector
    }

    /// Number of bridge calls that produced a record.
    pub fn bridge_calls(&self) -> u64 {
        self.bridge_calls
    }

    /// Emit one bridge record.
    fn emit(&mut self, message: String, aux: Vec<AuxValue>) {
        let event = LogEvent::guest(message, aux)
            .with_instance_id(self.instance_id)
            .with_module(self.module.clone());
        self.collector.collect(event);
        self.bridge_calls += 1;
    }
}

/// Read the signature `module` declares for the bridge import.
///
/// Returns `Ok(None)` when the module does not import the bridge. The
/// signature must take at least `(i32, i32)` and return nothing.
pub fn bridge_signature(module: &Module, config: &BridgeConfig) -> Result<Option<FuncType>> {
    let Some(import) = module
        .imports()
        .find(|i| i.module() == config.namespace && i.name() == config.name)
    else {
        return Ok(None);
    };

    let signature_error = |cause: String| WasmlogError::ImportSignature {
        import: config.qualified(),
        cause,
    };

    let ty = match import.ty() {
        ExternType::Func(ty) => ty,
        _ => return Err(signature_error("import is not a function".to_string())),
    };

    let params: Vec<ValType> = ty.params().collect();
    if params.len() < 2 {
        return Err(signature_error(format!(
            "expected at least 2 parameters (ptr, len), found {}",
            params.len()
        )));
    }
    if !matches!(params[0], ValType::I32) || !matches!(params[1], ValType::I32) {
        return Err(signature_error(
            "ptr and len must both be i32".to_string(),
        ));
    }
    if ty.results().len() != 0 {
        return Err(signature_error(format!(
            "expected no results, found {}",
            ty.results().len()
        )));
    }

    Ok(Some(ty))
}

/// Define the bridge in `linker` with the signature `module` declares.
///
/// Returns whether a definition was added.
pub fn define_bridge(
    linker: &mut Linker<HostState>,
    module: &Module,
    config: &BridgeConfig,
) -> Result<bool> {
    let Some(ty) = bridge_signature(module, config)? else {
        return Ok(false);
    };

    let aux_count = ty.params().len() - 2;
    let import = config.qualified();
    linker
        .func_new(
            &config.namespace,
            &config.name,
            ty,
            move |caller: Caller<'_, HostState>, params: &[Val], _results: &mut [Val]| {
                console_log(caller, params, &import)
            },
        )
        .map_err(|e| WasmlogError::HostFunction {
            function: config.qualified(),
            cause: e.to_string(),
        })?;

    tracing::debug!(
        import = %config.qualified(),
        aux_count,
        "Logging bridge defined"
    );
    Ok(true)
}

/// Body of the bridge.
///
/// A fault here is returned as a trap and ends the calling guest operation;
/// no record is emitted for it.
fn console_log(
    mut caller: Caller<'_, HostState>,
    params: &[Val],
    import: &str,
) -> wasmtime::Result<()> {
    let ptr = WasmPtr::from_raw(int_arg(params, 0, import)?, int_arg(params, 1, import)?);

    let memory = match caller.get_export(MEMORY_EXPORT) {
        Some(Extern::Memory(memory)) => memory,
        _ => {
            return Err(WasmlogError::MissingMemory {
                function: import.to_string(),
            }
            .into());
        }
    };

    let bytes = snapshot(memory.data(&caller), ptr)?;
    let message = decode_text(&bytes);
    let aux = params[2..].iter().map(aux_value).collect();

    caller.data_mut().emit(message, aux);
    Ok(())
}

fn int_arg(params: &[Val], index: usize, import: &str) -> wasmtime::Result<i32> {
    params.get(index).and_then(Val::i32).ok_or_else(|| {
        WasmlogError::HostFunction {
            function: import.to_string(),
            cause: format!("argument {} is not an i32", index),
        }
        .into()
    })
}

/// Convert one auxiliary wasm value for the log record.
pub fn aux_value(val: &Val) -> AuxValue {
    match val {
        Val::I32(v) => AuxValue::I32(*v),
        Val::I64(v) => AuxValue::I64(*v),
        Val::F32(bits) => AuxValue::F32(f32::from_bits(*bits)),
        Val::F64(bits) => AuxValue::F64(f64::from_bits(*bits)),
        Val::V128(_) => AuxValue::Opaque("v128".to_string()),
        _ => AuxValue::Opaque("ref".to_string()),
    }
}
