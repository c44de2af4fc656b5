//! Host sessions: startup as a single ordered step.
//!
//! A [`HostSession`] is only produced once the module has been acquired,
//! compiled and instantiated, and it is the only way to reach the instance.
//! No guest call, and therefore no bridge call, can happen before startup
//! has completed.

use crate::config::HostConfig;
use crate::wasm::{self, CompiledModule, ModuleInstance, ModuleLoader, ModuleSource, WasmRuntime};
use std::sync::Arc;
use wasmlog_core::error::Result;
use wasmlog_core::logging::{
    BufferedCollector, ConsoleCollector, LogCollector, LogEvent, MultiCollector,
};

/// A started host: runtime, record buffer, and one module instance.
pub struct HostSession {
    config: HostConfig,
    runtime: Arc<WasmRuntime>,
    buffer: Arc<BufferedCollector>,
    instance: ModuleInstance,
}

impl HostSession {
    /// Start from the module named in `config`, awaiting acquisition once.
    pub async fn start(config: HostConfig) -> Result<Self> {
        let source = ModuleSource::path(config.module.clone());
        Self::start_with_source(config, source).await
    }

    /// Start from an explicit source, awaiting acquisition once.
    pub async fn start_with_source(config: HostConfig, source: ModuleSource) -> Result<Self> {
        Self::start_inner(config, source, None).await
    }

    /// Start from an explicit source, also emitting every record to `sink`.
    ///
    /// The sink sees each record as it is logged, so unlike the buffer it
    /// never loses records to eviction.
    pub async fn start_with_sink(
        config: HostConfig,
        source: ModuleSource,
        sink: Arc<dyn LogCollector>,
    ) -> Result<Self> {
        Self::start_inner(config, source, Some(sink)).await
    }

    async fn start_inner(
        config: HostConfig,
        source: ModuleSource,
        sink: Option<Arc<dyn LogCollector>>,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Arc::new(WasmRuntime::new(config.runtime.clone())?);
        let module = ModuleLoader::new(Arc::clone(&runtime)).load(source).await?;
        Self::finish(config, runtime, module, sink)
    }

    /// Start from the module named in `config` on the current thread.
    pub fn start_blocking(config: HostConfig) -> Result<Self> {
        let source = ModuleSource::path(config.module.clone());
        Self::start_blocking_with_source(config, source)
    }

    /// Start from an explicit source on the current thread.
    pub fn start_blocking_with_source(config: HostConfig, source: ModuleSource) -> Result<Self> {
        Self::start_blocking_inner(config, source, None)
    }

    /// Blocking form of [`HostSession::start_with_sink`].
    pub fn start_blocking_with_sink(
        config: HostConfig,
        source: ModuleSource,
        sink: Arc<dyn LogCollector>,
    ) -> Result<Self> {
        Self::start_blocking_inner(config, source, Some(sink))
    }

    fn start_blocking_inner(
        config: HostConfig,
        source: ModuleSource,
        sink: Option<Arc<dyn LogCollector>>,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Arc::new(WasmRuntime::new(config.runtime.clone())?);
        let module = ModuleLoader::new(Arc::clone(&runtime)).load_blocking(&source)?;
        Self::finish(config, runtime, module, sink)
    }

    fn finish(
        config: HostConfig,
        runtime: Arc<WasmRuntime>,
        module: Arc<CompiledModule>,
        sink: Option<Arc<dyn LogCollector>>,
    ) -> Result<Self> {
        let buffer = Arc::new(BufferedCollector::new(config.buffer_capacity));

        let mut sinks: Vec<Arc<dyn LogCollector>> = vec![Arc::clone(&buffer) as Arc<dyn LogCollector>];
        if config.echo_to_console {
            sinks.push(Arc::new(ConsoleCollector::new()));
        }
        sinks.extend(sink);

        let collector: Arc<dyn LogCollector> = if sinks.len() == 1 {
            Arc::clone(&buffer) as Arc<dyn LogCollector>
        } else {
            Arc::new(MultiCollector::new(sinks))
        };

        let instance = ModuleInstance::instantiate(&runtime, module, &config.bridge, collector)?;

        Ok(Self {
            config,
            runtime,
            buffer,
            instance,
        })
    }

    /// The configuration the session was started with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The runtime, for compiling further modules.
    pub fn runtime(&self) -> &Arc<WasmRuntime> {
        &self.runtime
    }

    /// The module instance.
    pub fn instance(&self) -> &ModuleInstance {
        &self.instance
    }

    /// Mutable access to the module instance, for calls.
    pub fn instance_mut(&mut self) -> &mut ModuleInstance {
        &mut self.instance
    }

    /// The record buffer.
    pub fn buffer(&self) -> &Arc<BufferedCollector> {
        &self.buffer
    }

    /// All buffered bridge records, oldest first.
    pub fn records(&self) -> Vec<LogEvent> {
        self.buffer.all()
    }

    /// Install the instance as the process-wide instance.
    ///
    /// Returns the record buffer so callers can still read what the guest
    /// logs afterwards.
    pub fn install_global(self) -> Result<Arc<BufferedCollector>> {
        let buffer = self.buffer;
        wasm::global::install(self.instance)?;
        Ok(buffer)
    }
}
