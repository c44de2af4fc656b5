//! Run command - instantiate a module and stream its bridge records.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use wasmlog_core::logging::{LineFormat, LogCollector, WriterCollector};
use wasmlog_host::wasm::ModuleSource;
use wasmlog_host::{HostConfig, HostSession};

/// Options for the run command.
pub struct RunOptions<'a> {
    pub module: Option<&'a str>,
    pub entry: Option<&'a str>,
    pub config: Option<&'a str>,
    pub namespace: Option<&'a str>,
    pub json: bool,
}

/// Run the run command.
pub async fn run(options: RunOptions<'_>) -> Result<()> {
    let format = if options.json {
        LineFormat::Json
    } else {
        LineFormat::Text
    };
    let stdout = Arc::new(WriterCollector::stdout(format));
    execute(&options, stdout).await
}

/// Start the module and call the entry export, writing every record to
/// `sink` as the guest logs it.
async fn execute(options: &RunOptions<'_>, sink: Arc<dyn LogCollector>) -> Result<()> {
    let config = build_config(options)?;
    tracing::info!(module = %config.module.display(), "Starting module");

    let source = ModuleSource::path(config.module.clone());
    let mut session = HostSession::start_with_sink(config, source, Arc::clone(&sink))
        .await
        .context("Failed to start module")?;

    if let Some(entry) = options.entry {
        session
            .instance_mut()
            .call_void(entry)
            .with_context(|| format!("Call to '{}' failed", entry))?;
    }

    tracing::info!(
        records = sink.len(),
        bridge_calls = session.instance().bridge_calls(),
        "Run complete"
    );
    Ok(())
}

fn build_config(options: &RunOptions<'_>) -> Result<HostConfig> {
    let config = match options.config {
        Some(path) => HostConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => HostConfig::default(),
    };

    let mut config = config.with_env_overrides()?.with_echo_to_console(false);
    if let Some(module) = options.module {
        config.module = module.into();
    }
    if let Some(namespace) = options.namespace {
        config.bridge.namespace = namespace.to_string();
    }
    Ok(config)
}
