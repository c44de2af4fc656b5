//! Inspect command - show a module's imports, exports and bridge status.

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;
use wasmlog_host::wasm::{
    BridgeConfig, CompiledModule, MEMORY_EXPORT, ModuleLoader, ModuleSource, WasmRuntime,
    bridge_signature,
};

/// Run the inspect command.
pub async fn run(module: &str, namespace: Option<&str>) -> Result<()> {
    tracing::info!(module = %module, "Inspecting module");

    let path = Path::new(module);
    if !path.exists() {
        anyhow::bail!("Module file not found: {}", module);
    }

    let runtime = Arc::new(WasmRuntime::with_defaults()?);
    let compiled = ModuleLoader::new(runtime)
        .load(ModuleSource::path(path))
        .await
        .with_context(|| format!("Failed to load module: {}", module))?;

    let mut bridge = BridgeConfig::default();
    if let Some(namespace) = namespace {
        bridge.namespace = namespace.to_string();
    }

    print!("{}", report(&compiled, &bridge)?);
    Ok(())
}

fn report(compiled: &CompiledModule, bridge: &BridgeConfig) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "Module Information")?;
    writeln!(out, "==================")?;
    writeln!(out, "Name:   {}", compiled.name())?;
    writeln!(out, "Hash:   {:016x}", compiled.hash())?;
    writeln!(out)?;

    let imports = compiled.imports();
    writeln!(out, "Imports ({}):", imports.len())?;
    for (namespace, name) in &imports {
        writeln!(out, "  {}::{}", namespace, name)?;
    }
    writeln!(out)?;

    let exports = compiled.exports();
    writeln!(out, "Exports ({}):", exports.len())?;
    for name in &exports {
        writeln!(out, "  {}", name)?;
    }
    writeln!(out)?;

    writeln!(out, "Bridge")?;
    writeln!(out, "======")?;
    match bridge_signature(compiled.module(), bridge) {
        Ok(Some(ty)) => {
            writeln!(out, "  ✓ {} imported", bridge.qualified())?;
            writeln!(out, "    Auxiliary values: {}", ty.params().len() - 2)?;
        }
        Ok(None) => writeln!(out, "  - {} not imported", bridge.qualified())?,
        Err(e) => writeln!(out, "  ✗ {}", e)?,
    }

    if exports.iter().any(|e| e == MEMORY_EXPORT) {
        writeln!(out, "  ✓ '{}' exported", MEMORY_EXPORT)?;
    } else {
        writeln!(out, "  ✗ '{}' not exported", MEMORY_EXPORT)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_WAT: &str = r#"
        (module
            (import "env" "console_log" (func $log (param i32 i32 f64)))
            (memory (export "memory") 1)
            (func (export "main")
                (call $log (i32.const 0) (i32.const 0) (f64.const 1))))
    "#;

    fn compile() -> Arc<CompiledModule> {
        WasmRuntime::with_defaults()
            .unwrap()
            .compile("env.wasm", &wat::parse_str(ENV_WAT).unwrap())
            .unwrap()
    }

    #[test]
    fn default_namespace_misses_env_import() {
        let text = report(&compile(), &BridgeConfig::default()).unwrap();

        assert!(text.contains("  env::console_log"));
        assert!(text.contains("- imports::console_log not imported"));
    }

    #[test]
    fn namespace_flag_finds_bridge() {
        let bridge = BridgeConfig {
            namespace: "env".to_string(),
            ..BridgeConfig::default()
        };
        let text = report(&compile(), &bridge).unwrap();

        assert!(text.contains("✓ env::console_log imported"));
        assert!(text.contains("Auxiliary values: 1"));
        assert!(text.contains("✓ 'memory' exported"));
    }
}
