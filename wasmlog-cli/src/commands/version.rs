//! Version command - show version information.

use anyhow::Result;
use wasmlog_host::wasm::{CONVENTIONAL_MODULE_FILE, DEFAULT_IMPORT_NAME, DEFAULT_IMPORT_NAMESPACE};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("wasmlog - WebAssembly host with a console_log bridge");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!(
        "Bridge:      {}::{}(ptr, len, ...aux)",
        DEFAULT_IMPORT_NAMESPACE, DEFAULT_IMPORT_NAME
    );
    println!("Module:      {}", CONVENTIONAL_MODULE_FILE);
    println!();
    println!("Components:");
    println!("  wasmlog-core  Log records, collectors, errors");
    println!("  wasmlog-host  Runtime, bridge, sessions");
    println!("  wasmlog-cli   Command-line interface");

    Ok(())
}
