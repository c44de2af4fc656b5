//! wasmlog CLI - run WebAssembly modules with the `console_log` bridge.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use wasmlog_host::observability::{TracingConfig, TracingGuard, init_tracing};

/// wasmlog - host WebAssembly modules and collect what they log.
#[derive(Parser)]
#[command(name = "wasmlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Instantiate a module and print what it logs
    Run {
        /// Path to the module (defaults to hshg.wasm)
        module: Option<String>,

        /// Export to call after instantiation
        #[arg(short, long)]
        entry: Option<String>,

        /// Path to a YAML host config
        #[arg(short, long)]
        config: Option<String>,

        /// Import namespace of the bridge
        #[arg(short, long)]
        namespace: Option<String>,

        /// Print records as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// List a module's imports and exports
    Inspect {
        /// Path to the module
        module: String,

        /// Import namespace of the bridge
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Show version information
    Version,
}

fn setup_logging(verbosity: u8) -> Result<TracingGuard> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // WASMLOG_LOG_LEVEL and RUST_LOG win over -v
    let config = TracingConfig::from_env(filter);

    init_tracing(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _tracing_guard = setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Run {
            module,
            entry,
            config,
            namespace,
            json,
        } => {
            let options = commands::run::RunOptions {
                module: module.as_deref(),
                entry: entry.as_deref(),
                config: config.as_deref(),
                namespace: namespace.as_deref(),
                json,
            };
            commands::run::run(options).await
        }
        Commands::Inspect { module, namespace } => {
            commands::inspect::run(&module, namespace.as_deref()).await
        }
        Commands::Version => commands::version::run(),
    }
}
