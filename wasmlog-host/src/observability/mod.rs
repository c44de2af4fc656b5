//! Tracing subscriber setup.
//!
//! Log output format is controlled via `WASMLOG_LOG_FORMAT`:
//! - `json` - structured JSON lines
//! - `pretty` - human-readable multi-line output
//! - `compact` - single-line output (default for non-TTY)
//!
//! Guest records forwarded by the console sink use the
//! `wasmlog::guest` target, so they can be filtered separately, e.g.
//! `RUST_LOG=warn,wasmlog::guest=info`.
//!
//! # Example
//!
//! ```ignore
//! use wasmlog_host::observability::{TracingConfig, init_tracing};
//!
//! let _guard = init_tracing(TracingConfig::from_env("info"))?;
//! ```

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig};
pub use tracing_setup::{TracingGuard, init_tracing};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.include_target());
    }

    #[test]
    fn config_from_lookup() {
        let vars = [
            ("WASMLOG_LOG_FORMAT", "json"),
            ("RUST_LOG", "debug,wasmlog::guest=trace"),
            ("WASMLOG_LOG_LOCATION", "1"),
        ];
        let config = TracingConfig::from_lookup("warn", |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        });

        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.log_filter(), "debug,wasmlog::guest=trace");
        assert!(config.include_location());
        assert!(!config.include_thread_ids());
    }

    #[test]
    fn level_var_wins_over_rust_log() {
        let config = TracingConfig::from_lookup("warn", |key| match key {
            "WASMLOG_LOG_LEVEL" => Some("trace".to_string()),
            "RUST_LOG" => Some("error".to_string()),
            "WASMLOG_LOG_FORMAT" => Some("compact".to_string()),
            _ => None,
        });

        assert_eq!(config.log_filter(), "trace");
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn unset_filter_falls_back_to_default() {
        let config = TracingConfig::from_lookup("debug", |_| None);

        assert_eq!(config.log_filter(), "debug");
        assert!(!config.include_location());
        assert!(config.include_target());
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("whatever".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    }
}
