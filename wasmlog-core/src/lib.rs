//! wasmlog core library
//!
//! Foundational types shared by the wasmlog host and CLI:
//!
//! - **Error**: coded error taxonomy for module acquisition, the logging
//!   bridge, and guest invocation
//! - **Logging**: structured log records and the collectors they are
//!   emitted to
//! - **Types**: strongly-typed identifiers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Result, WasmlogError};
pub use logging::{AuxValue, LogCollector, LogEvent};
pub use types::InstanceId;
