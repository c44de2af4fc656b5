//! Prelude for convenient imports.
//!
//! ```ignore
//! use wasmlog_core::prelude::*;
//! ```

pub use crate::error::{Result, WasmlogError};
pub use crate::logging::{
    AuxValue, BufferedCollector, ConsoleCollector, LineFormat, LogCollector, LogEvent, LogFilter,
    LogLevel, MultiCollector, NullCollector, WriterCollector,
};
pub use crate::types::InstanceId;
