//! Structured log records and the sinks they are emitted to.
//!
//! The logging bridge turns every `console_log` call into a [`LogEvent`] and
//! hands it to a [`LogCollector`]:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ console_log  │────>│ LogEvent     │────>│ LogCollector     │
//! │ (guest call) │     │ (text + aux) │     │ console / buffer │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wasmlog_core::logging::{AuxValue, BufferedCollector, LogCollector, LogEvent};
//!
//! let collector = Arc::new(BufferedCollector::with_default_capacity());
//! collector.collect(LogEvent::guest("Hello", vec![AuxValue::I32(7)]));
//!
//! let events = collector.all();
//! assert_eq!(events[0].message, "Hello");
//! assert_eq!(events[0].aux, vec![AuxValue::I32(7)]);
//! ```

mod collector;
mod event;
mod filter;

pub use collector::{
    BufferedCollector, ConsoleCollector, DEFAULT_BUFFER_CAPACITY, GUEST_TARGET, LineFormat,
    LogCollector, MultiCollector, NullCollector, WriterCollector,
};
pub use event::{AuxValue, LogEvent, LogLevel};
pub use filter::LogFilter;
