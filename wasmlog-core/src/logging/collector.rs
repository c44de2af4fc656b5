//! Log collectors: the sinks that bridge records are emitted to.
//!
//! All collectors are synchronous and safe to call re-entrantly from inside
//! guest execution; locks are held only for the duration of a push.

use super::event::{LogEvent, LogLevel};
use super::filter::LogFilter;
use crate::types::InstanceId;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Maximum number of events to keep in the default buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000;

/// Tracing target used for records emitted by guests.
pub const GUEST_TARGET: &str = "wasmlog::guest";

/// Trait for log event collectors.
pub trait LogCollector: Send + Sync {
    /// Collect a log event.
    fn collect(&self, event: LogEvent);

    /// Get the number of collected events.
    fn len(&self) -> usize;

    /// Check if the collector is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type alias for log event subscriber callbacks.
type LogSubscribers = RwLock<Vec<Arc<dyn Fn(&LogEvent) + Send + Sync>>>;

/// Thread-safe log collector with a bounded ring buffer.
pub struct BufferedCollector {
    buffer: RwLock<VecDeque<LogEvent>>,
    capacity: usize,
    next_id: AtomicU64,
    /// Optional filter for incoming events.
    filter: Option<LogFilter>,
    subscribers: LogSubscribers,
}

impl BufferedCollector {
    /// Create a new collector with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_CAPACITY))),
            capacity,
            next_id: AtomicU64::new(1),
            filter: None,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Create a collector with default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }

    /// Set a filter for incoming events.
    pub fn with_filter(mut self, filter: LogFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Add a subscriber for real-time event notifications.
    pub fn subscribe(&self, callback: Arc<dyn Fn(&LogEvent) + Send + Sync>) {
        self.subscribers.write().push(callback);
    }

    /// Get events matching a filter.
    pub fn query(&self, filter: &LogFilter) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        let matching = buffer.iter().filter(|e| filter.matches(e)).cloned();
        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Get the most recent N events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer.iter().rev().take(limit).cloned().collect()
    }

    /// Get events emitted by a specific instance.
    pub fn by_instance(&self, instance_id: InstanceId) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer
            .iter()
            .filter(|e| e.instance_id == Some(instance_id))
            .cloned()
            .collect()
    }

    /// Get events at or above a certain level.
    pub fn by_level(&self, min_level: LogLevel) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer
            .iter()
            .filter(|e| e.level >= min_level)
            .cloned()
            .collect()
    }

    /// Get all events (up to capacity).
    pub fn all(&self) -> Vec<LogEvent> {
        self.buffer.read().iter().cloned().collect()
    }

    /// Get events since a given event ID.
    pub fn since(&self, after_id: u64) -> Vec<LogEvent> {
        let buffer = self.buffer.read();
        buffer.iter().filter(|e| e.id > after_id).cloned().collect()
    }

    /// Clear all events.
    pub fn clear(&self) {
        self.buffer.write().clear();
    }

    /// Get buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl LogCollector for BufferedCollector {
    fn collect(&self, mut event: LogEvent) {
        if let Some(ref filter) = self.filter {
            if !filter.matches(&event) {
                return;
            }
        }

        event.id = self.next_id.fetch_add(1, Ordering::SeqCst);

        {
            let subscribers = self.subscribers.read();
            for subscriber in subscribers.iter() {
                subscriber(&event);
            }
        }

        let mut buffer = self.buffer.write();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    fn len(&self) -> usize {
        self.buffer.read().len()
    }
}

impl Default for BufferedCollector {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// The host's standard console sink.
///
/// Forwards every event to `tracing` at the event's own level, so guest
/// output lands wherever the installed subscriber writes. The message is the
/// decoded text; `aux` carries the typed auxiliary values. Append-only and
/// unbounded; `len` reports how many events have been forwarded.
#[derive(Default)]
pub struct ConsoleCollector {
    emitted: AtomicUsize,
}

impl ConsoleCollector {
    /// Create a new console collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogCollector for ConsoleCollector {
    fn collect(&self, event: LogEvent) {
        let instance = event.instance_id.map(|id| id.as_u32()).unwrap_or(0);
        let module = event.module.as_deref().unwrap_or("");
        let aux = &event.aux;

        match event.level {
            LogLevel::Trace => tracing::trace!(
                target: GUEST_TARGET,
                instance,
                module,
                aux = ?aux,
                "{}",
                event.message
            ),
            LogLevel::Debug => tracing::debug!(
                target: GUEST_TARGET,
                instance,
                module,
                aux = ?aux,
                "{}",
                event.message
            ),
            LogLevel::Info => tracing::info!(
                target: GUEST_TARGET,
                instance,
                module,
                aux = ?aux,
                "{}",
                event.message
            ),
            LogLevel::Warn => tracing::warn!(
                target: GUEST_TARGET,
                instance,
                module,
                aux = ?aux,
                "{}",
                event.message
            ),
            LogLevel::Error => tracing::error!(
                target: GUEST_TARGET,
                instance,
                module,
                aux = ?aux,
                "{}",
                event.message
            ),
        }

        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    fn len(&self) -> usize {
        self.emitted.load(Ordering::Relaxed)
    }
}

/// Line format for [`WriterCollector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// [`LogEvent::format_line`].
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes each event to an [`io::Write`] as soon as it is collected.
///
/// Nothing is retained, so nothing is ever evicted. Write failures are
/// reported through `tracing` and the event is dropped.
pub struct WriterCollector<W: Write + Send> {
    writer: Mutex<W>,
    format: LineFormat,
    next_id: AtomicU64,
    written: AtomicUsize,
}

impl WriterCollector<io::Stdout> {
    /// Write to standard output.
    pub fn stdout(format: LineFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> WriterCollector<W> {
    /// Create a collector writing to `writer`.
    pub fn new(writer: W, format: LineFormat) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
            next_id: AtomicU64::new(1),
            written: AtomicUsize::new(0),
        }
    }

    fn render(&self, event: &LogEvent) -> io::Result<String> {
        match self.format {
            LineFormat::Text => Ok(event.format_line()),
            LineFormat::Json => serde_json::to_string(event).map_err(io::Error::from),
        }
    }
}

impl<W: Write + Send> LogCollector for WriterCollector<W> {
    fn collect(&self, mut event: LogEvent) {
        event.id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let result = self.render(&event).and_then(|line| {
            let mut writer = self.writer.lock();
            writeln!(writer, "{}", line)?;
            writer.flush()
        });

        match result {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => tracing::warn!(error = %e, event_id = event.id, "Failed to write log record"),
        }
    }

    fn len(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }
}

/// A no-op collector that discards all events.
pub struct NullCollector;

impl LogCollector for NullCollector {
    fn collect(&self, _event: LogEvent) {}

    fn len(&self) -> usize {
        0
    }
}

/// A collector that writes events to multiple collectors.
pub struct MultiCollector {
    collectors: Vec<Arc<dyn LogCollector>>,
}

impl MultiCollector {
    /// Create a new multi-collector.
    pub fn new(collectors: Vec<Arc<dyn LogCollector>>) -> Self {
        Self { collectors }
    }
}

impl LogCollector for MultiCollector {
    fn collect(&self, event: LogEvent) {
        for collector in &self.collectors {
            collector.collect(event.clone());
        }
    }

    fn len(&self) -> usize {
        self.collectors.first().map(|c| c.len()).unwrap_or(0)
    }
}
