//! Log filtering for querying collected records.

use super::event::{LogEvent, LogLevel};
use crate::types::InstanceId;
use serde::{Deserialize, Serialize};

/// A filter for log events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogFilter {
    /// Minimum log level (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
    /// Maximum log level (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_level: Option<LogLevel>,
    /// Filter by instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<InstanceId>,
    /// Filter by module name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Filter by message content (case-insensitive contains).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_contains: Option<String>,
    /// Maximum number of events to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl LogFilter {
    /// Create a new empty filter (matches all events).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum log level.
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Set maximum log level.
    pub fn max_level(mut self, level: LogLevel) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Set exact log level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self.max_level = Some(level);
        self
    }

    /// Set instance filter.
    pub fn instance_id(mut self, instance_id: InstanceId) -> Self {
        self.instance_id = Some(instance_id);
        self
    }

    /// Set module filter.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Set message content filter.
    pub fn message_contains(mut self, pattern: impl Into<String>) -> Self {
        self.message_contains = Some(pattern.into());
        self
    }

    /// Set result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if an event matches this filter. `limit` is not considered.
    pub fn matches(&self, event: &LogEvent) -> bool {
        if let Some(min) = self.min_level {
            if event.level < min {
                return false;
            }
        }
        if let Some(max) = self.max_level {
            if event.level > max {
                return false;
            }
        }

        if let Some(instance_id) = self.instance_id {
            if event.instance_id != Some(instance_id) {
                return false;
            }
        }

        if let Some(ref module) = self.module {
            if event.module.as_ref() != Some(module) {
                return false;
            }
        }

        if let Some(ref pattern) = self.message_contains {
            if !event
                .message
                .to_lowercase()
                .contains(&pattern.to_lowercase())
            {
                return false;
            }
        }

        true
    }

    /// Check if this filter has any constraints.
    pub fn is_empty(&self) -> bool {
        self.min_level.is_none()
            && self.max_level.is_none()
            && self.instance_id.is_none()
            && self.module.is_none()
            && self.message_contains.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_all() {
        let filter = LogFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&LogEvent::guest("anything", vec![])));
        assert!(filter.matches(&LogEvent::new(LogLevel::Error, "boom")));
    }

    #[test]
    fn level_range() {
        let filter = LogFilter::new()
            .min_level(LogLevel::Info)
            .max_level(LogLevel::Warn);

        assert!(!filter.matches(&LogEvent::new(LogLevel::Debug, "d")));
        assert!(filter.matches(&LogEvent::new(LogLevel::Info, "i")));
        assert!(filter.matches(&LogEvent::new(LogLevel::Warn, "w")));
        assert!(!filter.matches(&LogEvent::new(LogLevel::Error, "e")));
    }

    #[test]
    fn instance_and_module() {
        let id = InstanceId::new(4);
        let filter = LogFilter::new().instance_id(id).module("hshg.wasm");

        let matching = LogEvent::guest("x", vec![])
            .with_instance_id(id)
            .with_module("hshg.wasm");
        let other_module = LogEvent::guest("x", vec![])
            .with_instance_id(id)
            .with_module("grid.wasm");

        assert!(filter.matches(&matching));
        assert!(!filter.matches(&other_module));
        assert!(!filter.matches(&LogEvent::guest("x", vec![])));
    }

    #[test]
    fn message_contains_is_case_insensitive() {
        let filter = LogFilter::new().message_contains("HELLO");
        assert!(filter.matches(&LogEvent::guest("say hello there", vec![])));
        assert!(!filter.matches(&LogEvent::guest("goodbye", vec![])));
    }

    #[test]
    fn filter_serialization() {
        let filter = LogFilter::new()
            .min_level(LogLevel::Warn)
            .module("hshg.wasm")
            .limit(50);

        let json = serde_json::to_string(&filter).unwrap();
        let parsed: LogFilter = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.min_level, Some(LogLevel::Warn));
        assert_eq!(parsed.module.as_deref(), Some("hshg.wasm"));
        assert_eq!(parsed.limit, Some(50));
        assert!(parsed.instance_id.is_none());
    }
}
