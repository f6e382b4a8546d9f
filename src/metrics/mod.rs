//! Operation counters for the tiling runtime.

use std::time::Duration;

use serde_json::json;

use crate::logging::{LogFields, LogLevel, LogRecord};

/// Accumulates per-command counters across a runtime's lifetime.
#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    commands: u64,
    splits: u64,
    swaps: u64,
    closes: u64,
    switches: u64,
    resizes: u64,
    content_updates: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_command(&mut self) {
        self.commands = self.commands.saturating_add(1);
    }

    pub fn record_split(&mut self) {
        self.splits = self.splits.saturating_add(1);
    }

    pub fn record_swap(&mut self) {
        self.swaps = self.swaps.saturating_add(1);
    }

    pub fn record_close(&mut self) {
        self.closes = self.closes.saturating_add(1);
    }

    pub fn record_switch(&mut self) {
        self.switches = self.switches.saturating_add(1);
    }

    pub fn record_resize(&mut self) {
        self.resizes = self.resizes.saturating_add(1);
    }

    pub fn record_content_update(&mut self) {
        self.content_updates = self.content_updates.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            commands: self.commands,
            splits: self.splits,
            swaps: self.swaps,
            closes: self.closes,
            switches: self.switches,
            resizes: self.resizes,
            content_updates: self.content_updates,
        }
    }
}

/// Point-in-time copy of the counters, ready for log export.
#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub commands: u64,
    pub splits: u64,
    pub swaps: u64,
    pub closes: u64,
    pub switches: u64,
    pub resizes: u64,
    pub content_updates: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut fields = LogFields::new();
        fields.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        fields.insert("commands".to_string(), json!(self.commands));
        fields.insert("splits".to_string(), json!(self.splits));
        fields.insert("swaps".to_string(), json!(self.swaps));
        fields.insert("closes".to_string(), json!(self.closes));
        fields.insert("switches".to_string(), json!(self.switches));
        fields.insert("resizes".to_string(), json!(self.resizes));
        fields.insert("content_updates".to_string(), json!(self.content_updates));
        fields
    }

    pub fn to_log_record(&self, target: &str) -> LogRecord {
        LogRecord {
            fields: self.as_fields(),
            ..LogRecord::new(LogLevel::Info, target, "engine_metrics")
        }
    }
}
