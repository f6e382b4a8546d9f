//! Structured JSON-line logging.
//!
//! One [`LogRecord`] per line, written through a pluggable [`LogSink`].
//! The engine and runtime never fail because a sink failed; dispatch paths
//! log best-effort and move on.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub type LogFields = Map<String, Value>;

pub type LoggingResult<T> = std::result::Result<T, LoggingError>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// A single structured log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ts_ms: u128,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "LogFields::is_empty")]
    pub fields: LogFields,
}

impl LogRecord {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ts_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            level,
            target: target.into(),
            message: message.into(),
            fields: LogFields::new(),
        }
    }

    /// Attach structured fields, consuming and returning the record so call
    /// sites can chain it off `new`.
    pub fn with(mut self, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.fields.extend(fields);
        self
    }
}

/// Field helper: `kv("panes", 3)`.
pub fn kv(key: &str, value: impl Into<Value>) -> (String, Value) {
    (key.to_string(), value.into())
}

/// Where records end up. Sinks are shared across the runtime and must stay
/// usable from any thread the host calls in from.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &LogRecord) -> LoggingResult<()>;
}

/// Cheap clonable handle over a shared sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) -> LoggingResult<()> {
        self.sink.write(&LogRecord::new(level, target, message))
    }

    pub fn log_record(&self, record: LogRecord) -> LoggingResult<()> {
        self.sink.write(&record)
    }
}

/// JSON-lines file sink with size-capped rotation: when the file would grow
/// past `max_bytes` it is truncated and restarted. `max_bytes == 0` means
/// unbounded.
pub struct FileSink {
    path: PathBuf,
    max_bytes: u64,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>, max_bytes: u64) -> LoggingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            max_bytes,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl LogSink for FileSink {
    fn write(&self, record: &LogRecord) -> LoggingResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut guard = self.writer.lock().expect("log writer mutex poisoned");
        if self.max_bytes > 0 {
            let current = guard.get_ref().metadata()?.len();
            if current + line.len() as u64 > self.max_bytes {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&self.path)?;
                *guard = BufWriter::new(file);
            }
        }
        guard.write_all(line.as_bytes())?;
        guard.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct CaptureSink {
        lines: StdMutex<Vec<String>>,
    }

    impl LogSink for CaptureSink {
        fn write(&self, record: &LogRecord) -> LoggingResult<()> {
            let line = serde_json::to_string(record)?;
            self.lines.lock().unwrap().push(line);
            Ok(())
        }
    }

    #[test]
    fn records_serialize_as_json_lines() {
        let sink = Arc::new(CaptureSink::default());
        let logger = Logger {
            sink: sink.clone(),
        };

        let record = LogRecord::new(LogLevel::Info, "mosaic::engine", "split")
            .with([kv("side", json!("right")), kv("panes", json!(2))]);
        logger.log_record(record).unwrap();

        let lines = sink.lines.lock().unwrap();
        let value: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["target"], "mosaic::engine");
        assert_eq!(value["fields"]["side"], "right");
    }

    #[test]
    fn empty_fields_are_omitted() {
        let record = LogRecord::new(LogLevel::Debug, "mosaic::engine", "noop");
        let value: Value = serde_json::to_value(&record).unwrap();
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn file_sink_rotates_at_the_cap() {
        let dir = std::env::temp_dir().join(format!("mosaic-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("engine.log");
        let _ = std::fs::remove_file(&path);

        let sink = FileSink::new(&path, 256).unwrap();
        for i in 0..50 {
            sink.write(&LogRecord::new(LogLevel::Info, "mosaic::test", format!("line {i}")))
                .unwrap();
        }

        let len = std::fs::metadata(&path).unwrap().len();
        assert!(len <= 256, "log grew past the cap: {len}");
        std::fs::remove_file(&path).ok();
    }
}
