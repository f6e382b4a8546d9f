//! Synchronous command-dispatch shell around the tiling engine.
//!
//! The runtime owns the engine and the pane registry, feeds structural
//! commands through, and wires in the ambient concerns: structured logging,
//! metrics counters, and watcher notifications for the focus-indicator and
//! rendering collaborators. Everything is in-process and single-threaded;
//! each dispatch runs to completion before returning.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::engine::{Command, CommandOutcome, LayoutEngine};
use crate::error::Result;
use crate::geometry::Size;
use crate::logging::{LogLevel, LogRecord, Logger, kv};
use crate::metrics::EngineMetrics;
use crate::pane::{PaneContent, PaneId, PaneSnapshot};
use crate::registry::{PaneRegistry, PaneState};

/// Configuration knobs for the runtime.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the host.
    pub metrics: Option<Arc<Mutex<EngineMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables them.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "mosaic::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(EngineMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<EngineMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Collaborator hooks invoked after a dispatch changes the board.
///
/// Focus indicators listen on `active_changed`; renderers usually prefer
/// draining [`MosaicRuntime::take_dirty`] but can observe `layout_changed`
/// to schedule a repaint.
pub trait LayoutWatcher: Send {
    fn name(&self) -> &str {
        "layout_watcher"
    }

    fn active_changed(&mut self, _previous: Option<PaneId>, _current: Option<PaneId>) {}

    fn layout_changed(&mut self, _snapshot: &[PaneSnapshot]) {}
}

pub struct MosaicRuntime {
    engine: LayoutEngine,
    registry: PaneRegistry,
    watchers: Vec<Box<dyn LayoutWatcher>>,
    config: RuntimeConfig,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl MosaicRuntime {
    /// Runtime over an empty board.
    pub fn new(container: Size) -> Result<Self> {
        Ok(Self {
            engine: LayoutEngine::new(container)?,
            registry: PaneRegistry::new(),
            watchers: Vec::new(),
            config: RuntimeConfig::default(),
            start_instant: None,
            last_metrics_emit: None,
        })
    }

    /// Runtime whose board starts with a single root pane.
    pub fn with_root(container: Size, content: PaneContent) -> Result<Self> {
        let mut runtime = Self::new(container)?;
        runtime.engine.attach_content(content);
        runtime.registry.sync(&runtime.engine.snapshot());
        Ok(runtime)
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn registry(&self) -> &PaneRegistry {
        &self.registry
    }

    pub fn register_watcher<W>(&mut self, watcher: W)
    where
        W: LayoutWatcher + 'static,
    {
        self.watchers.push(Box::new(watcher));
    }

    /// Run one command through the engine, then reconcile the registry and
    /// notify watchers. Parse-level failures never reach this point; the
    /// only engine error is a rejected resize, which leaves the board
    /// untouched.
    pub fn dispatch(&mut self, command: &Command) -> Result<CommandOutcome> {
        self.ensure_started();
        let previous_active = self.engine.active();

        let outcome = match self.engine.apply(command) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "command_rejected",
                    [
                        kv("command", json!(command.describe())),
                        kv("error", json!(err.to_string())),
                    ],
                );
                return Err(err);
            }
        };

        self.record_metrics(command, &outcome);

        let snapshot = self.engine.snapshot();
        self.registry.sync(&snapshot);

        if outcome.active_changed {
            let current = self.engine.active();
            for watcher in &mut self.watchers {
                watcher.active_changed(previous_active, current);
            }
        }
        if outcome.layout_changed {
            for watcher in &mut self.watchers {
                watcher.layout_changed(&snapshot);
            }
        }

        self.log(
            LogLevel::Debug,
            "command_dispatched",
            [
                kv("command", json!(command.describe())),
                kv("layout_changed", json!(outcome.layout_changed)),
                kv("active_changed", json!(outcome.active_changed)),
                kv("panes", json!(self.engine.len())),
            ],
        );
        self.maybe_emit_metrics();
        Ok(outcome)
    }

    /// Parse and dispatch one line of the text command form.
    pub fn dispatch_line(&mut self, line: &str) -> Result<CommandOutcome> {
        match line.parse::<Command>() {
            Ok(command) => self.dispatch(&command),
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "command_rejected",
                    [kv("line", json!(line)), kv("error", json!(err.to_string()))],
                );
                Err(err)
            }
        }
    }

    /// Dispatch a whole command sequence, stopping at the first error.
    pub fn run_script<I>(&mut self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            self.dispatch(&command)?;
        }
        Ok(())
    }

    /// Drain panes that changed since the renderer last asked.
    pub fn take_dirty(&mut self) -> Vec<(PaneId, PaneState)> {
        self.registry.take_dirty()
    }

    fn ensure_started(&mut self) {
        if self.start_instant.is_some() {
            return;
        }
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log(
            LogLevel::Info,
            "runtime_started",
            [
                kv("watchers", json!(self.watchers.len())),
                kv("panes", json!(self.engine.len())),
            ],
        );
    }

    fn record_metrics(&mut self, command: &Command, outcome: &CommandOutcome) {
        let Some(metrics) = self.config.metrics.as_ref() else {
            return;
        };
        let Ok(mut guard) = metrics.lock() else {
            return;
        };
        guard.record_command();
        if outcome.is_noop() {
            return;
        }
        match command {
            Command::Split(_) => guard.record_split(),
            Command::Swap(_) => guard.record_swap(),
            Command::Close => guard.record_close(),
            Command::Switch(_) => guard.record_switch(),
            Command::Resize(_) => guard.record_resize(),
            Command::New(_) => guard.record_content_update(),
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let record = guard.snapshot(uptime).to_log_record(&self.config.metrics_target);
                let _ = logger.log_record(record);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let record = LogRecord::new(level, "mosaic::runtime", message).with(fields);
            let _ = logger.log_record(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::geometry::{Rect, Side};
    use crate::logging::{LogSink, LoggingResult};
    use std::sync::Mutex as StdMutex;

    struct NullSink;

    impl LogSink for NullSink {
        fn write(&self, _record: &LogRecord) -> LoggingResult<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FocusProbe {
        seen: Arc<StdMutex<Vec<(Option<PaneId>, Option<PaneId>)>>>,
    }

    impl LayoutWatcher for FocusProbe {
        fn name(&self) -> &str {
            "focus_probe"
        }

        fn active_changed(&mut self, previous: Option<PaneId>, current: Option<PaneId>) {
            self.seen.lock().unwrap().push((previous, current));
        }
    }

    fn runtime() -> MosaicRuntime {
        MosaicRuntime::with_root(Size::new(800, 600), "alpha".to_string()).unwrap()
    }

    #[test]
    fn dispatch_flows_into_the_registry() {
        let mut runtime = runtime();
        runtime.take_dirty();

        runtime.dispatch(&Command::Split(Side::Right)).unwrap();
        let dirty = runtime.take_dirty();
        assert_eq!(dirty.len(), 2);
        assert_eq!(runtime.registry().len(), 2);
        assert_eq!(runtime.registry().active_pane(), runtime.engine().active());
    }

    #[test]
    fn watchers_hear_about_focus_moves() {
        let mut runtime = runtime();
        let probe = FocusProbe::default();
        let seen = probe.seen.clone();
        runtime.register_watcher(probe);

        let root = runtime.engine().active();
        runtime.dispatch(&Command::Split(Side::Right)).unwrap();
        runtime.dispatch(&Command::Switch(Side::Left)).unwrap();

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, root);
        assert_eq!(events[1].1, root);
    }

    #[test]
    fn metrics_count_effective_commands_only() {
        let mut runtime = runtime();
        runtime.config_mut().enable_metrics();
        let handle = runtime.config_mut().metrics_handle().unwrap();

        runtime.dispatch(&Command::Split(Side::Right)).unwrap();
        // No neighbor above: a silent no-op that still counts as a command.
        runtime.dispatch(&Command::Swap(Side::Above)).unwrap();

        let snap = handle.lock().unwrap().snapshot(Duration::ZERO);
        assert_eq!(snap.commands, 2);
        assert_eq!(snap.splits, 1);
        assert_eq!(snap.swaps, 0);
    }

    #[test]
    fn rejected_lines_leave_the_board_untouched() {
        let mut runtime = runtime();
        runtime.config_mut().logger = Some(Logger::new(NullSink));
        runtime.take_dirty();

        let err = runtime.dispatch_line("split sideways").unwrap_err();
        assert!(matches!(err, EngineError::UnknownSide(_)));
        assert_eq!(runtime.engine().len(), 1);
        assert!(runtime.take_dirty().is_empty());

        let err = runtime.dispatch_line("resize 0 800").unwrap_err();
        assert!(matches!(err, EngineError::InvalidResize { .. }));
        assert_eq!(runtime.engine().container(), Size::new(800, 600));
    }

    #[test]
    fn scripts_drive_the_board_end_to_end() {
        let mut runtime = runtime();
        runtime
            .run_script([
                Command::Split(Side::Right),
                Command::New("beta".to_string()),
                Command::Switch(Side::Left),
                Command::Split(Side::Above),
                Command::New("gamma".to_string()),
            ])
            .unwrap();

        let snaps = runtime.engine().snapshot();
        assert_eq!(snaps.len(), 3);
        let rects: Vec<Rect> = snaps.iter().map(|s| s.rect).collect();
        assert!(rects.contains(&Rect::new(0, 0, 400, 300)));
        assert!(rects.contains(&Rect::new(0, 300, 400, 300)));
        assert!(rects.contains(&Rect::new(400, 0, 400, 600)));

        let gamma = snaps.iter().find(|s| s.content == "gamma").unwrap();
        assert!(gamma.is_active);
        assert_eq!(gamma.rect, Rect::new(0, 0, 400, 300));
    }

    #[test]
    fn text_script_matches_the_typed_form() {
        let mut a = runtime();
        let mut b = runtime();

        a.run_script([
            Command::Split(Side::Below),
            Command::Resize(Size::new(400, 300)),
        ])
        .unwrap();
        for line in ["split below", "resize 300 400"] {
            b.dispatch_line(line).unwrap();
        }

        let rects_a: Vec<Rect> = a.engine().snapshot().iter().map(|s| s.rect).collect();
        let rects_b: Vec<Rect> = b.engine().snapshot().iter().map(|s| s.rect).collect();
        assert_eq!(rects_a, rects_b);
    }
}
