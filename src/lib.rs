//! Experimental pilot implementation of the Mosaic tiling engine MVP.
//!
//! Mosaic manages a set of panes that exactly partition a fixed-size
//! container: panes split 50/50 in any direction, track their neighbors on
//! all four sides, swap places, and reclaim space when closed. The crate is
//! the in-process core only. Text editing, key dispatch, and on-screen
//! rendering are collaborators that consume the snapshots, adjacency lists,
//! and dirty-state tracking exposed here.
//!
//! Modules follow the orchestrator pattern (`mod core; pub use core::...`)
//! so implementation details can move without breaking downstream imports.

pub mod adjacency;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod pane;
pub mod registry;
pub mod runtime;

pub use adjacency::{edge_neighbors, first_full_neighbor, share_border};
pub use engine::{Command, CommandOutcome, LayoutEngine};
pub use error::{EngineError, Result};
pub use geometry::{Axis, Rect, Side, Size};
pub use logging::{
    FileSink, LogFields, LogLevel, LogRecord, LogSink, Logger, LoggingError, LoggingResult, kv,
};
pub use metrics::{EngineMetrics, MetricSnapshot};
pub use pane::{Pane, PaneContent, PaneId, PaneSnapshot};
pub use registry::{PaneRegistry, PaneState};
pub use runtime::{LayoutWatcher, MosaicRuntime, RuntimeConfig};
