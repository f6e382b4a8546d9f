//! Pane module orchestrator.
//!
//! The pane record and its arena key are defined in the private `core`
//! module and re-exported here.

mod core;

pub use core::{Pane, PaneContent, PaneId, PaneSnapshot};
