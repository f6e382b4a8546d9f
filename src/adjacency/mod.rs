//! Adjacency module orchestrator.
//!
//! Pure border predicates and neighbor queries used by every structural
//! operation. Implementation lives in the private `core` module.

mod core;

pub use core::{border_panes, edge_neighbors, first_full_neighbor, share_border};
