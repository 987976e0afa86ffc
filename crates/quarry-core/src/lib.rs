//! **quarry-core**: shared types for the quarry search toolkit.
//!
//! This crate provides the foundational pieces every search crate in the
//! workspace builds on: the [`Graph`] seam and its adjacency-list
//! implementation [`DiGraph`], heuristics, frontier containers with a
//! documented tie-break rule, grid geometry, and the [`SearchError`]
//! taxonomy.
//!
//! # Trait hierarchy
//!
//! | Item | Used by |
//! |---|---|
//! | [`Graph`] | every traversal and path search |
//! | [`Heuristic`] | greedy best-first, cost-optimal search |

pub mod error;
pub mod frontier;
pub mod geom;
pub mod graph;
pub mod heuristic;

pub use error::SearchError;
pub use frontier::{Fifo, PriorityQueue};
pub use geom::{Point, Range};
pub use graph::{Cost, DiGraph, Edge, Graph, PathNode};
pub use heuristic::{Heuristic, HeuristicTable, Zero};
