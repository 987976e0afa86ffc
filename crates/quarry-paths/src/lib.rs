//! Graph search over any [`Graph`](quarry_core::Graph).
//!
//! - **BFS** lazy traversal ([`traverse_breadth_first`]) and hop-count maps
//!   ([`bfs_distances`])
//! - **Depth-limited DFS** with a three-way outcome ([`search_depth_limited`])
//!   and iterative deepening ([`search_iterative_deepening`])
//! - **Greedy best-first** expansion order ([`search_greedy_best_first`])
//! - **A\*** cost-optimal paths ([`search_cost_optimal`])
//! - **Grid pursuit**: one tracking step on a 4-connected grid ([`chase_step`])
//!
//! Every function allocates its own visited sets and frontiers, so repeated
//! or interleaved calls never observe each other's state. Diagnostics go to
//! the `log` facade at `debug` and `trace` level.

mod astar;
mod bfs;
mod distance;
mod dls;
mod greedy;
mod grid;

pub use astar::{Route, search_cost_optimal, search_cost_optimal_with_cost};
pub use bfs::{BreadthFirst, bfs_distances, shortest_hops, traverse_breadth_first};
pub use distance::manhattan;
pub use dls::{DepthLimited, search_depth_limited, search_iterative_deepening};
pub use greedy::search_greedy_best_first;
pub use grid::{GridGraph, chase_step};
