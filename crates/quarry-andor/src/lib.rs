//! AND-OR graph search.
//!
//! An [`AndOrGraph`] mixes OR nodes (one child suffices) with AND nodes (all
//! children are needed). [`solve_and_or`] refines a table of cost estimates
//! until the best choices below the root stop changing, recording them in a
//! [`SolutionSubgraph`].
//!
//! ```
//! use quarry_andor::{AndOrGraph, AoState, solve_and_or};
//! use quarry_core::HeuristicTable;
//!
//! let mut g = AndOrGraph::new();
//! g.add_or("A", [("B", 1), ("C", 1)]).unwrap();
//! g.add_terminal("B");
//! g.add_terminal("C");
//! let h: HeuristicTable<_> = [("A", 0), ("B", 5), ("C", 2)].into_iter().collect();
//!
//! let state = solve_and_or(&g, &"A", AoState::new(h)).unwrap();
//! assert_eq!(state.cost_of(&"A"), Some(3));
//! assert_eq!(state.solution.render(&"A"), "A\n  C\n");
//! ```

mod graph;
mod solution;
mod solve;

pub use graph::{AndOrGraph, NodeKind};
pub use solution::{SolutionDisplay, SolutionSubgraph, Successor};
pub use solve::{AoState, solve_and_or};
