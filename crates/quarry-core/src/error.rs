//! Error taxonomy shared by every search.
//!
//! Only structural problems are errors. An unreachable goal, an exhausted
//! depth limit or an absent goal are ordinary return values of the
//! individual searches.

use std::fmt::Debug;

use thiserror::Error;

/// Errors that abort a single search call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A referenced node is not part of the graph, tree or heuristic table.
    #[error("unknown node {node}")]
    UnknownNode { node: String },

    /// A heuristic returned a negative estimate.
    #[error("heuristic for node {node} is negative ({value})")]
    InvalidHeuristic { node: String, value: i32 },

    /// An edge with a negative cost was offered to a graph.
    #[error("edge {from} -> {to} has negative cost {cost}")]
    NegativeCost { from: String, to: String, cost: i32 },

    /// Summing edge costs and estimates left the `i32` range.
    #[error("path cost through node {node} overflows")]
    CostOverflow { node: String },

    /// The input structure violates its own shape rules (cycle in a tree,
    /// inner node without children, ...).
    #[error("malformed input: {0}")]
    Malformed(String),
}

impl SearchError {
    /// Build an [`UnknownNode`](Self::UnknownNode) from any debuggable node.
    pub fn unknown<N: Debug>(node: &N) -> Self {
        Self::UnknownNode {
            node: format!("{node:?}"),
        }
    }

    /// Build an [`InvalidHeuristic`](Self::InvalidHeuristic) error.
    pub fn invalid_heuristic<N: Debug>(node: &N, value: i32) -> Self {
        Self::InvalidHeuristic {
            node: format!("{node:?}"),
            value,
        }
    }

    /// Build a [`CostOverflow`](Self::CostOverflow) error.
    pub fn cost_overflow<N: Debug>(node: &N) -> Self {
        Self::CostOverflow {
            node: format!("{node:?}"),
        }
    }

    /// Build a [`NegativeCost`](Self::NegativeCost) error.
    pub fn negative_cost<N: Debug>(from: &N, to: &N, cost: i32) -> Self {
        Self::NegativeCost {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_message_uses_debug_form() {
        let err = SearchError::unknown(&"Z");
        assert_eq!(err.to_string(), "unknown node \"Z\"");
    }

    #[test]
    fn negative_cost_message() {
        let err = SearchError::negative_cost(&1, &2, -3);
        assert_eq!(err.to_string(), "edge 1 -> 2 has negative cost -3");
    }

    #[test]
    fn cost_overflow_message() {
        let err = SearchError::cost_overflow(&'c');
        assert_eq!(err.to_string(), "path cost through node 'c' overflows");
    }
}
