//! Graph model: the [`Graph`] seam and the [`DiGraph`] adjacency list.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::SearchError;

/// Edge and path cost. Graphs never hold negative costs.
pub type Cost = i32;

/// Outgoing edge: destination plus non-negative traversal cost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge<N> {
    pub to: N,
    pub cost: Cost,
}

/// A node with an associated cost, returned from distance-map queries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode<N> {
    pub node: N,
    pub cost: Cost,
}

/// Read-only view of a finite directed graph.
///
/// Every search in the workspace consumes a graph through this trait. The
/// graph must not change while a search runs.
pub trait Graph {
    type Node: Clone + Eq + Hash + Debug;

    /// Whether `node` is part of the graph.
    fn contains(&self, node: &Self::Node) -> bool;

    /// Append the outgoing edges of `node` into `buf`, in their declared
    /// order. The caller clears `buf` before calling.
    ///
    /// Fails with [`SearchError::UnknownNode`] if `node` is absent.
    fn neighbors(
        &self,
        node: &Self::Node,
        buf: &mut Vec<Edge<Self::Node>>,
    ) -> Result<(), SearchError>;
}

// ---------------------------------------------------------------------------
// DiGraph
// ---------------------------------------------------------------------------

/// Directed graph stored as an insertion-ordered adjacency list.
///
/// Adding an edge registers its destination as a node, so every node that
/// is referenced by an edge can be queried. Undirected links are two
/// directed edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiGraph<N: Eq + Hash> {
    adjacency: IndexMap<N, Vec<Edge<N>>>,
}

impl<N: Clone + Eq + Hash + Debug> DiGraph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }

    /// Build a graph from `(node, [(neighbor, cost), ...])` pairs.
    ///
    /// ```
    /// use quarry_core::DiGraph;
    ///
    /// let g = DiGraph::from_adjacency([
    ///     ("A", vec![("B", 1), ("C", 4)]),
    ///     ("B", vec![("C", 2)]),
    /// ])
    /// .unwrap();
    /// assert_eq!(g.len(), 3);
    /// ```
    pub fn from_adjacency<I, E>(adjacency: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (N, E)>,
        E: IntoIterator<Item = (N, Cost)>,
    {
        let mut graph = Self::new();
        for (from, edges) in adjacency {
            graph.add_node(from.clone());
            for (to, cost) in edges {
                graph.add_edge(from.clone(), to, cost)?;
            }
        }
        Ok(graph)
    }

    /// Register a node without edges. Returns `false` if it already existed.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, Vec::new());
        true
    }

    /// Append a directed edge. Negative costs are rejected.
    pub fn add_edge(&mut self, from: N, to: N, cost: Cost) -> Result<(), SearchError> {
        if cost < 0 {
            return Err(SearchError::negative_cost(&from, &to, cost));
        }
        self.add_node(to.clone());
        self.adjacency
            .entry(from)
            .or_default()
            .push(Edge { to, cost });
        Ok(())
    }

    /// Append the two directed edges of an undirected link.
    pub fn add_undirected_edge(&mut self, a: N, b: N, cost: Cost) -> Result<(), SearchError> {
        self.add_edge(a.clone(), b.clone(), cost)?;
        self.add_edge(b, a, cost)
    }

    /// Outgoing edges of `node`, in insertion order.
    pub fn edges(&self, node: &N) -> Result<&[Edge<N>], SearchError> {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .ok_or_else(|| SearchError::unknown(node))
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

impl<N: Clone + Eq + Hash + Debug> Default for DiGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + Eq + Hash + Debug> Graph for DiGraph<N> {
    type Node = N;

    fn contains(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    fn neighbors(&self, node: &N, buf: &mut Vec<Edge<N>>) -> Result<(), SearchError> {
        buf.extend_from_slice(self.edges(node)?);
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<N: serde::Serialize + Eq + Hash> serde::Serialize for DiGraph<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.adjacency.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, N> serde::Deserialize<'de> for DiGraph<N>
where
    N: serde::Deserialize<'de> + Clone + Eq + Hash + Debug,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Costs are re-validated on the way in.
        let adjacency = IndexMap::<N, Vec<Edge<N>>>::deserialize(deserializer)?;
        DiGraph::from_adjacency(
            adjacency
                .into_iter()
                .map(|(from, edges)| (from, edges.into_iter().map(|e| (e.to, e.cost)))),
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DiGraph<&'static str> {
        DiGraph::from_adjacency([
            ("A", vec![("B", 11), ("C", 4), ("D", 7)]),
            ("B", vec![("E", 15)]),
            ("C", vec![("E", 10), ("F", 12)]),
        ])
        .unwrap()
    }

    #[test]
    fn edges_keep_declared_order() {
        let g = sample();
        let to: Vec<_> = g.edges(&"A").unwrap().iter().map(|e| e.to).collect();
        assert_eq!(to, vec!["B", "C", "D"]);
    }

    #[test]
    fn destinations_become_nodes() {
        let g = sample();
        assert!(g.contains(&"F"));
        assert!(g.edges(&"F").unwrap().is_empty());
        assert_eq!(g.len(), 6);
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let g = sample();
        assert_eq!(g.edges(&"Z"), Err(SearchError::unknown(&"Z")));
        let mut buf = Vec::new();
        assert!(g.neighbors(&"Z", &mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn negative_cost_rejected() {
        let mut g = DiGraph::new();
        let err = g.add_edge('a', 'b', -1).unwrap_err();
        assert!(matches!(err, SearchError::NegativeCost { cost: -1, .. }));
        assert!(g.is_empty());
    }

    #[test]
    fn undirected_edge_adds_both_directions() {
        let mut g = DiGraph::new();
        g.add_undirected_edge(1, 2, 3).unwrap();
        assert_eq!(g.edges(&1).unwrap(), &[Edge { to: 2, cost: 3 }]);
        assert_eq!(g.edges(&2).unwrap(), &[Edge { to: 1, cost: 3 }]);
    }

    #[test]
    fn neighbors_appends_to_buffer() {
        let g = sample();
        let mut buf = Vec::new();
        g.neighbors(&"C", &mut buf).unwrap();
        assert_eq!(
            buf,
            vec![Edge { to: "E", cost: 10 }, Edge { to: "F", cost: 12 }]
        );
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut g = DiGraph::new();
        assert!(g.add_node("x"));
        assert!(!g.add_node("x"));
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![&"x"]);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn graph_round_trip() {
        let g = DiGraph::from_adjacency([("a".to_string(), vec![("b".to_string(), 2)])]).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: DiGraph<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn deserialize_rejects_negative_cost() {
        let json = r#"{"a": [{"to": "b", "cost": -4}]}"#;
        let res: Result<DiGraph<String>, _> = serde_json::from_str(json);
        assert!(res.is_err());
    }
}
