use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use quarry_core::{Cost, Edge, SearchError};

/// How a node combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    /// Solved by any one child.
    Or,
    /// Solved only by all children together.
    And,
    /// No children; its estimate is fixed.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "N: serde::Serialize",
        deserialize = "N: serde::Deserialize<'de>"
    ))
)]
struct AoNode<N> {
    kind: NodeKind,
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    children: Vec<Edge<N>>,
}

/// A finite, acyclic AND-OR graph with costed edges, kept in insertion
/// order.
///
/// Children may be declared before their own node is added; missing nodes
/// are reported when a search reaches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndOrGraph<N: Eq + Hash> {
    nodes: IndexMap<N, AoNode<N>>,
}

impl<N: Clone + Eq + Hash + Debug> AndOrGraph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Add (or replace) an OR node.
    pub fn add_or(
        &mut self,
        node: N,
        children: impl IntoIterator<Item = (N, Cost)>,
    ) -> Result<(), SearchError> {
        self.add_inner(node, NodeKind::Or, children)
    }

    /// Add (or replace) an AND node.
    pub fn add_and(
        &mut self,
        node: N,
        children: impl IntoIterator<Item = (N, Cost)>,
    ) -> Result<(), SearchError> {
        self.add_inner(node, NodeKind::And, children)
    }

    /// Add (or replace) a terminal node.
    pub fn add_terminal(&mut self, node: N) {
        self.nodes.insert(
            node,
            AoNode {
                kind: NodeKind::Terminal,
                children: Vec::new(),
            },
        );
    }

    fn add_inner(
        &mut self,
        node: N,
        kind: NodeKind,
        children: impl IntoIterator<Item = (N, Cost)>,
    ) -> Result<(), SearchError> {
        let mut edges = Vec::new();
        for (to, cost) in children {
            if cost < 0 {
                return Err(SearchError::negative_cost(&node, &to, cost));
            }
            edges.push(Edge { to, cost });
        }
        if edges.is_empty() {
            return Err(SearchError::Malformed(format!(
                "{kind:?} node {node:?} has no children"
            )));
        }
        self.nodes.insert(
            node,
            AoNode {
                kind,
                children: edges,
            },
        );
        Ok(())
    }

    /// Whether `node` has been added.
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(node)
    }

    /// Kind of `node`.
    pub fn kind(&self, node: &N) -> Result<NodeKind, SearchError> {
        self.nodes
            .get(node)
            .map(|n| n.kind)
            .ok_or_else(|| SearchError::unknown(node))
    }

    /// Children of `node` in declaration order; empty for a terminal.
    pub fn children(&self, node: &N) -> Result<&[Edge<N>], SearchError> {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .ok_or_else(|| SearchError::unknown(node))
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.keys()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Clone + Eq + Hash + Debug> Default for AndOrGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde")]
impl<N: serde::Serialize + Eq + Hash> serde::Serialize for AndOrGraph<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, N> serde::Deserialize<'de> for AndOrGraph<N>
where
    N: serde::Deserialize<'de> + Clone + Eq + Hash + Debug,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Every node goes through the checked constructors.
        let nodes = IndexMap::<N, AoNode<N>>::deserialize(deserializer)?;
        let mut graph = AndOrGraph::new();
        for (node, AoNode { kind, children }) in nodes {
            if kind == NodeKind::Terminal && !children.is_empty() {
                return Err(serde::de::Error::custom(SearchError::Malformed(format!(
                    "terminal node {node:?} has children"
                ))));
            }
            let edges = children.into_iter().map(|e| (e.to, e.cost));
            let added = match kind {
                NodeKind::Or => graph.add_or(node, edges),
                NodeKind::And => graph.add_and(node, edges),
                NodeKind::Terminal => {
                    graph.add_terminal(node);
                    Ok(())
                }
            };
            added.map_err(serde::de::Error::custom)?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_nodes_need_children() {
        let mut g = AndOrGraph::new();
        assert!(matches!(
            g.add_or("A", Vec::new()),
            Err(SearchError::Malformed(_))
        ));
        assert!(matches!(
            g.add_and("A", Vec::new()),
            Err(SearchError::Malformed(_))
        ));
        assert!(g.is_empty());
    }

    #[test]
    fn negative_edges_are_rejected() {
        let mut g = AndOrGraph::new();
        assert_eq!(
            g.add_and("A", [("B", 1), ("C", -2)]),
            Err(SearchError::negative_cost(&"A", &"C", -2))
        );
        assert!(!g.contains(&"A"));
    }

    #[test]
    fn accessors() {
        let mut g = AndOrGraph::new();
        g.add_and("B", [("E", 1), ("F", 2)]).unwrap();
        g.add_terminal("E");
        assert_eq!(g.kind(&"B").unwrap(), NodeKind::And);
        assert_eq!(g.kind(&"E").unwrap(), NodeKind::Terminal);
        let to: Vec<_> = g.children(&"B").unwrap().iter().map(|e| (e.to, e.cost)).collect();
        assert_eq!(to, vec![("E", 1), ("F", 2)]);
        assert!(g.children(&"E").unwrap().is_empty());
        assert_eq!(g.kind(&"F"), Err(SearchError::unknown(&"F")));
        assert_eq!(g.nodes().copied().collect::<Vec<_>>(), vec!["B", "E"]);
    }
}
