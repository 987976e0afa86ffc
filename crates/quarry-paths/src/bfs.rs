use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;

use quarry_core::{Cost, Edge, Fifo, Graph, PathNode, SearchError};

/// Lazy breadth-first traversal, created by [`traverse_breadth_first`].
///
/// Yields nodes in non-decreasing edge distance from the start. A node is
/// marked visited when it is enqueued, so it sits in the frontier at most
/// once and is yielded exactly once. The iterator is finite and cannot be
/// restarted; after an error it yields nothing more.
pub struct BreadthFirst<'g, G: Graph> {
    graph: &'g G,
    queue: Fifo<G::Node>,
    visited: HashSet<G::Node>,
    nbuf: Vec<Edge<G::Node>>,
    failed: bool,
}

/// Start a breadth-first traversal of `graph` from `start`.
///
/// Fails with [`SearchError::UnknownNode`] if `start` is not in the graph.
///
/// ```
/// use quarry_core::DiGraph;
/// use quarry_paths::traverse_breadth_first;
///
/// let g = DiGraph::from_adjacency([("S", vec![("A", 1), ("B", 1)]), ("A", vec![("C", 1)])]).unwrap();
/// let order: Vec<_> = traverse_breadth_first(&g, "S")
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(order, vec!["S", "A", "B", "C"]);
/// ```
pub fn traverse_breadth_first<G: Graph>(
    graph: &G,
    start: G::Node,
) -> Result<BreadthFirst<'_, G>, SearchError> {
    if !graph.contains(&start) {
        return Err(SearchError::unknown(&start));
    }
    let mut visited = HashSet::new();
    visited.insert(start.clone());
    let mut queue = Fifo::new();
    queue.push(start);
    Ok(BreadthFirst {
        graph,
        queue,
        visited,
        nbuf: Vec::new(),
        failed: false,
    })
}

impl<G: Graph> Iterator for BreadthFirst<'_, G> {
    type Item = Result<G::Node, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let current = self.queue.pop()?;

        self.nbuf.clear();
        if let Err(err) = self.graph.neighbors(&current, &mut self.nbuf) {
            self.failed = true;
            return Some(Err(err));
        }
        for edge in self.nbuf.drain(..) {
            if self.visited.insert(edge.to.clone()) {
                self.queue.push(edge.to);
            }
        }
        log::trace!("bfs: visit {current:?}, frontier {}", self.queue.len());
        Some(Ok(current))
    }
}

impl<G: Graph> FusedIterator for BreadthFirst<'_, G> {}

/// Compute a breadth-first hop-count map from `start`.
///
/// Each edge counts 1 regardless of its cost. Expansion stops at nodes
/// `max_depth` hops away. Returns every reached node with its hop count,
/// in visiting order.
pub fn bfs_distances<G: Graph>(
    graph: &G,
    start: G::Node,
    max_depth: Cost,
) -> Result<Vec<PathNode<G::Node>>, SearchError> {
    if !graph.contains(&start) {
        return Err(SearchError::unknown(&start));
    }

    let mut depth: HashMap<G::Node, Cost> = HashMap::new();
    let mut queue = Fifo::new();
    let mut results = Vec::new();
    let mut nbuf = Vec::new();

    depth.insert(start.clone(), 0);
    queue.push(start);

    while let Some(current) = queue.pop() {
        let d = depth.get(&current).copied().unwrap_or_default();
        results.push(PathNode {
            node: current.clone(),
            cost: d,
        });
        if d >= max_depth {
            continue;
        }

        nbuf.clear();
        graph.neighbors(&current, &mut nbuf)?;
        for edge in nbuf.drain(..) {
            if depth.contains_key(&edge.to) {
                continue;
            }
            depth.insert(edge.to.clone(), d + 1);
            queue.push(edge.to);
        }
    }

    Ok(results)
}

/// Fewest edges on any path from `start` to `goal`, or `None` if `goal`
/// cannot be reached.
pub fn shortest_hops<G: Graph>(
    graph: &G,
    start: G::Node,
    goal: &G::Node,
) -> Result<Option<Cost>, SearchError> {
    let map = bfs_distances(graph, start, Cost::MAX)?;
    Ok(map.into_iter().find(|pn| pn.node == *goal).map(|pn| pn.cost))
}
