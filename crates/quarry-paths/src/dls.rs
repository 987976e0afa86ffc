use std::collections::{HashMap, HashSet};

use quarry_core::{Edge, Graph, SearchError};

use crate::bfs::traverse_breadth_first;

/// Outcome of a depth-limited search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthLimited<N> {
    /// Path from start to goal, both included, at most `limit + 1` nodes.
    Found(Vec<N>),
    /// The limit cut the search short and the goal is reachable beyond it.
    LimitExceeded,
    /// The goal cannot be reached from the start at any depth.
    Absent,
}

impl<N> DepthLimited<N> {
    /// The path, if one was found.
    pub fn path(&self) -> Option<&[N]> {
        match self {
            Self::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// One level of the explicit depth-first stack.
struct Frame<N> {
    node: N,
    depth: usize,
    children: Vec<N>,
    next: usize,
}

/// Per-call state of a depth-limited search.
struct Dls<'g, G: Graph> {
    graph: &'g G,
    limit: usize,
    on_path: HashSet<G::Node>,
    /// Shallowest depth at which each node's subtree was fully explored.
    explored: HashMap<G::Node, usize>,
    cut_off: bool,
    nbuf: Vec<Edge<G::Node>>,
}

impl<G: Graph> Dls<'_, G> {
    fn frame(&mut self, node: G::Node, depth: usize) -> Result<Frame<G::Node>, SearchError> {
        self.nbuf.clear();
        self.graph.neighbors(&node, &mut self.nbuf)?;
        let children = if depth < self.limit {
            self.nbuf.drain(..).map(|e| e.to).collect()
        } else {
            if !self.nbuf.is_empty() {
                self.cut_off = true;
            }
            Vec::new()
        };
        Ok(Frame {
            node,
            depth,
            children,
            next: 0,
        })
    }

    fn run(&mut self, start: G::Node, goal: &G::Node) -> Result<Option<Vec<G::Node>>, SearchError> {
        if start == *goal {
            return Ok(Some(vec![start]));
        }

        self.on_path.insert(start.clone());
        let root = self.frame(start, 0)?;
        let mut stack = vec![root];

        loop {
            let Some(top) = stack.last_mut() else {
                return Ok(None);
            };
            let next = if top.next < top.children.len() {
                let child = top.children[top.next].clone();
                top.next += 1;
                Some((child, top.depth + 1))
            } else {
                None
            };

            match next {
                Some((child, depth)) => {
                    if child == *goal {
                        let mut path: Vec<G::Node> = stack.iter().map(|f| f.node.clone()).collect();
                        path.push(child);
                        return Ok(Some(path));
                    }
                    if self.on_path.contains(&child) {
                        continue;
                    }
                    if self.explored.get(&child).is_some_and(|&d| d <= depth) {
                        continue;
                    }
                    log::trace!("dls: descend into {child:?} at depth {depth}");
                    self.on_path.insert(child.clone());
                    let frame = self.frame(child, depth)?;
                    stack.push(frame);
                }
                None => {
                    if let Some(done) = stack.pop() {
                        self.on_path.remove(&done.node);
                        self.explored.insert(done.node, done.depth);
                    }
                }
            }
        }
    }
}

/// Depth-first search from `start` that never goes deeper than `limit`
/// edges (the start is depth 0).
///
/// Returns the first path found. A node is never revisited on the current
/// path, and a subtree already explored from some depth is only descended
/// again when reached at a strictly shallower depth, so any goal at true
/// depth ≤ `limit` is found.
///
/// When no path is found the outcome is [`DepthLimited::LimitExceeded`] if
/// the limit cut off at least one branch and the goal is reachable when
/// ignoring the limit, and [`DepthLimited::Absent`] otherwise. A goal that
/// is not in the graph at all is `Absent`; an unknown start is an error.
pub fn search_depth_limited<G: Graph>(
    graph: &G,
    start: G::Node,
    goal: &G::Node,
    limit: usize,
) -> Result<DepthLimited<G::Node>, SearchError> {
    if !graph.contains(&start) {
        return Err(SearchError::unknown(&start));
    }

    let mut ctx = Dls {
        graph,
        limit,
        on_path: HashSet::new(),
        explored: HashMap::new(),
        cut_off: false,
        nbuf: Vec::new(),
    };

    let outcome = match ctx.run(start.clone(), goal)? {
        Some(path) => DepthLimited::Found(path),
        None => {
            if ctx.cut_off && reachable(graph, start, goal)? {
                DepthLimited::LimitExceeded
            } else {
                DepthLimited::Absent
            }
        }
    };
    log::debug!(
        "dls {goal:?} limit {limit}: {} ({} subtrees explored)",
        match &outcome {
            DepthLimited::Found(path) => format!("found in {} hops", path.len() - 1),
            DepthLimited::LimitExceeded => "limit exceeded".to_string(),
            DepthLimited::Absent => "absent".to_string(),
        },
        ctx.explored.len()
    );
    Ok(outcome)
}

/// Run [`search_depth_limited`] with limits `0..=max_limit` and return the
/// first path found, which has the fewest possible edges.
///
/// Stops early on [`DepthLimited::Absent`]; otherwise returns the outcome
/// of the deepest attempt.
pub fn search_iterative_deepening<G: Graph>(
    graph: &G,
    start: G::Node,
    goal: &G::Node,
    max_limit: usize,
) -> Result<DepthLimited<G::Node>, SearchError> {
    let mut outcome = DepthLimited::Absent;
    for limit in 0..=max_limit {
        outcome = search_depth_limited(graph, start.clone(), goal, limit)?;
        if !matches!(outcome, DepthLimited::LimitExceeded) {
            break;
        }
    }
    Ok(outcome)
}

fn reachable<G: Graph>(graph: &G, start: G::Node, goal: &G::Node) -> Result<bool, SearchError> {
    if !graph.contains(goal) {
        return Ok(false);
    }
    for node in traverse_breadth_first(graph, start)? {
        if node? == *goal {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures, shortest_hops};
    use quarry_core::DiGraph;

    #[test]
    fn finds_goal_within_limit() {
        let g = fixtures::binary_tree();
        let res = search_depth_limited(&g, "A", &"D", 2).unwrap();
        assert_eq!(res, DepthLimited::Found(vec!["A", "B", "D"]));
    }

    #[test]
    fn path_excludes_dead_ends() {
        let g = fixtures::binary_tree();
        let res = search_depth_limited(&g, "A", &"G", 2).unwrap();
        assert_eq!(res.path(), Some(&["A", "C", "G"][..]));
    }

    #[test]
    fn goal_beyond_limit() {
        let g = fixtures::binary_tree();
        let res = search_depth_limited(&g, "A", &"H", 2).unwrap();
        assert_eq!(res, DepthLimited::LimitExceeded);
        let res = search_depth_limited(&g, "A", &"H", 3).unwrap();
        assert_eq!(res, DepthLimited::Found(vec!["A", "B", "D", "H"]));
    }

    #[test]
    fn missing_goal_is_absent() {
        let g = fixtures::binary_tree();
        assert_eq!(
            search_depth_limited(&g, "A", &"Z", 2).unwrap(),
            DepthLimited::Absent
        );
        // In the graph but not below the start.
        assert_eq!(
            search_depth_limited(&g, "B", &"C", 5).unwrap(),
            DepthLimited::Absent
        );
    }

    #[test]
    fn start_is_goal() {
        let g = fixtures::binary_tree();
        assert_eq!(
            search_depth_limited(&g, "A", &"A", 0).unwrap(),
            DepthLimited::Found(vec!["A"])
        );
    }

    #[test]
    fn unknown_start_is_an_error() {
        let g = fixtures::binary_tree();
        assert!(search_depth_limited(&g, "Q", &"A", 3).is_err());
    }

    #[test]
    fn cycles_terminate() {
        let mut g = DiGraph::new();
        g.add_undirected_edge('a', 'b', 1).unwrap();
        g.add_undirected_edge('b', 'c', 1).unwrap();
        g.add_edge('c', 'a', 1).unwrap();
        g.add_node('z');
        assert_eq!(
            search_depth_limited(&g, 'a', &'c', 10).unwrap(),
            DepthLimited::Found(vec!['a', 'b', 'c'])
        );
        assert_eq!(
            search_depth_limited(&g, 'a', &'z', 10).unwrap(),
            DepthLimited::Absent
        );
    }

    #[test]
    fn shallower_revisit_reopens_explored_subtree() {
        // B is explored first at depth 2 via A->X->B with no budget left;
        // A->B reaches it again at depth 1 and must find G.
        let g = DiGraph::from_adjacency([
            ("A", vec![("X", 1), ("B", 1)]),
            ("X", vec![("B", 1)]),
            ("B", vec![("G", 1)]),
        ])
        .unwrap();
        assert_eq!(
            search_depth_limited(&g, "A", &"G", 2).unwrap(),
            DepthLimited::Found(vec!["A", "B", "G"])
        );
    }

    #[test]
    fn iterative_deepening_finds_fewest_hops() {
        let (g, _) = fixtures::weighted();
        let res = search_iterative_deepening(&g, "A", &"G", 10).unwrap();
        assert_eq!(res, DepthLimited::Found(vec!["A", "C", "F", "G"]));
        assert_eq!(
            search_iterative_deepening(&g, "A", &"G", 2).unwrap(),
            DepthLimited::LimitExceeded
        );
        assert_eq!(
            search_iterative_deepening(&g, "G", &"A", 10).unwrap(),
            DepthLimited::Absent
        );
    }

    #[test]
    fn random_graphs_find_goals_within_limit() {
        for seed in 0..20 {
            let g = fixtures::random_graph(seed, 25, 45, 3);
            for goal in 1..25u32 {
                let Some(hops) = shortest_hops(&g, 0, &goal).unwrap() else {
                    assert_eq!(
                        search_depth_limited(&g, 0, &goal, 30).unwrap(),
                        DepthLimited::Absent
                    );
                    continue;
                };
                let hops = hops as usize;
                for limit in [hops, hops + 2] {
                    let res = search_depth_limited(&g, 0, &goal, limit).unwrap();
                    let path = res.path().expect("goal within limit must be found");
                    assert!(path.len() <= limit + 1, "seed {seed} goal {goal}");
                    assert_eq!(path.first(), Some(&0));
                    assert_eq!(path.last(), Some(&goal));
                }
                if hops > 0 {
                    assert_eq!(
                        search_depth_limited(&g, 0, &goal, hops - 1).unwrap(),
                        DepthLimited::LimitExceeded,
                        "seed {seed} goal {goal}"
                    );
                }
            }
        }
    }
}
