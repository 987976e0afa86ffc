use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use quarry_core::{Cost, Edge, Heuristic, HeuristicTable, SearchError};

use crate::graph::{AndOrGraph, NodeKind};
use crate::solution::{SolutionSubgraph, Successor};

/// Estimates and choices owned by one AO* run.
///
/// Pass it into [`solve_and_or`] and take the refined copy back; solving
/// again with the returned state changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "N: serde::Serialize",
        deserialize = "N: serde::Deserialize<'de> + Eq + Hash"
    ))
)]
pub struct AoState<N: Eq + Hash> {
    pub heuristics: HeuristicTable<N>,
    pub solution: SolutionSubgraph<N>,
}

impl<N: Clone + Eq + Hash> AoState<N> {
    /// Start from initial estimates and an empty solution.
    pub fn new(heuristics: HeuristicTable<N>) -> Self {
        Self {
            heuristics,
            solution: SolutionSubgraph::new(),
        }
    }

    /// Current cost estimate of `node`.
    pub fn cost_of(&self, node: &N) -> Option<Cost> {
        self.heuristics.get(node)
    }
}

/// AO*: refine the estimates below `root` until every node on the solution
/// from `root` is at its fixed point.
///
/// An OR node costs `min(edge + h(child))` over its children and chooses the
/// first cheapest child. An AND node costs the sum of `edge + h(child)` over
/// all children and commits to all of them. Whenever a node's cost or best
/// choice differs from what is recorded, its estimate and choice are
/// updated and the chosen children are refined in turn. Terminal estimates
/// are never changed.
///
/// A node shared between branches may improve after an ancestor on another
/// branch has settled, so the solution is swept again until no node on it
/// is stale.
///
/// Fails with [`SearchError::UnknownNode`] for a node missing from the graph
/// or the heuristic table, [`SearchError::InvalidHeuristic`] for a negative
/// estimate, [`SearchError::CostOverflow`] when a sum leaves the `i32` range
/// and [`SearchError::Malformed`] for a cycle below `root`.
pub fn solve_and_or<N: Clone + Eq + Hash + Debug>(
    graph: &AndOrGraph<N>,
    root: &N,
    state: AoState<N>,
) -> Result<AoState<N>, SearchError> {
    check_acyclic(graph, root)?;
    let mut ctx = AoSearch {
        graph,
        state,
        updates: 0,
    };
    ctx.refine(root, 0)?;

    let mut sweeps = 0usize;
    loop {
        sweeps += 1;
        // Reversed discovery order visits most descendants before their
        // ancestors.
        let order: Vec<N> = ctx
            .state
            .solution
            .reachable(root)
            .iter()
            .map(|(n, _)| n.clone())
            .collect();
        let mut settled = true;
        for node in order.iter().rev() {
            if ctx.is_stale(node)? {
                settled = false;
                ctx.refine(node, 0)?;
            }
        }
        if settled {
            break;
        }
    }

    log::debug!(
        "ao*: root {root:?} cost {:?} after {} updates and {sweeps} sweeps, {} solved nodes",
        ctx.state.cost_of(root),
        ctx.updates,
        ctx.state.solution.len()
    );
    Ok(ctx.state)
}

/// Reject a cycle among the nodes reachable from `root`. Nodes missing from
/// the graph are left for the search to report.
fn check_acyclic<N: Clone + Eq + Hash + Debug>(
    graph: &AndOrGraph<N>,
    root: &N,
) -> Result<(), SearchError> {
    let mut done: HashSet<N> = HashSet::new();
    let mut on_path: HashSet<N> = HashSet::new();
    // (node, index of the next child to visit)
    let mut stack: Vec<(N, usize)> = Vec::new();
    if graph.contains(root) {
        on_path.insert(root.clone());
        stack.push((root.clone(), 0));
    }
    while let Some((node, next)) = stack.last_mut() {
        let children = graph.children(node)?;
        let Some(edge) = children.get(*next) else {
            on_path.remove(node);
            done.insert(node.clone());
            stack.pop();
            continue;
        };
        *next += 1;
        let child = &edge.to;
        if on_path.contains(child) {
            return Err(SearchError::Malformed(format!("cycle through {child:?}")));
        }
        if graph.contains(child) && !done.contains(child) {
            on_path.insert(child.clone());
            stack.push((child.clone(), 0));
        }
    }
    Ok(())
}

struct AoSearch<'g, N: Eq + Hash> {
    graph: &'g AndOrGraph<N>,
    state: AoState<N>,
    updates: usize,
}

impl<N: Clone + Eq + Hash + Debug> AoSearch<'_, N> {
    fn estimate(&self, node: &N) -> Result<Cost, SearchError> {
        self.state.heuristics.checked_estimate(node)
    }

    /// `edge + h(child)`.
    fn through(&self, edge: &Edge<N>) -> Result<Cost, SearchError> {
        edge.cost
            .checked_add(self.estimate(&edge.to)?)
            .ok_or_else(|| SearchError::cost_overflow(&edge.to))
    }

    /// Cheapest choice at `node` under the current estimates; `None` for a
    /// terminal.
    fn best_choice(&self, node: &N) -> Result<Option<(Successor<N>, Cost)>, SearchError> {
        let graph = self.graph;
        let children = graph.children(node)?;
        match graph.kind(node)? {
            NodeKind::Terminal => Ok(None),
            NodeKind::Or => {
                let mut best: Option<(&N, Cost)> = None;
                for e in children {
                    let cost = self.through(e)?;
                    if best.is_none_or(|(_, b)| cost < b) {
                        best = Some((&e.to, cost));
                    }
                }
                Ok(best.map(|(n, cost)| (Successor::Single(n.clone()), cost)))
            }
            NodeKind::And => {
                let mut cost: Cost = 0;
                for e in children {
                    cost = cost
                        .checked_add(self.through(e)?)
                        .ok_or_else(|| SearchError::cost_overflow(node))?;
                }
                let group = children.iter().map(|e| e.to.clone()).collect();
                Ok(Some((Successor::Group(group), cost)))
            }
        }
    }

    /// Whether the recorded estimate or choice of `node` disagrees with its
    /// children's current estimates.
    fn is_stale(&self, node: &N) -> Result<bool, SearchError> {
        Ok(match self.best_choice(node)? {
            None => false,
            Some((choice, cost)) => {
                self.state.cost_of(node) != Some(cost)
                    || self.state.solution.get(node) != Some(&choice)
            }
        })
    }

    fn refine(&mut self, node: &N, level: usize) -> Result<(), SearchError> {
        self.graph.kind(node)?;
        let mut current = self.estimate(node)?;
        log::trace!("{:indent$}refine {node:?} (h = {current})", "", indent = level * 2);

        // Rounds repeat only while child estimates keep changing, which
        // stops on an acyclic graph.
        loop {
            let Some((choice, cost)) = self.best_choice(node)? else {
                return Ok(());
            };
            if cost == current && self.state.solution.get(node) == Some(&choice) {
                return Ok(());
            }
            if cost != current {
                log::trace!(
                    "{:indent$}{node:?}: h {current} -> {cost}, choose {:?}",
                    "",
                    choice.nodes(),
                    indent = level * 2
                );
                self.state.heuristics.set(node.clone(), cost);
                current = cost;
                self.updates += 1;
            }
            self.state.solution.set(node.clone(), choice.clone());
            for child in choice.nodes() {
                self.refine(child, level + 1)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    /// OR root A over B, C, D; B and C are AND nodes; the rest terminals.
    fn classic() -> (AndOrGraph<&'static str>, HeuristicTable<&'static str>) {
        let mut g = AndOrGraph::new();
        g.add_or("A", [("B", 1), ("C", 1), ("D", 1)]).unwrap();
        g.add_and("B", [("E", 1), ("F", 1)]).unwrap();
        g.add_and("C", [("G", 1), ("H", 1), ("I", 1)]).unwrap();
        for t in ["D", "E", "F", "G", "H", "I"] {
            g.add_terminal(t);
        }
        let h = [
            ("A", 7),
            ("B", 4),
            ("C", 2),
            ("D", 3),
            ("E", 6),
            ("F", 4),
            ("G", 2),
            ("H", 0),
            ("I", 0),
        ]
        .into_iter()
        .collect();
        (g, h)
    }

    #[test]
    fn classic_graph_converges() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (g, h) = classic();
        let state = solve_and_or(&g, &"A", AoState::new(h)).unwrap();

        // A first prefers C (1 + 2), which refines to 3 + 2 = 5, so A
        // switches to D (1 + 3).
        assert_eq!(state.cost_of(&"A"), Some(4));
        assert_eq!(state.cost_of(&"C"), Some(5));
        assert_eq!(state.cost_of(&"B"), Some(4));
        assert_eq!(state.solution.get(&"A"), Some(&Successor::Single("D")));
        assert_eq!(
            state.solution.get(&"C"),
            Some(&Successor::Group(vec!["G", "H", "I"]))
        );
        assert_eq!(state.solution.render(&"A"), "A\n  D\n");
    }

    #[test]
    fn terminal_estimates_are_fixed() {
        let (g, h) = classic();
        let before = h.clone();
        let state = solve_and_or(&g, &"A", AoState::new(h)).unwrap();
        for t in ["D", "E", "F", "G", "H", "I"] {
            assert_eq!(state.cost_of(&t), before.get(&t), "{t}");
        }
    }

    #[test]
    fn rerunning_changes_nothing() {
        let (g, h) = classic();
        let once = solve_and_or(&g, &"A", AoState::new(h)).unwrap();
        let twice = solve_and_or(&g, &"A", once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn converged_estimates_rebuild_the_same_solution() {
        let (g, h) = classic();
        let solved = solve_and_or(&g, &"A", AoState::new(h)).unwrap();
        let fresh = solve_and_or(&g, &"A", AoState::new(solved.heuristics.clone())).unwrap();
        assert_eq!(fresh.heuristics, solved.heuristics);
        assert_eq!(
            fresh.solution.reachable(&"A"),
            solved.solution.reachable(&"A")
        );
        assert_eq!(fresh.solution.render(&"A"), solved.solution.render(&"A"));
    }

    #[test]
    fn and_root_commits_to_every_child() {
        let mut g = AndOrGraph::new();
        g.add_and("R", [("X", 2), ("Y", 3)]).unwrap();
        g.add_or("X", [("P", 1), ("Q", 4)]).unwrap();
        for t in ["Y", "P", "Q"] {
            g.add_terminal(t);
        }
        let h = [("R", 0), ("X", 0), ("Y", 1), ("P", 5), ("Q", 0)]
            .into_iter()
            .collect();
        let state = solve_and_or(&g, &"R", AoState::new(h)).unwrap();
        // X = min(1 + 5, 4 + 0) = 4; R = (2 + 4) + (3 + 1) = 10.
        assert_eq!(state.cost_of(&"X"), Some(4));
        assert_eq!(state.cost_of(&"R"), Some(10));
        assert_eq!(state.solution.render(&"R"), "R\n  X [AND]\n    Q\n  Y [AND]\n");
    }

    #[test]
    fn or_ties_keep_the_first_child() {
        let mut g = AndOrGraph::new();
        g.add_or("A", [("B", 1), ("C", 1)]).unwrap();
        g.add_terminal("B");
        g.add_terminal("C");
        let h = [("A", 0), ("B", 2), ("C", 2)].into_iter().collect();
        let state = solve_and_or(&g, &"A", AoState::new(h)).unwrap();
        assert_eq!(state.solution.get(&"A"), Some(&Successor::Single("B")));
    }

    #[test]
    fn terminal_root_has_no_solution() {
        let (g, h) = classic();
        let state = solve_and_or(&g, &"D", AoState::new(h)).unwrap();
        assert!(state.solution.is_empty());
        assert_eq!(state.solution.render(&"D"), "D\n");
    }

    #[test]
    fn missing_heuristic_is_unknown() {
        let (g, h) = classic();
        let h: HeuristicTable<_> = h.iter().filter(|(n, _)| **n != "I").map(|(n, v)| (*n, v)).collect();
        assert_eq!(
            solve_and_or(&g, &"A", AoState::new(h)),
            Err(SearchError::unknown(&"I"))
        );
    }

    #[test]
    fn missing_nodes_are_unknown() {
        let (g, h) = classic();
        assert_eq!(
            solve_and_or(&g, &"Z", AoState::new(h)),
            Err(SearchError::unknown(&"Z"))
        );

        let mut g = AndOrGraph::new();
        g.add_or("A", [("Z", 1)]).unwrap();
        let h = [("A", 0), ("Z", 0)].into_iter().collect();
        assert_eq!(
            solve_and_or(&g, &"A", AoState::new(h)),
            Err(SearchError::unknown(&"Z"))
        );
    }

    #[test]
    fn negative_estimate_is_rejected() {
        let (g, mut h) = classic();
        h.set("E", -1);
        h.set("C", 9);
        h.set("D", 9);
        assert_eq!(
            solve_and_or(&g, &"A", AoState::new(h)),
            Err(SearchError::invalid_heuristic(&"E", -1))
        );
    }

    #[test]
    fn cycles_are_malformed() {
        let mut g = AndOrGraph::new();
        g.add_or("A", [("B", 1)]).unwrap();
        g.add_or("B", [("A", 1)]).unwrap();
        let h = [("A", 0), ("B", 0)].into_iter().collect();
        assert!(matches!(
            solve_and_or(&g, &"A", AoState::new(h)),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn wide_cycles_fail_fast() {
        // Every node fans out twice to the next one and the last points back
        // to the first; walking all paths would take 2^40 steps.
        let mut g = AndOrGraph::new();
        let mut h = HeuristicTable::new();
        for v in 0..40u32 {
            let next = (v + 1) % 40;
            g.add_and(v, [(next, 1), (next, 1)]).unwrap();
            h.set(v, 0);
        }
        assert!(matches!(
            solve_and_or(&g, &0, AoState::new(h)),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn shared_child_improvement_reaches_every_ancestor() {
        // Y is reached both through R directly and through W -> X. X settles
        // on Z before Y is refined down from 10 to 1.
        let mut g = AndOrGraph::new();
        g.add_and("R", [("W", 1), ("Y", 1)]).unwrap();
        g.add_or("W", [("X", 1)]).unwrap();
        g.add_or("X", [("Y", 1), ("Z", 1)]).unwrap();
        g.add_or("Y", [("T", 1)]).unwrap();
        g.add_terminal("Z");
        g.add_terminal("T");
        let h = [("R", 0), ("W", 0), ("X", 0), ("Y", 10), ("Z", 5), ("T", 0)]
            .into_iter()
            .collect();
        let state = solve_and_or(&g, &"R", AoState::new(h)).unwrap();

        assert_eq!(state.cost_of(&"Y"), Some(1));
        assert_eq!(state.cost_of(&"X"), Some(2));
        assert_eq!(state.solution.get(&"X"), Some(&Successor::Single("Y")));
        assert_eq!(state.cost_of(&"W"), Some(3));
        assert_eq!(state.cost_of(&"R"), Some(6));
        assert_eq!(
            state.solution.render(&"R"),
            "R\n  W [AND]\n    X\n      Y\n        T\n  Y [AND]\n    T\n"
        );
        assert_eq!(solve_and_or(&g, &"R", state.clone()).unwrap(), state);
    }

    #[test]
    fn overflowing_sums_are_errors() {
        let mut g = AndOrGraph::new();
        g.add_and("A", [("B", Cost::MAX), ("C", 1)]).unwrap();
        g.add_terminal("B");
        g.add_terminal("C");
        let h: HeuristicTable<_> = [("A", 0), ("B", 0), ("C", 0)].into_iter().collect();
        assert_eq!(
            solve_and_or(&g, &"A", AoState::new(h)),
            Err(SearchError::cost_overflow(&"A"))
        );

        let mut g = AndOrGraph::new();
        g.add_or("A", [("B", 1)]).unwrap();
        g.add_terminal("B");
        let h = [("A", 0), ("B", Cost::MAX)].into_iter().collect();
        assert_eq!(
            solve_and_or(&g, &"A", AoState::new(h)),
            Err(SearchError::cost_overflow(&"B"))
        );
    }

    /// Random AND-OR DAG on `0..n`; edges only point to larger ids, and the
    /// last three nodes are terminals.
    fn random_dag(rng: &mut impl Rng, n: u32) -> (AndOrGraph<u32>, HeuristicTable<u32>) {
        let mut g = AndOrGraph::new();
        let mut h = HeuristicTable::new();
        for v in 0..n {
            h.set(v, rng.random_range(0..=20));
            if v + 3 >= n {
                g.add_terminal(v);
                continue;
            }
            let mut children: Vec<(u32, Cost)> = Vec::new();
            for _ in 0..rng.random_range(1..=3) {
                let to = rng.random_range(v + 1..n);
                if children.iter().all(|&(c, _)| c != to) {
                    children.push((to, rng.random_range(1..=5)));
                }
            }
            if rng.random_bool(0.5) {
                g.add_or(v, children).unwrap();
            } else {
                g.add_and(v, children).unwrap();
            }
        }
        (g, h)
    }

    /// Best choice at `node` recomputed from scratch.
    fn recompute(
        g: &AndOrGraph<u32>,
        h: &HeuristicTable<u32>,
        node: u32,
    ) -> Option<(Successor<u32>, Cost)> {
        let children = g.children(&node).unwrap();
        let through = |e: &Edge<u32>| e.cost + h.get(&e.to).unwrap();
        match g.kind(&node).unwrap() {
            NodeKind::Terminal => None,
            NodeKind::Or => {
                let mut best = &children[0];
                for e in &children[1..] {
                    if through(e) < through(best) {
                        best = e;
                    }
                }
                Some((Successor::Single(best.to), through(best)))
            }
            NodeKind::And => Some((
                Successor::Group(children.iter().map(|e| e.to).collect()),
                children.iter().map(through).sum(),
            )),
        }
    }

    #[test]
    fn random_dags_settle_everywhere_on_the_solution() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for round in 0..300 {
            let (g, h) = random_dag(&mut rng, 14);
            let state = solve_and_or(&g, &0, AoState::new(h)).unwrap();
            let solved = state.solution.reachable(&0);
            assert!(solved.get(&0).is_some(), "round {round}");
            for (node, choice) in solved.iter() {
                let (best, cost) = recompute(&g, &state.heuristics, *node).unwrap();
                assert_eq!(state.cost_of(node), Some(cost), "round {round} node {node}");
                assert_eq!(choice, &best, "round {round} node {node}");
                for child in choice.nodes() {
                    if g.kind(child).unwrap() != NodeKind::Terminal {
                        assert!(solved.get(child).is_some(), "round {round} child {child}");
                    }
                }
            }
            assert_eq!(solve_and_or(&g, &0, state.clone()).unwrap(), state, "round {round}");
        }
    }
}
