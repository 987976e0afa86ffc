use std::collections::HashSet;

use quarry_core::{Graph, Heuristic, PriorityQueue, SearchError};

/// Greedy best-first expansion from `start` towards `goal`.
///
/// The frontier is ordered solely by `heuristic` (no path cost), with ties
/// popped in insertion order. Returns the expanded nodes in pop order; the
/// search stops as soon as `goal` is popped, so the last element is `goal`
/// exactly when it was reached. No predecessors are tracked.
///
/// A node that is already in the open set or already expanded is not
/// pushed again, so every node is expanded at most once.
///
/// Fails if `start` or `goal` is not in the graph, or if the heuristic has
/// no entry for, or a negative estimate at, a node it is asked about.
pub fn search_greedy_best_first<G, H>(
    graph: &G,
    start: G::Node,
    goal: &G::Node,
    heuristic: &H,
) -> Result<Vec<G::Node>, SearchError>
where
    G: Graph,
    H: Heuristic<G::Node>,
{
    if !graph.contains(&start) {
        return Err(SearchError::unknown(&start));
    }
    if !graph.contains(goal) {
        return Err(SearchError::unknown(goal));
    }

    let mut open = PriorityQueue::new();
    let mut in_open: HashSet<G::Node> = HashSet::new();
    let mut closed: HashSet<G::Node> = HashSet::new();
    let mut expanded = Vec::new();
    let mut nbuf = Vec::new();

    open.push(start.clone(), heuristic.checked_estimate(&start)?);
    in_open.insert(start);

    while let Some(current) = open.pop() {
        in_open.remove(&current);
        closed.insert(current.clone());
        expanded.push(current.clone());
        log::trace!("greedy: expand {current:?}");

        if current == *goal {
            break;
        }

        nbuf.clear();
        graph.neighbors(&current, &mut nbuf)?;
        for edge in nbuf.drain(..) {
            if in_open.contains(&edge.to) || closed.contains(&edge.to) {
                continue;
            }
            let h = heuristic.checked_estimate(&edge.to)?;
            in_open.insert(edge.to.clone());
            open.push(edge.to, h);
        }
    }

    log::debug!(
        "greedy {goal:?}: {} expansions, reached = {}",
        expanded.len(),
        expanded.last() == Some(goal)
    );
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use quarry_core::{DiGraph, HeuristicTable};

    #[test]
    fn classic_expansion_order() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (g, h) = fixtures::weighted();
        let order = search_greedy_best_first(&g, "A", &"G", &h).unwrap();
        assert_eq!(order, vec!["A", "B", "E", "H", "G"]);
    }

    #[test]
    fn ties_follow_insertion_order() {
        // Labels sort opposite to insertion order.
        let g = DiGraph::from_adjacency([
            ("s", vec![("z", 1), ("y", 1), ("x", 1)]),
            ("x", vec![("goal", 1)]),
        ])
        .unwrap();
        let order = search_greedy_best_first(&g, "s", &"goal", &|n: &&str| match *n {
            "goal" => 0,
            "s" => 5,
            _ => 1,
        })
        .unwrap();
        assert_eq!(order, vec!["s", "z", "y", "x", "goal"]);
    }

    #[test]
    fn shared_successor_is_pushed_once() {
        let g = DiGraph::from_adjacency([
            ("s", vec![("a", 1), ("b", 1)]),
            ("a", vec![("c", 1)]),
            ("b", vec![("c", 1)]),
            ("c", vec![("a", 1)]),
            ("t", vec![]),
        ])
        .unwrap();
        let h: HeuristicTable<&str> = [("s", 3), ("a", 1), ("b", 2), ("c", 4), ("t", 0)]
            .into_iter()
            .collect();
        let order = search_greedy_best_first(&g, "s", &"t", &h).unwrap();
        assert_eq!(order, vec!["s", "a", "b", "c"]);
    }

    #[test]
    fn missing_heuristic_is_an_error() {
        let (g, _) = fixtures::weighted();
        let h: HeuristicTable<&str> = [("A", 1)].into_iter().collect();
        assert!(matches!(
            search_greedy_best_first(&g, "A", &"G", &h),
            Err(SearchError::UnknownNode { .. })
        ));
    }

    #[test]
    fn negative_heuristic_is_rejected() {
        let (g, _) = fixtures::weighted();
        let res = search_greedy_best_first(&g, "A", &"G", &|_: &&str| -1);
        assert!(matches!(res, Err(SearchError::InvalidHeuristic { .. })));
    }

    #[test]
    fn unknown_goal_is_an_error() {
        let (g, h) = fixtures::weighted();
        assert!(search_greedy_best_first(&g, "A", &"Q", &h).is_err());
    }
}
