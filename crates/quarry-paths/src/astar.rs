use std::collections::HashMap;

use quarry_core::{Cost, Graph, Heuristic, PriorityQueue, SearchError};

/// A path together with its total edge cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<N> {
    /// Start to goal, both endpoints included.
    pub path: Vec<N>,
    pub cost: Cost,
}

/// Compute the cheapest path from `start` to `goal` using A*.
///
/// Returns the full path (including both endpoints), or an empty path if
/// `goal` cannot be reached. The result is cost-minimal when the heuristic
/// is admissible and consistent; edge costs are non-negative by
/// construction of the graph.
pub fn search_cost_optimal<G, H>(
    graph: &G,
    start: G::Node,
    goal: &G::Node,
    heuristic: &H,
) -> Result<Vec<G::Node>, SearchError>
where
    G: Graph,
    H: Heuristic<G::Node>,
{
    let route = search_cost_optimal_with_cost(graph, start, goal, heuristic)?;
    Ok(route.map(|r| r.path).unwrap_or_default())
}

/// Like [`search_cost_optimal`], but also reports the path cost. Returns
/// `None` if `goal` cannot be reached.
///
/// Fails if `start` or `goal` is not in the graph, or if the heuristic has
/// no entry for, or a negative estimate at, a node it is asked about. Costs
/// that leave the `i32` range fail with [`SearchError::CostOverflow`].
pub fn search_cost_optimal_with_cost<G, H>(
    graph: &G,
    start: G::Node,
    goal: &G::Node,
    heuristic: &H,
) -> Result<Option<Route<G::Node>>, SearchError>
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
    if start == *goal {
        return Ok(Some(Route {
            path: vec![start],
            cost: 0,
        }));
    }

    let mut cost_so_far: HashMap<G::Node, Cost> = HashMap::new();
    let mut came_from: HashMap<G::Node, G::Node> = HashMap::new();
    // Entries carry the g they were pushed with so stale ones can be skipped.
    let mut open: PriorityQueue<(G::Node, Cost)> = PriorityQueue::new();
    let mut nbuf = Vec::new();
    let mut expansions = 0usize;

    cost_so_far.insert(start.clone(), 0);
    open.push((start.clone(), 0), heuristic.checked_estimate(&start)?);

    let found = 'search: loop {
        let Some((current, current_g)) = open.pop() else {
            break 'search false;
        };

        // Skip stale entries.
        if cost_so_far.get(&current).is_some_and(|&best| current_g > best) {
            continue;
        }

        if current == *goal {
            break 'search true;
        }

        expansions += 1;
        nbuf.clear();
        graph.neighbors(&current, &mut nbuf)?;

        for edge in nbuf.drain(..) {
            let new_cost = current_g
                .checked_add(edge.cost)
                .ok_or_else(|| SearchError::cost_overflow(&edge.to))?;
            let improves = cost_so_far
                .get(&edge.to)
                .is_none_or(|&recorded| new_cost < recorded);
            if !improves {
                continue;
            }
            let priority = new_cost
                .checked_add(heuristic.checked_estimate(&edge.to)?)
                .ok_or_else(|| SearchError::cost_overflow(&edge.to))?;
            cost_so_far.insert(edge.to.clone(), new_cost);
            came_from.insert(edge.to.clone(), current.clone());
            log::trace!("astar: {current:?} -> {:?} g={new_cost} f={priority}", edge.to);
            open.push((edge.to, new_cost), priority);
        }
    };

    log::debug!("astar {start:?} -> {goal:?}: {expansions} expansions, found = {found}");

    if !found {
        return Ok(None);
    }

    // Reconstruct path.
    let mut path = vec![goal.clone()];
    let mut current = goal.clone();
    while current != start {
        let Some(prev) = came_from.get(&current) else {
            return Ok(None);
        };
        path.push(prev.clone());
        current = prev.clone();
    }
    path.reverse();

    let cost = cost_so_far.get(goal).copied().unwrap_or_default();
    Ok(Some(Route { path, cost }))
}
