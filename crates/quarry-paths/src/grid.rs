//! 4-connected grid graph and the per-tick pursuit step built on it.

use std::collections::HashSet;

use quarry_core::{Edge, Graph, Point, Range, SearchError};

use crate::astar::search_cost_optimal;
use crate::distance::manhattan;

/// Cells of a rectangle, linked to their passable cardinal neighbours with
/// unit cost. Cells outside the range or blocked are not part of the graph.
#[derive(Debug, Clone)]
pub struct GridGraph {
    range: Range,
    blocked: HashSet<Point>,
}

impl GridGraph {
    /// Create an open grid covering `range`.
    pub fn new(range: Range) -> Self {
        Self {
            range,
            blocked: HashSet::new(),
        }
    }

    /// Create a grid with the given cells blocked.
    pub fn with_blocked(range: Range, blocked: impl IntoIterator<Item = Point>) -> Self {
        Self {
            range,
            blocked: blocked.into_iter().collect(),
        }
    }

    /// Mark a cell as impassable.
    pub fn block(&mut self, p: Point) {
        self.blocked.insert(p);
    }

    /// The grid rectangle.
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Whether `p` is inside the range and not blocked.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.range.contains(p) && !self.blocked.contains(&p)
    }
}

impl Graph for GridGraph {
    type Node = Point;

    fn contains(&self, p: &Point) -> bool {
        self.is_passable(*p)
    }

    fn neighbors(&self, p: &Point, buf: &mut Vec<Edge<Point>>) -> Result<(), SearchError> {
        if !self.is_passable(*p) {
            return Err(SearchError::unknown(p));
        }
        for n in p.neighbors_4() {
            if self.is_passable(n) {
                buf.push(Edge { to: n, cost: 1 });
            }
        }
        Ok(())
    }
}

/// One tracking step: the cell `chaser` should move to next in order to
/// reach `target` along a shortest path.
///
/// Runs A* with the Manhattan heuristic. Returns `None` when the chaser is
/// already on the target or the target cannot be reached. Fails if either
/// cell is outside the grid or blocked.
pub fn chase_step(
    grid: &GridGraph,
    chaser: Point,
    target: Point,
) -> Result<Option<Point>, SearchError> {
    let path = search_cost_optimal(grid, chaser, &target, &|p: &Point| manhattan(*p, target))?;
    Ok(path.get(1).copied())
}
