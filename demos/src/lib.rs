//! Built-in scenarios and the pursuit simulation shared by the
//! `quarry-demo` binary and its tests.
//!
//! Every classic example is available as owned `String`-labelled data so
//! that it can be swapped for a scenario file loaded with
//! [`Scenario::load`].

use std::fs;
use std::path::Path;

use anyhow::Context;
use quarry_adversarial::GameTree;
use quarry_andor::AndOrGraph;
use quarry_core::{Cost, DiGraph, HeuristicTable, Point, Range, SearchError};
use quarry_paths::{GridGraph, chase_step};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A graph and an optional heuristic table, as read from a scenario file:
///
/// ```json
/// { "graph": { "A": [{ "to": "B", "cost": 1 }], "B": [] },
///   "heuristic": { "A": 1, "B": 0 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub graph: DiGraph<String>,
    #[serde(default)]
    pub heuristic: HeuristicTable<String>,
}

/// Read any JSON input file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

impl Scenario {
    /// Read a scenario from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        load_json(path)
    }

    /// Parse a scenario from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The weighted graph of the greedy and A* examples, with its
    /// goal-`G` heuristic.
    pub fn weighted() -> Result<Self, SearchError> {
        Self::build(
            vec![
                ("A", vec![("B", 11), ("C", 4), ("D", 7)]),
                ("B", vec![("E", 15)]),
                ("C", vec![("E", 10), ("F", 12)]),
                ("D", vec![("F", 25)]),
                ("E", vec![("H", 9)]),
                ("H", vec![("G", 10)]),
                ("F", vec![("G", 20)]),
                ("G", vec![]),
            ],
            vec![
                ("A", 40),
                ("B", 10),
                ("C", 35),
                ("D", 25),
                ("E", 19),
                ("F", 17),
                ("H", 10),
                ("G", 0),
            ],
        )
    }

    /// The unweighted network of the breadth-first example.
    pub fn network() -> Result<Self, SearchError> {
        Self::build(
            vec![
                ("S", vec![("A", 1), ("B", 1)]),
                ("A", vec![("C", 1), ("D", 1)]),
                ("C", vec![("E", 1), ("F", 1)]),
                ("E", vec![("K", 1)]),
                ("B", vec![("G", 1), ("H", 1)]),
                ("G", vec![("I", 1)]),
            ],
            vec![],
        )
    }

    /// Complete binary tree A..O of the depth-limited example.
    pub fn binary_tree() -> Result<Self, SearchError> {
        Self::build(
            vec![
                ("A", vec![("B", 1), ("C", 1)]),
                ("B", vec![("D", 1), ("E", 1)]),
                ("C", vec![("F", 1), ("G", 1)]),
                ("D", vec![("H", 1), ("I", 1)]),
                ("E", vec![("J", 1), ("K", 1)]),
                ("F", vec![("L", 1), ("M", 1)]),
                ("G", vec![("N", 1), ("O", 1)]),
            ],
            vec![],
        )
    }

    fn build(
        adjacency: Vec<(&str, Vec<(&str, Cost)>)>,
        heuristic: Vec<(&str, Cost)>,
    ) -> Result<Self, SearchError> {
        let graph = DiGraph::from_adjacency(adjacency.into_iter().map(|(from, edges)| {
            (
                from.to_string(),
                edges.into_iter().map(|(to, cost)| (to.to_string(), cost)),
            )
        }))?;
        let heuristic = heuristic
            .into_iter()
            .map(|(n, h)| (n.to_string(), h))
            .collect();
        Ok(Self { graph, heuristic })
    }
}

/// The two-ply game tree of the alpha-beta example.
pub fn classic_game_tree() -> GameTree<String> {
    let mut t: GameTree<String> = GameTree::new();
    t.add_inner("A".into(), ["B".into(), "C".into()]);
    t.add_inner("B".into(), ["D".into(), "E".into()]);
    t.add_inner("C".into(), ["F".into(), "G".into()]);
    for (leaf, v) in [("D", 3), ("E", 5), ("F", 2), ("G", 9)] {
        t.add_leaf(leaf.into(), v);
    }
    t
}

/// An AND-OR graph with initial estimates, as read from a file:
///
/// ```json
/// { "graph": { "A": { "kind": "or", "children": [{ "to": "B", "cost": 1 }] },
///              "B": { "kind": "terminal" } },
///   "heuristic": { "A": 0, "B": 2 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndOrScenario {
    pub graph: AndOrGraph<String>,
    pub heuristic: HeuristicTable<String>,
}

/// The AND-OR graph of the AO* example and its initial estimates.
pub fn classic_and_or() -> Result<AndOrScenario, SearchError> {
    let s = |x: &str| x.to_string();
    let mut g = AndOrGraph::new();
    g.add_or(s("A"), [(s("B"), 1), (s("C"), 1), (s("D"), 1)])?;
    g.add_and(s("B"), [(s("E"), 1), (s("F"), 1)])?;
    g.add_and(s("C"), [(s("G"), 1), (s("H"), 1), (s("I"), 1)])?;
    for t in ["D", "E", "F", "G", "H", "I"] {
        g.add_terminal(s(t));
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
    .map(|(n, v)| (s(n), v))
    .collect();
    Ok(AndOrScenario {
        graph: g,
        heuristic: h,
    })
}

// ---------------------------------------------------------------------------
// Pursuit
// ---------------------------------------------------------------------------

/// Settings of a pursuit round on a square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PursuitConfig {
    /// Side of the square grid.
    pub size: i32,
    /// Ticks before the evader is declared the winner.
    pub ticks: u32,
    /// The chaser moves once every `chaser_period` ticks.
    pub chaser_period: u32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            size: 10,
            ticks: 60,
            chaser_period: 1,
        }
    }
}

/// Result of a pursuit round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pursuit {
    pub caught: bool,
    /// Ticks played.
    pub ticks: u32,
    /// Every cell the chaser occupied, starting cell included.
    pub chaser_trail: Vec<Point>,
    pub evader: Point,
}

/// Play one round: the evader starts in the top-left corner and the chaser
/// in the opposite one. Each tick the evader moves with `evade`, then the
/// chaser takes one [`chase_step`] when its period comes up.
pub fn run_pursuit(
    config: &PursuitConfig,
    mut evade: impl FnMut(&GridGraph, Point) -> Point,
) -> Result<Pursuit, SearchError> {
    let grid = GridGraph::new(Range::new(0, 0, config.size, config.size));
    let mut evader = Point::new(0, 0);
    let mut chaser = Point::new(config.size - 1, config.size - 1);
    let mut trail = vec![chaser];
    let period = config.chaser_period.max(1);

    for tick in 1..=config.ticks {
        let next = evade(&grid, evader);
        if grid.is_passable(next) {
            evader = next;
        }
        if evader != chaser && tick % period == 0 {
            if let Some(step) = chase_step(&grid, chaser, evader)? {
                chaser = step;
                trail.push(chaser);
            }
        }
        log::trace!("tick {tick}: evader {evader}, chaser {chaser}");
        if evader == chaser {
            return Ok(Pursuit {
                caught: true,
                ticks: tick,
                chaser_trail: trail,
                evader,
            });
        }
    }
    Ok(Pursuit {
        caught: false,
        ticks: config.ticks,
        chaser_trail: trail,
        evader,
    })
}

/// Evader that stays put or steps to a random passable neighbour.
pub fn random_walk(rng: &mut impl Rng) -> impl FnMut(&GridGraph, Point) -> Point + '_ {
    move |grid: &GridGraph, p: Point| {
        let mut options = vec![p];
        options.extend(p.neighbors_4().into_iter().filter(|&n| grid.is_passable(n)));
        options[rng.random_range(0..options.len())]
    }
}
