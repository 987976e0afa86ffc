use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

/// The choice recorded for a solved node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Successor<N> {
    /// The best child of an OR node.
    Single(N),
    /// Every child of an AND node, in declaration order.
    Group(Vec<N>),
}

impl<N> Successor<N> {
    /// The chosen nodes as a slice.
    pub fn nodes(&self) -> &[N] {
        match self {
            Successor::Single(n) => std::slice::from_ref(n),
            Successor::Group(ns) => ns,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Successor::Group(_))
    }
}

/// Node → chosen successor, in the order nodes were first solved.
///
/// Entries for nodes the root no longer leads to may remain after a run;
/// [`render`](Self::render) and [`reachable`](Self::reachable) only follow
/// choices from the given root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        transparent,
        bound(
            serialize = "N: serde::Serialize",
            deserialize = "N: serde::Deserialize<'de> + Eq + Hash"
        )
    )
)]
pub struct SolutionSubgraph<N: Eq + Hash> {
    choices: IndexMap<N, Successor<N>>,
}

impl<N: Clone + Eq + Hash> SolutionSubgraph<N> {
    /// Create an empty subgraph.
    pub fn new() -> Self {
        Self {
            choices: IndexMap::new(),
        }
    }

    /// Choice recorded for `node`.
    pub fn get(&self, node: &N) -> Option<&Successor<N>> {
        self.choices.get(node)
    }

    pub(crate) fn set(&mut self, node: N, successor: Successor<N>) -> Option<Successor<N>> {
        self.choices.insert(node, successor)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &Successor<N>)> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// The part of the subgraph reachable from `root` by following choices.
    pub fn reachable(&self, root: &N) -> SolutionSubgraph<N> {
        let mut out = SolutionSubgraph::new();
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            if out.choices.contains_key(&node) {
                continue;
            }
            if let Some(succ) = self.choices.get(&node) {
                stack.extend(succ.nodes().iter().rev().cloned());
                out.choices.insert(node, succ.clone());
            }
        }
        out
    }

    /// Depth-first text rendering starting at `root`, one node per line,
    /// indented two spaces per level. Nodes committed to an AND group are
    /// tagged with `[AND]`.
    pub fn render(&self, root: &N) -> String
    where
        N: fmt::Display,
    {
        self.display(root).to_string()
    }

    /// [`Display`](fmt::Display) adapter for [`render`](Self::render).
    pub fn display<'a>(&'a self, root: &'a N) -> SolutionDisplay<'a, N> {
        SolutionDisplay {
            solution: self,
            root,
        }
    }
}

impl<N: Clone + Eq + Hash> Default for SolutionSubgraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a [`SolutionSubgraph`] from a root. See
/// [`SolutionSubgraph::render`].
pub struct SolutionDisplay<'a, N: Eq + Hash> {
    solution: &'a SolutionSubgraph<N>,
    root: &'a N,
}

impl<N: Clone + Eq + Hash + fmt::Display> SolutionDisplay<'_, N> {
    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &N,
        depth: usize,
        in_group: bool,
    ) -> fmt::Result {
        write!(f, "{:indent$}{node}", "", indent = depth * 2)?;
        if in_group {
            write!(f, " [AND]")?;
        }
        writeln!(f)?;
        // Solutions come from acyclic graphs; the depth check only stops a
        // hand-edited subgraph from recursing forever.
        if depth > self.solution.len() {
            return Ok(());
        }
        if let Some(succ) = self.solution.get(node) {
            let group = succ.is_group();
            for child in succ.nodes() {
                self.write_node(f, child, depth + 1, group)?;
            }
        }
        Ok(())
    }
}

impl<N: Clone + Eq + Hash + fmt::Display> fmt::Display for SolutionDisplay<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, 0, false)
    }
}
