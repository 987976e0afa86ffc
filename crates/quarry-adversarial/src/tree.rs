use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use quarry_core::SearchError;

/// Game value. Larger is better for the maximizing player.
pub type Score = i32;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
enum TreeNode<N> {
    Inner(Vec<N>),
    Leaf(Score),
}

/// An explicit, finite game tree. Inner nodes list their children in
/// evaluation order; leaves carry a terminal value.
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
pub struct GameTree<N: Eq + Hash> {
    nodes: IndexMap<N, TreeNode<N>>,
}

impl<N: Clone + Eq + Hash + Debug> GameTree<N> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Add (or replace) an inner node with the given ordered children.
    pub fn add_inner(&mut self, node: N, children: impl IntoIterator<Item = N>) {
        self.nodes
            .insert(node, TreeNode::Inner(children.into_iter().collect()));
    }

    /// Add (or replace) a leaf with its terminal value.
    pub fn add_leaf(&mut self, node: N, value: Score) {
        self.nodes.insert(node, TreeNode::Leaf(value));
    }

    /// Whether `node` has been added.
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(node)
    }

    /// Children of `node`; empty for a leaf.
    pub fn children(&self, node: &N) -> Result<&[N], SearchError> {
        match self.nodes.get(node) {
            Some(TreeNode::Inner(children)) => Ok(children),
            Some(TreeNode::Leaf(_)) => Ok(&[]),
            None => Err(SearchError::unknown(node)),
        }
    }

    /// Terminal value of `node`, or `None` for an inner node.
    pub fn leaf_value(&self, node: &N) -> Result<Option<Score>, SearchError> {
        match self.nodes.get(node) {
            Some(TreeNode::Leaf(v)) => Ok(Some(*v)),
            Some(TreeNode::Inner(_)) => Ok(None),
            None => Err(SearchError::unknown(node)),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Clone + Eq + Hash + Debug> Default for GameTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of a search together with how much of the tree it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub value: Score,
    pub leaves_visited: usize,
    pub nodes_visited: usize,
}

/// Minimax value of `node`, evaluated for the maximizing player when
/// `maximizing` is true and for the minimizing player otherwise.
///
/// With `pruning`, branches are cut with an alpha-beta window; the value is
/// the same as without pruning.
///
/// ```
/// use quarry_adversarial::{GameTree, evaluate_adversarial};
///
/// let mut t = GameTree::new();
/// t.add_inner("A", ["B", "C"]);
/// t.add_leaf("B", 3);
/// t.add_leaf("C", 5);
/// assert_eq!(evaluate_adversarial(&t, &"A", true, true).unwrap(), 5);
/// assert_eq!(evaluate_adversarial(&t, &"A", false, true).unwrap(), 3);
/// ```
pub fn evaluate_adversarial<N: Clone + Eq + Hash + Debug>(
    tree: &GameTree<N>,
    node: &N,
    maximizing: bool,
    pruning: bool,
) -> Result<Score, SearchError> {
    evaluate_with_stats(tree, node, maximizing, pruning).map(|e| e.value)
}

/// Like [`evaluate_adversarial`], also counting visited nodes and leaves.
///
/// Fails with [`SearchError::UnknownNode`] when a child is missing from the
/// tree, and with [`SearchError::Malformed`] for an inner node without
/// children or a cycle.
pub fn evaluate_with_stats<N: Clone + Eq + Hash + Debug>(
    tree: &GameTree<N>,
    node: &N,
    maximizing: bool,
    pruning: bool,
) -> Result<Evaluation, SearchError> {
    let mut ctx = TreeSearch {
        tree,
        pruning,
        on_path: HashSet::new(),
        leaves: 0,
        nodes: 0,
    };
    let value = ctx.value(node, maximizing, Score::MIN, Score::MAX, 0)?;
    log::debug!(
        "minimax {node:?} (pruning = {pruning}): value {value}, {} nodes, {} leaves",
        ctx.nodes,
        ctx.leaves
    );
    Ok(Evaluation {
        value,
        leaves_visited: ctx.leaves,
        nodes_visited: ctx.nodes,
    })
}

struct TreeSearch<'t, N: Eq + Hash> {
    tree: &'t GameTree<N>,
    pruning: bool,
    /// Inner nodes between the root and the node being valued.
    on_path: HashSet<N>,
    leaves: usize,
    nodes: usize,
}

impl<N: Clone + Eq + Hash + Debug> TreeSearch<'_, N> {
    fn value(
        &mut self,
        node: &N,
        maximizing: bool,
        mut alpha: Score,
        mut beta: Score,
        level: usize,
    ) -> Result<Score, SearchError> {
        let tree = self.tree;
        self.nodes += 1;

        let children = match tree.nodes.get(node) {
            None => return Err(SearchError::unknown(node)),
            Some(TreeNode::Leaf(v)) => {
                self.leaves += 1;
                log::trace!("{:indent$}leaf {node:?} = {v}", "", indent = level * 2);
                return Ok(*v);
            }
            Some(TreeNode::Inner(children)) if children.is_empty() => {
                return Err(SearchError::Malformed(format!(
                    "inner node {node:?} has no children"
                )));
            }
            Some(TreeNode::Inner(children)) => children,
        };
        if !self.on_path.insert(node.clone()) {
            return Err(SearchError::Malformed(format!("cycle through {node:?}")));
        }

        let mut best = if maximizing { Score::MIN } else { Score::MAX };
        for child in children {
            let score = self.value(child, !maximizing, alpha, beta, level + 1)?;
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            log::trace!(
                "{:indent$}{} {node:?}: score {score}, alpha {alpha}, beta {beta}",
                "",
                if maximizing { "max" } else { "min" },
                indent = level * 2
            );
            if self.pruning && beta <= alpha {
                log::trace!("{:indent$}pruned at {node:?}", "", indent = level * 2);
                break;
            }
        }
        self.on_path.remove(node);
        Ok(best)
    }
}
