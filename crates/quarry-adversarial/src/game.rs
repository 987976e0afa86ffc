//! Minimax over game trees generated on the fly from a state.

use std::fmt::Debug;

use crate::tree::{Evaluation, Score};

/// A two-player, zero-sum game state that generates its own game tree.
///
/// Values are always from the maximizing player's point of view.
pub trait Game: Sized {
    type Move: Copy + Debug;

    /// Append the legal moves of the side to move into `buf`. The caller
    /// clears `buf` before calling.
    fn legal_moves(&self, buf: &mut Vec<Self::Move>);

    /// The state after playing `mv`.
    fn play(&self, mv: Self::Move) -> Self;

    /// Value of a finished game, or `None` while play continues.
    fn terminal_value(&self) -> Option<Score>;

    /// Static estimate used when the depth cutoff is reached.
    fn evaluate(&self) -> Score {
        0
    }
}

/// Knobs for [`minimax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Plies to look ahead before falling back to [`Game::evaluate`];
    /// `None` searches to the end of the game.
    pub depth: Option<u32>,
    /// Cut branches with an alpha-beta window.
    pub pruning: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: None,
            pruning: true,
        }
    }
}

/// Minimax value of `state` with the maximizing (`true`) or minimizing
/// player to move.
///
/// A state with no legal moves that is not terminal is scored with
/// [`Game::evaluate`]. Recursion depth is bounded by the game length or
/// the configured cutoff.
pub fn minimax<G: Game>(state: &G, maximizing: bool, config: &MinimaxConfig) -> Evaluation {
    let mut ctx = StateSearch {
        config: *config,
        leaves: 0,
        nodes: 0,
    };
    let value = ctx.value(state, config.depth, maximizing, Score::MIN, Score::MAX);
    Evaluation {
        value,
        leaves_visited: ctx.leaves,
        nodes_visited: ctx.nodes,
    }
}

struct StateSearch {
    config: MinimaxConfig,
    leaves: usize,
    nodes: usize,
}

impl StateSearch {
    fn value<G: Game>(
        &mut self,
        state: &G,
        depth: Option<u32>,
        maximizing: bool,
        mut alpha: Score,
        mut beta: Score,
    ) -> Score {
        self.nodes += 1;

        if let Some(v) = state.terminal_value() {
            self.leaves += 1;
            return v;
        }
        if depth == Some(0) {
            self.leaves += 1;
            return state.evaluate();
        }

        let mut moves = Vec::new();
        state.legal_moves(&mut moves);
        if moves.is_empty() {
            self.leaves += 1;
            return state.evaluate();
        }

        let next_depth = depth.map(|d| d - 1);
        let mut best = if maximizing { Score::MIN } else { Score::MAX };
        for mv in moves {
            let score = self.value(&state.play(mv), next_depth, !maximizing, alpha, beta);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if self.config.pruning && beta <= alpha {
                break;
            }
        }
        best
    }
}
