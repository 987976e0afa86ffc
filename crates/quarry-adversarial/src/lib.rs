//! Adversarial value search for two-player, zero-sum games.
//!
//! - Explicit game trees ([`GameTree`]) evaluated with plain minimax or
//!   alpha-beta pruning ([`evaluate_adversarial`], [`evaluate_with_stats`]).
//! - Implicit trees generated from a [`Game`] state, with an optional depth
//!   cutoff ([`minimax`]).
//! - Tic-tac-toe ([`Board`]) and computer move selection
//!   ([`select_best_move`]).
//!
//! Pruning never changes a value, only the number of nodes visited.

mod game;
mod tictactoe;
mod tree;

pub use game::{Game, MinimaxConfig, minimax};
pub use tictactoe::{Board, BoardError, Mark, TicTacToe, rank_moves, select_best_move};
pub use tree::{Evaluation, GameTree, Score, evaluate_adversarial, evaluate_with_stats};
