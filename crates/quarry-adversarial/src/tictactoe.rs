//! Tic-tac-toe board and computer move selection.
//!
//! Cells are addressed with [`Point`]: `x` is the column and `y` the row,
//! both in `0..3`. Moves are enumerated in row-major order.

use std::fmt;
use std::str::FromStr;

use quarry_core::{Point, Range};
use thiserror::Error;

use crate::game::{Game, MinimaxConfig, minimax};
use crate::tree::Score;

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other player.
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Errors from placing marks or parsing boards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Point),
    #[error("cell {0} is already taken")]
    Occupied(Point),
    #[error("invalid board: {0}")]
    Parse(String),
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A 3×3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    /// Side length.
    pub const SIZE: i32 = 3;

    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The board rectangle.
    pub fn range() -> Range {
        Range::new(0, 0, Self::SIZE, Self::SIZE)
    }

    fn idx(p: Point) -> Option<usize> {
        if !Self::range().contains(p) {
            return None;
        }
        Some((p.y * Self::SIZE + p.x) as usize)
    }

    /// Mark at `p`; `None` for empty or off-board cells.
    pub fn get(&self, p: Point) -> Option<Mark> {
        Self::idx(p).and_then(|i| self.cells[i])
    }

    /// Put `mark` on the empty cell `p`.
    pub fn place(&mut self, p: Point, mark: Mark) -> Result<(), BoardError> {
        let i = Self::idx(p).ok_or(BoardError::OutOfBounds(p))?;
        if self.cells[i].is_some() {
            return Err(BoardError::Occupied(p));
        }
        self.cells[i] = Some(mark);
        Ok(())
    }

    /// Copy of the board with `mark` on `p`, which must be an empty cell.
    fn with(mut self, p: Point, mark: Mark) -> Self {
        if let Some(i) = Self::idx(p) {
            self.cells[i] = Some(mark);
        }
        self
    }

    /// The player owning a complete row, column or diagonal.
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(m) if self.cells[b] == Some(m) && self.cells[c] == Some(m) => Some(m),
            _ => None,
        })
    }

    /// Whether every cell is taken.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Whether the game has ended, by a win or a full board.
    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Point> + '_ {
        Self::range().into_iter().filter(|&p| self.get(p).is_none())
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&c| c == Some(mark)).count()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse nine cells in row-major order from `X`, `O` and `.` (or `_`),
    /// ignoring whitespace, `/` and `|`.
    fn from_str(s: &str) -> Result<Self, BoardError> {
        let mut cells = [None; 9];
        let mut n = 0;
        for ch in s.chars() {
            let cell = match ch {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '.' | '_' => None,
                c if c.is_whitespace() || c == '/' || c == '|' => continue,
                c => return Err(BoardError::Parse(format!("unexpected character {c:?}"))),
            };
            if n == cells.len() {
                return Err(BoardError::Parse("more than 9 cells".into()));
            }
            cells[n] = cell;
            n += 1;
        }
        if n != cells.len() {
            return Err(BoardError::Parse(format!("expected 9 cells, got {n}")));
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..Self::SIZE {
            for x in 0..Self::SIZE {
                match self.get(Point::new(x, y)) {
                    Some(m) => write!(f, "{m}")?,
                    None => write!(f, ".")?,
                }
            }
            if y + 1 < Self::SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Game adapter
// ---------------------------------------------------------------------------

/// A tic-tac-toe position scored for one player: +1 if `me` wins, −1 if the
/// opponent wins, 0 for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    pub board: Board,
    /// The player the values are computed for (the maximizer).
    pub me: Mark,
    pub to_move: Mark,
}

impl Game for TicTacToe {
    type Move = Point;

    fn legal_moves(&self, buf: &mut Vec<Point>) {
        if self.board.winner().is_none() {
            buf.extend(self.board.empty_cells());
        }
    }

    fn play(&self, mv: Point) -> Self {
        TicTacToe {
            board: self.board.with(mv, self.to_move),
            me: self.me,
            to_move: self.to_move.opponent(),
        }
    }

    fn terminal_value(&self) -> Option<Score> {
        match self.board.winner() {
            Some(m) if m == self.me => Some(1),
            Some(_) => Some(-1),
            None if self.board.is_full() => Some(0),
            None => None,
        }
    }
}

/// Score every empty cell for `player`, in row-major order.
///
/// Each candidate is played hypothetically and the resulting position is
/// evaluated by minimax with the opponent (minimizing) to move. The board
/// itself is not modified.
pub fn rank_moves(board: &Board, player: Mark) -> Vec<(Point, Score)> {
    if board.winner().is_some() {
        return Vec::new();
    }
    let config = MinimaxConfig::default();
    board
        .empty_cells()
        .map(|p| {
            let state = TicTacToe {
                board: board.with(p, player),
                me: player,
                to_move: player.opponent(),
            };
            (p, minimax(&state, false, &config).value)
        })
        .collect()
}

/// The best cell for `player` to mark next, ties broken by the first cell
/// in row-major order. `None` when the game is already over.
pub fn select_best_move(board: &Board, player: Mark) -> Option<Point> {
    let mut best: Option<(Point, Score)> = None;
    for (p, score) in rank_moves(board, player) {
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((p, score));
        }
    }
    log::debug!("tictactoe: {player} best move {best:?}");
    best.map(|(p, _)| p)
}
