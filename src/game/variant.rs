use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Board, Player};
use crate::error::EvalError;
use crate::eval::{self, WinningLine};

/// The supported rule sets, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantKind {
    #[default]
    ConnectFour,
    ConnectFive,
}

impl VariantKind {
    pub fn variant(self) -> GameVariant {
        match self {
            VariantKind::ConnectFour => GameVariant {
                kind: self,
                rows: 6,
                cols: 7,
                win_length: 4,
                factory: four_board,
                is_terminal: four_terminal,
                winning_line: four_line,
                evaluate: eval::evaluate_four,
            },
            VariantKind::ConnectFive => GameVariant {
                kind: self,
                rows: 6,
                cols: 9,
                win_length: 5,
                factory: five_board,
                is_terminal: five_terminal,
                winning_line: five_line,
                evaluate: eval::evaluate_five,
            },
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variant().name())
    }
}

fn four_board() -> Board {
    Board::new(6, 7)
}

fn four_terminal(board: &Board) -> bool {
    eval::is_terminal(board, 4)
}

fn four_line(board: &Board) -> Result<WinningLine, EvalError> {
    eval::winning_line(board, 4)
}

fn five_board() -> Board {
    Board::new(6, 9)
}

fn five_terminal(board: &Board) -> bool {
    eval::is_terminal(board, 5)
}

fn five_line(board: &Board) -> Result<WinningLine, EvalError> {
    eval::winning_line(board, 5)
}

/// Immutable rule descriptor chosen once per match. Callers go through these
/// function pointers instead of inspecting which board they hold.
#[derive(Debug, Clone, Copy)]
pub struct GameVariant {
    kind: VariantKind,
    rows: usize,
    cols: usize,
    win_length: usize,
    factory: fn() -> Board,
    is_terminal: fn(&Board) -> bool,
    winning_line: fn(&Board) -> Result<WinningLine, EvalError>,
    evaluate: fn(&Board, Player) -> f64,
}

impl GameVariant {
    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            VariantKind::ConnectFour => "Connect Four",
            VariantKind::ConnectFive => "Connect Five",
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn new_board(&self) -> Board {
        (self.factory)()
    }

    pub fn is_terminal(&self, board: &Board) -> bool {
        (self.is_terminal)(board)
    }

    pub fn winning_line(&self, board: &Board) -> Result<WinningLine, EvalError> {
        (self.winning_line)(board)
    }

    pub fn evaluate(&self, board: &Board, perspective: Player) -> f64 {
        (self.evaluate)(board, perspective)
    }

    /// Decode a replicated snapshot using this variant's dimensions.
    pub fn decode_board(&self, snapshot: &str) -> Result<Board, crate::error::SnapshotError> {
        Board::from_snapshot(self.rows, self.cols, snapshot)
    }
}
