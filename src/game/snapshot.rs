//! Flat text encoding of a board as stored in replicated room properties:
//! one symbol per cell, row-major, top row first. `'0'` is empty, `'1'` is
//! Red and `'2'` is Yellow.

use super::board::{Board, Cell};
use crate::error::SnapshotError;

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Red => '1',
            Cell::Yellow => '2',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '0' => Some(Cell::Empty),
            '1' => Some(Cell::Red),
            '2' => Some(Cell::Yellow),
            _ => None,
        }
    }
}

impl Board {
    pub fn to_snapshot(&self) -> String {
        let mut out = String::with_capacity(self.rows() * self.cols());
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                out.push(self.get(row, col).symbol());
            }
        }
        out
    }

    /// Rebuild a board from its snapshot. Rejects snapshots of the wrong
    /// length, unknown symbols, and pieces floating above an empty cell.
    pub fn from_snapshot(rows: usize, cols: usize, snapshot: &str) -> Result<Board, SnapshotError> {
        let expected = rows * cols;
        let actual = snapshot.chars().count();
        if actual != expected {
            return Err(SnapshotError::LengthMismatch { expected, actual });
        }

        let mut board = Board::new(rows, cols);
        for (index, symbol) in snapshot.chars().enumerate() {
            let cell = Cell::from_symbol(symbol).ok_or(SnapshotError::InvalidSymbol { symbol, index })?;
            board.set(index / cols, index % cols, cell);
        }

        for col in 0..cols {
            for row in 0..rows.saturating_sub(1) {
                if board.get(row, col) != Cell::Empty && board.get(row + 1, col) == Cell::Empty {
                    return Err(SnapshotError::FloatingPiece { row, col });
                }
            }
        }

        Ok(board)
    }
}
