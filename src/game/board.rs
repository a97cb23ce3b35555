use serde::{Deserialize, Serialize};

use crate::error::BoardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Logical cell coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }
}

/// A `rows x cols` grid filled by gravity: within a column the occupied
/// cells always form a contiguous run ending at the bottom row.
///
/// `Clone` is a deep copy; search and move probing rely on that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row `rows - 1` is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    pub fn cell_at(&self, pos: CellPos) -> Cell {
        self.get(pos.row, pos.col)
    }

    /// Raw write used by the snapshot decoder, which checks gravity itself.
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.cols {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    /// Row a piece dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols {
            return None;
        }
        (0..self.rows).rev().find(|&row| self.get(row, col) == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, BoardError> {
        if col >= self.cols {
            return Err(BoardError::InvalidColumn {
                column: col,
                cols: self.cols,
            });
        }

        let row = self
            .landing_row(col)
            .ok_or(BoardError::ColumnFull { column: col })?;
        self.set(row, col, cell);
        Ok(row)
    }

    /// Columns that can still take a piece, in ascending order. Every call
    /// walks the current cells again; nothing is cached.
    pub fn valid_moves(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cols).filter(move |&col| !self.is_column_full(col))
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != Cell::Empty).count()
    }
}
