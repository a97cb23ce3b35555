use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::game::{Board, Cell, CellPos, Player};

/// A run of `N` same-colored cells, from `start` to `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    pub start: CellPos,
    pub end: CellPos,
    pub winner: Player,
}

/// Step directions as (row delta, col delta), in scan order: down a column,
/// along a row, down-right, down-left.
pub(crate) const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Cell `step` steps away from `(row, col)` along `dir`, if on the board.
pub(crate) fn offset(board: &Board, row: usize, col: usize, dir: (isize, isize), step: usize) -> Option<CellPos> {
    let r = row as isize + dir.0 * step as isize;
    let c = col as isize + dir.1 * step as isize;
    if r < 0 || c < 0 || r >= board.rows() as isize || c >= board.cols() as isize {
        return None;
    }
    Some(CellPos::new(r as usize, c as usize))
}

/// Checks the `n` cells starting at `(row, col)` along `dir`.
fn run_at(board: &Board, row: usize, col: usize, dir: (isize, isize), n: usize) -> Option<WinningLine> {
    let first = board.get(row, col);
    let winner = Player::from_cell(first)?;
    let end = offset(board, row, col, dir, n - 1)?;
    for step in 1..n {
        let pos = offset(board, row, col, dir, step)?;
        if board.cell_at(pos) != first {
            return None;
        }
    }
    Some(WinningLine {
        start: CellPos::new(row, col),
        end,
        winner,
    })
}

/// First run of at least `n` cells in fixed scan order: every column top to
/// bottom, then every row left to right, then down-right diagonals, then
/// down-left diagonals. The same board always yields the same line.
pub fn find_winning_line(board: &Board, n: usize) -> Option<WinningLine> {
    if n == 0 {
        return None;
    }
    let [vertical, horizontal, down_right, down_left] = DIRECTIONS;

    for col in 0..board.cols() {
        for row in 0..board.rows() {
            if let Some(line) = run_at(board, row, col, vertical, n) {
                return Some(line);
            }
        }
    }

    for dir in [horizontal, down_right, down_left] {
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if let Some(line) = run_at(board, row, col, dir, n) {
                    return Some(line);
                }
            }
        }
    }

    None
}

/// True iff some row, column, or diagonal holds `n` or more same-colored
/// pieces in a row.
pub fn is_terminal(board: &Board, n: usize) -> bool {
    find_winning_line(board, n).is_some()
}

/// The winning line of a terminal board. Asking on a board without a winner
/// is a caller bug.
pub fn winning_line(board: &Board, n: usize) -> Result<WinningLine, EvalError> {
    find_winning_line(board, n).ok_or(EvalError::NotTerminal)
}

/// Counts of (own, opponent, empty) cells in the `n`-window at `(row, col)`
/// along `dir`, or `None` if the window leaves the board.
pub(crate) fn window_counts(
    board: &Board,
    row: usize,
    col: usize,
    dir: (isize, isize),
    n: usize,
    own: Cell,
) -> Option<(usize, usize, usize)> {
    offset(board, row, col, dir, n - 1)?;
    let (mut mine, mut theirs, mut empty) = (0, 0, 0);
    for step in 0..n {
        let pos = offset(board, row, col, dir, step)?;
        match board.cell_at(pos) {
            Cell::Empty => empty += 1,
            c if c == own => mine += 1,
            _ => theirs += 1,
        }
    }
    Some((mine, theirs, empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(moves: &[(usize, Cell)]) -> Board {
        let mut board = Board::new(6, 7);
        for &(col, cell) in moves {
            board.drop_piece(col, cell).unwrap();
        }
        board
    }

    #[test]
    fn test_empty_board_not_terminal() {
        for (rows, cols, n) in [(6, 7, 4), (6, 9, 5)] {
            assert!(!is_terminal(&Board::new(rows, cols), n));
        }
    }

    #[test]
    fn test_three_is_not_enough() {
        let board = board_with(&[(0, Cell::Red), (1, Cell::Red), (2, Cell::Red)]);
        assert!(!is_terminal(&board, 4));
        assert_eq!(winning_line(&board, 4), Err(EvalError::NotTerminal));
    }

    #[test]
    fn test_horizontal_win() {
        let board = board_with(&[(0, Cell::Red), (1, Cell::Red), (2, Cell::Red), (3, Cell::Red)]);
        assert!(is_terminal(&board, 4));
        assert_eq!(
            winning_line(&board, 4),
            Ok(WinningLine {
                start: CellPos::new(5, 0),
                end: CellPos::new(5, 3),
                winner: Player::Red,
            })
        );
    }

    #[test]
    fn test_vertical_win() {
        let board = board_with(&[(3, Cell::Yellow); 4]);
        let line = winning_line(&board, 4).unwrap();
        assert_eq!(line.start, CellPos::new(2, 3));
        assert_eq!(line.end, CellPos::new(5, 3));
        assert_eq!(line.winner, Player::Yellow);
    }

    #[test]
    fn test_diagonal_up_win() {
        // Create diagonal / pattern
        let board = board_with(&[
            (0, Cell::Red),
            (1, Cell::Yellow),
            (1, Cell::Red),
            (2, Cell::Yellow),
            (2, Cell::Yellow),
            (2, Cell::Red),
            (3, Cell::Yellow),
            (3, Cell::Yellow),
            (3, Cell::Yellow),
            (3, Cell::Red),
        ]);
        let line = winning_line(&board, 4).unwrap();
        // Found by the down-left scan, starting at the top of the diagonal
        assert_eq!(line.start, CellPos::new(2, 3));
        assert_eq!(line.end, CellPos::new(5, 0));
        assert_eq!(line.winner, Player::Red);
    }

    #[test]
    fn test_diagonal_down_win() {
        // Create diagonal \ pattern
        let board = board_with(&[
            (6, Cell::Red),
            (5, Cell::Yellow),
            (5, Cell::Red),
            (4, Cell::Yellow),
            (4, Cell::Yellow),
            (4, Cell::Red),
            (3, Cell::Yellow),
            (3, Cell::Yellow),
            (3, Cell::Yellow),
            (3, Cell::Red),
        ]);
        let line = winning_line(&board, 4).unwrap();
        assert_eq!(line.start, CellPos::new(2, 3));
        assert_eq!(line.end, CellPos::new(5, 6));
    }

    #[test]
    fn test_longer_run_counts() {
        let board = board_with(&[
            (0, Cell::Red),
            (1, Cell::Red),
            (2, Cell::Red),
            (3, Cell::Red),
            (4, Cell::Red),
        ]);
        assert!(is_terminal(&board, 4));
        assert!(is_terminal(&board, 5));
        assert_eq!(winning_line(&board, 4).unwrap().start, CellPos::new(5, 0));
    }

    #[test]
    fn test_columns_scanned_before_rows() {
        // Yellow vertical in column 6 and Red horizontal along the bottom
        let mut moves = vec![(0, Cell::Red), (1, Cell::Red), (2, Cell::Red), (3, Cell::Red)];
        moves.extend([(6, Cell::Yellow); 4]);
        let board = board_with(&moves);

        let first = winning_line(&board, 4).unwrap();
        assert_eq!(first.winner, Player::Yellow);
        assert_eq!(first.start, CellPos::new(2, 6));
        for _ in 0..10 {
            assert_eq!(winning_line(&board, 4).unwrap(), first);
        }
    }

    #[test]
    fn test_window_counts() {
        let board = board_with(&[(0, Cell::Red), (1, Cell::Yellow)]);
        assert_eq!(window_counts(&board, 5, 0, (0, 1), 4, Cell::Red), Some((1, 1, 2)));
        assert_eq!(window_counts(&board, 5, 5, (0, 1), 4, Cell::Red), None);
    }
}
