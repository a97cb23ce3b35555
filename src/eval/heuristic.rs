use super::lines::{find_winning_line, window_counts, DIRECTIONS};
use crate::game::{Board, Player};

/// Score of a decided board. Large enough to dominate any heuristic sum but
/// finite, so search arithmetic stays ordinary.
pub const WIN_SCORE: f64 = 1.0e9;

/// Sum of `score_window` over every `n`-cell window in all four directions,
/// plus `center_weight` per piece in the centre column.
fn score_windows(
    board: &Board,
    perspective: Player,
    n: usize,
    center_weight: f64,
    score_window: fn(usize, usize, usize) -> f64,
) -> f64 {
    let own_cell = perspective.to_cell();
    let opp_cell = perspective.other().to_cell();
    let mut score = 0.0;

    // Center column bonus
    let center = board.cols() / 2;
    for row in 0..board.rows() {
        let cell = board.get(row, center);
        if cell == own_cell {
            score += center_weight;
        } else if cell == opp_cell {
            score -= center_weight;
        }
    }

    for dir in DIRECTIONS {
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if let Some((own, opp, empty)) = window_counts(board, row, col, dir, n, own_cell) {
                    score += score_window(own, opp, empty);
                }
            }
        }
    }

    score
}

fn terminal_score(board: &Board, n: usize, perspective: Player) -> Option<f64> {
    find_winning_line(board, n).map(|line| {
        if line.winner == perspective {
            WIN_SCORE
        } else {
            -WIN_SCORE
        }
    })
}

fn four_window(own: usize, opp: usize, empty: usize) -> f64 {
    if own == 3 && empty == 1 {
        50.0
    } else if own == 2 && empty == 2 {
        10.0
    } else if opp == 3 && empty == 1 {
        -80.0
    } else if opp == 2 && empty == 2 {
        -10.0
    } else {
        0.0
    }
}

fn five_window(own: usize, opp: usize, empty: usize) -> f64 {
    match (own, opp, empty) {
        (4, 0, 1) => 120.0,
        (3, 0, 2) => 25.0,
        (2, 0, 3) => 5.0,
        (0, 4, 1) => -180.0,
        (0, 3, 2) => -30.0,
        (0, 2, 3) => -5.0,
        _ => 0.0,
    }
}

/// Heuristic for four in a row: threat windows plus centre control.
pub fn evaluate_four(board: &Board, perspective: Player) -> f64 {
    terminal_score(board, 4, perspective)
        .unwrap_or_else(|| score_windows(board, perspective, 4, 3.0, four_window))
}

/// Heuristic for five in a row on the wide board.
pub fn evaluate_five(board: &Board, perspective: Player) -> f64 {
    terminal_score(board, 5, perspective)
        .unwrap_or_else(|| score_windows(board, perspective, 5, 2.0, five_window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    #[test]
    fn heuristic_empty_board_is_zero() {
        let board = Board::new(6, 7);
        assert!(evaluate_four(&board, Player::Red).abs() < f64::EPSILON);
        assert!(evaluate_four(&board, Player::Yellow).abs() < f64::EPSILON);
        assert!(evaluate_five(&Board::new(6, 9), Player::Red).abs() < f64::EPSILON);
    }

    #[test]
    fn heuristic_center_preference() {
        let mut board_center = Board::new(6, 7);
        board_center.drop_piece(3, Cell::Red).unwrap();
        let mut board_edge = Board::new(6, 7);
        board_edge.drop_piece(0, Cell::Red).unwrap();

        let score_center = evaluate_four(&board_center, Player::Red);
        let score_edge = evaluate_four(&board_edge, Player::Red);
        assert!(
            score_center > score_edge,
            "Center ({score_center}) should score higher than edge ({score_edge})"
        );
    }

    #[test]
    fn heuristic_grows_toward_a_line() {
        let mut board = Board::new(6, 7);
        board.drop_piece(0, Cell::Red).unwrap();
        let one = evaluate_four(&board, Player::Red);
        board.drop_piece(1, Cell::Red).unwrap();
        let two = evaluate_four(&board, Player::Red);
        board.drop_piece(2, Cell::Red).unwrap();
        let three = evaluate_four(&board, Player::Red);

        assert!(one < two && two < three, "{one} < {two} < {three}");
        assert!(three > 40.0, "3-in-a-row should score high, got {three}");
    }

    #[test]
    fn heuristic_is_opponent_relative() {
        let mut board = Board::new(6, 7);
        for col in 0..3 {
            board.drop_piece(col, Cell::Yellow).unwrap();
        }
        assert!(evaluate_four(&board, Player::Red) < 0.0);
        assert!(evaluate_four(&board, Player::Yellow) > 0.0);
    }

    #[test]
    fn terminal_boards_dominate() {
        let mut board = Board::new(6, 7);
        for col in 0..4 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert_eq!(evaluate_four(&board, Player::Red), WIN_SCORE);
        assert_eq!(evaluate_four(&board, Player::Yellow), -WIN_SCORE);
    }

    #[test]
    fn five_variant_scores_four_of_five() {
        let mut board = Board::new(6, 9);
        for col in 0..4 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        let score = evaluate_five(&board, Player::Red);
        assert!(score > 100.0, "open four should score high, got {score}");
        assert!(score < WIN_SCORE);
    }
}
