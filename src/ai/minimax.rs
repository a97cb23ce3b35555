use crate::game::{Board, GameVariant, Player};

use super::agent::Agent;

/// Best column for `player` by exhaustive minimax to `depth` plies.
///
/// Leaves are scored from `player`'s perspective. Columns are tried in
/// ascending order and a later column only wins with a strictly greater
/// score, so equal inputs always give equal output. `board` is never
/// mutated; every branch works on its own copy.
pub fn best_move(variant: &GameVariant, board: &Board, player: Player, depth: usize) -> Option<usize> {
    let remaining = depth.max(1) - 1;
    let mut best: Option<(usize, f64)> = None;

    for col in board.valid_moves() {
        let mut child = board.clone();
        if child.drop_piece(col, player.to_cell()).is_err() {
            continue;
        }
        let score = minimax(variant, &child, player.other(), player, remaining, false);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((col, score)),
        }
    }

    best.map(|(col, _)| col)
}

fn minimax(
    variant: &GameVariant,
    board: &Board,
    to_move: Player,
    root: Player,
    depth: usize,
    maximizing: bool,
) -> f64 {
    if depth == 0 || board.is_full() || variant.is_terminal(board) {
        return variant.evaluate(board, root);
    }

    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for col in board.valid_moves() {
        let mut child = board.clone();
        if child.drop_piece(col, to_move.to_cell()).is_err() {
            continue;
        }
        let score = minimax(variant, &child, to_move.other(), root, depth - 1, !maximizing);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

/// Fixed-depth minimax opponent.
pub struct MinimaxAgent {
    depth: usize,
}

impl MinimaxAgent {
    pub fn new(depth: usize) -> Self {
        MinimaxAgent { depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Agent for MinimaxAgent {
    fn select_action(&mut self, variant: &GameVariant, board: &Board, player: Player) -> Option<usize> {
        best_move(variant, board, player, self.depth)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::{Cell, VariantKind};

    fn four() -> GameVariant {
        VariantKind::ConnectFour.variant()
    }

    fn play(board: &mut Board, moves: &[(usize, Player)]) {
        for &(col, player) in moves {
            board.drop_piece(col, player.to_cell()).unwrap();
        }
    }

    #[test]
    fn selects_legal_action() {
        let variant = four();
        let board = variant.new_board();
        let col = best_move(&variant, &board, Player::Red, 3).unwrap();
        assert!(board.valid_moves().any(|c| c == col), "Action {col} is not legal");
    }

    #[test]
    fn takes_winning_move() {
        let variant = four();
        let mut board = variant.new_board();
        // Red on the bottom row 0..3, Yellow stacked on top
        for col in 0..3 {
            play(&mut board, &[(col, Player::Red), (col, Player::Yellow)]);
        }
        assert_eq!(best_move(&variant, &board, Player::Red, 2), Some(3));
    }

    #[test]
    fn blocks_opponent_win() {
        let variant = four();
        let mut board = variant.new_board();
        play(
            &mut board,
            &[
                (6, Player::Red),
                (0, Player::Yellow),
                (6, Player::Red),
                (1, Player::Yellow),
                (5, Player::Red),
                (2, Player::Yellow),
            ],
        );
        assert_eq!(best_move(&variant, &board, Player::Red, 2), Some(3));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let variant = four();
        let mut board = variant.new_board();
        play(&mut board, &[(3, Player::Red), (2, Player::Yellow), (4, Player::Red)]);

        let first = best_move(&variant, &board, Player::Yellow, 3);
        let second = best_move(&variant, &board, Player::Yellow, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn root_board_untouched() {
        let variant = four();
        let mut board = variant.new_board();
        play(&mut board, &[(1, Player::Red), (1, Player::Yellow)]);
        let before = board.clone();
        best_move(&variant, &board, Player::Red, 3);
        assert_eq!(board, before);
    }

    #[test]
    fn no_move_on_full_board() {
        let variant = four();
        let mut board = variant.new_board();
        for col in 0..7 {
            for row in 0..6 {
                // Shifted stripes never line up four of a kind
                let cell = if (row / 2 + col) % 2 == 0 { Cell::Red } else { Cell::Yellow };
                board.drop_piece(col, cell).unwrap();
            }
        }
        assert_eq!(best_move(&variant, &board, Player::Red, 2), None);
    }

    #[test]
    fn works_on_five_variant() {
        let variant = VariantKind::ConnectFive.variant();
        let mut board = variant.new_board();
        for col in 0..4 {
            play(&mut board, &[(col, Player::Red), (col, Player::Yellow)]);
        }
        assert_eq!(best_move(&variant, &board, Player::Red, 2), Some(4));
    }

    #[test]
    fn beats_random_agent() {
        let variant = four();
        let games_per_color = 6;
        let mut minimax_wins = 0;

        for game in 0..games_per_color * 2 {
            let minimax_color = if game % 2 == 0 { Player::Red } else { Player::Yellow };
            let mut minimax = MinimaxAgent::new(3);
            let mut random = RandomAgent::with_seed(game as u64);
            let mut board = variant.new_board();
            let mut to_move = Player::Red;

            while !variant.is_terminal(&board) && !board.is_full() {
                let col = if to_move == minimax_color {
                    minimax.select_action(&variant, &board, to_move)
                } else {
                    random.select_action(&variant, &board, to_move)
                }
                .unwrap();
                board.drop_piece(col, to_move.to_cell()).unwrap();
                to_move = to_move.other();
            }

            if let Ok(line) = variant.winning_line(&board) {
                if line.winner == minimax_color {
                    minimax_wins += 1;
                }
            }
        }

        let total = games_per_color * 2;
        assert!(
            minimax_wins * 4 >= total * 3,
            "Minimax should beat random at least 75% of the time, got {minimax_wins}/{total}"
        );
    }

    #[test]
    fn name_is_minimax() {
        let agent = MinimaxAgent::new(4);
        assert_eq!(agent.name(), "Minimax");
        assert_eq!(agent.depth(), 4);
    }
}
