use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::game::{Board, GameVariant, Player};

use super::agent::Agent;

/// An agent that selects uniformly at random from legal columns.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible agent for tests and simulations.
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, _variant: &GameVariant, board: &Board, _player: Player) -> Option<usize> {
        let actions: Vec<usize> = board.valid_moves().collect();
        if actions.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..actions.len());
        Some(actions[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, VariantKind};

    #[test]
    fn test_random_agent_selects_legal_action() {
        let variant = VariantKind::ConnectFour.variant();
        let mut agent = RandomAgent::new();
        let mut board = variant.new_board();
        for _ in 0..6 {
            board.drop_piece(2, Cell::Red).unwrap();
        }

        for _ in 0..100 {
            let action = agent.select_action(&variant, &board, Player::Yellow).unwrap();
            assert_ne!(action, 2, "column 2 is full");
            assert!(action < 7);
        }
    }

    #[test]
    fn test_seeded_agents_agree() {
        let variant = VariantKind::ConnectFive.variant();
        let board = variant.new_board();
        let mut a = RandomAgent::with_seed(7);
        let mut b = RandomAgent::with_seed(7);
        for _ in 0..20 {
            assert_eq!(
                a.select_action(&variant, &board, Player::Red),
                b.select_action(&variant, &board, Player::Red)
            );
        }
    }

    #[test]
    fn test_random_agent_name() {
        let agent = RandomAgent::new();
        assert_eq!(agent.name(), "Random");
    }
}
