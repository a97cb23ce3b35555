use crate::game::{Board, GameVariant, Player};

/// Universal interface for computer opponents.
pub trait Agent {
    /// Select a column for `player` on `board`, or `None` when no column is
    /// playable. Implementations must not assume they may keep `board`.
    fn select_action(&mut self, variant: &GameVariant, board: &Board, player: Player) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
