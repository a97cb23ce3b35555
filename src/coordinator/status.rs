use std::fmt;

use crate::error::MoveRejection;
use crate::game::Player;

/// One-line status shown to the player. Never a blocking dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    WaitingForPlayers,
    YourTurn,
    OpponentTurn,
    /// Hot-seat play or an observer: the color to move.
    Turn(Player),
    /// `local` is the color this device plays, if it plays exactly one.
    GameOver {
        winner: Option<Player>,
        local: Option<Player>,
    },
    WaitingForRematch,
    OpponentLeft,
    Rejected(MoveRejection),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::WaitingForPlayers => f.write_str("waiting for opponent"),
            Status::YourTurn => f.write_str("your turn"),
            Status::OpponentTurn => f.write_str("opponent's turn"),
            Status::Turn(player) => write!(f, "{}'s turn", player.name()),
            Status::GameOver { winner: None, .. } => f.write_str("game over: draw"),
            Status::GameOver {
                winner: Some(winner),
                local: Some(local),
            } => {
                if winner == local {
                    f.write_str("game over: you win")
                } else {
                    f.write_str("game over: opponent wins")
                }
            }
            Status::GameOver {
                winner: Some(winner),
                local: None,
            } => write!(f, "game over: {} wins", winner.name()),
            Status::WaitingForRematch => f.write_str("waiting for rematch"),
            Status::OpponentLeft => f.write_str("opponent left"),
            Status::Rejected(reason) => write!(f, "{reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(Status::WaitingForPlayers.to_string(), "waiting for opponent");
        assert_eq!(Status::YourTurn.to_string(), "your turn");
        assert_eq!(Status::OpponentTurn.to_string(), "opponent's turn");
        assert_eq!(Status::Turn(Player::Yellow).to_string(), "Yellow's turn");
        assert_eq!(Status::OpponentLeft.to_string(), "opponent left");
        assert_eq!(
            Status::Rejected(MoveRejection::NotYourTurn).to_string(),
            "not your turn"
        );
    }

    #[test]
    fn test_game_over_text() {
        let won = Status::GameOver {
            winner: Some(Player::Red),
            local: Some(Player::Red),
        };
        let lost = Status::GameOver {
            winner: Some(Player::Red),
            local: Some(Player::Yellow),
        };
        let shared = Status::GameOver {
            winner: Some(Player::Yellow),
            local: None,
        };
        let draw = Status::GameOver {
            winner: None,
            local: Some(Player::Red),
        };
        assert_eq!(won.to_string(), "game over: you win");
        assert_eq!(lost.to_string(), "game over: opponent wins");
        assert_eq!(shared.to_string(), "game over: Yellow wins");
        assert_eq!(draw.to_string(), "game over: draw");
    }
}
