use serde::{Deserialize, Serialize};

use crate::error::{BoardError, MoveRejection};
use crate::eval::WinningLine;
use crate::game::{Board, GameVariant, Player};
use crate::net::RestartMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(WinningLine),
    Draw,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Winner(line) => Some(line.winner),
            GameOutcome::Draw => None,
        }
    }

    pub fn line(&self) -> Option<&WinningLine> {
        match self {
            GameOutcome::Winner(line) => Some(line),
            GameOutcome::Draw => None,
        }
    }

    /// Outcome of a board, if it is decided.
    pub fn of(variant: &GameVariant, board: &Board) -> Option<GameOutcome> {
        if let Ok(line) = variant.winning_line(board) {
            Some(GameOutcome::Winner(line))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayers,
    InProgress,
    GameOver,
    /// The opponent left; this match cannot continue.
    Abandoned,
}

/// A move that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub column: usize,
    pub row: usize,
    pub player: Player,
    pub outcome: Option<GameOutcome>,
}

/// The match as seen by one peer. Only the authority (or the local match)
/// calls the mutating methods; mirrors overwrite fields from snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub board: Board,
    pub turn: Player,
    pub phase: Phase,
    pub input_locked: bool,
    pub restart_mask: RestartMask,
    pub outcome: Option<GameOutcome>,
}

impl MatchState {
    pub fn new(variant: &GameVariant) -> Self {
        MatchState {
            board: variant.new_board(),
            turn: Player::INITIAL,
            phase: Phase::AwaitingPlayers,
            input_locked: false,
            restart_mask: RestartMask::NONE,
            outcome: None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver | Phase::Abandoned)
    }

    /// Checks a move by `mover` without touching anything. Order matters:
    /// readiness, match over, column range, column full, then turn.
    pub fn validate(&self, column: usize, mover: Player) -> Result<(), MoveRejection> {
        if self.phase == Phase::AwaitingPlayers {
            return Err(MoveRejection::MatchNotReady);
        }
        if self.is_over() {
            return Err(MoveRejection::MatchAlreadyOver);
        }
        if column >= self.board.cols() {
            return Err(MoveRejection::InvalidColumn);
        }
        if self.board.is_column_full(column) {
            return Err(MoveRejection::ColumnFull);
        }
        if mover != self.turn {
            return Err(MoveRejection::NotYourTurn);
        }
        Ok(())
    }

    /// Drop a piece for the player to move, then settle the outcome: a win or
    /// a full board ends the match, anything else passes the turn.
    pub fn apply(&mut self, variant: &GameVariant, column: usize) -> Result<AppliedMove, BoardError> {
        let player = self.turn;
        let row = self.board.drop_piece(column, player.to_cell())?;

        let outcome = GameOutcome::of(variant, &self.board);
        if outcome.is_some() {
            self.phase = Phase::GameOver;
            self.outcome = outcome;
        } else {
            self.turn = player.other();
        }

        Ok(AppliedMove {
            column,
            row,
            player,
            outcome,
        })
    }

    /// Fresh board, first player to move, votes cleared.
    pub fn reset(&mut self, variant: &GameVariant) {
        self.board = variant.new_board();
        self.turn = Player::INITIAL;
        self.phase = Phase::InProgress;
        self.restart_mask = RestartMask::NONE;
        self.outcome = None;
    }
}
