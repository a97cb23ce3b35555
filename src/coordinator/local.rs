use log::{debug, error, info};

use super::generation::{GenerationCounter, GenerationToken};
use super::state::{AppliedMove, MatchState, Phase};
use super::status::Status;
use crate::ai::Agent;
use crate::error::{CoordinatorError, MoveRejection};
use crate::game::{Board, GameVariant, Player};

/// A piece falling into `column`, one row per tick. It only writes to the
/// board when it lands, and only if its generation is still current.
#[derive(Debug, Clone)]
pub struct DropAnimation {
    pub column: usize,
    pub row: usize,
    pub target_row: usize,
    pub player: Player,
    token: GenerationToken,
}

/// What a call to [`LocalMatch::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Falling { column: usize, row: usize },
    Landed(AppliedMove),
    /// The match was reset while this piece was falling; it was discarded.
    Aborted { column: usize },
}

/// Single-device match: a human plays Red against an optional computer
/// opponent (hot-seat when there is none). Moves apply directly, no
/// transport involved.
pub struct LocalMatch {
    variant: GameVariant,
    state: MatchState,
    opponent: Option<Box<dyn Agent>>,
    human: Player,
    generation: GenerationCounter,
    in_flight: Option<DropAnimation>,
}

impl LocalMatch {
    pub fn new(variant: GameVariant, opponent: Option<Box<dyn Agent>>) -> Self {
        let mut state = MatchState::new(&variant);
        state.phase = Phase::InProgress;
        LocalMatch {
            variant,
            state,
            opponent,
            human: Player::INITIAL,
            generation: GenerationCounter::new(),
            in_flight: None,
        }
    }

    pub fn variant(&self) -> &GameVariant {
        &self.variant
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn turn(&self) -> Player {
        self.state.turn
    }

    pub fn in_flight(&self) -> Option<&DropAnimation> {
        self.in_flight.as_ref().filter(|anim| anim.token.is_current())
    }

    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent.as_deref().map(|agent| agent.name())
    }

    pub fn status(&self) -> Status {
        if self.state.phase == Phase::GameOver {
            return Status::GameOver {
                winner: self.state.outcome.and_then(|o| o.winner()),
                local: self.opponent.as_ref().map(|_| self.human),
            };
        }
        match &self.opponent {
            None => Status::Turn(self.state.turn),
            Some(_) if self.state.turn == self.human => Status::YourTurn,
            Some(_) => Status::OpponentTurn,
        }
    }

    /// Human move. Starts the drop; the board changes when it lands.
    pub fn play(&mut self, column: usize) -> Result<(), CoordinatorError> {
        if self.in_flight().is_some() {
            return Err(CoordinatorError::MoveInFlight);
        }
        if self.opponent.is_some() && self.state.turn != self.human && !self.state.is_over() {
            return Err(MoveRejection::NotYourTurn.into());
        }
        self.start_drop(column)
    }

    fn start_drop(&mut self, column: usize) -> Result<(), CoordinatorError> {
        self.state.validate(column, self.state.turn)?;
        let target_row = self
            .state
            .board
            .landing_row(column)
            .ok_or(MoveRejection::ColumnFull)?;

        debug!("{} drops into column {column}", self.state.turn.name());
        self.in_flight = Some(DropAnimation {
            column,
            row: 0,
            target_row,
            player: self.state.turn,
            token: self.generation.token(),
        });
        Ok(())
    }

    /// Advance the falling piece by one step.
    pub fn tick(&mut self) -> Result<TickOutcome, CoordinatorError> {
        let Some(mut anim) = self.in_flight.take() else {
            return Ok(TickOutcome::Idle);
        };

        if anim.token.is_stale() {
            debug!(
                "discarding drop into column {} from generation {}",
                anim.column,
                anim.token.generation()
            );
            return Ok(TickOutcome::Aborted { column: anim.column });
        }

        if anim.row < anim.target_row {
            anim.row += 1;
            let outcome = TickOutcome::Falling {
                column: anim.column,
                row: anim.row,
            };
            self.in_flight = Some(anim);
            return Ok(outcome);
        }

        let applied = self.state.apply(&self.variant, anim.column).map_err(|err| {
            error!("validated drop into column {} failed: {err}", anim.column);
            CoordinatorError::Internal(err.to_string())
        })?;

        if let Some(outcome) = applied.outcome {
            info!("local match over: {outcome:?}");
        } else {
            self.opponent_reply()?;
        }
        Ok(TickOutcome::Landed(applied))
    }

    /// Tick until nothing is falling, returning every move that landed.
    pub fn run_until_idle(&mut self) -> Result<Vec<AppliedMove>, CoordinatorError> {
        let mut landed = Vec::new();
        loop {
            match self.tick()? {
                TickOutcome::Idle => return Ok(landed),
                TickOutcome::Landed(applied) => landed.push(applied),
                TickOutcome::Falling { .. } | TickOutcome::Aborted { .. } => {}
            }
        }
    }

    fn opponent_reply(&mut self) -> Result<(), CoordinatorError> {
        if self.state.turn == self.human {
            return Ok(());
        }
        let Some(agent) = self.opponent.as_mut() else {
            return Ok(());
        };
        match agent.select_action(&self.variant, &self.state.board, self.state.turn) {
            Some(column) => self.start_drop(column),
            None => Ok(()),
        }
    }

    /// Start over. Any piece still falling belongs to the old generation and
    /// will be dropped on its next tick.
    pub fn reset(&mut self) {
        let generation = self.generation.bump();
        self.state.reset(&self.variant);
        info!("local match reset (generation {generation})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MinimaxAgent, RandomAgent};
    use crate::game::{Cell, VariantKind};

    fn hot_seat() -> LocalMatch {
        LocalMatch::new(VariantKind::ConnectFour.variant(), None)
    }

    #[test]
    fn test_drop_falls_then_lands() {
        let mut game = hot_seat();
        game.play(3).unwrap();

        for row in 1..=5 {
            assert_eq!(game.tick().unwrap(), TickOutcome::Falling { column: 3, row });
            assert_eq!(game.board().get(5, 3), Cell::Empty);
        }
        match game.tick().unwrap() {
            TickOutcome::Landed(applied) => {
                assert_eq!((applied.row, applied.column), (5, 3));
                assert_eq!(applied.player, Player::Red);
            }
            other => panic!("expected landing, got {other:?}"),
        }
        assert_eq!(game.board().get(5, 3), Cell::Red);
        assert_eq!(game.tick().unwrap(), TickOutcome::Idle);
        assert_eq!(game.status(), Status::Turn(Player::Yellow));
    }

    #[test]
    fn test_one_drop_at_a_time() {
        let mut game = hot_seat();
        game.play(0).unwrap();
        assert_eq!(game.play(1), Err(CoordinatorError::MoveInFlight));
    }

    #[test]
    fn test_reset_aborts_in_flight_drop() {
        let mut game = hot_seat();
        game.play(2).unwrap();
        game.tick().unwrap();

        game.reset();
        assert!(game.in_flight().is_none());
        assert_eq!(game.tick().unwrap(), TickOutcome::Aborted { column: 2 });
        assert_eq!(game.board().filled(), 0);
        assert_eq!(game.tick().unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn test_play_after_reset_replaces_stale_drop() {
        let mut game = hot_seat();
        game.play(2).unwrap();
        game.reset();

        game.play(4).unwrap();
        let landed = game.run_until_idle().unwrap();
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].column, 4);
        assert_eq!(game.board().get(5, 2), Cell::Empty);
    }

    #[test]
    fn test_rejects_full_column() {
        let mut game = hot_seat();
        for _ in 0..6 {
            game.play(0).unwrap();
            game.run_until_idle().unwrap();
        }
        assert_eq!(
            game.play(0),
            Err(CoordinatorError::Rejected(MoveRejection::ColumnFull))
        );
        assert_eq!(
            game.play(7),
            Err(CoordinatorError::Rejected(MoveRejection::InvalidColumn))
        );
    }

    #[test]
    fn test_opponent_answers_automatically() {
        let mut game = LocalMatch::new(
            VariantKind::ConnectFour.variant(),
            Some(Box::new(MinimaxAgent::new(2))),
        );
        game.play(3).unwrap();
        let landed = game.run_until_idle().unwrap();

        assert_eq!(landed.len(), 2);
        assert_eq!(landed[0].player, Player::Red);
        assert_eq!(landed[1].player, Player::Yellow);
        assert_eq!(game.status(), Status::YourTurn);
        assert_eq!(game.board().filled(), 2);
    }

    #[test]
    fn test_cannot_move_for_the_opponent() {
        let mut game = LocalMatch::new(
            VariantKind::ConnectFour.variant(),
            Some(Box::new(RandomAgent::with_seed(1))),
        );
        game.play(3).unwrap();
        // Land Red's piece; Yellow's reply is now falling.
        while game.board().filled() == 0 {
            game.tick().unwrap();
        }
        assert_eq!(game.status(), Status::OpponentTurn);
        assert_eq!(game.play(0), Err(CoordinatorError::MoveInFlight));
    }

    #[test]
    fn test_game_runs_to_completion() {
        let mut game = LocalMatch::new(
            VariantKind::ConnectFour.variant(),
            Some(Box::new(MinimaxAgent::new(2))),
        );
        let mut guard = 0;
        while game.state().phase == Phase::InProgress && guard < 100 {
            guard += 1;
            let column = game.board().valid_moves().next().unwrap();
            game.play(column).unwrap();
            game.run_until_idle().unwrap();
        }
        assert_eq!(game.state().phase, Phase::GameOver);
        assert!(matches!(game.status(), Status::GameOver { local: Some(Player::Red), .. }));
        assert_eq!(
            game.play(0),
            Err(CoordinatorError::Rejected(MoveRejection::MatchAlreadyOver))
        );

        game.reset();
        assert_eq!(game.board().filled(), 0);
        assert_eq!(game.status(), Status::YourTurn);
    }
}
