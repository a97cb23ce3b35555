use log::{debug, error, info, warn};

use super::state::{GameOutcome, MatchState, Phase};
use super::status::Status;
use crate::config::NetworkConfig;
use crate::error::{BoardError, CoordinatorError, MoveRejection};
use crate::game::{Board, BoardGeometry, DisplayPoint, GameVariant, Player};
use crate::net::{
    MaskUpdate, NetEvent, PeerId, PropertyPatch, RestartMask, RoomProperties, Rpc, RpcTarget,
    Seats, Transport,
};

/// Per-peer driver of a networked match.
///
/// Whichever peer holds authority validates and applies every move, writes
/// the result to the room store and broadcasts it. Every peer, the authority
/// included, rebuilds its view from room-store notifications; broadcasts only
/// get the same information there sooner. Nothing here blocks: the owner
/// calls [`pump`](Self::pump) from its update loop.
pub struct NetworkCoordinator<T: Transport> {
    variant: GameVariant,
    network: NetworkConfig,
    geometry: BoardGeometry,
    transport: T,
    state: MatchState,
    display_line: Option<(DisplayPoint, DisplayPoint)>,
    highlight: Option<usize>,
    notice: Option<MoveRejection>,
    restart_requested: bool,
    seats: Option<Seats>,
    applied_version: u64,
}

impl<T: Transport> NetworkCoordinator<T> {
    pub fn new(variant: GameVariant, network: NetworkConfig, geometry: BoardGeometry, transport: T) -> Self {
        let state = MatchState::new(&variant);
        let mut coordinator = NetworkCoordinator {
            variant,
            network,
            geometry,
            transport,
            state,
            display_line: None,
            highlight: None,
            notice: None,
            restart_requested: false,
            seats: None,
            applied_version: 0,
        };
        if coordinator.transport.is_authority() {
            coordinator.establish_defaults();
        }
        coordinator
    }

    pub fn variant(&self) -> &GameVariant {
        &self.variant
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn peer_id(&self) -> PeerId {
        self.transport.local_peer()
    }

    pub fn is_authority(&self) -> bool {
        self.transport.is_authority()
    }

    /// The color this peer plays. `None` for an observer, or while the room
    /// is still waiting for its players.
    pub fn local_player(&self) -> Option<Player> {
        self.seats.and_then(|seats| seats.player_of(self.peer_id()))
    }

    pub fn seats(&self) -> Option<Seats> {
        self.seats
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn turn(&self) -> Player {
        self.state.turn
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_input_locked(&self) -> bool {
        self.state.input_locked
    }

    pub fn restart_mask(&self) -> RestartMask {
        self.state.restart_mask
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.state.outcome.as_ref()
    }

    /// Winning-line endpoints as projected by the authority, if the
    /// game-over broadcast arrived.
    pub fn display_line(&self) -> Option<(DisplayPoint, DisplayPoint)> {
        self.display_line
    }

    /// Whether this peer has voted for a rematch of the current match.
    pub fn has_voted(&self) -> bool {
        self.restart_requested
    }

    /// Column of the most recent move, for highlighting.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn status(&self) -> Status {
        match self.state.phase {
            Phase::Abandoned => Status::OpponentLeft,
            Phase::AwaitingPlayers => Status::WaitingForPlayers,
            Phase::GameOver => {
                let mask = self.state.restart_mask;
                let voted = self
                    .local_player()
                    .is_some_and(|seat| mask.contains(RestartMask::for_seat(seat)));
                if voted && !mask.is_complete() {
                    Status::WaitingForRematch
                } else {
                    Status::GameOver {
                        winner: self.state.outcome.and_then(|o| o.winner()),
                        local: self.local_player(),
                    }
                }
            }
            Phase::InProgress => match (self.notice, self.local_player()) {
                (Some(reason), _) => Status::Rejected(reason),
                (None, Some(seat)) if seat == self.state.turn => Status::YourTurn,
                (None, Some(_)) => Status::OpponentTurn,
                (None, None) => Status::Turn(self.state.turn),
            },
        }
    }

    /// Ask the authority to drop a piece for this peer. Input stays locked
    /// until the authority answers; the local board is left alone.
    pub fn request_move(&mut self, column: usize) -> Result<(), CoordinatorError> {
        if self.state.input_locked {
            return Err(CoordinatorError::InputLocked);
        }
        self.notice = None;
        if self.state.phase == Phase::AwaitingPlayers {
            debug!("{}: move ignored, waiting for players", self.peer_id());
            return Ok(());
        }

        self.state.input_locked = true;
        let requester = self.peer_id();
        debug!("{requester}: requesting column {column}");
        self.transport
            .send(RpcTarget::Authority, Rpc::MoveRequest { column, requester });
        Ok(())
    }

    /// Vote for a rematch. The authority resets once both players have
    /// voted; observers have no vote.
    pub fn request_restart(&mut self) -> Result<(), CoordinatorError> {
        if self.state.phase != Phase::GameOver {
            return Err(CoordinatorError::RestartUnavailable);
        }
        let Some(seat) = self.local_player() else {
            return Err(CoordinatorError::RestartUnavailable);
        };
        let vote = RestartMask::for_seat(seat);
        self.restart_requested = true;
        info!("{}: voting for a rematch", self.peer_id());
        self.transport
            .set_properties(PropertyPatch::default().restart_mask(MaskUpdate::Insert(vote)));
        Ok(())
    }

    /// Handle every pending transport event. Returns how many were handled.
    pub fn pump(&mut self) -> Result<usize, CoordinatorError> {
        let mut handled = 0;
        while let Some(event) = self.transport.poll_event() {
            handled += 1;
            self.handle_event(event)?;
        }
        Ok(handled)
    }

    pub fn handle_event(&mut self, event: NetEvent) -> Result<(), CoordinatorError> {
        match event {
            NetEvent::Rpc { from, rpc } => return self.handle_rpc(from, rpc),
            NetEvent::PropertiesChanged(props) => self.on_properties(props),
            NetEvent::PeerJoined(peer) => self.on_peer_joined(peer),
            NetEvent::PeerLeft(peer) => self.on_peer_left(peer),
            NetEvent::AuthorityChanged(peer) => self.on_authority_changed(peer),
        }
        Ok(())
    }

    fn handle_rpc(&mut self, from: PeerId, rpc: Rpc) -> Result<(), CoordinatorError> {
        let me = self.peer_id();
        match rpc {
            Rpc::MoveRequest { column, requester } => {
                if !self.is_authority() {
                    warn!("{me}: move request from {from} reached a non-authority");
                    return Ok(());
                }
                if requester != from {
                    warn!("{me}: {from} sent a request on behalf of {requester}");
                    self.unlock(from, Some(MoveRejection::NotYourTurn));
                    return Ok(());
                }
                return self.authority_move(column, from);
            }
            Rpc::HighlightColumn { column, .. } => self.highlight = Some(column),
            Rpc::TurnChanged { turn } => {
                if self.state.phase == Phase::InProgress && self.state.turn != turn {
                    self.state.turn = turn;
                    self.notice = None;
                }
            }
            Rpc::GameOver {
                outcome,
                display,
                version,
            } => {
                // A newer room state without game_over means a rematch began
                if version < self.applied_version && self.state.phase != Phase::GameOver {
                    debug!("{me}: skipping stale game over v{version}");
                } else if self.state.phase != Phase::Abandoned {
                    self.state.outcome = Some(outcome);
                    self.state.phase = Phase::GameOver;
                    self.display_line = display;
                }
            }
            Rpc::Unlock { requester, rejection } => {
                if requester == me {
                    self.state.input_locked = false;
                    self.notice = rejection;
                }
            }
            Rpc::MatchReset {
                snapshot,
                turn,
                version,
            } => {
                if version < self.applied_version {
                    debug!(
                        "{me}: skipping stale reset v{version} (have v{})",
                        self.applied_version
                    );
                    return Ok(());
                }
                match self.variant.decode_board(&snapshot) {
                    Ok(board) => {
                        self.state.board = board;
                        self.state.turn = turn;
                        self.begin_new_match();
                    }
                    Err(err) => warn!("{me}: ignoring reset with bad snapshot: {err}"),
                }
            }
        }
        Ok(())
    }

    /// Validate and apply a move on the authority. Every path answers the
    /// requester with an unlock.
    fn authority_move(&mut self, column: usize, requester: PeerId) -> Result<(), CoordinatorError> {
        let seat = self
            .transport
            .properties()
            .seats
            .and_then(|seats| seats.player_of(requester));
        let Some(mover) = seat else {
            warn!("rejecting column {column} from {requester}: not seated");
            self.unlock(requester, Some(MoveRejection::NotYourTurn));
            return Ok(());
        };
        if let Err(rejection) = self.state.validate(column, mover) {
            warn!("rejecting column {column} from {requester}: {rejection}");
            self.unlock(requester, Some(rejection));
            return Ok(());
        }

        let applied = match self.state.apply(&self.variant, column) {
            Ok(applied) => applied,
            Err(err) => return self.fail_move(requester, column, err),
        };

        self.publish(PropertyPatch::default().board(self.state.board.to_snapshot()));
        self.transport.send(
            RpcTarget::All,
            Rpc::HighlightColumn {
                column,
                player: applied.player,
            },
        );

        match applied.outcome {
            Some(outcome) => {
                let display = outcome
                    .line()
                    .map(|line| (self.geometry.project(line.start), self.geometry.project(line.end)));
                info!("match over: {outcome:?}");
                self.display_line = display;
                let version = self.publish(PropertyPatch::default().game_over(true));
                self.transport.send(
                    RpcTarget::AllBuffered,
                    Rpc::GameOver {
                        outcome,
                        display,
                        version,
                    },
                );
            }
            None => {
                let turn = self.state.turn;
                self.publish(PropertyPatch::default().turn(turn));
                self.transport.send(RpcTarget::All, Rpc::TurnChanged { turn });
            }
        }

        self.unlock(requester, None);
        Ok(())
    }

    /// A move that passed validation could not be applied. The requester is
    /// unlocked before the fault goes back to the caller.
    fn fail_move(
        &mut self,
        requester: PeerId,
        column: usize,
        err: BoardError,
    ) -> Result<(), CoordinatorError> {
        self.unlock(requester, Some(err.into()));
        error!("validated move in column {column} failed: {err}");
        Err(CoordinatorError::Internal(err.to_string()))
    }

    fn unlock(&mut self, requester: PeerId, rejection: Option<MoveRejection>) {
        self.transport
            .send(RpcTarget::Peer(requester), Rpc::Unlock { requester, rejection });
    }

    /// Authority-side write; remembers the version so older notifications
    /// cannot roll the canonical state back.
    fn publish(&mut self, patch: PropertyPatch) -> u64 {
        let version = self.transport.set_properties(patch);
        self.applied_version = self.applied_version.max(version);
        version
    }

    fn on_properties(&mut self, props: RoomProperties) {
        if props.version < self.applied_version {
            debug!(
                "{}: skipping stale properties v{} (have v{})",
                self.peer_id(),
                props.version,
                self.applied_version
            );
            return;
        }
        self.applied_version = props.version;
        self.mirror(&props);

        if self.is_authority()
            && self.state.phase == Phase::GameOver
            && self.state.restart_mask.is_complete()
        {
            self.authority_reset();
        }
    }

    /// Rebuild the local view from a room snapshot.
    fn mirror(&mut self, props: &RoomProperties) {
        if let Some(snapshot) = &props.board {
            match self.variant.decode_board(snapshot) {
                Ok(board) => self.state.board = board,
                Err(err) => warn!("{}: ignoring bad board snapshot: {err}", self.peer_id()),
            }
        }
        if let Some(turn) = props.turn {
            if turn != self.state.turn {
                self.notice = None;
            }
            self.state.turn = turn;
        }
        self.state.restart_mask = props.restart_mask.unwrap_or_default();
        if props.seats.is_some() {
            self.seats = props.seats;
        }

        if self.state.phase == Phase::Abandoned {
            return;
        }
        let was = self.state.phase;
        self.state.phase = if props.ready != Some(true) {
            Phase::AwaitingPlayers
        } else if props.game_over == Some(true) {
            Phase::GameOver
        } else {
            Phase::InProgress
        };

        match (was, self.state.phase) {
            (_, Phase::GameOver) if self.state.outcome.is_none() => {
                // The game-over broadcast was missed; work it out locally.
                self.state.outcome = GameOutcome::of(&self.variant, &self.state.board);
            }
            (Phase::GameOver, Phase::InProgress) => self.begin_new_match(),
            _ => {}
        }
    }

    fn begin_new_match(&mut self) {
        self.state.phase = Phase::InProgress;
        self.state.outcome = None;
        self.display_line = None;
        self.highlight = None;
        self.notice = None;
        self.restart_requested = false;
    }

    fn authority_reset(&mut self) {
        info!("{}: both players voted, starting a rematch", self.peer_id());
        self.state.reset(&self.variant);
        self.begin_new_match();
        let snapshot = self.state.board.to_snapshot();
        let version = self.publish(
            PropertyPatch::default()
                .board(snapshot.clone())
                .turn(self.state.turn)
                .restart_mask(MaskUpdate::Clear)
                .game_over(false),
        );
        self.transport.send(
            RpcTarget::AllBuffered,
            Rpc::MatchReset {
                snapshot,
                turn: self.state.turn,
                version,
            },
        );
    }

    /// Fill in whatever the room store is missing and mark the room ready
    /// once enough peers are present. Existing values are left alone.
    fn establish_defaults(&mut self) {
        let props = self.transport.properties();
        let enough = self.transport.peer_count() >= self.network.expected_peers;
        let mut patch = PropertyPatch::default();

        if props.board.is_none() {
            patch = patch.board(self.variant.new_board().to_snapshot());
        }
        if props.turn.is_none() {
            patch = patch.turn(Player::INITIAL);
        }
        if props.restart_mask.is_none() {
            patch = patch.restart_mask(MaskUpdate::Clear);
        }
        if props.game_over.is_none() {
            patch = patch.game_over(false);
        }
        match props.ready {
            None => patch = patch.ready(enough),
            Some(false) if enough => patch = patch.ready(true),
            _ => {}
        }
        if let Some(seats) = self.seating(&props) {
            patch = patch.seats(seats);
        }

        if patch.is_empty() {
            debug!("{}: room already initialised", self.peer_id());
        } else {
            debug!("{}: initialising room with {patch:?}", self.peer_id());
            self.publish(patch);
        }
        let props = self.transport.properties();
        self.applied_version = props.version;
        self.mirror(&props);
    }

    fn on_peer_joined(&mut self, peer: PeerId) {
        info!("{}: {peer} joined", self.peer_id());
        if !self.is_authority() {
            return;
        }
        let props = self.transport.properties();
        let mut patch = PropertyPatch::default();
        if props.ready != Some(true) && self.transport.peer_count() >= self.network.expected_peers {
            info!("{}: all players present, match ready", self.peer_id());
            patch = patch.ready(true);
        }
        if let Some(seats) = self.seating(&props) {
            patch = patch.seats(seats);
        }
        if !patch.is_empty() {
            self.publish(patch);
        }
    }

    /// Seat the authority as Red and the longest-present other peer as
    /// Yellow, once enough peers are in a room that has no seats yet.
    fn seating(&self, props: &RoomProperties) -> Option<Seats> {
        if props.seats.is_some() || self.transport.peer_count() < self.network.expected_peers {
            return None;
        }
        let me = self.peer_id();
        let yellow = self.transport.peers().into_iter().find(|&peer| peer != me)?;
        info!("{me}: seating {me} as Red and {yellow} as Yellow");
        Some(Seats { red: me, yellow })
    }

    fn on_peer_left(&mut self, peer: PeerId) {
        info!("{}: {peer} left", self.peer_id());
        let player_left = match self.seats {
            Some(seats) => seats.contains(peer),
            None => self.transport.peer_count() < self.network.expected_peers,
        };
        if !player_left {
            return;
        }
        match self.state.phase {
            Phase::InProgress | Phase::GameOver => {
                self.state.phase = Phase::Abandoned;
                self.state.input_locked = false;
                self.state.restart_mask = RestartMask::NONE;
                self.restart_requested = false;
                self.notice = None;
                if self.is_authority() {
                    self.publish(PropertyPatch::default().restart_mask(MaskUpdate::Clear));
                }
            }
            Phase::AwaitingPlayers | Phase::Abandoned => {}
        }
    }

    fn on_authority_changed(&mut self, peer: PeerId) {
        if peer == self.peer_id() {
            info!("{peer}: took over authority");
            self.establish_defaults();
        } else {
            debug!("{}: authority is now {peer}", self.peer_id());
        }
    }
}
