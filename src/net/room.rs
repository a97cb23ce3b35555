use serde::{Deserialize, Serialize};

use super::message::PeerId;
use crate::game::Player;

/// Two-bit rematch vote: bit 1 for the Red seat, which the opening authority
/// takes, bit 2 for the Yellow seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestartMask(u8);

impl RestartMask {
    pub const NONE: RestartMask = RestartMask(0);
    pub const AUTHORITY: RestartMask = RestartMask(1);
    pub const GUEST: RestartMask = RestartMask(2);
    pub const BOTH: RestartMask = RestartMask(3);

    pub fn for_seat(player: Player) -> RestartMask {
        if player == Player::INITIAL {
            RestartMask::AUTHORITY
        } else {
            RestartMask::GUEST
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: RestartMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: RestartMask) -> RestartMask {
        RestartMask((self.0 | other.0) & RestartMask::BOTH.0)
    }

    pub fn is_complete(self) -> bool {
        self == RestartMask::BOTH
    }
}

/// The two peers playing the match. Anyone else in the room only watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    pub red: PeerId,
    pub yellow: PeerId,
}

impl Seats {
    pub fn player_of(self, peer: PeerId) -> Option<Player> {
        if peer == self.red {
            Some(Player::Red)
        } else if peer == self.yellow {
            Some(Player::Yellow)
        } else {
            None
        }
    }

    pub fn contains(self, peer: PeerId) -> bool {
        self.player_of(peer).is_some()
    }
}

/// Current contents of the room's replicated store. Absent keys are `None`.
/// `version` grows with every write, so a peer can tell a stale notification
/// from a fresh one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomProperties {
    pub version: u64,
    pub board: Option<String>,
    pub turn: Option<Player>,
    pub ready: Option<bool>,
    pub restart_mask: Option<RestartMask>,
    pub game_over: Option<bool>,
    pub seats: Option<Seats>,
}

/// How a write touches the restart mask. Votes are merged by the store, so
/// two peers voting at once never overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskUpdate {
    Insert(RestartMask),
    Clear,
}

/// A write to the room store. Only the `Some` fields change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub board: Option<String>,
    pub turn: Option<Player>,
    pub ready: Option<bool>,
    pub restart_mask: Option<MaskUpdate>,
    pub game_over: Option<bool>,
    pub seats: Option<Seats>,
}

impl PropertyPatch {
    pub fn board(mut self, snapshot: String) -> Self {
        self.board = Some(snapshot);
        self
    }

    pub fn turn(mut self, turn: Player) -> Self {
        self.turn = Some(turn);
        self
    }

    pub fn ready(mut self, ready: bool) -> Self {
        self.ready = Some(ready);
        self
    }

    pub fn restart_mask(mut self, update: MaskUpdate) -> Self {
        self.restart_mask = Some(update);
        self
    }

    pub fn game_over(mut self, game_over: bool) -> Self {
        self.game_over = Some(game_over);
        self
    }

    pub fn seats(mut self, seats: Seats) -> Self {
        self.seats = Some(seats);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == PropertyPatch::default()
    }
}

impl RoomProperties {
    /// Merge a write and bump the version.
    pub fn apply(&mut self, patch: PropertyPatch) {
        if let Some(board) = patch.board {
            self.board = Some(board);
        }
        if let Some(turn) = patch.turn {
            self.turn = Some(turn);
        }
        if let Some(ready) = patch.ready {
            self.ready = Some(ready);
        }
        match patch.restart_mask {
            Some(MaskUpdate::Insert(bits)) => {
                let current = self.restart_mask.unwrap_or_default();
                self.restart_mask = Some(current.union(bits));
            }
            Some(MaskUpdate::Clear) => self.restart_mask = Some(RestartMask::NONE),
            None => {}
        }
        if let Some(game_over) = patch.game_over {
            self.game_over = Some(game_over);
        }
        if let Some(seats) = patch.seats {
            self.seats = Some(seats);
        }
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_bits() {
        assert_eq!(RestartMask::for_seat(Player::Red).bits(), 1);
        assert_eq!(RestartMask::for_seat(Player::Yellow).bits(), 2);
        assert!(RestartMask::AUTHORITY.union(RestartMask::GUEST).is_complete());
        assert!(!RestartMask::GUEST.is_complete());
        assert!(RestartMask::BOTH.contains(RestartMask::GUEST));
        assert!(!RestartMask::AUTHORITY.contains(RestartMask::GUEST));
    }

    #[test]
    fn test_votes_merge() {
        let mut props = RoomProperties::default();
        props.apply(PropertyPatch::default().restart_mask(MaskUpdate::Insert(RestartMask::GUEST)));
        props.apply(PropertyPatch::default().restart_mask(MaskUpdate::Insert(RestartMask::AUTHORITY)));
        assert_eq!(props.restart_mask, Some(RestartMask::BOTH));

        props.apply(PropertyPatch::default().restart_mask(MaskUpdate::Clear));
        assert_eq!(props.restart_mask, Some(RestartMask::NONE));
    }

    #[test]
    fn test_apply_touches_only_present_keys() {
        let mut props = RoomProperties::default();
        props.apply(PropertyPatch::default().board("000".into()).turn(Player::Red));
        props.apply(PropertyPatch::default().ready(true));

        assert_eq!(props.board.as_deref(), Some("000"));
        assert_eq!(props.turn, Some(Player::Red));
        assert_eq!(props.ready, Some(true));
        assert_eq!(props.game_over, None);
        assert_eq!(props.version, 2);
    }

    #[test]
    fn test_seat_lookup() {
        let seats = Seats {
            red: PeerId(1),
            yellow: PeerId(2),
        };
        assert_eq!(seats.player_of(PeerId(1)), Some(Player::Red));
        assert_eq!(seats.player_of(PeerId(2)), Some(Player::Yellow));
        assert_eq!(seats.player_of(PeerId(3)), None);
        assert!(!seats.contains(PeerId(3)));

        let mut props = RoomProperties::default();
        props.apply(PropertyPatch::default().seats(seats));
        props.apply(PropertyPatch::default().ready(true));
        assert_eq!(props.seats, Some(seats));
    }

    #[test]
    fn test_empty_patch() {
        assert!(PropertyPatch::default().is_empty());
        assert!(!PropertyPatch::default().game_over(false).is_empty());
    }
}
