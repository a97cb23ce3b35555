use std::fmt;

use serde::{Deserialize, Serialize};

use super::room::RoomProperties;
use crate::coordinator::GameOutcome;
use crate::error::MoveRejection;
use crate::game::{DisplayPoint, Player};

/// Transport-assigned peer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

/// Remote calls exchanged between peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rpc {
    /// A seated peer asks the authority to drop a piece for it. A request
    /// whose `requester` is not the sender is refused.
    MoveRequest { column: usize, requester: PeerId },
    /// A piece landed in `column`; purely cosmetic.
    HighlightColumn { column: usize, player: Player },
    /// Turn passed to `turn`. The next snapshot supersedes this.
    TurnChanged { turn: Player },
    /// Match finished. `display` holds the winning-line endpoints already
    /// projected by the authority; `version` is the room version that
    /// recorded the end of the match.
    GameOver {
        outcome: GameOutcome,
        display: Option<(DisplayPoint, DisplayPoint)>,
        version: u64,
    },
    /// Re-enable input on `requester`, with the reason if the move was refused.
    Unlock {
        requester: PeerId,
        rejection: Option<MoveRejection>,
    },
    /// Both players agreed to a rematch; start from this board. `version`
    /// is the room version of the reset write.
    MatchReset {
        snapshot: String,
        turn: Player,
        version: u64,
    },
}

/// Where an [`Rpc`] goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcTarget {
    Authority,
    Peer(PeerId),
    All,
    /// Like `All`, and kept as the room's latest buffered message so peers
    /// joining later still receive it.
    AllBuffered,
}

/// Everything a transport delivers to a peer's update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum NetEvent {
    Rpc { from: PeerId, rpc: Rpc },
    PropertiesChanged(RoomProperties),
    PeerJoined(PeerId),
    PeerLeft(PeerId),
    AuthorityChanged(PeerId),
}
