//! Match coordination: the local single-device match and the networked,
//! authority-driven one share the same [`MatchState`] rules.

mod generation;
mod local;
mod network;
mod state;
mod status;

pub use generation::{GenerationCounter, GenerationToken};
pub use local::{DropAnimation, LocalMatch, TickOutcome};
pub use network::NetworkCoordinator;
pub use state::{AppliedMove, GameOutcome, MatchState, Phase};
pub use status::Status;
