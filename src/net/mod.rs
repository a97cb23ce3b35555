//! Boundary to the networking layer: wire messages, the replicated room
//! store, the `Transport` trait, and an in-memory transport.

mod loopback;
mod message;
mod room;
mod transport;

pub use loopback::{LoopbackHub, LoopbackTransport};
pub use message::{NetEvent, PeerId, Rpc, RpcTarget};
pub use room::{MaskUpdate, PropertyPatch, RestartMask, RoomProperties, Seats};
pub use transport::Transport;
