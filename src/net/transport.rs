use super::message::{NetEvent, PeerId, Rpc, RpcTarget};
use super::room::{PropertyPatch, RoomProperties};

/// What the coordinator needs from the networking layer: ordered RPC
/// delivery, a replicated room store with change notifications, and roster
/// queries. Events are pulled from the same loop that drives the
/// coordinator, so nothing here is shared across threads.
pub trait Transport {
    fn local_peer(&self) -> PeerId;

    /// The peer currently holding authority, if the room has one.
    fn authority(&self) -> Option<PeerId>;

    /// Everyone in the room, longest-present first.
    fn peers(&self) -> Vec<PeerId>;

    fn peer_count(&self) -> usize {
        self.peers().len()
    }

    fn is_authority(&self) -> bool {
        self.authority() == Some(self.local_peer())
    }

    fn send(&mut self, target: RpcTarget, rpc: Rpc);

    /// Write to the room store and return the version it produced. Every
    /// peer, the writer included, later sees a `PropertiesChanged`.
    fn set_properties(&mut self, patch: PropertyPatch) -> u64;

    fn properties(&self) -> RoomProperties;

    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<NetEvent>;
}
