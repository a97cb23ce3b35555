//! In-process transport: every peer lives in the same process and shares one
//! hub. RPCs cross the hub as JSON text, as they would on a real wire.
//! Used by the tests and the headless simulator.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

use log::{debug, warn};

use super::message::{NetEvent, PeerId, Rpc, RpcTarget};
use super::room::{PropertyPatch, RoomProperties};
use super::transport::Transport;

enum Queued {
    Rpc { from: PeerId, payload: String },
    Event(NetEvent),
}

#[derive(Default)]
struct HubInner {
    next_id: u32,
    roster: Vec<PeerId>,
    authority: Option<PeerId>,
    properties: RoomProperties,
    inboxes: BTreeMap<PeerId, VecDeque<Queued>>,
    buffered: Option<(PeerId, String)>,
    drop_requests: bool,
    muted: BTreeSet<PeerId>,
}

impl HubInner {
    fn push(&mut self, peer: PeerId, item: Queued) {
        if let Some(inbox) = self.inboxes.get_mut(&peer) {
            inbox.push_back(item);
        }
    }

    fn push_all(&mut self, event: NetEvent) {
        for inbox in self.inboxes.values_mut() {
            inbox.push_back(Queued::Event(event.clone()));
        }
    }

    fn broadcast(&mut self, from: PeerId, payload: &str) {
        let targets: Vec<PeerId> = self
            .roster
            .iter()
            .copied()
            .filter(|peer| !self.muted.contains(peer))
            .collect();
        for peer in targets {
            self.push(
                peer,
                Queued::Rpc {
                    from,
                    payload: payload.to_string(),
                },
            );
        }
    }

    fn write(&mut self, patch: PropertyPatch) -> u64 {
        self.properties.apply(patch);
        let snapshot = self.properties.clone();
        self.push_all(NetEvent::PropertiesChanged(snapshot));
        self.properties.version
    }
}

/// Shared room. Cloning the hub gives another handle to the same room.
#[derive(Clone, Default)]
pub struct LoopbackHub {
    inner: Rc<RefCell<HubInner>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer. The first peer in an empty room becomes the authority.
    /// The newcomer receives the current room properties and the latest
    /// buffered broadcast; everyone else is told it joined.
    pub fn join(&self) -> LoopbackTransport {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let peer = PeerId(inner.next_id);

        inner.push_all(NetEvent::PeerJoined(peer));
        inner.roster.push(peer);
        inner.inboxes.insert(peer, VecDeque::new());
        if inner.authority.is_none() {
            inner.authority = Some(peer);
        }

        let properties = inner.properties.clone();
        inner.push(peer, Queued::Event(NetEvent::PropertiesChanged(properties)));
        if let Some((from, payload)) = inner.buffered.clone() {
            inner.push(peer, Queued::Rpc { from, payload });
        }
        debug!("{peer} joined ({} in room)", inner.roster.len());

        LoopbackTransport {
            peer,
            hub: Rc::clone(&self.inner),
        }
    }

    /// Remove a peer. If it held authority, the longest-present remaining
    /// peer takes over.
    pub fn leave(&self, peer: PeerId) {
        let mut inner = self.inner.borrow_mut();
        inner.roster.retain(|&p| p != peer);
        inner.inboxes.remove(&peer);
        inner.muted.remove(&peer);
        inner.push_all(NetEvent::PeerLeft(peer));

        if inner.authority == Some(peer) {
            inner.authority = inner.roster.first().copied();
            if let Some(next) = inner.authority {
                inner.push_all(NetEvent::AuthorityChanged(next));
            }
        }
        debug!("{peer} left ({} in room)", inner.roster.len());
    }

    /// Write to the room store from outside any peer, e.g. room-creation
    /// options.
    pub fn set_properties(&self, patch: PropertyPatch) -> u64 {
        self.inner.borrow_mut().write(patch)
    }

    pub fn properties(&self) -> RoomProperties {
        self.inner.borrow().properties.clone()
    }

    /// Silently discard every request addressed to the authority.
    pub fn drop_requests(&self, drop: bool) {
        self.inner.borrow_mut().drop_requests = drop;
    }

    /// Stop (or resume) delivering broadcasts to `peer`. Property
    /// notifications and direct messages still arrive.
    pub fn mute_broadcasts(&self, peer: PeerId, muted: bool) {
        let mut inner = self.inner.borrow_mut();
        if muted {
            inner.muted.insert(peer);
        } else {
            inner.muted.remove(&peer);
        }
    }
}

/// One peer's handle on a [`LoopbackHub`].
pub struct LoopbackTransport {
    peer: PeerId,
    hub: Rc<RefCell<HubInner>>,
}

impl Transport for LoopbackTransport {
    fn local_peer(&self) -> PeerId {
        self.peer
    }

    fn authority(&self) -> Option<PeerId> {
        self.hub.borrow().authority
    }

    fn peers(&self) -> Vec<PeerId> {
        self.hub.borrow().roster.clone()
    }

    fn send(&mut self, target: RpcTarget, rpc: Rpc) {
        let payload = match serde_json::to_string(&rpc) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("{}: failed to encode {rpc:?}: {err}", self.peer);
                return;
            }
        };

        let mut inner = self.hub.borrow_mut();
        match target {
            RpcTarget::Authority => {
                if inner.drop_requests {
                    debug!("{}: request to authority dropped", self.peer);
                    return;
                }
                if let Some(authority) = inner.authority {
                    inner.push(
                        authority,
                        Queued::Rpc {
                            from: self.peer,
                            payload,
                        },
                    );
                }
            }
            RpcTarget::Peer(peer) => inner.push(
                peer,
                Queued::Rpc {
                    from: self.peer,
                    payload,
                },
            ),
            RpcTarget::All => inner.broadcast(self.peer, &payload),
            RpcTarget::AllBuffered => {
                inner.broadcast(self.peer, &payload);
                inner.buffered = Some((self.peer, payload));
            }
        }
    }

    fn set_properties(&mut self, patch: PropertyPatch) -> u64 {
        self.hub.borrow_mut().write(patch)
    }

    fn properties(&self) -> RoomProperties {
        self.hub.borrow().properties.clone()
    }

    fn poll_event(&mut self) -> Option<NetEvent> {
        loop {
            let item = self.hub.borrow_mut().inboxes.get_mut(&self.peer)?.pop_front()?;
            match item {
                Queued::Event(event) => return Some(event),
                Queued::Rpc { from, payload } => match serde_json::from_str::<Rpc>(&payload) {
                    Ok(rpc) => return Some(NetEvent::Rpc { from, rpc }),
                    Err(err) => warn!("{}: undecodable message from {from}: {err}", self.peer),
                },
            }
        }
    }
}
