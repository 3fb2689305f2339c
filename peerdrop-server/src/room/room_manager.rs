use crate::room::{Room, RoomCommand};
use crate::signaling::SignalingOutput;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use peerdrop_core::{PeerId, PeerMessage, RoomId, ServerEvent, SignalEnvelope};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Room registry of the relay.
///
/// Every membership change happens while holding the room's map entry, so two
/// joins, or a join racing a leave, on the same room are serialized. The
/// notifications a change produces are queued before the entry is released,
/// so each participant sees them in the order the changes were applied.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, Room>>,
    memberships: Arc<DashMap<PeerId, HashSet<RoomId>>>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            memberships: Arc::new(DashMap::new()),
            signaling,
        }
    }

    pub async fn handle(&self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { peer_id, room_id } => self.join(peer_id, room_id).await,
            RoomCommand::Signal { from, envelope } => self.relay_signal(from, envelope).await,
            RoomCommand::Message {
                from,
                room_id,
                message,
            } => self.relay_message(from, room_id, message).await,
            RoomCommand::Disconnect { peer_id } => self.leave(&peer_id).await,
        }
    }

    pub async fn join(&self, peer_id: PeerId, room_id: RoomId) {
        {
            let mut room = self.rooms.entry(room_id.clone()).or_default();
            let newly_joined = room.insert(peer_id.clone());
            let existing = room.members_except(&peer_id);

            info!(
                "User {} joined room {} ({} participants)",
                peer_id.short(),
                room_id,
                room.len()
            );

            // The snapshot is queued before anyone learns about the joiner, so an
            // offer from an existing member always lands after `room-users`.
            self.signaling
                .send_event(&peer_id, ServerEvent::RoomUsers(existing.clone()));

            if newly_joined {
                for member in &existing {
                    self.signaling
                        .send_event(member, ServerEvent::UserConnected(peer_id.clone()));
                }
            }
        }

        self.memberships
            .entry(peer_id)
            .or_default()
            .insert(room_id);
    }

    pub async fn relay_signal(&self, from: PeerId, envelope: SignalEnvelope) {
        let target = envelope.user_id;
        debug!("Relaying signal from {} to {}", from.short(), target.short());

        let forwarded = ServerEvent::Signal(SignalEnvelope {
            user_id: from,
            signal: envelope.signal,
        });
        self.signaling.send_event(&target, forwarded);
    }

    pub async fn relay_message(&self, from: PeerId, room_id: RoomId, message: serde_json::Value) {
        let Some(room) = self.rooms.get(&room_id) else {
            debug!("Dropping message for unknown room {}", room_id);
            return;
        };
        let recipients = room.members_except(&from);

        debug!(
            "Relaying message in room {} from {} to {} peers",
            room_id,
            from.short(),
            recipients.len()
        );

        for member in &recipients {
            let event = ServerEvent::ReceiveMessage(PeerMessage {
                user_id: from.clone(),
                message: message.clone(),
            });
            self.signaling.send_event(member, event);
        }
    }

    pub async fn leave(&self, peer_id: &PeerId) {
        let Some((_, room_ids)) = self.memberships.remove(peer_id) else {
            return;
        };

        for room_id in room_ids {
            let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
                continue;
            };
            if !entry.get_mut().remove(peer_id) {
                continue;
            }

            let remaining = entry.get().members();
            for member in &remaining {
                self.signaling
                    .send_event(member, ServerEvent::UserDisconnected(peer_id.clone()));
            }

            if remaining.is_empty() {
                entry.remove();
                info!("Room {} deleted (empty)", room_id);
            } else {
                info!(
                    "Room {} has {} participants left",
                    room_id,
                    remaining.len()
                );
            }
        }
    }

    pub fn members(&self, room_id: &RoomId) -> Option<Vec<PeerId>> {
        self.rooms.get(room_id).map(|room| room.members())
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
