use peerdrop_core::{PeerId, ServerEvent};
use peerdrop_server::SignalingOutput;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock SignalingOutput that records every outbound relay event.
#[derive(Clone, Default)]
pub struct MockSignalingOutput {
    events: Arc<Mutex<Vec<(PeerId, ServerEvent)>>>,
    /// Blocks the sending thread this long on every non-empty `room-users`.
    snapshot_stall: Option<Duration>,
    stalls_started: Arc<AtomicUsize>,
}

impl MockSignalingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow down delivery of non-empty snapshots, widening the window in which
    /// another membership change could overtake them.
    pub fn stalling_snapshots(stall: Duration) -> Self {
        Self {
            snapshot_stall: Some(stall),
            ..Self::default()
        }
    }

    /// How many snapshot deliveries have begun stalling so far.
    pub fn stalls_started(&self) -> usize {
        self.stalls_started.load(Ordering::SeqCst)
    }

    /// All events delivered to a specific participant, in order.
    pub fn events_for(&self, peer_id: &PeerId) -> Vec<ServerEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == peer_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// The `room-users` snapshot the participant received, if any.
    pub fn room_users_for(&self, peer_id: &PeerId) -> Option<Vec<PeerId>> {
        self.events_for(peer_id).into_iter().find_map(|e| match e {
            ServerEvent::RoomUsers(users) => Some(users),
            _ => None,
        })
    }

    /// Ids announced to the participant via `user-connected`.
    pub fn connected_announcements_for(&self, peer_id: &PeerId) -> Vec<PeerId> {
        self.events_for(peer_id)
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::UserConnected(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn disconnected_announcements_for(&self, peer_id: &PeerId) -> Vec<PeerId> {
        self.events_for(peer_id)
            .into_iter()
            .filter_map(|e| match e {
                ServerEvent::UserDisconnected(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Every recorded delivery, in send order.
    pub fn all(&self) -> Vec<(PeerId, ServerEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn total(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl SignalingOutput for MockSignalingOutput {
    fn send_event(&self, peer_id: &PeerId, event: ServerEvent) -> bool {
        tracing::debug!("[MockSignaling] {:?} -> {}", event, peer_id.short());

        if let (Some(stall), ServerEvent::RoomUsers(users)) = (self.snapshot_stall, &event) {
            if !users.is_empty() {
                self.stalls_started.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(stall);
            }
        }

        self.events.lock().unwrap().push((peer_id.clone(), event));
        true
    }
}
