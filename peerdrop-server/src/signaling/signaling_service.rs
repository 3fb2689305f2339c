use crate::signaling::SignalingOutput;
use axum::extract::ws::Message;
use dashmap::DashMap;
use peerdrop_core::{PeerId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
}

/// Registry of live relay connections, keyed by the participant id the relay
/// assigned on upgrade.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
        }
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
    }

    pub fn is_registered(&self, peer_id: &PeerId) -> bool {
        self.inner.peers.contains_key(peer_id)
    }

    pub fn send_signal(&self, peer_id: &PeerId, event: &ServerEvent) -> bool {
        let Some(peer) = self.inner.peers.get(peer_id) else {
            debug!("Dropping event for unregistered user {}", peer_id.short());
            return false;
        };

        match serde_json::to_string(event) {
            Ok(json) => {
                if let Err(e) = peer.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {}: {:?}", peer_id.short(), e);
                    return false;
                }
                true
            }
            Err(e) => {
                error!("Failed to serialize relay event: {}", e);
                false
            }
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalingOutput for SignalingService {
    fn send_event(&self, peer_id: &PeerId, event: ServerEvent) -> bool {
        self.send_signal(peer_id, &event)
    }
}
