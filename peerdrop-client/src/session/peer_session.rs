use crate::session::negotiation::{Negotiation, NegotiationState, Role};
use crate::transport::ConnectionWrapper;
use peerdrop_core::{FileMeta, PeerId};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;
use webrtc::data_channel::RTCDataChannel;

/// Identity of one session. A replacement session for the same remote gets
/// a fresh `session_id`, so late events from the old one can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub peer_id: PeerId,
    pub session_id: Uuid,
}

impl SessionKey {
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            peer_id,
            session_id: Uuid::new_v4(),
        }
    }
}

/// Point-in-time view of a session, for callers outside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub peer_id: PeerId,
    pub session_id: Uuid,
    pub role: Role,
    pub state: NegotiationState,
    pub channel_open: bool,
    /// Remote candidates waiting for the remote description.
    pub pending_candidates: usize,
}

pub struct PeerSession {
    pub key: SessionKey,
    pub negotiation: Negotiation,
    pub transport: ConnectionWrapper,
    pub channel: Option<Arc<RTCDataChannel>>,
    /// Last `FileMeta` received; pairs with the next binary frame.
    pub pending_meta: Option<FileMeta>,
    pub timeout_task: Option<JoinHandle<()>>,
}

impl PeerSession {
    pub fn new(key: SessionKey, role: Role, transport: ConnectionWrapper) -> Self {
        Self {
            key,
            negotiation: Negotiation::new(role),
            transport,
            channel: None,
            pending_meta: None,
            timeout_task: None,
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.key.peer_id
    }

    pub fn open_channel(&self) -> Option<&Arc<RTCDataChannel>> {
        self.channel
            .as_ref()
            .filter(|_| !self.negotiation.is_closed())
    }

    pub fn is_open(&self) -> bool {
        self.open_channel().is_some()
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            peer_id: self.key.peer_id.clone(),
            session_id: self.key.session_id,
            role: self.negotiation.role(),
            state: self.negotiation.state(),
            channel_open: self.is_open(),
            pending_candidates: self.negotiation.pending_candidates(),
        }
    }

    /// Release the channel and the peer connection. Idempotent.
    pub async fn close(&mut self) {
        if let Some(task) = self.timeout_task.take() {
            task.abort();
        }
        self.negotiation.close();
        self.pending_meta = None;

        if let Some(channel) = self.channel.take() {
            if let Err(e) = channel.close().await {
                warn!("Failed to close data channel with {}: {}", self.key.peer_id.short(), e);
            }
        }
        if let Err(e) = self.transport.close().await {
            warn!("Failed to close connection with {}: {:?}", self.key.peer_id.short(), e);
        }
    }
}
