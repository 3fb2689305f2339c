use crate::engine::Engine;
use crate::session::{PeerSession, Role, SessionKey};
use crate::transport::{ConnectionWrapper, TransportEvent};
use anyhow::Result;
use peerdrop_core::{ClientEvent, PeerId, SignalEnvelope, SignalPayload};
use tracing::{debug, error, info, warn};

impl Engine {
    /// Start a fresh session with `peer_id`, closing any previous one.
    /// An initiator sends its offer right away.
    pub(super) async fn create_session(&mut self, peer_id: PeerId, role: Role) {
        if self.sessions.contains_key(&peer_id) {
            info!("Replacing existing session with {}", peer_id.short());
            self.remove_session(&peer_id).await;
        }

        let key = SessionKey::new(peer_id.clone());
        let transport = match ConnectionWrapper::new(
            key.clone(),
            &self.config.transport,
            self.transport_tx.clone(),
        )
        .await
        {
            Ok(transport) => transport,
            Err(e) => {
                error!("Failed to create transport for {}: {:?}", peer_id.short(), e);
                return;
            }
        };

        let mut session = PeerSession::new(key.clone(), role, transport);

        if let Some(timeout) = self.config.negotiation_timeout {
            let tx = self.transport_tx.clone();
            session.timeout_task = Some(tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                let _ = tx.send(TransportEvent::NegotiationTimeout(key));
            }));
        }

        if role == Role::Initiator {
            if let Err(e) = self.send_offer(&mut session).await {
                error!("Failed to offer to {}: {:?}", peer_id.short(), e);
            }
        }

        debug!("Session with {} created as {:?}", peer_id.short(), role);
        self.sessions.insert(peer_id, session);
    }

    async fn send_offer(&self, session: &mut PeerSession) -> Result<()> {
        let sdp = session.transport.create_offer().await?;
        session.negotiation.offer_sent()?;
        self.send_signal(session.peer_id(), SignalPayload::Offer { sdp });
        Ok(())
    }

    pub(super) fn send_signal(&self, to: &PeerId, payload: SignalPayload) {
        let kind = payload.kind();
        let signal = match payload.to_value() {
            Ok(signal) => signal,
            Err(e) => {
                warn!("Failed to encode {} for {}: {}", kind, to.short(), e);
                return;
            }
        };

        debug!("Sending {} to {}", kind, to.short());
        self.send_relay(ClientEvent::Signal(SignalEnvelope {
            user_id: to.clone(),
            signal,
        }));
    }
}
