use crate::engine::Engine;
use crate::session::{PeerSession, Role};
use anyhow::{Result, bail};
use peerdrop_core::{IceCandidate, PeerId, SignalPayload};
use tracing::{debug, error, info, warn};

impl Engine {
    pub(super) async fn handle_signal(&mut self, from: PeerId, signal: serde_json::Value) {
        let payload = match SignalPayload::from_value(signal) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Undecodable signal from {}: {}", from.short(), e);
                return;
            }
        };
        debug!("Received {} from {}", payload.kind(), from.short());

        if !self.sessions.contains_key(&from) {
            if !matches!(payload, SignalPayload::Offer { .. }) {
                debug!("No session with {}, dropping {}", from.short(), payload.kind());
                return;
            }
            info!("Offer from {} before any session, responding", from.short());
            self.create_session(from.clone(), Role::Responder).await;
        }

        let Some(session) = self.sessions.get_mut(&from) else {
            return;
        };

        match payload {
            SignalPayload::Offer { sdp } => match Self::accept_offer(session, sdp).await {
                Ok(answer) => self.send_signal(&from, SignalPayload::Answer { sdp: answer }),
                Err(e) => error!("Failed to answer offer from {}: {:?}", from.short(), e),
            },
            SignalPayload::Answer { sdp } => {
                if let Err(e) = Self::accept_answer(session, sdp).await {
                    error!("Failed to apply answer from {}: {:?}", from.short(), e);
                }
            }
            SignalPayload::Candidate(candidate) => {
                if let Err(e) = Self::accept_candidate(session, candidate).await {
                    warn!("Failed to add candidate from {}: {:?}", from.short(), e);
                }
            }
        }
    }

    /// Apply a remote offer and produce the answer to send back.
    async fn accept_offer(session: &mut PeerSession, sdp: String) -> Result<String> {
        if !session.negotiation.expects_offer() {
            bail!(
                "unexpected offer for {:?} session in {:?}",
                session.negotiation.role(),
                session.negotiation.state()
            );
        }

        session.transport.apply_offer(sdp).await?;
        let queued = session.negotiation.remote_description_applied()?;
        Self::replay_candidates(session, queued).await;

        let answer = session.transport.create_answer().await?;
        session.negotiation.answer_sent()?;
        Ok(answer)
    }

    async fn accept_answer(session: &mut PeerSession, sdp: String) -> Result<()> {
        if !session.negotiation.expects_answer() {
            bail!(
                "unexpected answer for {:?} session in {:?}",
                session.negotiation.role(),
                session.negotiation.state()
            );
        }

        session.transport.apply_answer(sdp).await?;
        let queued = session.negotiation.remote_description_applied()?;
        Self::replay_candidates(session, queued).await;
        Ok(())
    }

    async fn accept_candidate(session: &mut PeerSession, candidate: IceCandidate) -> Result<()> {
        match session.negotiation.remote_candidate(candidate) {
            Some(candidate) => session.transport.add_ice_candidate(candidate).await,
            None => {
                debug!(
                    "Queued candidate from {} ({} pending)",
                    session.peer_id().short(),
                    session.negotiation.pending_candidates()
                );
                Ok(())
            }
        }
    }

    async fn replay_candidates(session: &PeerSession, queued: Vec<IceCandidate>) {
        if queued.is_empty() {
            return;
        }
        debug!(
            "Replaying {} queued candidates from {}",
            queued.len(),
            session.peer_id().short()
        );

        for candidate in queued {
            if let Err(e) = session.transport.add_ice_candidate(candidate).await {
                warn!("Failed to add queued candidate: {:?}", e);
            }
        }
    }
}
