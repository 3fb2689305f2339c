use crate::engine::Engine;
use crate::events::ManagerEvent;
use crate::session::{NegotiationState, SessionKey};
use crate::transport::TransportEvent;
use peerdrop_core::{ApplicationMessage, FileMeta, SignalPayload};
use tracing::{debug, info, warn};
use webrtc::data_channel::data_channel_message::DataChannelMessage;

impl Engine {
    pub(super) async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(key, candidate) => {
                if self.is_current(&key) {
                    self.send_signal(&key.peer_id, SignalPayload::Candidate(candidate));
                }
            }

            TransportEvent::DataChannelReady(key, channel) => {
                let Some(session) = self.current_session_mut(&key) else {
                    debug!("Channel opened for stale session with {}", key.peer_id.short());
                    let _ = channel.close().await;
                    return;
                };

                if let Err(e) = session.negotiation.channel_open() {
                    warn!("Ignoring channel for {}: {}", key.peer_id.short(), e);
                    return;
                }
                if let Some(task) = session.timeout_task.take() {
                    task.abort();
                }
                session.channel = Some(channel);

                info!("Session with {} connected", key.peer_id.short());
                self.refresh_connected();
            }

            TransportEvent::ChannelClosed(key) | TransportEvent::Disconnected(key) => {
                if self.is_current(&key) {
                    self.remove_session(&key.peer_id).await;
                }
            }

            TransportEvent::Message(key, msg) => self.handle_frame(key, msg),

            TransportEvent::NegotiationTimeout(key) => {
                let Some(session) = self.current_session_mut(&key) else {
                    return;
                };
                let state = session.negotiation.state();
                if state == NegotiationState::Connected {
                    return;
                }

                warn!(
                    "Negotiation with {} timed out in {:?}",
                    key.peer_id.short(),
                    state
                );
                self.remove_session(&key.peer_id).await;
            }
        }
    }

    fn handle_frame(&mut self, key: SessionKey, msg: DataChannelMessage) {
        let Some(session) = self.current_session_mut(&key) else {
            return;
        };
        let from = key.peer_id;

        if !msg.is_string {
            let meta = session
                .pending_meta
                .take()
                .unwrap_or_else(|| FileMeta::unnamed(msg.data.len() as u64));
            info!(
                "Received file '{}' ({} bytes) from {}",
                meta.name,
                msg.data.len(),
                from.short()
            );
            self.emit(ManagerEvent::FileReceived {
                from,
                meta,
                data: msg.data,
            });
            return;
        }

        let message = match std::str::from_utf8(&msg.data)
            .map_err(|e| e.to_string())
            .and_then(|text| ApplicationMessage::from_text_frame(text).map_err(|e| e.to_string()))
        {
            Ok(message) => message,
            Err(e) => {
                warn!("Invalid frame from {}: {}", from.short(), e);
                return;
            }
        };

        if let ApplicationMessage::FileMeta(meta) = &message {
            session.pending_meta = Some(meta.clone());
        }
        debug!("Received {} from {}", message.kind(), from.short());
        self.emit(ManagerEvent::MessageReceived { from, message });
    }
}
