use crate::engine::Engine;
use crate::events::ManagerEvent;
use crate::session::Role;
use peerdrop_core::{ApplicationMessage, PeerMessage, ServerEvent};
use tracing::{debug, info, warn};

impl Engine {
    pub(super) async fn handle_relay_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Welcome(id) => {
                debug!("Repeated welcome ({}), ignoring", id.short());
            }

            ServerEvent::RoomUsers(users) => {
                info!("Room has {} other participants", users.len());

                for peer_id in users {
                    if peer_id == self.local_id {
                        continue;
                    }
                    // An offer may already have created the responder session.
                    let responding = self
                        .sessions
                        .get(&peer_id)
                        .is_some_and(|s| s.negotiation.role() == Role::Responder);
                    if responding {
                        continue;
                    }
                    self.create_session(peer_id, Role::Responder).await;
                }
            }

            ServerEvent::UserConnected(peer_id) => {
                info!("User {} joined the room", peer_id.short());
                self.create_session(peer_id.clone(), Role::Initiator).await;
                self.emit(ManagerEvent::PeerJoined(peer_id));
            }

            ServerEvent::UserDisconnected(peer_id) => {
                info!("User {} left the room", peer_id.short());
                self.remove_session(&peer_id).await;
                self.emit(ManagerEvent::PeerLeft(peer_id));
            }

            ServerEvent::Signal(envelope) => {
                self.handle_signal(envelope.user_id, envelope.signal).await;
            }

            ServerEvent::ReceiveMessage(PeerMessage { user_id, message }) => {
                match ApplicationMessage::from_value(message) {
                    Ok(message) => {
                        debug!("Relayed {} from {}", message.kind(), user_id.short());
                        self.emit(ManagerEvent::MessageReceived {
                            from: user_id,
                            message,
                        });
                    }
                    Err(e) => warn!("Invalid relayed message from {}: {}", user_id.short(), e),
                }
            }
        }
    }
}
