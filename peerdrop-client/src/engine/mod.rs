use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::ManagerEvent;
use crate::session::{PeerSession, SessionInfo, SessionKey};
use crate::transport::TransportEvent;
use bytes::Bytes;
use peerdrop_core::{ApplicationMessage, ClientEvent, FileMeta, PeerId, RoomId};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

mod create_session_impl;
mod handle_relay_event_impl;
mod handle_signal_impl;
mod handle_transport_event_impl;
mod relay_setup_impl;
mod send_impl;

pub(crate) use relay_setup_impl::RelayLink;

/// Requests from [`crate::PeerSessionManager`] handles.
pub(crate) enum EngineCommand {
    JoinRoom {
        room_id: RoomId,
        reply: oneshot::Sender<()>,
    },
    SendMessage {
        message: ApplicationMessage,
        reply: oneshot::Sender<Result<bool, ClientError>>,
    },
    SendFile {
        meta: FileMeta,
        data: Bytes,
        reply: oneshot::Sender<Result<usize, ClientError>>,
    },
    RoomId {
        reply: oneshot::Sender<Option<RoomId>>,
    },
    Sessions {
        reply: oneshot::Sender<Vec<SessionInfo>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Single owner of every peer session of one client.
///
/// Relay events, handle commands and transport events are all processed by
/// one task, one at a time, so session state needs no locking. A step that
/// completes for a session that was meanwhile closed finds no matching
/// session key and does nothing.
pub(crate) struct Engine {
    local_id: PeerId,
    config: ClientConfig,
    room_id: Option<RoomId>,
    sessions: HashMap<PeerId, PeerSession>,
    relay: RelayLink,
    command_rx: mpsc::Receiver<EngineCommand>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
    transport_tx: mpsc::UnboundedSender<TransportEvent>,
    events: mpsc::UnboundedSender<ManagerEvent>,
    connected: Arc<AtomicBool>,
}

impl Engine {
    pub(crate) fn new(
        config: ClientConfig,
        relay: RelayLink,
        command_rx: mpsc::Receiver<EngineCommand>,
        events: mpsc::UnboundedSender<ManagerEvent>,
        connected: Arc<AtomicBool>,
    ) -> Self {
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();

        Self {
            local_id: relay.local_id.clone(),
            config,
            room_id: None,
            sessions: HashMap::new(),
            relay,
            command_rx,
            transport_rx,
            transport_tx,
            events,
            connected,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("Peer session engine started for {}", self.local_id.short());
        let mut close_reply = None;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(EngineCommand::Close { reply }) => {
                            close_reply = Some(reply);
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All manager handles dropped");
                            break;
                        }
                    }
                }

                evt = self.relay.inbound.recv() => {
                    match evt {
                        Some(e) => self.handle_relay_event(e).await,
                        None => {
                            warn!("Relay connection lost");
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    if let Some(e) = evt {
                        self.handle_transport_event(e).await;
                    }
                }
            }
        }

        self.shutdown().await;
        if let Some(reply) = close_reply {
            let _ = reply.send(());
        }
    }

    async fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::JoinRoom { room_id, reply } => {
                info!("Joining room {}", room_id);
                self.room_id = Some(room_id.clone());
                self.send_relay(ClientEvent::JoinRoom(room_id));
                let _ = reply.send(());
            }
            EngineCommand::SendMessage { message, reply } => {
                let _ = reply.send(self.send_message(message).await);
            }
            EngineCommand::SendFile { meta, data, reply } => {
                let _ = reply.send(self.send_file(meta, data).await);
            }
            EngineCommand::RoomId { reply } => {
                let _ = reply.send(self.room_id.clone());
            }
            EngineCommand::Sessions { reply } => {
                let mut sessions: Vec<_> = self.sessions.values().map(PeerSession::info).collect();
                sessions.sort_by(|a, b| a.peer_id.cmp(&b.peer_id));
                let _ = reply.send(sessions);
            }
            // Handled by the run loop.
            EngineCommand::Close { .. } => {}
        }
    }

    async fn shutdown(mut self) {
        info!(
            "Closing {} sessions for {}",
            self.sessions.len(),
            self.local_id.short()
        );

        for (_, mut session) in self.sessions.drain() {
            session.close().await;
        }
        self.refresh_connected();
        self.relay.shutdown().await;

        info!("Peer session engine finished");
    }

    fn send_relay(&self, event: ClientEvent) -> bool {
        let sent = self.relay.send(event);
        if !sent {
            debug!("Relay writer gone, dropping outbound event");
        }
        sent
    }

    fn emit(&self, event: ManagerEvent) {
        let _ = self.events.send(event);
    }

    fn is_current(&self, key: &SessionKey) -> bool {
        self.sessions
            .get(&key.peer_id)
            .is_some_and(|session| session.key == *key)
    }

    fn current_session_mut(&mut self, key: &SessionKey) -> Option<&mut PeerSession> {
        self.sessions
            .get_mut(&key.peer_id)
            .filter(|session| session.key == *key)
    }

    async fn remove_session(&mut self, peer_id: &PeerId) -> bool {
        let Some(mut session) = self.sessions.remove(peer_id) else {
            return false;
        };

        session.close().await;
        info!("Session with {} closed", peer_id.short());
        self.refresh_connected();
        true
    }

    /// Publish the aggregate channel state if it changed.
    fn refresh_connected(&self) {
        let any_open = self.sessions.values().any(PeerSession::is_open);
        if self.connected.swap(any_open, Ordering::SeqCst) != any_open {
            self.emit(ManagerEvent::ConnectionStateChanged(any_open));
        }
    }
}
