use crate::config::ClientConfig;
use crate::engine::{Engine, EngineCommand, RelayLink};
use crate::error::ClientError;
use crate::events::ManagerEvent;
use crate::session::SessionInfo;
use bytes::Bytes;
use peerdrop_core::{ApplicationMessage, FileMeta, PeerId, RoomId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot};

/// Handle to a running peer session manager.
///
/// Cheap to clone. All clones talk to the same engine task; once it stops
/// (after [`close`](Self::close), relay loss, or every handle being dropped)
/// calls fail with [`ClientError::Closed`] and the event stream ends.
#[derive(Clone)]
pub struct PeerSessionManager {
    local_id: PeerId,
    command_tx: mpsc::Sender<EngineCommand>,
    connected: Arc<AtomicBool>,
}

impl PeerSessionManager {
    /// Connect to the relay and start the engine. The receiver is the only
    /// subscriber to the manager's events.
    pub async fn connect(
        config: ClientConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ManagerEvent>), ClientError> {
        let relay = RelayLink::connect(&config.relay_url).await?;
        let local_id = relay.local_id.clone();

        let (command_tx, command_rx) = mpsc::channel(64);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));

        let engine = Engine::new(config, relay, command_rx, events_tx, connected.clone());
        tokio::spawn(engine.run());

        Ok((
            Self {
                local_id,
                command_tx,
                connected,
            },
            events_rx,
        ))
    }

    /// Id the relay assigned to this client.
    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    /// Whether at least one data channel is open right now.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Join a freshly generated room and return its id.
    pub async fn create_room(&self) -> Result<RoomId, ClientError> {
        let room_id = RoomId::generate();
        self.join_room(room_id.clone()).await?;
        Ok(room_id)
    }

    pub async fn join_room(&self, room_id: RoomId) -> Result<(), ClientError> {
        self.request(|reply| EngineCommand::JoinRoom { room_id, reply })
            .await
    }

    pub async fn room_id(&self) -> Result<Option<RoomId>, ClientError> {
        self.request(|reply| EngineCommand::RoomId { reply }).await
    }

    /// Send on every open channel, falling back to the relay when none is
    /// open. `Ok(true)` means at least one channel took it.
    pub async fn send_message(&self, message: ApplicationMessage) -> Result<bool, ClientError> {
        self.request(|reply| EngineCommand::SendMessage { message, reply })
            .await?
    }

    /// Send a file on every open channel. Fails with
    /// [`ClientError::NoOpenChannel`] when there is none; files never go
    /// through the relay.
    pub async fn send_file(&self, meta: FileMeta, data: Bytes) -> Result<usize, ClientError> {
        self.request(|reply| EngineCommand::SendFile { meta, data, reply })
            .await?
    }

    pub async fn sessions(&self) -> Result<Vec<SessionInfo>, ClientError> {
        self.request(|reply| EngineCommand::Sessions { reply }).await
    }

    /// Tear down every session and disconnect from the relay.
    pub async fn close(&self) -> Result<(), ClientError> {
        match self.request(|reply| EngineCommand::Close { reply }).await {
            Ok(()) | Err(ClientError::Closed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> EngineCommand,
    ) -> Result<T, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| ClientError::Closed)?;
        rx.await.map_err(|_| ClientError::Closed)
    }
}
