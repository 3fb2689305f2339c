use crate::error::ClientError;
use futures::{SinkExt, StreamExt};
use peerdrop_core::{ClientEvent, PeerId, ServerEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// WebSocket connection to the relay, split into a writer and a reader task.
pub(crate) struct RelayLink {
    pub local_id: PeerId,
    pub inbound: mpsc::UnboundedReceiver<ServerEvent>,
    outbound: mpsc::UnboundedSender<ClientEvent>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RelayLink {
    /// Connect and wait for the `welcome` event carrying our id.
    pub(crate) async fn connect(url: &str) -> Result<Self, ClientError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::RelayConnect {
                url: url.to_owned(),
                source: Box::new(e),
            })?;
        let (mut write, mut read) = ws_stream.split();

        let local_id = loop {
            match read.next().await {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(ServerEvent::Welcome(id)) => break id,
                        Ok(other) => debug!("Ignoring {:?} before welcome", other),
                        Err(e) => warn!("Invalid relay event: {}", e),
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Err(ClientError::RelayClosed),
            }
        };
        info!("Connected to relay {} as {}", url, local_id);

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientEvent>();
        let (inbound_tx, inbound) = mpsc::unbounded_channel();

        let writer = tokio::spawn(async move {
            while let Some(event) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to encode relay event: {}", e);
                        continue;
                    }
                };
                if write.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            let _ = write.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(event) => {
                                if inbound_tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Invalid relay event: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay connection error: {}", e);
                        break;
                    }
                }
            }
            debug!("Relay reader finished");
        });

        Ok(Self {
            local_id,
            inbound,
            outbound,
            reader,
            writer,
        })
    }

    pub(crate) fn send(&self, event: ClientEvent) -> bool {
        self.outbound.send(event).is_ok()
    }

    /// Flush queued events, close the socket and stop reading.
    pub(crate) async fn shutdown(self) {
        let Self {
            outbound,
            reader,
            writer,
            ..
        } = self;

        drop(outbound);
        let _ = writer.await;
        reader.abort();
    }
}
