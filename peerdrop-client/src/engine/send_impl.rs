use crate::engine::Engine;
use crate::error::ClientError;
use crate::transport::MAX_MESSAGE_SIZE;
use bytes::Bytes;
use peerdrop_core::{ApplicationMessage, ClientEvent, FileMeta, Frame, ProtocolError, RoomMessage};
use tracing::{debug, info, warn};

impl Engine {
    /// Write `message` on every open channel. With none open, hand it to the
    /// relay for live broadcast and report `false`.
    pub(super) async fn send_message(
        &mut self,
        message: ApplicationMessage,
    ) -> Result<bool, ClientError> {
        let Frame::Text(text) = message.to_frame()? else {
            return Err(ProtocolError::BinaryPayload.into());
        };

        let mut sent = 0;
        for session in self.sessions.values() {
            let Some(channel) = session.open_channel() else {
                continue;
            };
            match channel.send_text(text.clone()).await {
                Ok(_) => sent += 1,
                Err(e) => warn!("Failed to send to {}: {}", session.peer_id().short(), e),
            }
        }

        if sent > 0 {
            debug!("Sent {} on {} channels", message.kind(), sent);
            return Ok(true);
        }

        let Some(room_id) = self.room_id.clone() else {
            return Err(ClientError::NotInRoom);
        };
        debug!(
            "No open channel, relaying {} through room {}",
            message.kind(),
            room_id
        );
        let message = message.to_value()?;
        self.send_relay(ClientEvent::SendMessage(RoomMessage { room_id, message }));
        Ok(false)
    }

    /// Send `FileMeta` then the raw bytes on every open channel. Returns the
    /// number of channels that took both frames.
    ///
    /// Oversized files are refused before anything is written, so no peer sees
    /// a header without its data.
    pub(super) async fn send_file(
        &mut self,
        meta: FileMeta,
        data: Bytes,
    ) -> Result<usize, ClientError> {
        if data.len() > MAX_MESSAGE_SIZE {
            return Err(ClientError::FileTooLarge {
                size: data.len(),
                limit: MAX_MESSAGE_SIZE,
            });
        }

        let name = meta.name.clone();
        let header = ApplicationMessage::FileMeta(meta).to_value()?.to_string();

        let mut delivered = 0;
        for session in self.sessions.values() {
            let Some(channel) = session.open_channel() else {
                continue;
            };
            if let Err(e) = channel.send_text(header.clone()).await {
                warn!("Failed to send file header to {}: {}", session.peer_id().short(), e);
                continue;
            }
            match channel.send(&data).await {
                Ok(_) => delivered += 1,
                Err(e) => warn!("Failed to send file to {}: {}", session.peer_id().short(), e),
            }
        }

        if delivered == 0 {
            return Err(ClientError::NoOpenChannel);
        }

        info!(
            "Sent file '{}' ({} bytes) to {} peers",
            name,
            data.len(),
            delivered
        );
        Ok(delivered)
    }
}
