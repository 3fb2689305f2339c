use peerdrop_core::{PeerId, RoomId, SignalEnvelope};

/// Inbound transport events, decoded by the WebSocket handler and applied to
/// the room registry.
#[derive(Debug)]
pub enum RoomCommand {
    /// `join-room`: register the participant in the room.
    Join { peer_id: PeerId, room_id: RoomId },

    /// `signal`: forward an opaque negotiation body to `envelope.user_id`.
    Signal {
        from: PeerId,
        envelope: SignalEnvelope,
    },

    /// `send-message`: relay fallback broadcast to the rest of the room.
    Message {
        from: PeerId,
        room_id: RoomId,
        message: serde_json::Value,
    },

    /// The participant's transport went away.
    Disconnect { peer_id: PeerId },
}
