use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// `{userId, signal}`. On the way in `user_id` names the target; on the way
/// out it names the sender. `signal` is opaque to the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignalEnvelope {
    pub user_id: PeerId,
    pub signal: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessage {
    pub room_id: RoomId,
    pub message: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeerMessage {
    pub user_id: PeerId,
    pub message: serde_json::Value,
}

/// Events a client sends to the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(RoomId),
    Signal(SignalEnvelope),
    SendMessage(RoomMessage),
}

/// Events the relay pushes to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// First event on every connection: the id the relay assigned.
    Welcome(PeerId),
    RoomUsers(Vec<PeerId>),
    UserConnected(PeerId),
    UserDisconnected(PeerId),
    Signal(SignalEnvelope),
    ReceiveMessage(PeerMessage),
}
