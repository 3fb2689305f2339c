mod events;
mod message;
mod peer;
mod room;
mod signaling;

pub use events::{ClientEvent, PeerMessage, RoomMessage, ServerEvent, SignalEnvelope};
pub use message::{ApplicationMessage, FileMeta, Frame};
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{IceCandidate, IceServerConfig, SignalPayload};
