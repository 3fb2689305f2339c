use crate::session::SessionKey;
use peerdrop_core::IceCandidate;
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;

/// Events raised by a session's transport for the engine loop.
///
/// Each carries the key of the session that produced it; events from a
/// session that has since been closed or replaced are ignored.
pub enum TransportEvent {
    /// Local candidate found; goes to the remote through the relay.
    CandidateGenerated(SessionKey, IceCandidate),

    /// The data channel opened and can carry frames.
    DataChannelReady(SessionKey, Arc<RTCDataChannel>),

    ChannelClosed(SessionKey),

    /// Connectivity failed, dropped or the connection was closed.
    Disconnected(SessionKey),

    Message(SessionKey, DataChannelMessage),

    /// The session did not reach `Connected` within the configured time.
    NegotiationTimeout(SessionKey),
}
