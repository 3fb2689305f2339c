use bytes::Bytes;
use peerdrop_core::{ApplicationMessage, FileMeta, PeerId};

/// Everything the manager reports to its owner, on one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerEvent {
    /// A participant joined the room after us; we initiate towards it.
    PeerJoined(PeerId),
    PeerLeft(PeerId),
    /// A structured message, from a data channel or relayed.
    MessageReceived {
        from: PeerId,
        message: ApplicationMessage,
    },
    /// A binary frame, paired with the last `FileMeta` from the same peer.
    FileReceived {
        from: PeerId,
        meta: FileMeta,
        data: Bytes,
    },
    /// Whether at least one data channel is open. Only sent on change.
    ConnectionStateChanged(bool),
}
