use peerdrop_core::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to relay at {url}")]
    RelayConnect {
        url: String,
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    #[error("relay closed the connection before assigning an id")]
    RelayClosed,

    #[error("peer session manager is closed")]
    Closed,

    #[error("not in a room")]
    NotInRoom,

    #[error("no open data channel")]
    NoOpenChannel,

    #[error("file of {size} bytes exceeds the {limit} byte data channel message limit")]
    FileTooLarge { size: usize, limit: usize },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
