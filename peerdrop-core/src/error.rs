use thiserror::Error;

/// Failures while decoding frames and payloads coming off the wire.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed json payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid participant id '{0}'")]
    InvalidPeerId(String),

    #[error("file data cannot be encoded as a control frame")]
    BinaryPayload,
}
