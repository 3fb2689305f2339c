use crate::error::ProtocolError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileMeta {
    /// Metadata used when a binary frame arrives with no preceding `FileMeta`.
    pub fn unnamed(size: u64) -> Self {
        Self {
            name: "file".to_owned(),
            size,
            mime_type: "application/octet-stream".to_owned(),
        }
    }
}

/// Payload exchanged between peers, directly or through the relay.
///
/// `Text`, `Password` and `FileMeta` travel as JSON text frames. `FileData`
/// only ever travels as a raw binary frame right after its `FileMeta`, so it
/// has no JSON form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ApplicationMessage {
    Text {
        content: String,
    },
    Password {
        content: String,
    },
    FileMeta(FileMeta),
    #[serde(skip)]
    FileData(Bytes),
}

/// One data channel frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl ApplicationMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn password(content: impl Into<String>) -> Self {
        Self::Password {
            content: content.into(),
        }
    }

    /// Whether this message can be carried as a structured frame (and so
    /// relayed through the signaling server).
    pub fn is_control(&self) -> bool {
        !matches!(self, Self::FileData(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Password { .. } => "password",
            Self::FileMeta(_) => "file-meta",
            Self::FileData(_) => "file-data",
        }
    }

    pub fn to_frame(&self) -> Result<Frame, ProtocolError> {
        match self {
            Self::FileData(bytes) => Ok(Frame::Binary(bytes.clone())),
            _ => Ok(Frame::Text(serde_json::to_string(self)?)),
        }
    }

    pub fn from_text_frame(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ProtocolError> {
        if !self.is_control() {
            return Err(ProtocolError::BinaryPayload);
        }
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_value(value)?)
    }
}
