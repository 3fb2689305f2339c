use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// A network-path candidate as exchanged during negotiation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// Body of a negotiation envelope. The relay never decodes it; only peers do.
///
/// Descriptions carry `type: "offer" | "answer"`. Candidates go on the wire as
/// the bare candidate object, the way browsers emit them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "WireSignal", into = "WireSignal")]
pub enum SignalPayload {
    Offer { sdp: String },
    Answer { sdp: String },
    Candidate(IceCandidate),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireDescription {
    Offer { sdp: String },
    Answer { sdp: String },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireSignal {
    Description(WireDescription),
    Candidate(IceCandidate),
}

impl From<WireSignal> for SignalPayload {
    fn from(wire: WireSignal) -> Self {
        match wire {
            WireSignal::Description(WireDescription::Offer { sdp }) => SignalPayload::Offer { sdp },
            WireSignal::Description(WireDescription::Answer { sdp }) => SignalPayload::Answer { sdp },
            WireSignal::Candidate(candidate) => SignalPayload::Candidate(candidate),
        }
    }
}

impl From<SignalPayload> for WireSignal {
    fn from(payload: SignalPayload) -> Self {
        match payload {
            SignalPayload::Offer { sdp } => WireSignal::Description(WireDescription::Offer { sdp }),
            SignalPayload::Answer { sdp } => WireSignal::Description(WireDescription::Answer { sdp }),
            SignalPayload::Candidate(candidate) => WireSignal::Candidate(candidate),
        }
    }
}

impl SignalPayload {
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ProtocolError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignalPayload::Offer { .. } => "offer",
            SignalPayload::Answer { .. } => "answer",
            SignalPayload::Candidate(_) => "candidate",
        }
    }
}
