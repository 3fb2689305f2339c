use peerdrop_core::IceServerConfig;
use peerdrop_core::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use webrtc::api::setting_engine::SctpMaxMessageSize;
use webrtc::ice_transport::ice_server::RTCIceServer;

/// Largest single data channel message a peer is guaranteed to accept. webrtc
/// peers do not advertise `max-message-size`, so each side assumes the 64 KiB
/// default for the other.
pub const MAX_MESSAGE_SIZE: usize = SctpMaxMessageSize::DEFAULT_MESSAGE_SIZE as usize;

/// ICE setup shared by every peer connection the client opens.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl TransportConfig {
    /// No STUN at all; host candidates only. Enough on one machine or LAN.
    pub fn host_only() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }

    pub(crate) fn rtc_ice_servers(&self) -> Vec<RTCIceServer> {
        self.ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
                ..Default::default()
            })
            .collect()
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![
                IceServerConfig::stun(DEFAULT_STUN_ADDR),
                IceServerConfig::stun(DEFAULT_STUN_ADDR_2),
            ],
        }
    }
}
