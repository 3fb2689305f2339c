use crate::transport::TransportConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint of the relay, e.g. `ws://127.0.0.1:3001/ws`.
    pub relay_url: String,
    pub transport: TransportConfig,
    /// How long a session may stay unconnected before it is closed.
    /// `None` waits forever.
    pub negotiation_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            relay_url: relay_url.into(),
            transport: TransportConfig::default(),
            negotiation_timeout: None,
        }
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_negotiation_timeout(mut self, timeout: Duration) -> Self {
        self.negotiation_timeout = Some(timeout);
        self
    }
}
