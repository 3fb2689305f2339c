mod connection_wrapper;
mod transport_config;
mod transport_event;

pub use connection_wrapper::ConnectionWrapper;
pub use transport_config::{MAX_MESSAGE_SIZE, TransportConfig};
pub use transport_event::TransportEvent;
