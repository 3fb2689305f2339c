mod config;
mod engine;
mod error;
mod events;
mod handle;
pub mod session;
pub mod transport;

pub use config::ClientConfig;
pub use error::ClientError;
pub use events::ManagerEvent;
pub use handle::PeerSessionManager;
pub use session::{NegotiationState, Role, SessionInfo};
pub use transport::TransportConfig;
