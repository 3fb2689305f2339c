mod negotiation;
mod peer_session;

pub use negotiation::{Negotiation, NegotiationState, Role, TransitionError};
pub use peer_session::{PeerSession, SessionInfo, SessionKey};
