use peerdrop_core::{PeerId, ServerEvent};

/// Outbound side of the relay transport, so the room registry can push
/// events to participants without knowing about sockets.
///
/// Delivery only enqueues and never waits, so the registry can call it while
/// it holds a room's lock.
pub trait SignalingOutput: Send + Sync {
    /// Fire-and-forget delivery. Returns `false` when the participant is not
    /// registered; callers treat that as a silent routing miss.
    fn send_event(&self, peer_id: &PeerId, event: ServerEvent) -> bool;
}
