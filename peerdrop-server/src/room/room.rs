use peerdrop_core::PeerId;
use std::collections::HashSet;

/// Membership of one room. An empty `Room` is never kept in the registry.
#[derive(Debug, Default)]
pub struct Room {
    members: HashSet<PeerId>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the participant was already a member.
    pub fn insert(&mut self, peer_id: PeerId) -> bool {
        self.members.insert(peer_id)
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> bool {
        self.members.remove(peer_id)
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.members.contains(peer_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn members_except(&self, peer_id: &PeerId) -> Vec<PeerId> {
        self.members
            .iter()
            .filter(|id| *id != peer_id)
            .cloned()
            .collect()
    }

    pub fn members(&self) -> Vec<PeerId> {
        self.members.iter().cloned().collect()
    }
}
