use std::fmt;

/// Generational handle to a node stored in a [`crate::Scene`].
///
/// Handles are `Copy` and non-owning: a node's parent link and the entries of
/// a group's child list are plain handles, ownership stays with the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    idx: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Slot index inside the arena.
    pub fn index(self) -> u32 {
        self.idx
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.idx, self.generation)
    }
}

/// Handle returned by [`crate::Scene::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);
