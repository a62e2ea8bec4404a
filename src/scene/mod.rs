pub(crate) mod events;
pub(crate) mod id;
pub(crate) mod node;
pub(crate) mod tree;
