//! Structural records (serde) and SVG export.

pub(crate) mod object;
pub(crate) mod svg;

pub use object::{BaseRecord, GroupRecord, NodeRecord, SceneDocument};
