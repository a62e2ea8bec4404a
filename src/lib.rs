//! Composite group nodes for a 2D canvas object model.
//!
//! A [`Scene`] is an arena of drawable nodes. Groups aggregate children into
//! one logical object while each child keeps its own identity, coordinate
//! plane and event stream.
//!
//! # Overview
//!
//! 1. **Membership**: [`Scene::add`], [`Scene::insert`] and [`Scene::remove`]
//!    move nodes between planes so their absolute appearance is preserved.
//! 2. **Layout**: every membership or geometry change re-derives the group's
//!    box through its [`LayoutMode`], then walks up to the ancestors.
//! 3. **Ancestry**: [`Scene::find_common_ancestors`] and
//!    [`Scene::is_in_front_of`] answer relational and paint-order queries.
//! 4. **Output**: [`Scene::render`] drives a [`Painter`], [`Scene::to_object`]
//!    and [`Scene::to_svg`] export records and markup.
//!
//! Everything is single-threaded and synchronous. `unsafe` is forbidden.
#![forbid(unsafe_code)]

mod ancestry;
mod foundation;
mod group;
mod record;
mod render;
mod scene;

/// Affine helpers and plane changes shared by the layout code.
pub mod transform;

pub use ancestry::{Ancestor, Ancestors, AncestryComparison};
pub use foundation::core::{Affine, Origin, Point, Rect, Rgba8, Rgba8Premul, Vec2};
pub use foundation::error::{SceneError, SceneResult};
pub use group::{
    BoundingBox, GroupData, GroupOptions, ImperativeLayout, InitialLayout, LayoutContext,
    LayoutHook, LayoutMode, LayoutResult, LayoutTrigger, PartialLayoutResult,
};
pub use record::{BaseRecord, GroupRecord, NodeRecord, SceneDocument};
pub use render::{CacheSurface, Painter};
pub use scene::events::{EventKind, Handler, LayoutEvent, NodeEvent};
pub use scene::id::{NodeId, SubscriptionId};
pub use scene::node::{Geometry, Node, NodeProps, Shape};
pub use scene::tree::Scene;
