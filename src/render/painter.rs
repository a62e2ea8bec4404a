use crate::{
    foundation::core::{Affine, Rect, Rgba8Premul, Vec2},
    scene::id::NodeId,
    scene::node::Shape,
};

/// Drawing surface driven by [`crate::Scene::render`].
///
/// Calls arrive in paint order. Every node is bracketed by `save`/`restore`
/// with its own matrix applied through `transform`, so geometry passed to the
/// drawing calls is centered on the node.
pub trait Painter {
    fn save(&mut self);

    fn restore(&mut self);

    /// Post-multiply the current transform by `m`.
    fn transform(&mut self, m: Affine);

    /// Fill an axis-aligned rectangle (group backgrounds).
    fn fill_rect(&mut self, rect: Rect, color: Rgba8Premul);

    /// Draw a leaf shape of `size` centered on the origin.
    fn draw_shape(&mut self, node: NodeId, shape: Shape, size: Vec2, fill: Option<Rgba8Premul>);

    /// Clip what was drawn for the current node by `clip`, placed with `transform`.
    fn apply_clip(&mut self, clip: NodeId, transform: Affine, shape: Shape, size: Vec2);

    /// Start recording `node` into its offscreen cache.
    fn begin_cache(&mut self, _node: NodeId, _size: Vec2) {}

    fn end_cache(&mut self, _node: NodeId) {}

    /// Blit the cached rendering of `node`.
    fn draw_cache(&mut self, _node: NodeId, _size: Vec2) {}
}
