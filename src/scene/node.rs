use crate::{
    foundation::core::{Affine, Origin, Point, Rgba8, Vec2},
    foundation::math::rotate_point,
    group::GroupData,
    render::cache::CacheSurface,
    scene::events::Subscription,
    scene::id::NodeId,
    transform::affine::{TransformParts, compose, decompose, dimensions_matrix},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Placement and size of a node relative to its parent plane.
///
/// `left`/`top` locate the [`Origin`] point; `width`/`height` are the
/// untransformed size. Angles are in degrees.
pub struct Geometry {
    /// X of the origin point in the parent plane.
    pub left: f64,
    /// Y of the origin point in the parent plane.
    pub top: f64,
    /// Untransformed width.
    pub width: f64,
    /// Untransformed height.
    pub height: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Rotation around the origin point, in degrees.
    pub angle: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Origin convention for `left`/`top`.
    pub origin: Origin,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            flip_x: false,
            flip_y: false,
            origin: Origin::TOP_LEFT,
        }
    }
}

impl Geometry {
    /// Axis-aligned box with the given position and size, top-left origin.
    pub fn rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    fn parts(&self, translate: Vec2) -> TransformParts {
        TransformParts {
            translate,
            angle_deg: self.angle,
            scale: Vec2::new(self.scale_x, self.scale_y),
            skew_x_deg: self.skew_x,
            skew_y_deg: self.skew_y,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
        }
    }

    /// Size after scale and skew (rotation excluded).
    pub fn transformed_dimensions(&self) -> Vec2 {
        self.dimensions_after(self.width, self.height)
    }

    /// Size a `width` x `height` box would have under this node's scale and skew.
    pub fn dimensions_after(&self, width: f64, height: f64) -> Vec2 {
        if self.skew_x == 0.0 && self.skew_y == 0.0 {
            return Vec2::new(width * self.scale_x.abs(), height * self.scale_y.abs());
        }
        let m = dimensions_matrix(&self.parts(Vec2::ZERO));
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = [
            m * Point::new(-hw, -hh),
            m * Point::new(hw, -hh),
            m * Point::new(hw, hh),
            m * Point::new(-hw, hh),
        ];
        let (mut min, mut max) = (corners[0], corners[0]);
        for c in &corners[1..] {
            min = Point::new(min.x.min(c.x), min.y.min(c.y));
            max = Point::new(max.x.max(c.x), max.y.max(c.y));
        }
        max - min
    }

    /// Center of the node in its parent plane.
    pub fn relative_center(&self) -> Point {
        let dim = self.transformed_dimensions();
        let anchor = Point::new(self.left, self.top);
        let p = anchor + Vec2::new(-self.origin.x * dim.x, -self.origin.y * dim.y);
        rotate_point(p, anchor, self.angle)
    }

    /// Move the node so its center lands on `center`, keeping its origin convention.
    pub fn set_center(&mut self, center: Point) {
        let dim = self.transformed_dimensions();
        let p = center + Vec2::new(self.origin.x * dim.x, self.origin.y * dim.y);
        let anchor = rotate_point(p, center, self.angle);
        self.left = anchor.x;
        self.top = anchor.y;
    }

    /// Matrix from the node's own plane (centered on the node) to its parent plane.
    pub fn own_matrix(&self) -> Affine {
        compose(&self.parts(self.relative_center().to_vec2()))
    }

    /// Replace rotation, scale, skew and position so that `own_matrix() == m`.
    pub fn apply_matrix(&mut self, m: Affine) {
        let parts = decompose(m);
        self.flip_x = false;
        self.flip_y = false;
        self.angle = parts.angle_deg;
        self.skew_x = parts.skew_x_deg;
        self.skew_y = parts.skew_y_deg;
        self.scale_x = parts.scale.x;
        self.scale_y = parts.scale.y;
        self.set_center(parts.translate.to_point());
    }

    /// Corners `[tl, tr, br, bl]` of the untransformed box mapped through `total`.
    pub fn corners(&self, total: Affine) -> [Point; 4] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            total * Point::new(-hw, -hh),
            total * Point::new(hw, -hh),
            total * Point::new(hw, hh),
            total * Point::new(-hw, hh),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Leaf drawable kinds.
pub enum Shape {
    /// Axis-aligned rectangle filling the node box.
    Rect,
    /// Ellipse inscribed in the node box.
    Ellipse,
}

#[derive(Clone, Debug, PartialEq)]
/// Appearance and bookkeeping flags shared by all nodes.
pub struct NodeProps {
    /// Fill color for leaf shapes.
    pub fill: Option<Rgba8>,
    /// Background fill drawn behind a group's children.
    pub background: Option<Rgba8>,
    /// Whether the node draws a shadow.
    pub shadow: bool,
    /// Hidden nodes are skipped by rendering.
    pub visible: bool,
    /// Whether the node may render through an offscreen cache.
    pub object_caching: bool,
    /// Groups only: treat descendant cache dirtiness as own dirtiness.
    pub stateful_cache: bool,
    /// Skip this node when its group is serialized.
    pub exclude_from_export: bool,
    /// Emit fields equal to their defaults when serialized.
    pub include_default_values: bool,
    /// Clip shapes only: geometry is expressed in the canvas plane.
    pub absolute_positioned: bool,
}

impl Default for NodeProps {
    fn default() -> Self {
        Self {
            fill: None,
            background: None,
            shadow: false,
            visible: true,
            object_caching: true,
            stateful_cache: false,
            exclude_from_export: false,
            include_default_values: true,
            absolute_positioned: false,
        }
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Shape(Shape),
    Group(GroupData),
}

/// A drawable node: a leaf shape or a group.
#[derive(Debug)]
pub struct Node {
    pub(crate) geometry: Geometry,
    pub(crate) props: NodeProps,
    pub(crate) kind: NodeKind,
    pub(crate) group: Option<NodeId>,
    pub(crate) canvas: bool,
    pub(crate) clip_path: Option<NodeId>,
    pub(crate) dirty: bool,
    pub(crate) own_caching: bool,
    pub(crate) coords: Option<[Point; 4]>,
    pub(crate) cache: Option<CacheSurface>,
    pub(crate) listeners: Vec<Subscription>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, geometry: Geometry, props: NodeProps) -> Self {
        Self {
            geometry,
            props,
            kind,
            group: None,
            canvas: false,
            clip_path: None,
            dirty: true,
            own_caching: false,
            coords: None,
            cache: None,
            listeners: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn props(&self) -> &NodeProps {
        &self.props
    }

    /// Parent group, if any.
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    /// Whether the node carries a back-reference to the canvas.
    pub fn canvas(&self) -> bool {
        self.canvas
    }

    pub fn clip_path(&self) -> Option<NodeId> {
        self.clip_path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cached absolute corners `[tl, tr, br, bl]`, if computed.
    pub fn coords(&self) -> Option<[Point; 4]> {
        self.coords
    }

    pub fn cache(&self) -> Option<&CacheSurface> {
        self.cache.as_ref()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn shape(&self) -> Option<Shape> {
        match self.kind {
            NodeKind::Shape(s) => Some(s),
            NodeKind::Group(_) => None,
        }
    }

    pub fn group_data(&self) -> Option<&GroupData> {
        match &self.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Shape(_) => None,
        }
    }

    pub(crate) fn group_data_mut(&mut self) -> Option<&mut GroupData> {
        match &mut self.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Shape(_) => None,
        }
    }

    /// Direct children in paint order (empty for leaves).
    pub fn objects(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group(g) => &g.objects,
            NodeKind::Shape(_) => &[],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
