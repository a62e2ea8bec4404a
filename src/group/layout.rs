//! Layout triggers, results and the layout pipeline.
//!
//! A layout runs on one group, then walks up the parent chain so every
//! ancestor re-derives its box from the updated child. The walk is an explicit
//! loop whose `path` doubles as the cycle guard.

use crate::{
    foundation::core::{Point, Vec2},
    foundation::error::SceneResult,
    foundation::math::points_eq,
    scene::events::{EventKind, LayoutEvent, NodeEvent},
    scene::id::NodeId,
    scene::node::Geometry,
    scene::tree::Scene,
    transform::affine::transform_vector,
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
/// Strategy a group uses to derive its box from its children.
pub enum LayoutMode {
    /// Tight box of all children, recomputed on every trigger.
    #[default]
    FitContent,
    /// Like `FitContent`, but additions grow the current box incrementally.
    ///
    /// Assumes the current box still bounds the children, which only holds
    /// while children are mutated through the membership operations.
    FitContentLazy,
    /// Measured on initialization and imperative triggers only.
    Fixed,
    /// Box follows the attached clip path.
    ClipPath,
    /// Import framing: measured once, with the top-left corner as reference.
    Svg,
}

impl LayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FitContent => "fit-content",
            Self::FitContentLazy => "fit-content-lazy",
            Self::Fixed => "fixed",
            Self::ClipPath => "clip-path",
            Self::Svg => "svg",
        }
    }
}

/// Explicit construction values reconciled by the initial layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InitialLayout {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub angle: Option<f64>,
    pub skew_x: Option<f64>,
    pub skew_y: Option<f64>,
}

impl InitialLayout {
    pub(crate) fn all_explicit(&self) -> bool {
        self.left.is_some() && self.top.is_some() && self.width.is_some() && self.height.is_some()
    }

    fn has_transform(&self) -> bool {
        self.angle.is_some() || self.skew_x.is_some() || self.skew_y.is_some()
    }
}

/// Caller-supplied fields merged over a measured [`LayoutResult`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartialLayoutResult {
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub correction_x: Option<f64>,
    pub correction_y: Option<f64>,
}

impl PartialLayoutResult {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn merge_over(&self, base: LayoutResult) -> LayoutResult {
        LayoutResult {
            center_x: self.center_x.unwrap_or(base.center_x),
            center_y: self.center_y.unwrap_or(base.center_y),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            correction_x: self.correction_x.unwrap_or(base.correction_x),
            correction_y: self.correction_y.unwrap_or(base.correction_y),
        }
    }
}

/// Request for [`Scene::trigger_layout`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImperativeLayout {
    /// Switch to this mode before measuring.
    pub layout: Option<LayoutMode>,
    /// Fields forced on the addressed group.
    pub overrides: PartialLayoutResult,
}

/// What invalidated a group's layout.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutTrigger {
    /// First layout, run once by [`Scene::create_group`].
    Initialization {
        options: InitialLayout,
        /// Children are already expressed in the group's plane.
        objects_relative_to_group: bool,
    },
    /// A monitored child fired a geometry event.
    ObjectModified { target: NodeId, event: EventKind },
    Added { targets: Vec<NodeId> },
    Removed { targets: Vec<NodeId> },
    LayoutChange {
        layout: LayoutMode,
        prev_layout: LayoutMode,
    },
    Imperative {
        layout: LayoutMode,
        prev_layout: Option<LayoutMode>,
        overrides: PartialLayoutResult,
    },
}

impl LayoutTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialization { .. } => "initialization",
            Self::ObjectModified { .. } => "object_modified",
            Self::Added { .. } => "added",
            Self::Removed { .. } => "removed",
            Self::LayoutChange { .. } => "layout_change",
            Self::Imperative { .. } => "imperative",
        }
    }
}

/// Trigger plus the groups the layout already passed through, innermost first.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutContext {
    pub trigger: LayoutTrigger,
    pub path: Vec<NodeId>,
}

impl LayoutContext {
    pub fn new(trigger: LayoutTrigger) -> Self {
        Self {
            trigger,
            path: Vec::new(),
        }
    }

    pub fn is_initialization(&self) -> bool {
        matches!(self.trigger, LayoutTrigger::Initialization { .. })
    }

    /// Whether this context is being applied to the group it was addressed to.
    pub fn is_origin(&self) -> bool {
        self.path.is_empty()
    }

    fn objects_relative_to_group(&self) -> bool {
        matches!(
            self.trigger,
            LayoutTrigger::Initialization {
                objects_relative_to_group: true,
                ..
            }
        )
    }

    fn initial_options(&self) -> Option<&InitialLayout> {
        match &self.trigger {
            LayoutTrigger::Initialization { options, .. } => Some(options),
            _ => None,
        }
    }
}

/// Box a strategy produced, in the group's parent plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutResult {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// Extra translation applied to children on top of the center shift.
    pub correction_x: f64,
    pub correction_y: f64,
}

impl LayoutResult {
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    pub fn correction(&self) -> Vec2 {
        Vec2::new(self.correction_x, self.correction_y)
    }
}

/// Measured box of a child list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner, in the group's parent plane.
    pub offset: Point,
    /// Center, in the group's parent plane.
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub(crate) fn into_result(self) -> LayoutResult {
        LayoutResult {
            center_x: self.center.x,
            center_y: self.center.y,
            width: self.width,
            height: self.height,
            correction_x: 0.0,
            correction_y: 0.0,
        }
    }
}

impl Scene {
    /// Run a layout on `group` and propagate it to its ancestors.
    #[tracing::instrument(
        level = "debug",
        skip(self, context),
        fields(trigger = context.trigger.name())
    )]
    pub(crate) fn apply_layout(&mut self, group: NodeId, mut context: LayoutContext) {
        let mut current = group;
        loop {
            if !self.layout_step(current, &context) {
                break;
            }
            let Some(parent) = self.group_of(current) else {
                break;
            };
            if parent == group || context.path.contains(&parent) {
                tracing::warn!(
                    group = %current,
                    parent = %parent,
                    "layout propagation hit a cycle"
                );
                break;
            }
            context.path.push(current);
            current = parent;
        }
    }

    /// One layout of one group. Returns whether it completed.
    fn layout_step(&mut self, group: NodeId, context: &LayoutContext) -> bool {
        let Ok(data) = self.group_data(group) else {
            return false;
        };
        let first_layout = context.is_initialization();
        if !first_layout && !data.first_layout_done {
            return false;
        }
        let initial_transform = context
            .initial_options()
            .filter(|o| o.has_transform())
            .copied();

        let center = self.relative_center(group).unwrap_or(Point::ZERO);
        let result = self.layout_strategy_result(group, context);
        let mut diff = Vec2::ZERO;

        let result = match result {
            Some(result) => {
                let new_center = result.center();
                let own = self.own_matrix(group);
                let vector = (center - new_center) + result.correction();
                diff = transform_vector(own.inverse(), vector);
                self.commit_layout(group, context, &result, diff);

                let Some(node) = self.node_mut(group) else {
                    return false;
                };
                if !points_eq(node.geometry.relative_center(), new_center)
                    || initial_transform.is_some()
                {
                    node.geometry.set_center(new_center);
                    if let Some(t) = initial_transform {
                        apply_initial_transform(&mut node.geometry, &t);
                    }
                    self.set_coords(group);
                }
                result
            }
            None if first_layout => {
                let Some(node) = self.node_mut(group) else {
                    return false;
                };
                let geometry = &mut node.geometry;
                let result = LayoutResult {
                    center_x: center.x,
                    center_y: center.y,
                    width: geometry.width,
                    height: geometry.height,
                    correction_x: 0.0,
                    correction_y: 0.0,
                };
                if let Some(t) = initial_transform {
                    apply_initial_transform(geometry, &t);
                    self.set_coords(group);
                }
                result
            }
            None => return false,
        };

        self.finish_layout(group, context, result, diff);
        true
    }

    /// Resize the group and move children (and a relative clip path) by `diff`.
    fn commit_layout(
        &mut self,
        group: NodeId,
        context: &LayoutContext,
        result: &LayoutResult,
        diff: Vec2,
    ) {
        let shift_children = !context.objects_relative_to_group();
        let Some(node) = self.node_mut(group) else {
            return;
        };
        node.geometry.width = result.width;
        node.geometry.height = result.height;
        let clip_path = node.clip_path;
        let clip_driven = node
            .group_data()
            .is_some_and(|g| g.layout == LayoutMode::ClipPath);
        let children = node.objects().to_vec();

        if shift_children {
            for child in children {
                if let Some(c) = self.node_mut(child) {
                    c.geometry.left += diff.x;
                    c.geometry.top += diff.y;
                }
                self.set_coords(child);
            }
        }

        let Some(clip) = clip_path.and_then(|c| self.node_mut(c)) else {
            return;
        };
        // A clip driving the layout only moves with the children on the first pass.
        if clip.props.absolute_positioned
            || !shift_children
            || (clip_driven && !context.is_initialization())
        {
            return;
        }
        clip.geometry.left += diff.x;
        clip.geometry.top += diff.y;
    }

    fn finish_layout(
        &mut self,
        group: NodeId,
        context: &LayoutContext,
        result: LayoutResult,
        diff: Vec2,
    ) {
        let hook = match self.group_data_mut(group) {
            Ok(data) => {
                data.first_layout_done = true;
                data.on_layout.take()
            }
            Err(_) => return,
        };
        if let Some(mut hook) = hook {
            hook(group, context, &result);
            if let Ok(data) = self.group_data_mut(group)
                && data.on_layout.is_none()
            {
                data.on_layout = Some(hook);
            }
        }
        self.set_dirty(group, true);

        tracing::debug!(
            group = %group,
            trigger = context.trigger.name(),
            width = result.width,
            height = result.height,
            "layout complete"
        );
        self.fire(
            group,
            &NodeEvent::Layout(Box::new(LayoutEvent {
                group,
                context: context.clone(),
                result,
                diff,
            })),
        );
    }

    /// Run an imperative layout, optionally switching the mode first.
    pub fn trigger_layout(&mut self, group: NodeId, request: ImperativeLayout) -> SceneResult<()> {
        let data = self.group_data_mut(group)?;
        let prev_layout = match request.layout {
            Some(layout) if layout != data.layout => {
                let prev = data.layout;
                data.layout = layout;
                Some(prev)
            }
            _ => None,
        };
        let layout = data.layout;
        self.apply_layout(
            group,
            LayoutContext::new(LayoutTrigger::Imperative {
                layout,
                prev_layout,
                overrides: request.overrides,
            }),
        );
        Ok(())
    }
}

/// Apply the construction angle and skew while keeping `left`/`top`.
fn apply_initial_transform(geometry: &mut Geometry, t: &InitialLayout) {
    geometry.angle = t.angle.unwrap_or(0.0);
    geometry.skew_x = t.skew_x.unwrap_or(0.0);
    geometry.skew_y = t.skew_y.unwrap_or(0.0);
}

#[cfg(test)]
#[path = "../../tests/unit/group/layout.rs"]
mod tests;
