//! Composite nodes.
//!
//! A group owns an ordered child list (paint order, front-most last), keeps
//! each child's coordinate plane consistent as it enters or leaves, and
//! re-derives its own box through a [`LayoutMode`] whenever membership or
//! child geometry changes.

pub(crate) mod layout;
pub(crate) mod membership;
pub(crate) mod strategy;

pub use layout::{
    BoundingBox, ImperativeLayout, InitialLayout, LayoutContext, LayoutMode, LayoutResult,
    LayoutTrigger, PartialLayoutResult,
};

use crate::{
    foundation::core::Origin,
    foundation::error::{SceneError, SceneResult},
    scene::id::NodeId,
    scene::node::NodeProps,
    scene::tree::Scene,
};

/// Callback run after each completed layout of a group.
pub type LayoutHook = Box<dyn FnMut(NodeId, &LayoutContext, &LayoutResult)>;

/// Group-specific state carried by a group node.
pub struct GroupData {
    pub(crate) objects: Vec<NodeId>,
    pub(crate) layout: LayoutMode,
    pub(crate) sub_target_check: bool,
    pub(crate) interactive: bool,
    pub(crate) active_objects: Vec<NodeId>,
    pub(crate) first_layout_done: bool,
    pub(crate) on_layout: Option<LayoutHook>,
}

impl std::fmt::Debug for GroupData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupData")
            .field("objects", &self.objects)
            .field("layout", &self.layout)
            .field("sub_target_check", &self.sub_target_check)
            .field("interactive", &self.interactive)
            .field("active_objects", &self.active_objects)
            .field("first_layout_done", &self.first_layout_done)
            .field("on_layout", &self.on_layout.is_some())
            .finish()
    }
}

impl GroupData {
    pub(crate) fn new(layout: LayoutMode, sub_target_check: bool, interactive: bool) -> Self {
        Self {
            objects: Vec::new(),
            layout,
            sub_target_check,
            interactive,
            active_objects: Vec::new(),
            first_layout_done: false,
            on_layout: None,
        }
    }

    /// Children in paint order.
    pub fn objects(&self) -> &[NodeId] {
        &self.objects
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.objects.get(index).copied()
    }

    pub fn size(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Whether children are individually hit-testable.
    pub fn sub_target_check(&self) -> bool {
        self.sub_target_check
    }

    /// Whether the group monitors its children's selection and geometry events.
    pub fn interactive(&self) -> bool {
        self.interactive
    }

    /// Children currently selected.
    pub fn active_objects(&self) -> &[NodeId] {
        &self.active_objects
    }

    pub fn first_layout_done(&self) -> bool {
        self.first_layout_done
    }
}

/// Construction options for [`Scene::create_group`].
///
/// `left`, `top`, `width` and `height` left as `None` are derived from the
/// children. `angle`, `skew_x` and `skew_y` are applied after the initial
/// layout so the box is measured unrotated.
#[derive(Clone, Debug, Default)]
pub struct GroupOptions {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub angle: Option<f64>,
    pub skew_x: Option<f64>,
    pub skew_y: Option<f64>,
    /// Defaults to 1.
    pub scale_x: Option<f64>,
    /// Defaults to 1.
    pub scale_y: Option<f64>,
    pub flip_x: bool,
    pub flip_y: bool,
    pub origin: Origin,
    pub layout: LayoutMode,
    pub sub_target_check: bool,
    pub interactive: bool,
    pub props: NodeProps,
    /// Detached node used as clip path.
    pub clip_path: Option<NodeId>,
}

impl GroupOptions {
    pub(crate) fn initial_layout(&self) -> InitialLayout {
        InitialLayout {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
            angle: self.angle,
            skew_x: self.skew_x,
            skew_y: self.skew_y,
        }
    }
}

impl Scene {
    /// Group state of `id`, or an error for stale ids and leaves.
    pub fn group_data(&self, id: NodeId) -> SceneResult<&GroupData> {
        self.get(id)?
            .group_data()
            .ok_or(SceneError::NotAGroup(id))
    }

    pub(crate) fn group_data_mut(&mut self, id: NodeId) -> SceneResult<&mut GroupData> {
        self.node_mut(id)
            .ok_or(SceneError::UnknownNode(id))?
            .group_data_mut()
            .ok_or(SceneError::NotAGroup(id))
    }

    /// Whether `object` is a child of `group`, or any descendant when `deep`.
    pub fn contains(&self, group: NodeId, object: NodeId, deep: bool) -> bool {
        let children = self.children(group);
        if children.contains(&object) {
            return true;
        }
        deep && children
            .iter()
            .any(|&child| self.is_group(child) && self.contains(child, object, true))
    }

    /// Number of leaf drawables under `id` (1 for a leaf).
    pub fn complexity(&self, id: NodeId) -> usize {
        match self.node(id) {
            Some(n) if n.is_group() => n.objects().iter().map(|&c| self.complexity(c)).sum(),
            Some(_) => 1,
            None => 0,
        }
    }

    fn restack(
        &mut self,
        group: NodeId,
        object: NodeId,
        to: impl FnOnce(usize, usize) -> usize,
    ) -> bool {
        let Ok(data) = self.group_data_mut(group) else {
            return false;
        };
        let Some(from) = data.objects.iter().position(|&o| o == object) else {
            return false;
        };
        let last = data.objects.len() - 1;
        let target = to(from, last).min(last);
        if target == from {
            return false;
        }
        data.objects.remove(from);
        data.objects.insert(target, object);
        self.set_dirty(group, true);
        true
    }

    /// Move a child to `index` in paint order. Returns whether the order changed.
    pub fn move_object_to(&mut self, group: NodeId, object: NodeId, index: usize) -> bool {
        self.restack(group, object, |_, _| index)
    }

    pub fn bring_object_to_front(&mut self, group: NodeId, object: NodeId) -> bool {
        self.restack(group, object, |_, last| last)
    }

    pub fn send_object_to_back(&mut self, group: NodeId, object: NodeId) -> bool {
        self.restack(group, object, |_, _| 0)
    }

    /// Swap a child with the one painted right after it.
    pub fn bring_object_forward(&mut self, group: NodeId, object: NodeId) -> bool {
        self.restack(group, object, |from, _| from + 1)
    }

    /// Swap a child with the one painted right before it.
    pub fn send_object_backwards(&mut self, group: NodeId, object: NodeId) -> bool {
        self.restack(group, object, |from, _| from.saturating_sub(1))
    }

    /// Toggle child monitoring. Monitors are detached then re-attached, never stacked.
    pub fn set_interactive(&mut self, group: NodeId, interactive: bool) -> SceneResult<()> {
        let data = self.group_data_mut(group)?;
        data.interactive = interactive;
        let children = data.objects.clone();
        for child in children {
            self.watch_object(group, child, interactive);
        }
        Ok(())
    }

    pub fn set_sub_target_check(&mut self, group: NodeId, enabled: bool) -> SceneResult<()> {
        self.group_data_mut(group)?.sub_target_check = enabled;
        self.set_coords(group);
        Ok(())
    }

    /// Switch the layout mode, running a `layout_change` layout when it differs.
    pub fn set_layout(&mut self, group: NodeId, layout: LayoutMode) -> SceneResult<()> {
        let data = self.group_data_mut(group)?;
        let prev_layout = data.layout;
        if prev_layout == layout {
            return Ok(());
        }
        data.layout = layout;
        self.apply_layout(
            group,
            LayoutContext::new(LayoutTrigger::LayoutChange {
                layout,
                prev_layout,
            }),
        );
        Ok(())
    }

    /// Attach (or clear) the clip path of any node. Returns the previous clip.
    ///
    /// The clip must be a detached node: not on the canvas, not in a group and
    /// not the node itself.
    pub fn set_clip_path(
        &mut self,
        id: NodeId,
        clip: Option<NodeId>,
    ) -> SceneResult<Option<NodeId>> {
        if let Some(c) = clip {
            let clip_node = self.get(c)?;
            if c == id || clip_node.group.is_some() || self.canvas.objects.contains(&c) {
                return Err(SceneError::validation(format!(
                    "node {c} cannot clip {id}: clip paths must be detached"
                )));
            }
        }
        let node = self.node_mut(id).ok_or(SceneError::UnknownNode(id))?;
        let prev = std::mem::replace(&mut node.clip_path, clip);
        node.dirty = true;
        Ok(prev)
    }

    /// Install (or clear) the post-layout hook of a group.
    pub fn set_layout_hook(&mut self, group: NodeId, hook: Option<LayoutHook>) -> SceneResult<()> {
        self.group_data_mut(group)?.on_layout = hook;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/group/mod.rs"]
mod tests;
