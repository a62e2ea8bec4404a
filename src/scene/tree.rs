use crate::{
    ancestry::Ancestor,
    foundation::core::{Affine, Point},
    foundation::error::{SceneError, SceneResult},
    scene::events::NodeEvent,
    scene::id::{NodeId, SubscriptionId},
    scene::node::{Geometry, Node, NodeKind, NodeProps, Shape},
};

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Canvas container: root-level paint order plus the current active object.
#[derive(Debug, Default)]
pub(crate) struct CanvasRoot {
    pub(crate) objects: Vec<NodeId>,
    pub(crate) active_object: Option<NodeId>,
}

/// Arena owning every node of one canvas.
///
/// Parent links (`group`) and child lists are plain [`NodeId`] handles into
/// this arena. A node belongs to at most one parent: a group's child list or
/// the canvas root list.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    pub(crate) canvas: CanvasRoot,
    next_subscription: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            return NodeId::new(idx, slot.generation);
        }
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(idx, 0)
    }

    pub(crate) fn next_subscription_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        id
    }

    /// Create a detached leaf shape.
    pub fn create_shape(&mut self, shape: Shape, geometry: Geometry, props: NodeProps) -> NodeId {
        self.alloc(Node::new(NodeKind::Shape(shape), geometry, props))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|s| s.generation == id.generation())
            .and_then(|s| s.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|s| s.generation == id.generation())
            .and_then(|s| s.node.as_mut())
    }

    /// Like [`Scene::node`] but reports stale handles as errors.
    pub fn get(&self, id: NodeId) -> SceneResult<&Node> {
        self.node(id).ok_or(SceneError::UnknownNode(id))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.node(id).map(|n| &n.geometry)
    }

    pub fn group_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.group)
    }

    pub fn is_group(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_group)
    }

    /// Direct children of `id` in paint order (empty for leaves and stale ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], Node::objects)
    }

    /// Apply `f` to the node's geometry, mark it dirty and fire
    /// [`NodeEvent::Modified`].
    pub fn modify(&mut self, id: NodeId, f: impl FnOnce(&mut Geometry)) -> SceneResult<()> {
        let node = self.node_mut(id).ok_or(SceneError::UnknownNode(id))?;
        f(&mut node.geometry);
        node.dirty = true;
        self.fire(id, &NodeEvent::Modified { target: id });
        Ok(())
    }

    /// Update appearance flags without notifications.
    pub fn set_props(&mut self, id: NodeId, f: impl FnOnce(&mut NodeProps)) -> SceneResult<()> {
        let node = self.node_mut(id).ok_or(SceneError::UnknownNode(id))?;
        f(&mut node.props);
        node.dirty = true;
        Ok(())
    }

    pub(crate) fn set_dirty(&mut self, id: NodeId, dirty: bool) {
        if let Some(n) = self.node_mut(id) {
            n.dirty = dirty;
        }
    }

    /// Matrix from the node's own plane to its parent plane.
    pub fn own_matrix(&self, id: NodeId) -> Affine {
        self.node(id)
            .map_or(Affine::IDENTITY, |n| n.geometry.own_matrix())
    }

    /// Matrix from the node's own plane to the canvas plane.
    pub fn total_matrix(&self, id: NodeId) -> Affine {
        let mut m = self.own_matrix(id);
        let mut cursor = self.group_of(id);
        let mut guard = self.slots.len();
        while let Some(parent) = cursor {
            m = self.own_matrix(parent) * m;
            cursor = self.group_of(parent);
            guard = guard.saturating_sub(1);
            if guard == 0 {
                debug_assert!(false, "cycle in group chain at {id}");
                break;
            }
        }
        m
    }

    /// Matrix from the plane the node lives in (its parent's plane) to the canvas plane.
    pub fn parent_matrix(&self, id: NodeId) -> Affine {
        self.group_of(id)
            .map_or(Affine::IDENTITY, |g| self.total_matrix(g))
    }

    /// Center of the node in its parent plane.
    pub fn relative_center(&self, id: NodeId) -> Option<Point> {
        self.geometry(id).map(Geometry::relative_center)
    }

    /// Center of the node in the canvas plane.
    pub fn center_point(&self, id: NodeId) -> Option<Point> {
        let c = self.relative_center(id)?;
        Some(self.parent_matrix(id) * c)
    }

    /// Recompute cached absolute corners. Groups with sub-target checking
    /// refresh their descendants as well.
    pub fn set_coords(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let total = self.total_matrix(current);
            let Some(node) = self.node_mut(current) else {
                continue;
            };
            node.coords = Some(node.geometry.corners(total));
            if let Some(g) = node.group_data()
                && g.sub_target_check
            {
                stack.extend(g.objects.iter().rev().copied());
            }
        }
    }

    /// Root-level objects in paint order.
    pub fn canvas_objects(&self) -> &[NodeId] {
        &self.canvas.objects
    }

    pub fn active_object(&self) -> Option<NodeId> {
        self.canvas.active_object
    }

    /// Set (or clear) the canvas active object, firing selection events.
    pub fn set_active_object(&mut self, id: Option<NodeId>) {
        let prev = self.canvas.active_object;
        if prev == id {
            return;
        }
        self.canvas.active_object = id;
        if let Some(p) = prev {
            self.fire(p, &NodeEvent::Deselected { target: p });
        }
        if let Some(n) = id {
            self.fire(n, &NodeEvent::Selected { target: n });
        }
    }

    /// Append nodes to the canvas root. Nodes held by a group leave it first,
    /// keeping their absolute position.
    pub fn add_to_canvas(&mut self, ids: &[NodeId]) -> usize {
        let at = self.canvas.objects.len();
        self.insert_into_canvas(at, ids)
    }

    /// Insert nodes into the canvas root at `index` (clamped).
    pub fn insert_into_canvas(&mut self, index: usize, ids: &[NodeId]) -> usize {
        let mut index = index.min(self.canvas.objects.len());
        for (pos, &id) in ids.iter().enumerate() {
            if !self.contains_node(id) || ids[..pos].contains(&id) {
                tracing::warn!(node = %id, "skipping unknown or duplicate canvas entry");
                continue;
            }
            if let Some(old) = self.canvas.objects.iter().position(|&o| o == id) {
                self.canvas.objects.remove(old);
                if old < index {
                    index -= 1;
                }
            }
            if let Some(group) = self.group_of(id)
                && let Err(e) = self.remove(group, &[id])
            {
                tracing::warn!(group = %group, node = %id, error = %e, "detach failed");
            }
            self.canvas.objects.insert(index, id);
            index += 1;
            self.set_canvas_ref(id, true);
            self.set_coords(id);
            self.fire(
                id,
                &NodeEvent::Added {
                    target: id,
                    parent: Ancestor::Canvas,
                },
            );
        }
        self.canvas.objects.len()
    }

    /// Remove nodes from the canvas root. Returns the ones actually removed.
    pub fn remove_from_canvas(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut removed = Vec::new();
        for &id in ids {
            let Some(pos) = self.canvas.objects.iter().position(|&o| o == id) else {
                continue;
            };
            self.canvas.objects.remove(pos);
            self.detach_from_canvas(id);
            self.fire(
                id,
                &NodeEvent::Removed {
                    target: id,
                    parent: Ancestor::Canvas,
                },
            );
            removed.push(id);
        }
        removed
    }

    pub(crate) fn detach_from_canvas(&mut self, id: NodeId) {
        if self.canvas.active_object == Some(id) {
            self.canvas.active_object = None;
        }
        self.set_canvas_ref(id, false);
    }

    /// Set the canvas back-reference on `id` and all its descendants.
    pub(crate) fn set_canvas_ref(&mut self, id: NodeId, on: bool) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node_mut(current) {
                node.canvas = on;
                stack.extend(node.objects().iter().copied());
            }
        }
    }

    /// Destroy a node: detach it from its parent, drop subscriptions and the
    /// active set, then free it together with its descendants and clip path.
    pub fn dispose(&mut self, id: NodeId) -> SceneResult<()> {
        if !self.contains_node(id) {
            return Err(SceneError::UnknownNode(id));
        }
        self.detach_from_parent(id);
        if self.canvas.active_object == Some(id) {
            self.canvas.active_object = None;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let children = self.children(current).to_vec();
            for &child in &children {
                self.watch_object(current, child, false);
            }
            let Some(node) = self.node_mut(current) else {
                continue;
            };
            node.listeners.clear();
            if let Some(g) = node.group_data_mut() {
                g.active_objects.clear();
                g.on_layout = None;
            }
            if let Some(clip) = node.clip_path {
                stack.push(clip);
            }
            stack.extend(children);
            self.free(current);
        }
        Ok(())
    }

    fn free(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return;
        };
        if slot.generation != id.generation() || slot.node.is_none() {
            return;
        }
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
