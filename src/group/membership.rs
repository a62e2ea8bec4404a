//! Entering and leaving groups.
//!
//! Every transition keeps `child.group == Some(g)` and `g.objects` in sync,
//! moves the child between coordinate planes and maintains the canvas
//! back-reference, the interactive monitors and the active set.

use crate::{
    ancestry::Ancestor,
    foundation::core::Affine,
    foundation::error::{SceneError, SceneResult},
    group::{
        GroupData, GroupOptions,
        layout::{LayoutContext, LayoutTrigger},
    },
    scene::events::NodeEvent,
    scene::id::NodeId,
    scene::node::{Geometry, Node, NodeKind},
    scene::tree::Scene,
    transform::plane::send_matrix_to_plane,
};

impl Scene {
    /// Create a group holding `objects` and run its initial layout.
    ///
    /// With `objects_relative_to_group` the children's geometry is taken as
    /// already expressed in the new group's plane; otherwise it is read in the
    /// plane the group is created in.
    #[tracing::instrument(level = "debug", skip(self, objects, options))]
    pub fn create_group(
        &mut self,
        objects: &[NodeId],
        options: GroupOptions,
        objects_relative_to_group: bool,
    ) -> SceneResult<NodeId> {
        if let Some(clip) = options.clip_path {
            let clip_node = self.get(clip)?;
            if clip_node.group.is_some() || self.canvas.objects.contains(&clip) {
                return Err(SceneError::validation(format!(
                    "clip path {clip} must be a detached node"
                )));
            }
        }

        let geometry = Geometry {
            left: options.left.unwrap_or(0.0),
            top: options.top.unwrap_or(0.0),
            width: options.width.unwrap_or(0.0),
            height: options.height.unwrap_or(0.0),
            scale_x: options.scale_x.unwrap_or(1.0),
            scale_y: options.scale_y.unwrap_or(1.0),
            angle: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            flip_x: options.flip_x,
            flip_y: options.flip_y,
            origin: options.origin,
        };
        let data = GroupData::new(options.layout, options.sub_target_check, options.interactive);
        let mut node = Node::new(NodeKind::Group(data), geometry, options.props.clone());
        node.clip_path = options.clip_path;
        let group = self.alloc(node);

        let accepted = self.accepted_entries(group, objects);
        for &object in &accepted {
            self.detach_from_parent(object);
        }
        for object in accepted {
            self.group_data_mut(group)?.objects.push(object);
            self.enter_group(group, object, false);
        }

        self.apply_layout(
            group,
            LayoutContext::new(LayoutTrigger::Initialization {
                options: options.initial_layout(),
                objects_relative_to_group,
            }),
        );
        Ok(group)
    }

    /// Whether `object` may become a child of `group`.
    ///
    /// Rejects the group itself, any node the group descends from and nodes
    /// already in the group, logging a warning for each.
    pub fn can_enter_group(&self, group: NodeId, object: NodeId) -> bool {
        if !self.contains_node(object) {
            tracing::warn!(group = %group, object = %object, "unknown node cannot enter group");
            return false;
        }
        if object == group || self.is_descendant_of(group, Ancestor::Node(object)) {
            tracing::warn!(
                group = %group,
                object = %object,
                "cannot add a group to itself or to one of its descendants"
            );
            return false;
        }
        if self.children(group).contains(&object) {
            tracing::warn!(group = %group, object = %object, "object is already in group");
            return false;
        }
        true
    }

    /// Filter `objects` down to the entries that may enter, first occurrence wins.
    fn accepted_entries(&self, group: NodeId, objects: &[NodeId]) -> Vec<NodeId> {
        let mut accepted = Vec::with_capacity(objects.len());
        for (i, &object) in objects.iter().enumerate() {
            if objects[..i].contains(&object) {
                tracing::debug!(group = %group, object = %object, "duplicate entry skipped");
                continue;
            }
            if self.can_enter_group(group, object) {
                accepted.push(object);
            }
        }
        accepted
    }

    /// Append children, keeping their absolute position. Returns the new child count.
    pub fn add(&mut self, group: NodeId, objects: &[NodeId]) -> SceneResult<usize> {
        let at = self.group_data(group)?.objects.len();
        self.insert(group, at, objects)
    }

    /// Insert children at `index` (clamped), keeping their absolute position.
    #[tracing::instrument(level = "debug", skip(self, objects))]
    pub fn insert(
        &mut self,
        group: NodeId,
        index: usize,
        objects: &[NodeId],
    ) -> SceneResult<usize> {
        self.group_data(group)?;
        let accepted = self.accepted_entries(group, objects);
        // Old parents relayout before the new list sees these nodes.
        for &object in &accepted {
            self.detach_from_parent(object);
        }
        {
            let data = self.group_data_mut(group)?;
            let at = index.min(data.objects.len());
            data.objects.splice(at..at, accepted.iter().copied());
        }
        for &object in &accepted {
            self.enter_group(group, object, true);
            self.fire(group, &NodeEvent::ObjectAdded { group, object });
            self.fire(
                object,
                &NodeEvent::Added {
                    target: object,
                    parent: Ancestor::Node(group),
                },
            );
        }
        self.on_after_objects_change(group, LayoutTrigger::Added { targets: accepted });
        Ok(self.group_data(group)?.objects.len())
    }

    /// Remove direct children, keeping their absolute position. Returns the
    /// nodes actually removed.
    #[tracing::instrument(level = "debug", skip(self, objects))]
    pub fn remove(&mut self, group: NodeId, objects: &[NodeId]) -> SceneResult<Vec<NodeId>> {
        self.group_data(group)?;
        let mut removed = Vec::new();
        for &object in objects {
            let data = self.group_data_mut(group)?;
            let Some(pos) = data.objects.iter().position(|&o| o == object) else {
                continue;
            };
            data.objects.remove(pos);
            self.exit_group(group, object);
            self.fire(group, &NodeEvent::ObjectRemoved { group, object });
            self.fire(
                object,
                &NodeEvent::Removed {
                    target: object,
                    parent: Ancestor::Node(group),
                },
            );
            removed.push(object);
        }
        self.on_after_objects_change(
            group,
            LayoutTrigger::Removed {
                targets: removed.clone(),
            },
        );
        Ok(removed)
    }

    /// Clear the active set, then remove every child.
    pub fn remove_all(&mut self, group: NodeId) -> SceneResult<Vec<NodeId>> {
        let data = self.group_data_mut(group)?;
        data.active_objects.clear();
        let objects = data.objects.clone();
        self.remove(group, &objects)
    }

    /// Take `object` out of its current group or off the canvas list. A node
    /// leaving a group is re-expressed in the canvas plane.
    pub(crate) fn detach_from_parent(&mut self, object: NodeId) {
        if let Some(old) = self.group_of(object) {
            if let Err(e) = self.remove(old, &[object]) {
                tracing::warn!(group = %old, object = %object, error = %e, "detach failed");
            }
        } else if let Some(pos) = self.canvas.objects.iter().position(|&o| o == object) {
            self.canvas.objects.remove(pos);
        }
    }

    /// Bind a detached `object` to `group`. The caller has already placed it
    /// in the child list.
    fn enter_group(&mut self, group: NodeId, object: NodeId, remove_parent_transform: bool) {
        if remove_parent_transform {
            let m = send_matrix_to_plane(
                self.own_matrix(object),
                Affine::IDENTITY,
                self.total_matrix(group),
            );
            if let Some(n) = self.node_mut(object) {
                n.geometry.apply_matrix(m);
            }
        }

        let (on_canvas, sub_target_check, interactive) = match self.node(group) {
            Some(g) => (
                g.canvas,
                g.group_data().is_some_and(|d| d.sub_target_check),
                g.group_data().is_some_and(|d| d.interactive),
            ),
            None => return,
        };
        if let Some(n) = self.node_mut(object) {
            n.group = Some(group);
        }
        self.set_canvas_ref(object, on_canvas);
        if sub_target_check {
            self.set_coords(object);
        }
        if interactive {
            self.watch_object(group, object, true);
        }

        if on_canvas
            && let Some(active) = self.canvas.active_object
            && (active == object || self.is_descendant_of(object, Ancestor::Node(active)))
            && let Ok(data) = self.group_data_mut(group)
        {
            data.active_objects.push(object);
        }
    }

    /// Unbind `object` from `group`, re-expressing it in the canvas plane.
    fn exit_group(&mut self, group: NodeId, object: NodeId) {
        let m = send_matrix_to_plane(
            self.own_matrix(object),
            self.total_matrix(group),
            Affine::IDENTITY,
        );
        if let Some(n) = self.node_mut(object) {
            n.group = None;
            n.geometry.apply_matrix(m);
        }
        self.set_canvas_ref(object, false);
        self.set_coords(object);
        self.watch_object(group, object, false);
        if let Ok(data) = self.group_data_mut(group) {
            data.active_objects.retain(|&o| o != object);
        }
    }

    fn on_after_objects_change(&mut self, group: NodeId, trigger: LayoutTrigger) {
        self.apply_layout(group, LayoutContext::new(trigger));
        self.set_dirty(group, true);
    }

    /// Reaction of an interactive group to an event fired on one of its children.
    pub(crate) fn on_child_event(&mut self, group: NodeId, event: &NodeEvent) {
        match *event {
            NodeEvent::Changed { target } | NodeEvent::Modified { target } => {
                self.apply_layout(
                    group,
                    LayoutContext::new(LayoutTrigger::ObjectModified {
                        target,
                        event: event.kind(),
                    }),
                );
                self.set_dirty(group, true);
            }
            NodeEvent::Selected { target } => {
                if let Ok(data) = self.group_data_mut(group)
                    && !data.active_objects.contains(&target)
                {
                    data.active_objects.push(target);
                }
                self.set_dirty(group, true);
            }
            NodeEvent::Deselected { target } => {
                if let Ok(data) = self.group_data_mut(group) {
                    data.active_objects.retain(|&o| o != target);
                }
                self.set_dirty(group, true);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/group/membership.rs"]
mod tests;
