//! Typed per-node events with registration-ordered dispatch.

use crate::{
    ancestry::Ancestor,
    foundation::core::Vec2,
    foundation::error::{SceneError, SceneResult},
    group::layout::{LayoutContext, LayoutResult},
    scene::id::{NodeId, SubscriptionId},
    scene::tree::Scene,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Discriminant of a [`NodeEvent`], used to subscribe.
pub enum EventKind {
    /// Content changed (e.g. text edited).
    Changed,
    /// Geometry modified through [`Scene::modify`] or an interaction.
    Modified,
    /// Node became part of the selection.
    Selected,
    /// Node left the selection.
    Deselected,
    /// Node entered a parent (group or canvas).
    Added,
    /// Node left a parent.
    Removed,
    /// Fired on a group after a child entered.
    ObjectAdded,
    /// Fired on a group after a child left.
    ObjectRemoved,
    /// Fired on a group after each completed layout.
    Layout,
}

#[derive(Clone, Debug)]
/// Payload of a completed layout.
pub struct LayoutEvent {
    /// Group that ran the layout.
    pub group: NodeId,
    /// Trigger and propagation path.
    pub context: LayoutContext,
    /// Geometry the strategy produced.
    pub result: LayoutResult,
    /// Translation applied to children, in the group's own plane.
    pub diff: Vec2,
}

#[derive(Clone, Debug)]
/// Event delivered to subscribers of a node.
pub enum NodeEvent {
    /// See [`EventKind::Changed`].
    Changed {
        /// Node whose content changed.
        target: NodeId,
    },
    /// See [`EventKind::Modified`].
    Modified {
        /// Node whose geometry changed.
        target: NodeId,
    },
    /// See [`EventKind::Selected`].
    Selected {
        /// Selected node.
        target: NodeId,
    },
    /// See [`EventKind::Deselected`].
    Deselected {
        /// Deselected node.
        target: NodeId,
    },
    /// See [`EventKind::Added`].
    Added {
        /// Node that entered.
        target: NodeId,
        /// Its new parent.
        parent: Ancestor,
    },
    /// See [`EventKind::Removed`].
    Removed {
        /// Node that left.
        target: NodeId,
        /// Its former parent.
        parent: Ancestor,
    },
    /// See [`EventKind::ObjectAdded`].
    ObjectAdded {
        /// Receiving group.
        group: NodeId,
        /// Child that entered.
        object: NodeId,
    },
    /// See [`EventKind::ObjectRemoved`].
    ObjectRemoved {
        /// Former parent group.
        group: NodeId,
        /// Child that left.
        object: NodeId,
    },
    /// See [`EventKind::Layout`].
    Layout(Box<LayoutEvent>),
}

impl NodeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Changed { .. } => EventKind::Changed,
            Self::Modified { .. } => EventKind::Modified,
            Self::Selected { .. } => EventKind::Selected,
            Self::Deselected { .. } => EventKind::Deselected,
            Self::Added { .. } => EventKind::Added,
            Self::Removed { .. } => EventKind::Removed,
            Self::ObjectAdded { .. } => EventKind::ObjectAdded,
            Self::ObjectRemoved { .. } => EventKind::ObjectRemoved,
            Self::Layout(_) => EventKind::Layout,
        }
    }
}

/// User callback attached with [`Scene::on`].
pub type Handler = Box<dyn FnMut(&NodeEvent)>;

pub(crate) enum Subscriber {
    /// Internal monitor installed by an interactive group on its children.
    Group(NodeId),
    Handler(Handler),
}

pub(crate) struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) kind: EventKind,
    pub(crate) subscriber: Subscriber,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscriber = match self.subscriber {
            Subscriber::Group(g) => format!("group {g}"),
            Subscriber::Handler(_) => "handler".to_string(),
        };
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("subscriber", &subscriber)
            .finish()
    }
}

/// Events a group monitors on each child while interactive.
pub(crate) const MONITORED: [EventKind; 4] = [
    EventKind::Changed,
    EventKind::Modified,
    EventKind::Selected,
    EventKind::Deselected,
];

impl Scene {
    /// Subscribe `handler` to `kind` events fired on `node`.
    pub fn on(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: impl FnMut(&NodeEvent) + 'static,
    ) -> SceneResult<SubscriptionId> {
        let id = self.next_subscription_id();
        self.node_mut(node)
            .ok_or(SceneError::UnknownNode(node))?
            .listeners
            .push(Subscription {
                id,
                kind,
                subscriber: Subscriber::Handler(Box::new(handler)),
            });
        Ok(id)
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn off(&mut self, node: NodeId, id: SubscriptionId) -> bool {
        let Some(n) = self.node_mut(node) else {
            return false;
        };
        let before = n.listeners.len();
        n.listeners.retain(|s| s.id != id);
        n.listeners.len() != before
    }

    /// Number of subscriptions attached to `node` for `kind`.
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.node(node)
            .map_or(0, |n| n.listeners.iter().filter(|s| s.kind == kind).count())
    }

    /// Attach or detach the monitors `group` keeps on `object`.
    ///
    /// Attaching always detaches first, so a child never carries more than one
    /// monitor per event for the same group.
    pub(crate) fn watch_object(&mut self, group: NodeId, object: NodeId, watch: bool) {
        let first_id = if watch {
            let id = self.next_subscription_id();
            for _ in 1..MONITORED.len() {
                self.next_subscription_id();
            }
            Some(id.0)
        } else {
            None
        };
        let Some(n) = self.node_mut(object) else {
            return;
        };
        n.listeners.retain(|s| {
            !(matches!(s.subscriber, Subscriber::Group(g) if g == group)
                && MONITORED.contains(&s.kind))
        });
        if let Some(first) = first_id {
            for (offset, kind) in MONITORED.iter().enumerate() {
                n.listeners.push(Subscription {
                    id: SubscriptionId(first + offset as u64),
                    kind: *kind,
                    subscriber: Subscriber::Group(group),
                });
            }
        }
    }

    /// Deliver `event` to the subscribers of `node` in registration order.
    ///
    /// Group monitors react by re-running the group's layout or updating its
    /// active set. Subscriptions added while dispatching are kept but only see
    /// later events.
    pub fn fire(&mut self, node: NodeId, event: &NodeEvent) {
        let kind = event.kind();
        let mut listeners = match self.node_mut(node) {
            Some(n) => std::mem::take(&mut n.listeners),
            None => return,
        };
        for sub in listeners.iter_mut().filter(|s| s.kind == kind) {
            match &mut sub.subscriber {
                Subscriber::Handler(h) => h(event),
                Subscriber::Group(g) => {
                    let g = *g;
                    self.on_child_event(g, event);
                }
            }
        }
        if let Some(n) = self.node_mut(node) {
            let added = std::mem::replace(&mut n.listeners, listeners);
            n.listeners.extend(added);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/events.rs"]
mod tests;
