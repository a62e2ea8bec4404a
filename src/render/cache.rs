//! Offscreen cache eligibility and invalidation.

use crate::{
    foundation::core::{Rect, Vec2},
    scene::id::NodeId,
    scene::tree::Scene,
};

/// Offscreen surface bookkeeping for a cached node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheSurface {
    /// Surface size in node units.
    pub size: Vec2,
    /// Regions cleared since the last cached render started, in surface
    /// coordinates centered on the node.
    pub cleared: Vec<Rect>,
}

impl CacheSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            cleared: Vec::new(),
        }
    }

    fn clear_all(&mut self) {
        let half = self.size / 2.0;
        self.cleared.push(Rect::new(-half.x, -half.y, half.x, half.y));
    }
}

impl Scene {
    /// Whether the node or any descendant draws a shadow.
    pub fn will_draw_shadow(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        node.props.shadow || node.objects().iter().any(|&c| self.will_draw_shadow(c))
    }

    /// Whether the node renders into a cache, itself or through an ancestor.
    pub fn is_on_a_cache(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        node.own_caching || node.group.is_some_and(|g| self.is_on_a_cache(g))
    }

    /// Decide (and record) whether the node gets its own offscreen cache.
    ///
    /// Nested nodes inside a cached ancestor never cache. A group whose children
    /// draw shadows, or that has selected children, renders directly.
    pub fn should_cache(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let mut caching = node.props.object_caching
            && node.group.is_none_or(|g| !self.is_on_a_cache(g));
        if caching && let Some(data) = node.group_data() {
            caching = data.active_objects.is_empty()
                && !data.objects.iter().any(|&c| self.will_draw_shadow(c));
        }
        if let Some(node) = self.node_mut(id) {
            node.own_caching = caching;
        }
        caching
    }

    /// Whether the node's cache must be redrawn.
    ///
    /// A dirty node, or one clipped by an absolutely positioned clip path, has
    /// its whole cache cleared unless `skip_canvas`. Groups with
    /// `stateful_cache` also turn dirty when a descendant's cache is dirty.
    pub fn is_cache_dirty(&mut self, id: NodeId, skip_canvas: bool) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.props.visible {
            return false;
        }
        let absolute_clip = node
            .clip_path
            .and_then(|c| self.node(c))
            .is_some_and(|c| c.props.absolute_positioned);
        if node.dirty || absolute_clip {
            if !skip_canvas {
                self.clear_cache(id);
            }
            return true;
        }
        if !node.props.stateful_cache {
            return false;
        }
        let children = node.objects().to_vec();
        for child in children {
            if self.is_cache_dirty(child, true) {
                self.clear_cache(id);
                return true;
            }
        }
        false
    }

    fn clear_cache(&mut self, id: NodeId) {
        if let Some(cache) = self.node_mut(id).and_then(|n| n.cache.as_mut()) {
            cache.clear_all();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
