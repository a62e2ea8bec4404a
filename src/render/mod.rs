//! Paint traversal.
//!
//! Backgrounds first, then children in array order (front-most last), then
//! the clip path. Caching decisions are made per node before drawing.

pub(crate) mod cache;
pub(crate) mod painter;

pub use cache::CacheSurface;
pub use painter::Painter;

use crate::{
    foundation::core::{Rect, Vec2},
    foundation::error::{SceneError, SceneResult},
    scene::id::NodeId,
    scene::tree::Scene,
};

impl Scene {
    /// Paint `id` and its descendants, clearing their dirty flags.
    pub fn render(&mut self, id: NodeId, painter: &mut dyn Painter) -> SceneResult<()> {
        let node = self.get(id)?;
        if !node.props.visible {
            return Ok(());
        }
        let own = node.geometry.own_matrix();
        let size = node.geometry.transformed_dimensions();

        painter.save();
        painter.transform(own);
        if self.should_cache(id) {
            let stale_surface = self
                .node(id)
                .is_some_and(|n| n.cache.as_ref().is_none_or(|c| c.size != size));
            if let Some(n) = self.node_mut(id) {
                if stale_surface {
                    n.cache = Some(CacheSurface::new(size));
                } else if let Some(cache) = n.cache.as_mut() {
                    cache.cleared.clear();
                }
            }
            // A surface allocated in this pass starts blank.
            if self.is_cache_dirty(id, stale_surface) || stale_surface {
                painter.begin_cache(id, size);
                self.draw_object(id, painter)?;
                painter.end_cache(id);
            }
            painter.draw_cache(id, size);
        } else {
            if let Some(n) = self.node_mut(id) {
                n.cache = None;
            }
            self.draw_object(id, painter)?;
        }
        painter.restore();

        self.set_dirty(id, false);
        Ok(())
    }

    fn draw_object(&mut self, id: NodeId, painter: &mut dyn Painter) -> SceneResult<()> {
        let node = self.get(id)?;
        let (w, h) = (node.geometry.width, node.geometry.height);
        let clip_path = node.clip_path;
        match node.shape() {
            Some(shape) => {
                let fill = node.props.fill.map(|c| c.premultiplied());
                painter.draw_shape(id, shape, Vec2::new(w, h), fill);
            }
            None => {
                if let Some(bg) = node.props.background {
                    painter.fill_rect(
                        Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0),
                        bg.premultiplied(),
                    );
                }
                let children = node.objects().to_vec();
                for child in children {
                    self.render(child, painter)?;
                }
            }
        }
        if let Some(clip) = clip_path {
            self.draw_clip_path(id, clip, painter)?;
        }
        Ok(())
    }

    fn draw_clip_path(
        &self,
        holder: NodeId,
        clip: NodeId,
        painter: &mut dyn Painter,
    ) -> SceneResult<()> {
        let clip_node = self.get(clip)?;
        let shape = clip_node.shape().ok_or_else(|| {
            SceneError::validation(format!("clip path {clip} must be a leaf shape"))
        })?;
        let own = clip_node.geometry.own_matrix();
        let transform = if clip_node.props.absolute_positioned {
            self.total_matrix(holder).inverse() * own
        } else {
            own
        };
        let size = Vec2::new(clip_node.geometry.width, clip_node.geometry.height);
        painter.apply_clip(clip, transform, shape, size);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mod.rs"]
mod tests;
