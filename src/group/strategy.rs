//! Layout strategies: which box a group should take for a given trigger.

use crate::{
    foundation::core::{Affine, Point, Vec2},
    foundation::math::{Extent, rotated_half_extent},
    group::layout::{
        BoundingBox, InitialLayout, LayoutContext, LayoutMode, LayoutResult, LayoutTrigger,
    },
    scene::id::NodeId,
    scene::tree::Scene,
    transform::affine::transform_vector,
    transform::plane::send_point_to_plane,
};

impl Scene {
    /// Resolve the layout result for `group`, or `None` when nothing changes.
    pub(crate) fn layout_strategy_result(
        &self,
        group: NodeId,
        context: &LayoutContext,
    ) -> Option<LayoutResult> {
        let data = self.node(group)?.group_data()?;
        if let LayoutTrigger::Initialization {
            options,
            objects_relative_to_group: true,
        } = &context.trigger
            && options.all_explicit()
        {
            return None;
        }
        let objects = data.objects.as_slice();

        match data.layout {
            LayoutMode::FitContent => self.prepare_bounding_box(group, objects, context),
            LayoutMode::FitContentLazy => match &context.trigger {
                LayoutTrigger::Added { targets }
                    if context.is_origin() && objects.len() > targets.len() =>
                {
                    self.grown_bounding_box(group, targets)
                }
                LayoutTrigger::ObjectModified { .. } => None,
                _ => self.prepare_bounding_box(group, objects, context),
            },
            LayoutMode::Fixed => match context.trigger {
                LayoutTrigger::Initialization { .. } | LayoutTrigger::Imperative { .. } => {
                    self.prepare_bounding_box(group, objects, context)
                }
                _ => None,
            },
            LayoutMode::ClipPath => self.clip_path_result(group, objects, context),
            LayoutMode::Svg => {
                if !context.is_initialization() {
                    return None;
                }
                let bbox = self.objects_bounding_box(group, objects, true)?;
                Some(LayoutResult {
                    correction_x: -bbox.offset.x,
                    correction_y: -bbox.offset.y,
                    ..bbox.into_result()
                })
            }
        }
    }

    fn prepare_bounding_box(
        &self,
        group: NodeId,
        objects: &[NodeId],
        context: &LayoutContext,
    ) -> Option<LayoutResult> {
        match &context.trigger {
            LayoutTrigger::Initialization {
                options,
                objects_relative_to_group,
            } => self.prepare_initial_bounding_box(
                group,
                objects,
                options,
                *objects_relative_to_group,
            ),
            LayoutTrigger::Imperative { overrides, .. } if context.is_origin() => self
                .objects_bounding_box(group, objects, false)
                .map(BoundingBox::into_result)
                .or_else(|| self.current_layout_result(group))
                .map(|base| overrides.merge_over(base)),
            _ => self
                .objects_bounding_box(group, objects, false)
                .map(BoundingBox::into_result),
        }
    }

    /// The group's present box expressed as a layout result.
    fn current_layout_result(&self, group: NodeId) -> Option<LayoutResult> {
        let g = self.geometry(group)?;
        let center = g.relative_center();
        Some(LayoutResult {
            center_x: center.x,
            center_y: center.y,
            width: g.width,
            height: g.height,
            correction_x: 0.0,
            correction_y: 0.0,
        })
    }

    /// Union of the children's axis-aligned extents in the group's own plane.
    fn objects_extent(&self, objects: &[NodeId]) -> Option<Extent> {
        objects
            .iter()
            .filter_map(|&id| self.geometry(id))
            .map(|g| {
                let half = g.transformed_dimensions() / 2.0;
                Extent::around(g.relative_center(), rotated_half_extent(half, g.angle))
            })
            .reduce(Extent::union)
    }

    /// Tight box of `objects`, mapped into the group's parent plane.
    ///
    /// With `ignore_offset` the box is framed from its minimum corner, so its
    /// center is half its size rather than the midpoint of the extent.
    pub fn objects_bounding_box(
        &self,
        group: NodeId,
        objects: &[NodeId],
        ignore_offset: bool,
    ) -> Option<BoundingBox> {
        let extent = self.objects_extent(objects)?;
        let size = extent.size();
        let relative = if ignore_offset {
            (size / 2.0).to_point()
        } else {
            extent.midpoint()
        };
        let own = self.own_matrix(group);
        Some(BoundingBox {
            offset: own * extent.min,
            center: own * relative,
            width: size.x,
            height: size.y,
        })
    }

    /// Current box grown by the extents of freshly added children.
    fn grown_bounding_box(&self, group: NodeId, added: &[NodeId]) -> Option<LayoutResult> {
        let g = self.geometry(group)?;
        let current = Extent::around(Point::ZERO, Vec2::new(g.width / 2.0, g.height / 2.0));
        let extent = self
            .objects_extent(added)
            .map_or(current, |e| e.union(current));
        let size = extent.size();
        let center = g.own_matrix() * extent.midpoint();
        Some(LayoutResult {
            center_x: center.x,
            center_y: center.y,
            width: size.x,
            height: size.y,
            correction_x: 0.0,
            correction_y: 0.0,
        })
    }

    /// Reconcile explicit construction values with the measured content.
    ///
    /// Explicit `width`/`height` center the content in the declared size;
    /// explicit `left`/`top` anchor the group's origin point there.
    fn prepare_initial_bounding_box(
        &self,
        group: NodeId,
        objects: &[NodeId],
        options: &InitialLayout,
        objects_relative_to_group: bool,
    ) -> Option<LayoutResult> {
        if objects.is_empty() || (objects_relative_to_group && options.all_explicit()) {
            return None;
        }
        let extent = self.objects_extent(objects)?;
        let g = self.geometry(group)?;
        let own = g.own_matrix();

        let content_mid = extent.midpoint();
        let content_size = extent.size();
        let width = options.width.unwrap_or(content_size.x);
        let height = options.height.unwrap_or(content_size.y);
        let size_after = g.dimensions_after(width, height);

        let content_center = if objects_relative_to_group {
            own * content_mid
        } else {
            content_mid
        };
        let center = Point::new(
            options
                .left
                .map_or(content_center.x, |left| left - g.origin.x * size_after.x),
            options
                .top
                .map_or(content_center.y, |top| top - g.origin.y * size_after.y),
        );
        let correction =
            center - (g.relative_center() + transform_vector(own, content_mid.to_vec2()));

        Some(LayoutResult {
            center_x: center.x,
            center_y: center.y,
            width,
            height,
            correction_x: correction.x,
            correction_y: correction.y,
        })
    }

    fn clip_path_result(
        &self,
        group: NodeId,
        objects: &[NodeId],
        context: &LayoutContext,
    ) -> Option<LayoutResult> {
        let node = self.node(group)?;
        let clip = self.node(node.clip_path?)?;
        let clip_size = clip.geometry.transformed_dimensions();
        let structural = matches!(
            context.trigger,
            LayoutTrigger::Initialization { .. } | LayoutTrigger::LayoutChange { .. }
        );

        if clip.props.absolute_positioned {
            if !structural {
                return None;
            }
            let center = send_point_to_plane(
                clip.geometry.relative_center(),
                Affine::IDENTITY,
                self.parent_matrix(group),
            );
            return Some(LayoutResult {
                center_x: center.x,
                center_y: center.y,
                width: clip_size.x,
                height: clip_size.y,
                correction_x: 0.0,
                correction_y: 0.0,
            });
        }

        let up = transform_vector(
            node.geometry.own_matrix(),
            clip.geometry.relative_center().to_vec2(),
        );
        if structural {
            let base = self
                .prepare_bounding_box(group, objects, context)
                .or_else(|| self.current_layout_result(group))?;
            Some(LayoutResult {
                center_x: base.center_x + up.x,
                center_y: base.center_y + up.y,
                width: clip_size.x,
                height: clip_size.y,
                correction_x: base.correction_x - up.x,
                correction_y: base.correction_y - up.y,
            })
        } else {
            let center = node.geometry.relative_center() + up;
            Some(LayoutResult {
                center_x: center.x,
                center_y: center.y,
                width: node.geometry.width,
                height: node.geometry.height,
                correction_x: 0.0,
                correction_y: 0.0,
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/group/strategy.rs"]
mod tests;
