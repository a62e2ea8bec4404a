use super::*;
use crate::{
    foundation::core::{Affine, Point, Rgba8, Rgba8Premul},
    group::{GroupOptions, LayoutMode},
    scene::node::{Geometry, NodeProps, Shape},
};

#[derive(Debug, PartialEq)]
enum Call {
    Save,
    Restore,
    Transform,
    FillRect,
    Shape(NodeId),
    Clip(NodeId, Affine),
    BeginCache(NodeId),
    EndCache(NodeId),
    DrawCache(NodeId),
}

#[derive(Default)]
struct MockPainter {
    calls: Vec<Call>,
}

impl Painter for MockPainter {
    fn save(&mut self) {
        self.calls.push(Call::Save);
    }

    fn restore(&mut self) {
        self.calls.push(Call::Restore);
    }

    fn transform(&mut self, _m: Affine) {
        self.calls.push(Call::Transform);
    }

    fn fill_rect(&mut self, _rect: Rect, _color: Rgba8Premul) {
        self.calls.push(Call::FillRect);
    }

    fn draw_shape(&mut self, node: NodeId, _shape: Shape, _size: Vec2, _fill: Option<Rgba8Premul>) {
        self.calls.push(Call::Shape(node));
    }

    fn apply_clip(&mut self, clip: NodeId, transform: Affine, _shape: Shape, _size: Vec2) {
        self.calls.push(Call::Clip(clip, transform));
    }

    fn begin_cache(&mut self, node: NodeId, _size: Vec2) {
        self.calls.push(Call::BeginCache(node));
    }

    fn end_cache(&mut self, node: NodeId) {
        self.calls.push(Call::EndCache(node));
    }

    fn draw_cache(&mut self, node: NodeId, _size: Vec2) {
        self.calls.push(Call::DrawCache(node));
    }
}

fn rect(scene: &mut Scene, left: f64) -> NodeId {
    scene.create_shape(
        Shape::Rect,
        Geometry::rect(left, 0.0, 10.0, 10.0),
        NodeProps::default(),
    )
}

#[test]
fn group_paints_background_children_then_clip() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let b = rect(&mut scene, 20.0);
    let c = scene.create_shape(
        Shape::Ellipse,
        Geometry::rect(0.0, 0.0, 20.0, 10.0),
        NodeProps::default(),
    );
    let g = scene
        .create_group(
            &[a, b],
            GroupOptions {
                clip_path: Some(c),
                props: NodeProps {
                    background: Some(Rgba8::new(255, 0, 0, 255)),
                    ..NodeProps::default()
                },
                ..GroupOptions::default()
            },
            false,
        )
        .unwrap();

    let mut painter = MockPainter::default();
    scene.render(g, &mut painter).unwrap();

    let clip_matrix = scene.own_matrix(c);
    assert_eq!(
        painter.calls,
        vec![
            Call::Save,
            Call::Transform,
            Call::BeginCache(g),
            Call::FillRect,
            Call::Save,
            Call::Transform,
            Call::Shape(a),
            Call::Restore,
            Call::Save,
            Call::Transform,
            Call::Shape(b),
            Call::Restore,
            Call::Clip(c, clip_matrix),
            Call::EndCache(g),
            Call::DrawCache(g),
            Call::Restore,
        ]
    );
    assert!(!scene.get(g).unwrap().is_dirty());
    assert!(!scene.get(a).unwrap().is_dirty());
}

#[test]
fn clean_cache_is_blitted_without_redrawing() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let g = scene.create_group(&[a], GroupOptions::default(), false).unwrap();
    scene.render(g, &mut MockPainter::default()).unwrap();

    let mut painter = MockPainter::default();
    scene.render(g, &mut painter).unwrap();
    assert_eq!(
        painter.calls,
        vec![Call::Save, Call::Transform, Call::DrawCache(g), Call::Restore]
    );

    let b = rect(&mut scene, 30.0);
    scene.add(g, &[b]).unwrap();
    let mut painter = MockPainter::default();
    scene.render(g, &mut painter).unwrap();
    assert!(painter.calls.contains(&Call::BeginCache(g)));
    assert!(painter.calls.contains(&Call::Shape(a)));
}

#[test]
fn uncached_nodes_draw_directly() {
    let mut scene = Scene::new();
    let a = scene.create_shape(
        Shape::Rect,
        Geometry::rect(0.0, 0.0, 10.0, 10.0),
        NodeProps {
            object_caching: false,
            ..NodeProps::default()
        },
    );
    let mut painter = MockPainter::default();
    scene.render(a, &mut painter).unwrap();
    assert_eq!(
        painter.calls,
        vec![Call::Save, Call::Transform, Call::Shape(a), Call::Restore]
    );
    assert!(scene.get(a).unwrap().cache().is_none());
}

#[test]
fn hidden_nodes_are_skipped() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let b = rect(&mut scene, 20.0);
    let g = scene.create_group(&[a, b], GroupOptions::default(), false).unwrap();
    scene.set_props(a, |p| p.visible = false).unwrap();

    let mut painter = MockPainter::default();
    scene.render(g, &mut painter).unwrap();
    assert!(!painter.calls.contains(&Call::Shape(a)));
    assert!(painter.calls.contains(&Call::Shape(b)));
}

#[test]
fn absolute_clip_is_mapped_into_the_holder_plane() {
    let mut scene = Scene::new();
    let clip = scene.create_shape(
        Shape::Rect,
        Geometry::rect(100.0, 100.0, 50.0, 50.0),
        NodeProps {
            absolute_positioned: true,
            ..NodeProps::default()
        },
    );
    let a = rect(&mut scene, 0.0);
    let g = scene
        .create_group(
            &[a],
            GroupOptions {
                layout: LayoutMode::ClipPath,
                clip_path: Some(clip),
                ..GroupOptions::default()
            },
            false,
        )
        .unwrap();

    let mut painter = MockPainter::default();
    scene.render(g, &mut painter).unwrap();
    let transform = painter
        .calls
        .iter()
        .find_map(|c| match c {
            Call::Clip(id, m) if *id == clip => Some(*m),
            _ => None,
        })
        .unwrap();
    // the clip is centered on the group
    let center = transform * Point::ZERO;
    assert!(center.x.abs() < 1e-9 && center.y.abs() < 1e-9);
}

#[test]
fn group_clip_paths_are_rejected_at_render_time() {
    let mut scene = Scene::new();
    let inner = rect(&mut scene, 0.0);
    let clip = scene.create_group(&[inner], GroupOptions::default(), false).unwrap();
    let a = rect(&mut scene, 0.0);
    scene.set_clip_path(a, Some(clip)).unwrap();

    let err = scene.render(a, &mut MockPainter::default()).unwrap_err();
    assert!(matches!(err, SceneError::Validation(_)));
}
