use super::*;
use crate::{
    group::GroupOptions,
    scene::node::{Geometry, NodeProps},
};

fn rect(scene: &mut Scene, left: f64, props: NodeProps) -> NodeId {
    scene.create_shape(Shape::Rect, Geometry::rect(left, 0.0, 10.0, 10.0), props)
}

#[test]
fn group_markup_nests_children_in_its_plane() {
    let mut scene = Scene::new();
    let r1 = rect(&mut scene, 0.0, NodeProps::default());
    let r2 = rect(&mut scene, 20.0, NodeProps::default());
    let g = scene
        .create_group(&[r1, r2], GroupOptions::default(), false)
        .unwrap();

    let expected = "\
<g transform=\"matrix(1 0 0 1 15 5)\">
  <rect transform=\"matrix(1 0 0 1 -10 0)\" x=\"-5\" y=\"-5\" width=\"10\" height=\"10\" fill=\"none\"/>
  <rect transform=\"matrix(1 0 0 1 10 0)\" x=\"-5\" y=\"-5\" width=\"10\" height=\"10\" fill=\"none\"/>
</g>
";
    assert_eq!(scene.to_svg(g).unwrap(), expected);
}

#[test]
fn appearance_flags_reach_the_markup() {
    let mut scene = Scene::new();
    let filled = rect(
        &mut scene,
        0.0,
        NodeProps {
            fill: Some(Rgba8::new(0, 0, 255, 255)),
            ..NodeProps::default()
        },
    );
    let hidden = scene.create_shape(
        Shape::Ellipse,
        Geometry::rect(20.0, 0.0, 10.0, 6.0),
        NodeProps {
            visible: false,
            ..NodeProps::default()
        },
    );
    let excluded = rect(
        &mut scene,
        40.0,
        NodeProps {
            exclude_from_export: true,
            ..NodeProps::default()
        },
    );
    let g = scene
        .create_group(
            &[filled, hidden, excluded],
            GroupOptions {
                props: NodeProps {
                    background: Some(Rgba8::new(255, 0, 0, 255)),
                    ..NodeProps::default()
                },
                ..GroupOptions::default()
            },
            false,
        )
        .unwrap();

    let svg = scene.to_svg(g).unwrap();
    let lines: Vec<&str> = svg.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[1],
        "  <rect x=\"-25\" y=\"-5\" width=\"50\" height=\"10\" fill=\"rgba(255,0,0,1)\"/>"
    );
    assert!(lines[2].contains("fill=\"rgba(0,0,255,1)\""));
    assert!(lines[3].starts_with("  <ellipse "));
    assert!(lines[3].contains("rx=\"5\" ry=\"3\""));
    assert!(lines[3].ends_with(" visibility=\"hidden\"/>"));
    assert_eq!(lines[4], "</g>");
}
