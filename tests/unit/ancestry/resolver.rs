use super::*;
use crate::{
    group::GroupOptions,
    scene::node::{Geometry, NodeProps, Shape},
};

fn rect(scene: &mut Scene, left: f64) -> NodeId {
    scene.create_shape(
        Shape::Rect,
        Geometry::rect(left, 0.0, 10.0, 10.0),
        NodeProps::default(),
    )
}

fn group(scene: &mut Scene, objects: &[NodeId]) -> NodeId {
    scene
        .create_group(objects, GroupOptions::default(), false)
        .unwrap()
}

#[test]
fn nested_chain_is_nearest_first() {
    let mut scene = Scene::new();
    let leaf = rect(&mut scene, 0.0);
    let c = group(&mut scene, &[leaf]);
    let b = group(&mut scene, &[c]);
    let a = group(&mut scene, &[b]);

    assert!(scene.is_descendant_of(c, Ancestor::Node(a)));
    assert!(!scene.is_descendant_of(a, Ancestor::Node(c)));
    assert_eq!(
        scene.ancestors(c, false).as_slice(),
        &[Ancestor::Node(b), Ancestor::Node(a)]
    );

    scene.add_to_canvas(&[a]);
    assert_eq!(
        scene.ancestors(c, false).as_slice(),
        &[Ancestor::Node(b), Ancestor::Node(a), Ancestor::Canvas]
    );
    assert_eq!(
        scene.ancestors(c, true).as_slice(),
        &[Ancestor::Node(b), Ancestor::Node(a)]
    );
    assert!(scene.is_descendant_of(c, Ancestor::Canvas));
}

#[test]
fn siblings_order_by_index() {
    let mut scene = Scene::new();
    let x = rect(&mut scene, 0.0);
    let y = rect(&mut scene, 20.0);
    let g = group(&mut scene, &[x, y]);

    let cmp = scene.find_common_ancestors(x, y, false);
    assert_eq!(cmp.common.as_slice(), &[Ancestor::Node(g)]);
    assert_eq!(cmp.fork.as_slice(), &[Ancestor::Node(x)]);
    assert_eq!(cmp.other_fork.as_slice(), &[Ancestor::Node(y)]);

    assert_eq!(scene.is_in_front_of(y, x), Some(true));
    assert_eq!(scene.is_in_front_of(x, y), Some(false));
}

#[test]
fn disjoint_trees_have_no_order() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let b = rect(&mut scene, 20.0);
    let _ga = group(&mut scene, &[a]);
    let _gb = group(&mut scene, &[b]);

    let cmp = scene.find_common_ancestors(a, b, false);
    assert!(cmp.common.is_empty());
    assert_eq!(cmp.fork.len(), 2);
    assert_eq!(cmp.other_fork.len(), 2);
    assert!(!scene.has_common_ancestors(a, b, false));
    assert_eq!(scene.is_in_front_of(a, b), None);
    assert_eq!(scene.is_in_front_of(b, a), None);
    assert_eq!(scene.is_in_front_of(a, a), None);
}

#[test]
fn identical_node_is_its_own_common_root() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let g = group(&mut scene, &[a]);
    let cmp = scene.find_common_ancestors(a, a, false);
    assert_eq!(cmp.common.as_slice(), &[Ancestor::Node(a), Ancestor::Node(g)]);
    assert!(cmp.fork.is_empty());
    assert!(cmp.other_fork.is_empty());
}

#[test]
fn root_that_tops_the_other_chain() {
    let mut scene = Scene::new();
    let leaf = rect(&mut scene, 0.0);
    let inner = group(&mut scene, &[leaf]);
    let top = group(&mut scene, &[inner]);

    let cmp = scene.find_common_ancestors(top, leaf, true);
    assert_eq!(cmp.common.as_slice(), &[Ancestor::Node(top)]);
    assert!(cmp.fork.is_empty());
    assert_eq!(
        cmp.other_fork.as_slice(),
        &[Ancestor::Node(leaf), Ancestor::Node(inner)]
    );
}

#[test]
fn nested_node_is_in_front_of_its_ancestor() {
    let mut scene = Scene::new();
    let leaf = rect(&mut scene, 0.0);
    let inner = group(&mut scene, &[leaf]);
    let outer = group(&mut scene, &[inner]);

    let cmp = scene.find_common_ancestors(leaf, outer, false);
    assert_eq!(cmp.common.first(), Some(&Ancestor::Node(outer)));
    assert_eq!(
        cmp.fork.as_slice(),
        &[Ancestor::Node(leaf), Ancestor::Node(inner)]
    );
    assert_eq!(scene.is_in_front_of(leaf, outer), Some(true));
    assert_eq!(scene.is_in_front_of(outer, leaf), Some(false));
}

#[test]
fn canvas_is_the_common_root_of_top_level_objects() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let b = rect(&mut scene, 20.0);
    let nested = rect(&mut scene, 40.0);
    let g = group(&mut scene, &[nested]);
    scene.add_to_canvas(&[g, a, b]);

    assert_eq!(scene.is_in_front_of(b, a), Some(true));
    assert_eq!(scene.is_in_front_of(nested, a), Some(false));
    assert_eq!(scene.is_in_front_of(a, nested), Some(true));
    assert!(scene.has_common_ancestors(a, nested, false));
    assert!(!scene.has_common_ancestors(a, nested, true));
}
