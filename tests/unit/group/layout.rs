use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    group::GroupOptions,
    scene::node::{NodeProps, Shape},
};

fn shape(scene: &mut Scene, geometry: Geometry) -> NodeId {
    scene.create_shape(Shape::Rect, geometry, NodeProps::default())
}

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn fit_content_wraps_children() {
    let mut scene = Scene::new();
    let r1 = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let r2 = shape(&mut scene, Geometry::rect(20.0, 10.0, 10.0, 20.0));
    let g = scene
        .create_group(&[r1, r2], GroupOptions::default(), false)
        .unwrap();

    let geo = *scene.geometry(g).unwrap();
    assert_eq!((geo.width, geo.height), (30.0, 30.0));
    assert_eq!((geo.left, geo.top), (0.0, 0.0));
    assert!(close(scene.center_point(g).unwrap(), Point::new(15.0, 15.0)));
    assert!(close(scene.center_point(r1).unwrap(), Point::new(5.0, 5.0)));
    assert!(close(scene.center_point(r2).unwrap(), Point::new(25.0, 20.0)));
    assert!(scene.group_data(g).unwrap().first_layout_done());
}

#[test]
fn rotated_children_use_their_rotated_extent() {
    let mut scene = Scene::new();
    let r = shape(
        &mut scene,
        Geometry::rect(0.0, 0.0, 10.0, 20.0)
            .with_origin(crate::foundation::core::Origin::CENTER)
            .with_angle(90.0),
    );
    let g = scene
        .create_group(&[r], GroupOptions::default(), false)
        .unwrap();
    let geo = scene.geometry(g).unwrap();
    assert!((geo.width - 20.0).abs() < 1e-9);
    assert!((geo.height - 10.0).abs() < 1e-9);
    assert!(close(scene.center_point(g).unwrap(), Point::ZERO));
}

#[test]
fn reactive_layout_waits_for_initialization() {
    let mut scene = Scene::new();
    let r = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let g = scene
        .create_group(&[r], GroupOptions::default(), false)
        .unwrap();
    scene.group_data_mut(g).unwrap().first_layout_done = false;
    let layouts = Rc::new(RefCell::new(0));
    let count = Rc::clone(&layouts);
    scene
        .on(g, EventKind::Layout, move |_| *count.borrow_mut() += 1)
        .unwrap();

    let before = *scene.geometry(g).unwrap();
    scene
        .trigger_layout(
            g,
            ImperativeLayout {
                overrides: PartialLayoutResult {
                    width: Some(99.0),
                    ..PartialLayoutResult::default()
                },
                ..ImperativeLayout::default()
            },
        )
        .unwrap();
    assert_eq!(*scene.geometry(g).unwrap(), before);
    assert_eq!(*layouts.borrow(), 0);
}

#[test]
fn imperative_overrides_merge_over_measured_box() {
    let mut scene = Scene::new();
    let r = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let g = scene
        .create_group(&[r], GroupOptions::default(), false)
        .unwrap();
    scene
        .trigger_layout(
            g,
            ImperativeLayout {
                layout: None,
                overrides: PartialLayoutResult {
                    width: Some(40.0),
                    ..PartialLayoutResult::default()
                },
            },
        )
        .unwrap();

    let geo = *scene.geometry(g).unwrap();
    assert_eq!((geo.width, geo.height), (40.0, 10.0));
    assert!((geo.left + 15.0).abs() < 1e-9);
    assert!(close(scene.center_point(g).unwrap(), Point::new(5.0, 5.0)));
    assert!(close(scene.center_point(r).unwrap(), Point::new(5.0, 5.0)));
}

#[test]
fn overrides_stay_on_the_addressed_group() {
    let mut scene = Scene::new();
    let leaf = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let inner = scene
        .create_group(&[leaf], GroupOptions::default(), false)
        .unwrap();
    let outer = scene
        .create_group(&[inner], GroupOptions::default(), false)
        .unwrap();

    scene
        .trigger_layout(
            inner,
            ImperativeLayout {
                layout: None,
                overrides: PartialLayoutResult {
                    center_x: Some(50.0),
                    ..PartialLayoutResult::default()
                },
            },
        )
        .unwrap();

    assert!(close(scene.center_point(inner).unwrap(), Point::new(55.0, 5.0)));
    assert!(close(scene.center_point(outer).unwrap(), Point::new(55.0, 5.0)));
    assert!(close(scene.center_point(leaf).unwrap(), Point::new(5.0, 5.0)));
    assert_eq!(scene.geometry(outer).unwrap().width, 10.0);
}

#[test]
fn initial_angle_is_applied_after_measuring() {
    let mut scene = Scene::new();
    let r = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let g = scene
        .create_group(
            &[r],
            GroupOptions {
                angle: Some(30.0),
                ..GroupOptions::default()
            },
            false,
        )
        .unwrap();
    let geo = *scene.geometry(g).unwrap();
    assert_eq!(geo.angle, 30.0);
    assert!(geo.left.abs() < 1e-9 && geo.top.abs() < 1e-9);
    assert_eq!((geo.width, geo.height), (10.0, 10.0));
    assert!(close(
        scene.center_point(r).unwrap(),
        scene.center_point(g).unwrap()
    ));
}

#[test]
fn explicit_size_centers_content() {
    let mut scene = Scene::new();
    let r = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let g = scene
        .create_group(
            &[r],
            GroupOptions {
                left: Some(-20.0),
                top: Some(-20.0),
                width: Some(50.0),
                height: Some(50.0),
                ..GroupOptions::default()
            },
            false,
        )
        .unwrap();
    let geo = *scene.geometry(g).unwrap();
    assert_eq!((geo.left, geo.top, geo.width, geo.height), (-20.0, -20.0, 50.0, 50.0));
    let center = scene.center_point(g).unwrap();
    assert!(close(center, Point::new(5.0, 5.0)));
    assert!(close(scene.center_point(r).unwrap(), center));
}

#[test]
fn layout_propagates_to_ancestors_with_path() {
    let mut scene = Scene::new();
    let a = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let inner = scene
        .create_group(
            &[a],
            GroupOptions {
                sub_target_check: true,
                interactive: true,
                ..GroupOptions::default()
            },
            false,
        )
        .unwrap();
    let outer = scene
        .create_group(&[inner], GroupOptions::default(), false)
        .unwrap();
    let paths = Rc::new(RefCell::new(Vec::new()));
    for g in [inner, outer] {
        let paths = Rc::clone(&paths);
        scene
            .on(g, EventKind::Layout, move |e| {
                if let NodeEvent::Layout(layout) = e {
                    paths
                        .borrow_mut()
                        .push((layout.group, layout.context.path.clone()));
                }
            })
            .unwrap();
    }

    scene.modify(a, |g| g.width = 30.0).unwrap();

    assert_eq!(
        *paths.borrow(),
        vec![(inner, vec![]), (outer, vec![inner])]
    );
    assert_eq!(scene.geometry(inner).unwrap().width, 30.0);
    assert_eq!(scene.geometry(outer).unwrap().width, 30.0);
    assert!(close(scene.center_point(outer).unwrap(), Point::new(15.0, 5.0)));
}

#[test]
fn layout_event_reports_translation() {
    let mut scene = Scene::new();
    let r1 = shape(&mut scene, Geometry::rect(0.0, 0.0, 10.0, 10.0));
    let r2 = shape(&mut scene, Geometry::rect(20.0, 0.0, 10.0, 10.0));
    let g = scene
        .create_group(&[r1], GroupOptions::default(), false)
        .unwrap();
    let diffs = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&diffs);
    scene
        .on(g, EventKind::Layout, move |e| {
            if let NodeEvent::Layout(layout) = e {
                sink.borrow_mut().push(layout.diff);
            }
        })
        .unwrap();

    scene.add(g, &[r2]).unwrap();
    assert_eq!(*diffs.borrow(), vec![Vec2::new(-10.0, 0.0)]);
}
