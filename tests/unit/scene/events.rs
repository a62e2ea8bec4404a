use std::{cell::RefCell, rc::Rc};

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

#[test]
fn handlers_run_in_registration_order() {
    let mut scene = Scene::new();
    let r = rect(&mut scene, 0.0);
    let log = Rc::new(RefCell::new(Vec::new()));

    for tag in ["first", "second"] {
        let log = Rc::clone(&log);
        scene
            .on(r, EventKind::Modified, move |_| log.borrow_mut().push(tag))
            .unwrap();
    }
    let selected = {
        let log = Rc::clone(&log);
        scene
            .on(r, EventKind::Selected, move |_| log.borrow_mut().push("selected"))
            .unwrap()
    };

    scene.modify(r, |g| g.left = 4.0).unwrap();
    assert_eq!(*log.borrow(), vec!["first", "second"]);

    assert!(scene.off(r, selected));
    assert!(!scene.off(r, selected));
    scene.set_active_object(Some(r));
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn subscribing_to_a_stale_node_fails() {
    let mut scene = Scene::new();
    let r = rect(&mut scene, 0.0);
    scene.dispose(r).unwrap();
    let err = scene.on(r, EventKind::Modified, |_| {}).unwrap_err();
    assert!(matches!(err, SceneError::UnknownNode(id) if id == r));
}

#[test]
fn watching_never_duplicates_monitors() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let g = scene
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
    assert_eq!(scene.listener_count(a, EventKind::Modified), 1);

    scene.watch_object(g, a, true);
    scene.watch_object(g, a, true);
    for kind in MONITORED {
        assert_eq!(scene.listener_count(a, kind), 1);
    }

    scene.watch_object(g, a, false);
    for kind in MONITORED {
        assert_eq!(scene.listener_count(a, kind), 0);
    }
}

#[test]
fn membership_events_reach_group_and_child() {
    let mut scene = Scene::new();
    let a = rect(&mut scene, 0.0);
    let b = rect(&mut scene, 30.0);
    let g = scene
        .create_group(&[a], GroupOptions::default(), false)
        .unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));

    {
        let seen = Rc::clone(&seen);
        scene
            .on(g, EventKind::ObjectAdded, move |e| {
                if let NodeEvent::ObjectAdded { object, .. } = e {
                    seen.borrow_mut().push(("object_added", *object));
                }
            })
            .unwrap();
    }
    {
        let seen = Rc::clone(&seen);
        scene
            .on(b, EventKind::Added, move |e| {
                if let NodeEvent::Added { target, parent } = e {
                    assert_eq!(*parent, Ancestor::Node(g));
                    seen.borrow_mut().push(("added", *target));
                }
            })
            .unwrap();
    }
    {
        let seen = Rc::clone(&seen);
        scene
            .on(g, EventKind::Layout, move |e| {
                if let NodeEvent::Layout(layout) = e {
                    seen.borrow_mut().push(("layout", layout.group));
                }
            })
            .unwrap();
    }

    scene.add(g, &[b]).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![("object_added", b), ("added", b), ("layout", g)]
    );
}

#[test]
fn fire_restores_the_subscription_table() {
    let mut scene = Scene::new();
    let r = rect(&mut scene, 0.0);
    let count = Rc::new(RefCell::new(0));
    let outer = Rc::clone(&count);
    scene
        .on(r, EventKind::Modified, move |_| *outer.borrow_mut() += 1)
        .unwrap();

    scene.fire(r, &NodeEvent::Modified { target: r });
    assert_eq!(*count.borrow(), 1);
    assert_eq!(scene.listener_count(r, EventKind::Modified), 1);
}
