//! Hover, pin and search selection through the canvas.

use crate::helpers::{canvas_with, square, three_yards, StaticSource, TestSnapshotBuilder};
use std::cell::RefCell;
use std::rc::Rc;
use yardmap::canvas::CanvasEvent;
use yardmap::types::MarkerId;
use yardmap::Point;

#[test]
fn test_hover_pin_and_search() {
    let mut canvas = canvas_with(three_yards());

    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(20.0, 20.0),
    });
    assert_eq!(canvas.active_marker(), Some(MarkerId::Bike(100)));

    canvas.dispatch(CanvasEvent::PointerDown {
        pos: Point::new(20.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::PointerUp {
        pos: Point::new(20.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(400.0, 400.0),
    });
    assert_eq!(canvas.active_marker(), Some(MarkerId::Bike(100)));

    assert_eq!(canvas.search_plate("ccc-3333"), Some(300));
    assert_eq!(canvas.active_marker(), Some(MarkerId::Bike(300)));
    let location = canvas.active_bike().unwrap();
    assert_eq!(location.yard.id, 3);
    assert_eq!(location.bike.plate, "CCC-3333");

    canvas.clear_search();
    assert_eq!(canvas.active_marker(), Some(MarkerId::Bike(100)));
}

#[test]
fn test_unknown_plate_changes_nothing() {
    let mut canvas = canvas_with(three_yards());
    assert_eq!(canvas.search_plate("ZZZ-0000"), None);
    assert_eq!(canvas.active_marker(), None);
}

#[test]
fn test_hover_suppressed_while_searching() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::SearchResult(Some(300)));
    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(20.0, 20.0),
    });
    assert_eq!(canvas.selection().hovered(), None);
    assert_eq!(canvas.active_marker(), Some(MarkerId::Bike(300)));
}

#[test]
fn test_tag_marker_detail() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(125.0, 5.0),
    });
    assert_eq!(canvas.active_marker(), Some(MarkerId::Tag(2)));
    assert!(canvas.active_bike().is_none());
    assert_eq!(canvas.active_binding().map(|b| b.tag.code.as_str()), Some("T-2"));
}

#[test]
fn test_selection_subscribers_see_changes_once() {
    let mut canvas = canvas_with(three_yards());
    let seen: Rc<RefCell<Vec<Option<MarkerId>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    canvas.subscribe_selection(move |active| sink.borrow_mut().push(*active));

    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(20.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(21.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::PointerLeave);

    assert_eq!(*seen.borrow(), vec![Some(MarkerId::Bike(100)), None]);
}

#[test]
fn test_pinned_marker_pruned_when_it_leaves_snapshot() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::PointerDown {
        pos: Point::new(20.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::PointerUp {
        pos: Point::new(20.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::SearchResult(Some(300)));

    let next = TestSnapshotBuilder::new()
        .with_yard(1, "Wide", square(100.0))
        .with_tag(2, (5.0, 5.0))
        .build();
    canvas.refresh_with(&StaticSource::new(next));

    assert_eq!(canvas.selection().pinned(), None);
    // The search result outlives the snapshot until it is cleared
    assert_eq!(canvas.selection().forced(), Some(MarkerId::Bike(300)));
    assert!(canvas.active_bike().is_none());
}

#[test]
fn test_switching_subsidiary_clears_pointer_selection() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::PointerDown {
        pos: Point::new(20.0, 20.0),
    });
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("sub-2".into())));
    assert_eq!(canvas.active_marker(), None);
    assert!(canvas.marker_at(Point::new(20.0, 20.0)).is_none());
}
