//! Area creation through the canvas: clicks, validation, submission.

use super::{click, pump_until};
use crate::helpers::{canvas_with, three_yards, RecordingSubmitter, StaticSource, TestSnapshotBuilder, square};
use std::sync::Arc;
use std::time::Duration;
use yardmap::canvas::{CanvasEvent, CanvasServices, MapCanvas};
use yardmap::notifications::NoticeVariant;
use yardmap::settings::CanvasSettings;
use yardmap::Point;

#[test]
fn test_clicks_collect_points_inside_target_yard() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });

    click(&mut canvas, 60.0, 60.0);
    click(&mut canvas, 90.0, 60.0);
    click(&mut canvas, 300.0, 60.0);

    assert_eq!(
        canvas.session().points(),
        &[Point::new(60.0, 60.0), Point::new(90.0, 60.0)]
    );
    let notice = canvas.notices().latest().unwrap();
    assert_eq!(notice.variant, NoticeVariant::Warning);
}

#[test]
fn test_drag_does_not_add_points() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });

    canvas.dispatch(CanvasEvent::PointerDown {
        pos: Point::new(60.0, 60.0),
    });
    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(80.0, 60.0),
    });
    canvas.dispatch(CanvasEvent::PointerUp {
        pos: Point::new(80.0, 60.0),
    });

    assert!(canvas.session().points().is_empty());
    assert_eq!(canvas.viewport().offset, Point::new(20.0, 0.0));
}

#[test]
fn test_clicks_mapped_through_origin_and_pan() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::Resize {
        width: 800.0,
        height: 600.0,
    });
    canvas.dispatch(CanvasEvent::PointerDown {
        pos: Point::new(0.0, 0.0),
    });
    canvas.dispatch(CanvasEvent::PointerMove {
        pos: Point::new(100.0, 0.0),
    });
    canvas.dispatch(CanvasEvent::PointerUp {
        pos: Point::new(100.0, 0.0),
    });
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });

    click(&mut canvas, 560.0, 360.0);
    assert_eq!(canvas.session().points(), &[Point::new(60.0, 60.0)]);
}

#[test]
fn test_unknown_yard_reports_error() {
    let mut canvas = canvas_with(three_yards());
    assert!(!canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 77 }));
    assert!(canvas.session().is_idle());
    assert_eq!(
        canvas.notices().latest().map(|n| n.variant),
        Some(NoticeVariant::Error)
    );
}

#[test]
fn test_synchronous_submission_into_offset_yard() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 2 });
    canvas.dispatch(CanvasEvent::SetAreaStatus("BROKEN".into()));
    click(&mut canvas, 121.0, 1.0);
    click(&mut canvas, 129.0, 1.0);
    click(&mut canvas, 129.0, 9.0);

    let submitter = RecordingSubmitter::default();
    let submission = canvas.submit_area(&submitter).unwrap();

    assert_eq!(submission.yard_id, 2);
    assert_eq!(submission.status, "BROKEN");
    assert_eq!(submission.boundary[0], Point::new(1.0, 1.0));
    assert!(canvas.session().is_idle());
    assert_eq!(
        canvas.notices().latest().map(|n| n.message.as_str()),
        Some("Area created")
    );
}

#[test]
fn test_submit_with_two_points_refused() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });
    canvas.dispatch(CanvasEvent::SetAreaStatus("READY".into()));
    click(&mut canvas, 60.0, 60.0);
    click(&mut canvas, 90.0, 60.0);

    let submitter = RecordingSubmitter::default();
    assert!(canvas.submit_area(&submitter).is_err());
    assert_eq!(submitter.count(), 0);
    assert_eq!(canvas.session().points().len(), 2);
}

#[test]
fn test_undo_clear_cancel_events() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });
    click(&mut canvas, 60.0, 60.0);
    click(&mut canvas, 70.0, 60.0);

    assert!(canvas.dispatch(CanvasEvent::UndoPoint));
    assert_eq!(canvas.session().points().len(), 1);
    canvas.dispatch(CanvasEvent::ClearPoints);
    assert!(canvas.session().points().is_empty());
    assert!(!canvas.session().is_idle());
    canvas.dispatch(CanvasEvent::CancelAreaCreation);
    assert!(canvas.session().is_idle());
}

#[test]
fn test_target_yard_vanishing_cancels_session() {
    let mut canvas = canvas_with(three_yards());
    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 3 });

    let smaller = TestSnapshotBuilder::new()
        .with_yard(1, "Wide", square(100.0))
        .build();
    canvas.refresh_with(&StaticSource::new(smaller));

    assert!(canvas.session().is_idle());
    assert_eq!(
        canvas.notices().latest().map(|n| n.variant),
        Some(NoticeVariant::Warning)
    );
}

#[test]
fn test_background_submission() {
    let submitter = Arc::new(RecordingSubmitter::default());
    let services = CanvasServices {
        source: Arc::new(StaticSource::new(three_yards())),
        submitter: submitter.clone(),
    };
    let mut canvas = MapCanvas::with_services(CanvasSettings::default(), services);
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("sub-1".into())));
    assert!(pump_until(&mut canvas, |c| c.snapshot().is_some(), Duration::from_secs(2)));

    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });
    canvas.dispatch(CanvasEvent::SetAreaStatus("READY".into()));
    click(&mut canvas, 60.0, 60.0);
    click(&mut canvas, 90.0, 60.0);
    click(&mut canvas, 90.0, 90.0);

    assert!(canvas.dispatch(CanvasEvent::SubmitArea));
    assert!(canvas.session().is_submitting());
    assert!(!canvas.dispatch(CanvasEvent::SubmitArea));

    assert!(pump_until(&mut canvas, |c| c.session().is_idle(), Duration::from_secs(2)));
    assert_eq!(submitter.count(), 1);
    assert_eq!(submitter.submissions.lock()[0].boundary.len(), 3);
}

#[test]
fn test_background_submission_failure_keeps_points() {
    let services = CanvasServices {
        source: Arc::new(StaticSource::new(three_yards())),
        submitter: Arc::new(RecordingSubmitter::failing()),
    };
    let mut canvas = MapCanvas::with_services(CanvasSettings::default(), services);
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("sub-1".into())));
    assert!(pump_until(&mut canvas, |c| c.snapshot().is_some(), Duration::from_secs(2)));

    canvas.dispatch(CanvasEvent::StartAreaCreation { yard_id: 1 });
    canvas.dispatch(CanvasEvent::SetAreaStatus("READY".into()));
    click(&mut canvas, 60.0, 60.0);
    click(&mut canvas, 90.0, 60.0);
    click(&mut canvas, 90.0, 90.0);
    canvas.dispatch(CanvasEvent::SubmitArea);

    assert!(pump_until(
        &mut canvas,
        |c| !c.session().is_submitting(),
        Duration::from_secs(2)
    ));
    assert_eq!(canvas.session().points().len(), 3);
    assert_eq!(
        canvas.notices().latest().map(|n| n.variant),
        Some(NoticeVariant::Error)
    );
}
