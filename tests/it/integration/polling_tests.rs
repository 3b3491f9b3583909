//! Snapshot polling through background workers.

use super::pump_until;
use crate::helpers::{
    square, three_yards, FailingSource, RecordingSubmitter, StaticSource, TestSnapshotBuilder,
};
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use yardmap::canvas::{CanvasEvent, CanvasServices, MapCanvas};
use yardmap::notifications::NoticeVariant;
use yardmap::settings::CanvasSettings;
use yardmap::snapshot::SnapshotSource;
use yardmap::types::SubsidiarySnapshot;

/// Serves a different snapshot per subsidiary, optionally slowly.
struct KeyedSource {
    snapshots: HashMap<String, SubsidiarySnapshot>,
    delay: Duration,
}

impl SnapshotSource for KeyedSource {
    fn fetch(&self, subsidiary_id: &str) -> anyhow::Result<SubsidiarySnapshot> {
        std::thread::sleep(self.delay);
        self.snapshots
            .get(subsidiary_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown subsidiary {}", subsidiary_id))
    }
}

fn keyed_canvas(delay: Duration) -> MapCanvas {
    let mut snapshots = HashMap::new();
    snapshots.insert("A".to_string(), three_yards());
    snapshots.insert(
        "B".to_string(),
        TestSnapshotBuilder::new()
            .with_yard(50, "Annex", square(30.0))
            .build(),
    );
    let services = CanvasServices {
        source: Arc::new(KeyedSource { snapshots, delay }),
        submitter: Arc::new(RecordingSubmitter::default()),
    };
    MapCanvas::with_services(CanvasSettings::default(), services)
}

#[test]
fn test_selecting_subsidiary_starts_polling() {
    let source = Arc::new(StaticSource::new(three_yards()));
    let services = CanvasServices {
        source: source.clone(),
        submitter: Arc::new(RecordingSubmitter::default()),
    };
    let mut canvas = MapCanvas::with_services(CanvasSettings::default(), services);
    assert!(!canvas.is_polling());

    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("sub-1".into())));
    assert!(canvas.is_polling());
    assert!(pump_until(&mut canvas, |c| c.snapshot().is_some(), Duration::from_secs(2)));
    assert_eq!(source.calls(), 1);

    canvas.dispatch(CanvasEvent::SelectSubsidiary(None));
    assert!(!canvas.is_polling());
    assert!(canvas.snapshot().is_none());
}

#[test]
fn test_next_poll_waits_for_interval() {
    let source = Arc::new(StaticSource::new(three_yards()));
    let services = CanvasServices {
        source: source.clone(),
        submitter: Arc::new(RecordingSubmitter::default()),
    };
    let mut canvas = MapCanvas::with_services(CanvasSettings::default(), services);
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("sub-1".into())));
    assert!(pump_until(&mut canvas, |c| c.snapshot().is_some(), Duration::from_secs(2)));

    // Well inside the five second interval
    for _ in 0..10 {
        canvas.dispatch(CanvasEvent::Tick(Instant::now()));
    }
    assert_eq!(source.calls(), 1);

    canvas.dispatch(CanvasEvent::Tick(Instant::now() + Duration::from_secs(6)));
    assert!(pump_until(&mut canvas, |_| source.calls() == 2, Duration::from_secs(2)));
}

#[test]
fn test_switching_subsidiary_drops_stale_response() {
    let mut canvas = keyed_canvas(Duration::from_millis(30));
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("A".into())));
    canvas.dispatch(CanvasEvent::Tick(Instant::now()));
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("B".into())));

    assert!(pump_until(
        &mut canvas,
        |c| c.snapshot().is_some() && !c.has_pending_work(),
        Duration::from_secs(2)
    ));
    let snapshot = canvas.snapshot().unwrap();
    assert_eq!(snapshot.yards.len(), 1);
    assert_eq!(snapshot.yards[0].yard.id, 50);
}

#[test]
fn test_failed_poll_keeps_polling() {
    let mut canvas = keyed_canvas(Duration::ZERO);
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("A".into())));
    assert!(pump_until(&mut canvas, |c| c.snapshot().is_some(), Duration::from_secs(2)));

    // An unknown subsidiary fails every fetch
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("missing".into())));
    assert!(pump_until(
        &mut canvas,
        |c| !c.feed().is_fetching() && !c.has_pending_work(),
        Duration::from_secs(2)
    ));
    assert!(canvas.snapshot().is_none());
    assert!(canvas.is_polling());
}

#[test]
fn test_failed_poll_reports_error_and_retries() {
    let source = Arc::new(FailingSource::default());
    let services = CanvasServices {
        source: source.clone(),
        submitter: Arc::new(RecordingSubmitter::default()),
    };
    let mut canvas = MapCanvas::with_services(CanvasSettings::default(), services);
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("sub-1".into())));
    assert!(pump_until(
        &mut canvas,
        |c| source.calls() == 1 && !c.feed().is_fetching() && !c.has_pending_work(),
        Duration::from_secs(2)
    ));

    let notice = canvas.notices().latest().unwrap();
    assert_eq!(notice.variant, NoticeVariant::Error);
    assert!(notice.message.contains("connection refused"));
    assert!(canvas.snapshot().is_none());

    canvas.dispatch(CanvasEvent::Tick(Instant::now() + Duration::from_secs(6)));
    assert!(pump_until(&mut canvas, |_| source.calls() == 2, Duration::from_secs(2)));
}

#[test]
fn test_shutdown_discards_in_flight_fetch() {
    let mut canvas = keyed_canvas(Duration::from_millis(50));
    canvas.dispatch(CanvasEvent::SelectSubsidiary(Some("A".into())));
    canvas.dispatch(CanvasEvent::Tick(Instant::now()));
    canvas.shutdown();

    std::thread::sleep(Duration::from_millis(100));
    canvas.dispatch(CanvasEvent::Tick(Instant::now()));
    assert!(canvas.snapshot().is_none());
    assert!(!canvas.is_polling());
    assert!(!canvas.has_pending_work());
}
