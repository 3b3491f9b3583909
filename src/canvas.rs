//! The yard map canvas: one owner for every piece of view state.
//!
//! Hosts feed raw input through [`MapCanvas::dispatch`] and draw whatever
//! [`MapCanvas::render`] returns. All mutation happens inside `dispatch`, on
//! the caller's thread; background fetches and submissions report back as
//! events that are drained on the next [`CanvasEvent::Tick`].
//!
//! ```text
//! pointer/wheel ──> PanGesture ──> ViewportState
//!               └─> MarkerIndex ──> SelectionState
//! click ──────────> AreaCreationSession
//! Tick ───────────> PollTimer ──> SnapshotSource (worker) ──> SnapshotFeed
//! ```

use crate::area_creation::{AreaCreationSession, AreaSubmission, AreaSubmitter, SubmitOutcome, SubmitTicket, TargetYard};
use crate::background::BackgroundExecutor;
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::YardLayout;
use crate::hit_testing::MarkerIndex;
use crate::input::{GestureOutcome, PanGesture, ViewportState};
use crate::notifications::{Notice, NoticeManager};
use crate::render::{Drawable, SceneInput, Surface, paint, render_scene};
use crate::selection::SelectionState;
use crate::settings::CanvasSettings;
use crate::settings_watcher::{SettingsEvent, SettingsWatcher};
use crate::snapshot::{FetchOutcome, FetchTicket, PollTimer, SnapshotFeed, SnapshotSource, Subscribers, SubscriptionId};
use crate::types::{BikeLocation, MarkerId, Point, SubsidiarySnapshot, TagBinding};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Input to the canvas reducer.
#[derive(Debug)]
pub enum CanvasEvent {
    PointerDown { pos: Point },
    PointerMove { pos: Point },
    PointerUp { pos: Point },
    PointerLeave,
    Wheel { pos: Point, delta_y: f64 },
    /// The canvas element changed size
    Resize { width: f64, height: f64 },
    ResetView,

    SelectSubsidiary(Option<String>),
    SnapshotFetched {
        ticket: FetchTicket,
        result: CanvasResult<SubsidiarySnapshot>,
    },

    StartAreaCreation { yard_id: u64 },
    SetAreaStatus(String),
    UndoPoint,
    ClearPoints,
    CancelAreaCreation,
    SubmitArea,
    AreaSubmitted {
        ticket: SubmitTicket,
        result: CanvasResult<()>,
    },

    /// Result of an external bike search; `None` clears it
    SearchResult(Option<u64>),

    /// Event-loop heartbeat: drives polling, background results, notice expiry
    Tick(Instant),
}

/// Collaborators used for background polling and submission.
#[derive(Clone)]
pub struct CanvasServices {
    pub source: Arc<dyn SnapshotSource>,
    pub submitter: Arc<dyn AreaSubmitter + Send + Sync>,
}

pub struct MapCanvas {
    settings: CanvasSettings,
    viewport: ViewportState,
    gesture: PanGesture,
    origin: Point,
    feed: SnapshotFeed,
    poll_timer: PollTimer,
    markers: MarkerIndex,
    session: AreaCreationSession,
    selection: SelectionState,
    under_pointer: Option<MarkerId>,
    notices: NoticeManager,
    selection_subscribers: Subscribers<Option<MarkerId>>,

    services: Option<CanvasServices>,
    executor: Option<BackgroundExecutor>,
    inbox: Rc<RefCell<Vec<CanvasEvent>>>,
    settings_watcher: Option<SettingsWatcher>,
}

impl Default for MapCanvas {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}

impl MapCanvas {
    /// A canvas without background services; snapshots arrive through
    /// [`MapCanvas::refresh_with`] or [`CanvasEvent::SnapshotFetched`].
    pub fn new(settings: CanvasSettings) -> Self {
        let settings = settings.sanitized();
        let mut notices = NoticeManager::new();
        notices.set_default_duration(settings.notice_duration());

        Self {
            gesture: PanGesture::new(settings.click_slop),
            poll_timer: PollTimer::new(settings.poll_interval()),
            settings,
            viewport: ViewportState::default(),
            origin: Point::ZERO,
            feed: SnapshotFeed::new(),
            markers: MarkerIndex::new(),
            session: AreaCreationSession::new(),
            selection: SelectionState::new(),
            under_pointer: None,
            notices,
            selection_subscribers: Subscribers::new(),
            services: None,
            executor: None,
            inbox: Rc::new(RefCell::new(Vec::new())),
            settings_watcher: None,
        }
    }

    /// A canvas that polls and submits on background workers.
    pub fn with_services(settings: CanvasSettings, services: CanvasServices) -> Self {
        let mut canvas = Self::new(settings);
        canvas.services = Some(services);
        canvas.executor = Some(BackgroundExecutor::with_default_workers());
        canvas
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// World position of the map origin.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn session(&self) -> &AreaCreationSession {
        &self.session
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn feed(&self) -> &SnapshotFeed {
        &self.feed
    }

    pub fn snapshot(&self) -> Option<&SubsidiarySnapshot> {
        self.feed.snapshot()
    }

    pub fn notices(&self) -> &NoticeManager {
        &self.notices
    }

    pub fn is_polling(&self) -> bool {
        self.poll_timer.is_running()
    }

    pub fn has_pending_work(&self) -> bool {
        self.executor.as_ref().is_some_and(|e| e.has_pending())
            || !self.inbox.borrow().is_empty()
    }

    pub fn active_marker(&self) -> Option<MarkerId> {
        self.selection.active()
    }

    /// Binding behind the active marker in the current snapshot.
    pub fn active_binding(&self) -> Option<&TagBinding> {
        let id = self.selection.active()?;
        self.snapshot()?.binding(id)
    }

    /// Location of the active marker when it is a bike.
    pub fn active_bike(&self) -> Option<BikeLocation<'_>> {
        match self.selection.active()? {
            MarkerId::Bike(id) => self.snapshot()?.find_bike(id),
            MarkerId::Tag(_) => None,
        }
    }

    // ========================================================================
    // Coordinates
    // ========================================================================

    pub fn screen_to_map(&self, pos: Point) -> Point {
        self.viewport.screen_to_world(pos) - self.origin
    }

    pub fn map_to_screen(&self, map: Point) -> Point {
        self.viewport.world_to_screen(map + self.origin)
    }

    /// Marker under a screen position.
    pub fn marker_at(&self, pos: Point) -> Option<MarkerId> {
        self.markers
            .query_point(self.screen_to_map(pos), self.settings.hit_slop)
    }

    // ========================================================================
    // Reducer
    // ========================================================================

    /// Apply one event. Returns true when the scene needs a redraw.
    pub fn dispatch(&mut self, event: CanvasEvent) -> bool {
        let before = self.selection.active();
        let changed = self.handle(event);
        self.publish_selection(before);
        changed
    }

    fn publish_selection(&mut self, before: Option<MarkerId>) {
        let after = self.selection.active();
        if before != after {
            debug!(?before, ?after, "Active marker changed");
            self.selection_subscribers.notify(&after);
        }
    }

    fn handle(&mut self, event: CanvasEvent) -> bool {
        match event {
            CanvasEvent::PointerDown { pos } => {
                self.gesture.pointer_down(pos);
                if let Some(id) = self.marker_at(pos) {
                    self.selection.on_pointer_down(id);
                    return true;
                }
                false
            }
            CanvasEvent::PointerMove { pos } => {
                let panned = self.gesture.pointer_move(&mut self.viewport, pos);
                let hovered = self.update_hover(pos);
                panned || hovered
            }
            CanvasEvent::PointerUp { pos } => {
                match self.gesture.pointer_up(&mut self.viewport, pos) {
                    GestureOutcome::Click(at) if self.session.target().is_some() => {
                        let map = self.screen_to_map(at);
                        if let Err(e) = self.session.add_point(map) {
                            self.report(&e);
                        }
                        true
                    }
                    GestureOutcome::DragEnd => true,
                    _ => false,
                }
            }
            CanvasEvent::PointerLeave => {
                let ended = self.gesture.pointer_leave() != GestureOutcome::None;
                let left = match self.under_pointer.take() {
                    Some(id) => self.selection.on_pointer_leave(id),
                    None => false,
                };
                ended || left
            }
            CanvasEvent::Wheel { pos, delta_y } => {
                let limits = self.settings.zoom_limits();
                self.gesture.wheel(&mut self.viewport, pos, delta_y, &limits)
            }
            CanvasEvent::Resize { width, height } => {
                self.resize(width, height);
                true
            }
            CanvasEvent::ResetView => {
                self.viewport.reset();
                true
            }

            CanvasEvent::SelectSubsidiary(subsidiary_id) => {
                self.switch_subsidiary(subsidiary_id, Instant::now());
                true
            }
            CanvasEvent::SnapshotFetched { ticket, result } => {
                matches!(
                    self.apply_fetch(ticket, result),
                    FetchOutcome::Applied(_) | FetchOutcome::Failed(_)
                )
            }

            CanvasEvent::StartAreaCreation { yard_id } => self.reported(|c| c.start_area_creation(yard_id)),
            CanvasEvent::SetAreaStatus(status) => {
                self.session.set_status(status);
                false
            }
            CanvasEvent::UndoPoint => self.session.undo_last().is_some(),
            CanvasEvent::ClearPoints => {
                self.session.clear();
                true
            }
            CanvasEvent::CancelAreaCreation => {
                self.session.cancel();
                true
            }
            CanvasEvent::SubmitArea => self.reported(|c| c.submit_area_in_background()),
            CanvasEvent::AreaSubmitted { ticket, result } => self.finish_submit(ticket, result),

            CanvasEvent::SearchResult(Some(bike_id)) => {
                self.selection.force(MarkerId::Bike(bike_id));
                true
            }
            CanvasEvent::SearchResult(None) => {
                self.selection.clear_forced();
                true
            }

            CanvasEvent::Tick(now) => self.tick(now),
        }
    }

    /// Run `op`, turning its error into a notice. True on success.
    fn reported(&mut self, op: impl FnOnce(&mut Self) -> CanvasResult<()>) -> bool {
        match op(self) {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    fn report(&mut self, err: &CanvasError) {
        if err.is_validation() {
            debug!("Rejected input: {}", err);
            self.notices
                .push(Notice::warning("Point is not inside the yard boundary"));
        } else if err.is_invariant_violation() {
            warn!("Refused: {}", err);
            self.notices.push(Notice::warning(err.to_string()));
        } else {
            error!("{}", err);
            self.notices.push(Notice::error(err.to_string()));
        }
    }

    fn update_hover(&mut self, pos: Point) -> bool {
        let hit = self.marker_at(pos);
        if hit == self.under_pointer {
            return false;
        }
        let mut changed = false;
        if let Some(previous) = self.under_pointer.take() {
            changed |= self.selection.on_pointer_leave(previous);
        }
        if let Some(id) = hit {
            changed |= self.selection.on_pointer_enter(id);
        }
        self.under_pointer = hit;
        changed
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Keep the map origin at the centre of a `width` x `height` canvas.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.origin = Point::new(width / 2.0, height / 2.0);
    }

    pub fn render(&self) -> Vec<Drawable> {
        render_scene(&SceneInput {
            snapshot: self.snapshot(),
            viewport: &self.viewport,
            origin: self.origin,
            session: &self.session,
            selection: &self.selection,
            yard_gap: self.settings.yard_gap,
            marker_radius: self.settings.marker_radius,
        })
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        paint(surface, &self.render());
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn select_subsidiary(&mut self, subsidiary_id: Option<String>, now: Instant) {
        let before = self.selection.active();
        self.switch_subsidiary(subsidiary_id, now);
        self.publish_selection(before);
    }

    fn switch_subsidiary(&mut self, subsidiary_id: Option<String>, now: Instant) {
        if self.feed.subsidiary_id() == subsidiary_id.as_deref() {
            return;
        }
        self.feed.select_subsidiary(subsidiary_id);
        self.markers.clear();
        self.under_pointer = None;
        self.selection.retain_present(&HashSet::new());
        self.session.cancel();

        if self.feed.subsidiary_id().is_some() {
            self.poll_timer.start(now);
        } else {
            self.poll_timer.cancel();
        }
    }

    /// Fetch synchronously from `source` and apply the result.
    pub fn refresh_with(&mut self, source: &dyn SnapshotSource) -> Option<FetchOutcome> {
        let ticket = self.feed.begin_fetch()?;
        let result = source
            .fetch(&ticket.subsidiary_id)
            .map_err(CanvasError::network);
        let before = self.selection.active();
        let outcome = self.apply_fetch(ticket, result);
        self.publish_selection(before);
        Some(outcome)
    }

    fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: CanvasResult<SubsidiarySnapshot>,
    ) -> FetchOutcome {
        let outcome = self.feed.complete(ticket, result);
        match &outcome {
            FetchOutcome::Applied(snapshot) => {
                let snapshot = Arc::clone(snapshot);
                self.on_snapshot(&snapshot);
            }
            // Already logged by the feed
            FetchOutcome::Failed(err) => {
                self.notices.push(Notice::error(err.to_string()));
            }
            FetchOutcome::Stale | FetchOutcome::Closed => {}
        }
        outcome
    }

    fn on_snapshot(&mut self, snapshot: &SubsidiarySnapshot) {
        self.reindex(snapshot);
        if self.selection.retain_present(&snapshot.marker_ids()) {
            debug!("Selection pruned after snapshot");
        }
        if self.under_pointer.is_some_and(|id| self.markers.get(id).is_none()) {
            self.under_pointer = None;
        }
    }

    /// Rebuild everything derived from the snapshot layout.
    fn reindex(&mut self, snapshot: &SubsidiarySnapshot) {
        self.markers
            .rebuild(snapshot, self.settings.yard_gap, self.settings.marker_radius);

        let Some(target_id) = self.session.target().map(|t| t.id) else {
            return;
        };
        match snapshot.find_yard(target_id) {
            Some((index, entry)) => {
                let layout = YardLayout::compute(snapshot.yards(), self.settings.yard_gap);
                let offset = layout.at(index).unwrap_or(0.0);
                self.session.refresh_target(&entry.yard, offset);
            }
            None => {
                warn!(yard_id = target_id, "Target yard left the snapshot");
                self.session.cancel();
                self.notices
                    .push(Notice::warning("The selected yard is no longer available"));
            }
        }
    }

    fn request_snapshot(&mut self) {
        let (Some(services), Some(executor)) = (&self.services, &self.executor) else {
            return;
        };
        let Some(ticket) = self.feed.begin_fetch() else {
            debug!("Skipping poll tick, fetch outstanding or nothing selected");
            return;
        };

        let source = Arc::clone(&services.source);
        let subsidiary_id = ticket.subsidiary_id.clone();
        let inbox = Rc::clone(&self.inbox);
        executor.spawn(
            "fetch_snapshot",
            move || {
                source
                    .fetch(&subsidiary_id)
                    .map_err(|e| format!("{:#}", e))
            },
            move |result| {
                inbox.borrow_mut().push(CanvasEvent::SnapshotFetched {
                    ticket,
                    result: result.map_err(CanvasError::Network),
                });
            },
        );
    }

    pub fn subscribe_snapshot(
        &mut self,
        callback: impl FnMut(&Arc<SubsidiarySnapshot>) + 'static,
    ) -> SubscriptionId {
        self.feed.subscribe(callback)
    }

    pub fn unsubscribe_snapshot(&mut self, id: SubscriptionId) -> bool {
        self.feed.unsubscribe(id)
    }

    /// Called with the new active marker whenever it changes.
    pub fn subscribe_selection(
        &mut self,
        callback: impl FnMut(&Option<MarkerId>) + 'static,
    ) -> SubscriptionId {
        self.selection_subscribers.subscribe(callback)
    }

    pub fn unsubscribe_selection(&mut self, id: SubscriptionId) -> bool {
        self.selection_subscribers.unsubscribe(id)
    }

    // ========================================================================
    // Area creation
    // ========================================================================

    /// Begin drawing a new area inside `yard_id` of the current snapshot.
    pub fn start_area_creation(&mut self, yard_id: u64) -> CanvasResult<()> {
        let snapshot = self
            .feed
            .current()
            .ok_or(CanvasError::UnknownYard(yard_id))?;
        let (index, entry) = snapshot
            .find_yard(yard_id)
            .ok_or(CanvasError::UnknownYard(yard_id))?;
        let layout = YardLayout::compute(snapshot.yards(), self.settings.yard_gap);
        let offset = layout.at(index).unwrap_or(0.0);

        self.session.select_yard(TargetYard::new(&entry.yard, offset));
        Ok(())
    }

    /// Add a point at a screen position, as a click would.
    pub fn add_area_point(&mut self, pos: Point) -> CanvasResult<usize> {
        let map = self.screen_to_map(pos);
        self.session.add_point(map)
    }

    /// Submit synchronously through `submitter`.
    pub fn submit_area(&mut self, submitter: &dyn AreaSubmitter) -> CanvasResult<AreaSubmission> {
        match self.session.submit(submitter) {
            Ok(submission) => {
                self.on_area_created();
                Ok(submission)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    fn submit_area_in_background(&mut self) -> CanvasResult<()> {
        let (Some(services), Some(executor)) = (&self.services, &self.executor) else {
            return Err(CanvasError::from("No area submitter configured"));
        };
        let ticket = self.session.begin_submit()?;

        let submitter = Arc::clone(&services.submitter);
        let submission = ticket.submission.clone();
        let inbox = Rc::clone(&self.inbox);
        executor.spawn(
            "submit_area",
            move || {
                submitter
                    .submit_area(&submission)
                    .map_err(|e| format!("{:#}", e))
            },
            move |result| {
                inbox.borrow_mut().push(CanvasEvent::AreaSubmitted {
                    ticket,
                    result: result.map_err(CanvasError::Network),
                });
            },
        );
        Ok(())
    }

    fn finish_submit(&mut self, ticket: SubmitTicket, result: CanvasResult<()>) -> bool {
        match self.session.finish_submit(ticket, result) {
            SubmitOutcome::Submitted(_) => {
                self.on_area_created();
                true
            }
            SubmitOutcome::Failed(e) => {
                self.report(&e);
                true
            }
            SubmitOutcome::Stale => false,
        }
    }

    fn on_area_created(&mut self) {
        self.notices.push(Notice::info("Area created"));
        // Pull the new area in on the next tick.
        if self.poll_timer.is_running() {
            self.poll_timer.start(Instant::now());
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Force-select the bike with `plate` in the current snapshot.
    pub fn search_plate(&mut self, plate: &str) -> Option<u64> {
        let bike_id = self.snapshot()?.find_bike_by_plate(plate)?.bike.id;
        self.set_search_result(Some(bike_id));
        Some(bike_id)
    }

    /// Install (or with `None`, clear) the bike an external search resolved.
    pub fn set_search_result(&mut self, bike_id: Option<u64>) {
        self.dispatch(CanvasEvent::SearchResult(bike_id));
    }

    pub fn clear_search(&mut self) {
        self.set_search_result(None);
    }

    // ========================================================================
    // Heartbeat
    // ========================================================================

    fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.poll_timer.fire_if_due(now) {
            self.request_snapshot();
        }

        if let Some(executor) = &self.executor {
            executor.process_results();
        }
        let completed: Vec<CanvasEvent> = self.inbox.borrow_mut().drain(..).collect();
        for event in completed {
            changed |= self.handle(event);
        }

        changed |= self.check_settings_reload();

        let before = self.notices.count();
        self.notices.prune_expired_at(now);
        changed || self.notices.count() != before
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn apply_settings(&mut self, settings: CanvasSettings) {
        let settings = settings.sanitized();
        self.gesture.set_click_slop(settings.click_slop);
        self.poll_timer.set_interval(settings.poll_interval());
        self.notices.set_default_duration(settings.notice_duration());

        let layout_changed = settings.yard_gap != self.settings.yard_gap
            || settings.marker_radius != self.settings.marker_radius;
        self.settings = settings;

        if layout_changed {
            if let Some(snapshot) = self.feed.current() {
                self.reindex(&snapshot);
            }
        }
        debug!(settings = ?self.settings, "Settings applied");
    }

    /// Reload settings from `path` whenever it changes.
    pub fn watch_settings(&mut self, path: PathBuf) -> CanvasResult<()> {
        self.settings_watcher = Some(SettingsWatcher::new(path)?);
        Ok(())
    }

    fn check_settings_reload(&mut self) -> bool {
        let Some(watcher) = self.settings_watcher.as_mut() else {
            return false;
        };
        let Some(event) = watcher.poll() else {
            return false;
        };
        let path = watcher.path().to_path_buf();

        match event {
            SettingsEvent::Modified | SettingsEvent::Created => {
                info!("Settings file changed, reloading...");
                match CanvasSettings::load_from(&path) {
                    Ok(settings) => {
                        self.apply_settings(settings);
                        self.notices.push(Notice::info("Settings reloaded"));
                    }
                    Err(e) => {
                        warn!("Keeping previous settings: {}", e);
                        self.notices
                            .push(Notice::warning(format!("Invalid settings file: {}", e)));
                    }
                }
                true
            }
            SettingsEvent::Deleted => {
                warn!("Settings file deleted");
                self.notices.push(Notice::warning("Settings file deleted"));
                true
            }
            SettingsEvent::Error(e) => {
                error!("Settings watch error: {}", e);
                false
            }
        }
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stop polling and drop every pending completion. Late results are
    /// never applied after this.
    pub fn shutdown(&mut self) {
        self.poll_timer.cancel();
        self.feed.shutdown();
        self.executor = None;
        self.inbox.borrow_mut().clear();
        self.settings_watcher = None;
        self.selection_subscribers.clear();
        info!("Canvas shut down");
    }
}
