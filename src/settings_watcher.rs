//! Watches the settings file so edits apply without a restart.
//!
//! The parent directory is watched rather than the file itself, so the file
//! being created, replaced by an atomic rename, or deleted is still seen.

use crate::error::CanvasResult;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, warn};

pub use crate::settings::default_settings_path;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    Created,
    Modified,
    Deleted,
    Error(String),
}

pub struct SettingsWatcher {
    path: PathBuf,
    rx: Receiver<notify::Result<Event>>,
    _watcher: RecommendedWatcher,
}

impl SettingsWatcher {
    pub fn new(path: PathBuf) -> CanvasResult<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // The receiver only goes away with the watcher itself.
            let _ = tx.send(res);
        })?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), "Watching settings file");

        Ok(Self {
            path,
            rx,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next event for the settings file, if any. Bursts of raw events for
    /// one save are collapsed into the last meaningful one.
    pub fn poll(&mut self) -> Option<SettingsEvent> {
        let mut latest = None;
        while let Ok(res) = self.rx.try_recv() {
            match res {
                Ok(event) => {
                    if !event.paths.iter().any(|p| p == &self.path) {
                        continue;
                    }
                    let mapped = match event.kind {
                        EventKind::Create(_) => Some(SettingsEvent::Created),
                        EventKind::Modify(_) => Some(SettingsEvent::Modified),
                        EventKind::Remove(_) => Some(SettingsEvent::Deleted),
                        _ => None,
                    };
                    if mapped.is_some() {
                        latest = mapped;
                    }
                }
                Err(e) => {
                    warn!("Settings watcher error: {}", e);
                    return Some(SettingsEvent::Error(e.to_string()));
                }
            }
        }
        latest
    }
}
