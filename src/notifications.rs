//! Transient user notices.
//!
//! The canvas never throws at the user. Rejected points, failed polls and
//! failed submissions become short-lived notices that the host UI displays
//! however it likes and that expire on their own.

use crate::constants::NOTICE_DURATION_MS;
use std::time::{Duration, Instant};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Info,
    Warning,
    Error,
}

impl NoticeVariant {
    pub fn default_duration(&self) -> Duration {
        match self {
            NoticeVariant::Info | NoticeVariant::Warning => {
                Duration::from_millis(NOTICE_DURATION_MS)
            }
            NoticeVariant::Error => Duration::from_millis(NOTICE_DURATION_MS * 5 / 3),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NoticeVariant::Info => "ℹ",
            NoticeVariant::Warning => "⚠",
            NoticeVariant::Error => "✗",
        }
    }
}

/// One auto-expiring message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub variant: NoticeVariant,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notice {
    fn new(message: impl Into<String>, variant: NoticeVariant) -> Self {
        Self {
            id: 0,
            message: message.into(),
            variant,
            created_at: Instant::now(),
            duration: variant.default_duration(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NoticeVariant::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NoticeVariant::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NoticeVariant::Error)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    /// Fraction of the lifetime left, from 1.0 (fresh) to 0.0 (expired)
    pub fn remaining_percent(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = self.created_at.elapsed().as_secs_f32();
        (1.0 - elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Ordered queue of live notices.
#[derive(Debug, Default)]
pub struct NoticeManager {
    notices: Vec<Notice>,
    next_id: u64,
    default_duration: Option<Duration>,
}

impl NoticeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the lifetime of warnings and infos pushed from now on.
    pub fn set_default_duration(&mut self, duration: Duration) {
        self.default_duration = Some(duration);
    }

    /// Queue a notice and return its id.
    pub fn push(&mut self, mut notice: Notice) -> u64 {
        self.next_id += 1;
        notice.id = self.next_id;
        if let Some(duration) = self.default_duration {
            if notice.variant != NoticeVariant::Error {
                notice.duration = duration;
            }
        }
        self.notices.push(notice);
        self.next_id
    }

    pub fn remove(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    /// Drop every notice whose lifetime has run out.
    pub fn prune_expired(&mut self) {
        self.prune_expired_at(Instant::now());
    }

    pub fn prune_expired_at(&mut self, now: Instant) {
        self.notices.retain(|n| !n.is_expired_at(now));
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn count(&self) -> usize {
        self.notices.len()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}
