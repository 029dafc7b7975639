//! Single-slot toast notifications.
//!
//! Only one notification is ever visible. Showing a new one replaces the
//! previous one outright. Success and error toasts expire on their own;
//! loading toasts stay until something replaces them.

use std::time::{Duration, Instant};

pub const DEFAULT_SUCCESS_TTL: Duration = Duration::from_millis(2000);
pub const DEFAULT_ERROR_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct NotificationSlot {
    current: Option<Notification>,
    next_id: u64,
    success_ttl: Duration,
    error_ttl: Duration,
}

impl Default for NotificationSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_TTL, DEFAULT_ERROR_TTL)
    }
}

impl NotificationSlot {
    pub fn new(success_ttl: Duration, error_ttl: Duration) -> Self {
        Self {
            current: None,
            next_id: 1,
            success_ttl,
            error_ttl,
        }
    }

    /// Show a notification, dismissing whatever was visible. Returns its id.
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(Notification {
            id,
            kind,
            message: message.into(),
            shown_at: now,
        });
        id
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drop the visible notification if its lifetime is over.
    /// Returns `true` if something was dismissed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self.current.as_ref().is_some_and(|n| match self.ttl(n.kind) {
            Some(ttl) => now.saturating_duration_since(n.shown_at) >= ttl,
            None => false,
        });
        if expired {
            self.current = None;
        }
        expired
    }

    /// Time until the visible notification expires, if it ever does.
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        let n = self.current.as_ref()?;
        let ttl = self.ttl(n.kind)?;
        Some(ttl.saturating_sub(now.saturating_duration_since(n.shown_at)))
    }

    fn ttl(&self, kind: NotificationKind) -> Option<Duration> {
        match kind {
            NotificationKind::Loading => None,
            NotificationKind::Success => Some(self.success_ttl),
            NotificationKind::Error => Some(self.error_ttl),
        }
    }
}
