//! One-shot dismissible alert for the send-now action.
//!
//! A banner closes itself once its time-to-live has passed, or earlier when
//! the user dismisses it. Whichever happens first wins; the other is a no-op.

use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn title(self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct BannerSlot {
    current: Option<Banner>,
    ttl: Duration,
}

impl Default for BannerSlot {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_TTL)
    }
}

impl BannerSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Replace whatever is showing.
    pub fn show(&mut self, severity: Severity, message: impl Into<String>, now: Instant) {
        self.current = Some(Banner {
            severity,
            message: message.into(),
            shown_at: now,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the banner if its time is up. Returns true when one was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|b| b.shown_at + self.ttl)
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}
