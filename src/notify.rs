//! Auto-dismissing notifications.

use std::time::{Duration, Instant};

/// How long a toast stays on screen
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

impl Severity {
    /// Background color as RGB
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Severity::Success => [0x10, 0xb9, 0x81],
            Severity::Error => [0xef, 0x44, 0x44],
            Severity::Info => [0x3b, 0x82, 0xf6],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), severity: Severity::Success }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), severity: Severity::Error }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), severity: Severity::Info }
    }
}

/// The toast container. Created once per window and reused for every notice.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<(Notice, Instant)>,
}

impl Toasts {
    pub fn push(&mut self, notice: Notice, now: Instant) {
        match notice.severity {
            Severity::Error => tracing::warn!(message = %notice.message, "notice"),
            _ => tracing::info!(message = %notice.message, "notice"),
        }
        self.items.push((notice, now));
    }

    /// Drops toasts older than [`TOAST_LIFETIME`].
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|(_, shown)| now.saturating_duration_since(*shown) < TOAST_LIFETIME);
    }

    /// Live toasts, oldest on top.
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().map(|(n, _)| n)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
