//! Toast notifications
//!
//! Owned by the application and handed to screens explicitly; screens push,
//! the main loop prunes and renders. Three levels: success, warning (partial
//! success and local validation), error.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    raised_at: Instant,
}

/// Bounded queue of short-lived notifications
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&mut self, kind: ToastKind, message: String) {
        self.queue.push_back(Toast {
            kind,
            message,
            raised_at: Instant::now(),
        });
        while self.queue.len() > MAX_VISIBLE {
            self.queue.pop_front();
        }
    }

    /// Drop expired toasts; called once per draw
    pub fn prune(&mut self) {
        let now = Instant::now();
        self.queue
            .retain(|toast| now.duration_since(toast.raised_at) < TOAST_TTL);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_bounded() {
        let mut toasts = Toasts::new();
        for i in 0..10 {
            toasts.success(format!("toast {}", i));
        }
        assert_eq!(toasts.iter().count(), MAX_VISIBLE);
        assert_eq!(toasts.iter().next().unwrap().message, "toast 6");
    }

    #[test]
    fn test_levels() {
        let mut toasts = Toasts::new();
        toasts.warning("created but item list failed");
        assert_eq!(toasts.iter().next().unwrap().kind, ToastKind::Warning);
    }
}
