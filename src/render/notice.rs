use std::time::Instant;

use crate::game::{NoticeDuration, NoticeSink};

/// One-line message shown above the board.
///
/// A finite notice disappears on the first [`expire`](Self::expire) call
/// after its deadline. Pushing a new notice replaces the old one along with
/// its deadline.
#[derive(Debug, Clone, Default)]
pub struct NoticeBanner {
    message: Option<String>,
    expires_at: Option<Instant>,
}

impl NoticeBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn push_at(&mut self, message: &str, duration: NoticeDuration, now: Instant) {
        self.message = Some(message.to_string());
        self.expires_at = match duration {
            NoticeDuration::For(lifetime) => Some(now + lifetime),
            NoticeDuration::Infinite => None,
        };
    }

    /// Drop the message if its time is up. Returns true when it was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }
}

impl NoticeSink for NoticeBanner {
    fn push(&mut self, message: &str, duration: NoticeDuration) {
        self.push_at(message, duration, Instant::now());
    }

    fn clear(&mut self) {
        self.message = None;
        self.expires_at = None;
    }
}
