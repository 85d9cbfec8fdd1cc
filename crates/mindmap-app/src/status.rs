use std::collections::VecDeque;
use std::time::Duration;

use web_time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    /// How long a message of this kind stays in the status bar.
    pub const fn lifetime(self) -> Duration {
        match self {
            Self::Info => Duration::from_millis(3000),
            Self::Success => Duration::from_millis(3500),
            Self::Error => Duration::from_millis(6000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMsg {
    pub kind: StatusKind,
    pub text: String,
    /// Wall-clock time the message was raised, `HH:MM:SS`.
    pub stamp: String,
    pub at: Instant,
}

impl StatusMsg {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.at) > self.kind.lifetime()
    }
}

/// Transient messages shown in the status bar, newest last.
///
/// Raising a message that is already queued moves it to the back with a fresh
/// timestamp, so a failing auto-save or a repeated paste does not stack copies.
#[derive(Default)]
pub struct StatusQueue {
    q: VecDeque<StatusMsg>,
}

impl StatusQueue {
    pub fn new() -> Self {
        Self { q: VecDeque::new() }
    }

    pub fn push(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.push_at(kind, text, Instant::now());
    }

    fn push_at(&mut self, kind: StatusKind, text: impl Into<String>, at: Instant) {
        let text = text.into();
        match kind {
            StatusKind::Error => log::warn!("{text}"),
            StatusKind::Info | StatusKind::Success => log::info!("{text}"),
        }
        self.q.retain(|m| m.kind != kind || m.text != text);
        self.q.push_back(StatusMsg {
            kind,
            text,
            stamp: crate::util::clock_stamp(),
            at,
        });
    }

    pub fn push_info(&mut self, text: impl Into<String>) {
        self.push(StatusKind::Info, text);
    }
    pub fn push_success(&mut self, text: impl Into<String>) {
        self.push(StatusKind::Success, text);
    }
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.push(StatusKind::Error, text);
    }

    pub fn retain_active(&mut self) {
        self.retain_active_now(Instant::now());
    }

    pub fn retain_active_now(&mut self, now: Instant) {
        self.q.retain(|m| !m.is_expired_at(now));
    }

    /// Most recent message still on screen.
    pub fn latest(&self) -> Option<&StatusMsg> {
        self.q.back()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sq: &StatusQueue) -> Vec<&str> {
        sq.q.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn save_errors_outlive_confirmations() {
        let start = Instant::now();
        let mut sq = StatusQueue::new();
        sq.push_at(StatusKind::Success, "Map saved", start);
        sq.push_at(StatusKind::Error, "Saving the note failed: disk full", start);
        sq.push_at(StatusKind::Info, "Copied \"Budget\"", start);
        assert_eq!(sq.latest().unwrap().stamp.len(), 8);

        sq.retain_active_now(start + Duration::from_millis(3200));
        assert_eq!(texts(&sq), vec!["Map saved", "Saving the note failed: disk full"]);

        sq.retain_active_now(start + Duration::from_millis(4000));
        let latest = sq.latest().unwrap();
        assert_eq!(latest.kind, StatusKind::Error);
        assert_eq!(latest.text, "Saving the note failed: disk full");

        sq.retain_active_now(start + StatusKind::Error.lifetime() + Duration::from_millis(1));
        assert!(sq.is_empty());
    }

    #[test]
    fn repeated_message_is_refreshed_not_stacked() {
        let start = Instant::now();
        let mut sq = StatusQueue::new();
        sq.push_at(StatusKind::Info, "No image on the clipboard", start);
        sq.push_at(StatusKind::Success, "Added image \"Sketch\"", start);
        let later = start + Duration::from_millis(2000);
        sq.push_at(StatusKind::Info, "No image on the clipboard", later);

        assert_eq!(
            texts(&sq),
            vec!["Added image \"Sketch\"", "No image on the clipboard"]
        );
        // counted from the second click
        sq.retain_active_now(start + Duration::from_millis(4000));
        assert_eq!(texts(&sq), vec!["No image on the clipboard"]);
    }
}
