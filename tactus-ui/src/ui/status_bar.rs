use std::time::{Duration, Instant};

use tactus_types::{StatusEvent, StatusLevel};

fn ttl(level: StatusLevel) -> Duration {
    match level {
        StatusLevel::Info => Duration::from_secs(3),
        StatusLevel::Warning => Duration::from_secs(5),
        StatusLevel::Error => Duration::from_secs(8),
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub timestamp: Instant,
}

impl StatusMessage {
    fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) > ttl(self.level)
    }
}

/// Transient one-line messages, newest first, each expiring after a TTL that
/// depends on its level.
pub struct StatusBar {
    messages: Vec<StatusMessage>,
    max: usize,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max: 16,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.push_at(text, level, Instant::now());
    }

    pub fn push_at(&mut self, text: impl Into<String>, level: StatusLevel, now: Instant) {
        self.messages.push(StatusMessage {
            text: text.into(),
            level,
            timestamp: now,
        });
        if self.messages.len() > self.max {
            self.messages.remove(0);
        }
    }

    pub fn apply(&mut self, events: &[StatusEvent]) {
        for event in events {
            self.push(event.message.clone(), event.level);
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.messages.iter().rev().find(|m| !m.is_expired_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_current() {
        let mut bar = StatusBar::new();
        assert!(bar.current().is_none());
        bar.push("hello", StatusLevel::Info);
        assert_eq!(bar.current().unwrap().text, "hello");
    }

    #[test]
    fn most_recent_wins() {
        let mut bar = StatusBar::new();
        bar.push("first", StatusLevel::Info);
        bar.push("second", StatusLevel::Warning);
        assert_eq!(bar.current().unwrap().text, "second");
    }

    #[test]
    fn messages_expire_by_level() {
        let t0 = Instant::now();
        let mut bar = StatusBar::new();
        bar.push_at("audio gone", StatusLevel::Error, t0);
        bar.push_at("muted", StatusLevel::Info, t0);

        assert_eq!(bar.current_at(t0 + Duration::from_secs(1)).unwrap().text, "muted");
        // Info expired, the older error is still shown
        assert_eq!(bar.current_at(t0 + Duration::from_secs(4)).unwrap().text, "audio gone");
        assert!(bar.current_at(t0 + Duration::from_secs(9)).is_none());
    }

    #[test]
    fn apply_status_events() {
        let mut bar = StatusBar::new();
        bar.apply(&[StatusEvent::warning("bpm must be 40-240")]);
        let msg = bar.current().unwrap();
        assert_eq!(msg.level, StatusLevel::Warning);
        assert_eq!(msg.text, "bpm must be 40-240");
    }

    #[test]
    fn max_cap_evicts_oldest() {
        let mut bar = StatusBar {
            messages: Vec::new(),
            max: 2,
        };
        bar.push("a", StatusLevel::Info);
        bar.push("b", StatusLevel::Info);
        bar.push("c", StatusLevel::Info);
        assert_eq!(bar.messages.len(), 2);
        assert_eq!(bar.messages[0].text, "b");
    }
}
