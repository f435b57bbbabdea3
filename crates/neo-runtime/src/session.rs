//! Per-room polling state.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use neo_core::StreamToken;

/// Polling state of one room.
///
/// Holds the stream position the next fetch starts from, along with a few
/// counters. Owned by the [`Bot`](crate::Bot) and shared with its polling
/// task.
#[derive(Debug)]
pub struct Session {
    room_id: String,
    position: Mutex<Option<StreamToken>>,
    pages_fetched: AtomicU64,
    events_dispatched: AtomicU64,
}

impl Session {
    /// Creates a session without a position.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            position: Mutex::new(None),
            pages_fetched: AtomicU64::new(0),
            events_dispatched: AtomicU64::new(0),
        }
    }

    /// Returns the room this session polls.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Returns the current stream position, if any.
    pub fn position(&self) -> Option<StreamToken> {
        self.position.lock().clone()
    }

    /// Replaces the stream position.
    pub fn set_position(&self, token: StreamToken) {
        *self.position.lock() = Some(token);
    }

    /// Returns the number of pages fetched so far, empty ones included.
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    /// Returns the number of events handed to the registry so far.
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    pub(crate) fn record_page(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatch(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_starts_empty() {
        let session = Session::new("!r:example.org");
        assert_eq!(session.room_id(), "!r:example.org");
        assert_eq!(session.position(), None);

        session.set_position(StreamToken::new("t1"));
        assert_eq!(session.position(), Some(StreamToken::new("t1")));
    }

    #[test]
    fn test_counters() {
        let session = Session::new("!r:example.org");
        session.record_page();
        session.record_page();
        session.record_dispatch();
        assert_eq!(session.pages_fetched(), 2);
        assert_eq!(session.events_dispatched(), 1);
    }
}
