//! Bounded in-memory journal of overlay commands and their outcomes.
//!
//! Operators and test harnesses read it through `GET /api/events` to see what
//! the overlay was asked to do during a session.  Only the most recent
//! `capacity` entries are kept; the oldest entry is evicted first.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cursor_core::protocol::{EventDto, EventListDto};

/// Default number of entries retained.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 2000;

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Ring buffer of [`EventDto`] records.
pub struct EventJournal {
    capacity: usize,
    entries: Mutex<VecDeque<EventDto>>,
}

impl EventJournal {
    /// Creates a journal retaining at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(256))),
        }
    }

    /// Appends an entry, evicting the oldest one when full.
    pub fn record(
        &self,
        kind: &str,
        outcome: &str,
        at: Option<(f64, f64)>,
        revision: Option<u64>,
    ) {
        let ts_ms = saturating_millis(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default(),
        );

        let entry = EventDto {
            kind: kind.to_string(),
            ts_ms,
            outcome: outcome.to_string(),
            x: at.map(|(x, _)| x),
            y: at.map(|(_, y)| y),
            revision,
        };

        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns the `limit` most recent entries (oldest first) and the total retained.
    pub fn recent(&self, limit: usize) -> EventListDto {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(limit);
        EventListDto {
            events: entries.iter().skip(skip).cloned().collect(),
            count: entries.len(),
        }
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<EventDto>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAPACITY)
    }
}
