use std::collections::VecDeque;

use tourist_safety_geofence_models::ActivityLogEntry;

/// Maximum number of entries kept in the recent activity feed.
pub const ACTIVITY_LOG_CAPACITY: usize = 5;

/// Bounded, newest-first activity feed.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityLogEntry>,
}

impl ActivityLog {
    /// Builds a log from entries ordered newest first, keeping at most
    /// [`ACTIVITY_LOG_CAPACITY`] of them.
    #[must_use]
    pub fn from_newest_first(entries: impl IntoIterator<Item = ActivityLogEntry>) -> Self {
        Self {
            entries: entries.into_iter().take(ACTIVITY_LOG_CAPACITY).collect(),
        }
    }

    /// Prepends `entry`, evicting the oldest entry when over capacity.
    pub fn push(&mut self, entry: ActivityLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(ACTIVITY_LOG_CAPACITY);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ActivityLogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tourist_safety_geofence_models::{ActivityIcon, ActivityId};

    fn entry(id: u64) -> ActivityLogEntry {
        ActivityLogEntry {
            id: ActivityId(id),
            action: format!("Action {id}"),
            description: String::new(),
            icon: ActivityIcon::MapPin,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn keeps_newest_five() {
        let mut log = ActivityLog::default();
        for id in 1..=7 {
            log.push(entry(id));
            assert!(log.len() <= ACTIVITY_LOG_CAPACITY);
        }

        let ids: Vec<u64> = log.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn from_newest_first_truncates() {
        let log = ActivityLog::from_newest_first((1..=8).map(entry));
        let ids: Vec<u64> = log.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
