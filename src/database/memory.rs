use std::sync::Mutex;

use crate::database::{EventSink, EventSource};
use crate::error::Result;
use crate::models::{LaunchEvent, NewLaunch};

/// In-process launch log kept in timestamp order.
///
/// Used by hosts that already hold the history in memory and by tests.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<LaunchEvent>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(mut events: Vec<LaunchEvent>) -> Self {
        events.sort_by_key(|e| (e.timestamp, e.id));
        Self {
            events: Mutex::new(events),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LaunchEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSource for MemoryEventStore {
    fn get_most_recent(&self, limit: usize) -> Result<Vec<LaunchEvent>> {
        Ok(self.lock().iter().rev().take(limit).cloned().collect())
    }

    fn get_last(&self) -> Result<Option<LaunchEvent>> {
        Ok(self.lock().last().cloned())
    }
}

impl EventSink for MemoryEventStore {
    fn append(&self, launch: &NewLaunch) -> Result<i64> {
        let mut events = self.lock();
        let id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let event = launch.clone().into_event(id);
        // Keep timestamp order even if a caller appends slightly out of order
        let pos = events.partition_point(|e| e.timestamp <= event.timestamp);
        events.insert(pos, event);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::launches;

    #[test]
    fn out_of_order_append_keeps_timestamp_order() {
        let store = MemoryEventStore::new();
        let mut batch = launches(&["a", "b", "c"]);
        batch.swap(1, 2);
        for launch in &batch {
            store.append(launch).unwrap();
        }

        let apps: Vec<_> = store
            .get_most_recent(10)
            .unwrap()
            .into_iter()
            .map(|e| e.app)
            .collect();
        assert_eq!(apps, vec!["c", "b", "a"]);
        assert_eq!(store.get_last().unwrap().unwrap().app, "c");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn ids_continue_after_loaded_events() {
        let mut loaded: Vec<LaunchEvent> = launches(&["a", "b"])
            .into_iter()
            .zip([2, 3])
            .map(|(launch, id)| launch.into_event(id))
            .collect();
        loaded.reverse();
        let store = MemoryEventStore::from_events(loaded);

        let next = launches(&["a", "b", "c"]).pop().unwrap();
        assert_eq!(store.append(&next).unwrap(), 4);

        let mut ids: Vec<i64> = store.get_most_recent(10).unwrap().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn most_recent_respects_limit() {
        let store = MemoryEventStore::new();
        assert!(store.is_empty());
        for launch in launches(&["a", "b", "c", "d"]) {
            store.append(&launch).unwrap();
        }
        assert_eq!(store.get_most_recent(2).unwrap().len(), 2);
    }
}
