use async_trait::async_trait;
use meridian_application::{
    EventLogEntry, EventLogEntryId, EventLogRepository, NewEventLogEntry,
};
use meridian_core::AppResult;
use meridian_domain::EventId;
use tokio::sync::RwLock;

/// In-memory append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLogRepository {
    entries: RwLock<Vec<EventLogEntry>>,
}

impl InMemoryEventLogRepository {
    /// Creates an empty in-memory log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EventLogRepository for InMemoryEventLogRepository {
    async fn append_entry(&self, entry: NewEventLogEntry) -> AppResult<EventLogEntry> {
        let stored = EventLogEntry {
            id: EventLogEntryId::new(),
            event_id: entry.event_id,
            updated_by: entry.updated_by,
            changed_at_utc: entry.changed_at_utc,
            diff: entry.diff,
        };

        self.entries.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_entries_for_event(&self, event_id: EventId) -> AppResult<Vec<EventLogEntry>> {
        let entries = self.entries.read().await;

        // Reverse insertion order first so equal timestamps stay newest first.
        let mut values: Vec<EventLogEntry> = entries
            .iter()
            .rev()
            .filter(|entry| entry.event_id == event_id)
            .cloned()
            .collect();
        values.sort_by(|left, right| right.changed_at_utc.cmp(&left.changed_at_utc));

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use meridian_application::{EventLogRepository, NewEventLogEntry};
    use meridian_domain::EventId;
    use serde_json::json;

    use super::InMemoryEventLogRepository;

    #[tokio::test]
    async fn entries_are_scoped_and_newest_first() {
        let repository = InMemoryEventLogRepository::new();
        let event_id = EventId::new();
        let now = Utc::now();

        for (offset, label) in [(0, "first"), (5, "second"), (5, "third")] {
            let appended = repository
                .append_entry(NewEventLogEntry {
                    event_id,
                    updated_by: None,
                    changed_at_utc: now + Duration::seconds(offset),
                    diff: json!({ "label": label }),
                })
                .await;
            assert!(appended.is_ok());
        }
        let other = repository
            .append_entry(NewEventLogEntry {
                event_id: EventId::new(),
                updated_by: None,
                changed_at_utc: now,
                diff: json!({}),
            })
            .await;
        assert!(other.is_ok());

        let listed = repository
            .list_entries_for_event(event_id)
            .await
            .unwrap_or_default();
        let labels: Vec<&str> = listed
            .iter()
            .filter_map(|entry| entry.diff["label"].as_str())
            .collect();
        assert_eq!(labels, vec!["third", "second", "first"]);
    }
}
