use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meridian_application::{EventListQuery, EventRepository};
use meridian_core::{AppError, AppResult};
use meridian_domain::{Event, EventId, ProfileId};
use tokio::sync::RwLock;

/// In-memory event repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create_event(&self, event: Event) -> AppResult<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id()) {
            return Err(AppError::Conflict(format!(
                "event '{}' already exists",
                event.id()
            )));
        }

        events.insert(event.id(), event);
        Ok(())
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self.events.read().await.get(&event_id).cloned())
    }

    async fn list_events(&self, query: EventListQuery) -> AppResult<Vec<Event>> {
        let events = self.events.read().await;

        let mut values: Vec<Event> = events
            .values()
            .filter(|event| {
                query
                    .participant
                    .is_none_or(|participant| event.has_participant(participant))
                    && query.from.is_none_or(|from| event.start_at_utc() >= from)
                    && query.to.is_none_or(|to| event.start_at_utc() <= to)
            })
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            left.start_at_utc()
                .cmp(&right.start_at_utc())
                .then_with(|| left.id().cmp(&right.id()))
        });
        values.truncate(query.limit);

        Ok(values)
    }

    async fn update_event(&self, event: Event) -> AppResult<Event> {
        let mut events = self.events.write().await;
        let Some(stored) = events.get_mut(&event.id()) else {
            return Err(AppError::NotFound(format!(
                "event '{}' not found",
                event.id()
            )));
        };

        *stored = event.clone();
        Ok(event)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<bool> {
        Ok(self.events.write().await.remove(&event_id).is_some())
    }

    async fn remove_participant(
        &self,
        profile_id: ProfileId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut events = self.events.write().await;
        let mut touched = 0_u64;
        for event in events.values_mut() {
            if event.remove_participant(profile_id, at) {
                touched += 1;
            }
        }

        Ok(touched)
    }
}
