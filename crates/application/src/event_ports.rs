use async_trait::async_trait;
use chrono::{DateTime, Utc};

use meridian_core::AppResult;
use meridian_domain::{Event, EventId, ProfileId};

/// Query used to list events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListQuery {
    /// Only events this profile participates in.
    pub participant: Option<ProfileId>,
    /// Inclusive lower bound on the start instant.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the start instant.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of events returned.
    pub limit: usize,
}

/// Repository port for event persistence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Stores a new event.
    async fn create_event(&self, event: Event) -> AppResult<()>;

    /// Finds one event by identifier.
    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>>;

    /// Lists events ordered by start instant, ascending.
    async fn list_events(&self, query: EventListQuery) -> AppResult<Vec<Event>>;

    /// Replaces a stored event and returns the stored version.
    async fn update_event(&self, event: Event) -> AppResult<Event>;

    /// Deletes an event. Returns whether it existed.
    async fn delete_event(&self, event_id: EventId) -> AppResult<bool>;

    /// Pulls `profile_id` out of every event's participants in one atomic
    /// write, refreshing `updated_at_utc` on each touched event.
    ///
    /// Returns the number of events touched.
    async fn remove_participant(
        &self,
        profile_id: ProfileId,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;
}
