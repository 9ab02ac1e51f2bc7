use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use meridian_core::AppResult;
use meridian_domain::{EventId, ProfileId};

/// Unique identifier for an event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLogEntryId(Uuid);

impl EventLogEntryId {
    /// Creates a new random entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entry identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventLogEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventLogEntryId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Log entry payload emitted by application services.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventLogEntry {
    /// Event the change applies to.
    pub event_id: EventId,
    /// Profile that made the change, if known.
    pub updated_by: Option<ProfileId>,
    /// When the change happened.
    pub changed_at_utc: DateTime<Utc>,
    /// Opaque JSON diff payload.
    pub diff: Value,
}

/// Stored, immutable log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    /// Entry identifier.
    pub id: EventLogEntryId,
    /// Event the change applies to. The event itself may be gone.
    pub event_id: EventId,
    /// Profile that made the change, if known.
    pub updated_by: Option<ProfileId>,
    /// When the change happened.
    pub changed_at_utc: DateTime<Utc>,
    /// Opaque JSON diff payload.
    pub diff: Value,
}

/// Port for the append-only event log.
#[async_trait]
pub trait EventLogRepository: Send + Sync {
    /// Appends one entry and returns it as stored.
    async fn append_entry(&self, entry: NewEventLogEntry) -> AppResult<EventLogEntry>;

    /// Lists entries for one event, newest first.
    async fn list_entries_for_event(&self, event_id: EventId) -> AppResult<Vec<EventLogEntry>>;
}
