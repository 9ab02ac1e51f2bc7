//! Event aggregate.

use chrono::{DateTime, SecondsFormat, Utc};
use meridian_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::interval::validate_participants;
use crate::{CanonicalTimezone, EventInterval, ProfileId};

/// Maximum event title length, counted after trimming.
pub const EVENT_TITLE_MAX_LENGTH: usize = 200;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into an event identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid event id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Trims an optional title; blank becomes `None`.
pub fn normalize_title(title: Option<&str>) -> AppResult<Option<String>> {
    let Some(trimmed) = title.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if trimmed.chars().count() > EVENT_TITLE_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "title cannot exceed {EVENT_TITLE_MAX_LENGTH} characters"
        )));
    }

    Ok(Some(trimmed.to_owned()))
}

/// Stored values used to rebuild an [`Event`].
#[derive(Debug, Clone)]
pub struct EventParts {
    /// Event identifier.
    pub id: EventId,
    /// Optional title.
    pub title: Option<String>,
    /// Participants in stored order.
    pub participants: Vec<ProfileId>,
    /// Canonical authoring zone.
    pub event_timezone: CanonicalTimezone,
    /// UTC interval.
    pub interval: EventInterval,
    /// Creating profile, if any.
    pub created_by: Option<ProfileId>,
    /// Creation timestamp.
    pub created_at_utc: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at_utc: DateTime<Utc>,
}

/// A single-interval event shared by a set of participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: EventId,
    title: Option<String>,
    participants: Vec<ProfileId>,
    event_timezone: CanonicalTimezone,
    interval: EventInterval,
    created_by: Option<ProfileId>,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: DateTime<Utc>,
}

impl Event {
    /// Creates a new event stamped at `at`.
    pub fn new(
        participants: Vec<ProfileId>,
        event_timezone: CanonicalTimezone,
        interval: EventInterval,
        created_by: Option<ProfileId>,
        at: DateTime<Utc>,
    ) -> AppResult<Self> {
        validate_participants(&participants)?;

        Ok(Self {
            id: EventId::new(),
            title: None,
            participants,
            event_timezone,
            interval,
            created_by,
            created_at_utc: at,
            updated_at_utc: at,
        })
    }

    /// Rebuilds an event from stored values.
    ///
    /// Stored participant lists may be empty after profile cascades, so they
    /// are not re-validated here.
    #[must_use]
    pub fn from_parts(parts: EventParts) -> Self {
        Self {
            id: parts.id,
            title: parts.title,
            participants: parts.participants,
            event_timezone: parts.event_timezone,
            interval: parts.interval,
            created_by: parts.created_by,
            created_at_utc: parts.created_at_utc,
            updated_at_utc: parts.updated_at_utc,
        }
    }

    /// Attaches an already normalized title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns the title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns participants in stored order.
    #[must_use]
    pub fn participants(&self) -> &[ProfileId] {
        &self.participants
    }

    /// Returns the authoring zone.
    #[must_use]
    pub fn event_timezone(&self) -> &CanonicalTimezone {
        &self.event_timezone
    }

    /// Returns the UTC interval.
    #[must_use]
    pub fn interval(&self) -> EventInterval {
        self.interval
    }

    /// Returns the UTC start instant.
    #[must_use]
    pub fn start_at_utc(&self) -> DateTime<Utc> {
        self.interval.start_at_utc()
    }

    /// Returns the UTC end instant.
    #[must_use]
    pub fn end_at_utc(&self) -> DateTime<Utc> {
        self.interval.end_at_utc()
    }

    /// Returns the creating profile, if any.
    #[must_use]
    pub fn created_by(&self) -> Option<ProfileId> {
        self.created_by
    }

    /// Returns when the event was created.
    #[must_use]
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at_utc
    }

    /// Returns when the event last changed.
    #[must_use]
    pub fn updated_at_utc(&self) -> DateTime<Utc> {
        self.updated_at_utc
    }

    /// Returns whether `profile_id` participates.
    #[must_use]
    pub fn has_participant(&self, profile_id: ProfileId) -> bool {
        self.participants.contains(&profile_id)
    }

    /// Replaces the participant list.
    pub fn replace_participants(&mut self, participants: Vec<ProfileId>) -> AppResult<()> {
        validate_participants(&participants)?;
        self.participants = participants;
        Ok(())
    }

    /// Moves the event to another authoring zone.
    pub fn set_event_timezone(&mut self, event_timezone: CanonicalTimezone) {
        self.event_timezone = event_timezone;
    }

    /// Replaces the UTC interval.
    pub fn set_interval(&mut self, interval: EventInterval) {
        self.interval = interval;
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Refreshes the last-changed timestamp.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at_utc = at;
    }

    /// Pulls a profile out of the participant list. Returns whether it was present.
    pub fn remove_participant(&mut self, profile_id: ProfileId, at: DateTime<Utc>) -> bool {
        let before = self.participants.len();
        self.participants.retain(|participant| *participant != profile_id);
        let removed = self.participants.len() != before;
        if removed {
            self.updated_at_utc = at;
        }
        removed
    }

    /// Full JSON snapshot, as captured by terminal log entries.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "title": self.title,
            "participants": participants_value(&self.participants),
            "event_timezone": self.event_timezone.as_str(),
            "start_at_utc": instant_value(self.start_at_utc()),
            "end_at_utc": instant_value(self.end_at_utc()),
            "created_by": self.created_by.map(|id| id.to_string()),
            "created_at_utc": instant_value(self.created_at_utc),
            "updated_at_utc": instant_value(self.updated_at_utc),
        })
    }
}

/// Canonical JSON form of an instant.
#[must_use]
pub fn instant_value(instant: DateTime<Utc>) -> Value {
    Value::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Canonical JSON form of a participant list, order preserved.
#[must_use]
pub fn participants_value(participants: &[ProfileId]) -> Value {
    Value::Array(
        participants
            .iter()
            .map(|id| Value::String(id.to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::{Event, normalize_title};
    use crate::{CanonicalTimezone, EventInterval, ProfileId};

    fn sample_event(participants: Vec<ProfileId>) -> Event {
        let start = DateTime::parse_from_rfc3339("2025-11-10T09:00:00Z")
            .map(|value| value.with_timezone(&Utc))
            .unwrap_or_else(|_| unreachable!());
        let interval = EventInterval::new(start, start + Duration::hours(1))
            .unwrap_or_else(|_| unreachable!());
        Event::new(
            participants,
            CanonicalTimezone::from_stored("Asia/Kolkata"),
            interval,
            None,
            start,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn new_event_requires_participants() {
        let interval = EventInterval::new(Utc::now(), Utc::now() + Duration::minutes(5))
            .unwrap_or_else(|_| unreachable!());
        let result = Event::new(
            Vec::new(),
            CanonicalTimezone::from_stored("UTC"),
            interval,
            None,
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn removing_participant_refreshes_timestamp_only_when_present() {
        let kept = ProfileId::new();
        let removed = ProfileId::new();
        let mut event = sample_event(vec![kept, removed]);
        let first_updated_at = event.updated_at_utc();
        let later = first_updated_at + Duration::minutes(10);

        assert!(!event.remove_participant(ProfileId::new(), later));
        assert_eq!(event.updated_at_utc(), first_updated_at);

        assert!(event.remove_participant(removed, later));
        assert_eq!(event.participants(), &[kept]);
        assert_eq!(event.updated_at_utc(), later);
    }

    #[test]
    fn snapshot_carries_every_field() {
        let event = sample_event(vec![ProfileId::new()]).with_title(Some("Standup".to_owned()));
        let snapshot = event.snapshot();

        assert_eq!(snapshot["title"], "Standup");
        assert_eq!(snapshot["event_timezone"], "Asia/Kolkata");
        assert_eq!(snapshot["start_at_utc"], "2025-11-10T09:00:00Z");
        assert_eq!(snapshot["end_at_utc"], "2025-11-10T10:00:00Z");
        assert!(snapshot["created_by"].is_null());
        assert_eq!(snapshot["participants"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn titles_are_trimmed_and_bounded() {
        assert_eq!(
            normalize_title(Some("  Sync  ")).ok().flatten().as_deref(),
            Some("Sync")
        );
        assert_eq!(normalize_title(Some("   ")).ok().flatten(), None);
        assert!(normalize_title(Some("x".repeat(201).as_str())).is_err());
    }
}
