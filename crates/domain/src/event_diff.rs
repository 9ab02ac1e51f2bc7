//! Field-level change sets between two versions of an event.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use meridian_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::{instant_value, participants_value};
use crate::{CanonicalTimezone, Event, EventInterval, ProfileId};

/// Fields whose changes are recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    /// UTC start instant.
    StartAtUtc,
    /// UTC end instant.
    EndAtUtc,
    /// Authoring zone.
    EventTimezone,
    /// Participant list (order-sensitive).
    Participants,
}

impl TrackedField {
    /// Every tracked field, in diff order.
    pub const ALL: [Self; 4] = [
        Self::StartAtUtc,
        Self::EndAtUtc,
        Self::EventTimezone,
        Self::Participants,
    ];

    /// Returns the payload key for this field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartAtUtc => "start_at_utc",
            Self::EndAtUtc => "end_at_utc",
            Self::EventTimezone => "event_timezone",
            Self::Participants => "participants",
        }
    }

    /// Returns the canonical serialized value of this field on `event`.
    #[must_use]
    pub fn value_of(&self, event: &Event) -> Value {
        match self {
            Self::StartAtUtc => instant_value(event.start_at_utc()),
            Self::EndAtUtc => instant_value(event.end_at_utc()),
            Self::EventTimezone => Value::String(event.event_timezone().as_str().to_owned()),
            Self::Participants => participants_value(event.participants()),
        }
    }
}

/// Previous and new value of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Value before the change.
    pub from: Value,
    /// Value after the change.
    pub to: Value,
}

/// Changed tracked fields only; empty when nothing tracked changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventDiff(BTreeMap<TrackedField, FieldChange>);

/// Compares the tracked fields of two event versions.
///
/// Pure and deterministic. Participant lists compare in order, so a
/// reordering with the same members counts as a change.
#[must_use]
pub fn build_diff(old: &Event, new: &Event) -> EventDiff {
    let changes = TrackedField::ALL
        .iter()
        .filter_map(|field| {
            let from = field.value_of(old);
            let to = field.value_of(new);
            (from != to).then_some((*field, FieldChange { from, to }))
        })
        .collect();

    EventDiff(changes)
}

impl EventDiff {
    /// Returns whether no tracked field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of changed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the change recorded for `field`.
    #[must_use]
    pub fn get(&self, field: TrackedField) -> Option<&FieldChange> {
        self.0.get(&field)
    }

    /// Returns the changed fields in order.
    pub fn fields(&self) -> impl Iterator<Item = TrackedField> + '_ {
        self.0.keys().copied()
    }

    /// Writes every recorded `to` value onto `event`'s tracked fields.
    pub fn apply_to(&self, event: &mut Event) -> AppResult<()> {
        let mut start_at_utc = event.start_at_utc();
        let mut end_at_utc = event.end_at_utc();

        for (field, change) in &self.0 {
            match field {
                TrackedField::StartAtUtc => start_at_utc = instant_from_value(&change.to)?,
                TrackedField::EndAtUtc => end_at_utc = instant_from_value(&change.to)?,
                TrackedField::EventTimezone => {
                    let zone = change.to.as_str().ok_or_else(|| {
                        AppError::Validation("event_timezone change must be a string".to_owned())
                    })?;
                    event.set_event_timezone(CanonicalTimezone::from_stored(zone));
                }
                TrackedField::Participants => {
                    let participants: Vec<ProfileId> = serde_json::from_value(change.to.clone())
                        .map_err(|error| {
                            AppError::Validation(format!(
                                "participants change is not a list of ids: {error}"
                            ))
                        })?;
                    event.replace_participants(participants)?;
                }
            }
        }

        event.set_interval(EventInterval::new(start_at_utc, end_at_utc)?);
        Ok(())
    }

    /// JSON payload stored on the log entry: `{ field: { from, to } }`.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let fields = self
            .0
            .iter()
            .map(|(field, change)| {
                let mut entry = Map::new();
                entry.insert("from".to_owned(), change.from.clone());
                entry.insert("to".to_owned(), change.to.clone());
                (field.as_str().to_owned(), Value::Object(entry))
            })
            .collect();

        Value::Object(fields)
    }
}

fn instant_from_value(value: &Value) -> AppResult<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok_or_else(|| AppError::Validation(format!("'{value}' is not an RFC 3339 instant")))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;

    use super::{TrackedField, build_diff};
    use crate::{CanonicalTimezone, Event, EventInterval, ProfileId};

    const ZONES: [&str; 3] = ["Asia/Kolkata", "America/New_York", "Europe/Paris"];

    fn base_instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-11-10T09:00:00Z")
            .map(|value| value.with_timezone(&Utc))
            .unwrap_or_else(|_| unreachable!())
    }

    fn event_with(
        participants: Vec<ProfileId>,
        zone: &str,
        start_offset_minutes: i64,
        length_minutes: i64,
    ) -> Event {
        let start = base_instant() + Duration::minutes(start_offset_minutes);
        let interval = EventInterval::new(start, start + Duration::minutes(length_minutes))
            .unwrap_or_else(|_| unreachable!());
        Event::new(
            participants,
            CanonicalTimezone::from_stored(zone),
            interval,
            None,
            base_instant(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn only_changed_fields_are_reported() {
        let participants = vec![ProfileId::new()];
        let old = event_with(participants.clone(), "Asia/Kolkata", 0, 60);
        let mut new = old.clone();
        let moved = EventInterval::new(
            base_instant() + Duration::minutes(30),
            old.end_at_utc(),
        )
        .unwrap_or_else(|_| unreachable!());
        new.set_interval(moved);

        let diff = build_diff(&old, &new);
        assert_eq!(diff.len(), 1);
        let change = diff.get(TrackedField::StartAtUtc);
        assert!(change.is_some());
        let change = change.unwrap_or_else(|| unreachable!());
        assert_eq!(change.from, "2025-11-10T09:00:00Z");
        assert_eq!(change.to, "2025-11-10T09:30:00Z");
    }

    #[test]
    fn untracked_fields_do_not_produce_changes() {
        let old = event_with(vec![ProfileId::new()], "Asia/Kolkata", 0, 60);
        let mut new = old.clone();
        new.set_title(Some("Renamed".to_owned()));
        new.touch(base_instant() + Duration::days(1));

        assert!(build_diff(&old, &new).is_empty());
    }

    #[test]
    fn participant_reordering_counts_as_a_change() {
        let first = ProfileId::new();
        let second = ProfileId::new();
        let old = event_with(vec![first, second], "UTC", 0, 30);
        let mut new = old.clone();
        assert!(new.replace_participants(vec![second, first]).is_ok());

        let diff = build_diff(&old, &new);
        assert_eq!(diff.fields().collect::<Vec<_>>(), vec![TrackedField::Participants]);
    }

    #[test]
    fn payload_uses_field_keys_with_from_and_to() {
        let old = event_with(vec![ProfileId::new()], "Asia/Kolkata", 0, 60);
        let mut new = old.clone();
        new.set_event_timezone(CanonicalTimezone::from_stored("Europe/Paris"));

        let payload = build_diff(&old, &new).to_payload();
        assert_eq!(payload["event_timezone"]["from"], "Asia/Kolkata");
        assert_eq!(payload["event_timezone"]["to"], "Europe/Paris");
        assert_eq!(payload.as_object().map(|fields| fields.len()), Some(1));
    }

    fn arbitrary_event() -> impl Strategy<Value = Event> {
        (
            prop::collection::vec(any::<u128>(), 1..4),
            0usize..ZONES.len(),
            -600i64..600,
            1i64..600,
        )
            .prop_map(|(raw_ids, zone, offset, length)| {
                let mut participants: Vec<ProfileId> = raw_ids
                    .into_iter()
                    .map(|raw| ProfileId::from_uuid(uuid::Uuid::from_u128(raw)))
                    .collect();
                participants.dedup();
                participants.sort();
                participants.dedup();
                event_with(participants, ZONES[zone], offset, length)
            })
    }

    proptest! {
        #[test]
        fn diff_against_self_is_empty(event in arbitrary_event()) {
            prop_assert!(build_diff(&event, &event).is_empty());
        }

        #[test]
        fn diff_is_deterministic(old in arbitrary_event(), new in arbitrary_event()) {
            prop_assert_eq!(build_diff(&old, &new), build_diff(&old, &new));
        }

        #[test]
        fn applying_diff_reproduces_tracked_fields(old in arbitrary_event(), new in arbitrary_event()) {
            let diff = build_diff(&old, &new);
            let mut patched = old.clone();
            prop_assert!(diff.apply_to(&mut patched).is_ok());

            for field in TrackedField::ALL {
                prop_assert_eq!(field.value_of(&patched), field.value_of(&new));
            }
            prop_assert!(build_diff(&patched, &new).is_empty());
        }
    }
}
