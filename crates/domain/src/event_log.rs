//! Payloads recorded in the append-only event log.

use serde_json::{Value, json};

use crate::{Event, EventDiff, TrackedField};

/// One state change of an event, as recorded in its log.
#[derive(Debug, Clone, PartialEq)]
pub enum EventChange {
    /// The event came into existence.
    Created(Event),
    /// Tracked fields changed.
    Updated(EventDiff),
    /// The event was removed; carries the full prior state.
    Deleted(Event),
}

impl EventChange {
    /// Stable label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Deleted(_) => "deleted",
        }
    }

    /// Returns whether recording this change would write an empty diff.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Updated(diff) if diff.is_empty())
    }

    /// Builds the JSON diff payload stored on the log entry.
    ///
    /// * created: `{ "created": { participants, event_timezone, start_at_utc, end_at_utc } }`
    /// * updated: `{ field: { "from": .., "to": .. }, .. }`
    /// * deleted: `{ "deleted": true, "before": <snapshot> }`
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::Created(event) => {
                let created = TrackedField::ALL
                    .iter()
                    .map(|field| (field.as_str().to_owned(), field.value_of(event)))
                    .collect::<serde_json::Map<_, _>>();
                json!({ "created": created })
            }
            Self::Updated(diff) => diff.to_payload(),
            Self::Deleted(event) => json!({ "deleted": true, "before": event.snapshot() }),
        }
    }
}
