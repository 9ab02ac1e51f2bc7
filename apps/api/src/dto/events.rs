use meridian_application::{EventView, ParticipantView};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::{ProfileSummaryResponse, format_instant, format_wall_clock};

/// Incoming payload for event creation. Boundaries are local wall clock in `event_timezone`.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-event-request.ts"
)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub participants: Vec<String>,
    pub event_timezone: Option<String>,
    pub start_local: Option<String>,
    pub end_local: Option<String>,
    pub title: Option<String>,
    pub created_by: Option<String>,
}

/// Incoming partial update. Unknown keys are rejected.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-event-request.ts"
)]
pub struct UpdateEventRequest {
    pub participants: Option<Vec<String>>,
    pub event_timezone: Option<String>,
    pub start_local: Option<String>,
    pub end_local: Option<String>,
    pub title: Option<String>,
    pub updated_by: Option<String>,
}

/// Optional body of an event deletion.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-event-request.ts"
)]
pub struct DeleteEventRequest {
    pub deleted_by: Option<String>,
}

/// Identifier of a deleted event.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-event-response.ts"
)]
pub struct DeleteEventResponse {
    pub id: String,
}

/// A participant with the event projected onto their own wall clock.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/participant-response.ts"
)]
pub struct ParticipantResponse {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub local_start: Option<String>,
    pub local_end: Option<String>,
}

impl From<ParticipantView> for ParticipantResponse {
    fn from(value: ParticipantView) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            timezone: value.timezone.as_str().to_owned(),
            local_start: value.local_start.map(format_wall_clock),
            local_end: value.local_end.map(format_wall_clock),
        }
    }
}

/// API representation of an event.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/event-response.ts"
)]
pub struct EventResponse {
    pub id: String,
    pub title: Option<String>,
    pub participants: Vec<ParticipantResponse>,
    pub event_timezone: String,
    pub start_at_utc: String,
    pub end_at_utc: String,
    pub created_by: Option<ProfileSummaryResponse>,
    pub created_at_utc: String,
    pub updated_at_utc: String,
}

impl From<EventView> for EventResponse {
    fn from(value: EventView) -> Self {
        let event = value.event;
        Self {
            id: event.id().to_string(),
            title: event.title().map(ToOwned::to_owned),
            participants: value
                .participants
                .into_iter()
                .map(ParticipantResponse::from)
                .collect(),
            event_timezone: event.event_timezone().as_str().to_owned(),
            start_at_utc: format_instant(event.start_at_utc()),
            end_at_utc: format_instant(event.end_at_utc()),
            created_by: value.created_by.map(ProfileSummaryResponse::from),
            created_at_utc: format_instant(event.created_at_utc()),
            updated_at_utc: format_instant(event.updated_at_utc()),
        }
    }
}
