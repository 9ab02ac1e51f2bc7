use meridian_application::EventLogView;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

use super::common::{ProfileSummaryResponse, format_instant};

/// API representation of one event log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/event-log-entry-response.ts"
)]
pub struct EventLogEntryResponse {
    pub id: String,
    pub event_id: String,
    pub updated_by: Option<String>,
    pub updated_by_profile: Option<ProfileSummaryResponse>,
    pub changed_at_utc: String,
    #[ts(type = "Record<string, unknown>")]
    pub diff: Value,
}

impl From<EventLogView> for EventLogEntryResponse {
    fn from(value: EventLogView) -> Self {
        let entry = value.entry;
        Self {
            id: entry.id.to_string(),
            event_id: entry.event_id.to_string(),
            updated_by: entry.updated_by.map(|id| id.to_string()),
            updated_by_profile: value.updated_by.map(ProfileSummaryResponse::from),
            changed_at_utc: format_instant(entry.changed_at_utc),
            diff: entry.diff,
        }
    }
}
