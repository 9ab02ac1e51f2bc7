use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use meridian_application::ProfileSummary;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Canonical zone names for pickers.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/timezone-list-response.ts"
)]
pub struct TimezoneListResponse {
    pub timezones: Vec<String>,
}

/// Identifier and name of a profile.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/profile-summary-response.ts"
)]
pub struct ProfileSummaryResponse {
    pub id: String,
    pub name: String,
}

impl From<ProfileSummary> for ProfileSummaryResponse {
    fn from(value: ProfileSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
        }
    }
}

pub(crate) fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn format_wall_clock(local: NaiveDateTime) -> String {
    local.format("%Y-%m-%dT%H:%M:%S").to_string()
}
