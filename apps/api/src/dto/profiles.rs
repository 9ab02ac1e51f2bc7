use meridian_domain::Profile;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::format_instant;

/// Incoming payload for profile creation.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-profile-request.ts"
)]
pub struct CreateProfileRequest {
    pub name: String,
    pub timezone: String,
}

/// Incoming payload for profile updates. Absent fields stay unchanged.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub timezone: Option<String>,
}

/// API representation of a profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/profile-response.ts"
)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub timezone: String,
    pub created_at_utc: String,
    pub updated_at_utc: String,
}

impl From<Profile> for ProfileResponse {
    fn from(value: Profile) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            timezone: value.timezone().as_str().to_owned(),
            created_at_utc: format_instant(value.created_at_utc()),
            updated_at_utc: format_instant(value.updated_at_utc()),
        }
    }
}
