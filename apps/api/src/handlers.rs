pub mod events;
pub mod health;
pub mod logs;
pub mod profiles;
pub mod timezones;

use chrono::{DateTime, NaiveDate, Utc};
use meridian_core::{AppError, AppResult};
use meridian_domain::ProfileId;

fn parse_optional_profile_id(value: Option<&str>) -> AppResult<Option<ProfileId>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ProfileId::parse)
        .transpose()
}

/// Parses an RFC 3339 instant or a bare `YYYY-MM-DD` date (UTC midnight).
fn parse_instant_param(name: &str, value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    let Some(raw) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| AppError::Validation(format!("invalid '{name}' instant '{raw}'")))
}
