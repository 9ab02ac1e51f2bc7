//! Profile domain types and validation rules.

use chrono::{DateTime, Utc};
use meridian_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CanonicalTimezone;

/// Maximum profile display name length, counted after trimming.
pub const PROFILE_NAME_MAX_LENGTH: usize = 100;

/// Unique identifier for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Creates a new random profile identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a profile identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a transport value into a profile identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid profile id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated profile display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileName(NonEmptyString);

impl ProfileName {
    /// Trims and validates a display name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let name = NonEmptyString::new(value)
            .map_err(|_| AppError::Validation("name is required".to_owned()))?;

        if name.char_count() > PROFILE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "name cannot exceed {PROFILE_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(name))
    }

    /// Returns the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A person bound to a timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    id: ProfileId,
    name: ProfileName,
    timezone: CanonicalTimezone,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: DateTime<Utc>,
}

impl Profile {
    /// Creates a profile stamped at `at`.
    #[must_use]
    pub fn new(
        id: ProfileId,
        name: ProfileName,
        timezone: CanonicalTimezone,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            timezone,
            created_at_utc: at,
            updated_at_utc: at,
        }
    }

    /// Rebuilds a profile from stored values.
    #[must_use]
    pub fn restore(
        id: ProfileId,
        name: ProfileName,
        timezone: CanonicalTimezone,
        created_at_utc: DateTime<Utc>,
        updated_at_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            timezone,
            created_at_utc,
            updated_at_utc,
        }
    }

    /// Returns the profile identifier.
    #[must_use]
    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &ProfileName {
        &self.name
    }

    /// Returns the canonical timezone.
    #[must_use]
    pub fn timezone(&self) -> &CanonicalTimezone {
        &self.timezone
    }

    /// Returns when the profile was created.
    #[must_use]
    pub fn created_at_utc(&self) -> DateTime<Utc> {
        self.created_at_utc
    }

    /// Returns when the profile was last changed.
    #[must_use]
    pub fn updated_at_utc(&self) -> DateTime<Utc> {
        self.updated_at_utc
    }

    /// Replaces the display name.
    pub fn rename(&mut self, name: ProfileName, at: DateTime<Utc>) {
        self.name = name;
        self.updated_at_utc = at;
    }

    /// Rebinds the profile to another timezone.
    pub fn relocate(&mut self, timezone: CanonicalTimezone, at: DateTime<Utc>) {
        self.timezone = timezone;
        self.updated_at_utc = at;
    }
}
