use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use meridian_core::{AppError, AppResult};
use meridian_domain::{Profile, ProfileId, ProfileName, TimezoneCatalog};

use crate::event_ports::EventRepository;
use crate::profile_ports::{ProfileListQuery, ProfileRepository};

/// Input for creating a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProfileInput {
    /// Display name, unique across profiles.
    pub name: String,
    /// IANA zone name; legacy aliases are accepted and canonicalized.
    pub timezone: String,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileInput {
    /// New display name.
    pub name: Option<String>,
    /// New IANA zone name.
    pub timezone: Option<String>,
}

/// Application service for profile lifecycle operations.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    events: Arc<dyn EventRepository>,
    catalog: Arc<TimezoneCatalog>,
}

impl ProfileService {
    /// Creates a profile service from repository implementations.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        events: Arc<dyn EventRepository>,
        catalog: Arc<TimezoneCatalog>,
    ) -> Self {
        Self {
            profiles,
            events,
            catalog,
        }
    }

    /// Creates a profile bound to a canonical timezone.
    pub async fn create_profile(&self, input: CreateProfileInput) -> AppResult<Profile> {
        let name = ProfileName::new(input.name)?;
        let timezone = self.catalog.canonicalize(&input.timezone)?;
        let profile = Profile::new(ProfileId::new(), name, timezone, Utc::now());

        self.profiles.create_profile(profile.clone()).await?;
        info!(
            profile_id = %profile.id(),
            timezone = %profile.timezone(),
            "profile created"
        );

        Ok(profile)
    }

    /// Lists profiles ordered by name, optionally filtered by a name substring.
    pub async fn list_profiles(&self, search: Option<&str>) -> AppResult<Vec<Profile>> {
        let search = search
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);

        self.profiles
            .list_profiles(ProfileListQuery { search })
            .await
    }

    /// Returns one profile.
    pub async fn get_profile(&self, profile_id: ProfileId) -> AppResult<Profile> {
        self.profiles
            .find_profile(profile_id)
            .await?
            .ok_or_else(|| profile_not_found(profile_id))
    }

    /// Renames and/or relocates a profile.
    pub async fn update_profile(
        &self,
        profile_id: ProfileId,
        input: UpdateProfileInput,
    ) -> AppResult<Profile> {
        let mut profile = self.get_profile(profile_id).await?;
        let now = Utc::now();
        let mut changed = false;

        if let Some(name) = input.name {
            let name = ProfileName::new(name)?;
            if name != *profile.name() {
                profile.rename(name, now);
                changed = true;
            }
        }

        if let Some(timezone) = input.timezone {
            let timezone = self.catalog.canonicalize(&timezone)?;
            if timezone != *profile.timezone() {
                profile.relocate(timezone, now);
                changed = true;
            }
        }

        if changed {
            self.profiles.update_profile(profile.clone()).await?;
        }

        Ok(profile)
    }

    /// Deletes a profile after pulling it out of every event it participates in.
    ///
    /// The cascade refreshes `updated_at_utc` on touched events but writes no
    /// event log entries.
    pub async fn delete_profile(&self, profile_id: ProfileId) -> AppResult<()> {
        self.get_profile(profile_id).await?;

        let events_touched = self
            .events
            .remove_participant(profile_id, Utc::now())
            .await?;

        if !self.profiles.delete_profile(profile_id).await? {
            return Err(profile_not_found(profile_id));
        }

        info!(
            profile_id = %profile_id,
            events_touched,
            "profile deleted and removed from events"
        );

        Ok(())
    }
}

fn profile_not_found(profile_id: ProfileId) -> AppError {
    AppError::NotFound(format!("profile '{profile_id}' not found"))
}

#[cfg(test)]
mod tests;
