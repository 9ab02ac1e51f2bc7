use std::collections::HashMap;

use async_trait::async_trait;
use meridian_application::{ProfileListQuery, ProfileRepository};
use meridian_core::{AppError, AppResult};
use meridian_domain::{Profile, ProfileId};
use tokio::sync::RwLock;

/// In-memory profile repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }
}

fn ensure_name_available(
    profiles: &HashMap<ProfileId, Profile>,
    candidate: &Profile,
) -> AppResult<()> {
    let taken = profiles.values().any(|existing| {
        existing.id() != candidate.id() && existing.name().as_str() == candidate.name().as_str()
    });

    if taken {
        return Err(AppError::Conflict(format!(
            "profile '{}' already exists",
            candidate.name().as_str()
        )));
    }

    Ok(())
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn create_profile(&self, profile: Profile) -> AppResult<()> {
        let mut profiles = self.profiles.write().await;
        ensure_name_available(&profiles, &profile)?;
        profiles.insert(profile.id(), profile);
        Ok(())
    }

    async fn find_profile(&self, profile_id: ProfileId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(&profile_id).cloned())
    }

    async fn find_profiles(&self, profile_ids: &[ProfileId]) -> AppResult<Vec<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profile_ids
            .iter()
            .filter_map(|profile_id| profiles.get(profile_id).cloned())
            .collect())
    }

    async fn list_profiles(&self, query: ProfileListQuery) -> AppResult<Vec<Profile>> {
        let needle = query.search.map(|search| search.to_lowercase());
        let profiles = self.profiles.read().await;

        let mut values: Vec<Profile> = profiles
            .values()
            .filter(|profile| {
                needle.as_deref().is_none_or(|needle| {
                    profile.name().as_str().to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();
        values.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));

        Ok(values)
    }

    async fn update_profile(&self, profile: Profile) -> AppResult<()> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id()) {
            return Err(AppError::NotFound(format!(
                "profile '{}' not found",
                profile.id()
            )));
        }

        ensure_name_available(&profiles, &profile)?;
        profiles.insert(profile.id(), profile);
        Ok(())
    }

    async fn delete_profile(&self, profile_id: ProfileId) -> AppResult<bool> {
        Ok(self.profiles.write().await.remove(&profile_id).is_some())
    }

    async fn count_existing(&self, profile_ids: &[ProfileId]) -> AppResult<usize> {
        let profiles = self.profiles.read().await;
        Ok(profile_ids
            .iter()
            .filter(|profile_id| profiles.contains_key(profile_id))
            .count())
    }
}
