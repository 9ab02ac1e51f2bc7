use async_trait::async_trait;

use meridian_core::AppResult;
use meridian_domain::{Profile, ProfileId};

/// Filter applied when listing profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileListQuery {
    /// Case-insensitive substring matched against profile names.
    pub search: Option<String>,
}

/// Repository port for profile persistence.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Stores a new profile. Fails with `Conflict` when the name is taken.
    async fn create_profile(&self, profile: Profile) -> AppResult<()>;

    /// Finds one profile by identifier.
    async fn find_profile(&self, profile_id: ProfileId) -> AppResult<Option<Profile>>;

    /// Finds every existing profile among `profile_ids`. Missing ids are skipped.
    async fn find_profiles(&self, profile_ids: &[ProfileId]) -> AppResult<Vec<Profile>>;

    /// Lists profiles ordered by name.
    async fn list_profiles(&self, query: ProfileListQuery) -> AppResult<Vec<Profile>>;

    /// Replaces a stored profile.
    ///
    /// Fails with `NotFound` when absent and `Conflict` when the new name is taken.
    async fn update_profile(&self, profile: Profile) -> AppResult<()>;

    /// Deletes a profile. Returns whether it existed.
    async fn delete_profile(&self, profile_id: ProfileId) -> AppResult<bool>;

    /// Counts how many of `profile_ids` exist, in one round trip.
    async fn count_existing(&self, profile_ids: &[ProfileId]) -> AppResult<usize>;
}
