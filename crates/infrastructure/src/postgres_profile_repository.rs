use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use meridian_application::{ProfileListQuery, ProfileRepository};
use meridian_core::{AppError, AppResult};
use meridian_domain::{CanonicalTimezone, Profile, ProfileId, ProfileName};

/// PostgreSQL-backed profile repository.
#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    timezone: String,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let name = ProfileName::new(row.name).map_err(|error| {
            AppError::Internal(format!("stored profile '{}' is invalid: {error}", row.id))
        })?;

        Ok(Profile::restore(
            ProfileId::from_uuid(row.id),
            name,
            CanonicalTimezone::from_stored(row.timezone),
            row.created_at_utc,
            row.updated_at_utc,
        ))
    }
}

fn profile_uuids(profile_ids: &[ProfileId]) -> Vec<Uuid> {
    profile_ids.iter().map(ProfileId::as_uuid).collect()
}

/// Escapes `LIKE` wildcards so a search term matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn name_conflict_or_internal(error: sqlx::Error, name: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("profile '{name}' already exists"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn create_profile(&self, profile: Profile) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, name, timezone, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(profile.id().as_uuid())
        .bind(profile.name().as_str())
        .bind(profile.timezone().as_str())
        .bind(profile.created_at_utc())
        .bind(profile.updated_at_utc())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            name_conflict_or_internal(error, profile.name().as_str(), "create profile")
        })?;

        Ok(())
    }

    async fn find_profile(&self, profile_id: ProfileId) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, timezone, created_at_utc, updated_at_utc
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(profile_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find profile: {error}")))?;

        row.map(Profile::try_from).transpose()
    }

    async fn find_profiles(&self, profile_ids: &[ProfileId]) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, timezone, created_at_utc, updated_at_utc
            FROM profiles
            WHERE id = ANY($1)
            "#,
        )
        .bind(profile_uuids(profile_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find profiles: {error}")))?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn list_profiles(&self, query: ProfileListQuery) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, timezone, created_at_utc, updated_at_utc
            FROM profiles
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
            ORDER BY name
            "#,
        )
        .bind(query.search.as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list profiles: {error}")))?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn update_profile(&self, profile: Profile) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET name = $2, timezone = $3, updated_at_utc = $4
            WHERE id = $1
            "#,
        )
        .bind(profile.id().as_uuid())
        .bind(profile.name().as_str())
        .bind(profile.timezone().as_str())
        .bind(profile.updated_at_utc())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            name_conflict_or_internal(error, profile.name().as_str(), "update profile")
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "profile '{}' not found",
                profile.id()
            )));
        }

        Ok(())
    }

    async fn delete_profile(&self, profile_id: ProfileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete profile: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_existing(&self, profile_ids: &[ProfileId]) -> AppResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE id = ANY($1)")
            .bind(profile_uuids(profile_ids))
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count profiles: {error}")))?;

        usize::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid profile count {count}: {error}")))
    }
}

#[cfg(test)]
mod tests;
