use chrono::Utc;
use meridian_application::{ProfileListQuery, ProfileRepository};
use meridian_core::AppError;
use meridian_domain::{CanonicalTimezone, Profile, ProfileId, ProfileName};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresProfileRepository, like_pattern};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres profile tests: {error}");
    }

    Some(pool)
}

fn profile(name: &str, timezone: &str) -> Profile {
    Profile::new(
        ProfileId::new(),
        ProfileName::new(name).unwrap_or_else(|_| unreachable!()),
        CanonicalTimezone::from_stored(timezone),
        Utc::now(),
    )
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", ProfileId::new())
}

#[test]
fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
}

#[tokio::test]
async fn create_find_and_count_profiles() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresProfileRepository::new(pool);
    let asha = profile(&unique_name("Asha"), "Asia/Kolkata");
    assert!(repository.create_profile(asha.clone()).await.is_ok());

    let found = repository.find_profile(asha.id()).await;
    assert!(found.is_ok());
    let found = found.unwrap_or_default().unwrap_or_else(|| unreachable!());
    assert_eq!(found.name(), asha.name());
    assert_eq!(found.timezone().as_str(), "Asia/Kolkata");

    let ids = [asha.id(), ProfileId::new()];
    assert_eq!(repository.count_existing(&ids).await.ok(), Some(1));
    assert_eq!(repository.find_profiles(&ids).await.map(|found| found.len()).ok(), Some(1));
}

#[tokio::test]
async fn duplicate_names_map_to_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresProfileRepository::new(pool);
    let name = unique_name("Bruno");
    assert!(repository.create_profile(profile(&name, "UTC")).await.is_ok());

    let duplicate = repository.create_profile(profile(&name, "UTC")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_list_and_delete_profile() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresProfileRepository::new(pool);
    let marker = ProfileId::new().to_string();
    let mut carla = profile(&format!("Carla {marker}"), "UTC");
    assert!(repository.create_profile(carla.clone()).await.is_ok());

    carla.relocate(CanonicalTimezone::from_stored("Europe/Paris"), Utc::now());
    assert!(repository.update_profile(carla.clone()).await.is_ok());

    let listed = repository
        .list_profiles(ProfileListQuery {
            search: Some(marker.to_uppercase()),
        })
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].timezone().as_str(), "Europe/Paris");

    assert_eq!(repository.delete_profile(carla.id()).await.ok(), Some(true));
    assert_eq!(repository.delete_profile(carla.id()).await.ok(), Some(false));

    let missing = repository.update_profile(carla).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
