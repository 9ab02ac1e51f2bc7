use chrono::{DateTime, Duration, Utc};
use meridian_application::{EventListQuery, EventRepository};
use meridian_core::AppError;
use meridian_domain::{CanonicalTimezone, Event, EventInterval, ProfileId};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresEventRepository;

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
        panic!("failed to run migrations for postgres event tests: {error}");
    }

    Some(pool)
}

fn instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(|_| unreachable!())
}

fn event(participants: Vec<ProfileId>, start: &str) -> Event {
    let start = instant(start);
    let interval =
        EventInterval::new(start, start + Duration::hours(1)).unwrap_or_else(|_| unreachable!());
    Event::new(
        participants,
        CanonicalTimezone::from_stored("Asia/Kolkata"),
        interval,
        None,
        start,
    )
    .unwrap_or_else(|_| unreachable!())
    .with_title(Some("Standup".to_owned()))
}

#[tokio::test]
async fn events_round_trip_and_list_by_participant() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresEventRepository::new(pool);
    let asha = ProfileId::new();
    let bruno = ProfileId::new();
    let later = event(vec![asha, bruno], "2025-11-12T09:00:00Z");
    let earlier = event(vec![bruno, asha], "2025-11-10T09:00:00Z");
    assert!(repository.create_event(later.clone()).await.is_ok());
    assert!(repository.create_event(earlier.clone()).await.is_ok());

    let found = repository
        .find_event(later.id())
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    assert_eq!(found.participants(), later.participants());
    assert_eq!(found.title(), Some("Standup"));
    assert_eq!(found.start_at_utc(), later.start_at_utc());

    let listed = repository
        .list_events(EventListQuery {
            participant: Some(asha),
            from: None,
            to: None,
            limit: 10,
        })
        .await
        .unwrap_or_default();
    let ids: Vec<_> = listed.iter().map(Event::id).collect();
    assert_eq!(ids, vec![earlier.id(), later.id()]);
}

#[tokio::test]
async fn remove_participant_is_a_single_bulk_write() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresEventRepository::new(pool);
    let leaving = ProfileId::new();
    let staying = ProfileId::new();
    let first = event(vec![leaving, staying], "2025-11-10T09:00:00Z");
    let second = event(vec![staying, leaving], "2025-11-11T09:00:00Z");
    assert!(repository.create_event(first.clone()).await.is_ok());
    assert!(repository.create_event(second.clone()).await.is_ok());

    let at = instant("2025-12-01T00:00:00Z");
    assert_eq!(repository.remove_participant(leaving, at).await.ok(), Some(2));

    for event_id in [first.id(), second.id()] {
        let stored = repository
            .find_event(event_id)
            .await
            .unwrap_or_default()
            .unwrap_or_else(|| unreachable!());
        assert_eq!(stored.participants(), &[staying]);
        assert_eq!(stored.updated_at_utc(), at);
    }
}

#[tokio::test]
async fn update_and_delete_report_missing_events() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresEventRepository::new(pool);
    let mut stored = event(vec![ProfileId::new()], "2025-11-10T09:00:00Z");
    assert!(repository.create_event(stored.clone()).await.is_ok());

    stored.set_title(None);
    let updated = repository.update_event(stored.clone()).await;
    assert!(updated.is_ok());
    assert_eq!(updated.unwrap_or_else(|_| unreachable!()).title(), None);

    assert_eq!(repository.delete_event(stored.id()).await.ok(), Some(true));
    let missing = repository.update_event(stored).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
