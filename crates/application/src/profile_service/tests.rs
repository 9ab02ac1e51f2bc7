use std::sync::Arc;

use meridian_core::AppError;
use meridian_domain::{EventId, ProfileId, TimezoneCatalog};

use crate::test_fakes::{FakeEventLogRepository, FakeEventRepository, FakeProfileRepository};
use crate::{
    AuditDispatcher, CreateEventInput, CreateProfileInput, EventListLimits, EventRepository,
    EventService, UpdateProfileInput,
};

use super::ProfileService;

struct Fixture {
    service: ProfileService,
    event_service: EventService,
    events: Arc<FakeEventRepository>,
    logs: Arc<FakeEventLogRepository>,
}

fn fixture() -> Fixture {
    let profiles = Arc::new(FakeProfileRepository::default());
    let events = Arc::new(FakeEventRepository::default());
    let logs = Arc::new(FakeEventLogRepository::default());
    let catalog = Arc::new(TimezoneCatalog::from_tz_database());
    let service = ProfileService::new(profiles.clone(), events.clone(), catalog.clone());
    let event_service = EventService::new(
        events.clone(),
        profiles,
        AuditDispatcher::new(logs.clone()),
        catalog,
        EventListLimits::default(),
    );

    Fixture {
        service,
        event_service,
        events,
        logs,
    }
}

fn input(name: &str, timezone: &str) -> CreateProfileInput {
    CreateProfileInput {
        name: name.to_owned(),
        timezone: timezone.to_owned(),
    }
}

async fn create_event(fixture: &Fixture, participants: Vec<ProfileId>, day: u32) -> EventId {
    fixture
        .event_service
        .create_event(CreateEventInput {
            participants,
            event_timezone: Some("UTC".to_owned()),
            start_local: Some(format!("2025-11-{day:02}T09:00")),
            end_local: Some(format!("2025-11-{day:02}T10:00")),
            ..CreateEventInput::default()
        })
        .await
        .map(|view| view.event.id())
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn create_profile_canonicalizes_legacy_zone() {
    let fixture = fixture();

    let created = fixture
        .service
        .create_profile(input("Asha", "Asia/Calcutta"))
        .await;
    assert!(created.is_ok());
    let created = created.unwrap_or_else(|_| unreachable!());
    assert_eq!(created.timezone().as_str(), "Asia/Kolkata");

    let fetched = fixture.service.get_profile(created.id()).await;
    assert_eq!(
        fetched.map(|profile| profile.timezone().as_str().to_owned()).ok(),
        Some("Asia/Kolkata".to_owned())
    );
}

#[tokio::test]
async fn create_profile_rejects_unknown_zone_and_blank_name() {
    let fixture = fixture();

    let unknown_zone = fixture
        .service
        .create_profile(input("Asha", "Mars/Olympus_Mons"))
        .await;
    assert!(matches!(unknown_zone, Err(AppError::Validation(_))));

    let blank_name = fixture.service.create_profile(input("   ", "UTC")).await;
    assert!(matches!(blank_name, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn duplicate_names_conflict() {
    let fixture = fixture();
    assert!(fixture.service.create_profile(input("Asha", "UTC")).await.is_ok());

    let duplicate = fixture
        .service
        .create_profile(input(" Asha ", "Europe/Paris"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn list_profiles_filters_case_insensitively_and_sorts_by_name() {
    let fixture = fixture();
    for name in ["Marta", "Asha", "Mark"] {
        assert!(fixture.service.create_profile(input(name, "UTC")).await.is_ok());
    }

    let all = fixture.service.list_profiles(None).await.unwrap_or_default();
    let names: Vec<&str> = all.iter().map(|profile| profile.name().as_str()).collect();
    assert_eq!(names, vec!["Asha", "Mark", "Marta"]);

    let filtered = fixture
        .service
        .list_profiles(Some("  mAR "))
        .await
        .unwrap_or_default();
    assert_eq!(filtered.len(), 2);
}

#[tokio::test]
async fn update_profile_renames_and_relocates() {
    let fixture = fixture();
    let created = fixture
        .service
        .create_profile(input("Asha", "UTC"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = fixture
        .service
        .update_profile(
            created.id(),
            UpdateProfileInput {
                name: Some("Asha R".to_owned()),
                timezone: Some("Europe/Kiev".to_owned()),
            },
        )
        .await;
    assert!(updated.is_ok());
    let updated = updated.unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.name().as_str(), "Asha R");
    assert_eq!(updated.timezone().as_str(), "Europe/Kyiv");
    assert!(updated.updated_at_utc() >= created.updated_at_utc());
}

#[tokio::test]
async fn update_profile_rejects_taken_name() {
    let fixture = fixture();
    assert!(fixture.service.create_profile(input("Asha", "UTC")).await.is_ok());
    let other = fixture
        .service
        .create_profile(input("Bruno", "UTC"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = fixture
        .service
        .update_profile(
            other.id(),
            UpdateProfileInput {
                name: Some("Asha".to_owned()),
                timezone: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn delete_profile_cascades_without_log_entries() {
    let fixture = fixture();
    let leaving = fixture
        .service
        .create_profile(input("Asha", "Asia/Kolkata"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let staying = fixture
        .service
        .create_profile(input("Bruno", "Europe/Paris"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let first = create_event(&fixture, vec![leaving.id(), staying.id()], 10).await;
    let second = create_event(&fixture, vec![staying.id(), leaving.id()], 11).await;
    let untouched = create_event(&fixture, vec![staying.id()], 12).await;
    let untouched_before = fixture
        .events
        .find_event(untouched)
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    let entries_before = fixture.logs.entries.lock().await.len();
    assert_eq!(entries_before, 3);

    assert!(fixture.service.delete_profile(leaving.id()).await.is_ok());

    for event_id in [first, second] {
        let stored = fixture
            .events
            .find_event(event_id)
            .await
            .unwrap_or_default()
            .unwrap_or_else(|| unreachable!());
        assert_eq!(stored.participants(), &[staying.id()]);
        assert!(stored.updated_at_utc() >= stored.created_at_utc());
    }

    let stored_untouched = fixture
        .events
        .find_event(untouched)
        .await
        .unwrap_or_default()
        .unwrap_or_else(|| unreachable!());
    assert_eq!(stored_untouched, untouched_before);

    assert_eq!(fixture.logs.entries.lock().await.len(), entries_before);
    assert!(matches!(
        fixture.service.get_profile(leaving.id()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_missing_profile_is_not_found() {
    let fixture = fixture();
    let result = fixture.service.delete_profile(ProfileId::new()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
