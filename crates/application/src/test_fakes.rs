use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meridian_core::{AppError, AppResult};
use meridian_domain::{Event, EventId, Profile, ProfileId};
use tokio::sync::Mutex;

use crate::{
    EventListQuery, EventLogEntry, EventLogEntryId, EventLogRepository, EventRepository,
    NewEventLogEntry, ProfileListQuery, ProfileRepository,
};

#[derive(Default)]
pub(crate) struct FakeProfileRepository {
    pub(crate) profiles: Mutex<HashMap<ProfileId, Profile>>,
    /// Number of upcoming `find_profiles` calls that fail.
    pub(crate) failing_lookups: Mutex<usize>,
}

impl FakeProfileRepository {
    pub(crate) async fn insert(&self, profile: Profile) {
        self.profiles.lock().await.insert(profile.id(), profile);
    }
}

fn name_taken(profiles: &HashMap<ProfileId, Profile>, candidate: &Profile) -> bool {
    profiles.values().any(|existing| {
        existing.id() != candidate.id() && existing.name().as_str() == candidate.name().as_str()
    })
}

#[async_trait]
impl ProfileRepository for FakeProfileRepository {
    async fn create_profile(&self, profile: Profile) -> AppResult<()> {
        let mut profiles = self.profiles.lock().await;
        if name_taken(&profiles, &profile) {
            return Err(AppError::Conflict(format!(
                "profile '{}' already exists",
                profile.name().as_str()
            )));
        }

        profiles.insert(profile.id(), profile);
        Ok(())
    }

    async fn find_profile(&self, profile_id: ProfileId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.lock().await.get(&profile_id).cloned())
    }

    async fn find_profiles(&self, profile_ids: &[ProfileId]) -> AppResult<Vec<Profile>> {
        {
            let mut failing = self.failing_lookups.lock().await;
            if *failing > 0 {
                *failing -= 1;
                return Err(AppError::Internal("profile lookup unavailable".to_owned()));
            }
        }

        let profiles = self.profiles.lock().await;
        Ok(profile_ids
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }

    async fn list_profiles(&self, query: ProfileListQuery) -> AppResult<Vec<Profile>> {
        let needle = query.search.map(|search| search.to_lowercase());
        let profiles = self.profiles.lock().await;
        let mut listed: Vec<Profile> = profiles
            .values()
            .filter(|profile| {
                needle.as_ref().is_none_or(|needle| {
                    profile.name().as_str().to_lowercase().contains(needle.as_str())
                })
            })
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(listed)
    }

    async fn update_profile(&self, profile: Profile) -> AppResult<()> {
        let mut profiles = self.profiles.lock().await;
        if !profiles.contains_key(&profile.id()) {
            return Err(AppError::NotFound(format!(
                "profile '{}' not found",
                profile.id()
            )));
        }
        if name_taken(&profiles, &profile) {
            return Err(AppError::Conflict(format!(
                "profile '{}' already exists",
                profile.name().as_str()
            )));
        }

        profiles.insert(profile.id(), profile);
        Ok(())
    }

    async fn delete_profile(&self, profile_id: ProfileId) -> AppResult<bool> {
        Ok(self.profiles.lock().await.remove(&profile_id).is_some())
    }

    async fn count_existing(&self, profile_ids: &[ProfileId]) -> AppResult<usize> {
        let profiles = self.profiles.lock().await;
        Ok(profile_ids
            .iter()
            .filter(|id| profiles.contains_key(id))
            .count())
    }
}

#[derive(Default)]
pub(crate) struct FakeEventRepository {
    pub(crate) events: Mutex<HashMap<EventId, Event>>,
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn create_event(&self, event: Event) -> AppResult<()> {
        self.events.lock().await.insert(event.id(), event);
        Ok(())
    }

    async fn find_event(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self.events.lock().await.get(&event_id).cloned())
    }

    async fn list_events(&self, query: EventListQuery) -> AppResult<Vec<Event>> {
        let events = self.events.lock().await;
        let mut listed: Vec<Event> = events
            .values()
            .filter(|event| {
                query
                    .participant
                    .is_none_or(|participant| event.has_participant(participant))
                    && query.from.is_none_or(|from| event.start_at_utc() >= from)
                    && query.to.is_none_or(|to| event.start_at_utc() <= to)
            })
            .cloned()
            .collect();
        listed.sort_by_key(Event::start_at_utc);
        listed.truncate(query.limit);
        Ok(listed)
    }

    async fn update_event(&self, event: Event) -> AppResult<Event> {
        let mut events = self.events.lock().await;
        if !events.contains_key(&event.id()) {
            return Err(AppError::NotFound(format!("event '{}' not found", event.id())));
        }

        events.insert(event.id(), event.clone());
        Ok(event)
    }

    async fn delete_event(&self, event_id: EventId) -> AppResult<bool> {
        Ok(self.events.lock().await.remove(&event_id).is_some())
    }

    async fn remove_participant(
        &self,
        profile_id: ProfileId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut events = self.events.lock().await;
        let touched = events
            .values_mut()
            .filter(|event| event.has_participant(profile_id))
            .map(|event| event.remove_participant(profile_id, at))
            .filter(|removed| *removed)
            .count();
        Ok(touched as u64)
    }
}

#[derive(Default)]
pub(crate) struct FakeEventLogRepository {
    pub(crate) entries: Mutex<Vec<EventLogEntry>>,
}

#[async_trait]
impl EventLogRepository for FakeEventLogRepository {
    async fn append_entry(&self, entry: NewEventLogEntry) -> AppResult<EventLogEntry> {
        let stored = EventLogEntry {
            id: EventLogEntryId::new(),
            event_id: entry.event_id,
            updated_by: entry.updated_by,
            changed_at_utc: entry.changed_at_utc,
            diff: entry.diff,
        };
        self.entries.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_entries_for_event(&self, event_id: EventId) -> AppResult<Vec<EventLogEntry>> {
        let entries = self.entries.lock().await;
        let mut listed: Vec<EventLogEntry> = entries
            .iter()
            .rev()
            .filter(|entry| entry.event_id == event_id)
            .cloned()
            .collect();
        listed.sort_by(|left, right| right.changed_at_utc.cmp(&left.changed_at_utc));
        Ok(listed)
    }
}

pub(crate) struct FailingEventLogRepository;

#[async_trait]
impl EventLogRepository for FailingEventLogRepository {
    async fn append_entry(&self, _entry: NewEventLogEntry) -> AppResult<EventLogEntry> {
        Err(AppError::Internal("event log store unavailable".to_owned()))
    }

    async fn list_entries_for_event(&self, _event_id: EventId) -> AppResult<Vec<EventLogEntry>> {
        Err(AppError::Internal("event log store unavailable".to_owned()))
    }
}
