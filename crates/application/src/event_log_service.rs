use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use meridian_core::{AppError, AppResult};
use meridian_domain::{EventId, ProfileId};

use crate::event_log_ports::{EventLogEntry, EventLogRepository};
use crate::event_ports::EventRepository;
use crate::event_service::ProfileSummary;
use crate::profile_ports::ProfileRepository;

/// A log entry with its author resolved, when the author still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogView {
    /// The stored entry.
    pub entry: EventLogEntry,
    /// Resolved author.
    pub updated_by: Option<ProfileSummary>,
}

/// Read side of the event log.
#[derive(Clone)]
pub struct EventLogService {
    logs: Arc<dyn EventLogRepository>,
    events: Arc<dyn EventRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl EventLogService {
    /// Creates a log service from repository implementations.
    #[must_use]
    pub fn new(
        logs: Arc<dyn EventLogRepository>,
        events: Arc<dyn EventRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            logs,
            events,
            profiles,
        }
    }

    /// Returns an event's log entries, newest first.
    ///
    /// Entries stay readable after the event is deleted. `NotFound` is
    /// returned only when the event has neither a stored row nor any entry.
    pub async fn logs_for_event(&self, event_id: EventId) -> AppResult<Vec<EventLogView>> {
        let entries = self.logs.list_entries_for_event(event_id).await?;
        if entries.is_empty() && self.events.find_event(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!("event '{event_id}' not found")));
        }

        let authors: BTreeSet<ProfileId> =
            entries.iter().filter_map(|entry| entry.updated_by).collect();
        let summaries: HashMap<ProfileId, ProfileSummary> = if authors.is_empty() {
            HashMap::new()
        } else {
            let ids: Vec<ProfileId> = authors.into_iter().collect();
            self.profiles
                .find_profiles(&ids)
                .await?
                .iter()
                .map(|profile| (profile.id(), ProfileSummary::from(profile)))
                .collect()
        };

        Ok(entries
            .into_iter()
            .map(|entry| {
                let updated_by = entry
                    .updated_by
                    .and_then(|id| summaries.get(&id))
                    .cloned();
                EventLogView { entry, updated_by }
            })
            .collect())
    }
}
