//! Event lifecycle: create, read, update, delete.
//!
//! Every mutation that changes a tracked field hands exactly one entry to the
//! [`AuditDispatcher`]. Reads resolve participant ids into profile summaries
//! projected onto each participant's own zone.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use meridian_core::{AppError, AppResult};
use meridian_domain::{
    CanonicalTimezone, Event, EventChange, EventId, EventInputRef, EventInterval, Profile,
    ProfileId, TimezoneCatalog, TrackedField, build_diff, normalize_title, resolve_boundary,
    validate_event_input, validate_participants,
};

use crate::audit_dispatcher::AuditDispatcher;
use crate::event_log_ports::NewEventLogEntry;
use crate::event_ports::{EventListQuery, EventRepository};
use crate::profile_ports::ProfileRepository;

mod create;
mod delete;
mod display;
mod read;
mod update;

/// Input for creating an event from local wall-clock boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateEventInput {
    /// Participants in display order.
    pub participants: Vec<ProfileId>,
    /// Zone the boundaries are authored in.
    pub event_timezone: Option<String>,
    /// Local start wall clock.
    pub start_local: Option<String>,
    /// Local end wall clock.
    pub end_local: Option<String>,
    /// Optional title.
    pub title: Option<String>,
    /// Creating profile.
    pub created_by: Option<ProfileId>,
}

/// Partial event update. Absent or blank fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// Replacement participant list.
    pub participants: Option<Vec<ProfileId>>,
    /// New authoring zone. Boundaries not supplied keep their UTC instants.
    pub event_timezone: Option<String>,
    /// New local start, read in the resolved zone.
    pub start_local: Option<String>,
    /// New local end, read in the resolved zone.
    pub end_local: Option<String>,
    /// New title; blank clears it.
    pub title: Option<String>,
}

/// Filter for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventListFilter {
    /// Only events this profile participates in.
    pub participant: Option<ProfileId>,
    /// Inclusive lower bound on the start instant.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the start instant.
    pub to: Option<DateTime<Utc>>,
    /// Requested page size, clamped by [`EventListLimits`].
    pub limit: Option<usize>,
}

/// Page-size bounds for event listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventListLimits {
    default_limit: usize,
    max_limit: usize,
}

impl EventListLimits {
    /// Creates limits, requiring `1 <= default_limit <= max_limit`.
    pub fn new(default_limit: usize, max_limit: usize) -> AppResult<Self> {
        if default_limit == 0 || default_limit > max_limit {
            return Err(AppError::Validation(format!(
                "event list default limit must be between 1 and {max_limit}, got {default_limit}"
            )));
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Resolves a requested page size against the bounds.
    #[must_use]
    pub fn resolve(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}

impl Default for EventListLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 500,
        }
    }
}

/// A participant as seen from their own timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    /// Profile identifier.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// The participant's zone.
    pub timezone: CanonicalTimezone,
    /// Event start on the participant's wall clock.
    pub local_start: Option<NaiveDateTime>,
    /// Event end on the participant's wall clock.
    pub local_end: Option<NaiveDateTime>,
}

/// Identifier and name of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    /// Profile identifier.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id(),
            name: profile.name().as_str().to_owned(),
        }
    }
}

/// An event with participant and creator ids resolved to profiles.
///
/// Profiles that no longer exist are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventView {
    /// The stored event.
    pub event: Event,
    /// Resolved participants, in stored order.
    pub participants: Vec<ParticipantView>,
    /// Resolved creator.
    pub created_by: Option<ProfileSummary>,
}

/// Application service for event operations.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    profiles: Arc<dyn ProfileRepository>,
    audit: AuditDispatcher,
    catalog: Arc<TimezoneCatalog>,
    limits: EventListLimits,
}

impl EventService {
    /// Creates an event service from repository implementations.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        profiles: Arc<dyn ProfileRepository>,
        audit: AuditDispatcher,
        catalog: Arc<TimezoneCatalog>,
        limits: EventListLimits,
    ) -> Self {
        Self {
            events,
            profiles,
            audit,
            catalog,
            limits,
        }
    }

    async fn find_existing(&self, event_id: EventId) -> AppResult<Event> {
        self.events
            .find_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event '{event_id}' not found")))
    }

    async fn ensure_participants_exist(&self, participants: &[ProfileId]) -> AppResult<()> {
        let existing = self.profiles.count_existing(participants).await?;
        if existing != participants.len() {
            return Err(AppError::Validation(
                "one or more participants are invalid".to_owned(),
            ));
        }

        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
