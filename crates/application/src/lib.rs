//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_dispatcher;
mod event_log_ports;
mod event_log_service;
mod event_ports;
mod event_service;
mod profile_ports;
mod profile_service;

#[cfg(test)]
mod test_fakes;

pub use audit_dispatcher::AuditDispatcher;
pub use event_log_ports::{EventLogEntry, EventLogEntryId, EventLogRepository, NewEventLogEntry};
pub use event_log_service::{EventLogService, EventLogView};
pub use event_ports::{EventListQuery, EventRepository};
pub use event_service::{
    CreateEventInput, EventListFilter, EventListLimits, EventPatch, EventService, EventView,
    ParticipantView, ProfileSummary,
};
pub use profile_ports::{ProfileListQuery, ProfileRepository};
pub use profile_service::{CreateProfileInput, ProfileService, UpdateProfileInput};
