use std::sync::Arc;

use meridian_application::{
    AuditDispatcher, EventListLimits, EventLogRepository, EventLogService, EventRepository,
    EventService, ProfileRepository, ProfileService,
};
use meridian_domain::TimezoneCatalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub event_service: EventService,
    pub event_log_service: EventLogService,
    pub timezone_catalog: Arc<TimezoneCatalog>,
}

impl AppState {
    /// Wires services over one set of repositories.
    pub fn from_repositories(
        profiles: Arc<dyn ProfileRepository>,
        events: Arc<dyn EventRepository>,
        event_logs: Arc<dyn EventLogRepository>,
        timezone_catalog: Arc<TimezoneCatalog>,
        event_list_limits: EventListLimits,
    ) -> Self {
        Self {
            profile_service: ProfileService::new(
                profiles.clone(),
                events.clone(),
                timezone_catalog.clone(),
            ),
            event_service: EventService::new(
                events.clone(),
                profiles.clone(),
                AuditDispatcher::new(event_logs.clone()),
                timezone_catalog.clone(),
                event_list_limits,
            ),
            event_log_service: EventLogService::new(event_logs, events, profiles),
            timezone_catalog,
        }
    }
}

#[cfg(test)]
pub(crate) fn in_memory_state() -> AppState {
    use meridian_infrastructure::{
        InMemoryEventLogRepository, InMemoryEventRepository, InMemoryProfileRepository,
    };

    AppState::from_repositories(
        Arc::new(InMemoryProfileRepository::new()),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(InMemoryEventLogRepository::new()),
        Arc::new(TimezoneCatalog::from_tz_database()),
        EventListLimits::default(),
    )
}
