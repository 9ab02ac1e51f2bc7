mod common;
mod events;
mod logs;
mod profiles;

pub use common::{HealthResponse, ProfileSummaryResponse, TimezoneListResponse};
pub use events::{
    CreateEventRequest, DeleteEventRequest, DeleteEventResponse, EventResponse,
    ParticipantResponse, UpdateEventRequest,
};
pub use logs::EventLogEntryResponse;
pub use profiles::{CreateProfileRequest, ProfileResponse, UpdateProfileRequest};
