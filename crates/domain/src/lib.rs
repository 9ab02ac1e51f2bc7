//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod event;
mod event_diff;
mod event_log;
mod interval;
mod profile;
mod timezone;

pub use event::{
    EVENT_TITLE_MAX_LENGTH, Event, EventId, EventParts, instant_value, normalize_title,
    participants_value,
};
pub use event_diff::{EventDiff, FieldChange, TrackedField, build_diff};
pub use event_log::EventChange;
pub use interval::{
    EventInputRef, EventInterval, resolve_boundary, validate_date_range, validate_event_input,
    validate_participants,
};
pub use profile::{PROFILE_NAME_MAX_LENGTH, Profile, ProfileId, ProfileName};
pub use timezone::{CanonicalTimezone, LEGACY_TIMEZONE_ALIASES, TimezoneCatalog};
