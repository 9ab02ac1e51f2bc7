//! Structural checks for event intervals and participant sets.
//!
//! Every check fails fast with [`AppError::Validation`] on the first violated
//! rule; nothing here partially succeeds.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use meridian_core::{AppError, AppResult};
use serde::Serialize;

use crate::{CanonicalTimezone, ProfileId, TimezoneCatalog};

/// A start/end pair of UTC instants with `end_at_utc > start_at_utc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventInterval {
    start_at_utc: DateTime<Utc>,
    end_at_utc: DateTime<Utc>,
}

impl EventInterval {
    /// Creates an interval, rejecting empty or reversed ranges.
    pub fn new(start_at_utc: DateTime<Utc>, end_at_utc: DateTime<Utc>) -> AppResult<Self> {
        if end_at_utc <= start_at_utc {
            return Err(AppError::Validation(
                "end time must be after start time".to_owned(),
            ));
        }

        Ok(Self {
            start_at_utc,
            end_at_utc,
        })
    }

    /// Returns the inclusive start instant.
    #[must_use]
    pub fn start_at_utc(&self) -> DateTime<Utc> {
        self.start_at_utc
    }

    /// Returns the exclusive end instant.
    #[must_use]
    pub fn end_at_utc(&self) -> DateTime<Utc> {
        self.end_at_utc
    }

    /// Returns the interval length.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.end_at_utc - self.start_at_utc
    }
}

/// Raw event fields as received from a caller, before normalization.
#[derive(Debug, Clone, Copy)]
pub struct EventInputRef<'a> {
    /// Requested participants in caller order.
    pub participants: &'a [ProfileId],
    /// Zone the wall-clock boundaries are authored in.
    pub event_timezone: Option<&'a str>,
    /// Local start wall clock.
    pub start_local: Option<&'a str>,
    /// Local end wall clock.
    pub end_local: Option<&'a str>,
}

/// Checks both boundaries are present, resolvable, and correctly ordered.
///
/// `resolve` turns one raw boundary into an instant, typically
/// [`TimezoneCatalog::local_to_utc`] bound to the event zone.
pub fn validate_date_range<F>(
    start: Option<&str>,
    end: Option<&str>,
    resolve: F,
) -> AppResult<EventInterval>
where
    F: Fn(&str) -> Option<DateTime<Utc>>,
{
    let (Some(start), Some(end)) = (non_blank(start), non_blank(end)) else {
        return Err(AppError::Validation(
            "start and end times are required".to_owned(),
        ));
    };

    let start_at_utc = resolve_boundary(start, "start", &resolve)?;
    let end_at_utc = resolve_boundary(end, "end", &resolve)?;

    EventInterval::new(start_at_utc, end_at_utc)
}

/// Resolves a single boundary, reporting unparseable input as a format error.
pub fn resolve_boundary<F>(value: &str, label: &str, resolve: F) -> AppResult<DateTime<Utc>>
where
    F: Fn(&str) -> Option<DateTime<Utc>>,
{
    resolve(value).ok_or_else(|| {
        AppError::Validation(format!("invalid date format for {label} time '{value}'"))
    })
}

/// Rejects empty participant lists and repeated identities.
pub fn validate_participants(participants: &[ProfileId]) -> AppResult<()> {
    if participants.is_empty() {
        return Err(AppError::Validation(
            "at least one participant is required".to_owned(),
        ));
    }

    let mut seen = HashSet::with_capacity(participants.len());
    if let Some(duplicate) = participants.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::Validation(format!(
            "participant '{duplicate}' is listed more than once"
        )));
    }

    Ok(())
}

/// Runs the event-level checks in order: participants, zone, boundaries.
pub fn validate_event_input(
    input: EventInputRef<'_>,
    catalog: &TimezoneCatalog,
) -> AppResult<(CanonicalTimezone, EventInterval)> {
    validate_participants(input.participants)?;

    let event_timezone = catalog.canonicalize(input.event_timezone.unwrap_or_default())?;
    let interval = validate_date_range(input.start_local, input.end_local, |local| {
        catalog.local_to_utc(local, event_timezone.as_str())
    })?;

    Ok((event_timezone, interval))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
