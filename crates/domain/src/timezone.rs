//! Timezone identifier normalization and wall-clock conversion.
//!
//! [`TimezoneCatalog`] is built once from the IANA database compiled into
//! `chrono-tz` plus a table of legacy aliases. It is immutable after
//! construction; a newer zone database means rebuilding the binary. Services
//! receive the catalog through an `Arc` instead of consulting global state.
//!
//! Wall-clock resolution around daylight-saving transitions:
//!
//! * a local time that falls inside a spring-forward gap is read with the
//!   offset in force before the transition, which shifts it forward by the
//!   length of the gap (02:30 on a New York spring-forward day becomes 03:30 EDT);
//! * a local time that occurs twice during a fall-back overlap resolves to the
//!   earlier instant, i.e. the first occurrence.

use std::collections::BTreeMap;

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, SubsecRound,
    TimeZone, Utc,
};
use chrono_tz::{TZ_VARIANTS, Tz};
use meridian_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Legacy zone names and their modern canonical replacement.
pub const LEGACY_TIMEZONE_ALIASES: &[(&str, &str)] = &[
    ("Asia/Calcutta", "Asia/Kolkata"),
    ("Calcutta", "Asia/Kolkata"),
    ("Asia/Saigon", "Asia/Ho_Chi_Minh"),
    ("Asia/Katmandu", "Asia/Kathmandu"),
    ("Asia/Rangoon", "Asia/Yangon"),
    ("Europe/Kiev", "Europe/Kyiv"),
];

const WALL_CLOCK_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An alias-resolved IANA zone name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalTimezone(String);

impl CanonicalTimezone {
    /// Wraps a zone name read back from storage, where it was canonicalized on write.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the zone name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CanonicalTimezone {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Lookup service for canonical zone names, legacy aliases and conversions.
#[derive(Debug, Clone)]
pub struct TimezoneCatalog {
    zones: BTreeMap<&'static str, Tz>,
    aliases: BTreeMap<&'static str, &'static str>,
}

impl TimezoneCatalog {
    /// Builds a catalog from the compiled-in zone database and the default alias table.
    #[must_use]
    pub fn from_tz_database() -> Self {
        Self::with_aliases(LEGACY_TIMEZONE_ALIASES)
    }

    /// Builds a catalog with a custom alias table.
    ///
    /// Alias keys are never treated as canonical, even when the zone database
    /// still ships them as links. Aliases pointing at unknown zones are dropped.
    #[must_use]
    pub fn with_aliases(aliases: &[(&'static str, &'static str)]) -> Self {
        let mut zones: BTreeMap<&'static str, Tz> =
            TZ_VARIANTS.iter().map(|zone| (zone.name(), *zone)).collect();

        for (alias, _) in aliases {
            zones.remove(alias);
        }

        let aliases = aliases
            .iter()
            .filter(|(_, target)| zones.contains_key(target))
            .map(|(alias, target)| (*alias, *target))
            .collect();

        Self { zones, aliases }
    }

    /// Returns whether `tz` names a canonical zone, a legacy alias, or a
    /// canonical zone once internal whitespace runs become underscores.
    #[must_use]
    pub fn is_valid_timezone(&self, tz: &str) -> bool {
        if tz.is_empty() {
            return false;
        }

        self.zones.contains_key(tz)
            || self.aliases.contains_key(tz)
            || self.zones.contains_key(underscore_whitespace(tz).as_str())
    }

    /// Best-effort canonicalization. Unknown input comes back trimmed but
    /// otherwise unchanged, so gate on [`Self::is_valid_timezone`] first.
    #[must_use]
    pub fn normalize_timezone(&self, tz: &str) -> String {
        let trimmed = tz.trim();

        if let Some((name, _)) = self.zones.get_key_value(trimmed) {
            return (*name).to_owned();
        }

        if let Some(target) = self.aliases.get(trimmed) {
            return (*target).to_owned();
        }

        let underscored = underscore_whitespace(trimmed);
        if self.zones.contains_key(underscored.as_str()) {
            return underscored;
        }

        trimmed.to_owned()
    }

    /// Validates and canonicalizes a caller-supplied zone, trimming it first.
    pub fn canonicalize(&self, tz: &str) -> AppResult<CanonicalTimezone> {
        let trimmed = tz.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("timezone is required".to_owned()));
        }

        if !self.is_valid_timezone(trimmed) {
            return Err(AppError::Validation(format!("invalid timezone '{trimmed}'")));
        }

        Ok(CanonicalTimezone(self.normalize_timezone(trimmed)))
    }

    /// Converts a wall-clock string to a UTC instant, reading it as local time in `tz`.
    ///
    /// Accepts `YYYY-MM-DDTHH:MM` with optional seconds and fraction, a space
    /// instead of `T`, or a bare date meaning local midnight. A string that
    /// already carries an RFC 3339 offset is taken as that absolute instant.
    /// Returns `None` when the string cannot be parsed. An unknown zone is not
    /// an error here: the wall clock is read as UTC and a warning is logged.
    ///
    /// Results are truncated to whole microseconds, the storage precision.
    #[must_use]
    pub fn local_to_utc(&self, local: &str, tz: &str) -> Option<DateTime<Utc>> {
        let trimmed = local.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(instant.with_timezone(&Utc).trunc_subsecs(6));
        }

        let naive = parse_wall_clock(trimmed)?;
        let instant = match self.zone(tz) {
            Some(zone) => resolve_local(&zone, naive)?,
            None => {
                warn!(timezone = tz, "unknown timezone, reading wall clock as UTC");
                naive.and_utc()
            }
        };

        Some(instant.trunc_subsecs(6))
    }

    /// Projects a UTC instant onto the wall clock of `tz`.
    #[must_use]
    pub fn utc_to_local(&self, instant: DateTime<Utc>, tz: &str) -> Option<NaiveDateTime> {
        self.zone(tz)
            .map(|zone| instant.with_timezone(&zone).naive_local())
    }

    /// Returns every canonical zone name in sorted order.
    #[must_use]
    pub fn zone_names(&self) -> Vec<&'static str> {
        self.zones.keys().copied().collect()
    }

    fn zone(&self, tz: &str) -> Option<Tz> {
        self.zones
            .get(self.normalize_timezone(tz).as_str())
            .copied()
    }
}

impl Default for TimezoneCatalog {
    fn default() -> Self {
        Self::from_tz_database()
    }
}

/// Replaces each whitespace run with one `_`. Edge runs are replaced too, so
/// padded input never matches a zone name.
fn underscore_whitespace(value: &str) -> String {
    let mut underscored = String::with_capacity(value.len());
    let mut in_run = false;
    for character in value.chars() {
        if character.is_whitespace() {
            if !in_run {
                underscored.push('_');
            }
            in_run = true;
        } else {
            underscored.push(character);
            in_run = false;
        }
    }
    underscored
}

fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn resolve_local(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(local) => Some(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => Some(first.min(second).with_timezone(&Utc)),
        LocalResult::None => {
            // Transitions are never a day apart, so a day earlier is safely pre-gap.
            let probe = naive.checked_sub_signed(Duration::days(1))?;
            let offset_before_gap = zone.offset_from_utc_datetime(&probe).fix();
            naive
                .checked_sub_signed(Duration::seconds(i64::from(
                    offset_before_gap.local_minus_utc(),
                )))
                .map(|utc| utc.and_utc())
        }
    }
}
