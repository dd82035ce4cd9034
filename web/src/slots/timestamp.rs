use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use thiserror::Error;

/// Layouts accepted after the RFC 3339 attempt fails. `%#z` takes `+03`,
/// `+0300` and `+03:00` alike, which covers the database form of stored
/// preferred slots.
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

#[derive(Debug, Error, Clone, PartialEq)]
#[error("unparseable slot timestamp: {0:?}")]
pub struct SlotParseError(pub String);

/// A bookable slot start. Equality and ordering are by instant, so two
/// strings that name the same moment with different offsets compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(DateTime<FixedOffset>);

impl SlotTime {
    pub fn parse(raw: &str) -> Result<Self, SlotParseError> {
        let trimmed = raw.trim();
        if trimmed.len() < 10 || !trimmed.is_char_boundary(10) {
            return Err(SlotParseError(raw.to_string()));
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(parsed));
        }

        // "2026-01-20 10:00:00+03" -> "2026-01-20T10:00:00+03"
        let (date, rest) = trimmed.split_at(10);
        let rest = rest.strip_prefix(' ').or_else(|| rest.strip_prefix('T'));
        let Some(rest) = rest else {
            return Err(SlotParseError(raw.to_string()));
        };
        let normalized = format!("{date}T{rest}");

        FALLBACK_FORMATS
            .iter()
            .find_map(|layout| DateTime::parse_from_str(&normalized, layout).ok())
            .map(Self)
            .ok_or_else(|| SlotParseError(raw.to_string()))
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(|utc| Self(utc.fixed_offset()))
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The single string form written to hidden inputs and sent to the save
    /// endpoint: UTC with millisecond precision, e.g. `2026-01-20T07:00:00.000Z`.
    pub fn canonical(&self) -> String {
        self.0
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `HH:MM` in the offset the timestamp was written with.
    pub fn time_label(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
