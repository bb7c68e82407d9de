//! Desired events and their ingestion from a JSON document.
//!
//! The input is a single JSON array:
//!
//! ```json
//! [{"title": "Meeting: standup", "description": "", "start": "2024-01-01T09:00:00+09:00", "end": "2024-01-01T09:15:00+09:00"}]
//! ```
//!
//! A batch is accepted only when every element is valid; otherwise nothing
//! is returned and the error lists every offending element.

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDate, SubsecRound};
use serde::{Deserialize, Deserializer};

use crate::error::{ConvergeError, ConvergeResult, Field, InvalidEvent, ValidationErrors};

/// An event that should exist in the remote calendar.
///
/// Instants keep the UTC offset they were written with, so the RFC3339
/// text pushed to the remote calendar matches the input. Fractional seconds
/// are dropped on input; Google Calendar only stores whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// One element of the input array, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "optional_instant")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "optional_instant")]
    pub end: Option<DateTime<FixedOffset>>,
}

impl RawEvent {
    /// Check the required fields, reporting all of the missing ones at once.
    pub fn validate(self) -> Result<DesiredEvent, InvalidEvent> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(Field::Title);
        }

        let start = self.start.filter(|dt| !is_zero(dt));
        if start.is_none() {
            missing.push(Field::Start);
        }

        let end = self.end.filter(|dt| !is_zero(dt));
        if end.is_none() {
            missing.push(Field::End);
        }

        match (start, end) {
            (Some(start), Some(end)) if missing.is_empty() => Ok(DesiredEvent {
                title: self.title,
                description: self.description,
                start,
                end,
            }),
            _ => Err(InvalidEvent { missing }),
        }
    }
}

/// Decode and validate a JSON array of desired events.
pub fn parse<R: Read>(reader: R) -> ConvergeResult<Vec<DesiredEvent>> {
    let raw: Vec<RawEvent> = serde_json::from_reader(reader)?;
    validate_all(raw)
}

/// Same as [`parse`], for input already held in memory.
pub fn parse_str(input: &str) -> ConvergeResult<Vec<DesiredEvent>> {
    let raw: Vec<RawEvent> = serde_json::from_str(input)?;
    validate_all(raw)
}

fn validate_all(raw: Vec<RawEvent>) -> ConvergeResult<Vec<DesiredEvent>> {
    let mut events = Vec::with_capacity(raw.len());
    let mut errors = ValidationErrors::default();

    for (index, raw_event) in raw.into_iter().enumerate() {
        match raw_event.validate() {
            Ok(event) => events.push(event),
            Err(invalid) => errors.0.push((index, invalid)),
        }
    }

    if !errors.is_empty() {
        return Err(ConvergeError::Validation(errors));
    }

    Ok(events)
}

/// `0001-01-01T00:00:00Z` is how an unset instant is commonly serialized.
fn is_zero(dt: &DateTime<FixedOffset>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .is_some_and(|zero| dt.naive_utc() == zero)
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn optional_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.trunc_subsecs(0)))
            .map_err(|e| serde::de::Error::custom(format!("invalid RFC3339 instant {:?}: {}", s, e))),
    }
}
