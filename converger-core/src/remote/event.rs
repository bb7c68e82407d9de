//! Provider-neutral representation of remote events.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::config::ConvergeConfig;
use crate::error::{ConvergeError, ConvergeResult};
use crate::event::DesiredEvent;

/// An event as reported by a listing of the remote calendar.
///
/// `start` and `end` hold the remote's own timestamp text (empty for
/// all-day events); they are parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
}

impl RemoteEvent {
    pub fn start_instant(&self) -> ConvergeResult<DateTime<FixedOffset>> {
        self.parse_instant("start", &self.start)
    }

    pub fn end_instant(&self) -> ConvergeResult<DateTime<FixedOffset>> {
        self.parse_instant("end", &self.end)
    }

    fn parse_instant(&self, field: &'static str, value: &str) -> ConvergeResult<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(value).map_err(|source| ConvergeError::Parse {
            event_id: self.id.clone(),
            field,
            value: value.to_string(),
            source,
        })
    }
}

/// Whether an event blocks time on the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    /// Event blocks time on calendar
    #[default]
    Opaque,
    /// Event does not block time (shows as free)
    Transparent,
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transparency::Opaque => write!(f, "opaque"),
            Transparency::Transparent => write!(f, "transparent"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Default,
    Public,
    #[default]
    Private,
    Confidential,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Default => write!(f, "default"),
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Confidential => write!(f, "confidential"),
        }
    }
}

/// A new event to be inserted into the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    /// RFC3339, keeping the offset of the desired event
    pub start: String,
    pub end: String,
    pub time_zone: String,
    pub color_id: String,
    pub transparency: Transparency,
    pub visibility: Visibility,
}

impl EventDraft {
    /// Map a desired event onto the remote representation, filling the fixed
    /// attributes from the configuration.
    pub fn from_desired(event: &DesiredEvent, config: &ConvergeConfig) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end: event.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: config.time_zone.clone(),
            color_id: config.color_id.clone(),
            transparency: config.transparency,
            visibility: config.visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn remote(start: &str, end: &str) -> RemoteEvent {
        RemoteEvent {
            id: "abc".to_string(),
            title: "Meeting".to_string(),
            description: String::new(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn parses_remote_instants() {
        let event = remote("2024-01-01T09:00:00+09:00", "2024-01-01T00:15:00Z");
        let utc = chrono::Utc;

        assert_eq!(event.start_instant().unwrap(), utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(event.end_instant().unwrap(), utc.with_ymd_and_hms(2024, 1, 1, 0, 15, 0).unwrap());
    }

    #[test]
    fn unparseable_instant_names_event_and_field() {
        let event = remote("", "2024-01-01T00:15:00Z");

        let err = event.start_instant().unwrap_err();

        match err {
            ConvergeError::Parse { event_id, field, .. } => {
                assert_eq!(event_id, "abc");
                assert_eq!(field, "start");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn draft_carries_fixed_attributes() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let desired = DesiredEvent {
            title: "Meeting: standup".to_string(),
            description: "daily".to_string(),
            start: jst.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end: jst.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap(),
        };

        let draft = EventDraft::from_desired(&desired, &ConvergeConfig::default());

        assert_eq!(draft.start, "2024-01-01T09:00:00+09:00");
        assert_eq!(draft.end, "2024-01-01T09:15:00+09:00");
        assert_eq!(draft.time_zone, "Asia/Tokyo");
        assert_eq!(draft.color_id, "11");
        assert_eq!(draft.transparency, Transparency::Opaque);
        assert_eq!(draft.visibility, Visibility::Private);
    }
}
