//! Conversions between Google's event resource and the converger's types.

use converger_core::{EventDraft, RemoteEvent};

use crate::types::{GoogleEvent, GoogleEventDateTime};

pub fn from_google(event: GoogleEvent) -> RemoteEvent {
    RemoteEvent {
        id: event.id,
        title: event.summary,
        description: event.description,
        start: date_time_or_empty(event.start),
        end: date_time_or_empty(event.end),
    }
}

/// All-day events carry no `dateTime`; they surface as an unparseable
/// (empty) instant.
fn date_time_or_empty(value: Option<GoogleEventDateTime>) -> String {
    value.and_then(|v| v.date_time).unwrap_or_default()
}

pub fn to_google(draft: &EventDraft) -> GoogleEvent {
    GoogleEvent {
        summary: draft.title.clone(),
        description: draft.description.clone(),
        start: Some(GoogleEventDateTime {
            date_time: Some(draft.start.clone()),
            date: None,
            time_zone: Some(draft.time_zone.clone()),
        }),
        end: Some(GoogleEventDateTime {
            date_time: Some(draft.end.clone()),
            date: None,
            time_zone: Some(draft.time_zone.clone()),
        }),
        color_id: draft.color_id.clone(),
        transparency: draft.transparency.to_string(),
        visibility: draft.visibility.to_string(),
        ..Default::default()
    }
}
