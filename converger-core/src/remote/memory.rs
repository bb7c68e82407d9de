//! In-process remote calendar.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{ConvergeError, ConvergeResult};
use crate::remote::{EventDraft, ListQuery, RemoteCalendar, RemoteEvent};

/// A remote call observed by [`MemoryCalendar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { calendar_id: String, query: String },
    Delete { calendar_id: String, event_id: String },
    Insert { calendar_id: String, draft: EventDraft },
}

#[derive(Default)]
struct State {
    events: Vec<RemoteEvent>,
    calls: Vec<Call>,
    writes: usize,
    fail_on_write: Option<usize>,
}

/// A calendar held in memory.
///
/// Listing applies the query loosely, the way a hosted calendar does: a
/// lower bound on the start time, a substring match on the title, a result
/// cap and start-time ordering. Events whose start cannot be parsed are
/// always listed.
#[derive(Default)]
pub struct MemoryCalendar {
    state: Mutex<State>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<RemoteEvent>) -> Self {
        let calendar = Self::new();
        calendar.lock().events = events;
        calendar
    }

    /// Make the `n`th write (delete or insert, counting from 1) fail.
    pub fn fail_on_write(self, n: usize) -> Self {
        self.lock().fail_on_write = Some(n);
        self
    }

    pub fn events(&self) -> Vec<RemoteEvent> {
        self.lock().events.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test thread panicked mid-call.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl State {
    fn record_write(&mut self, call: Call) -> ConvergeResult<()> {
        self.writes += 1;
        self.calls.push(call);
        if self.fail_on_write == Some(self.writes) {
            return Err(ConvergeError::Remote(format!("injected failure on write {}", self.writes)));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteCalendar for MemoryCalendar {
    async fn list_events(&self, calendar_id: &str, query: &ListQuery) -> ConvergeResult<Vec<RemoteEvent>> {
        let mut state = self.lock();
        state.calls.push(Call::List {
            calendar_id: calendar_id.to_string(),
            query: query.query.clone(),
        });

        let mut listed: Vec<RemoteEvent> = state
            .events
            .iter()
            .filter(|e| e.title.contains(&query.query))
            .filter(|e| match DateTime::parse_from_rfc3339(&e.start) {
                Ok(start) => start.with_timezone(&Utc) >= query.time_min,
                Err(_) => true,
            })
            .cloned()
            .collect();

        listed.sort_by_key(|e| DateTime::parse_from_rfc3339(&e.start).ok());
        listed.truncate(query.max_results as usize);

        Ok(listed)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ConvergeResult<()> {
        let mut state = self.lock();
        state.record_write(Call::Delete {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })?;

        let before = state.events.len();
        state.events.retain(|e| e.id != event_id);
        if state.events.len() == before {
            return Err(ConvergeError::Remote(format!("event not found: {}", event_id)));
        }

        Ok(())
    }

    async fn insert_event(&self, calendar_id: &str, draft: &EventDraft) -> ConvergeResult<RemoteEvent> {
        let mut state = self.lock();
        state.record_write(Call::Insert {
            calendar_id: calendar_id.to_string(),
            draft: draft.clone(),
        })?;

        let event = RemoteEvent {
            id: uuid::Uuid::new_v4().simple().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            start: draft.start.clone(),
            end: draft.end.clone(),
        };
        state.events.push(event.clone());

        Ok(event)
    }
}
