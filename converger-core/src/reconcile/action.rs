use std::fmt;

use crate::remote::{EventDraft, RemoteEvent};

/// A single write against the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Delete(RemoteEvent),
    Insert(EventDraft),
}

impl Action {
    pub fn title(&self) -> &str {
        match self {
            Action::Delete(event) => &event.title,
            Action::Insert(draft) => &draft.title,
        }
    }

    pub fn start(&self) -> &str {
        match self {
            Action::Delete(event) => &event.start,
            Action::Insert(draft) => &draft.start,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Delete(_) => "delete",
            Action::Insert(_) => "insert",
        };
        write!(f, "{}: {}: {}", verb, self.start(), self.title())
    }
}
