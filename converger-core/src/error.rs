//! Error types for the converger.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while converging a calendar.
#[derive(Error, Debug)]
pub enum ConvergeError {
    #[error("Failed to decode events: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid events:\n{0}")]
    Validation(ValidationErrors),

    #[error("Unable to parse '{field}' of remote event {event_id} ({value:?}): {source}")]
    Parse {
        event_id: String,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Remote calendar error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for converger operations.
pub type ConvergeResult<T> = Result<T, ConvergeError>;

/// A required field of a desired event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Start,
    End,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Start => write!(f, "start"),
            Field::End => write!(f, "end"),
        }
    }
}

/// The missing fields of one desired event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEvent {
    pub missing: Vec<Field>,
}

impl fmt::Display for InvalidEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .missing
            .iter()
            .map(|field| format!("'{}' should be specified", field))
            .collect();
        write!(f, "{}", messages.join(","))
    }
}

/// Every invalid event of a batch, keyed by its position in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<(usize, InvalidEvent)>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .0
            .iter()
            .map(|(index, invalid)| format!("event {}: {}", index, invalid))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
