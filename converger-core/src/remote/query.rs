//! Server-side listing parameters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConvergeConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    #[default]
    StartTime,
    Updated,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBy::StartTime => write!(f, "startTime"),
            OrderBy::Updated => write!(f, "updated"),
        }
    }
}

/// Parameters of a listing call.
///
/// This only narrows the candidate set; the reconciler filters the result
/// again locally, since providers may treat `query` as a loose text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub show_deleted: bool,
    /// Expand recurring events into single instances
    pub single_events: bool,
    pub time_min: DateTime<Utc>,
    pub query: String,
    pub max_results: u32,
    pub order_by: OrderBy,
}

impl ListQuery {
    pub fn candidates(reference: DateTime<Utc>, title_prefix: &str, config: &ConvergeConfig) -> Self {
        ListQuery {
            show_deleted: false,
            single_events: true,
            time_min: reference,
            query: title_prefix.to_string(),
            max_results: config.max_results,
            order_by: OrderBy::StartTime,
        }
    }
}
