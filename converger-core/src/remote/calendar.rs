use async_trait::async_trait;

use crate::error::ConvergeResult;
use crate::remote::{EventDraft, ListQuery, RemoteEvent};

/// Read and write access to a remote calendar.
///
/// Every call is a single request/response; failures are reported as
/// `ConvergeError::Remote` and are not retried by the caller.
#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    /// List candidate events, narrowed server-side by `query`.
    async fn list_events(&self, calendar_id: &str, query: &ListQuery) -> ConvergeResult<Vec<RemoteEvent>>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ConvergeResult<()>;

    /// Insert a new event, returning it with its remote-assigned id.
    async fn insert_event(&self, calendar_id: &str, draft: &EventDraft) -> ConvergeResult<RemoteEvent>;
}
