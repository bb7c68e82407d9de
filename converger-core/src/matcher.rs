//! Whether a remote event already represents a desired event.

use crate::error::ConvergeResult;
use crate::event::DesiredEvent;
use crate::remote::RemoteEvent;

/// Exact match on title, description, start and end.
///
/// Instants are compared as points in time, so `09:00+09:00` equals
/// `00:00Z`. Any other difference (whitespace, a one second shift) is a
/// mismatch.
pub fn matches(desired: &DesiredEvent, remote: &RemoteEvent) -> ConvergeResult<bool> {
    if desired.title != remote.title {
        return Ok(false);
    }
    if desired.description != remote.description {
        return Ok(false);
    }

    let start = remote.start_instant()?;
    let end = remote.end_instant()?;

    Ok(desired.start == start && desired.end == end)
}

/// Whether any of `candidates` matches `desired`.
pub fn any_matches(desired: &DesiredEvent, candidates: &[&RemoteEvent]) -> ConvergeResult<bool> {
    for remote in candidates {
        if matches(desired, remote)? {
            return Ok(true);
        }
    }
    Ok(false)
}
