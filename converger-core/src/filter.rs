//! Narrowing events down to the ones a run is responsible for.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::ConvergeResult;
use crate::event::DesiredEvent;
use crate::remote::RemoteEvent;

/// Something with a title and a start instant.
pub trait Scheduled {
    fn title(&self) -> &str;
    fn start_instant(&self) -> ConvergeResult<DateTime<FixedOffset>>;
}

impl Scheduled for DesiredEvent {
    fn title(&self) -> &str {
        &self.title
    }

    fn start_instant(&self) -> ConvergeResult<DateTime<FixedOffset>> {
        Ok(self.start)
    }
}

impl Scheduled for RemoteEvent {
    fn title(&self) -> &str {
        &self.title
    }

    fn start_instant(&self) -> ConvergeResult<DateTime<FixedOffset>> {
        RemoteEvent::start_instant(self)
    }
}

/// Keep the events starting at or after `reference` whose title starts with
/// `title_prefix` (case-sensitive, byte-wise). Input order is preserved.
///
/// The start is checked first, so an unparseable start fails the filter
/// even when the title would not have matched.
pub fn filter_relevant<'a, E: Scheduled>(
    events: &'a [E],
    reference: DateTime<Utc>,
    title_prefix: &str,
) -> ConvergeResult<Vec<&'a E>> {
    let mut relevant = Vec::new();

    for event in events {
        if event.start_instant()?.with_timezone(&Utc) < reference {
            continue;
        }
        if !event.title().starts_with(title_prefix) {
            continue;
        }
        relevant.push(event);
    }

    Ok(relevant)
}
