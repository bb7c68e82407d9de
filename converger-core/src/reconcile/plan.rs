use chrono::{DateTime, Utc};

use crate::config::ConvergeConfig;
use crate::error::ConvergeResult;
use crate::event::DesiredEvent;
use crate::filter::filter_relevant;
use crate::matcher::{any_matches, matches};
use crate::reconcile::Action;
use crate::remote::{EventDraft, RemoteEvent};

/// The writes needed to make the remote calendar match the desired events.
///
/// Deletions come before insertions, each in start-time order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub deletions: Vec<RemoteEvent>,
    pub insertions: Vec<EventDraft>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.deletions
            .iter()
            .cloned()
            .map(Action::Delete)
            .chain(self.insertions.iter().cloned().map(Action::Insert))
            .collect()
    }
}

/// Compute the plan from already-fetched remote events.
///
/// Both passes look at the same filtered lists; nothing is removed from
/// either list while diffing.
pub fn diff(
    reference: DateTime<Utc>,
    title_prefix: &str,
    desired: &[DesiredEvent],
    remote: &[RemoteEvent],
    config: &ConvergeConfig,
) -> ConvergeResult<Plan> {
    let mut desired = filter_relevant(desired, reference, title_prefix)?;
    let remote = filter_relevant(remote, reference, title_prefix)?;

    desired.sort_by_key(|e| e.start);

    let mut keyed = Vec::with_capacity(remote.len());
    for event in remote {
        keyed.push((event.start_instant()?, event));
    }
    keyed.sort_by_key(|(start, _)| *start);
    let remote: Vec<&RemoteEvent> = keyed.into_iter().map(|(_, event)| event).collect();

    let mut plan = Plan::default();

    for candidate in &remote {
        let mut wanted = false;
        for event in &desired {
            if matches(event, candidate)? {
                wanted = true;
                break;
            }
        }
        if !wanted {
            plan.deletions.push((*candidate).clone());
        }
    }

    for event in &desired {
        if !any_matches(event, &remote)? {
            plan.insertions.push(EventDraft::from_desired(event, config));
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvergeError;
    use chrono::{FixedOffset, TimeZone};

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()
    }

    fn desired(title: &str, hour: u32) -> DesiredEvent {
        DesiredEvent {
            title: title.to_string(),
            description: String::new(),
            start: jst().with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            end: jst().with_ymd_and_hms(2024, 1, 1, hour, 30, 0).unwrap(),
        }
    }

    fn remote(id: &str, title: &str, hour: u32) -> RemoteEvent {
        RemoteEvent {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            start: format!("2024-01-01T{:02}:00:00+09:00", hour),
            end: format!("2024-01-01T{:02}:30:00+09:00", hour),
        }
    }

    fn plan(desired: &[DesiredEvent], remote: &[RemoteEvent]) -> Plan {
        diff(reference(), "Meeting", desired, remote, &ConvergeConfig::default()).unwrap()
    }

    #[test]
    fn inserts_into_empty_calendar() {
        let plan = plan(&[desired("Meeting: standup", 9)], &[]);

        assert!(plan.deletions.is_empty());
        assert_eq!(plan.insertions.len(), 1);
        assert_eq!(plan.insertions[0].title, "Meeting: standup");
        assert_eq!(plan.insertions[0].start, "2024-01-01T09:00:00+09:00");
    }

    #[test]
    fn deletes_undesired_remote_event() {
        let plan = plan(&[], &[remote("old", "Meeting: old", 9)]);

        assert!(plan.insertions.is_empty());
        assert_eq!(plan.deletions.len(), 1);
        assert_eq!(plan.deletions[0].id, "old");
    }

    #[test]
    fn matching_events_need_nothing() {
        let plan = plan(&[desired("Meeting: standup", 9)], &[remote("r1", "Meeting: standup", 9)]);
        assert!(plan.is_empty());
    }

    #[test]
    fn moved_event_is_delete_plus_insert() {
        let plan = plan(&[desired("Meeting: standup", 10)], &[remote("r1", "Meeting: standup", 9)]);

        assert_eq!(plan.deletions.len(), 1);
        assert_eq!(plan.insertions.len(), 1);
        let lines: Vec<String> = plan.actions().iter().map(|a| a.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "delete: 2024-01-01T09:00:00+09:00: Meeting: standup",
                "insert: 2024-01-01T10:00:00+09:00: Meeting: standup",
            ]
        );
    }

    #[test]
    fn events_outside_prefix_are_left_alone() {
        let plan = plan(&[desired("Lunch", 12)], &[remote("r1", "Dentist", 9)]);
        assert!(plan.is_empty());
    }

    #[test]
    fn actions_are_in_start_order() {
        let plan = plan(
            &[desired("Meeting: c", 11), desired("Meeting: a", 9)],
            &[remote("late", "Meeting: y", 15), remote("early", "Meeting: x", 8)],
        );

        let ids: Vec<&str> = plan.deletions.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        let titles: Vec<&str> = plan.insertions.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Meeting: a", "Meeting: c"]);
    }

    #[test]
    fn remote_sort_uses_instants_not_text() {
        // 08:00Z is later than 09:00+09:00 (00:00Z) even though it sorts first as text
        let mut utc = remote("utc", "Meeting: utc", 0);
        utc.start = "2024-01-01T08:00:00Z".to_string();
        utc.end = "2024-01-01T08:30:00Z".to_string();

        let plan = plan(&[], &[utc, remote("jst", "Meeting: jst", 9)]);

        let ids: Vec<&str> = plan.deletions.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["jst", "utc"]);
    }

    #[test]
    fn duplicate_remote_copies_are_all_kept() {
        // Each remote copy matches the desired event, so neither is deleted
        let plan = plan(
            &[desired("Meeting: standup", 9)],
            &[remote("a", "Meeting: standup", 9), remote("b", "Meeting: standup", 9)],
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn unparseable_remote_start_aborts() {
        let mut all_day = remote("r1", "Meeting: offsite", 9);
        all_day.start = "2024-01-01".to_string();

        let err = diff(reference(), "Meeting", &[], &[all_day], &ConvergeConfig::default()).unwrap_err();
        assert!(matches!(err, ConvergeError::Parse { .. }));
    }
}
