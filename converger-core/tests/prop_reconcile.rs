//! Property tests: reconciliation converges and is idempotent.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use converger_core::filter::filter_relevant;
use converger_core::matcher::matches;
use converger_core::remote::MemoryCalendar;
use converger_core::{ConvergeConfig, DesiredEvent, Reconciler, RemoteEvent};
use proptest::prelude::*;

const PREFIX: &str = "Meeting";
const TITLES: &[&str] = &["Meeting: a", "Meeting: b", "Lunch", "meeting: c"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// (title index, start offset in hours from now, length in hours)
fn slot() -> impl Strategy<Value = (usize, i64, i64)> {
    (0..TITLES.len(), -6i64..48, 1i64..4)
}

fn desired_from(slots: &[(usize, i64, i64)]) -> Vec<DesiredEvent> {
    let mut events: Vec<DesiredEvent> = Vec::new();
    for &(title, offset, length) in slots {
        let start = now() + Duration::hours(offset);
        let event = DesiredEvent {
            title: TITLES[title].to_string(),
            description: String::new(),
            start: start.fixed_offset(),
            end: (start + Duration::hours(length)).fixed_offset(),
        };
        if !events.contains(&event) {
            events.push(event);
        }
    }
    events
}

fn remote_from(slots: &[(usize, i64, i64)]) -> Vec<RemoteEvent> {
    desired_from(slots)
        .into_iter()
        .enumerate()
        .map(|(i, e)| RemoteEvent {
            id: format!("seed-{}", i),
            title: e.title,
            description: e.description,
            start: e.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end: e.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

proptest! {
    #[test]
    fn converges_and_second_run_is_empty(
        desired_slots in proptest::collection::vec(slot(), 0..8),
        remote_slots in proptest::collection::vec(slot(), 0..8),
    ) {
        let desired = desired_from(&desired_slots);
        let calendar = MemoryCalendar::with_events(remote_from(&remote_slots));
        let config = ConvergeConfig::default();
        let reconciler = Reconciler::new(&calendar, &config);
        let rt = runtime();

        rt.block_on(reconciler.run(now(), PREFIX, &desired, |_| {})).unwrap();
        let second = rt.block_on(reconciler.run(now(), PREFIX, &desired, |_| {})).unwrap();
        prop_assert!(second.is_empty(), "second run planned {:?}", second);

        let remaining = calendar.events();
        let relevant_remote = filter_relevant(&remaining, now(), PREFIX).unwrap();
        let relevant_desired = filter_relevant(&desired, now(), PREFIX).unwrap();

        for d in &relevant_desired {
            let copies = relevant_remote
                .iter()
                .filter(|r| matches(d, r).unwrap())
                .count();
            prop_assert_eq!(copies, 1, "desired {:?}", d);
        }

        for r in &relevant_remote {
            let wanted = relevant_desired.iter().any(|d| matches(d, r).unwrap());
            prop_assert!(wanted, "unwanted remote {:?} survived", r);
        }
    }
}
