use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::ConvergeConfig;
use crate::error::ConvergeResult;
use crate::event::DesiredEvent;
use crate::reconcile::{Action, Plan, diff};
use crate::remote::{ListQuery, RemoteCalendar};

/// Drives a reconciliation run against a remote calendar.
///
/// Calls are issued one at a time; the first failure ends the run and
/// writes already made stay in place. Re-running converges.
pub struct Reconciler<'a, C: RemoteCalendar> {
    calendar: &'a C,
    config: &'a ConvergeConfig,
}

impl<'a, C: RemoteCalendar> Reconciler<'a, C> {
    pub fn new(calendar: &'a C, config: &'a ConvergeConfig) -> Self {
        Reconciler { calendar, config }
    }

    /// Fetch candidates and work out what has to change, without writing.
    pub async fn plan(
        &self,
        reference: DateTime<Utc>,
        title_prefix: &str,
        desired: &[DesiredEvent],
    ) -> ConvergeResult<Plan> {
        let query = ListQuery::candidates(reference, title_prefix, self.config);
        let remote = self.calendar.list_events(&self.config.calendar_id, &query).await?;

        debug!(
            calendar_id = %self.config.calendar_id,
            candidates = remote.len(),
            desired = desired.len(),
            "fetched remote candidates"
        );

        if remote.len() as u32 >= self.config.max_results {
            warn!(
                max_results = self.config.max_results,
                "listing hit the result cap; later events are not reconciled this run"
            );
        }

        diff(reference, title_prefix, desired, &remote, self.config)
    }

    /// Issue the plan's deletions, then its insertions.
    ///
    /// `on_action` is called right before each remote call.
    pub async fn apply<F>(&self, plan: &Plan, mut on_action: F) -> ConvergeResult<()>
    where
        F: FnMut(&Action),
    {
        let calendar_id = &self.config.calendar_id;

        for action in plan.actions() {
            on_action(&action);
            match &action {
                Action::Delete(event) => {
                    self.calendar.delete_event(calendar_id, &event.id).await?;
                    info!(event_id = %event.id, title = %event.title, "deleted event");
                }
                Action::Insert(draft) => {
                    let created = self.calendar.insert_event(calendar_id, draft).await?;
                    info!(event_id = %created.id, title = %created.title, "inserted event");
                }
            }
        }

        Ok(())
    }

    /// Plan and apply in one go, returning what was done.
    pub async fn run<F>(
        &self,
        reference: DateTime<Utc>,
        title_prefix: &str,
        desired: &[DesiredEvent],
        on_action: F,
    ) -> ConvergeResult<Plan>
    where
        F: FnMut(&Action),
    {
        let plan = self.plan(reference, title_prefix, desired).await?;
        self.apply(&plan, on_action).await?;
        Ok(plan)
    }
}
