//! Terminal output for reconciliation runs.

use converger_core::{Action, Plan};
use owo_colors::OwoColorize;

/// One line per remote write, e.g. `insert: 2024-01-01T09:00:00+09:00: Meeting: standup`.
pub fn action(action: &Action) -> String {
    action.to_string()
}

pub fn summary(plan: &Plan) -> String {
    if plan.is_empty() {
        return "Already converged".dimmed().to_string();
    }

    format!(
        "\nConverged: {} inserted, {} deleted",
        plan.insertions.len().green(),
        plan.deletions.len().red()
    )
}

pub fn dry_run_summary(plan: &Plan) -> String {
    if plan.is_empty() {
        return "Already converged".dimmed().to_string();
    }

    format!(
        "\nWould insert {}, delete {} (dry run, nothing written)",
        plan.insertions.len().green(),
        plan.deletions.len().red()
    )
}
