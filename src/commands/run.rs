use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use converger_core::{ConvergeConfig, DesiredEvent, Reconciler, event};
use converger_provider_google::GoogleCalendar;

use crate::render;

pub async fn run(config: &ConvergeConfig, title_prefix: &str, input: Option<&Path>, dry_run: bool) -> Result<()> {
    if title_prefix.is_empty() {
        anyhow::bail!("--title-prefix-filter is not specified.");
    }

    // Validate the whole batch before touching the calendar
    let desired = read_events(input)?;
    tracing::debug!(count = desired.len(), "read desired events");

    let reference = Utc::now();
    let calendar = GoogleCalendar::connect(config).await?;
    let reconciler = Reconciler::new(&calendar, config);

    if dry_run {
        let plan = reconciler.plan(reference, title_prefix, &desired).await?;
        for action in plan.actions() {
            println!("{}", render::action(&action));
        }
        println!("{}", render::dry_run_summary(&plan));
        return Ok(());
    }

    let plan = reconciler
        .run(reference, title_prefix, &desired, |action| {
            println!("{}", render::action(action));
        })
        .await?;

    println!("{}", render::summary(&plan));

    Ok(())
}

fn read_events(input: Option<&Path>) -> Result<Vec<DesiredEvent>> {
    match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            event::parse(BufReader::new(file)).with_context(|| format!("Failed to read events from {}", path.display()))
        }
        None => event::parse(io::stdin().lock()).context("Failed to read events from stdin"),
    }
}
