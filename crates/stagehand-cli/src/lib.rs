//! Command-line host for the stagehand stage-availability core.

pub mod cli_args;

use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::{Datelike, Local, Weekday};
use stagehand_core::{
    LoggingDestination, ScheduleProvider, StageManager, StaticVersion, cache_path, init_logging,
    load_config,
};

pub use cli_args::{Cli, Command, ListArgs, TipsArgs};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(LoggingDestination::FileAndStderr)?;

    let loaded = load_config();
    for warning in &loaded.warnings {
        eprintln!("Warning: {warning}");
    }

    let client_type = cli
        .client
        .clone()
        .unwrap_or_else(|| loaded.config.client_type.clone());
    let core_version = cli
        .core_version
        .clone()
        .or_else(|| loaded.config.core_version.clone())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let provider = ScheduleProvider::new(loaded.config.schedule_url.clone(), cache_path())
        .context("failed to set up the schedule provider")?;
    let manager = StageManager::new(provider, Box::new(StaticVersion(core_version)), client_type);

    match cli.command {
        Command::List(args) => {
            let stages = if args.all {
                manager.all_stages()
            } else {
                manager.open_stages(resolve_day(args.day.as_deref())?)
            };
            for stage in stages {
                match stage.value.as_deref() {
                    Some(value) if !value.is_empty() && value != stage.display => {
                        println!("{} ({value})", stage.display);
                    }
                    _ => println!("{}", stage.display),
                }
            }
        }
        Command::Tips(args) => {
            let tips = manager.stage_tips(resolve_day(args.day.as_deref())?);
            if tips.is_empty() {
                println!("No hints for the selected day.");
            } else {
                print!("{tips}");
            }
        }
        Command::Refresh => {
            manager.refresh(true).await;
            println!("Schedule refreshed; {} entries.", manager.snapshot().len());
        }
    }

    Ok(())
}

fn resolve_day(raw: Option<&str>) -> anyhow::Result<Weekday> {
    match raw {
        None => Ok(Local::now().weekday()),
        Some(raw) => Weekday::from_str(raw).map_err(|_| anyhow!("unrecognized weekday {raw:?}")),
    }
}
