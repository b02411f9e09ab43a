use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "stagehand", version, about = "Query which game stages are open", long_about = None)]
pub struct Cli {
    /// Version string of the running automation core, used to gate event
    /// stages (defaults to the configured override, then this binary's
    /// version).
    #[arg(long = "core-version", value_name = "VERSION", global = true)]
    pub core_version: Option<String>,

    /// Override the configured game client/region (e.g. "Official",
    /// "Bilibili", "YoStarEN").
    #[arg(long = "client", value_name = "REGION", global = true)]
    pub client: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List stages open on a given day (today by default).
    List(ListArgs),
    /// Print the daily hint text.
    Tips(TipsArgs),
    /// Fetch the remote schedule document and rebuild the table.
    Refresh,
}

#[derive(Debug, Clone, Args, Default)]
pub struct ListArgs {
    /// Show every visible stage regardless of weekday.
    #[arg(long, action = ArgAction::SetTrue)]
    pub all: bool,

    /// Weekday to check instead of today (e.g. "mon", "sunday").
    #[arg(long, value_name = "DAY")]
    pub day: Option<String>,
}

#[derive(Debug, Clone, Args, Default)]
pub struct TipsArgs {
    /// Weekday to check instead of today (e.g. "mon", "sunday").
    #[arg(long, value_name = "DAY")]
    pub day: Option<String>,
}
