//! Command-line surface (§6.1). Modeled with `clap`'s derive API and a
//! mutually exclusive `ArgGroup` for the station-selection flags, so
//! conflicting selectors are rejected by the parser itself.

use clap::Args;

#[derive(Debug, clap::Parser)]
#[command(name = "weather-collector", about = "Polls a fleet of weather stations and persists observations")]
pub struct Cli {
    #[command(flatten)]
    pub selection: Selection,

    /// Suppress persistence and run against the synthetic benchmark
    /// reader instead of real endpoints.
    #[arg(long, visible_alias = "dry-run")]
    pub test_run: bool,

    /// Force sequential processing regardless of station count.
    #[arg(long)]
    pub single_thread: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Selection {
    /// Poll every active station in the catalog.
    #[arg(long)]
    pub all: bool,

    /// Poll only active stations of the given connection-type tag.
    #[arg(long, value_name = "TAG")]
    pub r#type: Option<String>,

    /// Poll a single station by id.
    #[arg(long, value_name = "STATION_ID")]
    pub id: Option<String>,
}
