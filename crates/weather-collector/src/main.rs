mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Cli;
use std::sync::Arc;
use weather_collector::{Config, Gatherer, InMemoryStore, Persistence, ReaderRegistry};
use weather_core::new_run_id;

fn launch_command() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let log_path = std::env::var("COLLECTOR_LOG_FILE").unwrap_or_else(|_| "collector.log".to_string());
    weather_observability::init_logging(log_path, cli.test_run).context("failed to initialize logging")?;

    if config.is_remote_database() && !weather_collector::config::confirm_remote_database(&config.database_connection_url)? {
        bail!("aborted: database connection was not confirmed");
    }

    let persistence: Arc<dyn Persistence> = Arc::new(InMemoryStore::new());
    let run_id = new_run_id();
    let start = chrono::Utc::now();
    persistence.init_run(&run_id, start, &launch_command());

    let known_registry = ReaderRegistry::from_config(&config);
    if let Some(tag) = &cli.selection.r#type {
        if !known_registry.contains(tag) {
            bail!("unknown connection type '{tag}'");
        }
    }

    let stations = select_stations(&cli, &persistence)?;

    let registry = if cli.test_run {
        let connection_types: Vec<&str> = stations.iter().map(|s| s.connection_type.as_str()).collect();
        ReaderRegistry::benchmark_only(&connection_types)
    } else {
        known_registry
    };

    let mut gatherer = Gatherer::new(run_id.clone(), cli.test_run, config.max_threads, registry, persistence.clone());
    gatherer.add_many(stations);

    let results = gatherer.process(cli.single_thread);

    let summary = results
        .iter()
        .filter_map(|(id, result)| result.error.clone().map(|error| (id.clone(), error)))
        .collect();
    persistence.save_run_summary(&run_id, &summary);

    let errors = results.values().filter(|r| r.status == "error").count();
    tracing::info!(run_id, total = results.len(), errors, "run complete");

    Ok(())
}

fn select_stations(cli: &Cli, persistence: &Arc<dyn Persistence>) -> Result<Vec<weather_core::Station>> {
    if cli.selection.all {
        return Ok(persistence.get_all_active_stations());
    }
    if let Some(tag) = &cli.selection.r#type {
        let stations = persistence.get_stations_by_connection_type(tag);
        return Ok(stations);
    }
    if let Some(id) = &cli.selection.id {
        return Ok(persistence.get_station(id).into_iter().collect());
    }
    bail!("exactly one of --all, --type or --id must be given");
}
