//! Process configuration: a single `Config` struct loaded by `from_env`,
//! fail-fast rather than default-falling-back. A collector run with a
//! missing required variable must never silently start against the
//! wrong endpoint.

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_connection_url: String,
    pub max_threads: usize,

    pub weatherlink_v1_endpoint: String,
    pub weatherlink_v2_endpoint: String,
    pub wunderground_endpoint: String,
    pub wunderground_daily_endpoint: String,
    pub holfuy_live_endpoint: String,
    pub holfuy_historic_endpoint: String,
    pub thingspeak_endpoint: String,
    pub ecowitt_endpoint: String,
    pub ecowitt_daily_endpoint: String,
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {name}"))
}

impl Config {
    /// Loads an optional `.env` file (if present) and then reads every
    /// required variable, failing fast on the first one missing (§7 —
    /// absent required environment variables are non-recoverable).
    pub fn from_env() -> Result<Self> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                return Err(error).context("failed to load .env file");
            }
        }

        let max_threads: usize = required_var("MAX_THREADS")?
            .parse()
            .context("MAX_THREADS must be a positive integer")?;
        if max_threads == 0 {
            bail!("MAX_THREADS must be at least 1");
        }

        Ok(Self {
            database_connection_url: required_var("DATABASE_CONNECTION_URL")?,
            max_threads,
            weatherlink_v1_endpoint: required_var("WEATHERLINK_V1_ENDPOINT")?,
            weatherlink_v2_endpoint: required_var("WEATHERLINK_V2_ENDPOINT")?,
            wunderground_endpoint: required_var("WUNDERGROUND_ENDPOINT")?,
            wunderground_daily_endpoint: required_var("WUNDERGROUND_DAILY_ENDPOINT")?,
            holfuy_live_endpoint: required_var("HOLFUY_LIVE_ENDPOINT")?,
            holfuy_historic_endpoint: required_var("HOLFUY_HISTORIC_ENDPOINT")?,
            thingspeak_endpoint: required_var("THINGSPEAK_ENDPOINT")?,
            ecowitt_endpoint: required_var("ECOWITT_ENDPOINT")?,
            ecowitt_daily_endpoint: required_var("ECOWITT_DAILY_ENDPOINT")?,
        })
    }

    /// Whether the connection string points somewhere other than the
    /// local machine, in which case the caller should ask for interactive
    /// confirmation before initializing the pool (§6.2).
    pub fn is_remote_database(&self) -> bool {
        !self.database_connection_url.contains("localhost") && !self.database_connection_url.contains("127.0.0.1")
    }
}

/// Prompts on stdin/stdout for a yes/no confirmation before connecting to
/// a non-local database. Kept separate from `Config` so tests can call
/// `is_remote_database` without touching the terminal.
pub fn confirm_remote_database(url: &str) -> Result<bool> {
    use std::io::Write;

    print!("Database connection '{url}' does not look local. Continue? [y/N] ");
    std::io::stdout().flush().ok();

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(url: &str) -> Config {
        Config {
            database_connection_url: url.to_string(),
            max_threads: 8,
            weatherlink_v1_endpoint: String::new(),
            weatherlink_v2_endpoint: String::new(),
            wunderground_endpoint: String::new(),
            wunderground_daily_endpoint: String::new(),
            holfuy_live_endpoint: String::new(),
            holfuy_historic_endpoint: String::new(),
            thingspeak_endpoint: String::new(),
            ecowitt_endpoint: String::new(),
            ecowitt_daily_endpoint: String::new(),
        }
    }

    #[test]
    fn localhost_is_not_remote() {
        assert!(!sample_config("postgres://localhost/weather").is_remote_database());
        assert!(!sample_config("postgres://127.0.0.1/weather").is_remote_database());
    }

    #[test]
    fn other_hosts_are_remote() {
        assert!(sample_config("postgres://db.example.com/weather").is_remote_database());
    }
}
