use chrono::{DateTime, Timelike, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Generates a fresh 128-bit run identifier, rendered as plain hex (no
/// dashes) so it reads naturally as a run-metadata primary key.
pub fn new_run_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// One row of the run-metadata table: what was asked for, when it
/// started, and how it went.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub start_timestamp: DateTime<Utc>,
    pub launch_command: String,
    pub total_stations: usize,
    pub errors: HashMap<String, String>,
}

impl RunSummary {
    pub fn new(run_id: impl Into<String>, launch_command: impl Into<String>, total_stations: usize) -> Self {
        let now = Utc::now();
        let truncated = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        Self {
            run_id: run_id.into(),
            start_timestamp: truncated,
            launch_command: launch_command.into(),
            total_stations,
            errors: HashMap::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
