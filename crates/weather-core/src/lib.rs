pub mod error;
pub mod parsing;
pub mod record;
pub mod run;
pub mod station;
pub mod units;

pub use error::{CollectorError, CollectorResult};
pub use record::{Fields, Record};
pub use run::{new_run_id, RunSummary};
pub use station::{Station, TIMEZONE_ALLOWLIST};

/// Default maximum age of a reading before it's considered stale (§4.1).
pub const MAX_READING_AGE_SECS: i64 = 1800;
