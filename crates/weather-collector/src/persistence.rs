//! The persistence contract (§6.3). This crate ships exactly one
//! implementation, an in-memory store behind a mutex, used by
//! `--test-run` and by the integration tests; a real SQL-backed store is
//! out of scope and left to the deployment that embeds this crate.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use weather_core::{Record, Station};

/// Object-safe so the collector can be built against any backing store.
pub trait Persistence: Send + Sync {
    fn init_run(&self, run_id: &str, start_ts_minute: DateTime<Utc>, command_string: &str);
    fn save_run_summary(&self, run_id: &str, results: &HashMap<String, String>);
    fn save_record(&self, record: &Record);
    fn increment_incident_count(&self, station_id: &str);
    fn get_all_active_stations(&self) -> Vec<Station>;
    fn get_stations_by_connection_type(&self, connection_type: &str) -> Vec<Station>;
    fn get_station(&self, id: &str) -> Option<Station>;
}

#[derive(Debug, Clone)]
pub struct RunRow {
    pub start_ts_minute: DateTime<Utc>,
    pub command_string: String,
    pub results: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StationStatus {
    Active,
    Disabled,
}

/// A catalog entry plus the bookkeeping columns the persistence contract
/// exposes beyond the bare `Station` the readers consume.
#[derive(Debug, Clone)]
pub struct StationRecord {
    pub station: Station,
    pub status: StationStatus,
    pub incident_count: u64,
}

#[derive(Default)]
struct Inner {
    runs: HashMap<String, RunRow>,
    records: Vec<Record>,
    stations: HashMap<String, StationRecord>,
}

/// The sole shipped `Persistence` implementation: everything lives behind
/// one mutex, guarded per-call rather than per-transaction, since there is
/// no real connection pool to model contention against.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    pub fn seed_station(&self, station: Station, status: StationStatus) {
        let mut inner = self.inner.lock().expect("persistence mutex poisoned");
        inner.stations.insert(station.id.clone(), StationRecord { station, status, incident_count: 0 });
    }

    pub fn records(&self) -> Vec<Record> {
        self.inner.lock().expect("persistence mutex poisoned").records.clone()
    }

    pub fn runs(&self) -> HashMap<String, RunRow> {
        self.inner.lock().expect("persistence mutex poisoned").runs.clone()
    }

    pub fn incident_count(&self, station_id: &str) -> u64 {
        self.inner
            .lock()
            .expect("persistence mutex poisoned")
            .stations
            .get(station_id)
            .map(|s| s.incident_count)
            .unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistence for InMemoryStore {
    fn init_run(&self, run_id: &str, start_ts_minute: DateTime<Utc>, command_string: &str) {
        let mut inner = self.inner.lock().expect("persistence mutex poisoned");
        inner.runs.insert(
            run_id.to_string(),
            RunRow { start_ts_minute, command_string: command_string.to_string(), results: HashMap::new() },
        );
    }

    fn save_run_summary(&self, run_id: &str, results: &HashMap<String, String>) {
        let mut inner = self.inner.lock().expect("persistence mutex poisoned");
        if let Some(row) = inner.runs.get_mut(run_id) {
            row.results = results.clone();
        }
    }

    fn save_record(&self, record: &Record) {
        let mut inner = self.inner.lock().expect("persistence mutex poisoned");
        inner.records.push(record.clone());
    }

    fn increment_incident_count(&self, station_id: &str) {
        let mut inner = self.inner.lock().expect("persistence mutex poisoned");
        if let Some(entry) = inner.stations.get_mut(station_id) {
            entry.incident_count += 1;
        }
    }

    fn get_all_active_stations(&self) -> Vec<Station> {
        let inner = self.inner.lock().expect("persistence mutex poisoned");
        inner
            .stations
            .values()
            .filter(|s| s.status == StationStatus::Active)
            .map(|s| s.station.clone())
            .collect()
    }

    fn get_stations_by_connection_type(&self, connection_type: &str) -> Vec<Station> {
        let inner = self.inner.lock().expect("persistence mutex poisoned");
        inner
            .stations
            .values()
            .filter(|s| s.status == StationStatus::Active && s.station.connection_type == connection_type)
            .map(|s| s.station.clone())
            .collect()
    }

    fn get_station(&self, id: &str) -> Option<Station> {
        let inner = self.inner.lock().expect("persistence mutex poisoned");
        inner
            .stations
            .get(id)
            .filter(|s| s.status == StationStatus::Active)
            .map(|s| s.station.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Etc::UTC;

    fn sample_station(id: &str, connection_type: &str) -> Station {
        Station::new(id, connection_type, UTC, UTC)
    }

    #[test]
    fn disabled_stations_are_excluded_from_active_queries() {
        let store = InMemoryStore::new();
        store.seed_station(sample_station("s1", "ecowitt"), StationStatus::Active);
        store.seed_station(sample_station("s2", "ecowitt"), StationStatus::Disabled);
        let active = store.get_all_active_stations();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "s1");
    }

    #[test]
    fn incident_counter_is_cumulative() {
        let store = InMemoryStore::new();
        store.seed_station(sample_station("s1", "ecowitt"), StationStatus::Active);
        store.increment_incident_count("s1");
        store.increment_incident_count("s1");
        assert_eq!(store.incident_count("s1"), 2);
    }

    #[test]
    fn filters_by_connection_type() {
        let store = InMemoryStore::new();
        store.seed_station(sample_station("s1", "ecowitt"), StationStatus::Active);
        store.seed_station(sample_station("s2", "holfuy"), StationStatus::Active);
        let ecowitt = store.get_stations_by_connection_type("ecowitt");
        assert_eq!(ecowitt.len(), 1);
        assert_eq!(ecowitt[0].id, "s1");
    }
}
