//! The `Gatherer` (§4.5): owns the station set, the reader-factory
//! registry, and a thread-safe latency accumulator, and drives a run
//! either sequentially or across a bounded worker pool.

use crate::corrector::Corrector;
use crate::persistence::Persistence;
use crate::registry::ReaderRegistry;
use crate::validator::Validator;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use weather_core::{CollectorError, Station};

/// One worker's verdict for a station: either persisted successfully or
/// failed with a named reason. The worker never returns early — every
/// station in its chunk produces exactly one entry (§7).
#[derive(Debug, Clone)]
pub struct StationResult {
    pub status: &'static str,
    pub error: Option<String>,
}

impl StationResult {
    fn ok() -> Self {
        Self { status: "ok", error: None }
    }

    fn failed(error: impl ToString) -> Self {
        Self { status: "error", error: Some(error.to_string()) }
    }
}

/// Splits `n` items across `k` workers as contiguous, non-overlapping
/// slices: the first `n % k` chunks get one extra item (§4.5 — this
/// replaces the source material's tail-append remainder distribution,
/// which could duplicate a station across two chunks when `k > n/2`).
pub fn chunk_boundaries(n: usize, k: usize) -> Vec<(usize, usize)> {
    if k == 0 || n == 0 {
        return Vec::new();
    }
    let base = n / k;
    let remainder = n % k;

    let mut boundaries = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let size = if i < remainder { base + 1 } else { base };
        if size == 0 {
            break;
        }
        boundaries.push((start, start + size));
        start += size;
    }
    boundaries
}

pub struct Gatherer {
    run_id: String,
    dry_run: bool,
    max_threads: usize,
    stations: Vec<Station>,
    registry: ReaderRegistry,
    persistence: Arc<dyn Persistence>,
    corrector: Corrector,
    validator: Validator,
    latencies: Mutex<HashMap<String, Vec<f64>>>,
}

impl Gatherer {
    pub fn new(run_id: impl Into<String>, dry_run: bool, max_threads: usize, registry: ReaderRegistry, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            run_id: run_id.into(),
            dry_run,
            max_threads: max_threads.max(1),
            stations: Vec::new(),
            registry,
            persistence,
            corrector: Corrector::default(),
            validator: Validator::new(),
            latencies: Mutex::new(HashMap::new()),
        }
    }

    /// Idempotent insertion; empty/duplicate inputs are logged and ignored.
    pub fn add(&mut self, station: Station) {
        if self.stations.iter().any(|s| s.id == station.id) {
            tracing::warn!(station_id = %station.id, "duplicate station ignored");
            return;
        }
        self.stations.push(station);
    }

    pub fn add_many(&mut self, stations: impl IntoIterator<Item = Station>) {
        let mut any = false;
        for station in stations {
            any = true;
            self.add(station);
        }
        if !any {
            tracing::warn!("add_many called with an empty station list");
        }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    fn record_latencies(&self, connection_type: &str, samples: Vec<f64>) {
        if samples.is_empty() {
            return;
        }
        let mut latencies = self.latencies.lock().expect("latency mutex poisoned");
        latencies.entry(connection_type.to_string()).or_default().extend(samples);
    }

    /// One station's full pipeline: validate → fetch/parse → correct →
    /// validate (the post-processing `Validator`, not to be confused with
    /// the timezone check) → persist.
    fn process_station(&self, station: &Station) -> StationResult {
        if let Err(error) = station.validate_timezones() {
            return StationResult::failed(error);
        }

        let Some(mut reader) = self.registry.build(&station.connection_type) else {
            return StationResult::failed(CollectorError::UnknownConnectionType(station.connection_type.clone()));
        };

        let read_result = catch_unwind(AssertUnwindSafe(|| reader.read(station)));
        let samples = reader.take_latency_samples();
        self.record_latencies(&station.connection_type, samples);

        let record = match read_result {
            Ok(Ok(Some(record))) => record,
            Ok(Ok(None)) => {
                if !self.dry_run {
                    self.persistence.increment_incident_count(&station.id);
                }
                return StationResult::failed(CollectorError::NoData);
            }
            Ok(Err(error)) => {
                if !self.dry_run {
                    self.persistence.increment_incident_count(&station.id);
                }
                return StationResult::failed(error);
            }
            Err(_) => {
                if !self.dry_run {
                    self.persistence.increment_incident_count(&station.id);
                }
                return StationResult::failed("reader panicked");
            }
        };

        let mut record = record;
        record.run_id = Some(self.run_id.clone());
        self.corrector.correct(&mut record, station.pressure_offset);
        self.validator.validate(&mut record);

        if !self.dry_run {
            self.persistence.save_record(&record);
        }

        StationResult::ok()
    }

    /// Runs every station sequentially on the calling thread.
    fn process_sequential(&self) -> HashMap<String, StationResult> {
        self.stations.iter().map(|station| (station.id.clone(), self.process_station(station))).collect()
    }

    /// Splits the station set into `max_threads` chunks and dispatches
    /// them to a bounded pool of named worker threads, joined before
    /// returning (§5 — "[AMBIENT] thread pool construction ... joined at
    /// the end of `process`").
    fn process_parallel(&self) -> HashMap<String, StationResult> {
        let boundaries = chunk_boundaries(self.stations.len(), self.max_threads);
        std::thread::scope(|scope| {
            let handles: Vec<_> = boundaries
                .into_iter()
                .enumerate()
                .map(|(index, (start, end))| {
                    let chunk = &self.stations[start..end];
                    std::thread::Builder::new()
                        .name(format!("collector-worker-{index}"))
                        .spawn_scoped(scope, move || {
                            chunk.iter().map(|station| (station.id.clone(), self.process_station(station))).collect::<HashMap<_, _>>()
                        })
                        .expect("failed to spawn worker thread")
                })
                .collect();

            let mut results = HashMap::new();
            for handle in handles {
                match handle.join() {
                    Ok(chunk_results) => results.extend(chunk_results),
                    Err(_) => tracing::error!("worker thread panicked without producing a result map"),
                }
            }
            results
        })
    }

    /// Runs the whole station set, sequentially below 30 stations or when
    /// `single_thread` is requested, across the worker pool otherwise.
    pub fn process(&self, single_thread: bool) -> HashMap<String, StationResult> {
        if self.stations.is_empty() {
            return HashMap::new();
        }

        let results =
            if single_thread || self.stations.len() < 30 { self.process_sequential() } else { self.process_parallel() };

        self.log_latency_stats();
        results
    }

    fn log_latency_stats(&self) {
        let latencies = self.latencies.lock().expect("latency mutex poisoned");
        for (connection_type, samples) in latencies.iter() {
            if samples.is_empty() {
                continue;
            }
            let mut sorted = samples.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let count = sorted.len();
            let mean = sorted.iter().sum::<f64>() / count as f64;
            let median = sorted[count / 2];
            let min = sorted[0];
            let max = sorted[count - 1];
            tracing::info!(
                connection_type,
                count,
                mean_ms = mean,
                median_ms = median,
                min_ms = min,
                max_ms = max,
                "per-source latency"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_boundaries_cover_every_item_exactly_once() {
        for n in [0, 1, 7, 29, 30, 31, 100, 997] {
            for k in [1, 2, 3, 8, 16] {
                let boundaries = chunk_boundaries(n, k);
                let total: usize = boundaries.iter().map(|(s, e)| e - s).sum();
                assert_eq!(total, n, "n={n} k={k}");
                for window in boundaries.windows(2) {
                    assert_eq!(window[0].1, window[1].0, "gap or overlap at n={n} k={k}");
                }
                if let Some(first) = boundaries.first() {
                    assert_eq!(first.0, 0);
                }
                if let Some(last) = boundaries.last() {
                    assert_eq!(last.1, n);
                }
            }
        }
    }

    #[test]
    fn remainder_chunks_get_exactly_one_extra_item() {
        let boundaries = chunk_boundaries(10, 3);
        let sizes: Vec<usize> = boundaries.iter().map(|(s, e)| e - s).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn more_workers_than_stations_never_duplicates_a_station() {
        let boundaries = chunk_boundaries(3, 8);
        let total: usize = boundaries.iter().map(|(s, e)| e - s).sum();
        assert_eq!(total, 3);
        assert!(boundaries.len() <= 3);
    }
}
