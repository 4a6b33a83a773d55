//! Concurrency property (§8): for any station set with `n >= 30` and any
//! worker count `k`, the multiset of per-station results produced by the
//! parallel path equals the multiset produced by running sequentially.

use chrono::Utc;
use chrono_tz::Etc::UTC;
use std::sync::Arc;
use weather_collector::{Gatherer, InMemoryStore, ReaderRegistry};
use weather_core::{CollectorResult, Fields, Station};
use weather_readers::{RawEnvelope, RawPayload, Reader};

/// A reader with no I/O and no sleep, so the property test runs in
/// milliseconds rather than paying the benchmark reader's per-source
/// average latency thirty-plus times per worker count under test.
struct InstantReader;

impl Reader for InstantReader {
    fn fetch_live(&mut self, _station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(Some(RawPayload::Json(serde_json::json!({}))))
    }

    fn parse(&self, station: &Station, _envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let mut fields = Fields::new();
        let observed = Utc::now() - chrono::Duration::seconds(30);
        fields.source_timestamp = Some(observed.with_timezone(&station.data_timezone));
        fields.taken_timestamp = Some(observed);
        Ok(Some(fields))
    }
}

fn stations(n: usize) -> Vec<Station> {
    (0..n).map(|i| Station::new(format!("s{i}"), "instant", UTC, UTC)).collect()
}

fn run(n: usize, max_threads: usize, single_thread: bool) -> Vec<(String, &'static str)> {
    let mut registry = ReaderRegistry::benchmark_only(&[]);
    registry.insert("instant", Box::new(|| Box::new(InstantReader)));

    let persistence = Arc::new(InMemoryStore::new());
    let mut gatherer = Gatherer::new("run-1", true, max_threads, registry, persistence);
    gatherer.add_many(stations(n));

    let results = gatherer.process(single_thread);
    let mut entries: Vec<(String, &'static str)> = results.into_iter().map(|(id, r)| (id, r.status)).collect();
    entries.sort();
    entries
}

#[test]
fn parallel_execution_matches_sequential_for_every_worker_count() {
    let n = 37;
    let baseline = run(n, 1, true);
    assert_eq!(baseline.len(), n);

    for k in [1, 2, 3, 8, 16] {
        let parallel = run(n, k, false);
        assert_eq!(parallel, baseline, "mismatch at k={k}");
    }
}
