//! A synthetic reader used for performance tests: it does no network I/O,
//! just sleeps for a per-source average latency and returns an otherwise
//! empty record, so the collector's worker-pool and chunking machinery
//! can be exercised at scale without a live fleet.

use crate::reader::{RawEnvelope, RawPayload, Reader};
use chrono::{Duration as ChronoDuration, Utc};
use std::time::{Duration, Instant};
use weather_core::{CollectorResult, Fields, Station};

/// Average observed latency per connection type, in milliseconds,
/// measured against the real endpoints.
fn average_latency_ms(connection_type: &str) -> u64 {
    match connection_type {
        "holfuy" => 294,
        "wunderground" => 411,
        "weatherlink_v1" => 421,
        "realtime" => 196,
        "meteoclimatic" => 113,
        "ecowitt" => 912,
        "weatherlink_v2" => 837,
        "thingspeak" => 311,
        _ => 200,
    }
}

pub struct BenchmarkReader {
    sleep_duration: Duration,
    samples: Vec<f64>,
}

impl BenchmarkReader {
    pub fn new() -> Self {
        Self { sleep_duration: Duration::from_millis(200), samples: Vec::new() }
    }

    pub fn for_connection_type(connection_type: &str) -> Self {
        Self { sleep_duration: Duration::from_millis(average_latency_ms(connection_type)), samples: Vec::new() }
    }
}

impl Default for BenchmarkReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for BenchmarkReader {
    fn fetch_live(&mut self, _station: &Station) -> CollectorResult<Option<RawPayload>> {
        let start = Instant::now();
        std::thread::sleep(self.sleep_duration);
        self.samples.push(start.elapsed().as_secs_f64() * 1000.0);
        Ok(Some(RawPayload::Json(serde_json::json!({}))))
    }

    fn parse(&self, station: &Station, _envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let mut fields = Fields::new();
        let observed = Utc::now() - ChronoDuration::seconds(30);
        fields.source_timestamp = Some(observed.with_timezone(&station.data_timezone));
        fields.taken_timestamp = Some(observed);
        Ok(Some(fields))
    }

    fn take_latency_samples(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.samples)
    }
}
