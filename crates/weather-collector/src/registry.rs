//! Maps each connection-type tag to a reader *factory* (§9 — "reader
//! factories, not reader instances"): the registry owns the
//! environment-sourced endpoint strings and hands out a fresh, worker-
//! local reader instance on every call.

use crate::config::Config;
use std::collections::HashMap;
use weather_readers::adapters::{
    EcowittReader, HolfuyReader, MeteoclimaticReader, RealtimeReader, ThingspeakReader, WeatherlinkV1Reader,
    WeatherlinkV2Reader, WundergroundReader,
};
use weather_readers::ReaderFactory;

pub struct ReaderRegistry {
    factories: HashMap<String, ReaderFactory>,
}

impl ReaderRegistry {
    /// Builds the fixed registry of the eight sources this crate ships
    /// adapters for, closing each factory over the endpoints `config`
    /// loaded from the environment.
    pub fn from_config(config: &Config) -> Self {
        let mut factories: HashMap<String, ReaderFactory> = HashMap::new();

        factories.insert("meteoclimatic".to_string(), Box::new(|| Box::new(MeteoclimaticReader::new())));
        factories.insert("realtime".to_string(), Box::new(|| Box::new(RealtimeReader::new())));

        let weatherlink_v1_endpoint = config.weatherlink_v1_endpoint.clone();
        factories.insert(
            "weatherlink_v1".to_string(),
            Box::new(move || Box::new(WeatherlinkV1Reader::new(weatherlink_v1_endpoint.clone()))),
        );

        let weatherlink_v2_endpoint = config.weatherlink_v2_endpoint.clone();
        factories.insert(
            "weatherlink_v2".to_string(),
            Box::new(move || Box::new(WeatherlinkV2Reader::new(weatherlink_v2_endpoint.clone()))),
        );

        let wunderground_live = config.wunderground_endpoint.clone();
        let wunderground_daily = config.wunderground_daily_endpoint.clone();
        factories.insert(
            "wunderground".to_string(),
            Box::new(move || Box::new(WundergroundReader::new(wunderground_live.clone(), wunderground_daily.clone()))),
        );

        let holfuy_live = config.holfuy_live_endpoint.clone();
        let holfuy_historic = config.holfuy_historic_endpoint.clone();
        factories.insert(
            "holfuy".to_string(),
            Box::new(move || Box::new(HolfuyReader::new(holfuy_live.clone(), holfuy_historic.clone()))),
        );

        let thingspeak_endpoint = config.thingspeak_endpoint.clone();
        factories.insert(
            "thingspeak".to_string(),
            Box::new(move || Box::new(ThingspeakReader::new(thingspeak_endpoint.clone()))),
        );

        let ecowitt_live = config.ecowitt_endpoint.clone();
        let ecowitt_daily = config.ecowitt_daily_endpoint.clone();
        factories.insert(
            "ecowitt".to_string(),
            Box::new(move || Box::new(EcowittReader::new(ecowitt_live.clone(), ecowitt_daily.clone()))),
        );

        Self { factories }
    }

    /// A registry exercising only the synthetic benchmark reader, used by
    /// `--test-run`'s latency measurement and by tests that don't need
    /// real per-source endpoints.
    pub fn benchmark_only(connection_types: &[&str]) -> Self {
        let mut factories: HashMap<String, ReaderFactory> = HashMap::new();
        for tag in connection_types {
            let tag_owned = tag.to_string();
            factories.insert(
                tag_owned.clone(),
                Box::new(move || Box::new(weather_readers::BenchmarkReader::for_connection_type(&tag_owned))),
            );
        }
        Self { factories }
    }

    pub fn contains(&self, connection_type: &str) -> bool {
        self.factories.contains_key(connection_type)
    }

    pub fn build(&self, connection_type: &str) -> Option<Box<dyn weather_readers::Reader + Send>> {
        self.factories.get(connection_type).map(|factory| factory())
    }

    pub fn insert(&mut self, connection_type: impl Into<String>, factory: ReaderFactory) {
        self.factories.insert(connection_type.into(), factory);
    }
}
