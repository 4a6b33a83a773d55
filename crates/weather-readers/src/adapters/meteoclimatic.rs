//! Meteoclimatic stations serve a single line of `*KEY=VALUE*` plaintext
//! pairs, no JSON at all. `field1` holds the full endpoint URL since each
//! station publishes at its own path.

use crate::http::{get_text, BROWSER_USER_AGENT};
use crate::reader::{RawEnvelope, RawPayload, Reader};
use std::collections::HashMap;
use weather_core::parsing::{smart_azimuth_str, smart_parse_datetime, smart_parse_float};
use weather_core::{CollectorResult, Fields, Station};

/// Sentinel the source emits for "not measured". Per policy this is kept
/// verbatim rather than blanked; only a warning is logged so the
/// validator's range pass can catch it downstream.
const NOT_MEASURED: f64 = 100.0;

fn code_to_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "UPD" => "record_timestamp",
        "TMP" => "current_temperature_celsius",
        "WND" => "current_wind_speed_kph",
        "AZI" => "current_wind_direction",
        "BAR" => "pressure_hpa",
        "HUM" => "relative_humidity",
        "DHTM" => "daily_max_temperature",
        "DLTM" => "daily_min_temperature",
        "DGST" => "daily_max_wind_gust",
        "DPCP" => "total_daily_precipitation_at_record_timestamp",
        _ => return None,
    })
}

const WHITELIST: [&str; 10] = ["UPD", "TMP", "WND", "DGST", "AZI", "DPCP", "HUM", "BAR", "DHTM", "DLTM"];

fn parse_line(line: &str) -> HashMap<&'static str, String> {
    let mut data = HashMap::new();
    for chunk in line.split('*') {
        let chunk = chunk.trim();
        let Some((key, value)) = chunk.split_once('=') else { continue };
        let key = key.trim();
        let value = value.trim();
        if !WHITELIST.contains(&key) {
            continue;
        }
        if let Some(name) = code_to_name(key) {
            data.insert(name, value.to_string());
        }
    }
    data
}

fn warn_if_sentinel(field: &str, value: Option<f64>) -> Option<f64> {
    if value == Some(NOT_MEASURED) {
        tracing::error!(field, value = NOT_MEASURED, "sentinel 'not measured' value recorded verbatim");
    }
    value
}

pub struct MeteoclimaticReader;

impl MeteoclimaticReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MeteoclimaticReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for MeteoclimaticReader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1"]
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        let endpoint = station.field1.as_deref().unwrap_or_default();
        Ok(get_text(endpoint, Some(BROWSER_USER_AGENT))?.map(RawPayload::Text))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(line) = envelope.live.as_ref().and_then(RawPayload::as_text) else { return Ok(None) };
        let data = parse_line(line);

        let Some(raw_ts) = data.get("record_timestamp") else { return Ok(None) };
        let Ok(source_timestamp) = smart_parse_datetime(raw_ts, station.data_timezone) else {
            return Ok(None);
        };

        let mut fields = Fields::new();
        fields.source_timestamp = Some(source_timestamp);

        fields.temperature = warn_if_sentinel(
            "temperature",
            data.get("current_temperature_celsius").and_then(|v| smart_parse_float(v).ok()).flatten(),
        );
        fields.wind_speed = warn_if_sentinel(
            "wind_speed",
            data.get("current_wind_speed_kph").and_then(|v| smart_parse_float(v).ok()).flatten(),
        );
        fields.wind_direction = warn_if_sentinel(
            "wind_direction",
            data.get("current_wind_direction").and_then(|v| smart_azimuth_str(v)),
        );
        fields.humidity =
            warn_if_sentinel("humidity", data.get("relative_humidity").and_then(|v| smart_parse_float(v).ok()).flatten());
        fields.pressure =
            warn_if_sentinel("pressure", data.get("pressure_hpa").and_then(|v| smart_parse_float(v).ok()).flatten());

        fields.cumulative_rain = warn_if_sentinel(
            "cumulative_rain",
            data.get("total_daily_precipitation_at_record_timestamp").and_then(|v| smart_parse_float(v).ok()).flatten(),
        );
        fields.max_temperature = warn_if_sentinel(
            "max_temperature",
            data.get("daily_max_temperature").and_then(|v| smart_parse_float(v).ok()).flatten(),
        );
        fields.min_temperature = warn_if_sentinel(
            "min_temperature",
            data.get("daily_min_temperature").and_then(|v| smart_parse_float(v).ok()).flatten(),
        );
        fields.max_wind_gust = warn_if_sentinel(
            "max_wind_gust",
            data.get("daily_max_wind_gust").and_then(|v| smart_parse_float(v).ok()).flatten(),
        );
        // max_wind_speed is never supplied by the whitelist; DGST only
        // populates max_wind_gust.

        Ok(Some(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_drops_unknown_codes() {
        let data = parse_line("*VER=1.0*TMP=16.8*SIG=abc*HUM=70*");
        assert_eq!(data.get("current_temperature_celsius").map(String::as_str), Some("16.8"));
        assert!(!data.contains_key("version"));
    }

    #[test]
    fn dgst_only_feeds_max_wind_gust() {
        assert_eq!(code_to_name("DGST"), Some("daily_max_wind_gust"));
    }
}
