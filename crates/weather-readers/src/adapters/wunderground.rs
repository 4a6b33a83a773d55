//! Weather Underground PWS API: two JSON endpoints (current observation,
//! daily summary). `field1/2` are the station id and API key.

use crate::http::get_json;
use crate::reader::{json_number, RawEnvelope, RawPayload, Reader};
use chrono::{NaiveDateTime, TimeZone};
use weather_core::{CollectorResult, Fields, Station};

pub struct WundergroundReader {
    live_endpoint: String,
    daily_endpoint: String,
}

impl WundergroundReader {
    pub fn new(live_endpoint: impl Into<String>, daily_endpoint: impl Into<String>) -> Self {
        Self { live_endpoint: live_endpoint.into(), daily_endpoint: daily_endpoint.into() }
    }

    fn live_url(&self, station: &Station) -> String {
        let id = station.field1.as_deref().unwrap_or_default();
        let key = station.field2.as_deref().unwrap_or_default();
        format!(
            "{}?stationId={id}&apiKey={key}&format=json&units=m&numericPrecision=decimal",
            self.live_endpoint
        )
    }

    fn daily_url(&self, station: &Station) -> String {
        let id = station.field1.as_deref().unwrap_or_default();
        let key = station.field2.as_deref().unwrap_or_default();
        format!(
            "{}?stationId={id}&apiKey={key}&format=json&units=m&numericPrecision=decimal",
            self.daily_endpoint
        )
    }
}

impl Reader for WundergroundReader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1", "field2"]
    }

    fn ignore_early_readings(&self) -> bool {
        true
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(get_json(&self.live_url(station), &[])?.map(RawPayload::Json))
    }

    fn fetch_daily(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(get_json(&self.daily_url(station), &[])?.map(RawPayload::Json))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(live) = envelope.live.as_ref().and_then(RawPayload::as_json) else { return Ok(None) };
        let Some(observation) = live["observations"].as_array().and_then(|arr| arr.first()) else {
            return Ok(None);
        };

        let Some(raw_ts) = observation["obsTimeLocal"].as_str() else { return Ok(None) };
        let Ok(naive) = NaiveDateTime::parse_from_str(raw_ts, "%Y-%m-%d %H:%M:%S") else { return Ok(None) };
        let Some(observed) = station.data_timezone.from_local_datetime(&naive).single() else { return Ok(None) };

        let metric = &observation["metric"];

        let mut fields = Fields::new();
        fields.source_timestamp = Some(observed);

        fields.temperature = json_number(&metric["temp"]);
        fields.wind_speed = json_number(&metric["windSpeed"]);
        fields.wind_direction = json_number(&observation["winddir"]);
        fields.rain = json_number(&metric["precipRate"]);
        fields.cumulative_rain = json_number(&metric["precipTotal"]);
        fields.humidity = json_number(&observation["humidity"]);
        fields.pressure = json_number(&metric["pressure"]);
        fields.wind_gust = json_number(&metric["windGust"]);

        if let Some(daily) = envelope.daily.as_ref().and_then(RawPayload::as_json) {
            if let Some(summary) = daily["summaries"].as_array().and_then(|arr| arr.last()) {
                if summary["stationID"] == observation["stationID"] {
                    let daily_metric = &summary["metric"];
                    fields.max_wind_speed = json_number(&daily_metric["windspeedHigh"]);
                    fields.max_temperature = json_number(&daily_metric["tempHigh"]);
                    fields.min_temperature = json_number(&daily_metric["tempLow"]);
                    fields.max_wind_gust = json_number(&daily_metric["windgustHigh"]);
                }
            }
        }

        Ok(Some(fields))
    }
}
