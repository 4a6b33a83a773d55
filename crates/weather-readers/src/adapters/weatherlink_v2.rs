//! WeatherLink V2 consoles report through multiple sensors that each emit
//! overlapping measurements (indoor vs. outdoor probes, the base console
//! vs. an anemometer add-on); the adapter coalesces them by a fixed
//! preference order rather than trusting a single sensor index.
//! `field1/2/3` are station id, API key and API secret.

use crate::http::get_json;
use crate::reader::{coalesce, json_number, max_or_none, min_or_none, RawEnvelope, RawPayload, Reader};
use chrono::TimeZone;
use serde_json::Value;
use weather_core::units::{fahrenheit_to_celsius, mph_to_kmh, psi_to_hpa};
use weather_core::{CollectorResult, Fields, Station};

/// Walks every sensor's `data` array and collects the named key's values,
/// in the fixed sensor preference order the source material lists.
fn collect(sensors: &[Value], key: &str) -> Vec<Option<f64>> {
    sensors
        .iter()
        .flat_map(|sensor| sensor.get("data").and_then(Value::as_array).into_iter().flatten())
        .filter_map(|point| point.get(key).map(json_number))
        .collect()
}

struct CurrentReadings {
    timestamp: Option<f64>,
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    wind_direction: Option<f64>,
    wind_gust: Option<f64>,
    rain: Option<f64>,
    cumulative_rain: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

fn handle_current_data(sensors: &[Value]) -> CurrentReadings {
    CurrentReadings {
        timestamp: max_or_none(collect(sensors, "ts")),
        temperature: coalesce([coalesce(collect(sensors, "temp")), coalesce(collect(sensors, "temp_out"))]),
        wind_speed: coalesce([coalesce(collect(sensors, "wind_speed")), max_or_none(collect(sensors, "wind_speed_last"))]),
        wind_direction: coalesce([coalesce(collect(sensors, "wind_dir")), max_or_none(collect(sensors, "wind_dir_last"))]),
        wind_gust: coalesce([
            max_or_none(collect(sensors, "wind_speed_hi_last_10_min")),
            coalesce(collect(sensors, "wind_gust")),
        ]),
        rain: coalesce([coalesce(collect(sensors, "rain_rate_mm")), coalesce(collect(sensors, "rain_rate_last_mm"))]),
        cumulative_rain: coalesce([max_or_none(collect(sensors, "rain_day_mm")), max_or_none(collect(sensors, "rainfall_daily_mm"))]),
        humidity: coalesce([coalesce(collect(sensors, "hum")), coalesce(collect(sensors, "hum_out"))]),
        pressure: coalesce([coalesce(collect(sensors, "bar")), coalesce(collect(sensors, "bar_sea_level"))]),
    }
}

struct HistoricReadings {
    max_wind_speed: Option<f64>,
    cumulative_rain: Option<f64>,
    max_temperature: Option<f64>,
    min_temperature: Option<f64>,
}

fn handle_historic_data(sensors: &[Value]) -> HistoricReadings {
    HistoricReadings {
        max_wind_speed: max_or_none(collect(sensors, "wind_speed_hi")),
        cumulative_rain: max_or_none(collect(sensors, "rainfall_mm")),
        max_temperature: max_or_none(collect(sensors, "temp_hi")),
        min_temperature: min_or_none(collect(sensors, "temp_lo")),
    }
}

/// Both the current and historic calls hang off the one API base the
/// environment configures; `current`/`historic` and the station id are
/// appended as path segments, matching the real API's `/current/{id}` and
/// `/historic/{id}` routes.
pub struct WeatherlinkV2Reader {
    base_endpoint: String,
}

impl WeatherlinkV2Reader {
    pub fn new(base_endpoint: impl Into<String>) -> Self {
        Self { base_endpoint: base_endpoint.into() }
    }

    fn base(&self) -> &str {
        self.base_endpoint.trim_end_matches('/')
    }

    fn current_url(&self, station: &Station) -> String {
        let id = station.field1.as_deref().unwrap_or_default();
        let api_key = station.field2.as_deref().unwrap_or_default();
        format!("{}/current/{id}?api-key={api_key}&t={}", self.base(), chrono::Utc::now().timestamp())
    }

    fn historic_url(&self, station: &Station) -> String {
        let id = station.field1.as_deref().unwrap_or_default();
        let api_key = station.field2.as_deref().unwrap_or_default();
        let now = chrono::Utc::now();
        let start = now - chrono::Duration::minutes(15);
        let end_of_day = now.date_naive().and_hms_opt(23, 59, 59).unwrap().and_utc();
        format!(
            "{}/historic/{id}?api-key={api_key}&t={}&start-timestamp={}&end-timestamp={}",
            self.base(),
            now.timestamp(),
            start.timestamp(),
            end_of_day.timestamp(),
        )
    }

    fn api_secret(station: &Station) -> (&'static str, &str) {
        ("X-Api-Secret", station.field3.as_deref().unwrap_or_default())
    }
}

impl Reader for WeatherlinkV2Reader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1", "field2", "field3"]
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        let header = Self::api_secret(station);
        Ok(get_json(&self.current_url(station), &[header])?.map(RawPayload::Json))
    }

    fn fetch_daily(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        let header = Self::api_secret(station);
        // A non-200 here (e.g. an inactive historic subscription) is
        // logged by `get_json`'s caller and simply yields no daily half;
        // the record is still built from the live sensors.
        match get_json(&self.historic_url(station), &[header]) {
            Ok(value) => Ok(value.map(RawPayload::Json)),
            Err(error) => {
                tracing::warn!(station_id = %station.id, %error, "historic subscription unavailable, continuing without daily fields");
                Ok(None)
            }
        }
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(live) = envelope.live.as_ref().and_then(RawPayload::as_json) else { return Ok(None) };
        let Some(sensors) = live["sensors"].as_array() else { return Ok(None) };
        let current = handle_current_data(sensors);

        let Some(ts) = current.timestamp else { return Ok(None) };
        let Some(observed) = station.data_timezone.timestamp_opt(ts as i64, 0).single() else { return Ok(None) };

        let historic = envelope
            .daily
            .as_ref()
            .and_then(RawPayload::as_json)
            .and_then(|v| v["sensors"].as_array())
            .map(|sensors| handle_historic_data(sensors));

        let mut fields = Fields::new();
        fields.source_timestamp = Some(observed);

        fields.temperature = current.temperature.map(fahrenheit_to_celsius);
        fields.wind_speed = current.wind_speed.map(mph_to_kmh);
        fields.wind_direction = current.wind_direction;
        fields.rain = current.rain;
        fields.humidity = current.humidity;
        fields.pressure = current.pressure.map(psi_to_hpa);
        fields.wind_gust = current.wind_gust.map(mph_to_kmh);

        fields.cumulative_rain = coalesce([current.cumulative_rain, historic.as_ref().and_then(|h| h.cumulative_rain)]);
        fields.max_wind_speed = historic.as_ref().and_then(|h| h.max_wind_speed).map(mph_to_kmh);
        fields.max_temperature = historic.as_ref().and_then(|h| h.max_temperature).map(fahrenheit_to_celsius);
        fields.min_temperature = historic.as_ref().and_then(|h| h.min_temperature).map(fahrenheit_to_celsius);
        // max_wind_gust is never populated by this source.

        Ok(Some(fields))
    }
}
