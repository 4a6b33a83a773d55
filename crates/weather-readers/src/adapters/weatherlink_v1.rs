//! WeatherLink V1 (the Davis "VP2" cloud API): one JSON live endpoint, no
//! daily call — the daily aggregates are nested inside the live response's
//! `davis_current_observation` object. `field1/2/3` are user, API token,
//! password.

use crate::http::get_json;
use crate::reader::{json_number, RawEnvelope, RawPayload, Reader};
use chrono::DateTime;
use weather_core::units::{fahrenheit_to_celsius, inches_to_mm, mph_to_kmh};
use weather_core::{CollectorResult, Fields, Station};

pub struct WeatherlinkV1Reader {
    live_endpoint: String,
}

impl WeatherlinkV1Reader {
    pub fn new(live_endpoint: impl Into<String>) -> Self {
        Self { live_endpoint: live_endpoint.into() }
    }

    fn live_url(&self, station: &Station) -> String {
        let user = station.field1.as_deref().unwrap_or_default();
        let token = station.field2.as_deref().unwrap_or_default();
        let password = station.field3.as_deref().unwrap_or_default();
        format!("{}?user={user}&pass={password}&apiToken={token}", self.live_endpoint)
    }
}

impl Reader for WeatherlinkV1Reader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1", "field2", "field3"]
    }

    fn ignore_early_readings(&self) -> bool {
        true
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(get_json(&self.live_url(station), &[])?.map(RawPayload::Json))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(live) = envelope.live.as_ref().and_then(RawPayload::as_json) else { return Ok(None) };

        let Some(raw_ts) = live["observation_time_rfc822"].as_str() else { return Ok(None) };
        let Ok(parsed) = DateTime::parse_from_str(raw_ts, "%a, %d %b %Y %H:%M:%S %z") else { return Ok(None) };
        let source_timestamp = parsed.with_timezone(&station.data_timezone);

        let davis = &live["davis_current_observation"];

        let mut fields = Fields::new();
        fields.source_timestamp = Some(source_timestamp);

        fields.temperature = json_number(&live["temp_c"]);
        fields.wind_speed = json_number(&live["wind_mph"]).map(mph_to_kmh);
        fields.wind_direction = json_number(&live["wind_degrees"]);
        fields.rain = json_number(&davis["rain_rate_in_per_hr"]).map(inches_to_mm);
        fields.humidity = json_number(&live["relative_humidity"]);
        fields.pressure = json_number(&live["pressure_mb"]);
        fields.wind_gust = json_number(&davis["wind_ten_min_gust_mph"]).map(mph_to_kmh);

        fields.max_wind_speed = json_number(&davis["wind_day_high_mph"]).map(mph_to_kmh);
        fields.max_temperature = json_number(&davis["temp_day_high_f"]).map(fahrenheit_to_celsius);
        fields.min_temperature = json_number(&davis["temp_day_low_f"]).map(fahrenheit_to_celsius);
        fields.cumulative_rain = json_number(&davis["rain_day_in"]).map(inches_to_mm);

        Ok(Some(fields))
    }
}
