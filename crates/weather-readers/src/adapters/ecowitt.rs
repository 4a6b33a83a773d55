//! Ecowitt gateways serve two JSON endpoints: a live snapshot and a
//! per-minute daily series that has to be scanned for its min/max, since
//! the source does not pre-aggregate. `field1/2/3` are the device MAC,
//! API key and application key.

use crate::http::get_json;
use crate::reader::{RawEnvelope, RawPayload, Reader};
use chrono::TimeZone;
use serde_json::Value;
use weather_core::parsing::safe_float;
use weather_core::{CollectorResult, Fields, Station};

fn series_values(daily: &Value, path: &[&str]) -> Vec<f64> {
    let mut node = daily;
    for key in path {
        node = match node.get(key) {
            Some(v) => v,
            None => return Vec::new(),
        };
    }
    let Some(list) = node.get("list").and_then(Value::as_object) else { return Vec::new() };
    list.values().filter_map(|v| safe_float(v.as_str())).collect()
}

pub struct EcowittReader {
    live_endpoint: String,
    daily_endpoint: String,
}

impl EcowittReader {
    pub fn new(live_endpoint: impl Into<String>, daily_endpoint: impl Into<String>) -> Self {
        Self { live_endpoint: live_endpoint.into(), daily_endpoint: daily_endpoint.into() }
    }

    fn urls(&self, station: &Station) -> (String, String) {
        let mac = station.field1.as_deref().unwrap_or_default();
        let api_key = station.field2.as_deref().unwrap_or_default();
        let app_key = station.field3.as_deref().unwrap_or_default();

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let live = format!(
            "{}?mac={mac}&api_key={api_key}&application_key={app_key}\
             &temp_unitid=1&pressure_unitid=3&wind_speed_unitid=7&rainfall_unitid=12",
            self.live_endpoint
        );
        let daily = format!(
            "{}?mac={mac}&api_key={api_key}&application_key={app_key}\
             &temp_unitid=1&pressure_unitid=3&wind_speed_unitid=7&rainfall_unitid=12\
             &cycle_type=auto&start_date={today}%2000:00:00&end_date={today}%2023:59:59\
             &call_back=outdoor.temperature,outdoor.humidity,wind.wind_speed,wind.wind_gust",
            self.daily_endpoint
        );
        (live, daily)
    }
}

impl Reader for EcowittReader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1", "field2", "field3"]
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        let (live_url, _) = self.urls(station);
        Ok(get_json(&live_url, &[])?.map(RawPayload::Json))
    }

    fn fetch_daily(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        let (_, daily_url) = self.urls(station);
        Ok(get_json(&daily_url, &[])?.map(RawPayload::Json))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(live) = envelope.live.as_ref().and_then(RawPayload::as_json) else { return Ok(None) };
        let live_data = &live["data"];

        let Some(ts) = live_data["outdoor"]["temperature"]["time"].as_str().and_then(|s| s.parse::<i64>().ok())
        else {
            return Ok(None);
        };
        let Some(observed) = station.data_timezone.timestamp_opt(ts, 0).single() else { return Ok(None) };

        let mut fields = Fields::new();
        fields.source_timestamp = Some(observed);

        let outdoor = &live_data["outdoor"];
        let wind = &live_data["wind"];
        let rainfall = &live_data["rainfall"];

        fields.temperature = safe_float(outdoor["temperature"]["value"].as_str());
        fields.wind_speed = safe_float(wind["wind_speed"]["value"].as_str());
        fields.wind_direction = safe_float(wind["wind_direction"]["value"].as_str());
        fields.rain = safe_float(rainfall["rain_rate"]["value"].as_str());
        fields.humidity = safe_float(outdoor["humidity"]["value"].as_str());
        fields.pressure = safe_float(live_data["pressure"]["relative"]["value"].as_str());
        fields.wind_gust = safe_float(wind["wind_gust"]["value"].as_str());

        if let Some(daily) = envelope.daily.as_ref().and_then(RawPayload::as_json) {
            let daily_data = &daily["data"];

            let temps = series_values(daily_data, &["outdoor", "temperature"]);
            if let Some(max) = temps.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            {
                fields.max_temperature = Some(max);
            }
            if let Some(min) = temps.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
            {
                fields.min_temperature = Some(min);
            }

            let speeds = series_values(daily_data, &["wind", "wind_speed"]);
            if let Some(max) = speeds.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            {
                fields.max_wind_speed = Some(max);
            }

            let gusts = series_values(daily_data, &["wind", "wind_gust"]);
            if let Some(max) = gusts.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            {
                fields.max_wind_gust = Some(max);
            }

            fields.cumulative_rain = safe_float(rainfall["daily"]["value"].as_str());
        }

        Ok(Some(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn series_values_scans_the_per_minute_list() {
        let daily = json!({
            "outdoor": {"temperature": {"list": {"00": "5.0", "30": "14.7"}}}
        });
        let mut values = series_values(&daily, &["outdoor", "temperature"]);
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, vec![5.0, 14.7]);
    }
}
