//! Cumulus-style `realtime.txt` stations: a single space-separated line,
//! addressed by fixed field index rather than by name.

use crate::http::{get_text, BROWSER_USER_AGENT};
use crate::reader::{RawEnvelope, RawPayload, Reader};
use std::collections::HashMap;
use weather_core::parsing::{safe_float, smart_parse_datetime};
use weather_core::{CollectorResult, Fields, Station};

fn index_to_name(index: usize) -> Option<&'static str> {
    Some(match index {
        0 => "date",
        1 => "time",
        2 => "current_temperature_celsius",
        3 => "relative_humidity",
        5 => "current_wind_speed_kph",
        7 => "current_wind_direction",
        8 => "rain_rate_mm",
        9 => "total_daily_precipitation_at_record_timestamp",
        10 => "pressure_hpa",
        28 => "daily_min_temperature",
        30 => "daily_max_temperature",
        32 => "daily_max_wind_speed",
        _ => return None,
    })
}

fn parse_line(line: &str) -> HashMap<&'static str, &str> {
    line.trim()
        .split(' ')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .enumerate()
        .filter_map(|(index, item)| index_to_name(index).map(|name| (name, item)))
        .collect()
}

pub struct RealtimeReader;

impl RealtimeReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealtimeReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for RealtimeReader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1"]
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        let base = station.field1.as_deref().unwrap_or_default();
        let endpoint =
            if base.ends_with("/realtime.txt") { base.to_string() } else { format!("{base}/realtime.txt") };
        Ok(get_text(&endpoint, Some(BROWSER_USER_AGENT))?.map(RawPayload::Text))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(line) = envelope.live.as_ref().and_then(RawPayload::as_text) else { return Ok(None) };
        let data = parse_line(line);

        let (Some(date), Some(time)) = (data.get("date"), data.get("time")) else { return Ok(None) };
        let Ok(source_timestamp) = smart_parse_datetime(&format!("{date} {time}"), station.data_timezone) else {
            return Ok(None);
        };

        let mut fields = Fields::new();
        fields.source_timestamp = Some(source_timestamp);

        fields.wind_direction = safe_float(data.get("current_wind_direction").copied());
        fields.temperature = safe_float(data.get("current_temperature_celsius").copied());
        fields.wind_speed = safe_float(data.get("current_wind_speed_kph").copied());
        fields.humidity = safe_float(data.get("relative_humidity").copied());
        fields.pressure = safe_float(data.get("pressure_hpa").copied());
        fields.rain = safe_float(data.get("rain_rate_mm").copied());

        fields.max_temperature = safe_float(data.get("daily_max_temperature").copied());
        fields.min_temperature = safe_float(data.get("daily_min_temperature").copied());
        fields.max_wind_speed = safe_float(data.get("daily_max_wind_speed").copied());
        fields.cumulative_rain = safe_float(data.get("total_daily_precipitation_at_record_timestamp").copied());

        Ok(Some(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping_skips_unlisted_columns() {
        let mut line = vec!["x"; 33];
        line[2] = "16.8";
        line[30] = "19.2";
        let joined = line.join(" ");
        let data = parse_line(&joined);
        assert_eq!(data.get("current_temperature_celsius"), Some(&"16.8"));
        assert_eq!(data.get("daily_max_temperature"), Some(&"19.2"));
        assert!(!data.contains_key("last_wind_speed_kph"));
    }
}
