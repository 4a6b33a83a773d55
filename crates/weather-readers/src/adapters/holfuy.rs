//! Holfuy serves its daily aggregates embedded inside the live response
//! rather than the separate historic endpoint; the historic call is kept
//! (some deployments gate daily access on it having been called first) but
//! its response is not consulted when building the record — this mirrors
//! the source material faithfully rather than "fixing" what looks odd.

use crate::http::get_json;
use crate::reader::{json_number, RawEnvelope, RawPayload, Reader};
use chrono::NaiveDateTime;
use weather_core::{CollectorResult, Fields, Station};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct HolfuyReader {
    live_endpoint: String,
    historic_endpoint: String,
}

impl HolfuyReader {
    pub fn new(live_endpoint: impl Into<String>, historic_endpoint: impl Into<String>) -> Self {
        Self { live_endpoint: live_endpoint.into(), historic_endpoint: historic_endpoint.into() }
    }

    fn live_url(&self, station: &Station) -> String {
        let id = station.field1.as_deref().unwrap_or_default();
        let pw = station.field3.as_deref().unwrap_or_default();
        format!("{}?s={id}&pw={pw}&m=JSON&tu=C&su=km/h&daily=True", self.live_endpoint)
    }

    fn historic_url(&self, station: &Station) -> String {
        let id = station.field1.as_deref().unwrap_or_default();
        let pw = station.field3.as_deref().unwrap_or_default();
        format!("{}?s={id}&pw={pw}&m=JSON&tu=C&su=km/h&type=2&mback=60", self.historic_endpoint)
    }
}

impl Reader for HolfuyReader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1", "field3"]
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(get_json(&self.live_url(station), &[])?.map(RawPayload::Json))
    }

    fn fetch_daily(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(get_json(&self.historic_url(station), &[])?.map(RawPayload::Json))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(live) = envelope.live.as_ref().and_then(RawPayload::as_json) else { return Ok(None) };

        let Some(raw_ts) = live["dateTime"].as_str() else { return Ok(None) };
        let Ok(naive) = NaiveDateTime::parse_from_str(raw_ts, "%Y-%m-%d %H:%M:%S") else { return Ok(None) };
        use chrono::TimeZone;
        let Some(observed) = station.data_timezone.from_local_datetime(&naive).single() else { return Ok(None) };

        let mut fields = Fields::new();
        fields.source_timestamp = Some(observed);

        fields.temperature = json_number(&live["temperature"]);
        fields.wind_speed = json_number(&live["wind"]["speed"]);
        fields.wind_direction = json_number(&live["wind"]["direction"]);
        fields.wind_gust = json_number(&live["wind"]["gust"]);
        fields.rain = json_number(&live["rain"]);
        fields.humidity = json_number(&live["humidity"]);
        fields.pressure = json_number(&live["pressure"]);
        // max_wind_speed is never reported by this source.

        let now_local = chrono::Utc::now().with_timezone(&station.data_timezone);
        let within_blackout_window = observed.time() >= chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap()
            && observed.time() <= chrono::NaiveTime::from_hms_opt(0, 15, 0).unwrap()
            && observed.date_naive() == now_local.date_naive();

        if within_blackout_window {
            tracing::info!(station_id = %station.id, "discarding daily data near local midnight rollover");
        } else {
            fields.min_temperature = json_number(&live["daily"]["min_temp"]);
            fields.max_temperature = json_number(&live["daily"]["max_temp"]);
            fields.cumulative_rain = json_number(&live["daily"]["sum_rain"]).map(round2);
        }

        Ok(Some(fields))
    }
}
