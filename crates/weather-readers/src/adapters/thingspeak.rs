//! ThingSpeak channels: a generic IoT feed where `field1/field2/field4`
//! happen to carry temperature/humidity/pressure for these stations. No
//! wind, rain or daily data is published. `field1` is the channel id.

use crate::http::get_json;
use crate::reader::{json_number, RawEnvelope, RawPayload, Reader};
use chrono::{NaiveDateTime, TimeZone};
use weather_core::{CollectorResult, Fields, Station};

pub struct ThingspeakReader {
    endpoint: String,
}

impl ThingspeakReader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }

    fn url(&self, station: &Station) -> String {
        let channel = station.field1.as_deref().unwrap_or_default();
        format!("{}/{channel}/feeds.json?results=1", self.endpoint)
    }
}

impl Reader for ThingspeakReader {
    fn required_fields(&self) -> &'static [&'static str] {
        &["field1"]
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(get_json(&self.url(station), &[])?.map(RawPayload::Json))
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>> {
        let Some(data) = envelope.live.as_ref().and_then(RawPayload::as_json) else { return Ok(None) };
        let Some(feed) = data["feeds"].as_array().and_then(|arr| arr.first()) else { return Ok(None) };

        let Some(raw_ts) = feed["created_at"].as_str() else { return Ok(None) };
        // The trailing "Z" is a literal format character here, not parsed
        // as UTC: the source's timestamp is read as already being
        // expressed in the station's configured `data_timezone`.
        let Ok(naive) = NaiveDateTime::parse_from_str(raw_ts, "%Y-%m-%dT%H:%M:%SZ") else { return Ok(None) };
        let Some(observed) = station.data_timezone.from_local_datetime(&naive).single() else { return Ok(None) };

        let mut fields = Fields::new();
        fields.source_timestamp = Some(observed);

        fields.temperature = json_number(&feed["field1"]);
        fields.humidity = json_number(&feed["field2"]);
        fields.pressure = json_number(&feed["field4"]);

        Ok(Some(fields))
    }
}
