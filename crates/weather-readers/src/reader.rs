use chrono::{DateTime, Timelike, Utc};
use weather_core::{CollectorError, CollectorResult, Fields, Record, Station};

/// The raw payload one endpoint returned, before any source-specific
/// parsing. Adapters that get JSON back use `Json`; Meteoclimatic and
/// Realtime, which are not JSON at all, use `Text`.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Text(String),
    Json(serde_json::Value),
}

impl RawPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawPayload::Text(s) => Some(s),
            RawPayload::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            RawPayload::Json(v) => Some(v),
            RawPayload::Text(_) => None,
        }
    }
}

/// The uniform envelope every reader's `parse` step is handed, regardless
/// of whether the source has one endpoint or two (§9 — "return-type
/// uniformity keeps the template method unconditional").
#[derive(Debug, Clone, Default)]
pub struct RawEnvelope {
    pub live: Option<RawPayload>,
    pub daily: Option<RawPayload>,
}

impl RawEnvelope {
    pub fn is_empty(&self) -> bool {
        self.live.is_none() && self.daily.is_none()
    }
}

/// "Any time in the first hour of the local day" — the corrected reading
/// of the source material's `hour == 0 and minute < 60` check (§9), which
/// reduces to just `hour == 0`.
fn is_first_hour_of_day(hour: u32) -> bool {
    hour == 0
}

/// A reader converts a station into either a record or a typed failure.
/// Subclasses (adapters) implement the four extension points; `read` is
/// the invariant template method (§4.1) and should not be overridden.
pub trait Reader {
    /// Subset of `{"field1", "field2", "field3"}` whose presence on the
    /// station is a precondition for this reader.
    fn required_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the first-hour-of-day suppression policy (§4.1 step 6)
    /// applies to this source.
    fn ignore_early_readings(&self) -> bool {
        false
    }

    fn fetch_live(&mut self, station: &Station) -> CollectorResult<Option<RawPayload>>;

    fn fetch_daily(&mut self, _station: &Station) -> CollectorResult<Option<RawPayload>> {
        Ok(None)
    }

    fn parse(&self, station: &Station, envelope: &RawEnvelope) -> CollectorResult<Option<Fields>>;

    /// Drains whatever latency samples (milliseconds) this reader
    /// instance accumulated during `fetch_live`/`fetch_daily`. The
    /// default stores none; the benchmark reader overrides this.
    fn take_latency_samples(&mut self) -> Vec<f64> {
        Vec::new()
    }

    /// The template method. Not to be overridden by adapters.
    fn read(&mut self, station: &Station) -> CollectorResult<Option<Record>> {
        station.validate_required_fields(self.required_fields())?;

        let live = self.fetch_live(station)?;
        let daily = self.fetch_daily(station)?;

        let envelope = RawEnvelope { live, daily };
        if envelope.is_empty() {
            return Err(CollectorError::NoData);
        }

        let fields = match self.parse(station, &envelope)? {
            Some(fields) => fields,
            None => return Err(CollectorError::NoData),
        };

        let mut fields = fields;
        let source_ts = fields.source_timestamp.ok_or(CollectorError::MissingTimestamp)?;
        let source_ts_local = source_ts.with_timezone(&station.local_timezone);

        let now = Utc::now();
        if source_ts_local.with_timezone(&Utc) > now {
            return Err(CollectorError::FutureTimestamp);
        }
        if (now - source_ts_local.with_timezone(&Utc)).num_seconds() > weather_core::MAX_READING_AGE_SECS {
            return Err(CollectorError::StaleTimestamp);
        }

        if self.ignore_early_readings() {
            let taken_local = fields.taken_timestamp.unwrap_or(now).with_timezone(&station.local_timezone);
            if is_first_hour_of_day(source_ts_local.hour()) || is_first_hour_of_day(taken_local.hour()) {
                fields.clear_daily();
            }
        }

        fields.source_timestamp = Some(source_ts_local);
        Ok(Some(Record::from_fields(station.id.clone(), source_ts_local, fields)))
    }
}

/// Boxed factory for a reader, stored by connection type in the
/// collector's registry so that each worker constructs its own instance
/// (§9 — "reader factories, not reader instances").
pub type ReaderFactory = Box<dyn Fn() -> Box<dyn Reader + Send> + Send + Sync>;

/// Reads a numeric field out of a JSON value that may be a bare number or
/// a numeric string, which several adapters' upstream APIs mix freely.
pub fn json_number(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

pub fn max_or_none(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

pub fn min_or_none(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

pub fn coalesce(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    values.into_iter().flatten().next()
}

pub fn latest_timestamp<Tz: chrono::TimeZone>(values: impl IntoIterator<Item = DateTime<Tz>>) -> Option<DateTime<Tz>>
where
    DateTime<Tz>: Ord,
{
    values.into_iter().max()
}
