use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The mutable working shape a reader's `parse` step populates. This is
/// the "Fields skeleton": every slot a reader might fill, regardless of
/// which live/daily split the source actually reports.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    pub source_timestamp: Option<DateTime<Tz>>,
    pub taken_timestamp: Option<DateTime<Utc>>,

    // live half
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub rain: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_gust: Option<f64>,

    // daily half
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_wind_speed: Option<f64>,
    pub max_wind_gust: Option<f64>,
    pub cumulative_rain: Option<f64>,

    pub flagged: bool,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            taken_timestamp: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Blanks the daily half of the skeleton, keeping the live half intact.
    /// Used by the `ignore_early_readings` policy (§4.1 step 6).
    pub fn clear_daily(&mut self) {
        self.max_temperature = None;
        self.min_temperature = None;
        self.max_wind_speed = None;
        self.max_wind_gust = None;
        self.cumulative_rain = None;
    }
}

/// A normalized weather observation, ready for the corrector/validator
/// pipeline and, eventually, persistence. Units are canonical: °C, km/h,
/// hPa, mm, percent, degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub station_id: String,
    pub run_id: Option<String>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub source_timestamp_utc: DateTime<Utc>,
    /// The timezone the source timestamp is rendered in for persistence;
    /// the instant itself (`source_timestamp_utc`) is timezone-independent.
    pub source_timestamp_tz: Tz,
    pub taken_timestamp: DateTime<Utc>,

    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub max_wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub rain: Option<f64>,
    pub cumulative_rain: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub wind_gust: Option<f64>,
    pub max_wind_gust: Option<f64>,

    pub flagged: bool,
}

impl Record {
    /// Assembles a `Record` from an already timestamp-validated `Fields`
    /// skeleton. Callers (the `Reader` template method) are responsible
    /// for having run the timestamp-age policy before calling this.
    pub fn from_fields(station_id: impl Into<String>, source_timestamp: DateTime<Tz>, fields: Fields) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_id: station_id.into(),
            run_id: None,
            source_timestamp_utc: source_timestamp.with_timezone(&Utc),
            source_timestamp_tz: source_timestamp.timezone(),
            taken_timestamp: fields.taken_timestamp.unwrap_or_else(Utc::now),
            temperature: fields.temperature,
            wind_speed: fields.wind_speed,
            max_wind_speed: fields.max_wind_speed,
            wind_direction: fields.wind_direction,
            rain: fields.rain,
            cumulative_rain: fields.cumulative_rain,
            humidity: fields.humidity,
            pressure: fields.pressure,
            max_temperature: fields.max_temperature,
            min_temperature: fields.min_temperature,
            wind_gust: fields.wind_gust,
            max_wind_gust: fields.max_wind_gust,
            flagged: fields.flagged,
        }
    }

    pub fn source_timestamp(&self) -> DateTime<Tz> {
        self.source_timestamp_utc.with_timezone(&self.source_timestamp_tz)
    }

    /// Visits every numeric field for the corrector/validator passes, in
    /// the fixed order the source material rounds and range-checks them.
    pub fn numeric_fields_mut(&mut self) -> Vec<(&'static str, &mut Option<f64>)> {
        vec![
            ("temperature", &mut self.temperature),
            ("wind_speed", &mut self.wind_speed),
            ("max_wind_speed", &mut self.max_wind_speed),
            ("wind_direction", &mut self.wind_direction),
            ("rain", &mut self.rain),
            ("cumulative_rain", &mut self.cumulative_rain),
            ("humidity", &mut self.humidity),
            ("pressure", &mut self.pressure),
            ("max_temperature", &mut self.max_temperature),
            ("min_temperature", &mut self.min_temperature),
            ("wind_gust", &mut self.wind_gust),
            ("max_wind_gust", &mut self.max_wind_gust),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_daily_keeps_live_half() {
        let mut f = Fields::new();
        f.temperature = Some(10.0);
        f.max_temperature = Some(20.0);
        f.clear_daily();
        assert_eq!(f.temperature, Some(10.0));
        assert_eq!(f.max_temperature, None);
    }
}
