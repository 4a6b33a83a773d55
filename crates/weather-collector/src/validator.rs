//! Two-pass sanity check applied after correction (§4.4): a range pass
//! that blanks out-of-range values, then a consistency pass that flags
//! (but never blanks) values that disagree with one another.

use weather_core::Record;

struct Range {
    field: &'static str,
    min: f64,
    max: f64,
}

const SAFE_RANGES: &[Range] = &[
    Range { field: "temperature", min: -39.0, max: 50.0 },
    Range { field: "max_temperature", min: -39.0, max: 50.0 },
    Range { field: "min_temperature", min: -39.0, max: 50.0 },
    Range { field: "wind_speed", min: 0.0, max: 500.0 },
    Range { field: "max_wind_speed", min: 0.0, max: 500.0 },
    Range { field: "wind_gust", min: 0.0, max: 500.0 },
    Range { field: "max_wind_gust", min: 0.0, max: 500.0 },
    Range { field: "humidity", min: 0.0, max: 100.0 },
    Range { field: "pressure", min: 800.0, max: 1100.0 },
    Range { field: "wind_direction", min: 0.0, max: 360.0 },
    Range { field: "rain", min: 0.0, max: 500.0 },
    Range { field: "cumulative_rain", min: 0.0, max: 15000.0 },
];

fn range_for(field: &str) -> Option<&'static Range> {
    SAFE_RANGES.iter().find(|r| r.field == field)
}

/// Ordered consistency pairs: if both sides are present and `left > right`,
/// the record is flagged (values are retained, never blanked).
const CONSISTENCY_PAIRS: &[(fn(&Record) -> Option<f64>, fn(&Record) -> Option<f64>)] = &[
    (|r| r.min_temperature, |r| r.temperature),
    (|r| r.temperature, |r| r.max_temperature),
    (|r| r.min_temperature, |r| r.max_temperature),
    (|r| r.wind_speed, |r| r.max_wind_speed),
    (|r| r.wind_gust, |r| r.max_wind_gust),
    (|r| r.wind_speed, |r| r.wind_gust),
];

#[derive(Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Pass 1: blank and flag anything outside its safe range.
    fn check_ranges(&self, record: &mut Record) {
        let mut flagged = false;
        for (field, value) in record.numeric_fields_mut() {
            let Some(v) = *value else { continue };
            if let Some(range) = range_for(field) {
                if v < range.min || v > range.max {
                    *value = None;
                    flagged = true;
                }
            }
        }
        if flagged {
            record.flagged = true;
        }
    }

    /// Pass 2: flag (without blanking) any pairwise inconsistency.
    fn check_consistency(&self, record: &mut Record) {
        for (left, right) in CONSISTENCY_PAIRS {
            if let (Some(l), Some(r)) = (left(record), right(record)) {
                if l > r {
                    record.flagged = true;
                }
            }
        }
    }

    pub fn validate(&self, record: &mut Record) {
        self.check_ranges(record);
        self.check_consistency(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weather_core::Fields;

    fn record_with(f: impl FnOnce(&mut Fields)) -> Record {
        let mut fields = Fields::new();
        f(&mut fields);
        Record::from_fields("s1", Utc::now().with_timezone(&chrono_tz::Etc::UTC), fields)
    }

    #[test]
    fn out_of_range_values_are_blanked_and_flagged() {
        let mut record = record_with(|f| {
            f.temperature = Some(-100.0);
            f.humidity = Some(150.0);
            f.pressure = Some(900.0);
        });
        Validator::new().validate(&mut record);
        assert!(record.flagged);
        assert_eq!(record.temperature, None);
        assert_eq!(record.humidity, None);
        assert_eq!(record.pressure, Some(900.0));
    }

    #[test]
    fn inconsistent_min_max_is_flagged_but_not_blanked() {
        let mut record = record_with(|f| {
            f.min_temperature = Some(30.0);
            f.temperature = Some(20.0);
            f.max_temperature = Some(10.0);
        });
        Validator::new().validate(&mut record);
        assert!(record.flagged);
        assert_eq!(record.min_temperature, Some(30.0));
        assert_eq!(record.temperature, Some(20.0));
        assert_eq!(record.max_temperature, Some(10.0));
    }

    #[test]
    fn validator_is_idempotent() {
        let mut record = record_with(|f| {
            f.temperature = Some(-100.0);
            f.min_temperature = Some(30.0);
            f.max_temperature = Some(10.0);
        });
        let validator = Validator::new();
        validator.validate(&mut record);
        let once = record.clone();
        validator.validate(&mut record);
        assert_eq!(once, record);
    }

    #[test]
    fn clean_record_is_not_flagged() {
        let mut record = record_with(|f| {
            f.temperature = Some(12.0);
            f.min_temperature = Some(5.0);
            f.max_temperature = Some(18.0);
        });
        Validator::new().validate(&mut record);
        assert!(!record.flagged);
    }
}
