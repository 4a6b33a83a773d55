//! The post-processing step between a raw reader result and the validator
//! (§4.3): apply a per-station pressure offset, then round every numeric
//! field to a fixed number of decimals. Never flags a record; never reads
//! anything beyond the record and its two parameters.

use weather_core::Record;

pub struct Corrector {
    decimal_places: u32,
}

impl Corrector {
    pub fn new(decimal_places: u32) -> Self {
        Self { decimal_places }
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimal_places as i32);
        (value * factor).round() / factor
    }

    /// Adds `pressure_offset` to `record.pressure` when both are present,
    /// then rounds every numeric field to this corrector's precision.
    pub fn correct(&self, record: &mut Record, pressure_offset: Option<f64>) {
        if let (Some(pressure), Some(offset)) = (record.pressure, pressure_offset) {
            record.pressure = Some(pressure + offset);
        }

        for (_, value) in record.numeric_fields_mut() {
            if let Some(v) = value {
                *v = self.round(*v);
            }
        }
    }
}

impl Default for Corrector {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weather_core::Fields;

    fn sample_record() -> Record {
        let mut fields = Fields::new();
        fields.pressure = Some(1013.456);
        fields.temperature = Some(12.34);
        Record::from_fields("s1", Utc::now().with_timezone(&chrono_tz::Etc::UTC), fields)
    }

    #[test]
    fn applies_pressure_offset_and_rounds() {
        let mut record = sample_record();
        Corrector::new(1).correct(&mut record, Some(2.0));
        assert_eq!(record.pressure, Some(1015.5));
        assert_eq!(record.temperature, Some(12.3));
    }

    #[test]
    fn no_offset_leaves_pressure_untouched_besides_rounding() {
        let mut record = sample_record();
        Corrector::new(1).correct(&mut record, None);
        assert_eq!(record.pressure, Some(1013.5));
    }

    #[test]
    fn round_trip_is_a_no_op_when_already_rounded_and_offset_is_zero() {
        let mut fields = Fields::new();
        fields.temperature = Some(12.3);
        let mut record = Record::from_fields("s1", Utc::now().with_timezone(&chrono_tz::Etc::UTC), fields);
        let before = record.temperature;
        Corrector::new(1).correct(&mut record, Some(0.0));
        assert_eq!(record.temperature, before);
    }
}
