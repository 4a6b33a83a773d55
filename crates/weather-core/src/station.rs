use crate::error::CollectorError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Timezones the catalog is allowed to express a station in. Anything else
/// is a hard configuration error caught before any network call is made.
pub const TIMEZONE_ALLOWLIST: [Tz; 3] = [chrono_tz::Europe::Madrid, chrono_tz::Europe::Lisbon, chrono_tz::Etc::UTC];

pub fn validate_timezone(tz: Tz) -> Result<(), CollectorError> {
    if TIMEZONE_ALLOWLIST.contains(&tz) {
        Ok(())
    } else {
        Err(CollectorError::InvalidTimezone(tz.to_string()))
    }
}

/// A catalog entry. Immutable for the duration of a run; equality and
/// hashing are by `id` only, since two stations that share an id are the
/// same station regardless of what the rest of their fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub connection_type: String,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub pressure_offset: Option<f64>,
    pub data_timezone: Tz,
    pub local_timezone: Tz,
}

impl Station {
    pub fn new(id: impl Into<String>, connection_type: impl Into<String>, data_timezone: Tz, local_timezone: Tz) -> Self {
        Self {
            id: id.into(),
            connection_type: connection_type.into(),
            field1: None,
            field2: None,
            field3: None,
            pressure_offset: None,
            data_timezone,
            local_timezone,
        }
    }

    pub fn with_field1(mut self, v: impl Into<String>) -> Self {
        self.field1 = Some(v.into());
        self
    }

    pub fn with_field2(mut self, v: impl Into<String>) -> Self {
        self.field2 = Some(v.into());
        self
    }

    pub fn with_field3(mut self, v: impl Into<String>) -> Self {
        self.field3 = Some(v.into());
        self
    }

    pub fn with_pressure_offset(mut self, v: f64) -> Self {
        self.pressure_offset = Some(v);
        self
    }

    /// Checks that `field1..field3` named by `required` are all present.
    pub fn validate_required_fields(&self, required: &[&str]) -> Result<(), CollectorError> {
        for field in required {
            let present = match *field {
                "field1" => self.field1.is_some(),
                "field2" => self.field2.is_some(),
                "field3" => self.field3.is_some(),
                other => {
                    tracing::warn!(field = other, "unknown required field name on reader");
                    true
                }
            };
            if !present {
                return Err(CollectorError::MissingField((*field).to_string()));
            }
        }
        Ok(())
    }

    pub fn validate_timezones(&self) -> Result<(), CollectorError> {
        validate_timezone(self.data_timezone)?;
        validate_timezone(self.local_timezone)?;
        Ok(())
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlisted_timezones_pass() {
        assert!(validate_timezone(chrono_tz::Europe::Madrid).is_ok());
        assert!(validate_timezone(chrono_tz::Etc::UTC).is_ok());
    }

    #[test]
    fn other_timezones_are_rejected() {
        assert!(validate_timezone(chrono_tz::America::New_York).is_err());
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = Station::new("s1", "ecowitt", chrono_tz::Etc::UTC, chrono_tz::Etc::UTC).with_field1("x");
        let b = Station::new("s1", "holfuy", chrono_tz::Etc::UTC, chrono_tz::Etc::UTC);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_required_field_is_reported() {
        let s = Station::new("s1", "ecowitt", chrono_tz::Etc::UTC, chrono_tz::Etc::UTC).with_field1("mac");
        assert!(s.validate_required_fields(&["field1"]).is_ok());
        assert!(s.validate_required_fields(&["field1", "field2"]).is_err());
    }
}
