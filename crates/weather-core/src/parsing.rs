//! Defensive parsing helpers for source payloads. Every source emits some
//! variant of "numbers as strings, sometimes with the wrong decimal
//! separator, sometimes missing entirely" — these functions absorb that
//! without propagating an error for the common cases.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// `-`, `N/A`, `NA`, `NaN`, or absent: the source's way of saying "no
/// reading".
pub fn is_na_value(value: Option<&str>) -> bool {
    matches!(value, None) || matches!(value, Some(v) if matches!(v, "-" | "N/A" | "NA" | "NaN"))
}

pub fn safe_float(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

pub fn safe_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

/// Accepts `,` or `.` as the decimal separator, strips anything that
/// isn't a digit, `.`, or `-`, and rejects strings that mix both
/// separators (ambiguous grouping vs. decimal point).
pub fn smart_parse_float(value: &str) -> Result<Option<f64>, String> {
    if is_na_value(Some(value)) {
        return Ok(None);
    }
    if value.is_empty() {
        return Ok(Some(0.0));
    }

    let has_comma = value.contains(',');
    let has_dot = value.contains('.');
    if has_comma && has_dot {
        return Err(format!("invalid float format: both comma and dot as separators in '{value}'"));
    }

    let normalized = if has_comma { value.replace('.', "").replace(',', ".") } else { value.to_string() };

    let cleaned: String = normalized.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-').collect();

    cleaned.parse::<f64>().map(Some).map_err(|e| format!("invalid float '{value}': {e}"))
}

const SPANISH_DATETIME_FORMATS: [&str; 3] = ["%d/%m/%Y %H:%M", "%d-%m-%Y %H:%M", "%d/%m/%y %H:%M"];

fn try_general_datetime(value: &str) -> Option<NaiveDateTime> {
    // American month/day ordering, the way a general-purpose date parser
    // (as opposed to the Spanish-specific formats above) would read it.
    const GENERAL_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%y %H:%M",
    ];
    for fmt in GENERAL_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc())
}

/// Tries the Spanish `dd/mm/yyyy hh:mm` family and a handful of
/// general/ISO formats, then picks whichever candidate is closest to (and
/// not after) *now* in the given timezone. Rejects strings with no `:`
/// since that means the time component is missing entirely.
pub fn smart_parse_datetime(value: &str, tz: Tz) -> Result<DateTime<Tz>, String> {
    if !value.contains(':') {
        return Err(format!("invalid date format (missing time component): {value}"));
    }

    let mut candidates: Vec<NaiveDateTime> = SPANISH_DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .collect();

    if let Some(general) = try_general_datetime(value) {
        candidates.push(general);
    }

    if candidates.is_empty() {
        return Err(format!("invalid date format: {value}"));
    }

    let now = chrono::Utc::now().with_timezone(&tz).naive_local();

    let chosen = candidates
        .into_iter()
        .map(|naive| tz.from_local_datetime(&naive).single().unwrap_or_else(|| tz.from_utc_datetime(&naive)))
        .filter(|dt| dt.naive_local() <= now)
        .min_by_key(|dt| (now - dt.naive_local()).num_seconds().abs())
        .ok_or_else(|| format!("invalid date format: {value} (all candidates lie in the future)"))?;

    Ok(chosen)
}

const COMPASS_POINTS: [(&str, f64); 16] = [
    ("n", 0.0),
    ("nne", 22.5),
    ("ne", 45.0),
    ("ene", 67.5),
    ("e", 90.0),
    ("ese", 112.5),
    ("se", 135.0),
    ("sse", 157.5),
    ("s", 180.0),
    ("ssw", 202.5),
    ("sw", 225.0),
    ("wsw", 247.5),
    ("w", 270.0),
    ("wnw", 292.5),
    ("nw", 315.0),
    ("nnw", 337.5),
];

/// Numeric azimuths are accepted verbatim in `[0, 360]` (`360` wraps to
/// `0`); strings are matched against the 16 cardinal points after
/// lowercasing, stripping whitespace/degree marks, and substituting the
/// Spanish `o` ("oeste") for `w`. Anything else falls back to a plain
/// float parse; unparseable or sentinel input yields `None`.
pub fn smart_azimuth_numeric(value: f64) -> Option<f64> {
    if !(0.0..=360.0).contains(&value) {
        return None;
    }
    Some(if value == 360.0 { 0.0 } else { value })
}

pub fn smart_azimuth_str(value: &str) -> Option<f64> {
    if value == "-" || value == "N/A" {
        return None;
    }

    let normalized = value.trim().to_lowercase().replace([' ', '°', 'º'], "").replace('o', "w");

    if let Some((_, degrees)) = COMPASS_POINTS.iter().find(|(name, _)| *name == normalized) {
        return Some(*degrees);
    }

    smart_parse_float(&normalized).ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azimuth_cardinal_points() {
        assert_eq!(smart_azimuth_str("N"), Some(0.0));
        assert_eq!(smart_azimuth_str("n"), Some(0.0));
        assert_eq!(smart_azimuth_str("NO"), Some(315.0));
        assert_eq!(smart_azimuth_str("NW"), Some(315.0));
    }

    #[test]
    fn azimuth_numeric_wraps_360_to_0() {
        assert_eq!(smart_azimuth_numeric(360.0), Some(0.0));
        assert_eq!(smart_azimuth_numeric(361.0), None);
    }

    #[test]
    fn parse_float_handles_separators() {
        assert_eq!(smart_parse_float("1,5").unwrap(), Some(1.5));
        assert_eq!(smart_parse_float("1.5").unwrap(), Some(1.5));
        assert!(smart_parse_float("1,234.5").is_err());
        assert_eq!(smart_parse_float("N/A").unwrap(), None);
        assert_eq!(smart_parse_float("").unwrap(), Some(0.0));
    }

    #[test]
    fn parse_datetime_prefers_candidate_closest_to_now() {
        // "12/03/2020" is ambiguous between Spanish (12 Mar) and American
        // (3 Dec) reading; both inputs below resolve to the same pair of
        // candidates, and since this test runs long after 2020, the more
        // recent candidate (3 Dec) is the one closest to now.
        let a = smart_parse_datetime("12/03/2020 15:30", Tz::UTC).unwrap();
        let b = smart_parse_datetime("03/12/2020 15:30", Tz::UTC).unwrap();
        assert_eq!(a.naive_local(), b.naive_local());
        assert_eq!(a.naive_local().date(), chrono::NaiveDate::from_ymd_opt(2020, 12, 3).unwrap());
    }

    #[test]
    fn parse_datetime_rejects_missing_time_component() {
        assert!(smart_parse_datetime("12/03/2020", Tz::UTC).is_err());
    }
}
