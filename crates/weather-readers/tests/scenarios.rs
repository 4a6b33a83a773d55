//! End-to-end adapter scenarios (§8): each drives a reader against a
//! canned payload served by a local HTTP stub rather than a real endpoint,
//! and checks the exact numeric record the parser is expected to produce.

use chrono::{Duration, Utc};
use chrono_tz::Etc::UTC;
use httpmock::prelude::*;
use serde_json::json;
use weather_core::Station;
use weather_readers::adapters::{EcowittReader, HolfuyReader, MeteoclimaticReader, WundergroundReader};
use weather_readers::Reader;

fn station(connection_type: &str) -> Station {
    Station::new("s1", connection_type, UTC, UTC)
}

#[test]
fn ecowitt_valid_payload_produces_the_expected_record() {
    let server = MockServer::start();
    let ts = (Utc::now() - Duration::minutes(5)).timestamp().to_string();

    let live = server.mock(|when, then| {
        when.method(GET).path("/live");
        then.status(200).json_body(json!({
            "data": {
                "outdoor": {
                    "temperature": {"time": ts, "value": "12.3"},
                    "humidity": {"value": "61"}
                },
                "wind": {
                    "wind_speed": {"value": "2.2"},
                    "wind_direction": {"value": "304"},
                    "wind_gust": {"value": "5.4"}
                },
                "rainfall": {"rain_rate": {"value": "1.2"}},
                "pressure": {}
            }
        }));
    });
    let daily = server.mock(|when, then| {
        when.method(GET).path("/daily");
        then.status(200).json_body(json!({
            "data": {
                "outdoor": {"temperature": {"list": {"00": "5.0", "12": "14.7"}}},
                "wind": {
                    "wind_speed": {"list": {"00": "3.0", "12": "18.7"}},
                    "wind_gust": {"list": {"00": "5.0", "12": "27.7"}}
                },
                "rainfall": {"daily": {"value": "7.1"}}
            }
        }));
    });

    let mut reader = EcowittReader::new(server.url("/live"), server.url("/daily"));
    let station = station("ecowitt").with_field1("mac").with_field2("api").with_field3("app");

    let record = reader.read(&station).unwrap().expect("a record");

    live.assert();
    daily.assert();
    assert_eq!(record.temperature, Some(12.3));
    assert_eq!(record.humidity, Some(61.0));
    assert_eq!(record.rain, Some(1.2));
    assert_eq!(record.pressure, None);
    assert_eq!(record.wind_speed, Some(2.2));
    assert_eq!(record.wind_gust, Some(5.4));
    assert_eq!(record.wind_direction, Some(304.0));
    assert_eq!(record.cumulative_rain, Some(7.1));
    assert_eq!(record.max_wind_speed, Some(18.7));
    assert_eq!(record.max_wind_gust, Some(27.7));
    assert_eq!(record.max_temperature, Some(14.7));
    assert_eq!(record.min_temperature, Some(5.0));
}

#[test]
fn holfuy_valid_payload_produces_the_expected_record() {
    let server = MockServer::start();
    let when_time = (Utc::now() - Duration::minutes(5)).format("%Y-%m-%d %H:%M:%S").to_string();

    let live = server.mock(|when, then| {
        when.method(GET).path("/live");
        then.status(200).json_body(json!({
            "dateTime": when_time,
            "temperature": 5.4,
            "wind": {"speed": 5, "direction": 203, "gust": 13},
            "rain": 0.0,
            "humidity": 93.7,
            "pressure": 1014,
            "daily": {"min_temp": 0.1, "max_temp": 8.4, "sum_rain": 10.0}
        }));
    });
    let historic = server.mock(|when, then| {
        when.method(GET).path("/historic");
        then.status(200).json_body(json!({}));
    });

    let mut reader = HolfuyReader::new(server.url("/live"), server.url("/historic"));
    let station = station("holfuy").with_field1("123").with_field3("pw");

    let record = reader.read(&station).unwrap().expect("a record");

    live.assert();
    historic.assert();
    assert_eq!(record.temperature, Some(5.4));
    assert_eq!(record.humidity, Some(93.7));
    assert_eq!(record.rain, Some(0.0));
    assert_eq!(record.pressure, Some(1014.0));
    assert_eq!(record.wind_speed, Some(5.0));
    assert_eq!(record.wind_gust, Some(13.0));
    assert_eq!(record.wind_direction, Some(203.0));
    assert_eq!(record.cumulative_rain, Some(10.0));
    assert_eq!(record.max_temperature, Some(8.4));
    assert_eq!(record.min_temperature, Some(0.1));
}

#[test]
fn meteoclimatic_valid_payload_produces_the_expected_record() {
    let server = MockServer::start();
    let when_time = (Utc::now() - Duration::minutes(5)).format("%d/%m/%Y %H:%M").to_string();

    let live = server.mock(|when, then| {
        when.method(GET).path("/station");
        then.status(200).body(format!(
            "*UPD={when_time}*TMP=16.8*WND=14*AZI=270*BAR=1018.8*HUM=70*DHTM=19.2*DLTM=9.2*DGST=37*DPCP=0*"
        ));
    });

    let mut reader = MeteoclimaticReader::new();
    let station = station("meteoclimatic").with_field1(server.url("/station"));

    let record = reader.read(&station).unwrap().expect("a record");

    live.assert();
    assert_eq!(record.temperature, Some(16.8));
    assert_eq!(record.humidity, Some(70.0));
    assert_eq!(record.rain, None);
    assert_eq!(record.pressure, Some(1018.8));
    assert_eq!(record.wind_speed, Some(14.0));
    assert_eq!(record.wind_gust, None);
    assert_eq!(record.wind_direction, Some(270.0));
    assert_eq!(record.cumulative_rain, Some(0.0));
    assert_eq!(record.max_wind_speed, None);
    assert_eq!(record.max_wind_gust, Some(37.0));
    assert_eq!(record.max_temperature, Some(19.2));
    assert_eq!(record.min_temperature, Some(9.2));
}

#[test]
fn wunderground_valid_payload_produces_the_expected_record() {
    let server = MockServer::start();
    let when_time = (Utc::now() - Duration::minutes(5)).format("%Y-%m-%d %H:%M:%S").to_string();

    let live = server.mock(|when, then| {
        when.method(GET).path("/live");
        then.status(200).json_body(json!({
            "observations": [{
                "stationID": "ST001",
                "obsTimeLocal": when_time,
                "winddir": 15,
                "humidity": 79,
                "metric": {
                    "temp": 5,
                    "windSpeed": 5.4,
                    "windGust": 9.4,
                    "precipRate": 0,
                    "precipTotal": 3.3,
                    "pressure": 1014.6
                }
            }]
        }));
    });
    let daily = server.mock(|when, then| {
        when.method(GET).path("/daily");
        then.status(200).json_body(json!({
            "summaries": [{
                "stationID": "ST001",
                "metric": {
                    "windspeedHigh": 30.2,
                    "windgustHigh": 36.7,
                    "tempHigh": 6.4,
                    "tempLow": 0.8
                }
            }]
        }));
    });

    let mut reader = WundergroundReader::new(server.url("/live"), server.url("/daily"));
    let station = station("wunderground").with_field1("ST001").with_field2("key");

    let record = reader.read(&station).unwrap().expect("a record");

    live.assert();
    daily.assert();
    assert_eq!(record.temperature, Some(5.0));
    assert_eq!(record.humidity, Some(79.0));
    assert_eq!(record.rain, Some(0.0));
    assert_eq!(record.pressure, Some(1014.6));
    assert_eq!(record.wind_speed, Some(5.4));
    assert_eq!(record.wind_gust, Some(9.4));
    assert_eq!(record.wind_direction, Some(15.0));
    assert_eq!(record.cumulative_rain, Some(3.3));
    assert_eq!(record.max_wind_speed, Some(30.2));
    assert_eq!(record.max_wind_gust, Some(36.7));
    assert_eq!(record.max_temperature, Some(6.4));
    assert_eq!(record.min_temperature, Some(0.8));
}

#[test]
fn stale_reading_is_rejected_before_a_record_is_built() {
    let server = MockServer::start();
    let when_time = (Utc::now() - Duration::minutes(35)).format("%Y-%m-%d %H:%M:%S").to_string();

    server.mock(|when, then| {
        when.method(GET).path("/live");
        then.status(200).json_body(json!({
            "dateTime": when_time,
            "temperature": 5.4,
            "wind": {"speed": 5, "direction": 203, "gust": 13},
            "rain": 0.0,
            "humidity": 93.7,
            "pressure": 1014,
            "daily": {"min_temp": 0.1, "max_temp": 8.4, "sum_rain": 10.0}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/historic");
        then.status(200).json_body(json!({}));
    });

    let mut reader = HolfuyReader::new(server.url("/live"), server.url("/historic"));
    let station = station("holfuy").with_field1("123").with_field3("pw");

    let error = reader.read(&station).unwrap_err();
    assert!(matches!(error, weather_core::CollectorError::StaleTimestamp));
}
