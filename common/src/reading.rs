// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde_json::{Map, Value};

use crate::session::Session;
use crate::timestamp;

/// Value standing in for an absent sensor reading. The charts draw it as a gap.
pub const MISSING: f64 = f64::NAN;

/// One element of a batch as the sensor node sends it.
///
/// Every recognized field is kept as raw JSON: an absent key and an explicit
/// `null` both end up as `None`, and unrecognized keys are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawReading {
    pub timestamp: Option<Value>,
    pub temperature: Option<Value>,
    pub pressure: Option<Value>,
    pub humidity: Option<Value>,
}

impl From<Map<String, Value>> for RawReading {
    fn from(mut object: Map<String, Value>) -> Self {
        let mut field = |key: &str| object.remove(key).filter(|value| !value.is_null());

        Self {
            timestamp: field("timestamp"),
            temperature: field("temperature"),
            pressure: field("pressure"),
            humidity: field("humidity"),
        }
    }
}

/// A decoded sample, placed on the session's time axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reading {
    /// Seconds on the shared time axis.
    pub t: f64,
    /// Degrees Celsius, or [`MISSING`].
    pub temperature: f64,
    /// Hectopascal, or [`MISSING`].
    pub pressure: f64,
    /// Relative humidity in percent, or [`MISSING`].
    pub humidity: f64,
}

impl Reading {
    /// Decodes one raw element. Never fails: a bad timestamp becomes `0.0` and
    /// a bad or absent sensor value becomes [`MISSING`].
    pub fn decode(raw: &RawReading, session: &mut Session) -> Self {
        Self {
            t: timestamp::normalize(raw.timestamp.as_ref(), session),
            temperature: sensor_value(raw.temperature.as_ref()),
            pressure: sensor_value(raw.pressure.as_ref()),
            humidity: sensor_value(raw.humidity.as_ref()),
        }
    }
}

fn sensor_value(raw: Option<&Value>) -> f64 {
    raw.and_then(Value::as_f64).unwrap_or(MISSING)
}

/// Parses a response body into its raw elements.
///
/// The whole batch is rejected if the body is not a JSON array of objects, so
/// nothing downstream (the session anchor included) sees a partial batch. A key
/// repeated within an element keeps its last value.
pub fn parse_batch(body: &str) -> Result<Vec<RawReading>, serde_json::Error> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(body)?;
    Ok(objects.into_iter().map(RawReading::from).collect())
}

#[cfg(test)]
fn raw_reading(text: &str) -> RawReading {
    serde_json::from_str::<Map<String, Value>>(text).unwrap().into()
}

#[test]
fn test_decode_full_reading() {
    let raw = raw_reading(
        r#"{"timestamp":"ms:1500","temperature":21.5,"pressure":1009,"humidity":38.25,"battery":3.3}"#,
    );

    let reading = Reading::decode(&raw, &mut Session::new());

    assert_eq!(reading.t, 1.5);
    assert_eq!(reading.temperature, 21.5);
    assert_eq!(reading.pressure, 1009.0);
    assert_eq!(reading.humidity, 38.25);
}

#[test]
fn test_null_and_absent_are_missing() {
    let with_nulls = raw_reading(r#"{"timestamp":null,"temperature":null,"pressure":null,"humidity":null}"#);
    let empty = raw_reading("{}");

    assert_eq!(with_nulls, empty);

    let reading = Reading::decode(&empty, &mut Session::new());
    assert_eq!(reading.t, 0.0);
    assert!(reading.temperature.is_nan());
    assert!(reading.pressure.is_nan());
    assert!(reading.humidity.is_nan());
}

#[test]
fn test_non_numeric_sensor_is_missing() {
    let raw = raw_reading(r#"{"timestamp":"ms:0","temperature":"hot","pressure":[1],"humidity":false}"#);

    let reading = Reading::decode(&raw, &mut Session::new());

    assert!(reading.temperature.is_nan());
    assert!(reading.pressure.is_nan());
    assert!(reading.humidity.is_nan());
}

#[test]
fn test_parse_batch_shapes() {
    assert_eq!(parse_batch("[]").unwrap().len(), 0);
    assert_eq!(parse_batch(r#"[{}, {"x": 1}]"#).unwrap().len(), 2);

    assert!(parse_batch(r#"{"timestamp":"ms:0"}"#).is_err());
    assert!(parse_batch(r#"[{"timestamp":"ms:0"}, 42]"#).is_err());
    assert!(parse_batch("<html>").is_err());

    // positional arrays are not readings, however well they line up
    assert!(parse_batch("[[]]").is_err());
    assert!(parse_batch(r#"[["2025-01-01 12:00:00", 1, 2, 3]]"#).is_err());
}

#[test]
fn test_repeated_key_keeps_last_value() {
    let batch = parse_batch(r#"[{"timestamp":"ms:0","temperature":1,"temperature":2}]"#).unwrap();

    let reading = Reading::decode(&batch[0], &mut Session::new());
    assert_eq!(reading.temperature, 2.0);
}
