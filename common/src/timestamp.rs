// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use chrono::{Local, NaiveDateTime, TimeZone};
use serde_json::Value;

use crate::session::Session;

/// Prefix of the uptime-since-boot encoding, e.g. `ms:123456`.
pub const UPTIME_PREFIX: &str = "ms:";

/// Calendar layout of the synchronized wall-clock encoding.
pub const WALL_CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The shapes a reading's `timestamp` field comes in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timestamp {
    /// `ms:<number>`, milliseconds already relative to the device's boot.
    Uptime { millis: f64 },
    /// `YYYY-MM-DD HH:MM:SS` in the local calendar, as absolute seconds.
    WallClock { seconds: f64 },
    /// A bare number of milliseconds.
    Millis(f64),
    /// Anything else, including a missing field.
    Unrecognized,
}

impl Timestamp {
    /// Classifies a raw field by shape: prefix first, then calendar, then a
    /// numeric coercion. Strings that match neither encoding are not coerced.
    pub fn classify(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(text)) => Self::classify_text(text),
            Some(Value::Number(number)) => number
                .as_f64()
                .map_or(Self::Unrecognized, Self::Millis),
            Some(Value::Bool(flag)) => Self::Millis(if *flag { 1.0 } else { 0.0 }),
            _ => Self::Unrecognized,
        }
    }

    fn classify_text(text: &str) -> Self {
        if let Some(rest) = text.strip_prefix(UPTIME_PREFIX) {
            return rest
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|millis| millis.is_finite())
                .map_or(Self::Unrecognized, |millis| Self::Uptime { millis });
        }

        NaiveDateTime::parse_from_str(text, WALL_CLOCK_FORMAT)
            .ok()
            // a time skipped by a DST jump has no instant; a repeated one takes the first
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map_or(Self::Unrecognized, |local| Self::WallClock {
                seconds: local.timestamp() as f64,
            })
    }

    /// Places the timestamp on the session's time axis, in seconds.
    ///
    /// Only wall-clock values consult the session, and the first one seen
    /// anchors it. Uninterpretable input yields `0.0`.
    pub fn seconds(self, session: &mut Session) -> f64 {
        match self {
            Self::Uptime { millis } | Self::Millis(millis) => millis / 1000.0,
            Self::WallClock { seconds } => session.rebase(seconds),
            Self::Unrecognized => 0.0,
        }
    }
}

/// Normalizes one raw `timestamp` field onto the shared time axis.
pub fn normalize(raw: Option<&Value>, session: &mut Session) -> f64 {
    let timestamp = Timestamp::classify(raw);
    if timestamp == Timestamp::Unrecognized {
        log::debug!("Unrecognized timestamp {raw:?}, placing sample at 0.0");
    }
    timestamp.seconds(session)
}

#[cfg(test)]
fn local_seconds(text: &str) -> f64 {
    let naive = NaiveDateTime::parse_from_str(text, WALL_CLOCK_FORMAT).unwrap();
    Local.from_local_datetime(&naive).earliest().unwrap().timestamp() as f64
}

#[test]
fn test_uptime_encoding() {
    let mut session = Session::new();

    assert_eq!(normalize(Some(&Value::from("ms:1000")), &mut session), 1.0);
    assert_eq!(normalize(Some(&Value::from("ms: 3500 ")), &mut session), 3.5);
    assert_eq!(normalize(Some(&Value::from("ms:-250")), &mut session), -0.25);
    assert_eq!(normalize(Some(&Value::from("ms:0")), &mut session), 0.0);

    assert_eq!(session.anchor(), None);
}

#[test]
fn test_bad_uptime_does_not_fall_through() {
    let mut session = Session::new();

    for text in ["ms:soon", "ms:inf", "ms:NaN", "ms:"] {
        assert_eq!(
            Timestamp::classify(Some(&Value::from(text))),
            Timestamp::Unrecognized,
            "{text}"
        );
    }
    assert_eq!(normalize(Some(&Value::from("ms:inf")), &mut session), 0.0);
    assert_eq!(normalize(Some(&Value::from("ms:NaN")), &mut session), 0.0);
}

#[test]
fn test_wall_clock_anchors_session() {
    let mut session = Session::new();

    let first = normalize(Some(&Value::from("2025-01-01 12:00:00")), &mut session);
    let second = normalize(Some(&Value::from("2025-01-01 12:00:05")), &mut session);

    assert_eq!(first, 0.0);
    assert_eq!(second, 5.0);
    assert_eq!(session.anchor(), Some(local_seconds("2025-01-01 12:00:00")));
}

#[test]
fn test_numeric_millis() {
    let mut session = Session::new();

    assert_eq!(normalize(Some(&serde_json::json!(4500)), &mut session), 4.5);
    assert_eq!(normalize(Some(&serde_json::json!(-1500.0)), &mut session), -1.5);
    assert_eq!(normalize(Some(&serde_json::json!(true)), &mut session), 0.001);
    assert_eq!(session.anchor(), None);
}

#[test]
fn test_unrecognized_shapes() {
    let mut session = Session::new();

    for raw in [
        serde_json::json!("garbage"),
        serde_json::json!("4500"),
        serde_json::json!("2025-01-01T12:00:00"),
        serde_json::json!(null),
        serde_json::json!([1, 2]),
        serde_json::json!({"ms": 1}),
    ] {
        assert_eq!(normalize(Some(&raw), &mut session), 0.0, "{raw}");
    }
    assert_eq!(normalize(None, &mut session), 0.0);
    assert_eq!(session.anchor(), None);
}
