use std::collections::VecDeque;

use chrono::{Local, NaiveDateTime, TimeZone};
use sensor_viewer_common::chart::Range;
use sensor_viewer_common::error::{FetchError, Result};
use sensor_viewer_common::node::SensorNode;
use sensor_viewer_common::{Poller, Renderer, ViewerConfig};

/// What the scripted node answers on consecutive fetches.
enum Reply {
    Body(&'static str),
    Status(u16),
    Refused,
}

struct ScriptedNode(VecDeque<Reply>);

impl SensorNode for ScriptedNode {
    fn fetch(&mut self) -> Result<String> {
        match self.0.pop_front().expect("no reply scripted for this tick") {
            Reply::Body(body) => Ok(body.to_string()),
            Reply::Status(code) => Err(FetchError::Status(code)),
            Reply::Refused => Err(FetchError::Transport(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))),
        }
    }
}

fn poller(replies: impl IntoIterator<Item = Reply>) -> Poller {
    Poller::new(Box::new(ScriptedNode(replies.into_iter().collect())))
}

fn local_seconds(text: &str) -> f64 {
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap();
    Local.from_local_datetime(&naive).earliest().unwrap().timestamp() as f64
}

const S1: &str = r#"[{"timestamp":"ms:1000","temperature":20.0,"pressure":1013.0,"humidity":50.0},
    {"timestamp":"ms:3500","temperature":20.5,"pressure":1013.2,"humidity":49.8}]"#;

const S2: &str = r#"[{"timestamp":"2025-01-01 12:00:00","temperature":10,"pressure":1000,"humidity":40},
    {"timestamp":"2025-01-01 12:00:05","temperature":10.1,"pressure":1000.1,"humidity":40.1}]"#;

const S3: &str = r#"[{"timestamp":"ms:2000","temperature":1,"pressure":1,"humidity":1},
    {"timestamp":"garbage","temperature":2,"pressure":2,"humidity":2},
    {"timestamp":4500,"temperature":3,"pressure":3,"humidity":3}]"#;

#[test]
fn uptime_encoding() {
    let mut poller = poller([Reply::Body(S1)]);

    assert_eq!(poller.tick().unwrap(), 2);

    let series = poller.series();
    assert_eq!(series.time, vec![1.0, 3.5]);
    assert_eq!(series.temperature, vec![20.0, 20.5]);
    assert_eq!(series.pressure, vec![1013.0, 1013.2]);
    assert_eq!(series.humidity, vec![50.0, 49.8]);
    assert_eq!(poller.session().anchor(), None);
}

#[test]
fn wall_clock_cold_start() {
    let mut poller = poller([Reply::Body(S2)]);

    poller.tick().unwrap();

    assert_eq!(poller.series().time, vec![0.0, 5.0]);
    assert_eq!(poller.series().temperature, vec![10.0, 10.1]);
    assert_eq!(
        poller.session().anchor(),
        Some(local_seconds("2025-01-01 12:00:00"))
    );
}

#[test]
fn mixed_encodings_in_one_batch() {
    let mut poller = poller([Reply::Body(S3)]);

    poller.tick().unwrap();

    let series = poller.series();
    assert_eq!(series.time, vec![2.0, 0.0, 4.5]);
    assert_eq!(series.temperature, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.pressure, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.humidity, vec![1.0, 2.0, 3.0]);
}

#[test]
fn missing_fields() {
    let mut poller = poller([Reply::Body(r#"[{"timestamp":"ms:0"}]"#)]);

    poller.tick().unwrap();

    let series = poller.series();
    assert_eq!(series.time, vec![0.0]);
    for values in [&series.temperature, &series.pressure, &series.humidity] {
        assert_eq!(values.len(), 1);
        assert!(values[0].is_nan());
    }
}

#[test]
fn transport_failure_keeps_series() {
    let mut poller = poller([Reply::Body(S1), Reply::Refused]);
    poller.tick().unwrap();
    let before = poller.series().clone();

    let err = poller.tick().unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(poller.series().bitwise_eq(&before));
    assert_eq!(poller.series().time, vec![1.0, 3.5]);
}

#[test]
fn window_follows_newest_sample() {
    let mut poller = poller([Reply::Body(S1)]);
    poller.tick().unwrap();

    let frames = Renderer::new(&ViewerConfig::default()).render(poller.series());

    assert_eq!(frames.len(), 3);
    for frame in frames {
        assert_eq!(frame.x_range, Range { min: 0.0, max: 4.5 });
    }
}

#[test]
fn length_alignment_and_order() {
    let mut poller = poller([Reply::Body(S3), Reply::Body(S1)]);

    poller.tick().unwrap();
    poller.tick().unwrap();

    let series = poller.series();
    assert_eq!(series.len(), 2);
    assert_eq!(series.temperature.len(), 2);
    assert_eq!(series.pressure.len(), 2);
    assert_eq!(series.humidity.len(), 2);
    assert_eq!(series.pressure, vec![1013.0, 1013.2]);
}

#[test]
fn anchor_survives_later_polls() {
    let later = r#"[{"timestamp":"2025-01-01 12:01:00","temperature":11},
        {"timestamp":"2025-01-01 12:01:10","temperature":12}]"#;
    let mut poller = poller([Reply::Body(S2), Reply::Body(later)]);

    poller.tick().unwrap();
    let anchor = poller.session().anchor();
    poller.tick().unwrap();

    assert_eq!(poller.session().anchor(), anchor);
    assert_eq!(poller.series().time, vec![60.0, 70.0]);
}

#[test]
fn uptime_ignores_anchor_state() {
    let mut anchored = poller([Reply::Body(S2), Reply::Body(S1)]);
    let mut fresh = poller([Reply::Body(S1)]);

    anchored.tick().unwrap();
    anchored.tick().unwrap();
    fresh.tick().unwrap();

    assert!(anchored.session().anchor().is_some());
    assert!(anchored.series().bitwise_eq(fresh.series()));
}

#[test]
fn null_equals_omitted() {
    let mut with_nulls = poller([Reply::Body(
        r#"[{"timestamp":"ms:10","temperature":null,"pressure":5,"humidity":null}]"#,
    )]);
    let mut omitted = poller([Reply::Body(r#"[{"timestamp":"ms:10","pressure":5}]"#)]);

    with_nulls.tick().unwrap();
    omitted.tick().unwrap();

    assert!(with_nulls.series().bitwise_eq(omitted.series()));
}

#[test]
fn failures_leave_state_untouched() {
    let mut poller = poller([
        Reply::Body(S1),
        Reply::Status(500),
        Reply::Body(r#"{"timestamp":"ms:1"}"#),
        Reply::Body(r#"[{"timestamp":"2025-01-01 12:00:00"}, "oops"]"#),
        Reply::Body(r#"[["2025-01-01 12:00:00", 1, 2, 3]]"#),
        Reply::Body("not json"),
    ]);
    poller.tick().unwrap();
    let before = poller.series().clone();

    assert!(matches!(poller.tick(), Err(FetchError::Status(500))));
    for _ in 0..4 {
        assert!(matches!(poller.tick(), Err(FetchError::Body(_))));
    }

    assert!(poller.series().bitwise_eq(&before));
    // the rejected batches carried a wall-clock timestamp but must not anchor
    assert_eq!(poller.session().anchor(), None);
}

#[test]
fn diagnostics_read_like_the_operator_expects() {
    assert_eq!(
        FetchError::Status(404).to_string(),
        "Failed to fetch data. Status code: 404"
    );

    let mut poller = poller([Reply::Refused]);
    let err = poller.tick().unwrap_err();
    assert_eq!(err.to_string(), "Error fetching data: connection refused");
}
