// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde_json::{json, Value};

use crate::error::Result;
use crate::node::SensorNode;

/// An offline stand-in for the device.
///
/// Every fetch advances the simulated clock and returns the retained window,
/// stamped with uptime timestamps the way a node without time sync reports them.
#[derive(Default)]
pub struct DummySensorNode {
    produced: u64,
}

impl DummySensorNode {
    /// Samples the simulated node takes between two fetches: one per second
    /// over a five second poll interval.
    pub const SAMPLES_PER_FETCH: u64 = 5;
    /// Samples the simulated node keeps.
    pub const RETENTION: u64 = 60;
    /// Every n-th sample lacks a humidity value.
    const HUMIDITY_DROPOUT: u64 = 13;

    pub fn new() -> Self {
        Self::default()
    }

    fn sample(index: u64) -> Value {
        let t = index as f64;
        let humidity = if index % Self::HUMIDITY_DROPOUT == Self::HUMIDITY_DROPOUT - 1 {
            Value::Null
        } else {
            json!(45.0 + 5.0 * (t / 17.0).cos())
        };

        json!({
            "timestamp": format!("ms:{}", index * 1000),
            "temperature": 21.0 + 1.5 * (t / 10.0).sin(),
            "pressure": 1013.25 + 0.8 * (t / 25.0).sin(),
            "humidity": humidity,
        })
    }
}

impl SensorNode for DummySensorNode {
    fn fetch(&mut self) -> Result<String> {
        self.produced += Self::SAMPLES_PER_FETCH;
        let first = self.produced.saturating_sub(Self::RETENTION);

        let batch: Vec<Value> = (first..self.produced).map(Self::sample).collect();
        Ok(serde_json::to_string(&batch)?)
    }
}

#[test]
fn test_dummy_node_rolls_its_window() {
    let mut node = DummySensorNode::new();

    let first: Vec<Value> = serde_json::from_str(&node.fetch().unwrap()).unwrap();
    assert_eq!(first.len(), DummySensorNode::SAMPLES_PER_FETCH as usize);
    assert_eq!(first[0]["timestamp"], "ms:0");

    for _ in 0..20 {
        node.fetch().unwrap();
    }
    let later: Vec<Value> = serde_json::from_str(&node.fetch().unwrap()).unwrap();
    assert_eq!(later.len(), DummySensorNode::RETENTION as usize);
    assert_eq!(later.last().unwrap()["timestamp"], "ms:109000");
    assert!(later.iter().any(|sample| sample["humidity"].is_null()));
}
