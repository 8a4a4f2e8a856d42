// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Soft-AP address the sensor node serves on out of the box.
pub const DEFAULT_DEVICE_ADDRESS: &str = "192.168.4.1";

/// Path of the endpoint returning the node's retained readings.
pub const DATA_PATH: &str = "/data";

/// Viewer settings. All of them are fixed when the binary is built.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Full URL of the data endpoint.
    pub endpoint: String,
    /// Time between two polls.
    pub poll_interval: Duration,
    /// Deadline of a single request. Kept well below the poll interval.
    pub request_timeout: Duration,
    /// Width of trailing history shown on the x-axis, in seconds.
    pub window_seconds: f64,
    /// Space left after the newest sample, in seconds.
    pub right_padding: f64,
    /// Use the built-in dummy node instead of talking to a device.
    pub demo: bool,
}

impl ViewerConfig {
    pub fn endpoint_for(address: &str) -> String {
        format!("http://{address}{DATA_PATH}")
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        // Build-time overrides, e.g. `SENSOR_NODE_URL=http://10.0.0.7/data cargo build`.
        let endpoint = std::option_env!("SENSOR_NODE_URL")
            .map(String::from)
            .unwrap_or_else(|| Self::endpoint_for(DEFAULT_DEVICE_ADDRESS));

        Self {
            endpoint,
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(2),
            window_seconds: 20.0,
            right_padding: 1.0,
            demo: std::option_env!("SENSOR_VIEWER_DEMO").is_some(),
        }
    }
}

#[test]
fn test_default_config() {
    let config = ViewerConfig::default();

    assert!(config.request_timeout < config.poll_interval);
    assert_eq!(config.poll_interval, Duration::from_secs(5));
    assert_eq!(config.window_seconds, 20.0);
    assert_eq!(
        ViewerConfig::endpoint_for(DEFAULT_DEVICE_ADDRESS),
        "http://192.168.4.1/data"
    );
}
