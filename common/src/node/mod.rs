// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

mod dummynode;
mod httpnode;

pub use dummynode::DummySensorNode;
pub use httpnode::HttpSensorNode;

use crate::config::ViewerConfig;
use crate::error::Result;

/// A sensor node that can be asked for its latest batch of readings.
pub trait SensorNode {
    /// Fetches the body of a successful response: a JSON array of readings.
    fn fetch(&mut self) -> Result<String>;
}

pub type SensorNodePointer = Box<dyn SensorNode>;

/// Picks the node the viewer talks to: the device, or the dummy when the
/// binary was built in demo mode.
pub fn from_config(config: &ViewerConfig) -> Result<SensorNodePointer> {
    if config.demo {
        log::info!("Demo mode, using the built-in dummy sensor node");
        return Ok(Box::new(DummySensorNode::new()));
    }

    log::info!("Polling {} every {:?}", config.endpoint, config.poll_interval);
    Ok(Box::new(HttpSensorNode::new(
        config.endpoint.clone(),
        config.request_timeout,
    )?))
}
