//! Core of the sensor viewer: turns the JSON batches a sensor node serves into
//! a plottable series and the chart frames drawn from it.
//!
//! Nothing in here depends on the UI toolkit.

pub mod chart;
pub mod config;
pub mod error;
pub mod node;
pub mod poll;
pub mod reading;
pub mod series;
pub mod session;
pub mod timestamp;

pub use chart::{PaneFrame, Renderer, Sensor};
pub use config::ViewerConfig;
pub use error::FetchError;
pub use poll::Poller;
pub use series::Series;
pub use session::Session;
