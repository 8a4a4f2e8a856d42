// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

//! Everything the UI needs to draw the three stacked charts, computed from a
//! [`Series`] without touching the UI toolkit.
//!
//! Positions are fractions of the plot area (`0.0` left/bottom, `1.0`
//! right/top). The line is an SVG path in a [`VIEWBOX`]-sized square with the
//! y-axis pointing down, ready for a stretched `Path` element.

use crate::config::ViewerConfig;
use crate::series::Series;

/// Side length of the coordinate square the line commands are expressed in.
pub const VIEWBOX: f64 = 1000.0;

/// Label under the bottom pane. The time axis is in seconds.
pub const X_LABEL: &str = "Millis/1000";

/// Rotation of the tick labels on the x-axis, in degrees.
pub const TICK_LABEL_ROTATION: f32 = 45.0;

const TARGET_TICKS: usize = 6;
const Y_MARGIN: f64 = 0.05;
const DEFAULT_RANGE: Range = Range { min: 0.0, max: 1.0 };

/// One of the three measured quantities, in display order top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sensor {
    Temperature,
    Pressure,
    Humidity,
}

impl Sensor {
    pub const ALL: [Sensor; 3] = [Sensor::Temperature, Sensor::Pressure, Sensor::Humidity];

    /// Used for the y-axis and the legend alike.
    pub fn label(self) -> &'static str {
        match self {
            Sensor::Temperature => "Temperature (°C)",
            Sensor::Pressure => "Pressure (hPa)",
            Sensor::Humidity => "Humidity (%)",
        }
    }

    /// Line color as RGB.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Sensor::Temperature => (255, 0, 0),
            Sensor::Pressure => (0, 0, 255),
            Sensor::Humidity => (0, 128, 0),
        }
    }

    pub fn values(self, series: &Series) -> &[f64] {
        match self {
            Sensor::Temperature => &series.temperature,
            Sensor::Pressure => &series.pressure,
            Sensor::Humidity => &series.humidity,
        }
    }
}

/// Visible interval of an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Where `value` falls between `min` (0.0) and `max` (1.0).
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Range over the finite values, padded by a margin on both ends.
    fn autoscale(values: &[f64]) -> Self {
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if min > max {
            return DEFAULT_RANGE;
        }

        let pad = if max > min {
            (max - min) * Y_MARGIN
        } else if min != 0.0 {
            min.abs() * Y_MARGIN
        } else {
            0.5
        };

        Range {
            min: min - pad,
            max: max + pad,
        }
    }
}

/// An axis tick with its gridline.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// A point marker, as fractions of the plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
}

/// A fully computed chart pane.
#[derive(Clone, Debug, PartialEq)]
pub struct PaneFrame {
    pub sensor: Sensor,
    pub x_range: Range,
    pub y_range: Range,
    /// SVG path commands; every run of present samples starts with a `M`.
    pub line: String,
    pub markers: Vec<Marker>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Only the bottom pane carries the x-axis label.
    pub x_label: Option<&'static str>,
}

/// Turns the current series into chart frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderer {
    window_seconds: f64,
    right_padding: f64,
}

impl Renderer {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            window_seconds: config.window_seconds,
            right_padding: config.right_padding,
        }
    }

    /// The trailing window ending just after the newest sample.
    pub fn x_window(&self, series: &Series) -> Range {
        match series.last_time() {
            Some(last) => Range {
                min: (last - self.window_seconds).max(0.0),
                max: last + self.right_padding,
            },
            None => DEFAULT_RANGE,
        }
    }

    /// Computes all three panes, top to bottom.
    pub fn render(&self, series: &Series) -> Vec<PaneFrame> {
        let x_range = self.x_window(series);
        let x_ticks = ticks(x_range);

        Sensor::ALL
            .iter()
            .map(|&sensor| {
                let values = sensor.values(series);
                let y_range = Range::autoscale(values);
                let (line, markers) = trace(&series.time, values, x_range, y_range);

                PaneFrame {
                    sensor,
                    x_range,
                    y_range,
                    line,
                    markers,
                    x_ticks: x_ticks.clone(),
                    y_ticks: ticks(y_range),
                    x_label: (sensor == Sensor::Humidity).then_some(X_LABEL),
                }
            })
            .collect()
    }
}

/// Builds the path and the visible markers for one sensor sequence.
fn trace(time: &[f64], values: &[f64], x_range: Range, y_range: Range) -> (String, Vec<Marker>) {
    let mut line = String::new();
    let mut pen_down = false;
    let mut markers = Vec::new();

    for (&t, &v) in time.iter().zip(values) {
        if !v.is_finite() {
            pen_down = false;
            continue;
        }

        let marker = Marker {
            x: x_range.fraction(t),
            y: y_range.fraction(v),
        };
        // a degenerate window (all samples at t <= -1) has no usable scale
        if !(marker.x.is_finite() && marker.y.is_finite()) {
            pen_down = false;
            continue;
        }

        let command = if pen_down { 'L' } else { 'M' };
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&format!(
            "{command} {:.2} {:.2}",
            marker.x * VIEWBOX,
            (1.0 - marker.y) * VIEWBOX
        ));
        pen_down = true;

        if (0.0..=1.0).contains(&marker.x) {
            markers.push(marker);
        }
    }

    (line, markers)
}

/// Evenly spaced ticks on a 1-2-5 step covering the range.
fn ticks(range: Range) -> Vec<Tick> {
    let (lo, hi) = if range.min <= range.max {
        (range.min, range.max)
    } else {
        (range.max, range.min)
    };
    let span = hi - lo;
    if !(span > 0.0 && span.is_finite()) {
        return Vec::new();
    }

    let step = nice_step(span / TARGET_TICKS as f64);
    let decimals = (-step.log10().floor()).clamp(0.0, 10.0) as usize;
    let first = (lo / step).ceil();

    (0..)
        .map(|i| (first + i as f64) * step)
        .take_while(|&value| value <= hi + step * 1e-9)
        .map(|value| {
            // avoid labelling the origin "-0.0"
            let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
            Tick {
                position: range.fraction(value),
                label: format!("{value:.decimals$}"),
            }
        })
        .collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

#[cfg(test)]
fn series_of(time: &[f64], temperature: &[f64]) -> Series {
    Series {
        time: time.to_vec(),
        temperature: temperature.to_vec(),
        pressure: vec![1000.0; time.len()],
        humidity: vec![f64::NAN; time.len()],
    }
}

#[test]
fn test_x_window_follows_last_sample() {
    let renderer = Renderer::new(&ViewerConfig::default());

    let short = series_of(&[1.0, 3.5], &[20.0, 20.5]);
    assert_eq!(renderer.x_window(&short), Range { min: 0.0, max: 4.5 });

    let long = series_of(&[10.0, 30.0, 42.0], &[1.0, 2.0, 3.0]);
    assert_eq!(renderer.x_window(&long), Range { min: 22.0, max: 43.0 });

    assert_eq!(renderer.x_window(&Series::default()), DEFAULT_RANGE);
}

#[test]
fn test_render_pane_layout() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let frames = renderer.render(&series_of(&[1.0, 3.5], &[20.0, 20.5]));

    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames.iter().map(|f| f.sensor).collect::<Vec<_>>(),
        Sensor::ALL.to_vec()
    );
    assert_eq!(frames[0].x_label, None);
    assert_eq!(frames[1].x_label, None);
    assert_eq!(frames[2].x_label, Some(X_LABEL));
    assert!(frames.iter().all(|f| f.x_range == Range { min: 0.0, max: 4.5 }));
    assert_eq!(Sensor::Pressure.color(), (0, 0, 255));
}

#[test]
fn test_missing_values_break_the_line() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let series = series_of(&[0.0, 1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, f64::NAN, 4.0, 5.0]);

    let frame = &renderer.render(&series)[0];

    assert_eq!(frame.line.matches('M').count(), 2);
    assert_eq!(frame.line.matches('L').count(), 2);
    assert_eq!(frame.markers.len(), 4);

    // an all-missing pane draws nothing and keeps a default scale
    let humidity = &renderer.render(&series)[2];
    assert!(humidity.line.is_empty());
    assert!(humidity.markers.is_empty());
    assert_eq!(humidity.y_range, DEFAULT_RANGE);
}

#[test]
fn test_y_range_is_padded() {
    let range = Range::autoscale(&[10.0, f64::NAN, 20.0]);
    assert_eq!(range, Range { min: 9.5, max: 20.5 });

    let flat = Range::autoscale(&[1000.0, 1000.0]);
    assert_eq!(flat, Range { min: 950.0, max: 1050.0 });

    let zero = Range::autoscale(&[0.0]);
    assert_eq!(zero, Range { min: -0.5, max: 0.5 });
}

#[test]
fn test_markers_outside_window_are_dropped() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let series = series_of(&[0.0, 10.0, 30.0, 40.0], &[1.0, 2.0, 3.0, 4.0]);

    let frame = &renderer.render(&series)[0];

    // the window is [20, 41]; the line still enters from the left edge
    assert_eq!(frame.markers.len(), 2);
    assert!(frame.line.starts_with("M "));
    assert_eq!(frame.line.matches('L').count(), 3);
}

#[test]
fn test_ticks() {
    let labels = |range| ticks(range).into_iter().map(|t| t.label).collect::<Vec<_>>();

    assert_eq!(labels(Range { min: 0.0, max: 4.5 }), vec!["0", "1", "2", "3", "4"]);
    assert_eq!(
        labels(Range { min: 0.0, max: 1.0 }),
        vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]
    );
    assert_eq!(labels(Range { min: 22.0, max: 43.0 }), vec!["25", "30", "35", "40"]);
    assert!(ticks(Range { min: 3.0, max: 3.0 }).is_empty());

    let positions = ticks(Range { min: 0.0, max: 4.0 });
    assert_eq!(positions.first().map(|t| t.position), Some(0.0));
    assert_eq!(positions.last().map(|t| t.position), Some(1.0));
}

#[test]
fn test_render_is_idempotent() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let series = series_of(&[1.0, 2.0, 3.0], &[20.0, f64::NAN, 21.0]);

    assert_eq!(renderer.render(&series), renderer.render(&series));
}
