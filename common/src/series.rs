// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use crate::reading::Reading;

/// The plottable form of the latest batch: four parallel sequences of equal length.
#[derive(Clone, Debug, Default)]
pub struct Series {
    pub time: Vec<f64>,
    pub temperature: Vec<f64>,
    pub pressure: Vec<f64>,
    pub humidity: Vec<f64>,
}

impl Series {
    /// Replaces the whole series with `readings`, in their original order.
    ///
    /// The device reports its own retained window, so nothing from the previous
    /// batch is kept.
    pub fn rebuild<I>(&mut self, readings: I)
    where
        I: IntoIterator<Item = Reading>,
    {
        self.time.clear();
        self.temperature.clear();
        self.pressure.clear();
        self.humidity.clear();

        for reading in readings {
            self.time.push(reading.t);
            self.temperature.push(reading.temperature);
            self.pressure.push(reading.pressure);
            self.humidity.push(reading.humidity);
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time of the most recent sample, which drives the scrolling window.
    pub fn last_time(&self) -> Option<f64> {
        self.time.last().copied()
    }

    /// Compares bit patterns, so two missing samples are considered equal.
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        fn same(a: &[f64], b: &[f64]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
        }

        same(&self.time, &other.time)
            && same(&self.temperature, &other.temperature)
            && same(&self.pressure, &other.pressure)
            && same(&self.humidity, &other.humidity)
    }
}

#[test]
fn test_rebuild_replaces_previous_batch() {
    let sample = |t: f64, v: f64| Reading {
        t,
        temperature: v,
        pressure: v * 10.0,
        humidity: crate::reading::MISSING,
    };

    let mut series = Series::default();
    series.rebuild([sample(1.0, 1.0), sample(2.0, 2.0), sample(3.0, 3.0)]);
    assert_eq!(series.len(), 3);

    series.rebuild([sample(9.0, 4.0), sample(5.0, 5.0)]);

    assert_eq!(series.time, vec![9.0, 5.0]);
    assert_eq!(series.temperature, vec![4.0, 5.0]);
    assert_eq!(series.pressure, vec![40.0, 50.0]);
    assert_eq!(series.humidity.len(), 2);
    assert!(series.humidity.iter().all(|h| h.is_nan()));
    assert_eq!(series.last_time(), Some(5.0));

    series.rebuild(std::iter::empty());
    assert!(series.is_empty());
    assert_eq!(series.last_time(), None);
}
