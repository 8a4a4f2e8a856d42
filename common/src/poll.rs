// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use crate::error::Result;
use crate::node::SensorNodePointer;
use crate::reading::{parse_batch, Reading};
use crate::series::Series;
use crate::session::Session;

/// Drives one sensor node: fetches its batch on every tick and keeps the
/// series and the session it belongs to.
pub struct Poller {
    node: SensorNodePointer,
    session: Session,
    series: Series,
}

impl Poller {
    pub fn new(node: SensorNodePointer) -> Self {
        Self {
            node,
            session: Session::new(),
            series: Series::default(),
        }
    }

    /// Runs one poll and returns the number of samples now in the series.
    ///
    /// A failed poll is logged and leaves both the series and the session as
    /// they were; the next tick simply tries again.
    pub fn tick(&mut self) -> Result<usize> {
        match self.poll() {
            Ok(samples) => {
                log::debug!("Received {samples} samples");
                Ok(samples)
            }
            Err(e) => {
                log::error!("{e}");
                Err(e)
            }
        }
    }

    fn poll(&mut self) -> Result<usize> {
        let body = self.node.fetch()?;
        let batch = parse_batch(&body)?;

        let session = &mut self.session;
        self.series
            .rebuild(batch.iter().map(|raw| Reading::decode(raw, session)));

        Ok(self.series.len())
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
