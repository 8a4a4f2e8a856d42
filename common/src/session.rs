// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

/// The origin of the displayed time axis.
///
/// Wall-clock timestamps are large absolute values, so the first one ever seen
/// becomes the zero point and every later one is expressed relative to it. The
/// anchor is set at most once for the lifetime of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Session {
    anchor: Option<f64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The wall-clock seconds value corresponding to `t = 0.0`, if any
    /// absolute timestamp has been observed yet.
    pub fn anchor(&self) -> Option<f64> {
        self.anchor
    }

    /// Returns the anchor, establishing it from `seconds` if it is still unset.
    pub fn anchor_or_init(&mut self, seconds: f64) -> f64 {
        *self.anchor.get_or_insert_with(|| {
            log::info!("Time axis anchored at wall-clock {seconds}s");
            seconds
        })
    }

    /// Expresses an absolute wall-clock value on the session's time axis.
    pub fn rebase(&mut self, seconds: f64) -> f64 {
        seconds - self.anchor_or_init(seconds)
    }
}

#[test]
fn test_anchor_is_set_once() {
    let mut session = Session::new();
    assert_eq!(session.anchor(), None);

    assert_eq!(session.rebase(1_000.0), 0.0);
    assert_eq!(session.rebase(1_007.5), 7.5);
    assert_eq!(session.rebase(990.0), -10.0);

    assert_eq!(session.anchor(), Some(1_000.0));
}
