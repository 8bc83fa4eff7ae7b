use std::collections::BTreeSet;

use serde::Serialize;

use crate::screen::Screen;

/// A glyph visible at some instant: `(row, col, char)`.
pub type Glyph = (usize, usize, char);

/// Consumes screen samples and turns them into per-unit timelines.
pub trait Recorder {
    fn sample(&mut self, screen: &Screen, now: f64);

    /// Closes every still-open interval at `now`.
    fn finalize(&mut self, now: f64);

    fn stats(&self) -> TimelineStats;

    /// Every non-space glyph visible at `t` according to the recorded
    /// timelines.
    fn visible_glyphs_at(&self, t: f64) -> BTreeSet<Glyph>;
}

impl<T: Recorder + ?Sized> Recorder for &mut T {
    fn sample(&mut self, screen: &Screen, now: f64) {
        (**self).sample(screen, now);
    }

    fn finalize(&mut self, now: f64) {
        (**self).finalize(now);
    }

    fn stats(&self) -> TimelineStats {
        (**self).stats()
    }

    fn visible_glyphs_at(&self, t: f64) -> BTreeSet<Glyph> {
        (**self).visible_glyphs_at(t)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimelineStats {
    pub samples: usize,
    pub text_intervals: usize,
    pub background_intervals: usize,
    pub final_time: Option<f64>,
}

impl TimelineStats {
    pub fn total_intervals(&self) -> usize {
        self.text_intervals + self.background_intervals
    }
}
