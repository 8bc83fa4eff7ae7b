use std::collections::BTreeSet;

use crate::recorder::Glyph;
use crate::recorder::Recorder;
use crate::recorder::TimelineStats;
use crate::screen::Cell;
use crate::screen::Screen;
use crate::timeline::Timeline;
use crate::timeline::VisualState;

impl VisualState for Cell {
    fn is_blank(&self) -> bool {
        *self == Cell::BLANK
    }
}

/// Cell-granularity recorder: one timeline per grid cell.
///
/// Produces many more intervals than [`crate::RowReducer`] but renders every
/// glyph independently.
#[derive(Debug, Clone)]
pub struct CellRecorder {
    cols: usize,
    rows: usize,
    cells: Vec<Timeline<Cell>>,
    samples: usize,
    final_time: Option<f64>,
}

impl CellRecorder {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Timeline::new(); cols * rows],
            samples: 0,
            final_time: None,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn final_time(&self) -> Option<f64> {
        self.final_time
    }

    pub fn timeline(&self, row: usize, col: usize) -> Option<&Timeline<Cell>> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Every timeline with its `(row, col)` position, row-major.
    pub fn timelines(&self) -> impl Iterator<Item = ((usize, usize), &Timeline<Cell>)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, timeline)| ((idx / cols, idx % cols), timeline))
    }
}

impl Recorder for CellRecorder {
    fn sample(&mut self, screen: &Screen, now: f64) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = screen.cell(row, col).copied().unwrap_or_default();
                self.cells[row * self.cols + col].observe(&cell, now);
            }
        }
        self.samples += 1;
    }

    fn finalize(&mut self, now: f64) {
        for timeline in &mut self.cells {
            timeline.finalize(now);
        }
        self.final_time = Some(now);
    }

    fn stats(&self) -> TimelineStats {
        let mut stats = TimelineStats {
            samples: self.samples,
            final_time: self.final_time,
            ..TimelineStats::default()
        };
        for timeline in &self.cells {
            for interval in timeline.intervals() {
                if interval.value.has_glyph() {
                    stats.text_intervals += 1;
                }
                if !interval.value.bg.is_default_background() {
                    stats.background_intervals += 1;
                }
            }
        }
        stats
    }

    fn visible_glyphs_at(&self, t: f64) -> BTreeSet<Glyph> {
        self.timelines()
            .filter_map(|((row, col), timeline)| {
                timeline
                    .value_at(t)
                    .filter(|cell| cell.has_glyph())
                    .map(|cell| (row, col, cell.ch))
            })
            .collect()
    }
}
