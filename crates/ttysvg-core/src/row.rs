//! Row-level reduction of screen samples.
//!
//! Each row is tracked as two independent units: its text layer (glyphs plus
//! attribute runs) and its background layer (run-length encoded colors).
//! A keystroke that rewrites many cells of one row then yields a single
//! transition for that row instead of one per cell.

use std::collections::BTreeSet;

use crate::recorder::Glyph;
use crate::recorder::Recorder;
use crate::recorder::TimelineStats;
use crate::screen::Cell;
use crate::screen::Screen;
use crate::style::ColorRef;
use crate::style::TextStyle;
use crate::timeline::Timeline;
use crate::timeline::VisualState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub style: TextStyle,
    pub text: String,
}

/// The full text content of one row, split into attribute runs.
///
/// Spaces never start a new run; they are carried by whichever run is
/// current, which is how the row is rendered as markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    spans: Vec<StyledSpan>,
}

impl TextRun {
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut spans: Vec<StyledSpan> = Vec::new();
        let mut current = TextStyle::PLAIN;

        for cell in cells {
            if cell.has_glyph() && cell.style() != current {
                current = cell.style();
                spans.push(StyledSpan {
                    style: current,
                    text: String::new(),
                });
            }
            match spans.last_mut() {
                Some(span) => span.text.push(cell.ch),
                None => spans.push(StyledSpan {
                    style: current,
                    text: cell.ch.to_string(),
                }),
            }
        }

        Self { spans }
    }

    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Non-space glyphs with their column.
    pub fn glyphs(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.spans
            .iter()
            .flat_map(|span| span.text.chars())
            .enumerate()
            .filter(|(_, ch)| *ch != ' ')
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// A contiguous run of one background color, `start_col..end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BgRun {
    pub start_col: usize,
    pub end_col: usize,
    pub color: ColorRef,
}

impl BgRun {
    pub fn width(&self) -> usize {
        self.end_col - self.start_col
    }
}

/// The background layer of one row; default-background columns are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundRuns {
    runs: Vec<BgRun>,
}

impl BackgroundRuns {
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut runs = Vec::new();
        let mut current = ColorRef::DefaultBackground;
        let mut start = 0;

        let mut flush = |end: usize, color: ColorRef, start: usize| {
            if !color.is_default_background() && end > start {
                runs.push(BgRun {
                    start_col: start,
                    end_col: end,
                    color,
                });
            }
        };

        for (col, cell) in cells.iter().enumerate() {
            if cell.bg != current {
                flush(col, current, start);
                current = cell.bg;
                start = col;
            }
        }
        flush(cells.len(), current, start);

        Self { runs }
    }

    pub fn runs(&self) -> &[BgRun] {
        &self.runs
    }
}

/// The two payload kinds a row unit can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Text(TextRun),
    Background(BackgroundRuns),
}

impl VisualState for RowState {
    fn is_blank(&self) -> bool {
        match self {
            RowState::Text(run) => run.glyphs().next().is_none(),
            RowState::Background(bg) => bg.runs.is_empty(),
        }
    }
}

/// Row-granularity recorder: one text and one background timeline per row.
#[derive(Debug, Clone)]
pub struct RowReducer {
    cols: usize,
    text: Vec<Timeline<RowState>>,
    background: Vec<Timeline<RowState>>,
    samples: usize,
    final_time: Option<f64>,
}

impl RowReducer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            text: vec![Timeline::new(); rows],
            background: vec![Timeline::new(); rows],
            samples: 0,
            final_time: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.text.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn text_timelines(&self) -> &[Timeline<RowState>] {
        &self.text
    }

    pub fn background_timelines(&self) -> &[Timeline<RowState>] {
        &self.background
    }

    pub fn final_time(&self) -> Option<f64> {
        self.final_time
    }
}

impl Recorder for RowReducer {
    fn sample(&mut self, screen: &Screen, now: f64) {
        for (row, (text, background)) in self
            .text
            .iter_mut()
            .zip(self.background.iter_mut())
            .enumerate()
        {
            let cells = screen.row(row);
            text.observe(&RowState::Text(TextRun::from_cells(cells)), now);
            background.observe(&RowState::Background(BackgroundRuns::from_cells(cells)), now);
        }
        self.samples += 1;
    }

    fn finalize(&mut self, now: f64) {
        for timeline in self.text.iter_mut().chain(self.background.iter_mut()) {
            timeline.finalize(now);
        }
        self.final_time = Some(now);
    }

    fn stats(&self) -> TimelineStats {
        TimelineStats {
            samples: self.samples,
            text_intervals: self.text.iter().map(Timeline::len).sum(),
            background_intervals: self.background.iter().map(Timeline::len).sum(),
            final_time: self.final_time,
        }
    }

    fn visible_glyphs_at(&self, t: f64) -> BTreeSet<Glyph> {
        let mut glyphs = BTreeSet::new();
        for (row, timeline) in self.text.iter().enumerate() {
            if let Some(RowState::Text(run)) = timeline.value_at(t) {
                glyphs.extend(run.glyphs().map(|(col, ch)| (row, col, ch)));
            }
        }
        glyphs
    }
}
