//! Session-to-timeline compiler for ttysvg.
//!
//! Replays a recorded terminal session through an [`EmulationAdapter`],
//! samples the emulated screen with adaptive frame coalescing, reduces the
//! samples to per-row (or per-cell) visibility intervals and renders them as
//! a self-looping, declaratively animated SVG document.

#![deny(clippy::all)]

mod cell_recorder;
mod emulator;
mod error;
mod interval;
mod recorder;
pub mod render;
mod row;
pub mod schedule;
mod scheduler;
mod screen;
mod style;
mod timeline;

pub use cell_recorder::CellRecorder;
pub use emulator::CellUpdate;
pub use emulator::EmulationAdapter;
pub use error::PlaybackError;
pub use error::RenderError;
pub use interval::TimedInterval;
pub use recorder::Glyph;
pub use recorder::Recorder;
pub use recorder::TimelineStats;
pub use render::LayerSource;
pub use render::RenderOptions;
pub use render::SvgRenderer;
pub use row::BackgroundRuns;
pub use row::BgRun;
pub use row::RowReducer;
pub use row::RowState;
pub use row::StyledSpan;
pub use row::TextRun;
pub use schedule::TimingReader;
pub use schedule::TimingRecord;
pub use scheduler::COALESCE_EPSILON;
pub use scheduler::FEED_CHUNK;
pub use scheduler::FINAL_PAD;
pub use scheduler::PlaybackSummary;
pub use scheduler::Scheduler;
pub use screen::Cell;
pub use screen::Screen;
pub use style::ColorRef;
pub use style::TextStyle;
pub use timeline::Timeline;
pub use timeline::VisualState;

pub type Result<T> = std::result::Result<T, PlaybackError>;
