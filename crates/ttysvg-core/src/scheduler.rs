use std::io;
use std::io::Read;

use serde::Serialize;
use tracing::debug;
use tracing::trace;

use crate::emulator::CellUpdate;
use crate::emulator::EmulationAdapter;
use crate::error::PlaybackError;
use crate::recorder::Recorder;
use crate::schedule::TimingRecord;
use crate::screen::Screen;

/// Quiet period after which buffered output becomes its own frame.
pub const COALESCE_EPSILON: f64 = 0.01;

/// How long the final state stays visible before the loop restarts.
pub const FINAL_PAD: f64 = 1.0;

/// Upper bound on bytes handed to the emulator in one `feed` call.
pub const FEED_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackSummary {
    pub records: usize,
    pub bytes_fed: u64,
    pub samples: usize,
    pub last_sampled: f64,
    pub final_time: f64,
}

/// Drives the simulated clock, feeds the emulator and decides when to
/// sample the screen.
pub struct Scheduler<E, R> {
    adapter: E,
    recorder: R,
    screen: Screen,
    clock: f64,
    last_sampled: f64,
    pending: Option<f64>,
    samples: usize,
    records: usize,
    bytes_fed: u64,
}

impl<E: EmulationAdapter, R: Recorder> Scheduler<E, R> {
    pub fn new(mut adapter: E, recorder: R, cols: u16, rows: u16) -> Self {
        adapter.resize(cols, rows);
        Self {
            adapter,
            recorder,
            screen: Screen::new(cols as usize, rows as usize),
            clock: 0.0,
            last_sampled: 0.0,
            pending: None,
            samples: 0,
            records: 0,
            bytes_fed: 0,
        }
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// Replays `bytes` according to `schedule`, then takes a final sample and
    /// finalizes the recorder at `last_sampled + FINAL_PAD`.
    pub fn play<B, S>(&mut self, mut bytes: B, schedule: S) -> Result<PlaybackSummary, PlaybackError>
    where
        B: Read,
        S: IntoIterator<Item = Result<TimingRecord, PlaybackError>>,
    {
        let mut buf = vec![0u8; FEED_CHUNK];
        for record in schedule {
            self.step(record?, &mut bytes, &mut buf)?;
        }

        self.sample_now();
        let final_time = self.last_sampled + FINAL_PAD;
        self.recorder.finalize(final_time);
        debug!(
            records = self.records,
            samples = self.samples,
            final_time,
            "playback finished"
        );

        Ok(PlaybackSummary {
            records: self.records,
            bytes_fed: self.bytes_fed,
            samples: self.samples,
            last_sampled: self.last_sampled,
            final_time,
        })
    }

    /// Rescans the emulator and hands the screen to the recorder at the
    /// current clock.
    pub fn sample_now(&mut self) {
        debug!(clock = self.clock, "sampling screen");
        self.screen.clear();
        let screen = &mut self.screen;
        let mut discarded = 0usize;
        self.adapter.rescan(&mut |update: CellUpdate| {
            if !screen.apply(update) {
                discarded += 1;
            }
        });
        if discarded > 0 {
            trace!(discarded, "ignored cells outside the configured grid");
        }
        self.recorder.sample(&self.screen, self.clock);
        self.last_sampled = self.clock;
        self.pending = None;
        self.samples += 1;
    }

    fn step(&mut self, record: TimingRecord, bytes: &mut impl Read, buf: &mut [u8]) -> Result<(), PlaybackError> {
        self.records += 1;

        // The stream went quiet since the last sample: a frame is due.
        if self.pending.is_none() && self.clock - self.last_sampled > COALESCE_EPSILON {
            self.pending = Some(self.clock);
        }
        // Take it before the next delay carries the clock too far past it.
        if let Some(pending) = self.pending {
            if self.clock + record.delay > pending + COALESCE_EPSILON {
                self.sample_now();
            }
        }

        self.clock += record.delay;
        self.feed_exact(record, bytes, buf)
    }

    fn feed_exact(&mut self, record: TimingRecord, bytes: &mut impl Read, buf: &mut [u8]) -> Result<(), PlaybackError> {
        let mut remaining = record.byte_count;
        let mut delay = Some(record.delay);
        while remaining > 0 {
            let want = remaining.min(buf.len());
            let got = read_full(bytes, &mut buf[..want])?;
            if got < want {
                return Err(PlaybackError::TruncatedInput {
                    record: self.records,
                    expected: record.byte_count,
                    available: record.byte_count - remaining + got,
                });
            }
            let chunk = &buf[..got];
            if tracing::enabled!(tracing::Level::TRACE) {
                trace!(
                    delay = delay.take(),
                    clock = self.clock,
                    input = %escape_bytes(chunk),
                    "term input"
                );
            }
            self.adapter.feed(chunk);
            self.bytes_fed += got as u64;
            remaining -= got;
        }
        Ok(())
    }
}

fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Printable ASCII as-is, everything else as an octal escape.
fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (b' '..0x7f).contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\{b:03o}"));
        }
    }
    out
}
