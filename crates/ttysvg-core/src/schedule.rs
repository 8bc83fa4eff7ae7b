//! Timing schedule and byte source readers.
//!
//! The timing file is a whitespace-separated list of `delay byte-count`
//! pairs. Recordings pair each byte count with the delay written on the
//! *following* line, so the very first delay is discarded and a missing
//! trailing delay counts as zero. This shift is required to replay existing
//! recordings faithfully.

use std::collections::VecDeque;
use std::io;
use std::io::BufRead;

use crate::error::PlaybackError;

/// Deliver `byte_count` bytes after advancing the clock by `delay` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRecord {
    pub byte_count: usize,
    pub delay: f64,
}

impl TimingRecord {
    pub fn new(byte_count: usize, delay: f64) -> Self {
        Self { byte_count, delay }
    }
}

/// Iterator over the records of a timing file.
///
/// Yields at most one error, after which it is exhausted.
pub struct TimingReader<R> {
    reader: R,
    tokens: VecDeque<(usize, String)>,
    line: usize,
    primed: bool,
    done: bool,
}

impl<R: BufRead> TimingReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            tokens: VecDeque::new(),
            line: 0,
            primed: false,
            done: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<(usize, String)>, PlaybackError> {
        while self.tokens.is_empty() {
            let mut buf = Vec::new();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let line = self.line;
            // Undecodable bytes survive as U+FFFD and then fail to parse.
            self.tokens.extend(
                buf.split(u8::is_ascii_whitespace)
                    .filter(|t| !t.is_empty())
                    .map(|t| (line, String::from_utf8_lossy(t).into_owned())),
            );
        }
        Ok(self.tokens.pop_front())
    }

    fn read_record(&mut self) -> Result<Option<TimingRecord>, PlaybackError> {
        if !self.primed {
            self.primed = true;
            match self.next_token()? {
                Some((line, token)) => {
                    parse_delay(line, &token)?;
                }
                None => return Ok(None),
            }
        }

        let Some((line, token)) = self.next_token()? else {
            return Ok(None);
        };
        let byte_count = token
            .parse::<usize>()
            .map_err(|_| PlaybackError::ScheduleParse { line, token })?;

        let delay = match self.next_token()? {
            Some((line, token)) => parse_delay(line, &token)?,
            None => 0.0,
        };

        Ok(Some(TimingRecord { byte_count, delay }))
    }
}

impl<R: BufRead> Iterator for TimingReader<R> {
    type Item = Result<TimingRecord, PlaybackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn parse_delay(line: usize, token: &str) -> Result<f64, PlaybackError> {
    match token.parse::<f64>() {
        Ok(delay) if delay.is_finite() && delay >= 0.0 => Ok(delay),
        _ => Err(PlaybackError::ScheduleParse {
            line,
            token: token.to_string(),
        }),
    }
}

/// Discards the header line of a byte source. Returns the number of bytes
/// skipped.
pub fn skip_header<R: BufRead>(reader: &mut R) -> io::Result<usize> {
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header)
}
