//! Playback and rendering errors with structured context.
//!
//! Every variant maps to a semantic code and category so the CLI can pick a
//! sysexits-style exit code and print an actionable suggestion.

use std::io;

use serde_json::{Value, json};
use thiserror::Error;
use ttysvg_common::error_codes::{self, ErrorCategory};

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error(
        "premature end of script: timing record {record} needs {expected} bytes but only {available} remain"
    )]
    TruncatedInput {
        record: usize,
        expected: usize,
        available: usize,
    },

    #[error("could not parse timing file at line {line}: unexpected token `{token}`")]
    ScheduleParse { line: usize, token: String },

    #[error("I/O error during playback: {0}")]
    Io(#[from] io::Error),
}

impl PlaybackError {
    pub fn code(&self) -> i32 {
        match self {
            PlaybackError::TruncatedInput { .. } => error_codes::TRUNCATED_INPUT,
            PlaybackError::ScheduleParse { .. } => error_codes::SCHEDULE_PARSE,
            PlaybackError::Io(_) => error_codes::INPUT_UNREADABLE,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        error_codes::category_for_code(self.code())
    }

    pub fn context(&self) -> Value {
        match self {
            PlaybackError::TruncatedInput {
                record,
                expected,
                available,
            } => json!({
                "record": record,
                "expected": expected,
                "available": available
            }),
            PlaybackError::ScheduleParse { line, token } => json!({
                "line": line,
                "token": token
            }),
            PlaybackError::Io(e) => json!({
                "kind": format!("{:?}", e.kind()),
                "reason": e.to_string()
            }),
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            PlaybackError::TruncatedInput { .. } => {
                "The timing file asks for more bytes than the script holds. Check that both files come from the same recording."
                    .to_string()
            }
            PlaybackError::ScheduleParse { .. } => {
                "The timing file must contain whitespace-separated `delay byte-count` pairs as written by `script -t`."
                    .to_string()
            }
            PlaybackError::Io(_) => "Check that the input files are readable.".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unit {unit} still has an open interval; the timeline was not finalized")]
    OpenInterval { unit: usize },

    #[error("the recording was never finalized")]
    NotFinalized,

    #[error("failed to write document: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    pub fn code(&self) -> i32 {
        match self {
            RenderError::OpenInterval { .. } | RenderError::NotFinalized => {
                error_codes::RENDER_ERROR
            }
            RenderError::Io(_) => error_codes::OUTPUT_ERROR,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        error_codes::category_for_code(self.code())
    }

    pub fn suggestion(&self) -> String {
        match self {
            RenderError::OpenInterval { .. } | RenderError::NotFinalized => {
                "This is a bug: playback must finish before rendering.".to_string()
            }
            RenderError::Io(_) => {
                "Check that the output location is writable and has free space.".to_string()
            }
        }
    }
}
