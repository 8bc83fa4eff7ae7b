//! Conversion errors with structured context.
//!
//! Wraps the playback, render and configuration failures with the file
//! that caused them, and maps each to a sysexits-style exit code.

use std::io;
use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;
use ttysvg_common::error_codes::{self, ErrorCategory};
use ttysvg_core::PlaybackError;
use ttysvg_core::RenderError;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("cannot read {}: {source}", path.display())]
    InputAccess { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("cannot write {}: {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
}

impl ConvertError {
    pub fn code(&self) -> i32 {
        match self {
            ConvertError::InputAccess { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                error_codes::INPUT_NOT_FOUND
            }
            ConvertError::InputAccess { .. } => error_codes::INPUT_UNREADABLE,
            ConvertError::Config(e) => e.code(),
            ConvertError::Playback(e) => e.code(),
            ConvertError::Render(e) => e.code(),
            ConvertError::Output { .. } => error_codes::OUTPUT_ERROR,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        error_codes::category_for_code(self.code())
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn context(&self) -> Value {
        match self {
            ConvertError::InputAccess { path, source } | ConvertError::Output { path, source } => {
                json!({
                    "path": path.display().to_string(),
                    "kind": format!("{:?}", source.kind()),
                    "reason": source.to_string()
                })
            }
            ConvertError::Config(e) => e.context(),
            ConvertError::Playback(e) => e.context(),
            ConvertError::Render(e) => json!({ "reason": e.to_string() }),
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            ConvertError::InputAccess { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                "Check the path. Record a session with `script -t 2>timing typescript`.".to_string()
            }
            ConvertError::InputAccess { .. } => {
                "Check that the file is readable by the current user.".to_string()
            }
            ConvertError::Config(ConfigError::Read { .. }) => {
                "Check the --config path or unset TTYSVG_CONFIG.".to_string()
            }
            ConvertError::Config(ConfigError::Parse { .. }) => {
                "Fix the TOML syntax; unknown keys are rejected.".to_string()
            }
            ConvertError::Config(ConfigError::Invalid(e)) => {
                format!("Correct `{}` in the config file or on the command line.", e.field)
            }
            ConvertError::Playback(e) => e.suggestion(),
            ConvertError::Render(e) => e.suggestion(),
            ConvertError::Output { .. } => {
                "Check that the output directory exists and is writable.".to_string()
            }
        }
    }

    /// The machine-readable form printed with `--format json`.
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "category": self.category().as_str(),
                "message": self.to_string(),
                "context": self.context(),
                "suggestion": self.suggestion()
            }
        })
    }
}
