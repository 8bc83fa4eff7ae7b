//! Conversion settings.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line flags, each layer overriding the previous one.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;
use ttysvg_common::error_codes;
use ttysvg_core::render::Advertisement;
use ttysvg_core::render::InvalidOption;
use ttysvg_core::render::RenderOptions;

pub const DEFAULT_COLUMNS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 24;

/// The visual unit each animated element stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One element per row state (compact)
    #[default]
    Row,
    /// One element per cell state
    Cell,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] InvalidOption),
}

impl ConfigError {
    pub fn code(&self) -> i32 {
        match self {
            ConfigError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                error_codes::INPUT_NOT_FOUND
            }
            _ => error_codes::INVALID_CONFIG,
        }
    }

    pub fn context(&self) -> Value {
        match self {
            ConfigError::Read { path, source } => json!({
                "path": path.display().to_string(),
                "reason": source.to_string()
            }),
            ConfigError::Parse { path, source } => json!({
                "path": path.display().to_string(),
                "reason": source.message()
            }),
            ConfigError::Invalid(e) => json!({
                "field": e.field,
                "reason": e.reason
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub columns: u16,
    pub rows: u16,
    pub granularity: Granularity,
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            granularity: Granularity::default(),
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Defaults, or the file at `path` if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: u16) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.render.font.family = family.into();
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.render.font.size = size;
        self
    }

    pub fn with_advertisement(mut self, advertisement: Advertisement) -> Self {
        self.render.advertisement = Some(advertisement);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(zero_size("columns").into());
        }
        if self.rows == 0 {
            return Err(zero_size("rows").into());
        }
        self.render.validate()?;
        Ok(())
    }
}

fn zero_size(field: &'static str) -> InvalidOption {
    InvalidOption {
        field,
        reason: "must be at least 1".to_string(),
    }
}
