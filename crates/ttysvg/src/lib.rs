//! Command-line front end for ttysvg.
//!
//! Parses arguments, layers configuration, sets up logging and drives the
//! playback and rendering pipeline from `ttysvg-core`.

#![deny(clippy::all)]

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod output;
pub mod telemetry;

pub use config::Config;
pub use config::ConfigError;
pub use config::Granularity;
pub use error::ConvertError;
pub use handlers::HandlerResult;
