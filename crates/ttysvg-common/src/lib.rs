//! Common utilities shared across ttysvg crates.
//!
//! Provides the error code table, error categories with their process exit
//! codes, and terminal color helpers for CLI diagnostics.

#![deny(clippy::all)]

mod color;
pub mod error_codes;

pub use color::Colors;
pub use color::init as color_init;
pub use color::is_disabled as color_is_disabled;
pub use error_codes::ErrorCategory;
