//! Errors surfaced while setting up the tracker runtime.
//!
//! Navigation failures are not errors at this level: they are narrated and
//! reported as [`tracker_core::NavError`]. Only loading configuration and
//! content can fail.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read {path}")]
    ContentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse special points from {origin}")]
    SpecialPointsParse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
