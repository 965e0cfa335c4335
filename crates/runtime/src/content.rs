//! Loader for the special-points table.
//!
//! The default table ships inside the binary (`data/special_points.ron`).
//! Hosts can point [`RuntimeConfig::special_points_path`] at their own file
//! to replace it wholesale.
//!
//! [`RuntimeConfig::special_points_path`]: crate::RuntimeConfig::special_points_path
use std::path::Path;

use tracker_core::SpecialPointTable;

use crate::error::{Result, RuntimeError};

const DEFAULT_SPECIAL_POINTS: &str = include_str!("../data/special_points.ron");

/// Parses the embedded special-points table.
pub fn default_special_points() -> Result<SpecialPointTable> {
    parse_special_points(DEFAULT_SPECIAL_POINTS, "embedded special_points.ron")
}

/// Loads a special-points table from a RON file.
pub fn load_special_points(path: &Path) -> Result<SpecialPointTable> {
    let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ContentRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_special_points(&content, &path.display().to_string())
}

fn parse_special_points(content: &str, origin: &str) -> Result<SpecialPointTable> {
    let table: SpecialPointTable =
        ron::from_str(content).map_err(|source| RuntimeError::SpecialPointsParse {
            origin: origin.to_owned(),
            source,
        })?;
    tracing::debug!(points = table.len(), origin, "loaded special points");
    Ok(table)
}
