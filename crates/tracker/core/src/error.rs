//! Error taxonomy for tracker operations.
//!
//! None of these are fatal. Each one is narrated to the user and the tracker
//! stays usable with whatever focus and catalog it had. Reaching the end of a
//! list is not an error at all; it is reported through `Step::boundary`.

use thiserror::Error;

use crate::geometry::Position;

/// Broad class of a [`NavError`], used to pick how it is surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NavErrorKind {
    /// Nothing to focus, or the focused item vanished. Recovered by falling
    /// back to the first valid focus.
    NotFound,
    /// The point carries a known reason it cannot be reached. Not retried.
    Unreachable,
    /// No approach tile or no step path. The next read resolves from scratch.
    NoPath,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Nothing Found.")]
    NothingFound,

    #[error("No Categories Found")]
    NoCategories,

    #[error("Can't find {name}")]
    Vanished { name: String },

    #[error("{reason}")]
    Unreachable { name: String, reason: String },

    #[error("Could not find path to {name} at {tile}.")]
    NoPath { name: String, tile: Position },
}

impl NavError {
    pub const fn kind(&self) -> NavErrorKind {
        match self {
            Self::NothingFound | Self::NoCategories | Self::Vanished { .. } => {
                NavErrorKind::NotFound
            }
            Self::Unreachable { .. } => NavErrorKind::Unreachable,
            Self::NoPath { .. } => NavErrorKind::NoPath,
        }
    }

    /// Static identifier for logs and tests.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NothingFound => "nothing_found",
            Self::NoCategories => "no_categories",
            Self::Vanished { .. } => "vanished",
            Self::Unreachable { .. } => "unreachable",
            Self::NoPath { .. } => "no_path",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_narration() {
        let err = NavError::NoPath {
            name: "Willy's Barrel".into(),
            tile: Position::new(37, 33),
        };
        assert_eq!(err.to_string(), "Could not find path to Willy's Barrel at 37-33.");
        assert_eq!(err.kind(), NavErrorKind::NoPath);

        let err = NavError::Unreachable {
            name: "Lock Box".into(),
            reason: "The tunnel is caved in".into(),
        };
        assert_eq!(err.to_string(), "The tunnel is caved in");
        assert_eq!(err.kind(), NavErrorKind::Unreachable);
        assert_eq!(NavError::NoCategories.kind(), NavErrorKind::NotFound);
    }
}
