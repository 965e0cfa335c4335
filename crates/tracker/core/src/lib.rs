//! Spatial awareness and navigation logic for tile-based worlds.
//!
//! `tracker-core` turns what the host reports about the tiles around the
//! player into a browsable [`Catalog`] of points of interest, keeps a
//! [`FocusState`] cursor over it, and picks approach tiles for guiding the
//! player to the focused point. Everything here is pure and synchronous; the
//! host world is reached only through the traits in [`oracle`], and
//! narration, movement and timing live in `tracker-runtime`.
pub mod approach;
pub mod catalog;
pub mod config;
pub mod directions;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod oracle;
pub mod poi;
pub mod special;

pub use approach::{ApproachResult, ApproachTileResolver, Tier};
pub use catalog::{
    Catalog, Category, ENTRANCES_CATEGORY, SPECIAL_CATEGORY, SortMode, SpatialCatalog,
};
pub use config::TrackerConfig;
pub use directions::{TURN_SEPARATOR, collapse, describe_path, narrate, step_bearings};
pub use error::{NavError, NavErrorKind};
pub use focus::{Cycle, FocusState, Step};
pub use geometry::{Bearing, Position};
pub use oracle::{
    EntranceOracle, LocationSearch, PathOracle, ScannedTile, TrackerEnv, WorldOracle,
};
pub use poi::{PoiKind, PointOfInterest};
pub use special::{SpecialGate, SpecialPoint, SpecialPointTable};
