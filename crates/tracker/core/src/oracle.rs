//! Traits describing the host world the tracker reads from.
//!
//! The tracker never owns the world. Search results, entrances, pathing and
//! game-state predicates are all supplied by the host through these oracles,
//! bundled into a [`TrackerEnv`] for the duration of one operation.

use crate::geometry::Position;

/// One tile reported by the location search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedTile {
    pub position: Position,
    pub name: String,
    pub category: String,
}

impl ScannedTile {
    pub fn new(position: Position, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Breadth-first search of the tiles around the player.
pub trait LocationSearch {
    /// Returns annotated tiles in increasing graph distance from the player.
    ///
    /// The order is load-bearing: the first tile seen for a name is treated
    /// as the closest one.
    fn search(&self) -> Vec<ScannedTile>;
}

/// Lists the exit points of the current location.
pub trait EntranceOracle {
    fn entrances(&self) -> Vec<(String, Position)>;
}

/// Shortest-path primitive.
pub trait PathOracle {
    /// Returns the steps from `from` (exclusive) to `to` (inclusive), or
    /// `None` when no path exists. Must return promptly; implementations cap
    /// their search rather than block.
    fn find_path(&self, from: Position, to: Position) -> Option<Vec<Position>>;
}

/// Read-only view of player and game-state predicates.
pub trait WorldOracle {
    fn player_tile(&self) -> Position;

    fn location_name(&self) -> &str;

    fn has_quest(&self, quest: u32) -> bool;

    /// Arbitrary named player flags (owned tools, seen events, ...).
    fn has_flag(&self, flag: &str) -> bool;

    /// Tile the running cutscene is steering the player towards, if any.
    fn event_target_tile(&self) -> Option<Position> {
        None
    }

    /// True while the host shows a menu that owns the input.
    fn input_blocked(&self) -> bool {
        false
    }
}

/// Aggregates the oracles needed for one tracker operation.
#[derive(Clone, Copy)]
pub struct TrackerEnv<'a> {
    pub world: &'a dyn WorldOracle,
    pub search: &'a dyn LocationSearch,
    pub entrances: &'a dyn EntranceOracle,
    pub paths: &'a dyn PathOracle,
}

impl<'a> TrackerEnv<'a> {
    pub fn new(
        world: &'a dyn WorldOracle,
        search: &'a dyn LocationSearch,
        entrances: &'a dyn EntranceOracle,
        paths: &'a dyn PathOracle,
    ) -> Self {
        Self {
            world,
            search,
            entrances,
            paths,
        }
    }

    /// Builds an environment from a single host type implementing every oracle.
    pub fn from_host<H>(host: &'a H) -> Self
    where
        H: WorldOracle + LocationSearch + EntranceOracle + PathOracle,
    {
        Self::new(host, host, host, host)
    }

    pub fn player_tile(&self) -> Position {
        self.world.player_tile()
    }
}
