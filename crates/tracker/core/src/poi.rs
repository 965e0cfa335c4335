//! Points of interest produced by a scan.

use crate::geometry::Position;

/// Where a point of interest came from, with the fields only that source carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoiKind {
    /// Reported by the location search.
    Scanned,
    /// Exit point listed by the entrance oracle.
    Entrance,
    /// Hand-authored fixture from the special-points table.
    Special {
        approach_override: Option<Position>,
        unreachable_reason: Option<String>,
    },
}

/// A named, focusable world object with a tile location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointOfInterest {
    pub name: String,
    pub tile: Position,
    pub kind: PoiKind,
}

impl PointOfInterest {
    pub fn new(name: impl Into<String>, tile: Position, kind: PoiKind) -> Self {
        Self {
            name: name.into(),
            tile,
            kind,
        }
    }

    pub fn scanned(name: impl Into<String>, tile: Position) -> Self {
        Self::new(name, tile, PoiKind::Scanned)
    }

    pub fn entrance(name: impl Into<String>, tile: Position) -> Self {
        Self::new(name, tile, PoiKind::Entrance)
    }

    /// Tile to stand on instead of resolving an approach tile, if any.
    pub fn approach_override(&self) -> Option<Position> {
        match &self.kind {
            PoiKind::Special {
                approach_override, ..
            } => *approach_override,
            _ => None,
        }
    }

    /// Reason the player cannot be guided to this point, if one is known.
    pub fn unreachable_reason(&self) -> Option<&str> {
        match &self.kind {
            PoiKind::Special {
                unreachable_reason, ..
            } => unreachable_reason.as_deref(),
            _ => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.unreachable_reason().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_special_points_carry_overrides() {
        let chest = PointOfInterest::scanned("Chest", Position::new(5, 5));
        assert_eq!(chest.approach_override(), None);
        assert!(chest.is_reachable());

        let bush = PointOfInterest::new(
            "Hiding Bush",
            Position::new(28, 13),
            PoiKind::Special {
                approach_override: Some(Position::new(28, 14)),
                unreachable_reason: Some("Blocked by a fence".into()),
            },
        );
        assert_eq!(bush.approach_override(), Some(Position::new(28, 14)));
        assert_eq!(bush.unreachable_reason(), Some("Blocked by a fence"));
        assert!(!bush.is_reachable());
    }
}
