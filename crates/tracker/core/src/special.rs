//! Hand-authored fixtures the location search cannot see on its own.
//!
//! Each entry is tied to a location by name and may be gated on a game-state
//! predicate (an active quest, a running cutscene). The table is data: hosts
//! usually load it from a RON file with the `serde` feature enabled.

use crate::geometry::Position;
use crate::oracle::WorldOracle;
use crate::poi::{PoiKind, PointOfInterest};

/// Condition under which a special point is listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialGate {
    #[default]
    Always,
    /// Listed while the quest is active and the flag has not been earned yet.
    QuestWithoutFlag { quest: u32, flag: String },
    /// Listed while a cutscene steers the player towards this tile.
    EventTargetTile(Position),
}

impl SpecialGate {
    pub fn holds(&self, world: &dyn WorldOracle) -> bool {
        match self {
            SpecialGate::Always => true,
            SpecialGate::QuestWithoutFlag { quest, flag } => {
                world.has_quest(*quest) && !world.has_flag(flag)
            }
            SpecialGate::EventTargetTile(tile) => world.event_target_tile() == Some(*tile),
        }
    }
}

/// One row of the special-points table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialPoint {
    pub location: String,
    pub name: String,
    pub tile: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gate: SpecialGate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub approach_override: Option<Position>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unreachable_reason: Option<String>,
}

impl SpecialPoint {
    pub fn new(location: impl Into<String>, name: impl Into<String>, tile: Position) -> Self {
        Self {
            location: location.into(),
            name: name.into(),
            tile,
            gate: SpecialGate::Always,
            approach_override: None,
            unreachable_reason: None,
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: SpecialGate) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn with_approach_override(mut self, tile: Position) -> Self {
        self.approach_override = Some(tile);
        self
    }

    #[must_use]
    pub fn with_unreachable_reason(mut self, reason: impl Into<String>) -> Self {
        self.unreachable_reason = Some(reason.into());
        self
    }

    pub fn to_poi(&self) -> PointOfInterest {
        PointOfInterest::new(
            self.name.clone(),
            self.tile,
            PoiKind::Special {
                approach_override: self.approach_override,
                unreachable_reason: self.unreachable_reason.clone(),
            },
        )
    }
}

/// Ordered list of special points across all locations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpecialPointTable {
    points: Vec<SpecialPoint>,
}

impl SpecialPointTable {
    pub fn new(points: Vec<SpecialPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecialPoint> {
        self.points.iter()
    }

    /// Points listed for `location` whose gate currently holds, in table order.
    pub fn active_for<'a>(
        &'a self,
        location: &'a str,
        world: &'a dyn WorldOracle,
    ) -> impl Iterator<Item = &'a SpecialPoint> + 'a {
        self.points
            .iter()
            .filter(move |point| point.location == location && point.gate.holds(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flags {
        quest: bool,
        flag: bool,
        event_tile: Option<Position>,
    }

    impl WorldOracle for Flags {
        fn player_tile(&self) -> Position {
            Position::ORIGIN
        }

        fn location_name(&self) -> &str {
            "Town"
        }

        fn has_quest(&self, quest: u32) -> bool {
            self.quest && quest == 31
        }

        fn has_flag(&self, _flag: &str) -> bool {
            self.flag
        }

        fn event_target_tile(&self) -> Option<Position> {
            self.event_tile
        }
    }

    fn table() -> SpecialPointTable {
        SpecialPointTable::new(vec![
            SpecialPoint::new("Town", "Hiding Bush", Position::new(28, 13)).with_gate(
                SpecialGate::QuestWithoutFlag {
                    quest: 31,
                    flag: "magnifying_glass".into(),
                },
            ),
            SpecialPoint::new("Beach", "Bracelet", Position::new(53, 8))
                .with_gate(SpecialGate::EventTargetTile(Position::new(53, 8))),
            SpecialPoint::new("Beach", "Barrel", Position::new(37, 33)),
        ])
    }

    #[test]
    fn quest_gate_requires_quest_and_missing_flag() {
        let table = table();
        let active = |quest, flag| {
            let world = Flags {
                quest,
                flag,
                event_tile: None,
            };
            table.active_for("Town", &world).count()
        };

        assert_eq!(active(true, false), 1);
        assert_eq!(active(true, true), 0);
        assert_eq!(active(false, false), 0);
    }

    #[test]
    fn event_gate_matches_target_tile() {
        let table = table();
        let world = Flags {
            quest: false,
            flag: false,
            event_tile: Some(Position::new(53, 8)),
        };
        let names: Vec<_> = table
            .active_for("Beach", &world)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bracelet", "Barrel"]);

        let elsewhere = Flags {
            event_tile: Some(Position::new(1, 1)),
            ..world
        };
        assert_eq!(table.active_for("Beach", &elsewhere).count(), 1);
    }
}
