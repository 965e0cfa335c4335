//! Turn-by-turn directions from a step path.

use crate::geometry::{Bearing, Position};

/// Separator placed between narrated turns.
pub const TURN_SEPARATOR: &str = " - ";

/// Bearing of every step along `path`, starting from `start`.
pub fn step_bearings(start: Position, path: &[Position]) -> Vec<Bearing> {
    let mut last = start;
    path.iter()
        .map(|&tile| {
            let bearing = Bearing::between(last, tile);
            last = tile;
            bearing
        })
        .collect()
}

/// Collapses runs of identical consecutive bearings into single turns.
pub fn collapse(bearings: &[Bearing]) -> Vec<Bearing> {
    let mut turns = bearings.to_vec();
    turns.dedup();
    turns
}

/// Narration for a sequence of turns, e.g. `"North - East"`.
pub fn narrate(turns: &[Bearing]) -> String {
    turns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(TURN_SEPARATOR)
}

/// Directions along `path`, ready to narrate.
pub fn describe_path(start: Position, path: &[Position]) -> String {
    narrate(&collapse(&step_bearings(start, path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bearing::*;

    #[test]
    fn runs_collapse_into_turns() {
        assert_eq!(collapse(&[North, North, North, East, East]), vec![North, East]);
        assert_eq!(narrate(&collapse(&[North, North, North, East, East])), "North - East");
    }

    #[test]
    fn non_adjacent_repeats_are_kept() {
        assert_eq!(
            collapse(&[South, West, West, South, South]),
            vec![South, West, South]
        );
    }

    #[test]
    fn path_becomes_directions() {
        let start = Position::new(0, 0);
        let path = [
            Position::new(0, -1),
            Position::new(0, -2),
            Position::new(1, -2),
            Position::new(2, -2),
            Position::new(2, -1),
        ];
        assert_eq!(describe_path(start, &path), "North - East - South");
    }

    #[test]
    fn empty_path_has_no_turns() {
        assert_eq!(describe_path(Position::ORIGIN, &[]), "");
    }
}
