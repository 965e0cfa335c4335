use std::fmt;

/// Discrete grid position expressed in tile coordinates.
///
/// `x` grows towards the east and `y` grows towards the south, matching the
/// host world's screen layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by the given delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Straight-line distance between two tiles.
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        dx.hypot(dy)
    }

    /// Straight-line distance rounded to whole tiles, as narrated to the user.
    pub fn tile_distance_to(self, other: Position) -> u32 {
        self.distance_to(other).round() as u32
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// One of the four cardinal directions describing relative position.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Bearing {
    North,
    East,
    South,
    West,
}

impl Bearing {
    pub const ALL: [Bearing; 4] = [Bearing::North, Bearing::East, Bearing::South, Bearing::West];

    /// Bearing from `from` towards `to`.
    ///
    /// The axis with the larger magnitude wins; ties resolve to the vertical
    /// axis, and a zero delta reads as `South`.
    pub fn between(from: Position, to: Position) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dx.abs() > dy.abs() {
            if dx > 0 { Bearing::East } else { Bearing::West }
        } else if dy < 0 {
            Bearing::North
        } else {
            Bearing::South
        }
    }

    /// Unit step for this bearing in world coordinates.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Bearing::North => (0, -1),
            Bearing::East => (1, 0),
            Bearing::South => (0, 1),
            Bearing::West => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn larger_axis_decides_bearing() {
        let origin = Position::new(10, 10);
        assert_eq!(Bearing::between(origin, Position::new(10, 4)), Bearing::North);
        assert_eq!(Bearing::between(origin, Position::new(10, 12)), Bearing::South);
        assert_eq!(Bearing::between(origin, Position::new(15, 12)), Bearing::East);
        assert_eq!(Bearing::between(origin, Position::new(2, 13)), Bearing::West);
    }

    #[test]
    fn diagonal_ties_resolve_vertically() {
        let origin = Position::new(0, 0);
        assert_eq!(Bearing::between(origin, Position::new(3, -3)), Bearing::North);
        assert_eq!(Bearing::between(origin, Position::new(-3, 3)), Bearing::South);
    }

    #[test]
    fn delta_round_trips_through_between() {
        let origin = Position::new(5, 5);
        for bearing in Bearing::ALL {
            let (dx, dy) = bearing.delta();
            assert_eq!(Bearing::between(origin, origin.offset(dx, dy)), bearing);
        }
    }

    #[test]
    fn tile_distance_rounds() {
        let a = Position::new(0, 0);
        assert_eq!(a.tile_distance_to(Position::new(3, 4)), 5);
        assert_eq!(a.tile_distance_to(Position::new(1, 1)), 1);
        assert_eq!(a.tile_distance_to(Position::new(2, 2)), 3);
        assert_eq!(Position::new(18, 16).to_string(), "18-16");
    }
}
