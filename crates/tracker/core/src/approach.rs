//! Approach-tile selection.
//!
//! Points of interest usually sit on tiles the player cannot enter (a fridge,
//! a barrel, a standing NPC). [`ApproachTileResolver`] picks a neighbouring
//! tile to walk to instead. Candidates are evaluated in two tiers:
//!
//! 1. **Sides**: the four tiles sharing an edge with the target.
//! 2. **Corners**: the four diagonal tiles, consulted only when no side is
//!    reachable.
//!
//! Within a tier a candidate replaces the current best only when it is no
//! worse on both path cost and straight-line proximity to the player.

use crate::geometry::Position;
use crate::oracle::PathOracle;

/// Priority group of candidate approach tiles.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Side,
    Corner,
}

/// Selected approach tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproachResult {
    pub tile: Position,
    pub tier: Tier,
    /// Number of steps from the player to `tile`.
    pub path_cost: usize,
    pub proximity: f64,
}

/// Picks the tile next to a target that the player should walk to.
#[derive(Clone, Copy, Debug)]
pub struct ApproachTileResolver {
    radius: i32,
}

impl Default for ApproachTileResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl ApproachTileResolver {
    pub const DEFAULT_RADIUS: i32 = 3;

    pub const fn new(radius: i32) -> Self {
        Self { radius }
    }

    /// Offset of the bounding box edge from the target.
    const fn layers(&self) -> i32 {
        let layers = self.radius - 2;
        if layers < 1 { 1 } else { layers }
    }

    /// Side candidates in evaluation order: top, right, bottom, left.
    pub fn side_candidates(&self, target: Position) -> [Position; 4] {
        let l = self.layers();
        [
            target.offset(0, -l),
            target.offset(l, 0),
            target.offset(0, l),
            target.offset(-l, 0),
        ]
    }

    /// Corner candidates in evaluation order: top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn corner_candidates(&self, target: Position) -> [Position; 4] {
        let l = self.layers();
        [
            target.offset(-l, -l),
            target.offset(l, -l),
            target.offset(l, l),
            target.offset(-l, l),
        ]
    }

    /// Resolves the approach tile for `target`, scoring proximity as the
    /// straight-line distance from each candidate to the player.
    pub fn resolve(
        &self,
        target: Position,
        player: Position,
        paths: &dyn PathOracle,
    ) -> Option<ApproachResult> {
        self.resolve_with(target, player, paths, |candidate| {
            candidate.distance_to(player)
        })
    }

    /// Like [`resolve`](Self::resolve) with a caller-supplied proximity score.
    pub fn resolve_with<F>(
        &self,
        target: Position,
        player: Position,
        paths: &dyn PathOracle,
        proximity: F,
    ) -> Option<ApproachResult>
    where
        F: Fn(Position) -> f64,
    {
        let tiers = [
            (Tier::Side, self.side_candidates(target)),
            (Tier::Corner, self.corner_candidates(target)),
        ];

        tiers.into_iter().find_map(|(tier, candidates)| {
            best_in_tier(tier, &candidates, player, paths, &proximity)
        })
    }
}

fn best_in_tier<F>(
    tier: Tier,
    candidates: &[Position],
    player: Position,
    paths: &dyn PathOracle,
    proximity: &F,
) -> Option<ApproachResult>
where
    F: Fn(Position) -> f64,
{
    let mut best: Option<ApproachResult> = None;

    for &tile in candidates {
        let Some(path) = paths.find_path(player, tile) else {
            continue;
        };
        let candidate = ApproachResult {
            tile,
            tier,
            path_cost: path.len(),
            proximity: proximity(tile),
        };

        match best {
            None => best = Some(candidate),
            Some(current)
                if candidate.path_cost <= current.path_cost
                    && candidate.proximity <= current.proximity =>
            {
                best = Some(candidate);
            }
            Some(_) => {}
        }
    }

    best
}
