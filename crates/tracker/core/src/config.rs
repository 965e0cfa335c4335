use crate::catalog::SortMode;

/// Tracker constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerConfig {
    /// Item ordering applied when the tracker starts.
    pub sort_mode: SortMode,
    /// Radius of the approach search box. Only 3 (adjacent candidates) is valid.
    pub approach_radius: i32,
    /// Delay before NPCs held for the player get their speed back.
    pub npc_release_delay_ms: u64,
}

impl TrackerConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_APPROACH_RADIUS: i32 = 3;
    pub const DEFAULT_NPC_RELEASE_DELAY_MS: u64 = 3_000;

    pub fn new() -> Self {
        Self {
            sort_mode: SortMode::default(),
            approach_radius: Self::DEFAULT_APPROACH_RADIUS,
            npc_release_delay_ms: Self::DEFAULT_NPC_RELEASE_DELAY_MS,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}
