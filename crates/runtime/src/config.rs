//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracker_core::{SortMode, SpecialPointTable, TrackerConfig};

use crate::content;
use crate::error::{Result, RuntimeError};

/// Configuration required to build a [`NavigationDirector`](crate::NavigationDirector).
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    pub tracker: TrackerConfig,
    /// Replaces the embedded special-points table when set.
    pub special_points_path: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn new(tracker: TrackerConfig) -> Self {
        Self {
            tracker,
            special_points_path: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TRACKER_SORT_BY_PROXIMITY` - Start with proximity ordering (default: false)
    /// - `TRACKER_NPC_RELEASE_MS` - Delay before held NPCs are released (default: 3000)
    /// - `TRACKER_SPECIAL_POINTS` - Path to a special-points RON file (default: embedded)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(proximity) = read_env::<bool>("TRACKER_SORT_BY_PROXIMITY") {
            config.tracker.sort_mode = if proximity {
                SortMode::Proximity
            } else {
                SortMode::Alphabetical
            };
        }

        if let Some(delay_ms) = read_env::<u64>("TRACKER_NPC_RELEASE_MS") {
            config.tracker.npc_release_delay_ms = delay_ms;
        }

        config.special_points_path = env::var("TRACKER_SPECIAL_POINTS").ok().map(PathBuf::from);

        config
    }

    pub fn npc_release_delay(&self) -> Duration {
        Duration::from_millis(self.tracker.npc_release_delay_ms)
    }

    /// Loads the special-points table this configuration points at.
    pub fn special_points(&self) -> Result<SpecialPointTable> {
        match &self.special_points_path {
            Some(path) => content::load_special_points(path),
            None => content::default_special_points(),
        }
    }

    /// Rejects values the director cannot work with.
    pub fn validate(&self) -> Result<()> {
        let radius = self.tracker.approach_radius;
        if radius != TrackerConfig::DEFAULT_APPROACH_RADIUS {
            return Err(RuntimeError::InvalidConfig(format!(
                "approach radius must be {}, got {radius}",
                TrackerConfig::DEFAULT_APPROACH_RADIUS
            )));
        }
        Ok(())
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tracker_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.npc_release_delay(), Duration::from_secs(3));
        assert_eq!(config.tracker.sort_mode, SortMode::Alphabetical);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn only_the_adjacent_radius_is_accepted() {
        for radius in [1, 2, 4, 7] {
            let mut config = RuntimeConfig::default();
            config.tracker.approach_radius = radius;
            assert!(
                matches!(config.validate(), Err(RuntimeError::InvalidConfig(_))),
                "radius {radius} accepted"
            );
        }
    }
}
