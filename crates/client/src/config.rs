//! Sandbox-specific configuration, separate from the tracker runtime settings.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory the log file is written to.
    pub log_dir: PathBuf,
    /// Map file replacing the embedded saloon.
    pub map_path: Option<PathBuf>,
    /// Time per auto-walk step.
    pub step_interval: Duration,
    /// Time per NPC patrol step.
    pub npc_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_dir: env::temp_dir().join("tracker").join("logs"),
            map_path: None,
            step_interval: Duration::from_millis(150),
            npc_interval: Duration::from_millis(600),
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRACKER_LOG_DIR` - Log directory (default: `<tmp>/tracker/logs`)
    /// - `TRACKER_MAP` - Path to an ASCII map file (default: embedded saloon)
    /// - `TRACKER_STEP_MS` - Auto-walk step interval in ms (default: 150)
    /// - `TRACKER_NPC_STEP_MS` - NPC patrol interval in ms (default: 600)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("TRACKER_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        config.map_path = env::var("TRACKER_MAP").ok().map(PathBuf::from);

        if let Some(ms) = read_env::<u64>("TRACKER_STEP_MS") {
            config.step_interval = Duration::from_millis(ms.max(10));
        }

        if let Some(ms) = read_env::<u64>("TRACKER_NPC_STEP_MS") {
            config.npc_interval = Duration::from_millis(ms.max(10));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
