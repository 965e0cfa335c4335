//! Terminal sandbox for the tile-world tracker.
//!
//! This binary is the composition root that assembles:
//! 1. An ASCII sandbox world implementing the tracker oracles
//! 2. The navigation director from `tracker-runtime`
//! 3. A ratatui frontend that renders the map and the narration log
//!
//! # Examples
//!
//! ```bash
//! # Embedded saloon map
//! cargo run -p tracker-client
//!
//! # Custom map, proximity sorting, verbose logs
//! TRACKER_MAP=room.map TRACKER_SORT_BY_PROXIMITY=true RUST_LOG=debug cargo run -p tracker-client
//! ```

mod app;
mod config;
mod host;
mod input;
mod logging;
mod world;

use anyhow::{Context, Result};
use tracker_runtime::RuntimeConfig;

use crate::app::App;
use crate::config::ClientConfig;
use crate::world::SandboxWorld;

const EMBEDDED_MAP: &str = include_str!("../data/saloon.map");

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let runtime_config = RuntimeConfig::from_env();
    let client_config = ClientConfig::from_env();

    // 2. Setup logging
    let _guard = logging::setup_logging(&client_config.log_dir)?;
    tracing::info!("Starting tracker sandbox");
    tracing::info!("Sort mode: {}", runtime_config.tracker.sort_mode);
    tracing::info!("Approach radius: {}", runtime_config.tracker.approach_radius);

    runtime_config.validate()?;
    let special_points = runtime_config.special_points()?;
    tracing::info!("Loaded {} special points", special_points.len());

    // 3. Build the world
    let world = match &client_config.map_path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read map {}", path.display()))?;
            SandboxWorld::parse(&source)
                .with_context(|| format!("failed to parse map {}", path.display()))?
        }
        None => SandboxWorld::parse(EMBEDDED_MAP).context("embedded map is invalid")?,
    };

    // 4. Run the UI
    let app = App::new(world, &runtime_config, special_points, client_config);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!("Sandbox error: {e:#}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_map_parses() {
        let world = SandboxWorld::parse(EMBEDDED_MAP).unwrap();
        assert_eq!(world.size(), (24, 10));
        assert_eq!(world.npcs().len(), 2);
    }
}
