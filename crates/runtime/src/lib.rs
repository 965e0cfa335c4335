//! Runtime orchestration for the tile-world tracker.
//!
//! This crate wires `tracker-core` to a host: it owns the tracker state in a
//! [`NavigationDirector`], narrates results, hands auto-navigation to a
//! [`MovementDriver`], and restores held NPCs on a timer.
//!
//! Modules are organized by responsibility:
//! - [`director`] hosts the controller and its read modes
//! - [`input`] maps logical buttons onto director commands
//! - [`narration`] and [`movement`] are the host-facing seams
//! - [`release`] schedules deferred NPC restoration
//! - [`config`] and [`content`] load settings and the special-points table
pub mod config;
pub mod content;
pub mod director;
pub mod error;
pub mod input;
pub mod movement;
pub mod narration;
pub mod release;

pub use config::RuntimeConfig;
pub use content::{default_special_points, load_special_points};
pub use director::{NavigationDirector, ReadMode, Readout};
pub use error::{Result, RuntimeError};
pub use input::{Button, TrackerCommand};
pub use movement::{Arrival, ArrivalNotifier, MovementDriver};
pub use narration::Narrator;
pub use release::{NpcReleaseScheduler, NpcSpeedControl};
