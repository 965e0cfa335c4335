//! Host-side adapters handed to the navigation director.
//!
//! The director owns its narrator and movement driver, while the event loop
//! needs to read narration and drive the walk every tick. Both adapters are
//! cheap handles over shared state so the loop keeps its own clone.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracker_core::{Bearing, PathOracle, Position, WorldOracle};
use tracker_runtime::{ArrivalNotifier, MovementDriver, Narrator};

use crate::world::SandboxWorld;

const MESSAGE_CAPACITY: usize = 64;

/// Narration sink rendered in the message panel.
#[derive(Clone, Default)]
pub struct MessageLog(Arc<Mutex<VecDeque<String>>>);

impl MessageLog {
    /// Most recent `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> Vec<String> {
        let messages = self.lock();
        let skip = messages.len().saturating_sub(count);
        messages.iter().skip(skip).cloned().collect()
    }

    pub fn push(&self, text: impl Into<String>) {
        let mut messages = self.lock();
        if messages.len() == MESSAGE_CAPACITY {
            messages.pop_front();
        }
        messages.push_back(text.into());
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Narrator for MessageLog {
    fn say(&self, text: &str, _force: bool) {
        tracing::info!(target: "narration", "{text}");
        self.push(text);
    }
}

struct WalkState {
    target: Option<(Position, ArrivalNotifier)>,
    facing: Bearing,
    control: bool,
}

impl Default for WalkState {
    fn default() -> Self {
        Self {
            target: None,
            facing: Bearing::South,
            control: true,
        }
    }
}

/// Outcome of one walking step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStep {
    Idle,
    Moved(Position),
    Arrived(Position),
    Blocked,
}

/// Continuous movement towards the director's approach tile, one tile per tick.
#[derive(Clone, Default)]
pub struct Walker(Arc<Mutex<WalkState>>);

impl Walker {
    pub fn facing(&self) -> Bearing {
        self.lock().facing
    }

    pub fn has_control(&self) -> bool {
        self.lock().control
    }

    pub fn is_walking(&self) -> bool {
        self.lock().target.is_some()
    }

    /// Takes one step along a freshly computed path. Paths are recomputed
    /// every tick because NPCs move in between.
    pub fn advance(&self, world: &mut SandboxWorld) -> WalkStep {
        let mut state = self.lock();
        let Some((target, _)) = state.target.as_ref() else {
            return WalkStep::Idle;
        };
        let target = *target;

        let player = world.player_tile();
        let Some(next) = world
            .find_path(player, target)
            .and_then(|path| path.first().copied())
        else {
            if player == target {
                return arrive(&mut state, target);
            }
            tracing::debug!(%target, "walk blocked this tick");
            return WalkStep::Blocked;
        };

        state.facing = Bearing::between(player, next);
        world.move_player_to(next);

        if next == target {
            return arrive(&mut state, target);
        }
        WalkStep::Moved(next)
    }

    /// Drops the current walk. The arrival is never reported.
    pub fn cancel(&self) {
        if let Some((target, _)) = self.lock().target.take() {
            tracing::info!(%target, "walk cancelled");
        }
    }

    fn lock(&self) -> MutexGuard<'_, WalkState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn arrive(state: &mut WalkState, target: Position) -> WalkStep {
    if let Some((_, notifier)) = state.target.take() {
        notifier.notify();
    }
    WalkStep::Arrived(target)
}

impl MovementDriver for Walker {
    fn start(&mut self, target: Position, on_arrival: ArrivalNotifier) {
        tracing::debug!(%target, ticket = on_arrival.ticket(), "walk started");
        self.lock().target = Some((target, on_arrival));
    }

    fn face(&mut self, bearing: Bearing) {
        self.lock().facing = bearing;
    }

    fn set_player_control(&mut self, enabled: bool) {
        self.lock().control = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_log_keeps_the_latest_messages() {
        let log = MessageLog::default();
        for index in 0..(MESSAGE_CAPACITY + 5) {
            log.say(&format!("message {index}"), true);
        }

        let recent = log.recent(2);
        assert_eq!(
            recent,
            [
                format!("message {}", MESSAGE_CAPACITY + 3),
                format!("message {}", MESSAGE_CAPACITY + 4)
            ]
        );
        assert_eq!(log.recent(usize::MAX).len(), MESSAGE_CAPACITY);
    }

    #[test]
    fn idle_walker_does_nothing() {
        let walker = Walker::default();
        let mut world = SandboxWorld::parse("Room\n###\n#@#\n###\n").unwrap();
        assert_eq!(walker.advance(&mut world), WalkStep::Idle);
        assert!(walker.has_control());
        assert!(!walker.is_walking());
    }
}
