//! Deferred release of NPCs slowed down to let the player pass.
//!
//! While auto-navigating, the host may freeze NPCs standing in the way and
//! register their original speed here. After the player arrives the director
//! schedules a release: once the delay elapses the speeds are restored and
//! the table is cleared.
//!
//! # Generations
//!
//! Each call to [`NpcReleaseScheduler::schedule`] bumps a generation counter
//! and spawns a job tagged with the new value. When a job wakes up it only
//! restores if its generation is still the latest, so back-to-back requests
//! produce exactly one restore, performed by the newest job.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Host hook for changing an NPC's movement speed.
pub trait NpcSpeedControl: Send + Sync {
    fn set_speed(&self, npc: &str, speed: u32);
}

#[derive(Debug, Default)]
struct HeldTable {
    speeds: BTreeMap<String, u32>,
}

/// Table of held NPCs plus the generation-keyed release job.
#[derive(Clone)]
pub struct NpcReleaseScheduler {
    held: Arc<Mutex<HeldTable>>,
    generation: Arc<AtomicU64>,
    delay: Duration,
    control: Arc<dyn NpcSpeedControl>,
}

impl NpcReleaseScheduler {
    pub fn new(control: Arc<dyn NpcSpeedControl>, delay: Duration) -> Self {
        Self {
            held: Arc::new(Mutex::new(HeldTable::default())),
            generation: Arc::new(AtomicU64::new(0)),
            delay,
            control,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records an NPC whose speed was overridden. The first recorded speed
    /// is the one restored, even if the NPC is held again before release.
    pub fn hold(&self, npc: impl Into<String>, original_speed: u32) {
        self.lock()
            .speeds
            .entry(npc.into())
            .or_insert(original_speed);
    }

    /// Names of the NPCs currently held, sorted.
    pub fn held(&self) -> Vec<String> {
        self.lock().speeds.keys().cloned().collect()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Schedules a release after the configured delay and returns the job.
    ///
    /// Outside a tokio runtime the release happens immediately and `None` is
    /// returned.
    pub fn schedule(&self) -> Option<JoinHandle<()>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime available, releasing held NPCs now");
            self.release_now();
            return None;
        };

        let scheduler = self.clone();
        debug!(generation, delay_ms = self.delay.as_millis() as u64, "npc release scheduled");
        Some(handle.spawn(async move {
            tokio::time::sleep(scheduler.delay).await;
            if scheduler.generation() != generation {
                debug!(generation, "npc release superseded");
                return;
            }
            scheduler.release_now();
        }))
    }

    /// Restores every held NPC and clears the table. Returns how many were restored.
    pub fn release_now(&self) -> usize {
        let released = std::mem::take(&mut self.lock().speeds);
        for (npc, speed) in &released {
            self.control.set_speed(npc, *speed);
        }
        if !released.is_empty() {
            debug!(count = released.len(), "released held NPCs");
        }
        released.len()
    }

    fn lock(&self) -> MutexGuard<'_, HeldTable> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SpeedLog(Mutex<Vec<(String, u32)>>);

    impl NpcSpeedControl for SpeedLog {
        fn set_speed(&self, npc: &str, speed: u32) {
            self.0.lock().unwrap().push((npc.to_owned(), speed));
        }
    }

    fn scheduler(log: &Arc<SpeedLog>) -> NpcReleaseScheduler {
        NpcReleaseScheduler::new(log.clone(), Duration::from_secs(3))
    }

    #[tokio::test(start_paused = true)]
    async fn restores_after_delay() {
        let log = Arc::new(SpeedLog::default());
        let scheduler = scheduler(&log);
        scheduler.hold("Lewis", 2);
        scheduler.hold("Marnie", 3);

        let job = scheduler.schedule().unwrap();

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(log.0.lock().unwrap().is_empty());
        assert_eq!(scheduler.held().len(), 2);

        job.await.unwrap();
        assert_eq!(
            *log.0.lock().unwrap(),
            vec![("Lewis".to_owned(), 2), ("Marnie".to_owned(), 3)]
        );
        assert!(scheduler.held().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn only_latest_generation_restores() {
        let log = Arc::new(SpeedLog::default());
        let scheduler = scheduler(&log);
        scheduler.hold("Lewis", 2);

        let first = scheduler.schedule().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        scheduler.hold("Pierre", 4);
        let second = scheduler.schedule().unwrap();

        first.await.unwrap();
        assert!(log.0.lock().unwrap().is_empty());

        second.await.unwrap();
        assert_eq!(log.0.lock().unwrap().len(), 2);
        assert_eq!(scheduler.generation(), 2);
    }

    #[test]
    fn first_held_speed_wins() {
        let log = Arc::new(SpeedLog::default());
        let scheduler = scheduler(&log);
        scheduler.hold("Lewis", 2);
        scheduler.hold("Lewis", 0);

        assert_eq!(scheduler.release_now(), 1);
        assert_eq!(*log.0.lock().unwrap(), vec![("Lewis".to_owned(), 2)]);
        assert_eq!(scheduler.release_now(), 0);
    }

    #[test]
    fn releases_immediately_without_runtime() {
        let log = Arc::new(SpeedLog::default());
        let scheduler = scheduler(&log);
        scheduler.hold("Gus", 1);

        assert!(scheduler.schedule().is_none());
        assert_eq!(log.0.lock().unwrap().len(), 1);
    }
}
