//! Navigation director: the single controller that owns tracker state.
//!
//! The director glues the pieces of `tracker-core` together. It rescans the
//! world before acting, keeps the focus cursor in sync with the latest
//! catalog, resolves approach tiles, and either narrates directions or hands
//! movement to the host. All state (catalog, focus, held NPCs) is owned here
//! and only changes through the methods below.
//!
//! Every user-facing outcome, including failures, is narrated and logged.
//! Failures are also returned as [`NavError`] so hosts and tests can react.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use tracker_core::{
    ApproachTileResolver, Bearing, Catalog, Cycle, FocusState, NavError, PointOfInterest,
    Position, SortMode, SpatialCatalog, SpecialPointTable, Step, TrackerEnv, describe_path,
    focus,
};

use crate::config::RuntimeConfig;
use crate::input::TrackerCommand;
use crate::movement::{Arrival, ArrivalNotifier, MovementDriver};
use crate::narration::Narrator;
use crate::release::{NpcReleaseScheduler, NpcSpeedControl};

/// How [`NavigationDirector::read_focus`] reports the focused point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ReadMode {
    /// Bearing, distance and coordinates.
    Describe,
    /// Coordinates of the point and the player only.
    TileOnly,
    /// Turn-by-turn directions to the approach tile.
    Directions,
    /// Walk the player to the approach tile.
    AutoMove,
}

/// Successful result of a read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Readout {
    /// Nothing is focused; the read was ignored.
    Idle,
    /// Text narrated to the user.
    Spoken(String),
    /// Movement towards `tile` started under `ticket`.
    Moving { ticket: u64, tile: Position },
}

#[derive(Clone, Copy, Debug)]
struct ActiveMove {
    ticket: u64,
    tile: Position,
}

/// Owns the catalog, the focus cursor and the movement/release side effects.
pub struct NavigationDirector {
    scanner: SpatialCatalog,
    resolver: ApproachTileResolver,
    catalog: Catalog,
    focus: FocusState,
    narrator: Box<dyn Narrator>,
    movement: Box<dyn MovementDriver>,
    release: NpcReleaseScheduler,
    arrivals_tx: mpsc::UnboundedSender<Arrival>,
    arrivals_rx: mpsc::UnboundedReceiver<Arrival>,
    next_ticket: u64,
    active_move: Option<ActiveMove>,
}

impl NavigationDirector {
    pub fn new(
        config: &RuntimeConfig,
        special_points: SpecialPointTable,
        narrator: Box<dyn Narrator>,
        movement: Box<dyn MovementDriver>,
        speed_control: Arc<dyn NpcSpeedControl>,
    ) -> Self {
        let (arrivals_tx, arrivals_rx) = mpsc::unbounded_channel();

        Self {
            scanner: SpatialCatalog::new(special_points, config.tracker.sort_mode),
            resolver: ApproachTileResolver::new(config.tracker.approach_radius),
            catalog: Catalog::default(),
            focus: FocusState::empty(),
            narrator,
            movement,
            release: NpcReleaseScheduler::new(speed_control, config.npc_release_delay()),
            arrivals_tx,
            arrivals_rx,
            next_ticket: 0,
            active_move: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn sort_mode(&self) -> SortMode {
        self.scanner.sort_mode()
    }

    /// True while an auto-move is in progress.
    pub fn is_moving(&self) -> bool {
        self.active_move.is_some()
    }

    pub fn release(&self) -> &NpcReleaseScheduler {
        &self.release
    }

    /// Registers an NPC slowed down to let the player pass.
    pub fn hold_npc(&self, npc: impl Into<String>, original_speed: u32) {
        self.release.hold(npc, original_speed);
    }

    /// Rebuilds the catalog. Focus is kept while it still resolves, otherwise
    /// it falls back to the first valid item.
    pub fn scan(&mut self, env: &TrackerEnv<'_>) {
        self.catalog = self.scanner.scan(env);
        self.focus = focus::resync(&self.catalog, &self.focus);
        debug!(
            location = env.world.location_name(),
            categories = self.catalog.len(),
            items = self.catalog.item_count(),
            focus = ?self.focus,
            "scan complete"
        );
    }

    /// Dispatches a control-surface command. Ignored while the host blocks input.
    pub fn handle(&mut self, env: &TrackerEnv<'_>, command: TrackerCommand) {
        if env.world.input_blocked() {
            debug!(?command, "input blocked, command ignored");
            return;
        }

        // Failures are narrated inside each operation.
        let _ = match command {
            TrackerCommand::Read(mode) => self.read_focus(env, mode, false).map(drop),
            TrackerCommand::CycleItem(cycle) => self.cycle_item(cycle).map(drop),
            TrackerCommand::CycleCategory(cycle) => self.cycle_category(cycle).map(drop),
            TrackerCommand::ToggleSort => {
                self.toggle_sort(env);
                Ok(())
            }
        };
    }

    /// Moves focus to the neighbouring item in the current category.
    pub fn cycle_item(&mut self, cycle: Cycle) -> Result<Step, NavError> {
        let step = focus::cycle_item(&self.catalog, &self.focus, cycle)
            .inspect_err(|err| self.report(err))?;

        self.focus = step.focus.clone();
        let mut text = format!("{} focused", self.focus.item().unwrap_or_default());
        if step.boundary {
            text.push_str(", End of list");
        }
        self.say(&text);
        Ok(step)
    }

    /// Moves focus to the first item of the neighbouring category.
    pub fn cycle_category(&mut self, cycle: Cycle) -> Result<Step, NavError> {
        let step = focus::cycle_category(&self.catalog, &self.focus, cycle)
            .inspect_err(|err| self.report(err))?;

        self.focus = step.focus.clone();
        let mut text = format!(
            "{} Category, Focus - {}",
            self.focus.category().unwrap_or_default(),
            self.focus.item().unwrap_or_default()
        );
        if step.boundary {
            text.push_str(", End of list");
        }
        self.say(&text);
        Ok(step)
    }

    /// Flips between proximity and alphabetical ordering.
    ///
    /// Item positions change with the ordering, so this rescans and focuses
    /// the first item of the current category rather than resorting in place.
    pub fn toggle_sort(&mut self, env: &TrackerEnv<'_>) {
        let mode = self.scanner.sort_mode().toggled();
        self.scanner.set_sort_mode(mode);
        self.scan(env);
        self.focus = focus::first_item_of_current(&self.catalog, &self.focus);

        let text = match self.focus.item() {
            Some(item) => format!("Sorting by {}, {item} focused", mode.label()),
            None => format!("Sorting by {}", mode.label()),
        };
        self.say(&text);
    }

    /// Reads the focused point of interest according to `mode`.
    ///
    /// The world is rescanned first. With `face` set the player is also
    /// turned towards the point.
    pub fn read_focus(
        &mut self,
        env: &TrackerEnv<'_>,
        mode: ReadMode,
        face: bool,
    ) -> Result<Readout, NavError> {
        let result = self.try_read_focus(env, mode, face);
        match &result {
            Ok(Readout::Spoken(text)) => self.say(text),
            Ok(_) => {}
            Err(err) => self.report(err),
        }
        result
    }

    fn try_read_focus(
        &mut self,
        env: &TrackerEnv<'_>,
        mode: ReadMode,
        face: bool,
    ) -> Result<Readout, NavError> {
        if self.focus.is_empty() {
            return Ok(Readout::Idle);
        }

        let previous = self.focus.clone();
        self.scan(env);

        if self.focus.is_empty() {
            return Err(NavError::NothingFound);
        }
        if self.focus != previous {
            return Err(NavError::Vanished {
                name: previous.item().unwrap_or_default().to_owned(),
            });
        }

        let poi = self.focused_poi().ok_or(NavError::NothingFound)?.clone();
        if let Some(reason) = poi.unreachable_reason() {
            return Err(NavError::Unreachable {
                name: poi.name.clone(),
                reason: reason.to_owned(),
            });
        }

        let player = env.player_tile();
        let bearing = Bearing::between(player, poi.tile);
        let distance = player.tile_distance_to(poi.tile);
        if face {
            self.movement.face(bearing);
        }

        match mode {
            ReadMode::Describe => Ok(Readout::Spoken(format!(
                "{} is {bearing} {distance} tiles, at {}, player is at {player}",
                poi.name, poi.tile
            ))),
            ReadMode::TileOnly => Ok(Readout::Spoken(format!(
                "{} is at {}, player is at {player}",
                poi.name, poi.tile
            ))),
            ReadMode::Directions => {
                let tile = self.approach_tile(env, &poi)?;
                let path = env
                    .paths
                    .find_path(player, tile)
                    .ok_or_else(|| no_path(&poi))?;
                debug!(target = %tile, steps = path.len(), "directions resolved");

                if path.is_empty() {
                    return Ok(Readout::Spoken(format!("Already next to {}", poi.name)));
                }
                Ok(Readout::Spoken(format!(
                    "{} at {}",
                    poi.name,
                    describe_path(player, &path)
                )))
            }
            ReadMode::AutoMove => {
                let tile = self.approach_tile(env, &poi)?;
                let ticket = self.begin_move(tile);
                self.say(&format!("moving near {}, to {tile}", poi.name));
                Ok(Readout::Moving { ticket, tile })
            }
        }
    }

    /// Drains arrival messages and completes the current auto-move if it
    /// arrived. Call once per host tick. Returns true if a move completed.
    pub fn pump_arrivals(&mut self, env: &TrackerEnv<'_>) -> bool {
        let mut completed = false;
        while let Ok(arrival) = self.arrivals_rx.try_recv() {
            match self.active_move {
                Some(active) if active.ticket == arrival.ticket => {
                    self.finish_move(env, active);
                    completed = true;
                }
                _ => debug!(ticket = arrival.ticket, "stale arrival ignored"),
            }
        }
        completed
    }

    /// Abandons the current auto-move, if any. Held NPCs are scheduled for
    /// release and the player gets control back.
    pub fn cancel_move(&mut self) -> bool {
        let Some(active) = self.active_move.take() else {
            return false;
        };
        debug!(ticket = active.ticket, tile = %active.tile, "auto-move cancelled");
        self.release.schedule();
        self.movement.set_player_control(true);
        true
    }

    fn begin_move(&mut self, tile: Position) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        if let Some(previous) = self.active_move.replace(ActiveMove { ticket, tile }) {
            debug!(superseded = previous.ticket, ticket, "auto-move replaced");
        }

        self.movement.set_player_control(false);
        self.movement
            .start(tile, ArrivalNotifier::new(ticket, self.arrivals_tx.clone()));
        debug!(ticket, target = %tile, "auto-move started");
        ticket
    }

    fn finish_move(&mut self, env: &TrackerEnv<'_>, active: ActiveMove) {
        debug!(ticket = active.ticket, tile = %active.tile, "auto-move arrived");
        // Announce and face; failures are already narrated.
        let _ = self.read_focus(env, ReadMode::Describe, true);
        self.active_move = None;
        self.release.schedule();
        self.movement.set_player_control(true);
    }

    fn approach_tile(
        &self,
        env: &TrackerEnv<'_>,
        poi: &PointOfInterest,
    ) -> Result<Position, NavError> {
        if let Some(tile) = poi.approach_override() {
            debug!(poi = %poi.name, %tile, "using approach override");
            return Ok(tile);
        }

        let result = self
            .resolver
            .resolve(poi.tile, env.player_tile(), env.paths)
            .ok_or_else(|| no_path(poi))?;
        debug!(
            poi = %poi.name,
            tile = %result.tile,
            tier = %result.tier,
            cost = result.path_cost,
            "approach tile resolved"
        );
        Ok(result.tile)
    }

    fn focused_poi(&self) -> Option<&PointOfInterest> {
        self.catalog.poi(self.focus.category()?, self.focus.item()?)
    }

    fn report(&self, err: &NavError) {
        let text = match err {
            NavError::Vanished { .. } => match self.focus.item() {
                Some(item) => format!("{err}, {item} focused"),
                None => err.to_string(),
            },
            _ => err.to_string(),
        };
        warn!(code = err.error_code(), kind = %err.kind(), "{text}");
        self.narrator.say(&text, true);
    }

    fn say(&self, text: &str) {
        debug!(text, "narrate");
        self.narrator.say(text, true);
    }
}

fn no_path(poi: &PointOfInterest) -> NavError {
    NavError::NoPath {
        name: poi.name.clone(),
        tile: poi.tile,
    }
}
