//! Event loop tying the sandbox world, the navigation director and the
//! terminal UI together.
//!
//! Three clocks drive the loop: the frame tick polls the keyboard, the walk
//! tick advances auto-navigation one tile, and the NPC tick moves patrols.
//! Arrivals are pumped right after each walk step.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self as term_event, Event as TermEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracker_core::{Bearing, Position, SpecialPointTable, WorldOracle};
use tracker_runtime::{
    MovementDriver, NavigationDirector, NpcSpeedControl, RuntimeConfig, TrackerCommand,
};

use crate::config::ClientConfig;
use crate::host::{MessageLog, WalkStep, Walker};
use crate::input::{InputHandler, KeyAction};
use crate::world::SandboxWorld;

const FRAME_INTERVAL_MS: u64 = 16;
const MESSAGE_PANEL_HEIGHT: u16 = 8;
/// Consecutive blocked walk ticks before auto-navigation gives up.
const MAX_BLOCKED_TICKS: u32 = 20;

pub struct App {
    world: SandboxWorld,
    director: NavigationDirector,
    walker: Walker,
    messages: MessageLog,
    input: InputHandler,
    config: ClientConfig,
    blocked_ticks: u32,
}

impl App {
    pub fn new(
        world: SandboxWorld,
        runtime_config: &RuntimeConfig,
        special_points: SpecialPointTable,
        config: ClientConfig,
    ) -> Self {
        let messages = MessageLog::default();
        let walker = Walker::default();
        let speeds: Arc<dyn NpcSpeedControl> = Arc::new(world.speeds().clone());

        let mut director = NavigationDirector::new(
            runtime_config,
            special_points,
            Box::new(messages.clone()),
            Box::new(walker.clone()),
            speeds,
        );
        director.scan(&world.env());
        messages.push(format!(
            "{}: {} points of interest",
            world.location_name(),
            director.catalog().item_count()
        ));

        Self {
            world,
            director,
            walker,
            messages,
            input: InputHandler::new(),
            config,
            blocked_ticks: 0,
        }
    }

    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut walk = time::interval(self.config.step_interval);
        walk.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut patrol = time::interval(self.config.npc_interval);
        patrol.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.render(terminal)?;

        loop {
            tokio::select! {
                _ = walk.tick() => self.walk_tick(),
                _ = patrol.tick() => self.world.tick_npcs(),
                _ = time::sleep(Duration::from_millis(FRAME_INTERVAL_MS)) => {
                    if self.handle_input_tick()? {
                        break;
                    }
                }
            }
            self.render(terminal)?;
        }

        tracing::info!("sandbox exiting");
        Ok(())
    }

    /// Polls the keyboard without blocking. Returns true on quit.
    fn handle_input_tick(&mut self) -> Result<bool> {
        if !term_event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }

        match term_event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input.handle_key(key);
                Ok(self.apply(action))
            }
            _ => Ok(false),
        }
    }

    /// Applies a key action. Returns true on quit.
    fn apply(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Quit => return true,
            KeyAction::Tracker(button, modifier) => {
                let command = TrackerCommand::from_button(button, modifier);
                tracing::debug!(%button, modifier, ?command, "tracker button");
                self.director.handle(&self.world.env(), command);
            }
            KeyAction::Walk(bearing) => self.manual_step(bearing),
            KeyAction::ToggleMenu => {
                let open = !self.world.menu_open();
                self.world.set_menu_open(open);
                self.messages
                    .push(if open { "Menu opened" } else { "Menu closed" });
            }
            KeyAction::None => {}
        }
        false
    }

    fn manual_step(&mut self, bearing: Bearing) {
        if self.world.menu_open() || !self.walker.has_control() {
            return;
        }
        self.walker.face(bearing);
        if !self.world.step_player(bearing) {
            tracing::debug!(%bearing, "step blocked");
        }
    }

    /// Advances auto-navigation by one tile and completes arrivals.
    fn walk_tick(&mut self) {
        match self.walker.advance(&mut self.world) {
            WalkStep::Idle => return,
            WalkStep::Moved(_) | WalkStep::Arrived(_) => {
                self.blocked_ticks = 0;
                self.hold_adjacent_npcs();
            }
            WalkStep::Blocked => {
                self.blocked_ticks += 1;
                if self.blocked_ticks >= MAX_BLOCKED_TICKS {
                    self.blocked_ticks = 0;
                    self.walker.cancel();
                    self.director.cancel_move();
                    self.messages.push("Path blocked, stopping");
                }
            }
        }
        self.director.pump_arrivals(&self.world.env());
    }

    /// Freezes NPCs next to the player so they do not wander into the path.
    fn hold_adjacent_npcs(&mut self) {
        for npc in self.world.npcs_adjacent_to_player() {
            let speed = self.world.speeds().get(&npc);
            if speed == 0 {
                continue;
            }
            tracing::debug!(npc = %npc, speed, "holding npc");
            self.world.speeds().set(&npc, 0);
            self.director.hold_npc(npc, speed);
        }
    }

    fn focused_tile(&self) -> Option<Position> {
        let focus = self.director.focus();
        self.director
            .catalog()
            .poi(focus.category()?, focus.item()?)
            .map(|poi| poi.tile)
    }

    fn render(&self, terminal: &mut DefaultTerminal) -> Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(MESSAGE_PANEL_HEIGHT),
            ])
            .split(frame.area());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(36)])
            .split(rows[0]);

        self.draw_map(frame, columns[0]);
        self.draw_status(frame, columns[1]);
        self.draw_messages(frame, rows[1]);
    }

    fn draw_map(&self, frame: &mut Frame, area: Rect) {
        let (width, height) = self.world.size();
        let player = self.world.player_tile();
        let focused = self.focused_tile();

        let lines: Vec<Line> = (0..height)
            .map(|y| {
                let spans: Vec<Span> = (0..width)
                    .map(|x| {
                        let tile = Position::new(x, y);
                        let (glyph, mut style) = if tile == player {
                            ('@', Style::default().fg(Color::Yellow))
                        } else {
                            let glyph = self.world.glyph(tile);
                            (glyph, glyph_style(glyph))
                        };
                        if Some(tile) == focused {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        Span::styled(glyph.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = if self.world.menu_open() {
            format!(" {} [menu open] ", self.world.location_name())
        } else {
            format!(" {} ", self.world.location_name())
        };
        let map = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(map, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let label = Style::default().fg(Color::White);
        let focus = self.director.focus();
        let held = self.director.release().held();

        let lines = vec![
            Line::from(vec![
                Span::styled("Player: ", label),
                Span::raw(self.world.player_tile().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Facing: ", label),
                Span::raw(self.walker.facing().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Sort: ", label),
                Span::raw(self.director.sort_mode().label()),
            ]),
            Line::from(vec![
                Span::styled("Focus: ", label),
                Span::raw(format!(
                    "{} / {}",
                    focus.category().unwrap_or("-"),
                    focus.item().unwrap_or("-")
                )),
            ]),
            Line::from(vec![
                Span::styled("Moving: ", label),
                Span::raw(if self.director.is_moving() { "yes" } else { "no" }),
            ]),
            Line::from(vec![
                Span::styled("NPCs: ", label),
                Span::raw(self.world.npcs().len().to_string()),
                Span::raw(if held.is_empty() {
                    String::new()
                } else {
                    format!(" (held: {})", held.join(", "))
                }),
            ]),
            Line::default(),
            Line::from("r/t read, ^ autopath/directions"),
            Line::from("[ ] item, { } category"),
            Line::from("o sort, m menu, q quit"),
        ];

        let status = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Tracker "));
        frame.render_widget(status, area);
    }

    fn draw_messages(&self, frame: &mut Frame, area: Rect) {
        let visible = usize::from(MESSAGE_PANEL_HEIGHT.saturating_sub(2));
        let lines: Vec<Line> = self
            .messages
            .recent(visible)
            .into_iter()
            .map(Line::from)
            .collect();

        let messages = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Messages "));
        frame.render_widget(messages, area);
    }
}

fn glyph_style(glyph: char) -> Style {
    match glyph {
        '#' => Style::default().fg(Color::DarkGray),
        '.' => Style::default().fg(Color::Gray),
        '+' => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Cyan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_runtime::{Button, default_special_points};

    const YARD: &str = "Yard
##########
#@.......#
#........#
#.....C..#
##D#######

C object items Crate
D door Lane
";

    fn app() -> App {
        let world = SandboxWorld::parse(YARD).unwrap();
        App::new(
            world,
            &RuntimeConfig::default(),
            default_special_points().unwrap(),
            ClientConfig::default(),
        )
    }

    #[test]
    fn starts_focused_on_first_item() {
        let app = app();
        assert_eq!(app.director.focus().item(), Some("Crate"));
        assert_eq!(app.focused_tile(), Some(Position::new(6, 3)));
    }

    #[test]
    fn autopath_walks_to_the_approach_tile() {
        let mut app = app();
        assert!(!app.apply(KeyAction::Tracker(Button::Read, true)));
        assert!(app.director.is_moving());
        assert!(!app.walker.has_control());

        for _ in 0..50 {
            if !app.director.is_moving() {
                break;
            }
            app.walk_tick();
        }

        assert!(!app.director.is_moving());
        assert!(app.walker.has_control());
        let last = app.messages.recent(1).pop().unwrap();
        assert!(last.starts_with("Crate is "), "{last}");
        assert!(last.contains(" 1 tiles"), "{last}");
    }

    #[test]
    fn menu_blocks_tracker_and_manual_input() {
        let mut app = app();
        app.apply(KeyAction::ToggleMenu);
        app.apply(KeyAction::Tracker(Button::CycleDown, true));
        assert_eq!(app.director.focus().category(), Some("items"));

        let before = app.world.player_tile();
        app.apply(KeyAction::Walk(Bearing::East));
        assert_eq!(app.world.player_tile(), before);

        app.apply(KeyAction::ToggleMenu);
        app.apply(KeyAction::Walk(Bearing::East));
        assert_eq!(app.world.player_tile(), before.offset(1, 0));
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut app = app();
        assert!(app.apply(KeyAction::Quit));
    }
}
