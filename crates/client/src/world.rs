//! ASCII sandbox world backing the tracker oracles.
//!
//! A map file starts with the location name, followed by the grid and, after
//! a blank line, a legend:
//!
//! ```text
//! Saloon
//! #######
//! #@..C.#
//! ###D###
//!
//! C object items Chest
//! L npc 1 Lewis
//! D door Town
//! ```
//!
//! `#` is a wall, `.` floor and `@` the player. Legend glyphs declare
//! objects (solid, reported under their category), NPCs (solid, patrolling
//! horizontally at the given speed) and doors (walkable entrances).

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result, bail};
use tracker_core::{
    Bearing, EntranceOracle, LocationSearch, PathOracle, Position, ScannedTile, TrackerEnv,
    WorldOracle,
};
use tracker_runtime::NpcSpeedControl;

/// Category the location search reports NPCs under.
pub const NPC_CATEGORY: &str = "npcs";

/// Current NPC speeds, shared between the world and the release scheduler.
#[derive(Clone, Debug, Default)]
pub struct SpeedBoard(Arc<Mutex<BTreeMap<String, u32>>>);

impl SpeedBoard {
    pub fn get(&self, npc: &str) -> u32 {
        self.lock().get(npc).copied().unwrap_or_default()
    }

    pub fn set(&self, npc: &str, speed: u32) {
        self.lock().insert(npc.to_owned(), speed);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, u32>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NpcSpeedControl for SpeedBoard {
    fn set_speed(&self, npc: &str, speed: u32) {
        tracing::debug!(npc, speed, "npc speed restored");
        self.set(npc, speed);
    }
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub name: String,
    pub position: Position,
    heading: Bearing,
}

#[derive(Clone, Debug)]
struct Object {
    name: String,
    category: String,
}

/// Mutable sandbox state. Implements every tracker oracle.
pub struct SandboxWorld {
    location: String,
    width: i32,
    height: i32,
    walls: HashSet<Position>,
    objects: HashMap<Position, Object>,
    doors: Vec<(String, Position)>,
    npcs: Vec<Npc>,
    speeds: SpeedBoard,
    player: Position,
    menu_open: bool,
}

impl SandboxWorld {
    pub fn parse(source: &str) -> Result<Self> {
        let mut lines = source.lines();
        let location = lines
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .context("map is missing its location name")?
            .to_owned();

        let grid: Vec<&str> = lines.by_ref().take_while(|line| !line.trim().is_empty()).collect();
        let legend = parse_legend(lines)?;

        let mut world = Self {
            location,
            width: 0,
            height: grid.len() as i32,
            walls: HashSet::new(),
            objects: HashMap::new(),
            doors: Vec::new(),
            npcs: Vec::new(),
            speeds: SpeedBoard::default(),
            player: Position::ORIGIN,
            menu_open: false,
        };
        let mut player = None;

        for (y, row) in grid.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let tile = Position::new(x as i32, y as i32);
                world.width = world.width.max(tile.x + 1);
                match glyph {
                    '#' => {
                        world.walls.insert(tile);
                    }
                    '.' | ' ' => {}
                    '@' => player = Some(tile),
                    other => match legend.get(&other) {
                        Some(Legend::Object { category, name }) => {
                            world.objects.insert(
                                tile,
                                Object {
                                    name: name.clone(),
                                    category: category.clone(),
                                },
                            );
                        }
                        Some(Legend::Npc { speed, name }) => {
                            world.speeds.set(name, *speed);
                            world.npcs.push(Npc {
                                name: name.clone(),
                                position: tile,
                                heading: Bearing::East,
                            });
                        }
                        Some(Legend::Door { name }) => world.doors.push((name.clone(), tile)),
                        None => bail!("unknown glyph {other:?} at {tile}"),
                    },
                }
            }
        }

        world.player = player.context("map has no player '@'")?;
        Ok(world)
    }

    pub fn env(&self) -> TrackerEnv<'_> {
        TrackerEnv::from_host(self)
    }

    pub fn speeds(&self) -> &SpeedBoard {
        &self.speeds
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// Glyph drawn for `tile`, ignoring the player.
    pub fn glyph(&self, tile: Position) -> char {
        if self.walls.contains(&tile) {
            return '#';
        }
        if let Some(npc) = self.npcs.iter().find(|npc| npc.position == tile) {
            return npc.name.chars().next().unwrap_or('n');
        }
        if let Some(object) = self.objects.get(&tile) {
            return object.name.chars().next().unwrap_or('o');
        }
        if self.doors.iter().any(|(_, door)| *door == tile) {
            return '+';
        }
        '.'
    }

    /// True if nothing occupies `tile`.
    pub fn is_walkable(&self, tile: Position) -> bool {
        self.in_bounds(tile)
            && !self.walls.contains(&tile)
            && !self.objects.contains_key(&tile)
            && !self.npcs.iter().any(|npc| npc.position == tile)
    }

    /// Moves the player one tile. Returns false if the tile is occupied.
    pub fn step_player(&mut self, bearing: Bearing) -> bool {
        let (dx, dy) = bearing.delta();
        let next = self.player.offset(dx, dy);
        if !self.is_walkable(next) {
            return false;
        }
        self.player = next;
        true
    }

    pub fn move_player_to(&mut self, tile: Position) {
        self.player = tile;
    }

    /// NPCs standing next to the player.
    pub fn npcs_adjacent_to_player(&self) -> Vec<String> {
        self.npcs
            .iter()
            .filter(|npc| {
                let dx = (npc.position.x - self.player.x).abs();
                let dy = (npc.position.y - self.player.y).abs();
                dx.max(dy) == 1
            })
            .map(|npc| npc.name.clone())
            .collect()
    }

    /// Advances every NPC along its patrol by its current speed.
    pub fn tick_npcs(&mut self) {
        for index in 0..self.npcs.len() {
            let speed = self.speeds.get(&self.npcs[index].name);
            for _ in 0..speed {
                self.patrol_step(index);
            }
        }
    }

    fn patrol_step(&mut self, index: usize) {
        let Npc {
            position, heading, ..
        } = self.npcs[index].clone();

        for bearing in [heading, opposite(heading)] {
            let (dx, dy) = bearing.delta();
            let next = position.offset(dx, dy);
            if self.is_walkable(next) && next != self.player {
                let npc = &mut self.npcs[index];
                npc.position = next;
                npc.heading = bearing;
                return;
            }
        }
    }

    fn in_bounds(&self, tile: Position) -> bool {
        (0..self.width).contains(&tile.x) && (0..self.height).contains(&tile.y)
    }

    fn neighbours(tile: Position) -> impl Iterator<Item = Position> {
        Bearing::ALL.into_iter().map(move |bearing| {
            let (dx, dy) = bearing.delta();
            tile.offset(dx, dy)
        })
    }

    fn occupant(&self, tile: Position) -> Option<ScannedTile> {
        if let Some(npc) = self.npcs.iter().find(|npc| npc.position == tile) {
            return Some(ScannedTile::new(tile, npc.name.clone(), NPC_CATEGORY));
        }
        self.objects
            .get(&tile)
            .map(|object| ScannedTile::new(tile, object.name.clone(), object.category.clone()))
    }
}

impl WorldOracle for SandboxWorld {
    fn player_tile(&self) -> Position {
        self.player
    }

    fn location_name(&self) -> &str {
        &self.location
    }

    fn has_quest(&self, _quest: u32) -> bool {
        false
    }

    fn has_flag(&self, _flag: &str) -> bool {
        false
    }

    fn input_blocked(&self) -> bool {
        self.menu_open
    }
}

impl LocationSearch for SandboxWorld {
    /// Breadth-first flood from the player over walkable tiles, reporting
    /// each occupied tile the first time it borders the flood.
    fn search(&self) -> Vec<ScannedTile> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([self.player]);
        let mut queue = VecDeque::from([self.player]);

        while let Some(tile) = queue.pop_front() {
            for next in Self::neighbours(tile) {
                if !self.in_bounds(next) || !seen.insert(next) {
                    continue;
                }
                if let Some(occupant) = self.occupant(next) {
                    found.push(occupant);
                } else if self.is_walkable(next) {
                    queue.push_back(next);
                }
            }
        }

        found
    }
}

impl EntranceOracle for SandboxWorld {
    fn entrances(&self) -> Vec<(String, Position)> {
        self.doors.clone()
    }
}

impl PathOracle for SandboxWorld {
    fn find_path(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if from == to {
            return Some(Vec::new());
        }
        if !self.is_walkable(to) {
            return None;
        }

        let mut parents = HashMap::from([(from, from)]);
        let mut queue = VecDeque::from([from]);

        while let Some(tile) = queue.pop_front() {
            if tile == to {
                let mut path = vec![to];
                let mut at = to;
                while let Some(&parent) = parents.get(&at) {
                    if parent == from {
                        break;
                    }
                    path.push(parent);
                    at = parent;
                }
                path.reverse();
                return Some(path);
            }

            for next in Self::neighbours(tile) {
                if self.is_walkable(next) && !parents.contains_key(&next) {
                    parents.insert(next, tile);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

enum Legend {
    Object { category: String, name: String },
    Npc { speed: u32, name: String },
    Door { name: String },
}

fn parse_legend<'a>(lines: impl Iterator<Item = &'a str>) -> Result<HashMap<char, Legend>> {
    let mut legend = HashMap::new();

    for line in lines.map(str::trim).filter(|line| !line.is_empty()) {
        let mut parts = line.splitn(3, ' ');
        let (Some(glyph), Some(kind), Some(rest)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("malformed legend line: {line:?}");
        };
        let mut chars = glyph.chars();
        let (Some(glyph), None) = (chars.next(), chars.next()) else {
            bail!("legend glyph must be a single character: {line:?}");
        };

        let entry = match kind {
            "object" => {
                let (category, name) = rest
                    .split_once(' ')
                    .with_context(|| format!("object needs a category and a name: {line:?}"))?;
                Legend::Object {
                    category: category.to_owned(),
                    name: name.to_owned(),
                }
            }
            "npc" => {
                let (speed, name) = rest
                    .split_once(' ')
                    .with_context(|| format!("npc needs a speed and a name: {line:?}"))?;
                Legend::Npc {
                    speed: speed
                        .parse()
                        .with_context(|| format!("invalid npc speed: {line:?}"))?,
                    name: name.to_owned(),
                }
            }
            "door" => Legend::Door {
                name: rest.to_owned(),
            },
            other => bail!("unknown legend kind {other:?}"),
        };
        legend.insert(glyph, entry);
    }

    Ok(legend)
}

fn opposite(bearing: Bearing) -> Bearing {
    match bearing {
        Bearing::North => Bearing::South,
        Bearing::East => Bearing::West,
        Bearing::South => Bearing::North,
        Bearing::West => Bearing::East,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "Cellar
#######
#@..C.#
#.#...#
#..L..#
###D###

C object items Cask
L npc 0 Linus
D door Farm
";

    #[test]
    fn parses_grid_and_legend() {
        let world = SandboxWorld::parse(ROOM).unwrap();
        assert_eq!(world.location_name(), "Cellar");
        assert_eq!(world.player_tile(), Position::new(1, 1));
        assert_eq!(world.size(), (7, 5));
        assert_eq!(world.entrances(), vec![("Farm".to_owned(), Position::new(3, 4))]);
        assert_eq!(world.glyph(Position::new(4, 1)), 'C');
        assert_eq!(world.glyph(Position::new(3, 4)), '+');
    }

    #[test]
    fn rejects_unknown_glyphs() {
        let err = SandboxWorld::parse("Void\n#@X#\n").err().unwrap();
        assert!(err.to_string().contains("unknown glyph"));
    }

    #[test]
    fn search_reports_occupants_in_flood_order() {
        let world = SandboxWorld::parse(ROOM).unwrap();
        let names: Vec<_> = world.search().into_iter().map(|tile| tile.name).collect();
        assert_eq!(names, ["Cask", "Linus"]);
    }

    #[test]
    fn paths_avoid_walls_and_occupants() {
        let world = SandboxWorld::parse(ROOM).unwrap();
        let path = world
            .find_path(Position::new(1, 1), Position::new(5, 2))
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.last(), Some(&Position::new(5, 2)));
        assert!(path.iter().all(|&tile| world.is_walkable(tile)));

        assert_eq!(world.find_path(Position::new(1, 1), Position::new(4, 1)), None);
        assert_eq!(
            world.find_path(Position::new(1, 1), Position::new(1, 1)),
            Some(vec![])
        );
    }

    #[test]
    fn frozen_npcs_stay_put() {
        let mut world = SandboxWorld::parse(ROOM).unwrap();
        world.tick_npcs();
        assert_eq!(world.npcs()[0].position, Position::new(3, 3));

        world.speeds().set("Linus", 1);
        world.tick_npcs();
        assert_eq!(world.npcs()[0].position, Position::new(4, 3));
    }
}
