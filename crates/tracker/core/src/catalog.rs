//! Categorised snapshot of the points of interest around the player.
//!
//! A [`Catalog`] is rebuilt wholesale by [`SpatialCatalog::scan`]; nothing
//! mutates it afterwards. Categories keep first-discovery order. Items keep
//! discovery order (closest first) or are sorted by name, depending on
//! [`SortMode`].

use crate::oracle::TrackerEnv;
use crate::poi::PointOfInterest;
use crate::special::SpecialPointTable;

/// Category key used by the entrance pass.
pub const ENTRANCES_CATEGORY: &str = "entrances";

/// Category key used by the special-points pass.
pub const SPECIAL_CATEGORY: &str = "special";

/// Ordering applied to items inside each category.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortMode {
    /// Closest first, in the order the breadth-first search met them.
    Proximity,
    /// Lexicographic by name.
    #[default]
    Alphabetical,
}

impl SortMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            SortMode::Proximity => SortMode::Alphabetical,
            SortMode::Alphabetical => SortMode::Proximity,
        }
    }

    /// Label used when announcing the mode.
    pub const fn label(self) -> &'static str {
        match self {
            SortMode::Proximity => "Proximity",
            SortMode::Alphabetical => "Name",
        }
    }
}

/// Named group of points of interest, unique by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    name: String,
    items: Vec<PointOfInterest>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[PointOfInterest] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&PointOfInterest> {
        self.items.first()
    }

    pub fn get(&self, name: &str) -> Option<&PointOfInterest> {
        self.items.iter().find(|poi| poi.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|poi| poi.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Inserts `poi` unless an item with the same name exists; the first
    /// (closest) sighting wins. Returns whether the item was added.
    fn insert_first(&mut self, poi: PointOfInterest) -> bool {
        if self.contains(&poi.name) {
            return false;
        }
        self.items.push(poi);
        true
    }

    fn sort_by_name(&mut self) {
        self.items.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// Ordered mapping from category name to [`Category`]. Never holds an empty category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == category)
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == category)
    }

    pub fn category_at(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// Looks up a single point of interest.
    pub fn poi(&self, category: &str, item: &str) -> Option<&PointOfInterest> {
        self.get(category)?.get(item)
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }

    fn bucket_mut(&mut self, category: &str) -> &mut Category {
        let index = match self.index_of(category) {
            Some(index) => index,
            None => {
                self.categories.push(Category::new(category));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index]
    }

    fn insert(&mut self, category: &str, poi: PointOfInterest) -> bool {
        self.bucket_mut(category).insert_first(poi)
    }

    fn drop_if_empty(&mut self, category: &str) {
        self.categories.retain(|c| c.name != category || !c.is_empty());
    }
}

/// Builds catalogs from the host world.
#[derive(Clone, Debug, Default)]
pub struct SpatialCatalog {
    special_points: SpecialPointTable,
    sort_mode: SortMode,
}

impl SpatialCatalog {
    pub fn new(special_points: SpecialPointTable, sort_mode: SortMode) -> Self {
        Self {
            special_points,
            sort_mode,
        }
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) {
        self.sort_mode = sort_mode;
    }

    pub fn special_points(&self) -> &SpecialPointTable {
        &self.special_points
    }

    /// Scans the world and returns a fresh catalog.
    ///
    /// Passes run in a fixed order: search results, entrances, special
    /// points. The result depends only on what the oracles report, so equal
    /// inputs give equal catalogs.
    pub fn scan(&self, env: &TrackerEnv<'_>) -> Catalog {
        let mut catalog = Catalog::default();

        for tile in env.search.search() {
            catalog.insert(
                &tile.category,
                PointOfInterest::scanned(tile.name, tile.position),
            );
        }

        self.add_entrances(&mut catalog, env);
        self.add_special_points(&mut catalog, env);

        if self.sort_mode == SortMode::Alphabetical {
            for category in &mut catalog.categories {
                category.sort_by_name();
            }
        }

        catalog
    }

    fn add_entrances(&self, catalog: &mut Catalog, env: &TrackerEnv<'_>) {
        catalog.bucket_mut(ENTRANCES_CATEGORY);
        for (name, tile) in env.entrances.entrances() {
            catalog.insert(ENTRANCES_CATEGORY, PointOfInterest::entrance(name, tile));
        }
        catalog.drop_if_empty(ENTRANCES_CATEGORY);
    }

    fn add_special_points(&self, catalog: &mut Catalog, env: &TrackerEnv<'_>) {
        catalog.bucket_mut(SPECIAL_CATEGORY);
        let location = env.world.location_name();
        for point in self.special_points.active_for(location, env.world) {
            catalog.insert(SPECIAL_CATEGORY, point.to_poi());
        }
        catalog.drop_if_empty(SPECIAL_CATEGORY);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::oracle::{EntranceOracle, LocationSearch, PathOracle, ScannedTile, WorldOracle};
    use crate::special::{SpecialGate, SpecialPoint};

    /// In-memory host used across the crate's tests.
    #[derive(Default)]
    pub(crate) struct FakeWorld {
        pub player: Position,
        pub location: String,
        pub tiles: Vec<ScannedTile>,
        pub entrances: Vec<(String, Position)>,
        pub quests: Vec<u32>,
    }

    impl WorldOracle for FakeWorld {
        fn player_tile(&self) -> Position {
            self.player
        }

        fn location_name(&self) -> &str {
            &self.location
        }

        fn has_quest(&self, quest: u32) -> bool {
            self.quests.contains(&quest)
        }

        fn has_flag(&self, _flag: &str) -> bool {
            false
        }
    }

    impl LocationSearch for FakeWorld {
        fn search(&self) -> Vec<ScannedTile> {
            self.tiles.clone()
        }
    }

    impl EntranceOracle for FakeWorld {
        fn entrances(&self) -> Vec<(String, Position)> {
            self.entrances.clone()
        }
    }

    impl PathOracle for FakeWorld {
        fn find_path(&self, _from: Position, _to: Position) -> Option<Vec<Position>> {
            None
        }
    }

    fn saloon() -> FakeWorld {
        FakeWorld {
            location: "Saloon".into(),
            tiles: vec![
                ScannedTile::new(Position::new(5, 5), "Chest", "items"),
                ScannedTile::new(Position::new(10, 10), "Lewis", "npcs"),
            ],
            ..FakeWorld::default()
        }
    }

    fn table() -> SpecialPointTable {
        SpecialPointTable::new(vec![
            SpecialPoint::new("Saloon", "Gus's Fridge", Position::new(18, 16)),
            SpecialPoint::new("Town", "Hiding Bush", Position::new(28, 13)).with_gate(
                SpecialGate::QuestWithoutFlag {
                    quest: 31,
                    flag: "magnifying_glass".into(),
                },
            ),
        ])
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.category_names().collect()
    }

    #[test]
    fn categories_follow_discovery_then_passes() {
        let world = saloon();
        let scanner = SpatialCatalog::new(table(), SortMode::Proximity);

        let catalog = scanner.scan(&TrackerEnv::from_host(&world));

        assert_eq!(names(&catalog), vec!["items", "npcs", "special"]);
        let fridge = catalog.poi("special", "Gus's Fridge").unwrap();
        assert_eq!(fridge.tile, Position::new(18, 16));
    }

    #[test]
    fn first_sighting_keeps_closest_tile() {
        let mut world = saloon();
        world.tiles.push(ScannedTile::new(Position::new(40, 40), "Chest", "items"));

        let catalog = SpatialCatalog::default().scan(&TrackerEnv::from_host(&world));

        assert_eq!(catalog.get("items").unwrap().len(), 1);
        assert_eq!(catalog.poi("items", "Chest").unwrap().tile, Position::new(5, 5));
    }

    #[test]
    fn empty_passes_leave_no_bucket() {
        let mut world = saloon();
        world.location = "Farm".into();

        let catalog = SpatialCatalog::new(table(), SortMode::Proximity)
            .scan(&TrackerEnv::from_host(&world));

        assert_eq!(names(&catalog), vec!["items", "npcs"]);
        assert!(catalog.categories().iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn entrances_merge_into_existing_bucket() {
        let mut world = saloon();
        world.tiles.push(ScannedTile::new(
            Position::new(3, 3),
            "Cellar Hatch",
            ENTRANCES_CATEGORY,
        ));
        world.entrances = vec![
            ("Town".into(), Position::new(14, 25)),
            ("Cellar Hatch".into(), Position::new(9, 9)),
        ];

        let catalog = SpatialCatalog::new(SpecialPointTable::default(), SortMode::Proximity)
            .scan(&TrackerEnv::from_host(&world));

        assert_eq!(names(&catalog), vec!["items", "npcs", "entrances"]);
        let entrances = catalog.get(ENTRANCES_CATEGORY).unwrap();
        assert_eq!(entrances.len(), 2);
        assert_eq!(
            entrances.get("Cellar Hatch").unwrap().tile,
            Position::new(3, 3)
        );
    }

    #[test]
    fn gated_points_follow_predicate() {
        let mut world = FakeWorld {
            location: "Town".into(),
            ..FakeWorld::default()
        };
        let scanner = SpatialCatalog::new(table(), SortMode::Proximity);

        assert!(scanner.scan(&TrackerEnv::from_host(&world)).is_empty());

        world.quests.push(31);
        let catalog = scanner.scan(&TrackerEnv::from_host(&world));
        assert!(catalog.poi(SPECIAL_CATEGORY, "Hiding Bush").is_some());
    }

    #[test]
    fn alphabetical_mode_sorts_items_not_categories() {
        let world = FakeWorld {
            location: "Town".into(),
            tiles: vec![
                ScannedTile::new(Position::new(1, 0), "Marnie", "npcs"),
                ScannedTile::new(Position::new(2, 0), "Barrel", "objects"),
                ScannedTile::new(Position::new(3, 0), "Lewis", "npcs"),
                ScannedTile::new(Position::new(4, 0), "Abigail", "npcs"),
            ],
            ..FakeWorld::default()
        };
        let env = TrackerEnv::from_host(&world);
        let item_names = |catalog: &Catalog| -> Vec<String> {
            catalog
                .get("npcs")
                .unwrap()
                .items()
                .iter()
                .map(|p| p.name.clone())
                .collect()
        };

        let by_proximity = SpatialCatalog::new(table(), SortMode::Proximity).scan(&env);
        let by_name = SpatialCatalog::new(table(), SortMode::Alphabetical).scan(&env);

        assert_eq!(item_names(&by_proximity), ["Marnie", "Lewis", "Abigail"]);
        assert_eq!(item_names(&by_name), ["Abigail", "Lewis", "Marnie"]);
        assert_eq!(names(&by_name), vec!["npcs", "objects"]);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let world = saloon();
        let scanner = SpatialCatalog::new(table(), SortMode::Alphabetical);
        let env = TrackerEnv::from_host(&world);

        assert_eq!(scanner.scan(&env), scanner.scan(&env));
    }
}
