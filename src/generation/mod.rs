//! # Generation Module
//!
//! Procedural level generation on a fixed sector grid.
//!
//! Each stage of the pipeline lives in its own module, leaves first:
//! sector partition, room synthesis, corridor building, the room graph, the
//! connectivity repair loop with door pruning, and lock-and-key placement. The
//! [`SectorDungeonGenerator`] runs them in order and assembles a [`Level`].

pub mod connectivity;
pub mod corridors;
pub mod dungeon;
pub mod graph;
pub mod locks;
pub mod rooms;
pub mod sectors;

pub use connectivity::*;
pub use corridors::*;
pub use dungeon::*;
pub use graph::*;
pub use locks::*;
pub use rooms::*;
pub use sectors::*;

use crate::game::{KeyColor, Level};
use crate::{config, GridlockError, GridlockResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for level generation.
///
/// Holds every constant the pipeline reads. A configuration that passes
/// [`GenerationConfig::validate`] always yields a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Sectors per side of the grid (N, giving N² rooms)
    pub grid_size: usize,
    /// Map width in tiles
    pub map_width: i32,
    /// Map height in tiles
    pub map_height: i32,
    /// Minimum room width, walls included
    pub min_room_width: i32,
    /// Maximum room width, walls included
    pub max_room_width: i32,
    /// Minimum room height, walls included
    pub min_room_height: i32,
    /// Maximum room height, walls included
    pub max_room_height: i32,
    /// Cells left free on each sector side for corridors
    pub sector_padding: i32,
    /// Minimum distance between a door and a wall corner
    pub door_edge_offset: i32,
    /// Extra inset of exit and key cells from the interior edge
    pub exit_wall_offset: i32,
    /// Number of lock-and-key pairs to attempt
    pub max_locks: usize,
    /// Attempts for random position searches
    pub max_placement_attempts: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridlock::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.grid_size, 3);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid_size: config::DEFAULT_GRID_SIZE,
            map_width: config::DEFAULT_MAP_WIDTH,
            map_height: config::DEFAULT_MAP_HEIGHT,
            min_room_width: config::MIN_ROOM_WIDTH,
            max_room_width: config::MAX_ROOM_WIDTH,
            min_room_height: config::MIN_ROOM_HEIGHT,
            max_room_height: config::MAX_ROOM_HEIGHT,
            sector_padding: config::SECTOR_PADDING,
            door_edge_offset: config::DOOR_EDGE_OFFSET,
            exit_wall_offset: config::EXIT_WALL_OFFSET,
            max_locks: config::MAX_LOCKED_DOORS,
            max_placement_attempts: config::MAX_PLACEMENT_ATTEMPTS,
        }
    }

    /// Creates a configuration for testing with the smallest rooms that fit.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            map_width: 45,
            map_height: 33,
            max_room_width: 9,
            max_room_height: 7,
            ..Self::new(seed)
        }
    }

    /// Creates a configuration for a larger 4×4 grid.
    pub fn for_detailed_generation(seed: u64) -> Self {
        Self {
            grid_size: 4,
            map_width: 120,
            map_height: 60,
            max_room_width: 24,
            max_room_height: 11,
            max_placement_attempts: 200,
            ..Self::new(seed)
        }
    }

    /// Width of one sector in tiles.
    pub fn sector_width(&self) -> i32 {
        self.map_width / self.grid_divisor()
    }

    /// Height of one sector in tiles.
    pub fn sector_height(&self) -> i32 {
        self.map_height / self.grid_divisor()
    }

    fn grid_divisor(&self) -> i32 {
        i32::try_from(self.grid_size.max(1)).unwrap_or(i32::MAX)
    }

    /// Checks that these constants always produce a level.
    pub fn validate(&self) -> GridlockResult<()> {
        if self.grid_size < 2 {
            return Err(GridlockError::InvalidConfig(format!(
                "grid size must be at least 2, got {}",
                self.grid_size
            )));
        }

        let fits = i32::try_from(self.grid_size).is_ok()
            && self.grid_size.checked_mul(self.grid_size).is_some();
        if !fits {
            return Err(GridlockError::InvalidConfig(format!(
                "grid size {} is too large",
                self.grid_size
            )));
        }

        if self.min_room_width > self.max_room_width || self.min_room_height > self.max_room_height {
            return Err(GridlockError::InvalidConfig(format!(
                "room size range is empty: width {}..={}, height {}..={}",
                self.min_room_width, self.max_room_width, self.min_room_height, self.max_room_height
            )));
        }

        let usable_width = self.sector_width() - 2 * self.sector_padding;
        let usable_height = self.sector_height() - 2 * self.sector_padding;
        if self.min_room_width > usable_width || self.min_room_height > usable_height {
            return Err(GridlockError::InvalidConfig(format!(
                "minimum room {}x{} does not fit usable sector area {}x{}",
                self.min_room_width, self.min_room_height, usable_width, usable_height
            )));
        }

        if self.sector_padding < 1 {
            return Err(GridlockError::InvalidConfig(
                "sector padding must leave room for corridors".to_string(),
            ));
        }

        // Every wall of a minimum room needs at least one door slot
        if self.door_edge_offset < 1
            || self.min_room_width - 2 * self.door_edge_offset < 1
            || self.min_room_height - 2 * self.door_edge_offset < 1
        {
            return Err(GridlockError::InvalidConfig(format!(
                "door edge offset {} leaves no door slot on a {}x{} room",
                self.door_edge_offset, self.min_room_width, self.min_room_height
            )));
        }

        let inset_width = self.min_room_width - 2 - 2 * self.exit_wall_offset;
        let inset_height = self.min_room_height - 2 - 2 * self.exit_wall_offset;
        if self.exit_wall_offset < 0 || inset_width < 1 || inset_height < 1 {
            return Err(GridlockError::InvalidConfig(format!(
                "exit wall offset {} leaves no exit cell on a {}x{} room",
                self.exit_wall_offset, self.min_room_width, self.min_room_height
            )));
        }

        if self.max_locks > KeyColor::ALL.len() {
            return Err(GridlockError::InvalidConfig(format!(
                "at most {} locks are supported, got {}",
                KeyColor::ALL.len(),
                self.max_locks
            )));
        }

        if self.max_placement_attempts == 0 {
            return Err(GridlockError::InvalidConfig(
                "placement attempts must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> GridlockResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> GridlockResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Generators receive the random source explicitly so that a seed fully
/// determines their output.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> GridlockResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> GridlockResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::game::Direction;
    use rand::SeedableRng;
    use std::collections::{BTreeSet, HashSet};

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Derives the seed of level `depth` from the seed of a run.
    ///
    /// Depth 0 keeps the base seed so a single generated level matches
    /// [`create_rng`] for the same config.
    pub fn level_seed(base: u64, depth: u32) -> u64 {
        if depth == 0 {
            return base;
        }
        // SplitMix64 finaliser
        let mut z = base.wrapping_add(u64::from(depth).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fail(message: String) -> GridlockResult<()> {
        Err(GridlockError::GenerationFailed(message))
    }

    /// Validates that a level meets every structural and puzzle guarantee.
    pub fn validate_level(level: &Level, config: &GenerationConfig) -> GridlockResult<()> {
        let grid = SectorGrid::new(config);
        let room_count = config.grid_size * config.grid_size;

        if level.rooms.len() != room_count {
            return fail(format!("expected {} rooms, found {}", room_count, level.rooms.len()));
        }

        // Geometry: containment, no overlap, doors on walls
        for (index, room) in level.rooms.iter().enumerate() {
            if room.id != index {
                return fail(format!("room at index {} has id {}", index, room.id));
            }
            let sector = grid.sector(index);
            if !sector.contains_room(room) {
                return fail(format!("room {} leaves its sector bounds", index));
            }
            for other in &level.rooms[index + 1..] {
                if room.overlaps(other) {
                    return fail(format!("rooms {} and {} overlap", room.id, other.id));
                }
            }
            for door in &room.doors {
                if !room.is_on_wall(door.position, door.direction) {
                    return fail(format!("door at {} is not on room {}'s wall", door.position, index));
                }
            }
        }

        // Corridors join the outward cells of opposite doors in different rooms
        for corridor in &level.corridors {
            let (Some(first), Some(last)) = (corridor.start(), corridor.end()) else {
                return fail("empty corridor".to_string());
            };
            let first_door = find_door_by_outward(level, first);
            let last_door = find_door_by_outward(level, last);
            match (first_door, last_door) {
                (Some((a, da)), Some((b, db))) if a != b && da == db.opposite() => {}
                _ => return fail(format!("corridor {} -> {} does not join facing doors", first, last)),
            }
        }

        // Connectivity over every connection, locked or not
        let mut graph = level.graph.clone();
        graph.dfs(level.start_room);
        if !graph.is_fully_connected() {
            return fail(format!("rooms unreachable from start room {}", level.start_room));
        }

        let start_rooms = level.rooms.iter().filter(|room| room.is_start_room).count();
        if start_rooms != 1 || !level.rooms[level.start_room].is_start_room {
            return fail(format!("expected one start room, found {}", start_rooms));
        }

        if level.start_room == level.exit_room {
            return fail("exit room is the start room".to_string());
        }
        if level.map.is_walkable(level.exit) || !level.rooms[level.exit_room].is_interior(level.exit) {
            return fail(format!("exit {} is not a reserved floor cell", level.exit));
        }

        // Locks: distinct colors, bounded count, one reachable key each
        let locked = level.locked_doors();
        if locked.len() > config.max_locks || locked.len() != level.keys.len() {
            return fail(format!(
                "{} locked doors with {} keys (max {})",
                locked.len(),
                level.keys.len(),
                config.max_locks
            ));
        }
        let mut colors = BTreeSet::new();
        for (room, door) in &locked {
            let Some(color) = door.color else {
                return fail(format!("locked door in room {} has no color", room));
            };
            if !colors.insert(color) {
                return fail(format!("color {} is used by two locks", color));
            }
            let keys: Vec<_> = level.keys.iter().filter(|key| key.color == color).collect();
            let [key] = keys.as_slice() else {
                return fail(format!("expected one {} key, found {}", color, keys.len()));
            };
            let mut trial = level.graph.clone();
            trial.isolate(*room);
            trial.dfs(level.start_room);
            if !trial.is_connected(key.room) {
                return fail(format!(
                    "{} key in room {} needs a path through locked room {}",
                    color, key.room, room
                ));
            }
        }

        let key_cells: HashSet<_> = level.keys.iter().map(|key| key.position).collect();
        if key_cells.len() != level.keys.len() || key_cells.contains(&level.exit) {
            return fail("keys share a cell with each other or the exit".to_string());
        }

        if level.map.is_empty() {
            return fail("level has no walkable tiles".to_string());
        }

        Ok(())
    }

    fn find_door_by_outward(level: &Level, cell: crate::Position) -> Option<(usize, Direction)> {
        level.rooms.iter().find_map(|room| {
            room.doors
                .iter()
                .find(|door| door.outward() == cell)
                .map(|door| (room.id, door.direction))
        })
    }
}
