//! # Dungeon Generation
//!
//! Sector-grid level generation with guaranteed connectivity.
//!
//! This module wires the pipeline stages together and assembles the
//! [`Level`] handed to spawning, rendering and movement code.

use crate::generation::utils;
use crate::{
    build_initial_corridors, generate_rooms, place_locks, prune_unused_doors, repair_connectivity,
    Corridor, GameMap, GenerationConfig, Generator, GridlockError, GridlockResult, Level, Position,
    Room, RoomGraph, SectorGrid,
};
use log::{debug, info};
use rand::rngs::StdRng;
use std::collections::{BTreeSet, HashSet};

/// Primary level generator.
///
/// This generator creates levels by:
/// 1. Generating one room per sector of an N×N grid
/// 2. Joining adjacent rooms through facing doors
/// 3. Forcing corridors until every room is reachable, then pruning dead doors
/// 4. Choosing the start and exit rooms
/// 5. Placing solvable lock-and-key pairs
/// 6. Projecting the walkable map
#[derive(Debug, Clone)]
pub struct SectorDungeonGenerator {
    /// Strategy for the first corridor pass
    pub corridor_strategy: CorridorStrategy,
    /// Depth recorded on generated levels
    pub level_number: u32,
    /// Whether to check every level invariant before returning
    pub validate_output: bool,
}

/// Strategies for the corridor pass that runs before connectivity repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorStrategy {
    /// Random doors per room, joined wherever two facing doors meet
    RandomDoors,
    /// Rooms start without doors; every corridor is forced by the repair loop
    RepairOnly,
}

impl SectorDungeonGenerator {
    /// Creates a new level generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridlock::{GenerationConfig, Generator, SectorDungeonGenerator};
    ///
    /// let config = GenerationConfig::new(7);
    /// let mut rng = gridlock::generation::utils::create_rng(&config);
    /// let level = SectorDungeonGenerator::new().generate(&config, &mut rng).unwrap();
    /// assert_eq!(level.rooms.len(), 9);
    /// ```
    pub fn new() -> Self {
        Self {
            corridor_strategy: CorridorStrategy::RandomDoors,
            level_number: 0,
            validate_output: true,
        }
    }

    /// Creates a generator whose corridors all come from the repair loop.
    pub fn repair_only() -> Self {
        Self {
            corridor_strategy: CorridorStrategy::RepairOnly,
            ..Self::new()
        }
    }

    /// Sets the depth recorded on generated levels.
    pub fn with_level_number(mut self, level_number: u32) -> Self {
        self.level_number = level_number;
        self
    }

    /// Runs the whole pipeline once.
    fn generate_level(&self, config: &GenerationConfig, rng: &mut StdRng) -> GridlockResult<Level> {
        config.validate()?;

        let grid = SectorGrid::new(config);
        let grid_size = config.grid_size;
        let random_doors = self.corridor_strategy == CorridorStrategy::RandomDoors;

        let mut rooms = generate_rooms(&grid, config, rng, random_doors);
        let mut graph = RoomGraph::new(rooms.len());
        let mut corridors = if random_doors {
            build_initial_corridors(&rooms, grid_size, &mut graph, rng)
        } else {
            Vec::new()
        };

        let repairs = repair_connectivity(
            &mut rooms,
            grid_size,
            &mut graph,
            &mut corridors,
            config.door_edge_offset,
            rng,
        )?;
        debug!("Connectivity repair forced {} corridors", repairs);

        prune_unused_doors(&mut rooms, &corridors);

        let (start_room, exit_room, exit) = self.select_start_and_exit(&mut rooms, &graph, config, rng);

        let mut gated_graph = graph.clone();
        let mut reserved = HashSet::from([exit]);
        let mut used_colors = BTreeSet::new();
        let keys = place_locks(
            &mut rooms,
            &mut gated_graph,
            start_room,
            &mut reserved,
            &mut used_colors,
            config,
            rng,
        )?;

        let map = project_map(config, &rooms, &corridors, exit);
        let player_spawn = self.choose_spawn(&rooms[start_room], &map, &reserved, config, rng)?;

        graph.dfs(start_room);
        gated_graph.dfs(start_room);

        let level = Level {
            number: self.level_number,
            grid_size,
            rooms,
            corridors,
            graph,
            gated_graph,
            start_room,
            exit_room,
            exit,
            player_spawn,
            keys,
            map,
        };

        info!(
            "Generated level {}: {} rooms, {} corridors, {} locks, start room {}, exit {} in room {}",
            level.number,
            level.rooms.len(),
            level.corridors.len(),
            level.keys.len(),
            level.start_room,
            level.exit,
            level.exit_room
        );

        if self.validate_output {
            utils::validate_level(&level, config)?;
        }

        Ok(level)
    }

    /// Marks a random start room and takes the last room of a BFS from it as
    /// the exit room.
    fn select_start_and_exit(
        &self,
        rooms: &mut [Room],
        graph: &RoomGraph,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> (usize, usize, Position) {
        use rand::Rng;

        let start_room = rng.gen_range(0..rooms.len());
        rooms[start_room].is_start_room = true;

        let exit_room = graph.furthest_from(start_room);
        let exit = rooms[exit_room].random_inset_position(config.exit_wall_offset, rng);

        debug!("Start room {}, exit room {} at {}", start_room, exit_room, exit);
        (start_room, exit_room, exit)
    }

    /// Picks the player's spawn cell in the start room, away from keys.
    fn choose_spawn(
        &self,
        start: &Room,
        map: &GameMap,
        reserved: &HashSet<Position>,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> GridlockResult<Position> {
        let free = |pos: &Position| map.is_walkable(*pos) && !reserved.contains(pos);

        for _ in 0..config.max_placement_attempts {
            let pos = start.random_inset_position(0, rng);
            if free(&pos) {
                return Ok(pos);
            }
        }

        start
            .interior_positions()
            .into_iter()
            .find(free)
            .ok_or_else(|| {
                GridlockError::GenerationFailed(format!("start room {} has no free spawn cell", start.id))
            })
    }
}

/// Projects room floors, corridor cells and door cells into the walkable map,
/// leaving the exit cell out.
pub fn project_map(
    config: &GenerationConfig,
    rooms: &[Room],
    corridors: &[Corridor],
    exit: Position,
) -> GameMap {
    let mut map = GameMap::new(config.map_width, config.map_height);

    for room in rooms {
        for pos in room.interior_positions() {
            map.add_walkable(pos);
        }
        for door in &room.doors {
            map.add_walkable(door.position);
        }
    }

    for corridor in corridors {
        for &pos in &corridor.path {
            map.add_walkable(pos);
        }
    }

    map.remove_walkable(exit);
    map
}

impl Generator<Level> for SectorDungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> GridlockResult<Level> {
        self.generate_level(config, rng)
    }

    fn validate(&self, level: &Level, config: &GenerationConfig) -> GridlockResult<()> {
        utils::validate_level(level, config)
    }

    fn generator_type(&self) -> &'static str {
        "SectorDungeonGenerator"
    }
}

impl Default for SectorDungeonGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(config: &GenerationConfig) -> Level {
        let mut rng = utils::create_rng(config);
        SectorDungeonGenerator::new().generate(config, &mut rng).unwrap()
    }

    #[test]
    fn test_sector_dungeon_generator_creation() {
        let generator = SectorDungeonGenerator::new();
        assert_eq!(generator.corridor_strategy, CorridorStrategy::RandomDoors);
        assert_eq!(generator.level_number, 0);
        assert!(generator.validate_output);
        assert_eq!(generator.generator_type(), "SectorDungeonGenerator");

        let repair = SectorDungeonGenerator::repair_only().with_level_number(4);
        assert_eq!(repair.corridor_strategy, CorridorStrategy::RepairOnly);
        assert_eq!(repair.level_number, 4);
    }

    #[test]
    fn test_generation_with_default_config() {
        let config = GenerationConfig::new(12345);
        let level = generate(&config);

        assert_eq!(level.rooms.len(), 9);
        assert!(!level.corridors.is_empty());
        assert_ne!(level.start_room, level.exit_room);
        assert!(level.rooms[level.start_room].is_start_room);
        assert!(!level.map.is_walkable(level.exit));
        assert!(level.map.is_walkable(level.player_spawn));
        assert!(level.start().is_interior(level.player_spawn));
        assert!(level.keys.len() <= config.max_locks);
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = GenerationConfig::new(777);
        let a = generate(&config);
        let b = generate(&config);

        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.corridors, b.corridors);
        assert_eq!(a.exit, b.exit);
        assert_eq!(a.keys, b.keys);
        assert_eq!(a.map, b.map);
    }

    #[test]
    fn test_map_projection() {
        let config = GenerationConfig::new(31);
        let level = generate(&config);

        for room in &level.rooms {
            for pos in room.interior_positions() {
                assert_eq!(level.map.is_walkable(pos), pos != level.exit);
            }
            for door in &room.doors {
                assert!(level.map.is_walkable(door.position));
            }
            // Walls other than doors stay solid
            assert!(!level.map.is_walkable(room.top_left));
            assert!(!level.map.is_walkable(room.bottom_right));
        }
        for corridor in &level.corridors {
            assert!(corridor.path.iter().all(|&pos| level.map.is_walkable(pos)));
        }

        // Nothing outside floors, doors and corridors is walkable
        for &pos in level.map.walkable_positions() {
            let in_room = level.rooms.iter().any(|room| room.is_interior(pos));
            let is_door = level.door_at(pos).is_some();
            let in_corridor = level.corridors.iter().any(|c| c.contains(pos));
            assert!(in_room || is_door || in_corridor, "stray walkable cell {}", pos);
        }
    }

    #[test]
    fn test_gated_graph_is_subgraph() {
        for seed in 0..40 {
            let level = generate(&GenerationConfig::new(seed));
            for (a, b) in level.gated_graph.edges() {
                assert!(level.graph.has_edge(a, b));
            }
            for (room, _) in level.locked_doors() {
                assert_eq!(level.gated_graph.neighbours(room).count(), 0);
            }
        }
    }

    #[test]
    fn test_repair_only_generation() {
        let config = GenerationConfig::new(5);
        let mut rng = utils::create_rng(&config);
        let level = SectorDungeonGenerator::repair_only()
            .generate(&config, &mut rng)
            .unwrap();

        // The repair loop builds a spanning tree and nothing more
        assert_eq!(level.corridors.len(), 8);
        assert_eq!(level.graph.edge_count(), 8);
    }

    #[test]
    fn test_detailed_generation() {
        let config = GenerationConfig::for_detailed_generation(2);
        let level = generate(&config);
        assert_eq!(level.rooms.len(), 16);
        assert_eq!(level.grid_size, 4);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GenerationConfig {
            grid_size: 1,
            ..GenerationConfig::new(1)
        };
        let mut rng = utils::create_rng(&config);
        let result = SectorDungeonGenerator::new().generate(&config, &mut rng);
        assert!(matches!(result, Err(GridlockError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation_catches_broken_levels() {
        let config = GenerationConfig::new(64);
        let generator = SectorDungeonGenerator::new();
        let level = generate(&config);
        assert!(generator.validate(&level, &config).is_ok());

        let mut disconnected = level.clone();
        disconnected.graph = RoomGraph::new(9);
        assert!(generator.validate(&disconnected, &config).is_err());

        let mut same_rooms = level.clone();
        same_rooms.exit_room = same_rooms.start_room;
        assert!(generator.validate(&same_rooms, &config).is_err());

        let mut walkable_exit = level;
        walkable_exit.map.add_walkable(walkable_exit.exit);
        assert!(generator.validate(&walkable_exit, &config).is_err());
    }
}
