//! Property tests over many generated levels.

use gridlock::generation::utils;
use gridlock::{
    collect_keys, GenerationConfig, Generator, Level, Position, SectorDungeonGenerator, SectorGrid,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn generate(config: &GenerationConfig) -> Level {
    let mut rng = utils::create_rng(config);
    SectorDungeonGenerator::new()
        .generate(config, &mut rng)
        .expect("generation should always succeed with a valid config")
}

fn assert_connected(level: &Level) {
    let mut graph = level.graph.clone();
    graph.dfs(level.start_room);
    assert!(graph.is_fully_connected());
}

fn assert_locks_solvable(level: &Level) {
    for (room, door) in level.locked_doors() {
        let color = door.color.expect("locked doors carry a color");
        let key = level.key_for(color).expect("every lock has a key");
        let mut trial = level.graph.clone();
        trial.isolate(room);
        trial.dfs(level.start_room);
        assert!(
            trial.is_connected(key.room),
            "{} key in room {} is behind locked room {}",
            color,
            key.room,
            room
        );
    }
}

/// 1000 levels on the default 3×3 grid with 7×6 minimum rooms.
#[test]
fn test_thousand_seeds() {
    for seed in 0..1000 {
        let config = GenerationConfig::new(seed);
        assert_eq!((config.min_room_width, config.min_room_height), (7, 6));
        let level = generate(&config);

        assert_eq!(level.rooms.len(), 9, "seed {}", seed);
        assert_ne!(level.start_room, level.exit_room, "seed {}", seed);
        assert_connected(&level);
        assert_locks_solvable(&level);
    }
}

#[test]
fn test_lock_colors_unique_and_bounded() {
    for seed in 0..300 {
        let config = GenerationConfig::new(seed);
        let level = generate(&config);
        let locked = level.locked_doors();

        assert!(locked.len() <= config.max_locks);
        assert_eq!(locked.len(), level.keys.len());
        let colors: HashSet<_> = locked.iter().map(|(_, door)| door.color).collect();
        assert_eq!(colors.len(), locked.len(), "seed {}", seed);
    }
}

#[test]
fn test_geometric_containment() {
    for seed in 0..200 {
        let config = GenerationConfig::new(seed);
        let grid = SectorGrid::new(&config);
        let level = generate(&config);

        for (i, room) in level.rooms.iter().enumerate() {
            assert!(grid.sector(i).contains_room(room));
            for door in &room.doors {
                assert!(room.is_border(door.position));
                assert!(room.is_on_wall(door.position, door.direction));
            }
            for other in &level.rooms[i + 1..] {
                assert!(!room.overlaps(other));
            }
        }
    }
}

#[test]
fn test_corridor_endpoints_match_facing_doors() {
    for seed in 0..200 {
        let level = generate(&GenerationConfig::new(seed));

        let door_by_outward = |cell: Position| {
            level.rooms.iter().find_map(|room| {
                room.doors
                    .iter()
                    .find(|door| door.outward() == cell)
                    .map(|door| (room.id, door.direction))
            })
        };

        for corridor in &level.corridors {
            let (a, dir_a) = door_by_outward(corridor.start().unwrap()).expect("start door");
            let (b, dir_b) = door_by_outward(corridor.end().unwrap()).expect("end door");
            assert_ne!(a, b);
            assert_eq!(dir_a.opposite(), dir_b);
        }
    }
}

#[test]
fn test_tile_walkthrough_collects_every_key() {
    for seed in 0..300 {
        let level = generate(&GenerationConfig::new(seed));
        let walk = collect_keys(&level);
        assert!(walk.collected_all(&level), "seed {}: {:?}", seed, walk);
        assert!(walk.exit_reachable, "seed {}", seed);
    }
}

#[test]
fn test_larger_grids() {
    for seed in 0..100 {
        let config = GenerationConfig::for_detailed_generation(seed);
        let level = generate(&config);
        assert_eq!(level.rooms.len(), 16);
        assert_connected(&level);
        assert_locks_solvable(&level);
        assert!(collect_keys(&level).exit_reachable);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_any_seed_yields_valid_level(seed in any::<u64>()) {
        let config = GenerationConfig::new(seed);
        let level = generate(&config);

        prop_assert_eq!(level.rooms.len(), 9);
        prop_assert!(utils::validate_level(&level, &config).is_ok());
        prop_assert!(collect_keys(&level).collected_all(&level));
    }

    #[test]
    fn prop_small_maps_still_connect(seed in any::<u64>(), locks in 0usize..=6) {
        let config = GenerationConfig {
            max_locks: locks,
            ..GenerationConfig::for_testing(seed)
        };
        let level = generate(&config);

        prop_assert!(level.keys.len() <= locks);
        let mut graph = level.graph.clone();
        graph.dfs(level.start_room);
        prop_assert!(graph.is_fully_connected());
    }
}
