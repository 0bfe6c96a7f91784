//! # Room Generation
//!
//! One randomized room per sector, with doors on a random subset of the walls
//! that face neighbouring sectors.

use crate::{Direction, Door, GenerationConfig, Position, Room, Sector, SectorGrid};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Synthesizes the room hosted by `sector`.
///
/// Size is drawn from the configured range clipped to the sector's usable
/// area, and the rectangle is placed uniformly inside that area. Between one
/// and `max_doors` doors are then created on distinct allowed walls.
pub fn generate_room(sector: &Sector, config: &GenerationConfig, rng: &mut StdRng) -> Room {
    let mut room = generate_bare_room(sector, config, rng);

    let rules = sector.rules();
    let door_count = rng.gen_range(1..=rules.max_doors);
    let mut directions = rules.allowed_directions.to_vec();
    directions.shuffle(rng);
    directions.truncate(door_count);

    for direction in directions {
        let door = random_door(&room, direction, config.door_edge_offset, rng);
        room.add_door(door);
    }

    room
}

/// Synthesizes the room hosted by `sector` without any doors.
pub fn generate_bare_room(sector: &Sector, config: &GenerationConfig, rng: &mut StdRng) -> Room {
    let low = sector.usable_top_left();
    let high = sector.usable_bottom_right();

    let max_width = config.max_room_width.min(sector.usable_width());
    let max_height = config.max_room_height.min(sector.usable_height());
    let width = rng.gen_range(config.min_room_width..=max_width.max(config.min_room_width));
    let height = rng.gen_range(config.min_room_height..=max_height.max(config.min_room_height));

    let x = rng.gen_range(low.x..=(high.x - width + 1).max(low.x));
    let y = rng.gen_range(low.y..=(high.y - height + 1).max(low.y));

    Room::new(
        sector.index,
        Position::new(x, y),
        Position::new(x + width - 1, y + height - 1),
    )
}

/// Creates a door at a random slot of the wall facing `direction`.
pub fn random_door(room: &Room, direction: Direction, edge_offset: i32, rng: &mut StdRng) -> Door {
    let slots = room.door_slots(direction, edge_offset);
    let position = slots
        .choose(rng)
        .copied()
        // Validated configs always leave a slot; fall back to the wall midpoint
        .unwrap_or_else(|| wall_midpoint(room, direction));
    Door::new(position, direction)
}

fn wall_midpoint(room: &Room, direction: Direction) -> Position {
    let center = room.center();
    match direction {
        Direction::Up => Position::new(center.x, room.top_left.y),
        Direction::Down => Position::new(center.x, room.bottom_right.y),
        Direction::Left => Position::new(room.top_left.x, center.y),
        Direction::Right => Position::new(room.bottom_right.x, center.y),
    }
}

/// Generates one room per sector, in sector order.
///
/// With `with_doors` unset the rooms carry no doors at all, leaving every
/// connection to the repair loop.
pub fn generate_rooms(
    grid: &SectorGrid,
    config: &GenerationConfig,
    rng: &mut StdRng,
    with_doors: bool,
) -> Vec<Room> {
    let rooms: Vec<Room> = grid
        .sectors()
        .iter()
        .map(|sector| {
            if with_doors {
                generate_room(sector, config, rng)
            } else {
                generate_bare_room(sector, config, rng)
            }
        })
        .collect();

    debug!(
        "Generated {} rooms with {} doors",
        rooms.len(),
        rooms.iter().map(|room| room.doors.len()).sum::<usize>()
    );

    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils;

    #[test]
    fn test_rooms_fit_their_sectors() {
        let config = GenerationConfig::new(2024);
        let grid = SectorGrid::new(&config);
        let mut rng = utils::create_rng(&config);

        for _ in 0..50 {
            let rooms = generate_rooms(&grid, &config, &mut rng, true);
            assert_eq!(rooms.len(), 9);
            for (room, sector) in rooms.iter().zip(grid.sectors()) {
                assert_eq!(room.id, sector.index);
                assert!(sector.contains_room(room));
                assert!(room.width() >= config.min_room_width);
                assert!(room.height() >= config.min_room_height);
                assert!(room.width() <= config.max_room_width);
                assert!(room.height() <= config.max_room_height);
            }
        }
    }

    #[test]
    fn test_door_count_and_directions() {
        let config = GenerationConfig::new(7);
        let grid = SectorGrid::new(&config);
        let mut rng = utils::create_rng(&config);

        for _ in 0..50 {
            for sector in grid.sectors() {
                let room = generate_room(sector, &config, &mut rng);
                let rules = sector.rules();
                assert!(!room.doors.is_empty());
                assert!(room.doors.len() <= rules.max_doors);
                for door in &room.doors {
                    assert!(rules.allowed_directions.contains(&door.direction));
                    assert!(room.is_on_wall(door.position, door.direction));
                    assert!(door.is_unlocked);
                    assert_eq!(door.color, None);
                }
                // Directions are drawn without replacement
                for dir in Direction::ALL {
                    assert!(room.doors.iter().filter(|d| d.direction == dir).count() <= 1);
                }
            }
        }
    }

    #[test]
    fn test_bare_rooms_have_no_doors() {
        let config = GenerationConfig::for_testing(3);
        let grid = SectorGrid::new(&config);
        let mut rng = utils::create_rng(&config);

        let rooms = generate_rooms(&grid, &config, &mut rng, false);
        assert!(rooms.iter().all(|room| room.doors.is_empty()));
    }

    #[test]
    fn test_doors_keep_clear_of_corners() {
        let config = GenerationConfig::new(11);
        let grid = SectorGrid::new(&config);
        let mut rng = utils::create_rng(&config);
        let room = generate_bare_room(grid.sector(4), &config, &mut rng);

        for _ in 0..100 {
            for dir in Direction::ALL {
                let door = random_door(&room, dir, config.door_edge_offset, &mut rng);
                let Position { x, y } = door.position;
                if dir.is_vertical() {
                    assert!(x >= room.top_left.x + 2 && x <= room.bottom_right.x - 2);
                } else {
                    assert!(y >= room.top_left.y + 2 && y <= room.bottom_right.y - 2);
                }
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GenerationConfig::new(99);
        let grid = SectorGrid::new(&config);
        let a = generate_rooms(&grid, &config, &mut utils::create_rng(&config), true);
        let b = generate_rooms(&grid, &config, &mut utils::create_rng(&config), true);
        assert_eq!(a, b);
    }
}
