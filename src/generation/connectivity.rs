//! # Connectivity Repair
//!
//! Turns the probabilistic corridor pass into a single connected level, then
//! removes doors that no corridor reaches.

use crate::generation::rooms::random_door;
use crate::{
    connect_rooms, direction_between, neighbour_indices, Corridor, GridlockError, GridlockResult,
    Position, Room, RoomGraph,
};
use log::debug;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Forces doors and corridors until every room is reachable from room 0.
///
/// Each round runs a DFS from room 0, takes the first unreached room that has
/// a reached grid neighbour, and joins the two, creating the facing doors if
/// they are missing. Every round merges at least one room into the reached
/// set, so at most `rooms.len() - 1` rounds run. Returns the number of forced
/// connections.
pub fn repair_connectivity(
    rooms: &mut [Room],
    grid_size: usize,
    graph: &mut RoomGraph,
    corridors: &mut Vec<Corridor>,
    door_edge_offset: i32,
    rng: &mut StdRng,
) -> GridlockResult<usize> {
    let mut repairs = 0;
    graph.dfs(0);

    while !graph.is_fully_connected() {
        if repairs >= rooms.len() {
            return Err(GridlockError::GenerationFailed(format!(
                "connectivity repair did not converge after {} rounds",
                repairs
            )));
        }

        let (room, target) = next_repair(graph, grid_size).ok_or_else(|| {
            GridlockError::GenerationFailed("no unreached room borders the reached set".to_string())
        })?;
        let direction = direction_between(room, target, grid_size).ok_or_else(|| {
            GridlockError::GenerationFailed(format!("rooms {} and {} are not adjacent", room, target))
        })?;

        for (index, facing) in [(room, direction), (target, direction.opposite())] {
            if rooms[index].door_towards(facing).is_none() {
                let door = random_door(&rooms[index], facing, door_edge_offset, rng);
                rooms[index].add_door(door);
            }
        }

        let corridor = connect_rooms(&rooms[room], &rooms[target], direction, rng).ok_or_else(|| {
            GridlockError::GenerationFailed(format!("forced doors missing between {} and {}", room, target))
        })?;
        corridors.push(corridor);
        graph.add_edge(room, target);
        repairs += 1;

        debug!("Forced corridor {:?} from room {} to room {}", direction, room, target);

        graph.reset_connectivity();
        graph.dfs(0);
    }

    Ok(repairs)
}

/// First unreached room, in index order, with a reached grid neighbour, paired
/// with that neighbour.
fn next_repair(graph: &RoomGraph, grid_size: usize) -> Option<(usize, usize)> {
    graph.unconnected_rooms().into_iter().find_map(|room| {
        neighbour_indices(room, grid_size)
            .into_iter()
            .find(|&other| graph.is_connected(other))
            .map(|other| (room, other))
    })
}

/// Removes every door whose outward cell does not start or end a corridor.
///
/// Returns how many doors were removed. A second pass never removes more.
pub fn prune_unused_doors(rooms: &mut [Room], corridors: &[Corridor]) -> usize {
    let used: HashSet<Position> = corridors
        .iter()
        .flat_map(|corridor| corridor.start().into_iter().chain(corridor.end()))
        .collect();

    let mut removed = 0;
    for room in rooms.iter_mut() {
        let before = room.doors.len();
        room.doors.retain(|door| used.contains(&door.outward()));
        removed += before - room.doors.len();
    }

    debug!("Pruned {} unused doors", removed);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_rooms, utils};
    use crate::{build_initial_corridors, Direction, Door, GenerationConfig, SectorGrid};

    fn setup(seed: u64, with_doors: bool) -> (GenerationConfig, Vec<Room>, StdRng) {
        let config = GenerationConfig::new(seed);
        let grid = SectorGrid::new(&config);
        let mut rng = utils::create_rng(&config);
        let rooms = generate_rooms(&grid, &config, &mut rng, with_doors);
        (config, rooms, rng)
    }

    #[test]
    fn test_repair_connects_random_layouts() {
        for seed in 0..200 {
            let (config, mut rooms, mut rng) = setup(seed, true);
            let mut graph = RoomGraph::new(rooms.len());
            let mut corridors = build_initial_corridors(&rooms, 3, &mut graph, &mut rng);
            let initial = corridors.len();

            let repairs = repair_connectivity(
                &mut rooms,
                3,
                &mut graph,
                &mut corridors,
                config.door_edge_offset,
                &mut rng,
            )
            .unwrap();

            graph.dfs(0);
            assert!(graph.is_fully_connected(), "seed {}", seed);
            assert!(repairs <= 8);
            assert_eq!(corridors.len(), initial + repairs);
        }
    }

    #[test]
    fn test_repair_with_no_initial_doors() {
        let (config, mut rooms, mut rng) = setup(5, false);
        let mut graph = RoomGraph::new(rooms.len());
        let mut corridors = build_initial_corridors(&rooms, 3, &mut graph, &mut rng);
        assert!(corridors.is_empty());
        assert_eq!(graph.edge_count(), 0);

        let repairs = repair_connectivity(
            &mut rooms,
            3,
            &mut graph,
            &mut corridors,
            config.door_edge_offset,
            &mut rng,
        )
        .unwrap();

        // A spanning tree over 9 rooms
        assert_eq!(repairs, 8);
        assert_eq!(graph.edge_count(), 8);
        graph.dfs(0);
        assert!(graph.is_fully_connected());
        assert_eq!(prune_unused_doors(&mut rooms, &corridors), 0);
    }

    #[test]
    fn test_repair_reuses_existing_doors() {
        let (config, mut rooms, mut rng) = setup(9, false);
        let existing = Door::new(rooms[0].door_slots(Direction::Right, 2)[0], Direction::Right);
        rooms[0].add_door(existing.clone());

        let mut graph = RoomGraph::new(rooms.len());
        let mut corridors = Vec::new();
        repair_connectivity(
            &mut rooms,
            3,
            &mut graph,
            &mut corridors,
            config.door_edge_offset,
            &mut rng,
        )
        .unwrap();

        assert_eq!(rooms[0].door_towards(Direction::Right), Some(&existing));
    }

    #[test]
    fn test_prune_removes_dead_doors() {
        let (_, mut rooms, mut rng) = setup(17, true);
        let mut graph = RoomGraph::new(rooms.len());
        let corridors = build_initial_corridors(&rooms, 3, &mut graph, &mut rng);

        prune_unused_doors(&mut rooms, &corridors);
        let ends: HashSet<Position> = corridors
            .iter()
            .flat_map(|c| [c.start().unwrap(), c.end().unwrap()])
            .collect();
        for room in &rooms {
            for door in &room.doors {
                assert!(ends.contains(&door.outward()));
            }
        }
        assert_eq!(
            rooms.iter().map(|room| room.doors.len()).sum::<usize>(),
            corridors.len() * 2
        );
    }

    #[test]
    fn test_prune_is_idempotent() {
        for seed in 0..50 {
            let (config, mut rooms, mut rng) = setup(seed, true);
            let mut graph = RoomGraph::new(rooms.len());
            let mut corridors = build_initial_corridors(&rooms, 3, &mut graph, &mut rng);
            repair_connectivity(
                &mut rooms,
                3,
                &mut graph,
                &mut corridors,
                config.door_edge_offset,
                &mut rng,
            )
            .unwrap();

            prune_unused_doors(&mut rooms, &corridors);
            let once = rooms.clone();
            assert_eq!(prune_unused_doors(&mut rooms, &corridors), 0);
            assert_eq!(rooms, once);
        }
    }
}
