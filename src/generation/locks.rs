//! # Lock-and-Key Placement
//!
//! Places colored locked doors and their keys so that no key ever sits behind
//! its own lock.
//!
//! Each attempt drops a key in a room reachable from the start, then searches
//! for a door in some other room whose room can be cut out of the graph while
//! the key stays reachable. The cut graph is committed, so later keys must be
//! reachable without entering any room locked before them.

use crate::{GenerationConfig, GridlockError, GridlockResult, Key, KeyColor, Position, Room, RoomGraph};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{BTreeSet, HashSet};

/// Places up to `config.max_locks` lock-and-key pairs.
///
/// `graph` is replaced by each committed trial graph, so on return it holds the
/// connections left with every locked room cut off. `used_colors` collects the
/// colors spent by this level. `reserved` holds cells keys must avoid and
/// receives every placed key. Fewer locks than requested is not an error.
pub fn place_locks(
    rooms: &mut [Room],
    graph: &mut RoomGraph,
    start: usize,
    reserved: &mut HashSet<Position>,
    used_colors: &mut BTreeSet<KeyColor>,
    config: &GenerationConfig,
    rng: &mut StdRng,
) -> GridlockResult<Vec<Key>> {
    let mut keys = Vec::new();

    for attempt in 0..config.max_locks {
        graph.dfs(start);
        let reachable: Vec<usize> = graph
            .connected_rooms()
            .into_iter()
            .filter(|&room| room != start)
            .collect();
        let Some(&key_room) = reachable.choose(rng) else {
            debug!("Lock attempt {}: no reachable room besides the start", attempt);
            continue;
        };

        let free_colors: Vec<KeyColor> = KeyColor::ALL
            .iter()
            .copied()
            .filter(|color| !used_colors.contains(color))
            .collect();
        let Some(&color) = free_colors.choose(rng) else {
            break;
        };

        let (key_room, position) = place_key(rooms, key_room, start, reserved, config, rng)?;

        match find_lock(rooms, graph, start, key_room, rng) {
            Some((room, door_index, trial)) => {
                rooms[room].doors[door_index].lock(color);
                used_colors.insert(color);
                *graph = trial;
                reserved.insert(position);
                keys.push(Key {
                    color,
                    position,
                    room: key_room,
                });
                debug!(
                    "Locked {} door in room {} with key in room {} at {}",
                    color, room, key_room, position
                );
            }
            None => {
                debug!(
                    "Lock attempt {}: no door can be locked for a key in room {}",
                    attempt, key_room
                );
            }
        }
    }

    if keys.len() < config.max_locks {
        warn!("Placed {} of {} requested locks", keys.len(), config.max_locks);
    }

    Ok(keys)
}

/// Picks the key cell inside `key_room`, falling back to the start room after
/// the configured number of attempts.
fn place_key(
    rooms: &[Room],
    key_room: usize,
    start: usize,
    reserved: &HashSet<Position>,
    config: &GenerationConfig,
    rng: &mut StdRng,
) -> GridlockResult<(usize, Position)> {
    let room = &rooms[key_room];
    for _ in 0..config.max_placement_attempts {
        let pos = room.random_inset_position(config.exit_wall_offset, rng);
        if !reserved.contains(&pos) {
            return Ok((key_room, pos));
        }
    }

    warn!("Key placement in room {} failed, falling back to start room {}", key_room, start);
    let mut cells = rooms[start].inset_positions(config.exit_wall_offset);
    cells.shuffle(rng);
    cells
        .into_iter()
        .find(|pos| !reserved.contains(pos))
        .map(|pos| (start, pos))
        .ok_or_else(|| GridlockError::GenerationFailed(format!("start room {} has no free key cell", start)))
}

/// Searches rooms other than the start and key rooms, in random order, for an
/// unlocked door whose room can be cut off while `key_room` stays reachable.
///
/// Returns the room, the door index and the trial graph to commit.
pub fn find_lock(
    rooms: &[Room],
    graph: &RoomGraph,
    start: usize,
    key_room: usize,
    rng: &mut StdRng,
) -> Option<(usize, usize, RoomGraph)> {
    let mut candidates: Vec<usize> = (0..rooms.len())
        .filter(|&room| room != start && room != key_room)
        .collect();
    candidates.shuffle(rng);

    for room in candidates {
        let mut doors: Vec<usize> = rooms[room]
            .doors
            .iter()
            .enumerate()
            .filter(|(_, door)| door.is_unlocked)
            .map(|(index, _)| index)
            .collect();
        doors.shuffle(rng);

        for door_index in doors {
            let mut trial = graph.clone();
            trial.isolate(room);
            trial.dfs(start);
            if trial.is_connected(key_room) {
                return Some((room, door_index, trial));
            }
        }
    }

    None
}
