//! # Corridor Building
//!
//! Joins grid-adjacent rooms through facing doors with jittered Z-shaped
//! corridors, recording each join as an edge of the room graph.

use crate::{direction_between, Corridor, Direction, Position, Room, RoomGraph};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Lays a Z-shaped corridor of unit steps from `start` to `end`.
///
/// A coin decides whether the first leg runs horizontally or vertically. The
/// first leg stops at a random split point strictly between the endpoints
/// when they are more than two cells apart on that axis, otherwise it ends
/// immediately; the second leg crosses to the end's other coordinate and the
/// third leg finishes on the first axis.
///
/// # Examples
///
/// ```
/// use gridlock::{carve_z_corridor, Position};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let path = carve_z_corridor(Position::new(0, 0), Position::new(6, 3), &mut rng);
/// assert_eq!(path.first(), Some(&Position::new(0, 0)));
/// assert_eq!(path.last(), Some(&Position::new(6, 3)));
/// assert_eq!(path.len(), 10);
/// ```
pub fn carve_z_corridor(start: Position, end: Position, rng: &mut StdRng) -> Vec<Position> {
    let horizontal_first = rng.gen_bool(0.5);
    let mut path = vec![start];
    let mut current = start;

    if horizontal_first {
        let split_x = split_point(start.x, end.x, rng);
        walk_x(&mut path, &mut current, split_x);
        walk_y(&mut path, &mut current, end.y);
        walk_x(&mut path, &mut current, end.x);
    } else {
        let split_y = split_point(start.y, end.y, rng);
        walk_y(&mut path, &mut current, split_y);
        walk_x(&mut path, &mut current, end.x);
        walk_y(&mut path, &mut current, end.y);
    }

    if path.last() != Some(&end) {
        path.push(end);
    }

    path
}

fn split_point(from: i32, to: i32, rng: &mut StdRng) -> i32 {
    if (to - from).abs() > 2 {
        let (low, high) = (from.min(to), from.max(to));
        rng.gen_range((low + 1)..high)
    } else {
        from
    }
}

fn walk_x(path: &mut Vec<Position>, current: &mut Position, target: i32) {
    let step = (target - current.x).signum();
    while current.x != target {
        current.x += step;
        path.push(*current);
    }
}

fn walk_y(path: &mut Vec<Position>, current: &mut Position, target: i32) {
    let step = (target - current.y).signum();
    while current.y != target {
        current.y += step;
        path.push(*current);
    }
}

/// Builds the corridor between two grid-adjacent rooms if both have facing
/// doors.
///
/// `direction` is the side of `from` that faces `to`. Returns `None` without
/// side effects when either door is missing.
pub fn connect_rooms(
    from: &Room,
    to: &Room,
    direction: Direction,
    rng: &mut StdRng,
) -> Option<Corridor> {
    let exit = from.door_towards(direction)?;
    let entry = to.door_towards(direction.opposite())?;
    Some(Corridor::new(carve_z_corridor(exit.outward(), entry.outward(), rng)))
}

/// Pairs every room with its right and down neighbour, the only relations
/// needed to visit each grid edge once.
pub fn adjacent_pairs(grid_size: usize) -> Vec<(usize, usize, Direction)> {
    let mut pairs = Vec::new();
    for index in 0..grid_size * grid_size {
        let col = index % grid_size;
        let row = index / grid_size;
        if col + 1 < grid_size {
            pairs.push((index, index + 1, Direction::Right));
        }
        if row + 1 < grid_size {
            pairs.push((index, index + grid_size, Direction::Down));
        }
    }
    pairs
}

/// The initial, probabilistic corridor pass.
///
/// Pairs lacking a matching door are skipped silently; the repair loop
/// restores connectivity later.
pub fn build_initial_corridors(
    rooms: &[Room],
    grid_size: usize,
    graph: &mut RoomGraph,
    rng: &mut StdRng,
) -> Vec<Corridor> {
    let mut corridors = Vec::new();

    for (a, b, direction) in adjacent_pairs(grid_size) {
        debug_assert_eq!(direction_between(a, b, grid_size), Some(direction));
        if let Some(corridor) = connect_rooms(&rooms[a], &rooms[b], direction, rng) {
            graph.add_edge(a, b);
            corridors.push(corridor);
        }
    }

    debug!(
        "Initial corridor pass joined {} of {} adjacent pairs",
        corridors.len(),
        adjacent_pairs(grid_size).len()
    );

    corridors
}
