//! # Navigation
//!
//! Four-connected movement over a level's walkable cells, honouring locked
//! doors for a walker holding a given set of keys.

use crate::{KeyColor, Level, Position};
use pathfinding::prelude::{bfs, bfs_reach};
use std::collections::HashSet;

/// Cells a walker holding `held` may step to from `pos`.
pub fn passable_neighbours(level: &Level, pos: Position, held: &HashSet<KeyColor>) -> Vec<Position> {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|&next| level.can_pass(next, held))
        .collect()
}

/// Shortest path from `from` to `to`, both ends included.
///
/// Returns `None` if `to` cannot be reached with the keys in `held`.
pub fn find_path(
    level: &Level,
    from: Position,
    to: Position,
    held: &HashSet<KeyColor>,
) -> Option<Vec<Position>> {
    bfs(&from, |&pos| passable_neighbours(level, pos, held), |&pos| pos == to)
}

/// Every cell reachable from `from` with the keys in `held`.
pub fn reachable_cells(level: &Level, from: Position, held: &HashSet<KeyColor>) -> HashSet<Position> {
    bfs_reach(from, |&pos| passable_neighbours(level, pos, held)).collect()
}

/// Outcome of walking a level from its spawn and picking up every key in reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walkthrough {
    /// Key colors in pickup order
    pub collected: Vec<KeyColor>,
    /// Whether a cell next to the exit was reached
    pub exit_reachable: bool,
}

impl Walkthrough {
    pub fn collected_all(&self, level: &Level) -> bool {
        self.collected.len() == level.keys.len()
    }
}

/// Walks from the player spawn, collecting reachable keys until no new key
/// can be reached.
pub fn collect_keys(level: &Level) -> Walkthrough {
    let mut held = HashSet::new();
    let mut collected = Vec::new();

    loop {
        let reached = reachable_cells(level, level.player_spawn, &held);
        let found: Vec<KeyColor> = level
            .keys
            .iter()
            .filter(|key| !held.contains(&key.color) && reached.contains(&key.position))
            .map(|key| key.color)
            .collect();

        if found.is_empty() {
            let exit_reachable = level
                .exit
                .cardinal_adjacent_positions()
                .iter()
                .any(|pos| reached.contains(pos));
            return Walkthrough {
                collected,
                exit_reachable,
            };
        }

        for color in found {
            held.insert(color);
            collected.push(color);
        }
    }
}
