//! # Room Graph
//!
//! Undirected adjacency over room indices with a reusable visited vector.
//!
//! The graph is a plain value: trial edits during lock placement work on a
//! clone and replace the live graph only when the trial succeeds.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Adjacency sets over rooms `0..len` plus DFS/BFS scratch state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGraph {
    adjacency: Vec<BTreeSet<usize>>,
    connected: Vec<bool>,
}

impl RoomGraph {
    /// Creates a graph of `len` rooms with no edges.
    pub fn new(len: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); len],
            connected: vec![false; len],
        }
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Adds an undirected edge. Returns false if it already existed.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        let added = self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        added
    }

    /// Removes an undirected edge. Returns false if it was absent.
    pub fn remove_edge(&mut self, a: usize, b: usize) -> bool {
        let removed = self.adjacency[a].remove(&b);
        self.adjacency[b].remove(&a);
        removed
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].contains(&b)
    }

    /// Removes every edge incident to `room`.
    pub fn isolate(&mut self, room: usize) {
        let neighbours = std::mem::take(&mut self.adjacency[room]);
        for other in neighbours {
            self.adjacency[other].remove(&room);
        }
    }

    /// Neighbours of `room` in ascending order.
    pub fn neighbours(&self, room: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[room].iter().copied()
    }

    /// Every edge once, as `(low, high)` pairs.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, set)| set.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Clears the visited vector.
    pub fn reset_connectivity(&mut self) {
        self.connected.iter_mut().for_each(|flag| *flag = false);
    }

    /// Marks every room reachable from `start`, after clearing earlier marks.
    pub fn dfs(&mut self, start: usize) {
        self.reset_connectivity();
        let mut stack = vec![start];

        while let Some(room) = stack.pop() {
            if self.connected[room] {
                continue;
            }
            self.connected[room] = true;
            stack.extend(self.adjacency[room].iter().filter(|&&next| !self.connected[next]));
        }
    }

    /// Breadth-first visiting order from `start`.
    pub fn bfs_order(&self, start: usize) -> Vec<usize> {
        let mut visited = vec![false; self.len()];
        let mut order = Vec::with_capacity(self.len());
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(room) = queue.pop_front() {
            order.push(room);
            for &next in &self.adjacency[room] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        order
    }

    /// The last room dequeued by a BFS from `start`.
    ///
    /// This is a cheap stand-in for the farthest room, not an exact
    /// eccentricity.
    pub fn furthest_from(&self, start: usize) -> usize {
        self.bfs_order(start).last().copied().unwrap_or(start)
    }

    /// Whether the last traversal reached `room`.
    pub fn is_connected(&self, room: usize) -> bool {
        self.connected[room]
    }

    /// Rooms reached by the last traversal.
    pub fn connected_rooms(&self) -> Vec<usize> {
        (0..self.len()).filter(|&room| self.connected[room]).collect()
    }

    /// Rooms the last traversal did not reach, in index order.
    pub fn unconnected_rooms(&self) -> Vec<usize> {
        (0..self.len()).filter(|&room| !self.connected[room]).collect()
    }

    /// Whether the last traversal reached every room.
    pub fn is_fully_connected(&self) -> bool {
        self.connected.iter().all(|&flag| flag)
    }
}
