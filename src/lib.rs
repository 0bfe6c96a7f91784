//! # Gridlock
//!
//! Level generation for a sector-grid roguelike: a fixed N×N topology of rooms
//! joined by corridors, proven fully reachable, and optionally gated by colored
//! locked doors whose keys can always be collected before the lock is needed.
//!
//! ## Architecture Overview
//!
//! Generation is a single synchronous pipeline, run once per level transition:
//!
//! - **Sectors**: the map is partitioned into an N×N grid; each sector's position
//!   (corner, edge, center) fixes how many doors its room may have and on which walls
//! - **Rooms**: one randomized rectangle per sector, with a random subset of doors
//! - **Corridors**: Z-shaped paths between facing doors of grid-adjacent rooms,
//!   recorded as edges of a room graph
//! - **Connectivity repair**: forces doors and corridors until the graph is a
//!   single component, then prunes doors nothing connects to
//! - **Start/exit and locks**: picks the start and exit rooms, then places up to K
//!   colored locks whose keys stay reachable without entering the locked room
//! - **GameMap**: the walkable cells handed to movement and visibility code
//!
//! Every stage threads an explicit [`rand::rngs::StdRng`], so a seed fully
//! determines a level.

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

pub use generation::{
    CorridorStrategy, GenerationConfig, Generator, RoomGraph, SectorDungeonGenerator,
};

/// Core error type for the Gridlock generator.
#[derive(thiserror::Error, Debug)]
pub enum GridlockError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation constants cannot produce a valid level
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Level or dungeon state is invalid
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Gridlock codebase.
pub type GridlockResult<T> = Result<T, GridlockError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default generation constants.
pub mod config {
    /// Sectors per side of the generation grid
    pub const DEFAULT_GRID_SIZE: usize = 3;

    /// Default map width in tiles
    pub const DEFAULT_MAP_WIDTH: i32 = 90;

    /// Default map height in tiles
    pub const DEFAULT_MAP_HEIGHT: i32 = 45;

    /// Smallest room width, walls included
    pub const MIN_ROOM_WIDTH: i32 = 7;

    /// Largest room width, walls included
    pub const MAX_ROOM_WIDTH: i32 = 22;

    /// Smallest room height, walls included
    pub const MIN_ROOM_HEIGHT: i32 = 6;

    /// Largest room height, walls included
    pub const MAX_ROOM_HEIGHT: i32 = 11;

    /// Cells kept free on every side of a sector for corridors
    pub const SECTOR_PADDING: i32 = 2;

    /// Minimum distance between a door and the corners of its wall
    pub const DOOR_EDGE_OFFSET: i32 = 2;

    /// Extra inset of exit and key cells from the room interior edge
    pub const EXIT_WALL_OFFSET: i32 = 1;

    /// Upper bound on locked doors per level
    pub const MAX_LOCKED_DOORS: usize = 3;

    /// Attempts made by random position searches before falling back
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
}
