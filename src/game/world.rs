//! # World Representation
//!
//! The level model produced by generation: rooms with their doors, corridors,
//! keys, and the walkable map consumed by movement and visibility code.

use crate::{Direction, Position, RoomGraph};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Colors shared by a locked door and the key that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl KeyColor {
    /// Every color a lock can use.
    pub const ALL: [KeyColor; 6] = [
        KeyColor::Red,
        KeyColor::Blue,
        KeyColor::Green,
        KeyColor::Yellow,
        KeyColor::Purple,
        KeyColor::Orange,
    ];

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            KeyColor::Red => "red",
            KeyColor::Blue => "blue",
            KeyColor::Green => "green",
            KeyColor::Yellow => "yellow",
            KeyColor::Purple => "purple",
            KeyColor::Orange => "orange",
        }
    }
}

impl std::fmt::Display for KeyColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An opening in a room wall.
///
/// The direction is fixed when the door is created; only the color and lock
/// state change, and only once, when the door is chosen as a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Cell on the owning room's boundary
    pub position: Position,
    /// Wall the door sits on, pointing away from the room
    pub direction: Direction,
    /// Key color required to pass, if this door is a lock
    pub color: Option<KeyColor>,
    /// False once the door has been selected as a lock
    pub is_unlocked: bool,
}

impl Door {
    /// Creates an unlocked, uncolored door.
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
            color: None,
            is_unlocked: true,
        }
    }

    /// The cell just outside the door, where its corridor begins.
    pub fn outward(&self) -> Position {
        self.position.step(self.direction)
    }

    /// Whether the door needs a key.
    pub fn is_locked(&self) -> bool {
        !self.is_unlocked
    }

    /// Turns this door into a lock of the given color.
    pub fn lock(&mut self, color: KeyColor) {
        self.color = Some(color);
        self.is_unlocked = false;
    }
}

/// A rectangular room hosted by one sector.
///
/// Both corners are inclusive and lie on the wall; the walkable interior is
/// everything strictly inside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Index of the hosting sector, also the room's node in the room graph
    pub id: usize,
    /// Upper-left wall corner
    pub top_left: Position,
    /// Lower-right wall corner
    pub bottom_right: Position,
    /// At most one door per wall
    pub doors: Vec<Door>,
    /// Set on exactly one room per level
    pub is_start_room: bool,
}

impl Room {
    /// Creates a room without doors.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridlock::{Position, Room};
    ///
    /// let room = Room::new(4, Position::new(5, 5), Position::new(14, 12));
    /// assert_eq!(room.width(), 10);
    /// assert_eq!(room.height(), 8);
    /// assert!(room.doors.is_empty());
    /// ```
    pub fn new(id: usize, top_left: Position, bottom_right: Position) -> Self {
        Self {
            id,
            top_left,
            bottom_right,
            doors: Vec::new(),
            is_start_room: false,
        }
    }

    /// Width including walls.
    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x + 1
    }

    /// Height including walls.
    pub fn height(&self) -> i32 {
        self.bottom_right.y - self.top_left.y + 1
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            (self.top_left.x + self.bottom_right.x) / 2,
            (self.top_left.y + self.bottom_right.y) / 2,
        )
    }

    /// Checks if a position is inside this room, walls included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x <= self.bottom_right.x
            && pos.y <= self.bottom_right.y
    }

    /// Checks if a position is on the border of this room.
    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos) && !self.is_interior(pos)
    }

    /// Checks if a position is a floor cell of this room.
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x > self.top_left.x
            && pos.y > self.top_left.y
            && pos.x < self.bottom_right.x
            && pos.y < self.bottom_right.y
    }

    /// Checks if this room overlaps with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.bottom_right.x < other.top_left.x
            || other.bottom_right.x < self.top_left.x
            || self.bottom_right.y < other.top_left.y
            || other.bottom_right.y < self.top_left.y)
    }

    /// Gets all floor positions within this room.
    pub fn interior_positions(&self) -> Vec<Position> {
        self.inset_positions(0)
    }

    /// Floor positions at least `offset` cells away from the walls' inner face.
    pub fn inset_positions(&self, offset: i32) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1 + offset)..=(self.bottom_right.y - 1 - offset) {
            for x in (self.top_left.x + 1 + offset)..=(self.bottom_right.x - 1 - offset) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Picks a random floor cell at least `offset` away from the walls.
    pub fn random_inset_position(&self, offset: i32, rng: &mut StdRng) -> Position {
        let x = rng.gen_range((self.top_left.x + 1 + offset)..=(self.bottom_right.x - 1 - offset));
        let y = rng.gen_range((self.top_left.y + 1 + offset)..=(self.bottom_right.y - 1 - offset));
        Position::new(x, y)
    }

    /// Cells of the wall facing `direction` where a door may sit.
    ///
    /// Cells closer than `edge_offset` to either corner are excluded, so a door
    /// never lands on a corner for any offset of at least one.
    pub fn door_slots(&self, direction: Direction, edge_offset: i32) -> Vec<Position> {
        let Position { x: left, y: top } = self.top_left;
        let Position { x: right, y: bottom } = self.bottom_right;

        match direction {
            Direction::Up => ((left + edge_offset)..=(right - edge_offset))
                .map(|x| Position::new(x, top))
                .collect(),
            Direction::Down => ((left + edge_offset)..=(right - edge_offset))
                .map(|x| Position::new(x, bottom))
                .collect(),
            Direction::Left => ((top + edge_offset)..=(bottom - edge_offset))
                .map(|y| Position::new(left, y))
                .collect(),
            Direction::Right => ((top + edge_offset)..=(bottom - edge_offset))
                .map(|y| Position::new(right, y))
                .collect(),
        }
    }

    /// Whether `pos` lies on the wall facing `direction`, corners excluded.
    pub fn is_on_wall(&self, pos: Position, direction: Direction) -> bool {
        let on_x_span = pos.x > self.top_left.x && pos.x < self.bottom_right.x;
        let on_y_span = pos.y > self.top_left.y && pos.y < self.bottom_right.y;

        match direction {
            Direction::Up => pos.y == self.top_left.y && on_x_span,
            Direction::Down => pos.y == self.bottom_right.y && on_x_span,
            Direction::Left => pos.x == self.top_left.x && on_y_span,
            Direction::Right => pos.x == self.bottom_right.x && on_y_span,
        }
    }

    /// The door on the wall facing `direction`, if any.
    pub fn door_towards(&self, direction: Direction) -> Option<&Door> {
        self.doors.iter().find(|door| door.direction == direction)
    }

    /// Adds a door unless that wall already has one.
    pub fn add_door(&mut self, door: Door) -> bool {
        if self.door_towards(door.direction).is_some() {
            return false;
        }
        self.doors.push(door);
        true
    }

    /// Locked doors of this room.
    pub fn locked_doors(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().filter(|door| door.is_locked())
    }
}

/// Cell path between the outward cells of two facing doors.
///
/// A corridor does not know its doors; the connection is implied by its first
/// and last cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub path: Vec<Position>,
}

impl Corridor {
    /// Wraps a path of unit steps.
    pub fn new(path: Vec<Position>) -> Self {
        Self { path }
    }

    /// First cell of the corridor.
    pub fn start(&self) -> Option<Position> {
        self.path.first().copied()
    }

    /// Last cell of the corridor.
    pub fn end(&self) -> Option<Position> {
        self.path.last().copied()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.path.contains(&pos)
    }
}

/// A key lying on the floor of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub color: KeyColor,
    pub position: Position,
    /// Room holding the key
    pub room: usize,
}

/// Walkable cells of a level plus the visibility sets maintained by
/// field-of-view code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    walkable: HashSet<Position>,
    visible: HashSet<Position>,
    seen: HashSet<Position>,
}

impl GameMap {
    /// Creates a map with nothing walkable.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Checks if a position lies within the map bounds.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn add_walkable(&mut self, pos: Position) {
        if self.in_bounds(pos) {
            self.walkable.insert(pos);
        }
    }

    pub fn remove_walkable(&mut self, pos: Position) -> bool {
        self.walkable.remove(&pos)
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.walkable.contains(&pos)
    }

    /// Walkable cells one cardinal step away from `pos`.
    pub fn walkable_neighbours(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&next| self.is_walkable(next))
            .collect()
    }

    /// Number of walkable cells.
    pub fn len(&self) -> usize {
        self.walkable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    pub fn walkable_positions(&self) -> impl Iterator<Item = &Position> {
        self.walkable.iter()
    }

    /// Replaces the visible set; cells that were visible become seen.
    pub fn update_visibility<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Position>,
    {
        let visible: HashSet<Position> = cells.into_iter().filter(|&pos| self.in_bounds(pos)).collect();
        let previous = std::mem::replace(&mut self.visible, visible);
        self.seen.extend(previous);
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }

    /// Whether a cell is visible now or has been visible before.
    pub fn is_seen(&self, pos: Position) -> bool {
        self.seen.contains(&pos) || self.visible.contains(&pos)
    }
}

/// A fully generated level.
///
/// Assembled once per generation call and replaced wholesale on the next
/// level transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Depth of this level in the run
    pub number: u32,
    /// Sectors per side
    pub grid_size: usize,
    /// One room per sector, indexed by sector
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    /// Every corridor connection, locked or not
    pub graph: RoomGraph,
    /// Connections left once each locked room is cut off
    pub gated_graph: RoomGraph,
    pub start_room: usize,
    pub exit_room: usize,
    /// Exit tile; not part of the walkable set
    pub exit: Position,
    /// Where the player appears in the start room
    pub player_spawn: Position,
    /// One key per locked door
    pub keys: Vec<Key>,
    pub map: GameMap,
}

impl Level {
    /// The start room.
    pub fn start(&self) -> &Room {
        &self.rooms[self.start_room]
    }

    /// Finds the room whose rectangle (walls included) contains `pos`.
    pub fn room_at(&self, pos: Position) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains(pos))
    }

    /// Rooms available for entity spawning.
    pub fn rooms_excluding_start(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|room| !room.is_start_room)
    }

    /// Finds the door at `pos` and the index of the room owning it.
    pub fn door_at(&self, pos: Position) -> Option<(usize, &Door)> {
        self.rooms.iter().find_map(|room| {
            room.doors
                .iter()
                .find(|door| door.position == pos)
                .map(|door| (room.id, door))
        })
    }

    /// All locked doors with the index of their room.
    pub fn locked_doors(&self) -> Vec<(usize, &Door)> {
        self.rooms
            .iter()
            .flat_map(|room| room.locked_doors().map(move |door| (room.id, door)))
            .collect()
    }

    /// Color of the locked door at `pos`, if there is one.
    pub fn locked_door_at(&self, pos: Position) -> Option<KeyColor> {
        self.door_at(pos)
            .filter(|(_, door)| door.is_locked())
            .and_then(|(_, door)| door.color)
    }

    pub fn key_at(&self, pos: Position) -> Option<&Key> {
        self.keys.iter().find(|key| key.position == pos)
    }

    pub fn key_for(&self, color: KeyColor) -> Option<&Key> {
        self.keys.iter().find(|key| key.color == color)
    }

    /// Whether a walker holding `held` keys may step onto `pos`.
    pub fn can_pass(&self, pos: Position, held: &HashSet<KeyColor>) -> bool {
        if !self.map.is_walkable(pos) {
            return false;
        }
        match self.locked_door_at(pos) {
            Some(color) => held.contains(&color),
            None => true,
        }
    }

    /// Random walkable floor cell of `room` that is neither in `occupied` nor
    /// holding a key. Gives up after `attempts` tries.
    pub fn random_free_position(
        &self,
        room: &Room,
        occupied: &HashSet<Position>,
        rng: &mut StdRng,
        attempts: u32,
    ) -> Option<Position> {
        for _ in 0..attempts {
            let pos = room.random_inset_position(0, rng);
            if self.map.is_walkable(pos) && !occupied.contains(&pos) && self.key_at(pos).is_none() {
                return Some(pos);
            }
        }
        None
    }
}
