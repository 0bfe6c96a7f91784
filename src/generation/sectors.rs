//! # Sector Partition
//!
//! Splits the map into an N×N grid of sectors. A sector's place in the grid
//! decides which walls its room may open doors on: only walls that face
//! another sector.

use crate::{Direction, GenerationConfig, Position, Room};

/// Topological class of a sector, derived from its row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorKind {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

/// Door rules attached to a [`SectorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorRules {
    /// Upper bound on doors generated for the room
    pub max_doors: usize,
    /// Walls that face a neighbouring sector
    pub allowed_directions: &'static [Direction],
}

impl SectorKind {
    /// Classifies the sector at `(row, col)` of a `grid_size`-wide grid.
    pub fn classify(row: usize, col: usize, grid_size: usize) -> Self {
        let last = grid_size.saturating_sub(1);
        match (row, col) {
            (0, 0) => SectorKind::TopLeft,
            (0, c) if c == last => SectorKind::TopRight,
            (0, _) => SectorKind::Top,
            (r, 0) if r == last => SectorKind::BottomLeft,
            (r, c) if r == last && c == last => SectorKind::BottomRight,
            (r, _) if r == last => SectorKind::Bottom,
            (_, 0) => SectorKind::Left,
            (_, c) if c == last => SectorKind::Right,
            _ => SectorKind::Center,
        }
    }

    /// Door count and wall directions for this kind of sector.
    pub fn rules(self) -> SectorRules {
        use Direction::*;

        let allowed_directions: &'static [Direction] = match self {
            SectorKind::TopLeft => &[Down, Right],
            SectorKind::Top => &[Down, Left, Right],
            SectorKind::TopRight => &[Down, Left],
            SectorKind::Left => &[Up, Down, Right],
            SectorKind::Center => &[Up, Down, Left, Right],
            SectorKind::Right => &[Up, Down, Left],
            SectorKind::BottomLeft => &[Up, Right],
            SectorKind::Bottom => &[Up, Left, Right],
            SectorKind::BottomRight => &[Up, Left],
        };

        SectorRules {
            max_doors: allowed_directions.len(),
            allowed_directions,
        }
    }
}

/// One cell of the generation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub kind: SectorKind,
    /// Upper-left corner of the sector, inclusive
    pub top_left: Position,
    /// Lower-right corner of the sector, inclusive
    pub bottom_right: Position,
    /// Cells reserved for corridors on each side
    pub padding: i32,
}

impl Sector {
    pub fn rules(&self) -> SectorRules {
        self.kind.rules()
    }

    /// Upper-left corner of the area a room may occupy.
    pub fn usable_top_left(&self) -> Position {
        Position::new(self.top_left.x + self.padding, self.top_left.y + self.padding)
    }

    /// Lower-right corner of the area a room may occupy.
    pub fn usable_bottom_right(&self) -> Position {
        Position::new(
            self.bottom_right.x - self.padding,
            self.bottom_right.y - self.padding,
        )
    }

    pub fn usable_width(&self) -> i32 {
        self.usable_bottom_right().x - self.usable_top_left().x + 1
    }

    pub fn usable_height(&self) -> i32 {
        self.usable_bottom_right().y - self.usable_top_left().y + 1
    }

    /// Whether a room lies entirely inside the sector's usable area.
    pub fn contains_room(&self, room: &Room) -> bool {
        let low = self.usable_top_left();
        let high = self.usable_bottom_right();
        room.top_left.x >= low.x
            && room.top_left.y >= low.y
            && room.bottom_right.x <= high.x
            && room.bottom_right.y <= high.y
    }
}

/// The N×N partition of the map.
#[derive(Debug, Clone)]
pub struct SectorGrid {
    pub grid_size: usize,
    sectors: Vec<Sector>,
}

impl SectorGrid {
    /// Partitions the map described by `config`.
    ///
    /// Sectors are indexed row-major: index = row * N + col.
    pub fn new(config: &GenerationConfig) -> Self {
        let grid_size = config.grid_size;
        let width = config.sector_width();
        let height = config.sector_height();

        let sectors = (0..grid_size * grid_size)
            .map(|index| {
                let row = index / grid_size;
                let col = index % grid_size;
                let top_left = Position::new(col as i32 * width, row as i32 * height);
                Sector {
                    index,
                    row,
                    col,
                    kind: SectorKind::classify(row, col, grid_size),
                    top_left,
                    bottom_right: Position::new(top_left.x + width - 1, top_left.y + height - 1),
                    padding: config.sector_padding,
                }
            })
            .collect();

        Self { grid_size, sectors }
    }

    pub fn sector(&self, index: usize) -> &Sector {
        &self.sectors[index]
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Index of the sector one step in `direction` from `index`, if inside the grid.
pub fn neighbour_index(index: usize, direction: Direction, grid_size: usize) -> Option<usize> {
    let row = index / grid_size;
    let col = index % grid_size;
    match direction {
        Direction::Up if row > 0 => Some(index - grid_size),
        Direction::Down if row + 1 < grid_size => Some(index + grid_size),
        Direction::Left if col > 0 => Some(index - 1),
        Direction::Right if col + 1 < grid_size => Some(index + 1),
        _ => None,
    }
}

/// Grid-adjacent sector indices in up, down, left, right order.
pub fn neighbour_indices(index: usize, grid_size: usize) -> Vec<usize> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| neighbour_index(index, dir, grid_size))
        .collect()
}

/// Direction from sector `from` to the grid-adjacent sector `to`, or `None`
/// if the two are not neighbours.
pub fn direction_between(from: usize, to: usize, grid_size: usize) -> Option<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .find(|&dir| neighbour_index(from, dir, grid_size) == Some(to))
}
