use smallvec::SmallVec;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex};

/// Position of a cell in the grid. Row 0 is the top row, column 0 the left column.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellCoordinate {
    pub row: u32,
    pub column: u32,
}

impl CellCoordinate {
    pub fn new(row: u32, column: u32) -> CellCoordinate {
        CellCoordinate { row, column }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> Self {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        CellCoordinate::new(row as u32, col as u32)
    }

    /// The coordinate one step away in `dir`, or None when that would go above
    /// the first row or left of the first column. Callers check the far bounds.
    pub fn offset(self, dir: CompassPrimary) -> Option<CellCoordinate> {
        let CellCoordinate { row, column } = self;
        match dir {
            CompassPrimary::North => row.checked_sub(1).map(|r| CellCoordinate::new(r, column)),
            CompassPrimary::East => column.checked_add(1).map(|c| CellCoordinate::new(row, c)),
            CompassPrimary::South => row.checked_add(1).map(|r| CellCoordinate::new(r, column)),
            CompassPrimary::West => column.checked_sub(1).map(|c| CellCoordinate::new(row, c)),
        }
    }

    /// Direction from `self` to an orthogonally adjacent `other`.
    pub fn direction_to(self, other: CellCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| self.offset(*dir) == Some(other))
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

pub type CoordinateSmallVec = SmallVec<[CellCoordinate; 4]>;

/// The four sides of a square cell. The declaration order is the wall index order
/// (top, right, bottom, left) and the order neighbours are visited in.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    #[inline]
    pub fn wall_index(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::East => 1,
            CompassPrimary::South => 2,
            CompassPrimary::West => 3,
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}

/// One grid unit. Walls can only be changed through the owning `MazeGrid`, which
/// updates both sides of a shared wall together.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct MazeCell {
    walls: [bool; 4],
    visited: bool,
    in_path: bool,
}

impl Default for MazeCell {
    fn default() -> MazeCell {
        MazeCell {
            walls: [true; 4],
            visited: false,
            in_path: false,
        }
    }
}

impl MazeCell {
    #[inline]
    pub fn has_wall(&self, dir: CompassPrimary) -> bool {
        self.walls[dir.wall_index()]
    }

    /// Wall flags in (top, right, bottom, left) order.
    #[inline]
    pub fn walls(&self) -> [bool; 4] {
        self.walls
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    #[inline]
    pub fn is_in_path(&self) -> bool {
        self.in_path
    }

    #[inline]
    pub(crate) fn set_wall(&mut self, dir: CompassPrimary, present: bool) {
        self.walls[dir.wall_index()] = present;
    }

    #[inline]
    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    #[inline]
    pub(crate) fn set_in_path(&mut self, in_path: bool) {
        self.in_path = in_path;
    }
}
