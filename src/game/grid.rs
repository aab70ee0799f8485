use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell on the game grid, addressed by column and row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighbouring cell one step in `direction`
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Bounds of the play field in cells.
///
/// A grid is a pure function of the play-field size and the cell pitch. When the
/// field is resized a new grid is computed; grids are never patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
}

impl Grid {
    /// Grid with explicit dimensions, clamped to at least one cell each way
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    /// Derive the grid from a play-field size and the pitch of one cell.
    ///
    /// Each dimension is `floor(size / pitch)`, never less than one.
    pub fn from_field(field_width: u32, field_height: u32, cell_pitch: u32) -> Self {
        let pitch = cell_pitch.max(1);
        Self::new(field_width / pitch, field_height / pitch)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Check if a cell is within the grid bounds
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && i64::from(cell.x) < i64::from(self.columns)
            && i64::from(cell.y) < i64::from(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_movement() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.moved_by(1, 0), Cell::new(6, 5));
        assert_eq!(cell.moved_by(-1, 0), Cell::new(4, 5));
        assert_eq!(cell.moved_in_direction(Direction::Down), Cell::new(5, 6));
        assert_eq!(cell.moved_in_direction(Direction::Up), Cell::new(5, 4));
    }

    #[test]
    fn test_grid_from_field_floors() {
        let grid = Grid::from_field(560, 560, 20);
        assert_eq!(grid.columns(), 28);
        assert_eq!(grid.rows(), 28);

        let grid = Grid::from_field(579, 201, 20);
        assert_eq!(grid.columns(), 28);
        assert_eq!(grid.rows(), 10);
    }

    #[test]
    fn test_grid_is_at_least_one_cell() {
        let grid = Grid::from_field(5, 0, 20);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.rows(), 1);
        assert!(grid.contains(Cell::new(0, 0)));

        // A zero pitch is treated as one rather than dividing by zero
        let grid = Grid::from_field(3, 4, 0);
        assert_eq!((grid.columns(), grid.rows()), (3, 4));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20, 20);

        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(19, 19)));
        assert!(!grid.contains(Cell::new(-1, 0)));
        assert!(!grid.contains(Cell::new(20, 0)));
        assert!(!grid.contains(Cell::new(0, 20)));
        assert!(!grid.contains(Cell::new(0, -1)));
    }
}
