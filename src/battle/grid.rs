//! Obstacle grid for the battlefield
//!
//! A uniform lattice of square cells laid over the continuous battlefield.
//! Cells are either open or occupied by an obstacle. Movement between cells
//! is orthogonal only (4-connected).

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::constants::{OBSTACLE_COLUMN_STRIDE, OBSTACLE_EDGE_INSET, OBSTACLE_ROW_OFFSET};
use crate::core::types::Vec2;

/// Errors raised while building a grid
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid must have at least one column and one row, got {cols}x{rows}")]
    EmptyGrid { cols: u32, rows: u32 },
    #[error("cell size must be positive, got {width}x{height}")]
    BadCellSize { width: f32, height: f32 },
    #[error("obstacle ({col}, {row}) lies outside the {cols}x{rows} grid")]
    ObstacleOutOfBounds { col: i32, row: i32, cols: u32, rows: u32 },
}

/// Integer cell address (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct GridCoord {
    pub col: i32,
    pub row: i32,
}

impl GridCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Manhattan distance; exact step count on an open 4-connected grid
    pub fn distance(&self, other: &Self) -> u32 {
        ((self.col - other.col).abs() + (self.row - other.row).abs()) as u32
    }

    /// The four orthogonal neighbors: east, west, south, north
    pub fn neighbors(&self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.col + 1, self.row),
            GridCoord::new(self.col - 1, self.row),
            GridCoord::new(self.col, self.row + 1),
            GridCoord::new(self.col, self.row - 1),
        ]
    }

    /// Whether `other` is exactly one orthogonal step away
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.distance(other) == 1
    }
}

/// Static obstacle map. Built once per battle, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleGrid {
    cols: u32,
    rows: u32,
    cell_width: f32,
    cell_height: f32,
    obstacles: AHashSet<GridCoord>,
}

impl BattleGrid {
    /// Create a grid with the given obstacle cells
    ///
    /// Duplicate obstacles collapse into one. Any obstacle outside
    /// `[0, cols) x [0, rows)` is rejected.
    pub fn new(
        cols: u32,
        rows: u32,
        cell_width: f32,
        cell_height: f32,
        obstacles: impl IntoIterator<Item = GridCoord>,
    ) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::EmptyGrid { cols, rows });
        }
        if cell_width <= 0.0 || cell_height <= 0.0 {
            return Err(GridError::BadCellSize {
                width: cell_width,
                height: cell_height,
            });
        }

        let mut grid = Self {
            cols,
            rows,
            cell_width,
            cell_height,
            obstacles: AHashSet::new(),
        };

        for coord in obstacles {
            if !grid.in_bounds(coord) {
                return Err(GridError::ObstacleOutOfBounds {
                    col: coord.col,
                    row: coord.row,
                    cols,
                    rows,
                });
            }
            grid.obstacles.insert(coord);
        }

        Ok(grid)
    }

    /// Create an obstacle-free grid
    pub fn open(cols: u32, rows: u32, cell_width: f32, cell_height: f32) -> Result<Self, GridError> {
        Self::new(cols, rows, cell_width, cell_height, std::iter::empty())
    }

    /// Create the standard skirmish battlefield
    ///
    /// Two rows of pillars, three rows above and below the midline, one
    /// pillar every ten columns with an eight-column margin on each side.
    /// The gaps between pillars are the corridors units funnel through.
    pub fn with_standard_obstacles(
        cols: u32,
        rows: u32,
        cell_width: f32,
        cell_height: f32,
    ) -> Result<Self, GridError> {
        Self::new(
            cols,
            rows,
            cell_width,
            cell_height,
            standard_obstacle_layout(cols, rows),
        )
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Continuous extent of the grid in pixels
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Check if coordinate is within grid bounds
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.col >= 0
            && coord.row >= 0
            && coord.col < self.cols as i32
            && coord.row < self.rows as i32
    }

    /// A cell is passable when no obstacle occupies it. Bounds are not checked.
    pub fn is_passable(&self, coord: GridCoord) -> bool {
        !self.obstacles.contains(&coord)
    }

    pub fn is_obstacle(&self, coord: GridCoord) -> bool {
        self.obstacles.contains(&coord)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &GridCoord> + '_ {
        self.obstacles.iter()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// In-bounds, passable orthogonal neighbors of a cell
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |n| self.in_bounds(*n) && self.is_passable(*n))
    }

    /// Cell containing a continuous point. May be out of bounds.
    pub fn to_cell(&self, point: Vec2) -> GridCoord {
        GridCoord::new(
            (point.x / self.cell_width).floor() as i32,
            (point.y / self.cell_height).floor() as i32,
        )
    }

    /// Center point of a cell
    pub fn to_center(&self, coord: GridCoord) -> Vec2 {
        Vec2::new(
            coord.col as f32 * self.cell_width + self.cell_width / 2.0,
            coord.row as f32 * self.cell_height + self.cell_height / 2.0,
        )
    }
}

/// Obstacle cells for the standard battlefield
pub fn standard_obstacle_layout(cols: u32, rows: u32) -> Vec<GridCoord> {
    let cols = cols as i32;
    let mid = rows as f32 / 2.0;
    let upper = (mid - OBSTACLE_ROW_OFFSET as f32).floor() as i32;
    let lower = (mid + OBSTACLE_ROW_OFFSET as f32).floor() as i32;

    let mut obstacles = Vec::new();
    let mut col = OBSTACLE_EDGE_INSET;
    while col < cols - OBSTACLE_EDGE_INSET {
        obstacles.push(GridCoord::new(col, upper));
        obstacles.push(GridCoord::new(col, lower));
        col += OBSTACLE_COLUMN_STRIDE;
    }

    obstacles
        .into_iter()
        .filter(|c| c.row >= 0 && c.row < rows as i32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_and_center() {
        let grid = BattleGrid::open(45, 30, 20.0, 20.0).unwrap();

        assert_eq!(grid.to_cell(Vec2::new(0.0, 0.0)), GridCoord::new(0, 0));
        assert_eq!(grid.to_cell(Vec2::new(19.9, 39.9)), GridCoord::new(0, 1));
        assert_eq!(grid.to_cell(Vec2::new(100.0, 100.0)), GridCoord::new(5, 5));
        assert_eq!(grid.to_center(GridCoord::new(5, 5)), Vec2::new(110.0, 110.0));
    }

    #[test]
    fn test_negative_points_floor_out_of_bounds() {
        let grid = BattleGrid::open(10, 10, 20.0, 20.0).unwrap();
        let cell = grid.to_cell(Vec2::new(-1.0, 5.0));

        assert_eq!(cell, GridCoord::new(-1, 0));
        assert!(!grid.in_bounds(cell));
    }

    #[test]
    fn test_neighbors_are_orthogonal_and_in_bounds() {
        let grid = BattleGrid::open(10, 10, 20.0, 20.0).unwrap();

        let corner: Vec<_> = grid.neighbors(GridCoord::new(0, 0)).collect();
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&GridCoord::new(1, 0)));
        assert!(corner.contains(&GridCoord::new(0, 1)));

        let middle: Vec<_> = grid.neighbors(GridCoord::new(5, 5)).collect();
        assert_eq!(middle.len(), 4);
        assert!(middle.iter().all(|n| n.is_adjacent(&GridCoord::new(5, 5))));
    }

    #[test]
    fn test_neighbors_skip_obstacles() {
        let grid = BattleGrid::new(
            10,
            10,
            20.0,
            20.0,
            [GridCoord::new(6, 5), GridCoord::new(5, 4)],
        )
        .unwrap();

        let neighbors: Vec<_> = grid.neighbors(GridCoord::new(5, 5)).collect();
        assert_eq!(neighbors.len(), 2);
        assert!(!neighbors.contains(&GridCoord::new(6, 5)));
        assert!(!neighbors.contains(&GridCoord::new(5, 4)));
    }

    #[test]
    fn test_duplicate_obstacles_collapse() {
        let grid = BattleGrid::new(
            10,
            10,
            20.0,
            20.0,
            [GridCoord::new(1, 1), GridCoord::new(1, 1)],
        )
        .unwrap();
        assert_eq!(grid.obstacle_count(), 1);
    }

    #[test]
    fn test_rejects_out_of_bounds_obstacle() {
        let result = BattleGrid::new(10, 10, 20.0, 20.0, [GridCoord::new(10, 0)]);
        assert_eq!(
            result.unwrap_err(),
            GridError::ObstacleOutOfBounds {
                col: 10,
                row: 0,
                cols: 10,
                rows: 10
            }
        );
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert!(matches!(
            BattleGrid::open(0, 10, 20.0, 20.0),
            Err(GridError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_standard_layout_is_symmetric_pillars() {
        let obstacles = standard_obstacle_layout(45, 30);

        // Columns 8, 18, 28 on rows 12 and 18
        assert_eq!(obstacles.len(), 6);
        for col in [8, 18, 28] {
            assert!(obstacles.contains(&GridCoord::new(col, 12)));
            assert!(obstacles.contains(&GridCoord::new(col, 18)));
        }
    }

    #[test]
    fn test_standard_grid_builds() {
        let grid = BattleGrid::with_standard_obstacles(45, 30, 20.0, 20.0).unwrap();
        assert_eq!(grid.obstacle_count(), 6);
        assert!(grid.is_obstacle(GridCoord::new(18, 12)));
        assert!(grid.is_passable(GridCoord::new(19, 12)));
        assert_eq!(grid.pixel_size(), Vec2::new(900.0, 600.0));
    }
}
