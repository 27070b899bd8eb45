//! A* pathfinding over the obstacle grid
//!
//! Uniform step cost, Manhattan heuristic, 4-connected moves. The search
//! never fails: an unreachable goal produces a one-point path at the goal
//! cell's center, and the unit walks straight at it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::battle::grid::{BattleGrid, GridCoord};
use crate::core::types::Vec2;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: GridCoord,
    f_cost: u32, // g_cost + heuristic
    seq: u64,    // insertion order, breaks f_cost ties
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; earlier insertion wins ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a cell path between two continuous points
///
/// Returns cell centers from the origin's cell to the destination's cell.
/// The result is never empty. If the destination cannot be reached (walled
/// in, an obstacle itself, or off the grid) the result is the single
/// destination cell center.
pub fn find_path(grid: &BattleGrid, origin: Vec2, destination: Vec2) -> Vec<Vec2> {
    let start = grid.to_cell(origin);
    let goal = grid.to_cell(destination);

    find_cell_path(grid, start, goal)
        .into_iter()
        .map(|coord| grid.to_center(coord))
        .collect()
}

/// Cell-level A*; see [`find_path`]
pub fn find_cell_path(grid: &BattleGrid, start: GridCoord, goal: GridCoord) -> Vec<GridCoord> {
    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<GridCoord, GridCoord> = AHashMap::new();
    let mut g_scores: AHashMap<GridCoord, u32> = AHashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance(&goal),
        seq,
    });

    let mut reached = false;
    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            reached = true;
            break;
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);

        for neighbor in grid.neighbors(current.coord) {
            let tentative_g = current_g.saturating_add(1);
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance(&goal),
                    seq,
                });
            }
        }
    }

    if !reached {
        tracing::warn!(
            "No route from ({}, {}) to ({}, {}); heading straight for the goal",
            start.col,
            start.row,
            goal.col,
            goal.row
        );
    }

    reconstruct_path(&came_from, goal)
}

/// Reconstruct path from came_from map, walking back from the goal
fn reconstruct_path(came_from: &AHashMap<GridCoord, GridCoord>, mut current: GridCoord) -> Vec<GridCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> BattleGrid {
        BattleGrid::open(10, 10, 20.0, 20.0).unwrap()
    }

    #[test]
    fn test_pathfind_straight_line() {
        let grid = open_grid();
        let start = GridCoord::new(0, 0);
        let goal = GridCoord::new(5, 0);

        let path = find_cell_path(&grid, start, goal);

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let grid = BattleGrid::new(
            10,
            10,
            20.0,
            20.0,
            [GridCoord::new(2, 0), GridCoord::new(2, 1), GridCoord::new(2, 2)],
        )
        .unwrap();

        let start = GridCoord::new(0, 0);
        let goal = GridCoord::new(5, 0);

        let path = find_cell_path(&grid, start, goal);

        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|c| grid.is_passable(*c)));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]));
        }
        // Detour through row 3 and back: 5 east + 3 down + 3 up
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn test_pathfind_same_cell() {
        let grid = open_grid();

        let path = find_path(&grid, Vec2::new(101.0, 101.0), Vec2::new(118.0, 105.0));

        assert_eq!(path, vec![Vec2::new(110.0, 110.0)]);
    }

    #[test]
    fn test_enclosed_goal_falls_back_to_goal_center() {
        let goal = GridCoord::new(5, 5);
        let grid = BattleGrid::new(10, 10, 20.0, 20.0, goal.neighbors()).unwrap();

        let path = find_path(&grid, Vec2::new(10.0, 10.0), grid.to_center(goal));

        assert_eq!(path, vec![grid.to_center(goal)]);
    }

    #[test]
    fn test_obstacle_goal_still_returns_point() {
        let goal = GridCoord::new(4, 4);
        let grid = BattleGrid::new(10, 10, 20.0, 20.0, [goal]).unwrap();

        let path = find_cell_path(&grid, GridCoord::new(0, 0), goal);

        assert_eq!(path, vec![goal]);
    }

    #[test]
    fn test_off_grid_goal_still_returns_point() {
        let grid = open_grid();

        let path = find_path(&grid, Vec2::new(10.0, 10.0), Vec2::new(500.0, 10.0));

        assert_eq!(path.len(), 1);
        assert_eq!(path[0], Vec2::new(510.0, 10.0));
    }

    #[test]
    fn test_path_ends_in_continuous_centers() {
        let grid = open_grid();

        let path = find_path(&grid, Vec2::new(5.0, 5.0), Vec2::new(65.0, 5.0));

        assert_eq!(
            path,
            vec![
                Vec2::new(10.0, 10.0),
                Vec2::new(30.0, 10.0),
                Vec2::new(50.0, 10.0),
                Vec2::new(70.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_open_set_pops_lowest_cost_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(PathNode { coord: GridCoord::new(0, 0), f_cost: 5, seq: 0 });
        heap.push(PathNode { coord: GridCoord::new(1, 0), f_cost: 3, seq: 1 });
        heap.push(PathNode { coord: GridCoord::new(2, 0), f_cost: 3, seq: 2 });

        assert_eq!(heap.pop().map(|n| n.coord), Some(GridCoord::new(1, 0)));
        assert_eq!(heap.pop().map(|n| n.coord), Some(GridCoord::new(2, 0)));
        assert_eq!(heap.pop().map(|n| n.coord), Some(GridCoord::new(0, 0)));
    }
}
