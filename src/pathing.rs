use bit_set::BitSet;
use itertools::Itertools;
use log::debug;
use std::collections::VecDeque;
use std::fmt;

use crate::cells::{CellCoordinate, CompassPrimary};
use crate::grid::MazeGrid;
use crate::utils;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SolverAlgorithm {
    DepthFirst,
    BreadthFirst,
}

impl SolverAlgorithm {
    pub fn short_name(self) -> &'static str {
        match self {
            SolverAlgorithm::DepthFirst => "DFS",
            SolverAlgorithm::BreadthFirst => "BFS",
        }
    }
}

impl fmt::Display for SolverAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Find a route from the grid's start (top-left) to its end (bottom-right) cell.
/// None means the end cannot be reached through the grid's passages.
pub fn solve(grid: &MazeGrid, algorithm: SolverAlgorithm) -> Option<Vec<CellCoordinate>> {
    let path = match algorithm {
        SolverAlgorithm::DepthFirst => depth_first_path(grid),
        SolverAlgorithm::BreadthFirst => breadth_first_path(grid),
    };
    match path {
        Some(ref cells) => debug!("{} found a path of {} cells", algorithm, cells.len()),
        None => debug!("{} found no path", algorithm),
    }
    path
}

/// Depth first search from start to end, trying passages North, East, South then West.
///
/// Returns the first route found, which is not necessarily the shortest. The search
/// keeps one stack frame per cell on the current route along with the next direction to
/// try from it, so the frames double up as the path when the end is reached.
pub fn depth_first_path(grid: &MazeGrid) -> Option<Vec<CellCoordinate>> {
    let (start, end) = (grid.start(), grid.end());
    if start == end {
        return Some(vec![start]);
    }

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(grid.grid_coordinate_to_index(start)?);
    let mut stack: Vec<(CellCoordinate, usize)> = vec![(start, 0)];

    while let Some(top) = stack.last_mut() {
        let (current, next_direction) = *top;
        if next_direction >= CompassPrimary::ALL.len() {
            // Dead end: backtrack
            stack.pop();
            continue;
        }
        top.1 += 1;

        let dir = CompassPrimary::ALL[next_direction];
        if !grid.has_passage(current, dir) {
            continue;
        }
        let neighbour = match grid.neighbour_at_direction(current, dir) {
            Some(neighbour) => neighbour,
            None => continue,
        };
        let is_new = grid.grid_coordinate_to_index(neighbour)
            .map_or(false, |index| visited.insert(index));
        if is_new {
            stack.push((neighbour, 0));
            if neighbour == end {
                return Some(stack.into_iter().map(|(coord, _)| coord).collect());
            }
        }
    }

    None
}

/// Breadth first search from start to end. The returned path has the fewest cells of
/// any route through the grid's passages.
pub fn breadth_first_path(grid: &MazeGrid) -> Option<Vec<CellCoordinate>> {
    let (start, end) = (grid.start(), grid.end());

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(grid.grid_coordinate_to_index(start)?);
    let mut parents = utils::fnv_hashmap::<CellCoordinate, CellCoordinate>(grid.size());
    let mut queue = VecDeque::new();
    queue.push_back(start);

    let mut found = false;
    while let Some(cell_coord) = queue.pop_front() {
        if cell_coord == end {
            found = true;
            break;
        }
        for &link_coord in grid.accessible_neighbours(cell_coord).iter() {
            let is_new = grid.grid_coordinate_to_index(link_coord)
                .map_or(false, |index| visited.insert(index));
            if is_new {
                parents.insert(link_coord, cell_coord);
                queue.push_back(link_coord);
            }
        }
    }

    if !found {
        return None;
    }

    let mut path = vec![end];
    let mut current = end;
    while current != start {
        current = *parents.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Are all consecutive cells of `path` joined by an open passage?
pub fn is_connected_path(grid: &MazeGrid, path: &[CellCoordinate]) -> bool {
    path.iter().all(|coord| grid.is_valid_coordinate(*coord)) &&
    path.iter().tuple_windows().all(|(a, b)| grid.is_linked(*a, *b))
}

/// A connected path that runs from the grid's start cell to its end cell.
pub fn is_solution(grid: &MazeGrid, path: &[CellCoordinate]) -> bool {
    path.first() == Some(&grid.start()) && path.last() == Some(&grid.end()) &&
    is_connected_path(grid, path)
}
