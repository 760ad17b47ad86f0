use log::{debug, info};
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::cells::{CellCoordinate, CompassPrimary};
use crate::config::MazeConfig;
use crate::errors::*;
use crate::grid::MazeGrid;

/// The passages carved by a generator, in the order they were carved.
pub type CarveSequence = Vec<(CellCoordinate, CellCoordinate)>;

/// Build a fresh maze for `config`: carve a spanning tree with the recursive backtracker,
/// optionally knock through extra walls to create loops, and leave every cell unvisited
/// ready for the solvers.
pub fn generate<R: Rng + ?Sized>(config: &MazeConfig, rng: &mut R) -> Result<MazeGrid> {
    config.validate()?;
    let mut grid = MazeGrid::new(config.rows, config.columns)?;

    let carved = recursive_backtracker(&mut grid, rng);
    let trials = config.loop_trials();
    let extra = add_loops(&mut grid, trials, rng);
    grid.reset_visited();

    info!("Generated {}x{} maze: {} tree passages, {} extra from {} loop trials",
          config.rows.0,
          config.columns.0,
          carved.len(),
          extra,
          trials);
    Ok(grid)
}

/// Apply the recursive backtracker (randomized depth first search) to a grid with all
/// of its walls in place.
///
/// Starting at the top-left cell, look at the cell on top of the stack: if it has any
/// unvisited neighbours carve a passage to one of them picked at random and push it,
/// otherwise pop the stack and backtrack. Every push visits a new cell so the stack
/// empties after exactly `rows * columns` pushes and the carved passages form a
/// spanning tree (`rows * columns - 1` passages).
///
/// The stack is an explicit `Vec`, not the call stack, so large grids cannot overflow.
/// Cells are left marked visited; `generate` resets them.
pub fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) -> CarveSequence {
    grid.reset_visited();
    let mut carved = Vec::with_capacity(grid.size().saturating_sub(1));

    let start = grid.start();
    grid.mark_visited(start);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let unvisited = grid.unvisited_neighbours(current);

        if let Some(&next) = unvisited.choose(rng) {
            grid.carve(current, next)
                .expect("unvisited neighbours are valid adjacent cells");
            grid.mark_visited(next);
            carved.push((current, next));
            stack.push(next);
        } else {
            stack.pop();
        }
    }

    debug!("Recursive backtracker carved {} passages", carved.len());
    carved
}

/// Perform `trials` attempts at removing a random wall. Each attempt picks a random
/// cell and one of its four directions; the wall goes if the neighbour exists and the
/// wall is still standing. Returns how many walls were removed.
///
/// This only ever adds passages, it is never needed for connectivity.
pub fn add_loops<R: Rng + ?Sized>(grid: &mut MazeGrid, trials: usize, rng: &mut R) -> usize {
    let mut removed = 0;
    for _ in 0..trials {
        let cell = grid.random_cell(rng);
        let dir = CompassPrimary::ALL[rng.gen_range(0..CompassPrimary::ALL.len())];

        if let Some(neighbour) = grid.neighbour_at_direction(cell, dir) {
            if grid.has_wall_between(cell, neighbour) && grid.carve(cell, neighbour).is_ok() {
                removed += 1;
            }
        }
    }
    removed
}

/// Rebuild the walls of up to `count` random passages, returning how many were rebuilt.
/// The result is usually no longer connected, which lets the solvers' "no path" outcome
/// be exercised.
pub fn rebuild_random_walls<R: Rng + ?Sized>(grid: &mut MazeGrid, count: usize, rng: &mut R) -> usize {
    let chosen = grid.iter_links().choose_multiple(rng, count);
    let rebuilt = chosen.into_iter()
        .filter(|&(a, b)| grid.rebuild_wall(a, b))
        .count();

    debug!("Rebuilt {} walls", rebuilt);
    rebuilt
}
