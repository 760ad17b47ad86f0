use error_chain::bail;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{AnimationHandle, AnimationStep, Animator, FrameSink};
use crate::cells::CellCoordinate;
use crate::config::MazeConfig;
use crate::errors::*;
use crate::generators;
use crate::grid::MazeGrid;
use crate::pathing::{self, SolverAlgorithm};

pub const GENERATED_STATUS: &str = "Maze generated. Solve with DFS or BFS to watch the solution.";
pub const NO_PATH_STATUS: &str = "No path found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub algorithm: SolverAlgorithm,
    pub status: String,
    pub path: Option<Vec<CellCoordinate>>,
    pub handle: AnimationHandle,
}

/// One user's maze: the configuration, the current grid (if generated yet), the random
/// source and the animator. Generating replaces the grid and cancels any animation in
/// flight; solving restarts the animation with the new path.
#[derive(Debug)]
pub struct MazeSession {
    config: MazeConfig,
    grid: Option<MazeGrid>,
    rng: StdRng,
    animator: Animator,
}

impl MazeSession {
    pub fn new(config: MazeConfig) -> MazeSession {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        MazeSession {
            config,
            grid: None,
            rng,
            animator: Animator::new(),
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn grid(&self) -> Option<&MazeGrid> {
        self.grid.as_ref()
    }

    pub fn generate(&mut self) -> Result<&'static str> {
        self.animator.cancel();
        self.grid = None;
        self.grid = Some(generators::generate(&self.config, &mut self.rng)?);
        Ok(GENERATED_STATUS)
    }

    pub fn solve(&mut self, algorithm: SolverAlgorithm) -> Result<SolveOutcome> {
        let grid = match self.grid.as_mut() {
            Some(grid) => grid,
            None => bail!(ErrorKind::NoGrid),
        };
        grid.clear_path();

        let path = pathing::solve(grid, algorithm);
        let mut status = format!("Solving maze with {}...", algorithm);
        if path.is_none() {
            status.push(' ');
            status.push_str(NO_PATH_STATUS);
        }
        info!("{}", status);

        let handle = self.animator.begin(path.clone().unwrap_or_default());
        Ok(SolveOutcome {
            algorithm,
            status,
            path,
            handle,
        })
    }

    /// Solve with the algorithm chosen in the session's config.
    pub fn solve_configured(&mut self) -> Result<SolveOutcome> {
        let algorithm = self.config.algorithm;
        self.solve(algorithm)
    }

    pub fn solve_dfs(&mut self) -> Result<SolveOutcome> {
        self.solve(SolverAlgorithm::DepthFirst)
    }

    pub fn solve_bfs(&mut self) -> Result<SolveOutcome> {
        self.solve(SolverAlgorithm::BreadthFirst)
    }

    /// Reveal the handle's path on the grid, one frame per cell at the configured interval.
    pub fn animate<S: FrameSink + ?Sized>(&mut self,
                                          handle: &mut AnimationHandle,
                                          sink: &mut S)
                                          -> Result<AnimationStep> {
        let interval = self.config.animation_interval;
        match self.grid.as_mut() {
            Some(grid) => self.animator.run(grid, handle, sink, interval),
            None => Ok(AnimationStep::Cancelled),
        }
    }

    /// Stop whatever animation is in flight. Cells already revealed stay marked.
    pub fn cancel_animation(&mut self) {
        self.animator.cancel();
    }

    /// Wall up to `count` random passages of the current grid, which usually leaves the
    /// end unreachable.
    pub fn block_passages(&mut self, count: usize) -> Result<usize> {
        match self.grid.as_mut() {
            Some(grid) => Ok(generators::rebuild_random_walls(grid, count, &mut self.rng)),
            None => bail!(ErrorKind::NoGrid),
        }
    }
}
