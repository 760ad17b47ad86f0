use error_chain::bail;
use std::time::Duration;

use crate::errors::*;
use crate::pathing::SolverAlgorithm;
use crate::units::{ColumnsCount, RowsCount};

pub const DEFAULT_ROWS: usize = 30;
pub const DEFAULT_COLUMNS: usize = 30;
/// Fraction of the cell count used as the number of loop-introduction trials.
pub const DEFAULT_LOOP_FACTOR: f64 = 0.15;
pub const DEFAULT_ANIMATION_INTERVAL_MS: u64 = 30;

/// Everything a `MazeSession` needs to generate, solve and animate a maze.
///
/// The two historical flavours of the program map onto this as
/// `enable_loops = false, algorithm = DepthFirst` (perfect maze, DFS only) and
/// `enable_loops = true` with either algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub rows: RowsCount,
    pub columns: ColumnsCount,
    pub enable_loops: bool,
    pub loop_factor: f64,
    pub algorithm: SolverAlgorithm,
    pub animation_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        MazeConfig {
            rows: RowsCount(DEFAULT_ROWS),
            columns: ColumnsCount(DEFAULT_COLUMNS),
            enable_loops: true,
            loop_factor: DEFAULT_LOOP_FACTOR,
            algorithm: SolverAlgorithm::DepthFirst,
            animation_interval: Duration::from_millis(DEFAULT_ANIMATION_INTERVAL_MS),
            seed: None,
        }
    }
}

impl MazeConfig {
    /// The loop factor must be a finite fraction of the cell count, from 0 to 1.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.loop_factor) {
            bail!(ErrorKind::InvalidLoopFactor(self.loop_factor));
        }
        Ok(())
    }

    /// Number of random wall-removal trials the loop pass performs:
    /// floor(rows * columns * loop_factor), or zero with loops disabled. Factors outside
    /// 0 to 1 are clamped into that range.
    pub fn loop_trials(&self) -> usize {
        if !self.enable_loops || !(self.loop_factor > 0.0) {
            return 0;
        }
        let cells = (self.rows.0 * self.columns.0) as f64;
        (cells * self.loop_factor.min(1.0)).floor() as usize
    }
}

#[derive(Debug, Default)]
pub struct MazeConfigBuilder {
    config: MazeConfig,
}

impl MazeConfigBuilder {
    pub fn new() -> MazeConfigBuilder {
        MazeConfigBuilder::default()
    }
    pub fn rows(mut self, rows: usize) -> Self {
        self.config.rows = RowsCount(rows);
        self
    }
    pub fn columns(mut self, columns: usize) -> Self {
        self.config.columns = ColumnsCount(columns);
        self
    }
    pub fn enable_loops(mut self, on: bool) -> Self {
        self.config.enable_loops = on;
        self
    }
    pub fn loop_factor(mut self, factor: f64) -> Self {
        self.config.loop_factor = factor;
        self
    }
    pub fn algorithm(mut self, algorithm: SolverAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }
    pub fn animation_interval(mut self, interval: Duration) -> Self {
        self.config.animation_interval = interval;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.config.seed = seed;
        self
    }
    pub fn build(self) -> MazeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_maze() {
        let config = MazeConfig::default();
        assert_eq!(config.rows, RowsCount(30));
        assert_eq!(config.columns, ColumnsCount(30));
        assert!(config.enable_loops);
        assert_eq!(config.algorithm, SolverAlgorithm::DepthFirst);
        assert_eq!(config.animation_interval, Duration::from_millis(30));
        assert_eq!(config.loop_trials(), 135);
    }

    #[test]
    fn loop_trials_round_down() {
        let config = MazeConfigBuilder::new().rows(3).columns(3).build();
        assert_eq!(config.loop_trials(), 1);
        let config = MazeConfigBuilder::new().rows(2).columns(3).build();
        assert_eq!(config.loop_trials(), 0);
    }

    #[test]
    fn loops_can_be_switched_off() {
        let config = MazeConfigBuilder::new().enable_loops(false).build();
        assert_eq!(config.loop_trials(), 0);
        let config = MazeConfigBuilder::new().loop_factor(0.0).build();
        assert_eq!(config.loop_trials(), 0);
    }

    #[test]
    fn loop_factor_range() {
        assert!(MazeConfig::default().validate().is_ok());
        for &factor in [0.0, 0.5, 1.0].iter() {
            assert!(MazeConfigBuilder::new().loop_factor(factor).build().validate().is_ok());
        }
        for &factor in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 1.5, 1e18, -0.1].iter() {
            match MazeConfigBuilder::new().loop_factor(factor).build().validate() {
                Err(Error(ErrorKind::InvalidLoopFactor(_), _)) => {}
                other => panic!("expected InvalidLoopFactor for {}, got {:?}", factor, other),
            }
        }
    }

    #[test]
    fn loop_trials_never_exceed_the_cell_count() {
        let config = MazeConfigBuilder::new().rows(2).columns(2).loop_factor(f64::INFINITY).build();
        assert_eq!(config.loop_trials(), 4);
        let config = MazeConfigBuilder::new().rows(2).columns(2).loop_factor(1e18).build();
        assert_eq!(config.loop_trials(), 4);
        let config = MazeConfigBuilder::new().rows(2).columns(2).loop_factor(f64::NAN).build();
        assert_eq!(config.loop_trials(), 0);
    }

    #[test]
    fn builder_sets_every_field() {
        let config = MazeConfigBuilder::new()
            .rows(4)
            .columns(9)
            .algorithm(SolverAlgorithm::BreadthFirst)
            .animation_interval(Duration::from_millis(5))
            .seed(Some(42))
            .build();
        assert_eq!(config.rows, RowsCount(4));
        assert_eq!(config.columns, ColumnsCount(9));
        assert_eq!(config.algorithm, SolverAlgorithm::BreadthFirst);
        assert_eq!(config.animation_interval, Duration::from_millis(5));
        assert_eq!(config.seed, Some(42));
    }
}
