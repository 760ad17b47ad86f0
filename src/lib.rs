//! **maze_search** generates rectangular mazes with a randomized depth first search
//! (optionally with extra loops), solves them with depth first or breadth first search and
//! reveals the solution one cell at a time as text or image frames.

pub mod animation;
pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod renderers;
pub mod session;
pub mod units;
mod utils;
