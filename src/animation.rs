use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::cells::CellCoordinate;
use crate::errors::*;
use crate::grid::MazeGrid;
use crate::renderers::{self, RenderOptions, RenderOptionsBuilder};

/// Somewhere to show successive states of a maze while a path is revealed.
pub trait FrameSink {
    fn draw(&mut self, grid: &MazeGrid) -> Result<()>;
}

/// Reprints the text rendering of the maze for every frame.
#[derive(Debug)]
pub struct TextFrames<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TextFrames<W> {
    pub fn new(out: W) -> TextFrames<W> {
        TextFrames { out, clear_screen: false }
    }

    /// Clear the terminal and move the cursor home before each frame.
    pub fn with_clear_screen(mut self, on: bool) -> Self {
        self.clear_screen = on;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TextFrames<W> {
    fn draw(&mut self, grid: &MazeGrid) -> Result<()> {
        if self.clear_screen {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        write!(self.out, "{}", grid)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes every frame as a numbered PNG (`frame_00000.png`, `frame_00001.png`...) into a
/// directory.
#[derive(Debug)]
pub struct ImageFrames {
    directory: PathBuf,
    options: RenderOptions<'static>,
    frames_written: usize,
}

impl ImageFrames {
    pub fn new(directory: &Path, cell_side_pixels_length: u8) -> Result<ImageFrames> {
        fs::create_dir_all(directory)
            .chain_err(|| format!("Failed to create frames directory {}", directory.display()))?;
        let options = RenderOptionsBuilder::new()
            .cell_side_pixels_length(cell_side_pixels_length)
            .build();
        Ok(ImageFrames {
            directory: directory.to_path_buf(),
            options,
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    fn frame_path(&self, frame: usize) -> PathBuf {
        self.directory.join(format!("frame_{:05}.png", frame))
    }
}

impl FrameSink for ImageFrames {
    fn draw(&mut self, grid: &MazeGrid) -> Result<()> {
        let image = renderers::render_square_grid(grid, &self.options)?;
        let file_path = self.frame_path(self.frames_written);
        image.save(&file_path)
            .chain_err(|| format!("Failed to save animation frame {}", file_path.display()))?;
        self.frames_written += 1;
        Ok(())
    }
}

/// Draws nothing, only counts.
#[derive(Debug, Default)]
pub struct NullFrames {
    pub frames: usize,
}

impl FrameSink for NullFrames {
    fn draw(&mut self, _: &MazeGrid) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimationStep {
    /// The cell was marked as part of the path.
    Revealed(CellCoordinate),
    Finished,
    /// A newer animation (or an explicit cancel) superseded this one.
    Cancelled,
}

/// A path waiting to be revealed, tied to the animator token current when it began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationHandle {
    token: u64,
    path: Vec<CellCoordinate>,
    next: usize,
}

impl AnimationHandle {
    pub fn path(&self) -> &[CellCoordinate] {
        &self.path
    }

    pub fn remaining(&self) -> usize {
        self.path.len() - self.next
    }
}

/// Reveals paths one cell at a time.
///
/// Every `begin` or `cancel` moves the token on, so at most one handle is live at a time
/// and anything started earlier steps straight to `Cancelled` without touching the grid.
#[derive(Debug, Default)]
pub struct Animator {
    token: u64,
}

impl Animator {
    pub fn new() -> Animator {
        Animator::default()
    }

    pub fn begin(&mut self, path: Vec<CellCoordinate>) -> AnimationHandle {
        self.token += 1;
        AnimationHandle {
            token: self.token,
            path,
            next: 0,
        }
    }

    pub fn cancel(&mut self) {
        self.token += 1;
    }

    pub fn is_current(&self, handle: &AnimationHandle) -> bool {
        handle.token == self.token
    }

    pub fn step(&self, grid: &mut MazeGrid, handle: &mut AnimationHandle) -> AnimationStep {
        if !self.is_current(handle) {
            return AnimationStep::Cancelled;
        }
        match handle.path.get(handle.next) {
            Some(&coord) => {
                handle.next += 1;
                if !grid.mark_in_path(coord) {
                    warn!("Animated path cell {} is not on the grid", coord);
                }
                AnimationStep::Revealed(coord)
            }
            None => AnimationStep::Finished,
        }
    }

    /// Step `handle` to completion, drawing a frame after each revealed cell and sleeping
    /// `interval` between frames. Returns `Finished` or `Cancelled`.
    pub fn run<S: FrameSink + ?Sized>(&self,
                                      grid: &mut MazeGrid,
                                      handle: &mut AnimationHandle,
                                      sink: &mut S,
                                      interval: Duration)
                                      -> Result<AnimationStep> {
        loop {
            match self.step(grid, handle) {
                AnimationStep::Revealed(_) => {
                    sink.draw(grid)?;
                    if handle.remaining() > 0 && interval > Duration::from_millis(0) {
                        thread::sleep(interval);
                    }
                }
                AnimationStep::Cancelled => {
                    debug!("Animation {} cancelled, current token is {}", handle.token, self.token);
                    return Ok(AnimationStep::Cancelled);
                }
                AnimationStep::Finished => return Ok(AnimationStep::Finished),
            }
        }
    }
}
