use docopt::Docopt;
use log::{debug, LevelFilter, Log, Metadata, Record};
use maze_search::{
    animation::{FrameSink, ImageFrames, NullFrames, TextFrames},
    config::MazeConfigBuilder,
    grid::MazeGrid,
    pathing::SolverAlgorithm,
    renderers,
    session::MazeSession,
};
use serde_derive::Deserialize;
use std::{
    fs,
    fs::File,
    io,
    io::prelude::*,
    path::Path,
    time::Duration,
};

const USAGE: &str = "Maze Search

Usage:
    maze_search_driver -h | --help
    maze_search_driver [options]
    maze_search_driver solve (dfs|bfs) [--animate] [options]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n, overrides --rows and --columns.
    --rows=<r>             Number of rows in the maze [default: 30].
    --columns=<c>          Number of columns in the maze [default: 30].
    --no-loops             Only carve the spanning tree, giving a perfect maze with a single route.
    --loop-factor=<f>      Loop trials as a fraction of the cell count [default: 0.15].
    --seed=<s>             Seed for the random generator, making the maze reproducible.
    --block-passages=<n>   Randomly choose n passages and wall them up again.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --text-out=<path>      Output file path for a textual rendering of the maze instead of stdout.
    --image-out=<path>     Output file path for an image rendering of the maze. Always PNG format.
    --cell-pixels=<n>      Pixel count to render one cell wall in a maze [default: 20] max 255.
    --animate              Reveal the solution one cell at a time.
    --interval=<ms>        Milliseconds between animation frames [default: 30].
    --frames-dir=<path>    Write animation frames as numbered PNG files into this directory instead of the terminal.
    -v --verbose           Log progress to stderr.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_solve: bool,
    cmd_bfs: bool,
    flag_grid_size: Option<usize>,
    flag_rows: usize,
    flag_columns: usize,
    flag_no_loops: bool,
    flag_loop_factor: f64,
    flag_seed: Option<u64>,
    flag_block_passages: Option<usize>,
    flag_save_edges: String,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_animate: bool,
    flag_interval: u64,
    flag_frames_dir: String,
    flag_verbose: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_search::errors::Error, ::maze_search::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Logger(::log::SetLoggerError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if e.fatal() => return Err(e.into()),
        Err(e) => e.exit(),
    };
    init_logging(args.flag_verbose)?;

    let (rows, columns) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_rows, args.flag_columns)
    };
    let algorithm = if args.cmd_bfs {
        SolverAlgorithm::BreadthFirst
    } else {
        SolverAlgorithm::DepthFirst
    };
    // Without --animate the path is revealed in one go
    let interval = if args.flag_animate { args.flag_interval } else { 0 };

    let config = MazeConfigBuilder::new()
        .rows(rows)
        .columns(columns)
        .enable_loops(!args.flag_no_loops)
        .loop_factor(args.flag_loop_factor)
        .algorithm(algorithm)
        .animation_interval(Duration::from_millis(interval))
        .seed(args.flag_seed)
        .build();
    let mut session = MazeSession::new(config);
    debug!("{:?}", session.config());
    eprintln!("{}", session.generate()?);

    if let Some(wall_count) = args.flag_block_passages {
        let rebuilt = session.block_passages(wall_count)?;
        debug!("Blocked {} of {} requested passages", rebuilt, wall_count);
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(current_grid(&session)?, &args.flag_save_edges)?;
    }

    let mut animated_as_text = false;
    if args.cmd_solve {
        let mut outcome = session.solve_configured()?;
        eprintln!("{}", outcome.status);

        if args.flag_animate && !args.flag_frames_dir.is_empty() {
            let mut frames = ImageFrames::new(Path::new(&args.flag_frames_dir), args.flag_cell_pixels)?;
            session.animate(&mut outcome.handle, &mut frames)?;
            debug!("Wrote {} frames to {}", frames.frames_written(), args.flag_frames_dir);
        } else if args.flag_animate && args.flag_text_out.is_empty() {
            let stdout = io::stdout();
            let mut frames = TextFrames::new(stdout.lock()).with_clear_screen(true);
            animate_path(&mut session, &mut outcome.handle, &mut frames)?;
            animated_as_text = outcome.path.is_some();
        } else {
            animate_path(&mut session, &mut outcome.handle, &mut NullFrames::default())?;
        }
    }

    let maze_grid = current_grid(&session)?;

    if args.flag_text_out.is_empty() {
        if !animated_as_text && args.flag_image_out.is_empty() {
            print!("{}", maze_grid);
        }
    } else {
        write_text_to_file(&maze_grid.to_string(), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .cell_side_pixels_length(args.flag_cell_pixels)
            .mark_start_end(true)
            .show_path(args.cmd_solve)
            .output_file(Some(Path::new(&args.flag_image_out)))
            .build();
        renderers::render_square_grid(maze_grid, &render_options)?;
    }

    Ok(())
}

fn animate_path<S: FrameSink>(session: &mut MazeSession,
                              handle: &mut maze_search::animation::AnimationHandle,
                              sink: &mut S)
                              -> Result<()> {
    let step = session.animate(handle, sink)?;
    debug!("Animation ended with {:?}", step);
    Ok(())
}

fn current_grid(session: &MazeSession) -> Result<&MazeGrid> {
    session.grid().ok_or_else(|| "No maze has been generated.".into())
}

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &MazeGrid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.passages_count();
    graph_data.push_str(&format!("{} {}\n", vertices_count, edges_count));

    for (src, dst) in maze_grid.iter_links() {
        let index_a = maze_grid
            .grid_coordinate_to_index(src)
            .ok_or("Links iter gave an invalid coordinate")?;
        let index_b = maze_grid
            .grid_coordinate_to_index(dst)
            .ok_or("Links iter gave an invalid coordinate")?;
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(&format!("{} {}\n", src_as_1_based_index, dst_as_1_based_index));
    }

    fs::write(file_path, graph_data)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
