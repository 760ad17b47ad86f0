use image::{Rgba, RgbaImage};
use log::debug;
use std::path::Path;

use crate::cells::CompassPrimary;
use crate::errors::*;
use crate::grid::MazeGrid;

pub const BACKGROUND_COLOUR: Rgba<u8> = Rgba([0x0a, 0x19, 0x2f, 0xff]);
pub const WALL_COLOUR: Rgba<u8> = Rgba([0x64, 0xff, 0xda, 0xff]);
pub const VISITED_COLOUR: Rgba<u8> = Rgba([0x25, 0x30, 0x40, 0xff]);
pub const PATH_COLOUR: Rgba<u8> = Rgba([0x64, 0xff, 0xda, 0x88]);
pub const START_COLOUR: Rgba<u8> = Rgba([0xff, 0x6f, 0x61, 0xff]);
pub const END_COLOUR: Rgba<u8> = Rgba([0xff, 0xd1, 0x66, 0xff]);

#[derive(Debug, Clone)]
pub struct RenderOptions<'path> {
    cell_side_pixels_length: u32,
    wall_thickness: u32,
    mark_start_end: bool,
    show_path: bool,
    output_file: Option<&'path Path>,
}

impl<'path> Default for RenderOptions<'path> {
    fn default() -> RenderOptions<'path> {
        RenderOptions {
            cell_side_pixels_length: 20,
            wall_thickness: 2,
            mark_start_end: true,
            show_path: true,
            output_file: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderOptionsBuilder<'path> {
    options: RenderOptions<'path>,
}

impl<'path> RenderOptionsBuilder<'path> {
    pub fn new() -> RenderOptionsBuilder<'path> {
        RenderOptionsBuilder::default()
    }
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u8) -> Self {
        self.options.cell_side_pixels_length = u32::from(cell_side_pixels_length.max(4));
        self
    }
    pub fn wall_thickness(mut self, thickness: u8) -> Self {
        self.options.wall_thickness = u32::from(thickness.max(1));
        self
    }
    pub fn mark_start_end(mut self, on: bool) -> Self {
        self.options.mark_start_end = on;
        self
    }
    pub fn show_path(mut self, on: bool) -> Self {
        self.options.show_path = on;
        self
    }
    pub fn output_file(mut self, file: Option<&'path Path>) -> Self {
        self.options.output_file = file;
        self
    }
    pub fn build(self) -> RenderOptions<'path> {
        self.options
    }
}

/// Draw the maze: cell fills first (visited, then path highlight), then the walls,
/// then the start and end markers on top. The image is also saved as a PNG when the
/// options name an output file.
pub fn render_square_grid(grid: &MazeGrid, options: &RenderOptions) -> Result<RgbaImage> {
    let cell = options.cell_side_pixels_length;
    let thickness = options.wall_thickness.min(cell / 2);
    let img_width = cell * grid.columns().0 as u32 + thickness;
    let img_height = cell * grid.rows().0 as u32 + thickness;
    let mut image = RgbaImage::from_pixel(img_width, img_height, BACKGROUND_COLOUR);

    for coord in grid.iter() {
        let maze_cell = match grid.cell(coord) {
            Some(maze_cell) => maze_cell,
            None => continue,
        };
        let x1 = coord.column * cell;
        let y1 = coord.row * cell;

        if maze_cell.is_visited() {
            fill_rect(&mut image, x1, y1, cell, cell, VISITED_COLOUR);
        }
        if options.show_path && maze_cell.is_in_path() {
            fill_rect(&mut image, x1, y1, cell, cell, PATH_COLOUR);
        }
    }

    for coord in grid.iter() {
        let maze_cell = match grid.cell(coord) {
            Some(maze_cell) => maze_cell,
            None => continue,
        };
        let x1 = coord.column * cell;
        let y1 = coord.row * cell;
        let x2 = x1 + cell;
        let y2 = y1 + cell;

        if maze_cell.has_wall(CompassPrimary::North) {
            fill_rect(&mut image, x1, y1, cell + thickness, thickness, WALL_COLOUR);
        }
        if maze_cell.has_wall(CompassPrimary::West) {
            fill_rect(&mut image, x1, y1, thickness, cell + thickness, WALL_COLOUR);
        }
        if maze_cell.has_wall(CompassPrimary::East) {
            fill_rect(&mut image, x2, y1, thickness, cell + thickness, WALL_COLOUR);
        }
        if maze_cell.has_wall(CompassPrimary::South) {
            fill_rect(&mut image, x1, y2, cell + thickness, thickness, WALL_COLOUR);
        }
    }

    if options.mark_start_end {
        let quarter = cell / 4;
        for &(coord, colour) in [(grid.start(), START_COLOUR), (grid.end(), END_COLOUR)].iter() {
            fill_rect(&mut image,
                      coord.column * cell + quarter,
                      coord.row * cell + quarter,
                      cell / 2,
                      cell / 2,
                      colour);
        }
    }

    if let Some(file_path) = options.output_file {
        image.save(file_path)
            .chain_err(|| format!("Failed to save maze image to {}", file_path.display()))?;
        debug!("Saved {}x{} maze image to {}", img_width, img_height, file_path.display());
    }

    Ok(image)
}

/// Fill a rectangle, clipped to the image. Translucent colours are blended over
/// what is already there.
fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, colour: Rgba<u8>) {
    let x_end = x.saturating_add(width).min(image.width());
    let y_end = y.saturating_add(height).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            let blended = blend(*image.get_pixel(px, py), colour);
            image.put_pixel(px, py, blended);
        }
    }
}

fn blend(below: Rgba<u8>, above: Rgba<u8>) -> Rgba<u8> {
    let alpha = u32::from(above.0[3]);
    if alpha == 0xff {
        return above;
    }
    let mix = |b: u8, a: u8| ((u32::from(a) * alpha + u32::from(b) * (0xff - alpha)) / 0xff) as u8;
    Rgba([mix(below.0[0], above.0[0]),
          mix(below.0[1], above.0[1]),
          mix(below.0[2], above.0[2]),
          0xff])
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use super::*;
    use crate::cells::CellCoordinate;
    use crate::units::{ColumnsCount, RowsCount};

    fn options<'a>() -> RenderOptions<'a> {
        RenderOptionsBuilder::new()
            .cell_side_pixels_length(20)
            .wall_thickness(2)
            .build()
    }

    #[test]
    fn image_size_follows_the_grid() {
        let g = MazeGrid::new(RowsCount(3), ColumnsCount(5)).unwrap();
        let image = render_square_grid(&g, &options()).unwrap();
        assert_eq!(image.dimensions(), (5 * 20 + 2, 3 * 20 + 2));
    }

    #[test]
    fn walls_and_markers() {
        let mut g = MazeGrid::new(RowsCount(1), ColumnsCount(2)).unwrap();
        g.carve(CellCoordinate::new(0, 0), CellCoordinate::new(0, 1)).unwrap();
        let image = render_square_grid(&g, &options()).unwrap();

        // outer walls
        assert_eq!(*image.get_pixel(0, 10), WALL_COLOUR);
        assert_eq!(*image.get_pixel(10, 0), WALL_COLOUR);
        assert_eq!(*image.get_pixel(40, 10), WALL_COLOUR);
        // carved wall between the two cells is gone
        assert_eq!(*image.get_pixel(20, 3), BACKGROUND_COLOUR);
        // marker centres
        assert_eq!(*image.get_pixel(10, 10), START_COLOUR);
        assert_eq!(*image.get_pixel(30, 10), END_COLOUR);
    }

    #[test]
    fn path_cells_are_highlighted() {
        let mut g = MazeGrid::new(RowsCount(1), ColumnsCount(3)).unwrap();
        g.mark_in_path(CellCoordinate::new(0, 1));
        let image = render_square_grid(&g, &options()).unwrap();
        let highlighted = *image.get_pixel(30, 10);
        assert_ne!(highlighted, BACKGROUND_COLOUR);
        assert_eq!(highlighted, blend(BACKGROUND_COLOUR, PATH_COLOUR));

        let hidden = RenderOptionsBuilder::new().show_path(false).build();
        let image = render_square_grid(&g, &hidden).unwrap();
        assert_eq!(*image.get_pixel(30, 10), BACKGROUND_COLOUR);
    }

    #[test]
    fn blending() {
        assert_eq!(blend(BACKGROUND_COLOUR, WALL_COLOUR), WALL_COLOUR);
        let half = blend(Rgba([0, 0, 0, 0xff]), Rgba([0xff, 0xff, 0xff, 0x88]));
        assert_eq!(half, Rgba([0x88, 0x88, 0x88, 0xff]));
    }

    #[test]
    fn saves_png() {
        let g = MazeGrid::new(RowsCount(2), ColumnsCount(2)).unwrap();
        let path = env::temp_dir().join(format!("maze_search_render_{}.png", std::process::id()));
        let render_options = RenderOptionsBuilder::new().output_file(Some(path.as_path())).build();
        render_square_grid(&g, &render_options).unwrap();
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.to_rgba8().dimensions(), (2 * 20 + 2, 2 * 20 + 2));
        fs::remove_file(&path).unwrap();
    }
}
