use std::fmt;

use crate::cells::{CellCoordinate, CompassPrimary};
use crate::grid::MazeGrid;
use crate::units::{ColumnsCount, RowsCount};

impl MazeGrid {
    /// Render the contents of a grid cell as text, 3 glyphs wide.
    pub fn render_cell_body(&self, coord: CellCoordinate) -> &'static str {
        if coord == self.start() {
            " S "
        } else if coord == self.end() {
            " E "
        } else if self.cell(coord).map_or(false, |cell| cell.is_in_path()) {
            " * "
        } else {
            "   "
        }
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let ColumnsCount(columns_count) = self.columns();
        let RowsCount(rows_count) = self.rows();

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        for column in 0..columns_count {
            let coord = CellCoordinate::new(0, column as u32);
            output.push_str(WALL_LR_3);
            if self.has_passage(coord, CompassPrimary::East) {
                output.push_str(WALL_LR);
            } else if column == columns_count - 1 {
                output.push_str(WALL_LD);
            } else {
                output.push_str(WALL_LRD);
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {

            let is_last_row = index_row == (rows_count - 1);

            // The west most boundary of the row is special cased, the top section of
            // each cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell_coord) in row.into_iter().enumerate() {

                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let east_open = self.has_passage(cell_coord, CompassPrimary::East);
                let south_open = self.has_passage(cell_coord, CompassPrimary::South);

                // Each cell uses the southern wall of the cell above it as its own northern
                // wall, so only the body, the eastern boundary and the southern boundary
                // (minus the south west corner) are drawn here.
                row_middle_section_render.push_str(self.render_cell_body(cell_coord));
                row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            self.neighbour_at_direction(cell_coord, CompassPrimary::East)
                                .map_or(false, |c| self.has_passage(c, CompassPrimary::South));
                        let access_se_from_south =
                            self.neighbour_at_direction(cell_coord, CompassPrimary::South)
                                .map_or(false, |c| self.has_passage(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
