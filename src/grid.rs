use error_chain::bail;
use log::debug;
use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};
use rand::Rng;
use std::fmt;

use crate::cells::{CellCoordinate, CompassPrimary, CoordinateSmallVec, MazeCell};
use crate::errors::*;
use crate::grid_iterators::{RectBatchIter, RectGridCellIter};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// A rectangular grid of square cells. Every wall is stored on both of the cells that
/// share it and the two flags are only ever changed together.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeGrid {
    cells: Vec<MazeCell>,
    rows: RowsCount,
    columns: ColumnsCount,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotAdjacent,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MazeGrid :: rows: {:?}, columns: {:?}, passages: {:?}",
               self.rows, self.columns, self.passages_count())
    }
}

impl MazeGrid {
    /// A grid with every wall in place. Both dimensions must be at least one cell.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<MazeGrid> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        if r == 0 || c == 0 || r > u32::max_value() as usize || c > u32::max_value() as usize {
            bail!(ErrorKind::InvalidDimensions(r, c));
        }

        debug!("Creating {}x{} grid", r, c);
        Ok(MazeGrid {
            cells: vec![MazeCell::default(); r * c],
            rows,
            columns,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Upper bound on the passages a grid of this size can hold.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (RowsCount(r), ColumnsCount(c)) = (self.rows, self.columns);
        (NodesCount(r * c), EdgesCount(r * (c - 1) + c * (r - 1)))
    }

    /// The top-left cell, where generation and solving begin.
    #[inline]
    pub fn start(&self) -> CellCoordinate {
        CellCoordinate::new(0, 0)
    }

    /// The bottom-right cell, the solvers' goal.
    #[inline]
    pub fn end(&self) -> CellCoordinate {
        CellCoordinate::new(self.rows.0 as u32 - 1, self.columns.0 as u32 - 1)
    }

    #[inline]
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> CellCoordinate {
        let index = rng.gen_range(0..self.size());
        self.index_to_grid_coordinate(index)
    }

    #[inline]
    pub fn cell(&self, coord: CellCoordinate) -> Option<&MazeCell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellCoordinate) -> bool {
        (coord.row as usize) < self.rows.0 && (coord.column as usize) < self.columns.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.columns.0 + coord.column as usize)
        } else {
            None
        }
    }

    /// Inverse of `grid_coordinate_to_index`; `index` must be below `size()`.
    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> CellCoordinate {
        debug_assert!(index < self.size());
        CellCoordinate::new((index / self.columns.0) as u32, (index % self.columns.0) as u32)
    }

    pub fn neighbour_at_direction(&self,
                                  coord: CellCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<CellCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells to the North, East, South or West of a cell (in that order), but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Neighbours not yet marked visited, in North, East, South, West order.
    pub fn unvisited_neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| !self.cells[self.index_of(*neighbour)].is_visited())
            .collect()
    }

    /// Neighbours reachable through a removed wall, in North, East, South, West order.
    pub fn accessible_neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter(|dir| self.has_passage(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Is there an open passage from `coord` towards `direction`? False at the grid
    /// boundary and for invalid coordinates.
    pub fn has_passage(&self, coord: CellCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |_| !self.cells[self.index_of(coord)].has_wall(direction))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: CellCoordinate, b: CellCoordinate) -> bool {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return false;
        }
        a.direction_to(b).map_or(false, |dir| self.has_passage(a, dir))
    }

    /// Carve a passage between two adjacent cells, removing the wall on both sides.
    /// Carving an existing passage again is fine.
    pub fn carve(&mut self, a: CellCoordinate, b: CellCoordinate) -> ::std::result::Result<(), CellLinkError> {
        self.set_wall_pair(a, b, false).map(|_| ())
    }

    /// Put back the wall between two cells, if the grid coordinates are valid and a
    /// passage exists between them. Returns true if a wall was rebuilt.
    pub fn rebuild_wall(&mut self, a: CellCoordinate, b: CellCoordinate) -> bool {
        self.set_wall_pair(a, b, true).unwrap_or(false)
    }

    /// Number of removed wall pairs.
    pub fn passages_count(&self) -> usize {
        self.iter_links().count()
    }

    #[inline]
    pub fn iter(&self) -> RectGridCellIter {
        RectGridCellIter::new(self.rows, self.columns)
    }

    #[inline]
    pub fn iter_row(&self) -> RectBatchIter {
        RectBatchIter::rows(self.rows, self.columns)
    }

    #[inline]
    pub fn iter_column(&self) -> RectBatchIter {
        RectBatchIter::columns(self.rows, self.columns)
    }

    /// Every passage exactly once, as (cell, east or south neighbour) pairs in row-major order.
    pub fn iter_links(&self) -> LinksIter<'_> {
        LinksIter {
            grid: self,
            cell_iter: self.iter(),
            current: None,
            next_direction: 0,
        }
    }

    pub fn reset_visited(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.set_visited(false);
        }
    }

    pub fn clear_path(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.set_in_path(false);
        }
    }

    /// Flag a cell as part of the displayed path. Returns false for an invalid coordinate.
    pub fn mark_in_path(&mut self, coord: CellCoordinate) -> bool {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => {
                self.cells[index].set_in_path(true);
                true
            }
            None => false,
        }
    }

    /// The cells currently flagged as on the path, in row-major order.
    pub fn path_cells(&self) -> Vec<CellCoordinate> {
        self.iter().filter(|coord| self.cells[self.index_of(*coord)].is_in_path()).collect()
    }

    /// The passages as an undirected graph. Node indices follow the row-major cell
    /// indices and each node carries its coordinate.
    pub fn passage_graph<GridIndexType: IndexType>(&self)
                                                   -> Graph<CellCoordinate, (), Undirected, GridIndexType> {
        let (NodesCount(nodes), _) = self.graph_size();
        let mut graph = Graph::with_capacity(nodes, self.passages_count());
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            let a_index = graph::NodeIndex::<GridIndexType>::new(self.index_of(a));
            let b_index = graph::NodeIndex::<GridIndexType>::new(self.index_of(b));
            let _ = graph.add_edge(a_index, b_index, ());
        }
        graph
    }

    pub(crate) fn mark_visited(&mut self, coord: CellCoordinate) {
        let index = self.index_of(coord);
        self.cells[index].set_visited(true);
    }

    pub(crate) fn has_wall_between(&self, a: CellCoordinate, b: CellCoordinate) -> bool {
        match a.direction_to(b) {
            Some(dir) if self.is_valid_coordinate(a) && self.is_valid_coordinate(b) => {
                self.cells[self.index_of(a)].has_wall(dir) &&
                self.cells[self.index_of(b)].has_wall(dir.opposite())
            }
            _ => false,
        }
    }

    /// Sets both sides of a shared wall. Returns whether the wall state changed.
    fn set_wall_pair(&mut self,
                     a: CellCoordinate,
                     b: CellCoordinate,
                     present: bool)
                     -> ::std::result::Result<bool, CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        let (a_index, b_index) = match (self.grid_coordinate_to_index(a),
                                        self.grid_coordinate_to_index(b)) {
            (Some(a_index), Some(b_index)) => (a_index, b_index),
            _ => return Err(CellLinkError::InvalidGridCoordinate),
        };
        let dir = a.direction_to(b).ok_or(CellLinkError::NotAdjacent)?;

        let changed = self.cells[a_index].has_wall(dir) != present;
        self.cells[a_index].set_wall(dir, present);
        self.cells[b_index].set_wall(dir.opposite(), present);
        Ok(changed)
    }

    #[inline]
    fn index_of(&self, coord: CellCoordinate) -> usize {
        coord.row as usize * self.columns.0 + coord.column as usize
    }
}

pub struct LinksIter<'a> {
    grid: &'a MazeGrid,
    cell_iter: RectGridCellIter,
    current: Option<CellCoordinate>,
    next_direction: usize,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (CellCoordinate, CellCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        // Only the east and south walls of each cell, so every pair shows up once.
        const FORWARD: [CompassPrimary; 2] = [CompassPrimary::East, CompassPrimary::South];
        loop {
            if self.current.is_none() || self.next_direction >= FORWARD.len() {
                self.current = Some(self.cell_iter.next()?);
                self.next_direction = 0;
            }
            let coord = self.current?;
            let dir = FORWARD[self.next_direction];
            self.next_direction += 1;
            if self.grid.has_passage(coord, dir) {
                if let Some(neighbour) = self.grid.neighbour_at_direction(coord, dir) {
                    return Some((coord, neighbour));
                }
            }
        }
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cells iter : {:?}", self.cell_iter)
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use petgraph::algo::connected_components;
    use rand::{rngs::StdRng, SeedableRng};
    use smallvec::SmallVec;
    use std::u32;

    use super::*;
    use crate::units::{ColumnsCount, RowsCount};

    fn small_grid(rows: usize, columns: usize) -> MazeGrid {
        MazeGrid::new(RowsCount(rows), ColumnsCount(columns)).expect("valid dimensions")
    }

    // Compare a smallvec to e.g. a vec! or &[T].
    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => (assert_eq!(&*$x, &*$y))
    }

    #[test]
    fn zero_sized_grids_are_rejected() {
        for &(r, c) in &[(0, 0), (0, 5), (5, 0)] {
            match MazeGrid::new(RowsCount(r), ColumnsCount(c)) {
                Err(Error(ErrorKind::InvalidDimensions(er, ec), _)) => {
                    assert_eq!((er, ec), (r, c));
                }
                other => panic!("expected invalid dimensions, got {:?}", other),
            }
        }
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[CellCoordinate]| {
            let neighbours: Vec<CellCoordinate> = g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<CellCoordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };
        let gc = |r, c| CellCoordinate::new(r, c);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);
        check_expected_neighbours(gc(8, 9), &[gc(7, 9), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_come_in_compass_order() {
        let g = small_grid(3, 3);
        let gc = |r, c| CellCoordinate::new(r, c);
        assert_smallvec_eq!(g.neighbours(gc(1, 1)), &[gc(0, 1), gc(1, 2), gc(2, 1), gc(1, 0)]);
    }

    #[test]
    fn out_of_bounds_lookups_are_none() {
        let g = small_grid(2, 3);
        let outside = CellCoordinate::new(u32::MAX, u32::MAX);
        assert_eq!(g.neighbour_at_direction(outside, CompassPrimary::North), None);
        assert!(g.neighbours(outside).is_empty());
        assert!(g.accessible_neighbours(outside).is_empty());
        assert!(g.cell(outside).is_none());
        assert!(!g.has_passage(outside, CompassPrimary::West));
        assert_eq!(g.neighbour_at_direction(CellCoordinate::new(1, 2), CompassPrimary::East),
                   None);
        assert_eq!(g.neighbour_at_direction(CellCoordinate::new(1, 2), CompassPrimary::South),
                   None);
    }

    #[test]
    fn grid_size() {
        let g = small_grid(4, 7);
        assert_eq!(g.size(), 28);
        assert_eq!(g.rows(), RowsCount(4));
        assert_eq!(g.columns(), ColumnsCount(7));
        assert_eq!(g.graph_size(), (NodesCount(28), EdgesCount(4 * 6 + 7 * 3)));
        assert_eq!(g.start(), CellCoordinate::new(0, 0));
        assert_eq!(g.end(), CellCoordinate::new(3, 6));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let gc = |r, c| CellCoordinate::new(r, c);
        let coords = &[gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 0), gc(1, 1), gc(1, 2), gc(2, 0),
                       gc(2, 1), gc(2, 2)];
        let indices: Vec<Option<usize>> = coords.iter()
            .map(|coord| g.grid_coordinate_to_index(*coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        for (index, coord) in coords.iter().enumerate() {
            assert_eq!(g.index_to_grid_coordinate(index), *coord);
        }

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 5);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(g.is_valid_coordinate(coord));
        }
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().collect::<Vec<CellCoordinate>>(),
                   &[CellCoordinate::new(0, 0),
                     CellCoordinate::new(0, 1),
                     CellCoordinate::new(1, 0),
                     CellCoordinate::new(1, 1)]);
        assert_eq!(g.iter().len(), 4);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 3);
        let gc = |r, c| CellCoordinate::new(r, c);
        assert_eq!(g.iter_row().collect::<Vec<Vec<CellCoordinate>>>(),
                   &[vec![gc(0, 0), gc(0, 1), gc(0, 2)], vec![gc(1, 0), gc(1, 1), gc(1, 2)]]);
    }

    #[test]
    fn column_iter() {
        let g = small_grid(2, 3);
        let gc = |r, c| CellCoordinate::new(r, c);
        assert_eq!(g.iter_column().collect::<Vec<Vec<CellCoordinate>>>(),
                   &[vec![gc(0, 0), gc(1, 0)], vec![gc(0, 1), gc(1, 1)], vec![gc(0, 2), gc(1, 2)]]);
    }

    #[test]
    fn carving_cells() {
        let mut g = small_grid(4, 4);
        let a = CellCoordinate::new(1, 0);
        let b = CellCoordinate::new(2, 0);
        let c = CellCoordinate::new(3, 0);

        let sorted_links = |grid: &MazeGrid, coord| -> Vec<CellCoordinate> {
            grid.accessible_neighbours(coord).iter().cloned().sorted().collect()
        };

        // Testing that the order of the arguments to `is_linked` does not matter
        macro_rules! bi_check_linked {
            ($x:expr, $y:expr) => (g.is_linked($x, $y) && g.is_linked($y, $x))
        }

        let directional_links_check = |grid: &MazeGrid,
                                       coord: CellCoordinate,
                                       expected_dirs_linked: &[CompassPrimary]| {
            let expected_complement: SmallVec<[CompassPrimary; 4]> = CompassPrimary::ALL.iter()
                .cloned()
                .filter(|dir: &CompassPrimary| !expected_dirs_linked.contains(dir))
                .collect();
            for exp_dir in expected_dirs_linked {
                assert!(grid.has_passage(coord, *exp_dir));
            }
            for not_exp_dir in expected_complement.iter() {
                assert!(!grid.has_passage(coord, *not_exp_dir));
            }
        };

        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(sorted_links(&g, a), vec![]);
        directional_links_check(&g, b, &[]);

        g.carve(a, b).expect("carve failed");
        assert!(bi_check_linked!(a, b));
        assert_eq!(sorted_links(&g, a), vec![b]);
        assert_eq!(sorted_links(&g, b), vec![a]);
        directional_links_check(&g, a, &[CompassPrimary::South]);
        directional_links_check(&g, b, &[CompassPrimary::North]);
        directional_links_check(&g, c, &[]);

        g.carve(b, c).expect("carve failed");
        assert!(bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert!(!bi_check_linked!(a, c));
        assert_eq!(sorted_links(&g, b), vec![a, c]);
        directional_links_check(&g, b, &[CompassPrimary::North, CompassPrimary::South]);
        assert_eq!(g.passages_count(), 2);

        assert!(g.rebuild_wall(a, b));
        assert!(!g.rebuild_wall(a, b));
        assert!(!bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        directional_links_check(&g, a, &[]);
        directional_links_check(&g, b, &[CompassPrimary::South]);
        assert_eq!(g.passages_count(), 1);
    }

    #[test]
    fn carving_keeps_both_sides_of_a_wall_in_step() {
        let mut g = small_grid(2, 2);
        let a = CellCoordinate::new(0, 0);
        let b = CellCoordinate::new(0, 1);
        g.carve(b, a).expect("carve failed");
        assert!(!g.cell(a).unwrap().has_wall(CompassPrimary::East));
        assert!(!g.cell(b).unwrap().has_wall(CompassPrimary::West));
        assert!(!g.has_wall_between(a, b));
        assert!(g.has_wall_between(a, CellCoordinate::new(1, 0)));
    }

    #[test]
    fn no_self_linked_cycles() {
        let mut g = small_grid(4, 4);
        let a = CellCoordinate::new(0, 0);
        assert_eq!(g.carve(a, a), Err(CellLinkError::SelfLink));
    }

    #[test]
    fn no_links_to_invalid_coordinates() {
        let mut g = small_grid(4, 4);
        let good_coord = CellCoordinate::new(0, 0);
        let invalid_coord = CellCoordinate::new(100, 100);
        assert_eq!(g.carve(good_coord, invalid_coord),
                   Err(CellLinkError::InvalidGridCoordinate));
        assert!(!g.rebuild_wall(good_coord, invalid_coord));
    }

    #[test]
    fn no_links_between_distant_cells() {
        let mut g = small_grid(4, 4);
        assert_eq!(g.carve(CellCoordinate::new(0, 0), CellCoordinate::new(1, 1)),
                   Err(CellLinkError::NotAdjacent));
        assert_eq!(g.passages_count(), 0);
    }

    #[test]
    fn no_parallel_duplicated_passages() {
        let mut g = small_grid(4, 4);
        let a = CellCoordinate::new(0, 0);
        let b = CellCoordinate::new(1, 0);
        g.carve(a, b).expect("carve failed");
        g.carve(a, b).expect("carve failed");
        assert_smallvec_eq!(g.accessible_neighbours(a), &[b]);
        assert_smallvec_eq!(g.accessible_neighbours(b), &[a]);
        assert_eq!(g.iter_links().collect::<Vec<_>>(), vec![(a, b)]);
    }

    #[test]
    fn path_flags() {
        let mut g = small_grid(2, 2);
        assert!(g.mark_in_path(CellCoordinate::new(1, 1)));
        assert!(g.mark_in_path(CellCoordinate::new(0, 0)));
        assert!(!g.mark_in_path(CellCoordinate::new(5, 5)));
        assert_eq!(g.path_cells(), vec![CellCoordinate::new(0, 0), CellCoordinate::new(1, 1)]);
        g.clear_path();
        assert!(g.path_cells().is_empty());
    }

    #[test]
    fn passage_graph_matches_links() {
        let mut g = small_grid(2, 3);
        let gc = |r, c| CellCoordinate::new(r, c);
        g.carve(gc(0, 0), gc(0, 1)).unwrap();
        g.carve(gc(0, 1), gc(1, 1)).unwrap();
        g.carve(gc(1, 2), gc(1, 1)).unwrap();

        let graph = g.passage_graph::<u32>();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph[graph::NodeIndex::new(4)], gc(1, 1));
        // (0,2) and (1,0) are still walled in on their own
        assert_eq!(connected_components(&graph), 3);
    }
}
