use std::fmt;

use crate::cells::CellCoordinate;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Row-major iteration over every coordinate of a rectangular grid.
#[derive(Clone)]
pub struct RectGridCellIter {
    columns: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl RectGridCellIter {
    pub(crate) fn new(rows: RowsCount, columns: ColumnsCount) -> RectGridCellIter {
        RectGridCellIter {
            columns: columns.0,
            current_cell_number: 0,
            cells_count: rows.0 * columns.0,
        }
    }
}

impl fmt::Debug for RectGridCellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for RectGridCellIter {} // default impl using size_hint()
impl Iterator for RectGridCellIter {
    type Item = CellCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let n = self.current_cell_number;
            let coord = CellCoordinate::from_row_column_indices(RowIndex(n / self.columns),
                                                                ColumnIndex(n % self.columns));
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Iterates whole rows (top to bottom) or whole columns (left to right).
#[derive(Debug, Copy, Clone)]
pub struct RectBatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RectBatchIter {
    pub(crate) fn rows(rows: RowsCount, columns: ColumnsCount) -> RectBatchIter {
        RectBatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            rows,
            columns,
        }
    }

    pub(crate) fn columns(rows: RowsCount, columns: ColumnsCount) -> RectBatchIter {
        RectBatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            rows,
            columns,
        }
    }

    fn batches_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.rows.0,
            BatchIterType::Column => self.columns.0,
        }
    }
}

impl ExactSizeIterator for RectBatchIter {} // default impl using size_hint()
impl Iterator for RectBatchIter {
    type Item = Vec<CellCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }

        let index = self.current_index;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..self.columns.0)
                    .map(|i| CellCoordinate::from_row_column_indices(RowIndex(index), ColumnIndex(i)))
                    .collect()
            }
            BatchIterType::Column => {
                (0..self.rows.0)
                    .map(|i| CellCoordinate::from_row_column_indices(RowIndex(i), ColumnIndex(index)))
                    .collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batches_count() - self.current_index;
        (remaining, Some(remaining))
    }
}
