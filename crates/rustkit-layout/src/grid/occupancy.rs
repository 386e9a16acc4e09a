//! Cell occupancy for grid placement.

use thiserror::Error;

use super::track_counts::{LineSpan, OriginZeroLine, TrackCounts};

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum CellOccupancyState {
    #[default]
    Unoccupied,
    DefinitelyPlaced,
    AutoPlaced,
}

/// A write that would overlap an occupied cell.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Area rows {rows} columns {columns} overlaps an occupied cell")]
pub(crate) struct OccupancyConflict {
    pub rows: LineSpan,
    pub columns: LineSpan,
}

/// Row-major occupancy over the implicit grid.
///
/// Grows in any direction when an area falls outside it. Cells outside the
/// matrix count as unoccupied.
#[derive(Debug, Clone)]
pub(crate) struct CellOccupancyMatrix {
    rows: TrackCounts,
    columns: TrackCounts,
    cells: Vec<CellOccupancyState>,
}

impl CellOccupancyMatrix {
    pub fn new(rows: TrackCounts, columns: TrackCounts) -> Self {
        Self {
            rows,
            columns,
            cells: vec![CellOccupancyState::Unoccupied; rows.len() * columns.len()],
        }
    }

    pub fn rows(&self) -> TrackCounts {
        self.rows
    }

    pub fn columns(&self) -> TrackCounts {
        self.columns
    }

    /// Grow the implicit grid along columns without touching any cell.
    pub fn include_columns(&mut self, columns: LineSpan) {
        let mut grown = self.columns;
        grown.include(columns);
        self.resize(self.rows, grown);
    }

    /// Grow the implicit grid along rows without touching any cell.
    pub fn include_rows(&mut self, rows: LineSpan) {
        let mut grown = self.rows;
        grown.include(rows);
        self.resize(grown, self.columns);
    }

    fn resize(&mut self, rows: TrackCounts, columns: TrackCounts) {
        if rows == self.rows && columns == self.columns {
            return;
        }
        let mut cells = vec![CellOccupancyState::Unoccupied; rows.len() * columns.len()];
        for row in 0..self.rows.len() {
            let line = self.rows.line_at(row);
            let Some(new_row) = rows.track_index(line) else {
                continue;
            };
            for column in 0..self.columns.len() {
                let line = self.columns.line_at(column);
                if let Some(new_column) = columns.track_index(line) {
                    cells[new_row * columns.len() + new_column] = self.cells[row * self.columns.len() + column];
                }
            }
        }
        self.rows = rows;
        self.columns = columns;
        self.cells = cells;
    }

    pub fn get(&self, row: OriginZeroLine, column: OriginZeroLine) -> CellOccupancyState {
        match (self.rows.track_index(row), self.columns.track_index(column)) {
            (Some(row), Some(column)) => self.cells[row * self.columns.len() + column],
            _ => CellOccupancyState::Unoccupied,
        }
    }

    pub fn area_is_unoccupied(&self, rows: LineSpan, columns: LineSpan) -> bool {
        rows.lines().all(|row| {
            columns
                .lines()
                .all(|column| self.get(OriginZeroLine(row), OriginZeroLine(column)) == CellOccupancyState::Unoccupied)
        })
    }

    /// Mark an area, growing the matrix to fit it. Refused when any cell of
    /// the area is already occupied; the matrix is still grown.
    pub fn try_mark_area(
        &mut self,
        rows: LineSpan,
        columns: LineSpan,
        state: CellOccupancyState,
    ) -> Result<(), OccupancyConflict> {
        let mut grown_rows = self.rows;
        grown_rows.include(rows);
        let mut grown_columns = self.columns;
        grown_columns.include(columns);
        self.resize(grown_rows, grown_columns);

        if !self.area_is_unoccupied(rows, columns) {
            return Err(OccupancyConflict { rows, columns });
        }

        let width = self.columns.len();
        for row in rows.lines() {
            for column in columns.lines() {
                if let (Some(row), Some(column)) = (
                    self.rows.track_index(OriginZeroLine(row)),
                    self.columns.track_index(OriginZeroLine(column)),
                ) {
                    self.cells[row * width + column] = state;
                }
            }
        }
        Ok(())
    }

    /// Whether any cell in the track at `line` along columns is occupied.
    pub fn column_is_occupied(&self, line: OriginZeroLine) -> bool {
        (0..self.rows.len()).any(|row| self.get(self.rows.line_at(row), line) != CellOccupancyState::Unoccupied)
    }

    /// Whether any cell in the track at `line` along rows is occupied.
    pub fn row_is_occupied(&self, line: OriginZeroLine) -> bool {
        (0..self.columns.len()).any(|column| self.get(line, self.columns.line_at(column)) != CellOccupancyState::Unoccupied)
    }
}
