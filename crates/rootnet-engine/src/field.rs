//! Discretized resource field.
//!
//! A [`ResourceField`] is a rectangular matrix of [`Cell`]s covering the area
//! `[0, width) × [0, height)` of network space. Each cell is a square of side
//! `unit_length`; cell `(row, col)` has its center at
//! `(col · unit + unit / 2, row · unit + unit / 2)`, so `x` grows with the column
//! index and `y` grows with the row index.
//!
//! Fields are value-like: [`Clone`] produces a fully independent copy, and every
//! candidate evaluation works on its own clone.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use rootnet_engine::{FieldGeometry, ResourceField};
//!
//! let geometry = FieldGeometry::new(20.0, 20.0, 1.0);
//! let field = ResourceField::new(geometry);
//! assert!(field.is_valid());
//!
//! let cells = rootnet_engine::field::candidate_cells(DVec2::new(10.0, 10.0), 2.0, &geometry);
//! assert_eq!(cells.len(), 12);
//! ```

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::network::NodeId;

/// A single resource cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Whether a resource unit is present in this cell.
    pub has_resource: bool,
    /// Whether the resource (if any) is still unclaimed.
    pub available: bool,
    /// The node that claimed this cell's resource, if any.
    pub acquired_by: Option<NodeId>,
}

impl Default for Cell {
    fn default() -> Self {
        Self::RESOURCE
    }
}

impl Cell {
    /// A resource-bearing, available, unclaimed cell.
    pub const RESOURCE: Self = Self {
        has_resource: true,
        available: true,
        acquired_by: None,
    };

    /// A cell without resource.
    pub const BARREN: Self = Self {
        has_resource: false,
        available: true,
        acquired_by: None,
    };

    /// Returns `true` if the cell holds a resource that can still be claimed.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.has_resource && self.available
    }

    /// Returns `true` if the cell's fields are mutually consistent.
    ///
    /// A claimed cell must be resource-bearing and unavailable.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.acquired_by.is_none() || (self.has_resource && !self.available)
    }

    /// Claims the cell for `node`.
    pub fn claim(&mut self, node: NodeId) {
        self.available = false;
        self.acquired_by = Some(node);
    }
}

/// Physical extent of a field and its cell size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub width: f64,
    pub height: f64,
    pub unit_length: f64,
}

impl FieldGeometry {
    #[must_use]
    pub const fn new(width: f64, height: f64, unit_length: f64) -> Self {
        Self {
            width,
            height,
            unit_length,
        }
    }

    /// Number of cell rows (`floor(height / unit_length)`).
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn rows(&self) -> usize {
        (self.height / self.unit_length).floor().max(0.0) as usize
    }

    /// Number of cell columns (`floor(width / unit_length)`).
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn cols(&self) -> usize {
        (self.width / self.unit_length).floor().max(0.0) as usize
    }

    /// Center of the cell at `index` in network coordinates.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn cell_center(&self, index: CellIndex) -> DVec2 {
        let half = self.unit_length / 2.0;
        DVec2::new(
            index.col as f64 * self.unit_length + half,
            index.row as f64 * self.unit_length + half,
        )
    }
}

/// Position of a cell in the field matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Structural defect detected by [`ResourceField::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FieldDefect {
    #[display("field has no cells")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("cell ({row}, {col}) is claimed but not marked as a consumed resource")]
    MalformedCell { row: usize, col: usize },
}

/// Summary counts of a field, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub rows: usize,
    pub cols: usize,
    pub total_cells: usize,
    pub resource_cells: usize,
    /// Number of cells no longer available.
    pub acquired_cells: usize,
}

/// Rectangular grid of resource cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceField {
    geometry: FieldGeometry,
    rows: Vec<Vec<Cell>>,
}

impl ResourceField {
    /// Creates a field where every cell bears an available resource.
    ///
    /// Fractional unit counts are truncated.
    #[must_use]
    pub fn new(geometry: FieldGeometry) -> Self {
        let rows = vec![vec![Cell::RESOURCE; geometry.cols()]; geometry.rows()];
        Self { geometry, rows }
    }

    /// Creates the default field and passes it through `init`.
    ///
    /// The initializer may return any field; callers are expected to
    /// [`validate`](Self::validate) the result.
    #[must_use]
    pub fn with_init<F>(geometry: FieldGeometry, init: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        init(Self::new(geometry))
    }

    /// Creates a field from explicit rows.
    ///
    /// No shape check is performed here; see [`validate`](Self::validate).
    #[must_use]
    pub fn from_rows(geometry: FieldGeometry, rows: Vec<Vec<Cell>>) -> Self {
        Self { geometry, rows }
    }

    #[must_use]
    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        self.rows.get(index.row)?.get(index.col)
    }

    pub fn cell_mut(&mut self, index: CellIndex) -> Option<&mut Cell> {
        self.rows.get_mut(index.row)?.get_mut(index.col)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellIndex, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (CellIndex::new(row, col), cell))
        })
    }

    /// Iterates mutably over all cells in row-major order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (CellIndex, &mut Cell)> {
        self.rows.iter_mut().enumerate().flat_map(|(row, cells)| {
            cells
                .iter_mut()
                .enumerate()
                .map(move |(col, cell)| (CellIndex::new(row, col), cell))
        })
    }

    /// Checks that the field is non-empty, rectangular, and that every cell is
    /// well-formed.
    pub fn validate(&self) -> Result<(), FieldDefect> {
        let expected = self.cols();
        if self.rows.is_empty() || expected == 0 {
            return Err(FieldDefect::Empty);
        }
        for (row, cells) in self.rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(FieldDefect::Ragged {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            if let Some(col) = cells.iter().position(|c| !c.is_well_formed()) {
                return Err(FieldDefect::MalformedCell { row, col });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    #[must_use]
    pub fn metadata(&self) -> FieldMetadata {
        let mut resource_cells = 0;
        let mut acquired_cells = 0;
        let mut total_cells = 0;
        for (_, cell) in self.cells() {
            total_cells += 1;
            if cell.has_resource {
                resource_cells += 1;
            }
            if !cell.available {
                acquired_cells += 1;
            }
        }
        FieldMetadata {
            rows: self.rows(),
            cols: self.cols(),
            total_cells,
            resource_cells,
            acquired_cells,
        }
    }

    /// Cells within `radius` of `point`, using this field's geometry.
    #[must_use]
    pub fn candidate_cells(&self, point: DVec2, radius: f64) -> Vec<CellIndex> {
        candidate_cells(point, radius, &self.geometry)
    }
}

/// Returns the indices of all cells whose center lies within `radius` of `point`.
///
/// The search is bounded to the index box
/// `floor((p - r) / unit) ..= floor((p + r) / unit)` on each axis, clamped to the
/// field, and then filtered by exact Euclidean distance. Results are row-major.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn candidate_cells(point: DVec2, radius: f64, geometry: &FieldGeometry) -> Vec<CellIndex> {
    let unit = geometry.unit_length;
    let rows = geometry.rows() as i64;
    let cols = geometry.cols() as i64;

    let min_col = ((point.x - radius) / unit).floor().max(0.0) as i64;
    let max_col = (((point.x + radius) / unit).floor() as i64).min(cols - 1);
    let min_row = ((point.y - radius) / unit).floor().max(0.0) as i64;
    let max_row = (((point.y + radius) / unit).floor() as i64).min(rows - 1);

    let mut cells = vec![];
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            #[expect(clippy::cast_sign_loss)]
            let index = CellIndex::new(row as usize, col as usize);
            if geometry.cell_center(index).distance(point) <= radius {
                cells.push(index);
            }
        }
    }
    cells
}
