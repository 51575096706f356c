//! Neighborhood indices for per-tick proximity queries.
//!
//! An index narrows the set of points the flocking pass has to measure.
//! Implementations return a *superset* of the points within the query
//! radius, always in ascending index order; the caller applies the exact
//! distance test. Because the order matches a plain `0..n` scan, every
//! index produces bit-identical steering sums.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::config::NeighborIndexKind;

/// Common behaviour exposed by neighborhood indices.
pub trait NeighborIndex: Send + core::fmt::Debug {
    /// Rebuild internal structures from the current positions.
    fn rebuild(&mut self, positions: &[Vec3]);

    /// Replace `out` with the indices of every point that may lie within
    /// `radius` of `point`, in ascending order.
    fn candidates(&self, point: Vec3, radius: f32, out: &mut Vec<usize>);
}

/// Build an empty index of the requested kind.
///
/// `cell_size` is only used by the grid and should match the largest
/// radius the index will be queried with.
pub fn build_index(kind: NeighborIndexKind, cell_size: f32) -> Box<dyn NeighborIndex> {
    match kind {
        NeighborIndexKind::BruteForce => Box::new(BruteForceIndex::default()),
        NeighborIndexKind::UniformGrid => Box::new(UniformGridIndex::new(cell_size)),
    }
}

/// Returns every point for every query.
#[derive(Debug, Clone, Default)]
pub struct BruteForceIndex {
    len: usize,
}

impl NeighborIndex for BruteForceIndex {
    fn rebuild(&mut self, positions: &[Vec3]) {
        self.len = positions.len();
    }

    fn candidates(&self, _point: Vec3, _radius: f32, out: &mut Vec<usize>) {
        out.clear();
        out.extend(0..self.len);
    }
}

/// Integer coordinates of a grid cell.
type CellKey = (i32, i32, i32);

/// Uniform 3D bucket grid.
///
/// Each point lives in exactly one cell of edge `cell_size`; a query visits
/// the block of cells overlapping the query sphere's bounding box.
#[derive(Debug, Clone)]
pub struct UniformGridIndex {
    cell_size: f32,
    cells: BTreeMap<CellKey, Vec<usize>>,
}

impl UniformGridIndex {
    /// Create an empty grid. Non-positive or non-finite sizes fall back to 1.
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            cells: BTreeMap::new(),
        }
    }

    /// Edge length of one cell.
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn coord(&self, value: f32) -> i32 {
        // `as` saturates, so far-away or non-finite points land in edge cells
        // instead of wrapping.
        (value / self.cell_size).floor() as i32
    }

    fn key(&self, point: Vec3) -> CellKey {
        (self.coord(point.x), self.coord(point.y), self.coord(point.z))
    }
}

impl NeighborIndex for UniformGridIndex {
    fn rebuild(&mut self, positions: &[Vec3]) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (idx, &pos) in positions.iter().enumerate() {
            let key = self.key(pos);
            self.cells.entry(key).or_default().push(idx);
        }
        self.cells.retain(|_, bucket| !bucket.is_empty());
    }

    fn candidates(&self, point: Vec3, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let reach = Vec3::splat(radius.max(0.0));
        let lo = self.key(point - reach);
        let hi = self.key(point + reach);
        for x in lo.0..=hi.0 {
            for y in lo.1..=hi.1 {
                // Range scan over the z column keeps empty space cheap.
                let start = (x, y, lo.2);
                let end = (x, y, hi.2);
                for bucket in self.cells.range(start..=end).map(|(_, bucket)| bucket) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
    }
}
