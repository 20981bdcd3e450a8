//! Uniform hash grid over a point set.
//!
//! Used for the classifier's coarse radius prune and for nearest-point
//! lookups between margins and mesh vertices.

use dental_types::Point3;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{SpatialError, SpatialResult};

/// Integer cell coordinate.
type Cell = [i64; 3];

/// Points bucketed into cubic cells of a fixed size.
///
/// The grid borrows the slice it was built from; indices returned by
/// queries refer to that slice.
///
/// # Example
///
/// ```
/// use dental_spatial::PointGrid;
/// use dental_types::Point3;
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
///     Point3::new(20.0, 0.0, 0.0),
/// ];
/// let grid = PointGrid::build(&points, 5.0).unwrap();
///
/// assert_eq!(grid.within_radius(&Point3::origin(), 10.0), vec![0, 1]);
/// assert_eq!(grid.nearest(&Point3::new(18.0, 1.0, 0.0)).map(|(i, _)| i), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct PointGrid<'a> {
    points: &'a [Point3<f64>],
    cells: HashMap<Cell, SmallVec<[u32; 8]>>,
    cell_size: f64,
    inv_cell_size: f64,
}

impl<'a> PointGrid<'a> {
    /// Bucket `points` into cells of edge `cell_size`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidCellSize`] unless `cell_size` is finite
    /// and positive.
    #[allow(clippy::cast_possible_truncation)] // point counts fit u32 (mesh indices are u32)
    pub fn build(points: &'a [Point3<f64>], cell_size: f64) -> SpatialResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize { size: cell_size });
        }

        let mut grid = Self {
            points,
            cells: HashMap::new(),
            cell_size,
            inv_cell_size: 1.0 / cell_size,
        };
        for (i, p) in points.iter().enumerate() {
            let cell = grid.cell_of(p);
            grid.cells.entry(cell).or_default().push(i as u32);
        }
        Ok(grid)
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed points, in build order.
    #[must_use]
    pub const fn points(&self) -> &'a [Point3<f64>] {
        self.points
    }

    /// Cell edge length.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Indices of points strictly closer than `radius` to `center`, ascending.
    #[must_use]
    pub fn within_radius(&self, center: &Point3<f64>, radius: f64) -> Vec<usize> {
        if radius.is_nan() || radius <= 0.0 || self.points.is_empty() {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        let lo = self.cell_of(&Point3::new(center.x - radius, center.y - radius, center.z - radius));
        let hi = self.cell_of(&Point3::new(center.x + radius, center.y + radius, center.z + radius));

        let mut found = Vec::new();
        let mut collect = |bucket: &SmallVec<[u32; 8]>| {
            for &i in bucket {
                if (self.points[i as usize] - center).norm_squared() < radius_sq {
                    found.push(i as usize);
                }
            }
        };

        if box_cell_count(lo, hi) > self.cells.len() as u128 {
            for (cell, bucket) in &self.cells {
                if (0..3).all(|a| cell[a] >= lo[a] && cell[a] <= hi[a]) {
                    collect(bucket);
                }
            }
        } else {
            for x in lo[0]..=hi[0] {
                for y in lo[1]..=hi[1] {
                    for z in lo[2]..=hi[2] {
                        if let Some(bucket) = self.cells.get(&[x, y, z]) {
                            collect(bucket);
                        }
                    }
                }
            }
        }

        found.sort_unstable();
        found
    }

    /// Closest indexed point to `query` as `(index, distance)`.
    ///
    /// Ties go to the lowest index. `None` if the grid is empty.
    #[must_use]
    pub fn nearest(&self, query: &Point3<f64>) -> Option<(usize, f64)> {
        if self.points.is_empty() {
            return None;
        }

        let origin = self.cell_of(query);
        let mut best: Option<(usize, f64)> = None;
        let mut ring: i64 = 0;

        loop {
            // A shell bigger than the occupied set costs more than a scan.
            if shell_cell_count(ring) > self.cells.len() as u128 {
                return self.nearest_linear(query);
            }

            for_each_shell_cell(origin, ring, |cell| {
                if let Some(bucket) = self.cells.get(&cell) {
                    for &i in bucket {
                        let d = (self.points[i as usize] - query).norm();
                        let i = i as usize;
                        if best.is_none_or(|(bi, bd)| d < bd || (d == bd && i < bi)) {
                            best = Some((i, d));
                        }
                    }
                }
            });

            // Unvisited points lie at least `ring` whole cells away.
            #[allow(clippy::cast_precision_loss)]
            let reach = ring as f64 * self.cell_size;
            if let Some((_, d)) = best {
                if d < reach {
                    return best;
                }
            }
            ring += 1;
        }
    }

    fn nearest_linear(&self, query: &Point3<f64>) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = (p - query).norm();
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, p: &Point3<f64>) -> Cell {
        [
            (p.x * self.inv_cell_size).floor() as i64,
            (p.y * self.inv_cell_size).floor() as i64,
            (p.z * self.inv_cell_size).floor() as i64,
        ]
    }
}

#[allow(clippy::cast_sign_loss)]
fn box_cell_count(lo: Cell, hi: Cell) -> u128 {
    (0..3)
        .map(|a| (hi[a] - lo[a] + 1).max(0) as u128)
        .product()
}

/// Cells on the surface of the cube of half-width `ring`.
#[allow(clippy::cast_sign_loss)]
fn shell_cell_count(ring: i64) -> u128 {
    if ring == 0 {
        return 1;
    }
    let outer = (2 * ring + 1) as u128;
    let inner = (2 * ring - 1) as u128;
    outer.pow(3) - inner.pow(3)
}

fn for_each_shell_cell(origin: Cell, ring: i64, mut f: impl FnMut(Cell)) {
    for dx in -ring..=ring {
        for dy in -ring..=ring {
            let on_face = dx.abs() == ring || dy.abs() == ring;
            if on_face {
                for dz in -ring..=ring {
                    f([origin[0] + dx, origin[1] + dy, origin[2] + dz]);
                }
            } else {
                f([origin[0] + dx, origin[1] + dy, origin[2] - ring]);
                if ring != 0 {
                    f([origin[0] + dx, origin[1] + dy, origin[2] + ring]);
                }
            }
        }
    }
}
