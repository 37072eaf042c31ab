//! Distance and visibility matrices.

use crate::error::{AcoError, Result};

/// Absolute tolerance used by the symmetry check.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A validated, dense n×n distance matrix stored in row-major order.
///
/// Every entry is non-negative (infinity marks an unreachable pair), the
/// diagonal is zero and the matrix is symmetric. The matrix is never
/// mutated after construction.
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 3.0, 4.0],
///     vec![3.0, 0.0, 5.0],
///     vec![4.0, 5.0, 0.0],
/// ])
/// .expect("valid matrix");
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(1, 2), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMatrix"))]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from nested rows.
    ///
    /// Fails with [`AcoError::Validation`] if the rows are not square or the
    /// values break any matrix invariant.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(AcoError::validation(format!(
                    "distance matrix is not square: row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Self::from_data(size, data)
    }

    /// Builds a matrix from a flat row-major buffer of `size * size` values.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if size == 0 {
            return Err(AcoError::validation("distance matrix must have at least one city"));
        }
        if data.len() != size * size {
            return Err(AcoError::validation(format!(
                "distance matrix has {} entries, expected {}",
                data.len(),
                size * size
            )));
        }
        let dm = Self { data, size };
        dm.check()?;
        Ok(dm)
    }

    /// Computes a Euclidean distance matrix from 2-D coordinates.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                let d = (dx * dx + dy * dy).sqrt();
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self::from_data(n, data)
    }

    fn check(&self) -> Result<()> {
        for i in 0..self.size {
            for j in 0..self.size {
                let d = self.get(i, j);
                if d.is_nan() || d < 0.0 {
                    return Err(AcoError::validation(format!(
                        "distance ({i}, {j}) must be non-negative, got {d}"
                    )));
                }
            }
            if self.get(i, i) != 0.0 {
                return Err(AcoError::validation(format!(
                    "diagonal entry ({i}, {i}) must be zero, got {}",
                    self.get(i, i)
                )));
            }
        }
        if !self.is_symmetric(SYMMETRY_TOLERANCE) {
            return Err(AcoError::validation("distance matrix is not symmetric"));
        }
        Ok(())
    }

    /// Returns the distance between cities `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Bounds-checked variant of [`get`](Self::get).
    pub fn try_get(&self, from: usize, to: usize) -> Option<f64> {
        if from < self.size && to < self.size {
            Some(self.get(from, to))
        } else {
            None
        }
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                let diff = (a - b).abs();
                if a != b && (diff.is_nan() || diff > tol) {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest of `candidates` to `from`, ties broken by the
    /// earlier candidate.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by(|&a, &b| {
            self.get(from, a)
                .partial_cmp(&self.get(from, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Serialized form of a square matrix, checked before use.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
pub(crate) struct RawMatrix {
    pub(crate) data: Vec<f64>,
    pub(crate) size: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMatrix> for DistanceMatrix {
    type Error = AcoError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Self::from_data(raw.size, raw.data)
    }
}

/// Static desirability `1 / d` derived once from a [`DistanceMatrix`].
///
/// Zero distances (the diagonal, co-located cities) and unreachable pairs
/// map to `0`, so the matrix never holds an infinite value.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityMatrix {
    data: Vec<f64>,
    size: usize,
}

impl VisibilityMatrix {
    pub fn from_distances(distances: &DistanceMatrix) -> Self {
        let data = distances
            .data
            .iter()
            .map(|&d| {
                let v = 1.0 / d;
                if d > 0.0 && v.is_finite() {
                    v
                } else {
                    0.0
                }
            })
            .collect();
        Self {
            data,
            size: distances.size,
        }
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Row of visibilities out of `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
