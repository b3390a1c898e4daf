use crate::error::{FrameError, FrameResult};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense 2-D matrix of `f64`, the numeric form of a feature table.
///
/// Stores data in a flat contiguous `Vec<f64>` with row-major (C-order) layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl Matrix {
    /// Create a matrix from raw row-major data.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> FrameResult<Self> {
        if data.len() != rows * cols {
            return Err(FrameError::ShapeMismatch {
                expected: (rows, cols),
                got: (data.len(), 1),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix from a nested slice of rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> FrameResult<Self> {
        if rows.is_empty() {
            return Ok(Matrix::zeros(0, 0));
        }
        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(FrameError::ShapeMismatch {
                    expected: (i + 1, cols),
                    got: (i + 1, row.len()),
                });
            }
        }
        let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Matrix::new(flat, rows.len(), cols)
    }

    /// Build a matrix column by column. All columns must share one length.
    pub fn from_columns(columns: &[Vec<f64>]) -> FrameResult<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        for (j, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(FrameError::ShapeMismatch {
                    expected: (rows, j + 1),
                    got: (col.len(), j + 1),
                });
            }
        }
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            data.extend(columns.iter().map(|c| c[i]));
        }
        Matrix::new(data, rows, cols)
    }
}

// ─── Access ─────────────────────────────────────────────────────────────────

impl Matrix {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> FrameResult<f64> {
        if row >= self.rows || col >= self.cols {
            return Err(FrameError::IndexOutOfBounds {
                row,
                col,
                shape: self.shape(),
            });
        }
        Ok(self.data[row * self.cols + col])
    }

    /// Borrow row `i` as a slice. Panics if out of range, like slice indexing.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, and a zero-width matrix has no row data anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Copy column `j` out.
    pub fn col(&self, j: usize) -> FrameResult<Vec<f64>> {
        if j >= self.cols {
            return Err(FrameError::IndexOutOfBounds {
                row: 0,
                col: j,
                shape: self.shape(),
            });
        }
        Ok((0..self.rows).map(|i| self.data[i * self.cols + j]).collect())
    }

    /// Apply `f(col_index, value)` to every element, returning a new matrix.
    pub fn map_indexed<F: Fn(usize, f64) -> f64>(&self, f: F) -> Matrix {
        let cols = self.cols;
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, &v)| f(k % cols, v))
            .collect();
        Matrix {
            data,
            rows: self.rows,
            cols,
        }
    }
}

// ─── Reductions ─────────────────────────────────────────────────────────────

impl Matrix {
    /// Per-column mean.
    pub fn mean_axis0(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for row in self.rows() {
            for (s, v) in sums.iter_mut().zip(row) {
                *s += v;
            }
        }
        let n = self.rows as f64;
        sums.into_iter().map(|s| s / n).collect()
    }

    /// Per-column population variance (divides by n, not n - 1).
    pub fn var_axis0(&self) -> Vec<f64> {
        let mean = self.mean_axis0();
        let mut acc = vec![0.0; self.cols];
        for row in self.rows() {
            for ((a, v), mu) in acc.iter_mut().zip(row).zip(&mean) {
                let d = v - mu;
                *a += d * d;
            }
        }
        let n = self.rows as f64;
        acc.into_iter().map(|a| a / n).collect()
    }

    /// Per-column population standard deviation.
    pub fn std_axis0(&self) -> Vec<f64> {
        self.var_axis0().into_iter().map(f64::sqrt).collect()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:.4}", v)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_rows() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2).unwrap(), 6.0);
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert!(m.get(2, 0).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, FrameError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_columns_matches_from_rows() {
        let by_col = Matrix::from_columns(&[vec![1.0, 4.0], vec![2.0, 5.0]]).unwrap();
        let by_row = Matrix::from_rows(&[vec![1.0, 2.0], vec![4.0, 5.0]]).unwrap();
        assert_eq!(by_col, by_row);
        assert_eq!(by_col.col(1).unwrap(), vec![2.0, 5.0]);
    }

    #[test]
    fn test_axis_statistics() {
        let m = Matrix::from_rows(&[vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]]).unwrap();
        let mean = m.mean_axis0();
        let std = m.std_axis0();
        assert_abs_diff_eq!(mean[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mean[1], 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(std[0], (8.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(std[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_map_indexed_sees_column() {
        let m = Matrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let shifted = m.map_indexed(|j, v| v + j as f64);
        assert_eq!(shifted.data(), &[1.0, 2.0, 1.0, 2.0]);
    }
}
