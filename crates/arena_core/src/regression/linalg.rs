//! Dense linear-algebra kernels for the normal equations.
//!
//! Sizes here are tiny (feature count + 1 columns), so plain nested `Vec`s
//! keep the code readable without a matrix crate.

use crate::error::{ArenaError, Result};

/// Pivot magnitudes below this are treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Row-major dense matrix.
pub type Matrix = Vec<Vec<f64>>;

/// `XᵀX` accumulated row by row as outer products.
///
/// Every row must have the same length; the caller checks that.
pub fn gram_matrix<R: AsRef<[f64]>>(rows: &[R]) -> Matrix {
    let cols = rows.first().map_or(0, |r| r.as_ref().len());
    let mut result = vec![vec![0.0; cols]; cols];
    for row in rows {
        let row = row.as_ref();
        for (j, &value) in row.iter().enumerate() {
            for (k, &other) in row.iter().enumerate() {
                result[j][k] += value * other;
            }
        }
    }
    result
}

/// `Xᵀy` for a row-major design matrix.
pub fn transpose_mul_vec<R: AsRef<[f64]>>(rows: &[R], targets: &[f64]) -> Vec<f64> {
    let cols = rows.first().map_or(0, |r| r.as_ref().len());
    let mut result = vec![0.0; cols];
    for (row, &y) in rows.iter().zip(targets) {
        for (acc, &x) in result.iter_mut().zip(row.as_ref()) {
            *acc += x * y;
        }
    }
    result
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Solve `A x = b` by Gauss-Jordan elimination with partial pivoting.
///
/// At each column the row with the largest-magnitude entry among the
/// remaining rows becomes the pivot; it is swapped into place, normalised and
/// eliminated from every other row.
pub fn solve_linear_system(matrix: &[Vec<f64>], rhs: &[f64]) -> Result<Vec<f64>> {
    let size = matrix.len();
    if rhs.len() != size {
        return Err(ArenaError::FeatureLengthMismatch {
            expected: size,
            found: rhs.len(),
        });
    }

    // Augmented [A | b]
    let mut augmented: Matrix = Vec::with_capacity(size);
    for (row, &b) in matrix.iter().zip(rhs) {
        if row.len() != size {
            return Err(ArenaError::FeatureLengthMismatch {
                expected: size,
                found: row.len(),
            });
        }
        let mut extended = Vec::with_capacity(size + 1);
        extended.extend_from_slice(row);
        extended.push(b);
        augmented.push(extended);
    }

    for i in 0..size {
        let mut pivot_row = i;
        for r in (i + 1)..size {
            if augmented[r][i].abs() > augmented[pivot_row][i].abs() {
                pivot_row = r;
            }
        }
        let magnitude = augmented[pivot_row][i].abs();
        if magnitude < PIVOT_TOLERANCE || magnitude.is_nan() {
            return Err(ArenaError::SingularMatrix {
                column: i,
                magnitude,
            });
        }
        augmented.swap(i, pivot_row);

        let pivot = augmented[i][i];
        for value in augmented[i][i..].iter_mut() {
            *value /= pivot;
        }

        let pivot_tail = augmented[i][i..].to_vec();
        for (r, row) in augmented.iter_mut().enumerate() {
            if r == i {
                continue;
            }
            let factor = row[i];
            if factor.abs() < PIVOT_TOLERANCE {
                continue;
            }
            for (value, &p) in row[i..].iter_mut().zip(&pivot_tail) {
                *value -= factor * p;
            }
        }
    }

    Ok(augmented.into_iter().map(|row| row[size]).collect())
}
