extern crate nalgebra as na;
use self::na::{DMatrix, DVector};
use crate::errors::FilterError;

/// Returns whether the provided matrix is square and strictly equal to its transpose.
///
/// The comparison is exact: a matrix built through floating point arithmetic which is only symmetric
/// up to rounding is reported as asymmetric. Build covariances with `DMatrix::from_diagonal` or by
/// explicitly mirroring the triangle to pass this check.
pub fn is_symmetric(m: &DMatrix<f64>) -> bool {
    if !m.is_square() {
        return false;
    }
    for i in 1..m.nrows() {
        for j in 0..i {
            if m[(i, j)] != m[(j, i)] {
                return false;
            }
        }
    }
    true
}

/// Returns whether the provided square matrix has only zeros off its diagonal
pub fn is_diagonal(m: &DMatrix<f64>) -> bool {
    if !m.is_square() {
        return false;
    }
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            if i != j && m[(i, j)] != 0.0 {
                return false;
            }
        }
    }
    true
}

/// Ensures that the matrix is `rows` x `cols`.
pub(crate) fn check_shape(
    matrix: &'static str,
    m: &DMatrix<f64>,
    rows: usize,
    cols: usize,
) -> Result<(), FilterError> {
    if m.shape() != (rows, cols) {
        return Err(FilterError::ShapeMismatch {
            matrix,
            expected_rows: rows,
            expected_cols: cols,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}

/// Ensures that the matrix is `dim` x `dim` and symmetric.
pub(crate) fn check_covariance(
    matrix: &'static str,
    m: &DMatrix<f64>,
    dim: usize,
) -> Result<(), FilterError> {
    check_shape(matrix, m, dim, dim)?;
    if !is_symmetric(m) {
        return Err(FilterError::AsymmetricMatrix { matrix });
    }
    Ok(())
}

/// Ensures that the vector has `len` elements.
pub(crate) fn check_len(
    vector: &'static str,
    v: &DVector<f64>,
    len: usize,
) -> Result<(), FilterError> {
    if v.len() != len {
        return Err(FilterError::LengthMismatch {
            vector,
            expected: len,
            got: v.len(),
        });
    }
    Ok(())
}
