use faer::{Mat, MatRef};

use crate::error::LinalgError;

/// Check that a matrix is square and return its dimension.
pub fn check_square(a: MatRef<'_, f64>) -> Result<usize, LinalgError> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::NotSquare(a.nrows(), a.ncols()));
    }
    Ok(a.nrows())
}

/// Sum of the diagonal entries of a square matrix.
pub fn trace(a: MatRef<'_, f64>) -> Result<f64, LinalgError> {
    let n = check_square(a)?;
    Ok((0..n).map(|i| a.read(i, i)).sum())
}

/// Return `a + value * I`.
///
/// # Example
///
/// ```
/// use fidkit_linalg::ops::add_diagonal;
///
/// let a = faer::Mat::<f64>::zeros(2, 2);
/// let b = add_diagonal(a.as_ref(), 1e-6).unwrap();
/// assert_eq!(b.read(0, 0), 1e-6);
/// assert_eq!(b.read(0, 1), 0.0);
/// ```
pub fn add_diagonal(a: MatRef<'_, f64>, value: f64) -> Result<Mat<f64>, LinalgError> {
    let n = check_square(a)?;
    Ok(Mat::from_fn(n, n, |i, j| {
        if i == j {
            a.read(i, j) + value
        } else {
            a.read(i, j)
        }
    }))
}

/// Return the symmetric part `(a + a^T) / 2` of a square matrix.
pub fn symmetrize(a: MatRef<'_, f64>) -> Result<Mat<f64>, LinalgError> {
    let n = check_square(a)?;
    Ok(Mat::from_fn(n, n, |i, j| 0.5 * (a.read(i, j) + a.read(j, i))))
}

/// Squared euclidean distance between two vectors, summed in index order.
pub fn squared_distance(a: &[f64], b: &[f64]) -> Result<f64, LinalgError> {
    if a.len() != b.len() {
        return Err(LinalgError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum())
}

/// Check that every entry of a matrix is finite.
pub fn ensure_finite(a: MatRef<'_, f64>, what: &'static str) -> Result<(), LinalgError> {
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            if !a.read(i, j).is_finite() {
                return Err(LinalgError::NonFinite(what));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn trace_and_diagonal() -> Result<(), LinalgError> {
        let a = faer::mat![[1.0, 2.0], [3.0, 4.0]];
        assert_relative_eq!(trace(a.as_ref())?, 5.0);

        let b = add_diagonal(a.as_ref(), 0.5)?;
        assert_relative_eq!(b.read(0, 0), 1.5);
        assert_relative_eq!(b.read(1, 1), 4.5);
        assert_relative_eq!(b.read(1, 0), 3.0);
        Ok(())
    }

    #[test]
    fn symmetrize_mat() -> Result<(), LinalgError> {
        let a = faer::mat![[1.0, 2.0], [4.0, 1.0]];
        let s = symmetrize(a.as_ref())?;
        assert_relative_eq!(s.read(0, 1), 3.0);
        assert_relative_eq!(s.read(1, 0), 3.0);
        Ok(())
    }

    #[test]
    fn not_square() {
        let a = Mat::<f64>::zeros(2, 3);
        assert_eq!(trace(a.as_ref()), Err(LinalgError::NotSquare(2, 3)));
    }

    #[test]
    fn squared_distance_mismatch() -> Result<(), LinalgError> {
        assert_relative_eq!(squared_distance(&[0.0, 1.0], &[1.0, 3.0])?, 5.0);
        assert_eq!(
            squared_distance(&[0.0], &[1.0, 3.0]),
            Err(LinalgError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        );
        Ok(())
    }

    #[test]
    fn non_finite() {
        let a = faer::mat![[1.0, f64::NAN], [0.0, 1.0]];
        assert_eq!(
            ensure_finite(a.as_ref(), "sigma"),
            Err(LinalgError::NonFinite("sigma"))
        );
    }
}
