use faer::{Mat, Parallelism};
use fidkit_tensor::Tensor2;

use crate::error::LinalgError;

/// Column means of an observation matrix with one observation per row.
///
/// Rows are accumulated in order into `f64`, so the result does not depend on the
/// parallelism used elsewhere in the pipeline.
///
/// # Example
///
/// ```
/// use fidkit_linalg::stats::mean_rows;
/// use fidkit_tensor::Tensor2;
///
/// let x = Tensor2::from_shape_vec([2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(mean_rows(&x).unwrap(), vec![2.0, 3.0]);
/// ```
pub fn mean_rows(x: &Tensor2<f32>) -> Result<Vec<f64>, LinalgError> {
    let (rows, cols) = (x.rows(), x.cols());
    if rows == 0 {
        return Err(LinalgError::NotEnoughSamples(0));
    }

    let mut mean = vec![0.0f64; cols];
    for row in x.row_iter() {
        mean.iter_mut()
            .zip(row.iter())
            .for_each(|(m, &v)| *m += v as f64);
    }

    let inv_rows = 1.0 / rows as f64;
    mean.iter_mut().for_each(|m| *m *= inv_rows);

    Ok(mean)
}

/// Unbiased covariance of an observation matrix with one observation per row.
///
/// Computes `Xc^T * Xc / (M - 1)` where `Xc` is the matrix centered on `mean`.
///
/// # Arguments
///
/// * `x` - The observations with shape `(M, D)`.
/// * `mean` - The column means of `x`, typically from [`mean_rows`].
/// * `parallelism` - The parallelism used for the matrix product.
///
/// # Errors
///
/// Fewer than two observations give [`LinalgError::NotEnoughSamples`].
pub fn covariance(
    x: &Tensor2<f32>,
    mean: &[f64],
    parallelism: Parallelism,
) -> Result<Mat<f64>, LinalgError> {
    let (rows, cols) = (x.rows(), x.cols());
    if rows < 2 {
        return Err(LinalgError::NotEnoughSamples(rows));
    }
    if mean.len() != cols {
        return Err(LinalgError::DimensionMismatch {
            expected: cols,
            actual: mean.len(),
        });
    }

    let data = x.as_slice();
    let centered = Mat::<f64>::from_fn(rows, cols, |i, j| data[i * cols + j] as f64 - mean[j]);

    let mut cov = Mat::<f64>::zeros(cols, cols);
    faer::linalg::matmul::matmul(
        &mut cov.as_mut(),
        centered.transpose(),
        centered.as_ref(),
        None,
        1.0 / (rows - 1) as f64,
        parallelism,
    );

    Ok(cov)
}
