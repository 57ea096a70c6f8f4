//! Square roots of positive semi-definite matrices.
//!
//! The Frechet distance between two Gaussians needs `trace(sqrtm(s1 * s2))`. The product of
//! two PSD matrices is not symmetric, but it is similar to the symmetric PSD matrix
//! `sqrtm(s1) * s2 * sqrtm(s1)`, so both share the same eigenvalues and the trace of the
//! principal square root is the sum of their square roots. This keeps the whole computation
//! on self-adjoint eigendecompositions.

use faer::{Mat, MatRef, Parallelism, Side};

use crate::{error::LinalgError, ops};

/// Principal square root of a symmetric positive semi-definite matrix.
///
/// Eigenvalues below zero, which only appear from rounding on (near) singular inputs, are
/// clamped to zero.
///
/// # Example
///
/// ```
/// use fidkit_linalg::sqrtm::sqrtm_psd;
///
/// let a = faer::mat![[4.0, 0.0], [0.0, 9.0]];
/// let s = sqrtm_psd(a.as_ref(), faer::Parallelism::None).unwrap();
/// assert!((s.read(0, 0) - 2.0).abs() < 1e-12);
/// assert!((s.read(1, 1) - 3.0).abs() < 1e-12);
/// ```
pub fn sqrtm_psd(a: MatRef<'_, f64>, parallelism: Parallelism) -> Result<Mat<f64>, LinalgError> {
    let n = ops::check_square(a)?;
    ops::ensure_finite(a, "sqrtm input")?;

    let eig = a.selfadjoint_eigendecomposition(Side::Lower);
    let u = eig.u();
    let s = eig.s().column_vector();

    let roots = (0..n).map(|i| s.read(i).max(0.0).sqrt()).collect::<Vec<_>>();

    // U * diag(sqrt(s))
    let scaled = Mat::<f64>::from_fn(n, n, |i, j| u.read(i, j) * roots[j]);

    let mut dst = Mat::<f64>::zeros(n, n);
    faer::linalg::matmul::matmul(
        &mut dst.as_mut(),
        scaled.as_ref(),
        u.transpose(),
        None,
        1.0,
        parallelism,
    );

    Ok(dst)
}

/// Result of [`trace_sqrt_product`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSqrt {
    /// The trace of the principal square root of the product.
    pub value: f64,
    /// Number of eigenvalues that came out negative and were clamped to zero.
    pub clamped: usize,
}

/// Trace of the principal square root of `a * b` for symmetric PSD `a` and `b`.
///
/// Negative eigenvalues of the symmetrized product are numerical noise and contribute
/// zero, which matches taking the real part of a complex matrix square root.
///
/// # Arguments
///
/// * `a` - A symmetric positive semi-definite matrix.
/// * `b` - A symmetric positive semi-definite matrix of the same dimension.
/// * `parallelism` - The parallelism used for the matrix products.
pub fn trace_sqrt_product(
    a: MatRef<'_, f64>,
    b: MatRef<'_, f64>,
    parallelism: Parallelism,
) -> Result<TraceSqrt, LinalgError> {
    let n = ops::check_square(a)?;
    let nb = ops::check_square(b)?;
    if n != nb {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            actual: nb,
        });
    }
    ops::ensure_finite(b, "sqrtm input")?;

    let sqrt_a = sqrtm_psd(a, parallelism)?;

    let mut tmp = Mat::<f64>::zeros(n, n);
    faer::linalg::matmul::matmul(
        &mut tmp.as_mut(),
        sqrt_a.as_ref(),
        b,
        None,
        1.0,
        parallelism,
    );

    let mut inner = Mat::<f64>::zeros(n, n);
    faer::linalg::matmul::matmul(
        &mut inner.as_mut(),
        tmp.as_ref(),
        sqrt_a.as_ref(),
        None,
        1.0,
        parallelism,
    );

    // the product is symmetric up to rounding
    let inner = ops::symmetrize(inner.as_ref())?;
    let eigenvalues = inner.selfadjoint_eigenvalues(Side::Lower);

    let mut value = 0.0;
    let mut clamped = 0;
    let mut most_negative = 0.0f64;
    for lambda in eigenvalues {
        if lambda < 0.0 {
            clamped += 1;
            most_negative = most_negative.min(lambda);
        } else {
            value += lambda.sqrt();
        }
    }

    if clamped > 0 {
        log::debug!(
            "trace_sqrt_product: clamped {} negative eigenvalues, most negative {:e}",
            clamped,
            most_negative
        );
    }

    if !value.is_finite() {
        return Err(LinalgError::NonFinite("sqrtm output"));
    }

    Ok(TraceSqrt { value, clamped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_psd(n: usize, samples: usize, seed: u64) -> Mat<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..samples * n)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect::<Vec<f64>>();
        let x = faer::mat::from_row_major_slice(&data, samples, n);
        let mut dst = Mat::<f64>::zeros(n, n);
        faer::linalg::matmul::matmul(
            &mut dst.as_mut(),
            x.transpose(),
            x,
            None,
            1.0 / samples as f64,
            Parallelism::None,
        );
        dst
    }

    #[test]
    fn sqrtm_squares_back() -> Result<(), LinalgError> {
        let a = random_psd(6, 32, 0);
        let s = sqrtm_psd(a.as_ref(), Parallelism::None)?;
        let ss = &s * &s;
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(ss.read(i, j), a.read(i, j), epsilon = 1e-10);
            }
        }
        Ok(())
    }

    #[test]
    fn sqrtm_clamps_negative() -> Result<(), LinalgError> {
        let a = faer::mat![[-1e-12, 0.0], [0.0, 4.0]];
        let s = sqrtm_psd(a.as_ref(), Parallelism::None)?;
        assert_relative_eq!(s.read(0, 0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.read(1, 1), 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn trace_sqrt_diagonal() -> Result<(), LinalgError> {
        let a = faer::mat![[4.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 9.0]];
        let b = faer::mat![[1.0, 0.0, 0.0], [0.0, 16.0, 0.0], [0.0, 0.0, 1.0]];
        let t = trace_sqrt_product(a.as_ref(), b.as_ref(), Parallelism::None)?;
        // sqrt(4) + sqrt(16) + sqrt(9)
        assert_relative_eq!(t.value, 9.0, epsilon = 1e-10);
        Ok(())
    }

    #[test]
    fn trace_sqrt_of_square_is_trace() -> Result<(), LinalgError> {
        let a = random_psd(8, 40, 1);
        let t = trace_sqrt_product(a.as_ref(), a.as_ref(), Parallelism::Rayon(0))?;
        assert_relative_eq!(t.value, ops::trace(a.as_ref())?, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn trace_sqrt_is_symmetric() -> Result<(), LinalgError> {
        let a = random_psd(5, 20, 2);
        let b = random_psd(5, 20, 3);
        let ab = trace_sqrt_product(a.as_ref(), b.as_ref(), Parallelism::None)?;
        let ba = trace_sqrt_product(b.as_ref(), a.as_ref(), Parallelism::None)?;
        assert_relative_eq!(ab.value, ba.value, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn trace_sqrt_of_zero() -> Result<(), LinalgError> {
        let a = Mat::<f64>::zeros(4, 4);
        let b = random_psd(4, 10, 4);
        let t = trace_sqrt_product(a.as_ref(), b.as_ref(), Parallelism::None)?;
        assert_eq!(t.value, 0.0);
        Ok(())
    }

    #[test]
    fn trace_sqrt_mismatch() {
        let a = Mat::<f64>::zeros(3, 3);
        let b = Mat::<f64>::zeros(4, 4);
        assert_eq!(
            trace_sqrt_product(a.as_ref(), b.as_ref(), Parallelism::None),
            Err(LinalgError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        );
    }
}
