//! The Frechet distance between two Gaussians fitted to feature matrices.
//!
//! For `N(mu_1, sigma_1)` and `N(mu_2, sigma_2)` the distance is
//!
//! ```text
//! d^2 = |mu_1 - mu_2|^2 + tr(sigma_1 + sigma_2 - 2 * sqrtm(sigma_1 * sigma_2))
//! ```

use faer::{Mat, Parallelism};
use fidkit_linalg::{ops, sqrtm, stats, LinalgError};
use fidkit_tensor::Tensor2;

use crate::error::FidError;

/// Mean and covariance of a feature matrix.
#[derive(Debug, Clone)]
pub struct GaussianStats {
    /// Column means, one per feature.
    pub mean: Vec<f64>,
    /// Unbiased covariance of the features.
    pub covariance: Mat<f64>,
}

impl GaussianStats {
    /// Fit a Gaussian to a feature matrix with one observation per row.
    ///
    /// # Errors
    ///
    /// Fewer than two rows, or features producing non-finite statistics.
    pub fn from_features(
        features: &Tensor2<f32>,
        parallelism: Parallelism,
    ) -> Result<Self, FidError> {
        let mean = stats::mean_rows(features)?;
        if mean.iter().any(|m| !m.is_finite()) {
            return Err(LinalgError::NonFinite("feature mean").into());
        }

        let covariance = stats::covariance(features, &mean, parallelism)?;
        ops::ensure_finite(covariance.as_ref(), "feature covariance")?;

        log::debug!(
            "fitted gaussian to {} observations of dimension {}",
            features.rows(),
            features.cols()
        );

        Ok(Self { mean, covariance })
    }

    /// The feature dimension.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}

/// The two terms of the Frechet distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrechetTerms {
    /// Squared distance between the means.
    pub ssdiff: f64,
    /// `tr(sigma_1 + sigma_2 - 2 * covmean)`.
    pub trace: f64,
}

impl FrechetTerms {
    /// The Frechet distance, `ssdiff + trace`.
    pub fn distance(&self) -> f64 {
        self.ssdiff + self.trace
    }
}

/// Frechet distance between two fitted Gaussians.
///
/// # Arguments
///
/// * `first` - The statistics of the first set.
/// * `second` - The statistics of the second set.
/// * `regularization_eps` - If set, `eps * I` is added to both covariances before their
///   product. The `tr(sigma_1 + sigma_2)` term always uses the plain covariances.
/// * `parallelism` - The parallelism used for the matrix products.
///
/// Eigenvalues of the product that come out negative from rounding contribute nothing to
/// the trace of its square root, so the result may be marginally below zero but is never
/// NaN for valid statistics.
pub fn frechet_distance(
    first: &GaussianStats,
    second: &GaussianStats,
    regularization_eps: Option<f64>,
    parallelism: Parallelism,
) -> Result<FrechetTerms, FidError> {
    if first.dim() != second.dim() {
        return Err(LinalgError::DimensionMismatch {
            expected: first.dim(),
            actual: second.dim(),
        }
        .into());
    }

    let ssdiff = ops::squared_distance(&first.mean, &second.mean)?;

    let covmean_trace = match regularization_eps {
        Some(eps) => {
            let s1 = ops::add_diagonal(first.covariance.as_ref(), eps)?;
            let s2 = ops::add_diagonal(second.covariance.as_ref(), eps)?;
            sqrtm::trace_sqrt_product(s1.as_ref(), s2.as_ref(), parallelism)?
        }
        None => sqrtm::trace_sqrt_product(
            first.covariance.as_ref(),
            second.covariance.as_ref(),
            parallelism,
        )?,
    };

    let trace = ops::trace(first.covariance.as_ref())? + ops::trace(second.covariance.as_ref())?
        - 2.0 * covmean_trace.value;

    log::debug!(
        "frechet terms: ssdiff {:.6}, trace {:.6} ({} clamped eigenvalues)",
        ssdiff,
        trace,
        covmean_trace.clamped
    );

    Ok(FrechetTerms { ssdiff, trace })
}
