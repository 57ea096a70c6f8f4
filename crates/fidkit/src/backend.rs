use faer::Parallelism;
use fidkit_imgproc::parallel::ExecutionStrategy;
use fidkit_tensor::Tensor2;

use crate::{
    config::Backend,
    error::FidError,
    frechet::{frechet_distance, FrechetTerms, GaussianStats},
};

impl Backend {
    /// Fail unless the backend can run a computation.
    pub fn ensure_implemented(&self) -> Result<(), FidError> {
        match self {
            Backend::Direct | Backend::Fused => Ok(()),
            Backend::Loop => Err(FidError::UnsupportedOperation(
                "the loop backend is not implemented".to_string(),
            )),
        }
    }

    /// Parallelism of the linear algebra.
    pub fn parallelism(&self) -> Parallelism {
        match self {
            Backend::Direct | Backend::Loop => Parallelism::None,
            Backend::Fused => Parallelism::Rayon(0),
        }
    }

    /// Execution strategy of the per-pixel kernels.
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        match self {
            Backend::Direct | Backend::Loop => ExecutionStrategy::Serial,
            Backend::Fused => ExecutionStrategy::ParallelImages,
        }
    }

    /// The covariance regularizer applied by this backend, if any.
    pub fn regularization(&self, eps: f64) -> Option<f64> {
        match self {
            Backend::Fused => Some(eps),
            Backend::Direct | Backend::Loop => None,
        }
    }

    /// Frechet distance between two feature matrices, bypassing any extractor.
    ///
    /// The matrices hold one embedding per row and may have different row counts, but the
    /// same number of columns.
    ///
    /// # Arguments
    ///
    /// * `first` - Features of the first set.
    /// * `second` - Features of the second set.
    /// * `regularization_eps` - The covariance regularizer, used by [`Backend::Fused`] only.
    ///
    /// # Errors
    ///
    /// [`FidError::Config`] when `regularization_eps` is negative or not finite, whatever the
    /// backend.
    ///
    /// # Example
    ///
    /// ```
    /// use fidkit::Backend;
    /// use fidkit_tensor::Tensor2;
    ///
    /// let x1 = Tensor2::from_shape_vec([3, 1], vec![0.0f32, 1.0, 2.0]).unwrap();
    /// let x2 = Tensor2::from_shape_vec([3, 1], vec![1.0f32, 2.0, 3.0]).unwrap();
    /// let terms = Backend::Direct.frechet_from_features(&x1, &x2, 1e-6).unwrap();
    /// assert!((terms.ssdiff - 1.0).abs() < 1e-12);
    /// ```
    pub fn frechet_from_features(
        &self,
        first: &Tensor2<f32>,
        second: &Tensor2<f32>,
        regularization_eps: f64,
    ) -> Result<FrechetTerms, FidError> {
        self.ensure_implemented()?;
        if !regularization_eps.is_finite() || regularization_eps < 0.0 {
            return Err(FidError::Config(format!(
                "regularization_eps must be finite and non-negative, got {}",
                regularization_eps
            )));
        }

        let parallelism = self.parallelism();
        let s1 = GaussianStats::from_features(first, parallelism)?;
        let s2 = GaussianStats::from_features(second, parallelism)?;

        frechet_distance(
            &s1,
            &s2,
            self.regularization(regularization_eps),
            parallelism,
        )
    }
}
