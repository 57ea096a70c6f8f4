use std::{fmt, str::FromStr};

use fidkit_imgproc::interpolation::InterpolationMode;

use crate::error::FidError;

/// Numeric strategy used to compute the distance.
///
/// All backends share the same contract, two image sets in and one scalar out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Backend {
    /// Batch by batch with separate resize and channel stages and serial linear algebra.
    #[default]
    Direct,
    /// Fused resize kernels, parallel linear algebra and a regularized covariance product.
    ///
    /// The regularizer biases the estimate, so the result is close to but not the same as
    /// the one of [`Backend::Direct`].
    Fused,
    /// Reserved strategy. Every computation with it fails.
    Loop,
}

impl Backend {
    /// The canonical name of the backend.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Direct => "direct",
            Backend::Fused => "fused",
            Backend::Loop => "loop",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Backend {
    type Err = FidError;

    /// Parse a backend name. Besides the canonical names, `numpy`, `graph`, `tfp` and `tf`
    /// are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "numpy" => Ok(Backend::Direct),
            "fused" | "graph" | "tfp" => Ok(Backend::Fused),
            "loop" | "tf" => Ok(Backend::Loop),
            other => Err(FidError::Config(format!(
                "unknown backend '{}', expected one of direct, fused, loop",
                other
            ))),
        }
    }
}

/// Configuration of a [`crate::FidCalculator`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FidConfig {
    /// The numeric strategy.
    pub backend: Backend,
    /// Number of images per extractor call. Trailing images that do not fill a batch are
    /// not used.
    pub batch_size: usize,
    /// Resize the images to the extractor input size.
    pub apply_scaling: bool,
    /// Map `[0, 1]` pixels to the extractor input distribution.
    pub apply_preprocess: bool,
    /// Interpolation used for both image sets when resizing.
    pub interpolation: InterpolationMode,
    /// Diagonal regularizer added to both covariances by [`Backend::Fused`].
    pub regularization_eps: f64,
    /// Number of batches between two progress records.
    pub progress_interval: usize,
}

impl Default for FidConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Direct,
            batch_size: 50,
            apply_scaling: true,
            apply_preprocess: true,
            interpolation: InterpolationMode::Nearest,
            regularization_eps: 1e-6,
            progress_interval: 10,
        }
    }
}

impl FidConfig {
    /// Sets the backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the backend from its name.
    ///
    /// # Errors
    ///
    /// [`FidError::Config`] if the name is not recognized.
    ///
    /// # Example
    ///
    /// ```
    /// use fidkit::{Backend, FidConfig};
    ///
    /// let config = FidConfig::default().with_backend_name("numpy").unwrap();
    /// assert_eq!(config.backend, Backend::Direct);
    /// assert!(FidConfig::default().with_backend_name("cuda").is_err());
    /// ```
    pub fn with_backend_name(self, name: &str) -> Result<Self, FidError> {
        Ok(self.with_backend(name.parse()?))
    }

    /// Sets the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enables or disables spatial resizing.
    pub fn with_scaling(mut self, apply_scaling: bool) -> Self {
        self.apply_scaling = apply_scaling;
        self
    }

    /// Enables or disables the pixel range map.
    pub fn with_preprocess(mut self, apply_preprocess: bool) -> Self {
        self.apply_preprocess = apply_preprocess;
        self
    }

    /// Sets the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the diagonal regularizer of the fused backend.
    pub fn with_regularization_eps(mut self, eps: f64) -> Self {
        self.regularization_eps = eps;
        self
    }

    /// Sets the number of batches between two progress records.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// [`FidError::Config`] when the batch size or the progress interval is zero, or the
    /// regularizer is negative or not finite.
    pub fn validate(&self) -> Result<(), FidError> {
        if self.batch_size == 0 {
            return Err(FidError::Config("batch_size must be positive".to_string()));
        }
        if self.progress_interval == 0 {
            return Err(FidError::Config(
                "progress_interval must be positive".to_string(),
            ));
        }
        if !self.regularization_eps.is_finite() || self.regularization_eps < 0.0 {
            return Err(FidError::Config(format!(
                "regularization_eps must be finite and non-negative, got {}",
                self.regularization_eps
            )));
        }
        Ok(())
    }
}
