use std::borrow::Cow;

use fidkit_dnn::FeatureExtractor;
use fidkit_image::{DynamicImageBatch, ImageBatch};
use fidkit_tensor::Tensor2;

use crate::{
    accumulator::BatchAccumulator,
    config::FidConfig,
    error::FidError,
    frechet::FrechetTerms,
    preprocess,
};

/// Computes the Frechet distance between two image sets with a feature extractor.
///
/// The calculator holds no state besides its extractor and configuration, and never
/// mutates the extractor.
///
/// # Example
///
/// ```
/// use fidkit::{FidCalculator, FidConfig};
/// use fidkit_dnn::PooledPatchExtractor;
/// use fidkit_image::{ImageBatch, ImageSize};
///
/// let extractor = PooledPatchExtractor::new(ImageSize { width: 8, height: 8 }, 3, 2).unwrap();
/// let calculator = FidCalculator::new(extractor, FidConfig::default().with_batch_size(10)).unwrap();
///
/// let ones = ImageBatch::from_size_val(20, ImageSize { width: 16, height: 16 }, 1, 1.0);
/// let zeros = ImageBatch::from_size_val(20, ImageSize { width: 16, height: 16 }, 1, 0.0);
///
/// let fid = calculator.compute(&ones, &zeros).unwrap();
/// assert!(fid.is_finite() && fid > 0.0);
/// ```
pub struct FidCalculator<E: FeatureExtractor> {
    extractor: E,
    config: FidConfig,
}

impl<E: FeatureExtractor> FidCalculator<E> {
    /// Create a new calculator.
    ///
    /// # Errors
    ///
    /// [`FidError::Config`] if the configuration is invalid.
    pub fn new(extractor: E, config: FidConfig) -> Result<Self, FidError> {
        config.validate()?;

        log::debug!(
            "fid calculator: backend {}, batch size {}, input {} x {} channels, {} features",
            config.backend,
            config.batch_size,
            extractor.input_size(),
            extractor.num_channels(),
            extractor.embedding_dim()
        );

        Ok(Self { extractor, config })
    }

    /// The configuration.
    pub fn config(&self) -> &FidConfig {
        &self.config
    }

    /// The feature extractor.
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// The Frechet distance between two image sets.
    ///
    /// Both sets must hold the same number of `[0, 1]` images with 1 or 3 channels. The
    /// result is theoretically non-negative but may be marginally below zero from rounding.
    pub fn compute(&self, first: &ImageBatch, second: &ImageBatch) -> Result<f64, FidError> {
        Ok(self.compute_terms(first, second)?.distance())
    }

    /// Like [`FidCalculator::compute`] for batches whose rank and element type are only
    /// known at runtime.
    pub fn compute_dynamic(
        &self,
        first: DynamicImageBatch,
        second: DynamicImageBatch,
    ) -> Result<f64, FidError> {
        let first = preprocess::typed_batch(first)?;
        let second = preprocess::typed_batch(second)?;
        self.compute(&first, &second)
    }

    /// The two terms of the Frechet distance between two image sets.
    pub fn compute_terms(
        &self,
        first: &ImageBatch,
        second: &ImageBatch,
    ) -> Result<FrechetTerms, FidError> {
        let (features_first, features_second) = self.extract_features(first, second)?;
        self.config.backend.frechet_from_features(
            &features_first,
            &features_second,
            self.config.regularization_eps,
        )
    }

    /// Validate, preprocess and embed two image sets.
    ///
    /// # Returns
    ///
    /// One feature matrix per set, with `floor(N / batch_size) * batch_size` rows.
    pub fn extract_features(
        &self,
        first: &ImageBatch,
        second: &ImageBatch,
    ) -> Result<(Tensor2<f32>, Tensor2<f32>), FidError> {
        self.config.backend.ensure_implemented()?;
        preprocess::validate_pair(first, second)?;

        let (first, second) = if self.config.apply_preprocess {
            let strategy = self.config.backend.execution_strategy();
            let mut first = first.clone();
            let mut second = second.clone();
            preprocess::apply_range_map(&mut first, &self.extractor, strategy);
            preprocess::apply_range_map(&mut second, &self.extractor, strategy);
            (Cow::Owned(first), Cow::Owned(second))
        } else {
            (Cow::Borrowed(first), Cow::Borrowed(second))
        };

        BatchAccumulator::new(&self.extractor, &self.config)?.accumulate(&first, &second)
    }
}
