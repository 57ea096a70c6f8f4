use fidkit_dnn::FeatureExtractor;
use fidkit_image::{ImageBatch, ImageBatchView};
use fidkit_tensor::Tensor2;

use crate::{
    config::FidConfig,
    error::{FidError, ShapeError},
    preprocess,
};

/// Runs an extractor over two image sets in fixed-size batches.
///
/// Each set is split into `floor(N / batch_size)` batches; images past the last full batch
/// are not used. The embeddings are stacked in image order. A progress record is logged
/// before batches `0, progress_interval, 2 * progress_interval, ...`.
pub struct BatchAccumulator<'a, E: FeatureExtractor + ?Sized> {
    extractor: &'a E,
    config: &'a FidConfig,
}

impl<'a, E: FeatureExtractor + ?Sized> BatchAccumulator<'a, E> {
    /// Create a new accumulator.
    ///
    /// # Errors
    ///
    /// [`FidError::Config`] when the configuration does not pass [`FidConfig::validate`].
    pub fn new(extractor: &'a E, config: &'a FidConfig) -> Result<Self, FidError> {
        config.validate()?;
        Ok(Self { extractor, config })
    }

    /// Number of full batches in a set of `num_images` images.
    pub fn num_batches(&self, num_images: usize) -> usize {
        num_images / self.config.batch_size
    }

    /// Extract the features of two sets of the same length.
    ///
    /// # Returns
    ///
    /// Two feature matrices with `floor(N / batch_size) * batch_size` rows each.
    pub fn accumulate(
        &self,
        first: &ImageBatch,
        second: &ImageBatch,
    ) -> Result<(Tensor2<f32>, Tensor2<f32>), FidError> {
        let num_images = first.num_images();
        if second.num_images() != num_images {
            return Err(ShapeError::ImageCountMismatch(num_images, second.num_images()).into());
        }

        let batch_size = self.config.batch_size;
        let num_batches = self.num_batches(num_images);
        if num_batches == 0 {
            return Err(ShapeError::NotEnoughImages {
                num_images,
                batch_size,
            }
            .into());
        }

        let rows = num_batches * batch_size;
        let dim = self.extractor.embedding_dim();

        let dropped = num_images - rows;
        if dropped > 0 {
            log::debug!(
                "dropping the last {} of {} images that do not fill a batch of {}",
                dropped,
                num_images,
                batch_size
            );
        }

        let mut features_first = Vec::with_capacity(rows * dim);
        let mut features_second = Vec::with_capacity(rows * dim);

        for i in 0..num_batches {
            if i % self.config.progress_interval == 0 {
                log::info!("computing batch {}/{}", i, num_batches);
            }

            let start = i * batch_size;
            let batch_first = self.extract_batch(&first.view(start, batch_size)?)?;
            let batch_second = self.extract_batch(&second.view(start, batch_size)?)?;
            features_first.extend_from_slice(batch_first.as_slice());
            features_second.extend_from_slice(batch_second.as_slice());
        }

        Ok((
            Tensor2::from_shape_vec([rows, dim], features_first)?,
            Tensor2::from_shape_vec([rows, dim], features_second)?,
        ))
    }

    fn extract_batch(&self, view: &ImageBatchView) -> Result<Tensor2<f32>, FidError> {
        let batch = if self.config.apply_scaling {
            preprocess::rescale(
                view,
                self.extractor,
                self.config.interpolation,
                self.config.backend,
            )?
        } else {
            view.to_owned()?
        };

        let features = self.extractor.extract(&batch)?;

        let expected = [view.num_images(), self.extractor.embedding_dim()];
        if features.shape != expected {
            return Err(ShapeError::FeatureShape {
                expected_rows: expected[0],
                expected_cols: expected[1],
                actual: features.shape,
            }
            .into());
        }

        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fidkit_dnn::PooledPatchExtractor;
    use fidkit_image::ImageSize;

    fn size(side: usize) -> ImageSize {
        ImageSize {
            width: side,
            height: side,
        }
    }

    #[test]
    fn drops_remainder() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(4), 3, 2)?;
        let config = FidConfig::default().with_batch_size(4);
        let accumulator = BatchAccumulator::new(&extractor, &config)?;

        let a = ImageBatch::from_size_val(10, size(8), 1, 0.5);
        let b = ImageBatch::from_size_val(10, size(8), 1, 0.25);
        let (fa, fb) = accumulator.accumulate(&a, &b)?;

        assert_eq!(accumulator.num_batches(10), 2);
        assert_eq!(fa.shape, [8, 12]);
        assert_eq!(fb.shape, [8, 12]);
        assert!(fa.iter().all(|&v| v == 0.5));
        assert!(fb.iter().all(|&v| v == 0.25));
        Ok(())
    }

    #[test]
    fn keeps_image_order() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(2), 1, 1)?;
        let config = FidConfig::default().with_batch_size(2).with_scaling(false);
        let accumulator = BatchAccumulator::new(&extractor, &config)?;

        // image i is filled with i / 8
        let data = (0..6)
            .flat_map(|i| std::iter::repeat(i as f32 / 8.0).take(4))
            .collect();
        let a = ImageBatch::new(6, size(2), 1, data)?;
        let (fa, _) = accumulator.accumulate(&a, &a)?;

        let expected = (0..6).map(|i| i as f32 / 8.0).collect::<Vec<_>>();
        assert_eq!(fa.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn not_enough_images() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(4), 3, 2)?;
        let config = FidConfig::default();
        let accumulator = BatchAccumulator::new(&extractor, &config)?;

        let a = ImageBatch::from_size_val(49, size(4), 3, 0.5);
        assert!(matches!(
            accumulator.accumulate(&a, &a),
            Err(FidError::Shape(ShapeError::NotEnoughImages {
                num_images: 49,
                batch_size: 50
            }))
        ));
        Ok(())
    }

    #[test]
    fn unscaled_size_mismatch() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(4), 3, 2)?;
        let config = FidConfig::default().with_batch_size(1).with_scaling(false);
        let accumulator = BatchAccumulator::new(&extractor, &config)?;

        let a = ImageBatch::from_size_val(2, size(8), 3, 0.5);
        assert!(matches!(
            accumulator.accumulate(&a, &a),
            Err(FidError::Dnn(_))
        ));
        Ok(())
    }

    #[test]
    fn rejects_zero_batch_size() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(4), 3, 2)?;
        let config = FidConfig::default().with_batch_size(0);
        assert!(matches!(
            BatchAccumulator::new(&extractor, &config),
            Err(FidError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn rejects_zero_progress_interval() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(4), 3, 2)?;
        let config = FidConfig::default()
            .with_batch_size(2)
            .with_progress_interval(0);
        assert!(matches!(
            BatchAccumulator::new(&extractor, &config),
            Err(FidError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn progress_interval_one() -> Result<(), FidError> {
        let extractor = PooledPatchExtractor::new(size(2), 1, 1)?;
        let config = FidConfig::default()
            .with_batch_size(1)
            .with_progress_interval(1)
            .with_scaling(false);
        let accumulator = BatchAccumulator::new(&extractor, &config)?;

        let a = ImageBatch::from_size_val(3, size(2), 1, 0.5);
        let (fa, _) = accumulator.accumulate(&a, &a)?;
        assert_eq!(fa.shape, [3, 1]);
        Ok(())
    }
}
