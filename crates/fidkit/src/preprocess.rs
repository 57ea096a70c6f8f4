//! Input validation and the per-batch image preparation.
//!
//! Both image sets go through the same steps with the same parameters: validation of the
//! value contract, the pixel range map of the extractor, and a resize to the extractor
//! input that also expands gray images to the extractor channel count.

use fidkit_dnn::FeatureExtractor;
use fidkit_image::{DynamicImageBatch, ImageBatch, ImageBatchView, ImageError};
use fidkit_imgproc::{
    color, interpolation::InterpolationMode, normalize, parallel::ExecutionStrategy, resize,
};

use crate::{
    config::Backend,
    error::{FidError, ShapeError, ValidationError},
};

/// Check that every pixel of a batch is finite and within `[0, 1]`.
///
/// # Example
///
/// ```
/// use fidkit::preprocess::validate_batch;
/// use fidkit_image::{ImageBatch, ImageSize};
///
/// let batch = ImageBatch::from_size_val(2, ImageSize { width: 4, height: 4 }, 1, 0.5);
/// assert!(validate_batch(&batch).is_ok());
///
/// let batch = ImageBatch::from_size_val(2, ImageSize { width: 4, height: 4 }, 1, 1.5);
/// assert!(validate_batch(&batch).is_err());
/// ```
pub fn validate_batch(batch: &ImageBatch) -> Result<(), ValidationError> {
    let data = batch.as_slice();

    if let Some(index) = normalize::find_non_finite(data) {
        return Err(ValidationError::NonFinite(index));
    }

    let (min, max) = normalize::find_min_max(data).map_err(|_| ValidationError::Empty)?;
    if min < 0.0 || max > 1.0 {
        return Err(ValidationError::OutOfRange { min, max });
    }

    Ok(())
}

/// Validate both image sets and check that they can be compared.
///
/// The value contract is checked first, then the channel policy and the image counts.
pub fn validate_pair(first: &ImageBatch, second: &ImageBatch) -> Result<(), FidError> {
    validate_batch(first)?;
    validate_batch(second)?;

    for channels in [first.num_channels(), second.num_channels()] {
        if channels != 1 && channels != 3 {
            return Err(ShapeError::UnsupportedChannels(channels).into());
        }
    }

    if first.num_channels() != second.num_channels() {
        return Err(
            ShapeError::ChannelMismatch(first.num_channels(), second.num_channels()).into(),
        );
    }

    if first.num_images() != second.num_images() {
        return Err(ShapeError::ImageCountMismatch(first.num_images(), second.num_images()).into());
    }

    Ok(())
}

/// Convert a runtime-typed batch, reporting rank and element type violations as
/// [`ValidationError`].
pub fn typed_batch(batch: DynamicImageBatch) -> Result<ImageBatch, FidError> {
    batch.into_image_batch().map_err(|e| match e {
        ImageError::InvalidRank(rank) => ValidationError::InvalidRank(rank).into(),
        ImageError::InvalidDtype { expected, actual } => {
            ValidationError::InvalidDtype { expected, actual }.into()
        }
        other => FidError::Image(other),
    })
}

/// Map `[0, 1]` pixels to the input distribution of the extractor in place.
///
/// The pixels are scaled to `[0, 255]` and passed through [`FeatureExtractor::normalize`].
pub fn apply_range_map<E>(batch: &mut ImageBatch, extractor: &E, strategy: ExecutionStrategy)
where
    E: FeatureExtractor + ?Sized,
{
    normalize::map_pixels_inplace(batch, strategy, |x| extractor.normalize(255.0 * x));
}

/// Resize a slice of a set to the extractor input and expand its channels.
///
/// [`Backend::Direct`] resizes in the source channel count and replicates gray images in a
/// second pass. [`Backend::Fused`] does both in a single gather over all images in
/// parallel. Both produce the same pixels.
pub fn rescale<E>(
    src: &ImageBatchView,
    extractor: &E,
    interpolation: InterpolationMode,
    backend: Backend,
) -> Result<ImageBatch, FidError>
where
    E: FeatureExtractor + ?Sized,
{
    let dst_size = extractor.input_size();
    let dst_channels = extractor.num_channels();

    let resized = match backend {
        Backend::Direct => {
            let resized = resize::resize(src, dst_size, interpolation, ExecutionStrategy::Serial)?;
            if resized.num_channels() == 1 && dst_channels == 3 {
                color::rgb_from_gray(&resized, ExecutionStrategy::Serial)?
            } else {
                resized
            }
        }
        Backend::Fused => resize::resize_to_channels(
            src,
            dst_size,
            dst_channels,
            interpolation,
            ExecutionStrategy::ParallelImages,
        )?,
        Backend::Loop => {
            return Err(FidError::UnsupportedOperation(
                "the loop backend is not implemented".to_string(),
            ))
        }
    };

    Ok(resized)
}
