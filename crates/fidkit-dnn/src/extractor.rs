use fidkit_image::{ImageBatch, ImageSize};
use fidkit_tensor::Tensor2;

use crate::error::DnnError;

/// A network mapping a batch of images to one fixed-length embedding per image.
///
/// Implementations take `&self` in [`FeatureExtractor::extract`] and are shared between
/// threads, so any internal state must be synchronized by the implementation.
pub trait FeatureExtractor: Send + Sync {
    /// The spatial size of the images the extractor accepts.
    fn input_size(&self) -> ImageSize;

    /// The number of channels of the images the extractor accepts.
    fn num_channels(&self) -> usize {
        3
    }

    /// The length of one embedding.
    fn embedding_dim(&self) -> usize;

    /// Map a pixel value in `[0, 255]` to the distribution the network was trained on.
    ///
    /// The default is the InceptionV3 normalization `x / 127.5 - 1`.
    fn normalize(&self, value: f32) -> f32 {
        value / 127.5 - 1.0
    }

    /// Compute the embeddings of a batch.
    ///
    /// # Returns
    ///
    /// A matrix with one row of length [`FeatureExtractor::embedding_dim`] per image, in
    /// the order of the batch.
    fn extract(&self, batch: &ImageBatch) -> Result<Tensor2<f32>, DnnError>;
}

/// Check that a batch matches the input size and channels of an extractor.
pub fn check_input<E>(extractor: &E, batch: &ImageBatch) -> Result<(), DnnError>
where
    E: FeatureExtractor + ?Sized,
{
    if batch.size() != extractor.input_size() || batch.num_channels() != extractor.num_channels()
    {
        return Err(DnnError::InvalidInputShape {
            expected_size: extractor.input_size(),
            expected_channels: extractor.num_channels(),
            actual_size: batch.size(),
            actual_channels: batch.num_channels(),
        });
    }
    Ok(())
}
