use fidkit_image::{ImageBatch, ImageBatchView, ImageError, ImageSize};

use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::parallel::{self, ExecutionStrategy};

/// Map destination pixel centers onto source coordinates along one axis.
///
/// Pixel centers are aligned (`half pixel` convention), so a 1-pixel wide source maps every
/// destination pixel onto coordinate 0 and an identity resize maps each pixel onto itself.
fn source_coordinates(src_len: usize, dst_len: usize) -> Vec<f32> {
    let scale = src_len as f32 / dst_len as f32;
    (0..dst_len)
        .map(|i| (i as f32 + 0.5) * scale - 0.5)
        .collect()
}

/// Resize every image of a batch to a new size.
///
/// The same interpolation is applied to all images, so two batches resized with the same
/// arguments are resampled identically.
///
/// # Arguments
///
/// * `src` - The input images with shape (N, H, W, C).
/// * `dst_size` - The new size of each image.
/// * `interpolation` - The interpolation mode to use.
/// * `strategy` - Whether images are processed in parallel.
///
/// # Returns
///
/// A new batch with shape (N, dst_height, dst_width, C).
///
/// # Example
///
/// ```
/// use fidkit_image::{ImageBatch, ImageSize};
/// use fidkit_imgproc::interpolation::InterpolationMode;
/// use fidkit_imgproc::parallel::ExecutionStrategy;
/// use fidkit_imgproc::resize::resize;
///
/// let batch = ImageBatch::from_size_val(2, ImageSize { width: 4, height: 5 }, 3, 0.5);
///
/// let resized = resize(
///     &batch.as_view(),
///     ImageSize { width: 2, height: 3 },
///     InterpolationMode::Nearest,
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(resized.num_images(), 2);
/// assert_eq!(resized.num_channels(), 3);
/// assert_eq!(resized.size().width, 2);
/// assert_eq!(resized.size().height, 3);
/// ```
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the source or destination size is empty.
pub fn resize(
    src: &ImageBatchView,
    dst_size: ImageSize,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
) -> Result<ImageBatch, ImageError> {
    resize_to_channels(src, dst_size, src.num_channels(), interpolation, strategy)
}

/// Resize every image of a batch and expand it to `dst_channels` in a single pass.
///
/// A single-channel source is sampled once per destination pixel and the value written to
/// every destination channel. A source that already has `dst_channels` channels is resized
/// as in [`resize`].
///
/// # Errors
///
/// * [`ImageError::InvalidImageSize`] if the source or destination size is empty.
/// * [`ImageError::UnsupportedChannels`] if the source has neither 1 nor `dst_channels`
///   channels.
pub fn resize_to_channels(
    src: &ImageBatchView,
    dst_size: ImageSize,
    dst_channels: usize,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
) -> Result<ImageBatch, ImageError> {
    let src_size = src.size();
    let src_channels = src.num_channels();

    if src_size.width == 0 || src_size.height == 0 || dst_size.width == 0 || dst_size.height == 0
    {
        return Err(ImageError::InvalidImageSize(
            src_size.width,
            src_size.height,
            dst_size.width,
            dst_size.height,
        ));
    }

    if src_channels != dst_channels && src_channels != 1 {
        return Err(ImageError::UnsupportedChannels(src_channels));
    }

    let mut dst = ImageBatch::from_size_val(src.num_images(), dst_size, dst_channels, 0.0);

    let xs = source_coordinates(src_size.width, dst_size.width);
    let ys = source_coordinates(src_size.height, dst_size.height);

    let src_stride = src.image_numel();
    let dst_stride = dst.image_numel();

    parallel::iter_images(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        strategy,
        |src_image, dst_image| {
            dst_image
                .chunks_exact_mut(dst_channels)
                .enumerate()
                .for_each(|(i, dst_pixel)| {
                    let (u, v) = (xs[i % dst_size.width], ys[i / dst_size.width]);
                    if src_channels == 1 {
                        let val = interpolate_pixel(
                            src_image,
                            src_size.height,
                            src_size.width,
                            1,
                            u,
                            v,
                            0,
                            interpolation,
                        );
                        dst_pixel.fill(val);
                    } else {
                        for (k, out) in dst_pixel.iter_mut().enumerate() {
                            *out = interpolate_pixel(
                                src_image,
                                src_size.height,
                                src_size.width,
                                src_channels,
                                u,
                                v,
                                k,
                                interpolation,
                            );
                        }
                    }
                });
        },
    );

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn resize_smoke_ch3() -> Result<(), ImageError> {
        let batch = ImageBatch::from_size_val(3, ImageSize { width: 4, height: 5 }, 3, 0.0);

        let resized = resize(
            &batch.as_view(),
            ImageSize { width: 2, height: 3 },
            InterpolationMode::Bilinear,
            ExecutionStrategy::ParallelImages,
        )?;

        assert_eq!(resized.num_images(), 3);
        assert_eq!(resized.num_channels(), 3);
        assert_eq!(resized.size(), ImageSize { width: 2, height: 3 });
        Ok(())
    }

    #[test]
    fn resize_nearest_upsample() -> Result<(), ImageError> {
        // one 2x2 gray image upsampled to 4x4 duplicates each pixel into a 2x2 block
        let batch = ImageBatch::new(1, ImageSize { width: 2, height: 2 }, 1, vec![0.0, 0.25, 0.5, 1.0])?;

        let resized = resize(
            &batch.as_view(),
            ImageSize { width: 4, height: 4 },
            InterpolationMode::Nearest,
            ExecutionStrategy::Serial,
        )?;

        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 0.25, 0.25,
            0.0, 0.0, 0.25, 0.25,
            0.5, 0.5, 1.0, 1.0,
            0.5, 0.5, 1.0, 1.0,
        ];
        assert_eq!(resized.as_slice(), &expected);
        Ok(())
    }

    #[test]
    fn resize_identity() -> Result<(), ImageError> {
        let data = (0..2 * 3 * 3 * 3).map(|x| x as f32 / 54.0).collect::<Vec<_>>();
        let batch = ImageBatch::new(2, ImageSize { width: 3, height: 3 }, 3, data)?;

        for mode in [InterpolationMode::Nearest, InterpolationMode::Bilinear] {
            let resized = resize(&batch.as_view(), batch.size(), mode, ExecutionStrategy::Serial)?;
            resized
                .as_slice()
                .iter()
                .zip(batch.as_slice())
                .for_each(|(a, b)| assert_relative_eq!(a, b, epsilon = 1e-6));
        }
        Ok(())
    }

    #[test]
    fn resize_gray_to_rgb_matches_separate_stages() -> Result<(), ImageError> {
        let data = (0..2 * 5 * 4).map(|x| (x % 7) as f32 / 7.0).collect::<Vec<_>>();
        let batch = ImageBatch::new(2, ImageSize { width: 4, height: 5 }, 1, data)?;
        let size = ImageSize { width: 7, height: 6 };

        let fused = resize_to_channels(
            &batch.as_view(),
            size,
            3,
            InterpolationMode::Nearest,
            ExecutionStrategy::ParallelImages,
        )?;
        let gray = resize(&batch.as_view(), size, InterpolationMode::Nearest, ExecutionStrategy::Serial)?;
        let staged = crate::color::rgb_from_gray(&gray, ExecutionStrategy::Serial)?;

        assert_eq!(fused, staged);
        Ok(())
    }

    #[test]
    fn resize_invalid() {
        let batch = ImageBatch::from_size_val(1, ImageSize { width: 2, height: 2 }, 2, 0.0);
        let res = resize_to_channels(
            &batch.as_view(),
            ImageSize { width: 4, height: 4 },
            3,
            InterpolationMode::Nearest,
            ExecutionStrategy::Serial,
        );
        assert_eq!(res, Err(ImageError::UnsupportedChannels(2)));

        let res = resize(
            &batch.as_view(),
            ImageSize { width: 0, height: 4 },
            InterpolationMode::Nearest,
            ExecutionStrategy::Serial,
        );
        assert!(matches!(res, Err(ImageError::InvalidImageSize(..))));
    }
}
