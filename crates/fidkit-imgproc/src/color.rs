use fidkit_image::{ImageBatch, ImageError};

use crate::parallel::{self, ExecutionStrategy};

/// Convert a grayscale batch to RGB by replicating the gray value across all three channels.
///
/// Precondition: the input batch must have 1 channel.
///
/// # Arguments
///
/// * `src` - The grayscale batch.
/// * `strategy` - Whether the images are converted serially or on the rayon pool.
///
/// # Example
///
/// ```
/// use fidkit_image::{ImageBatch, ImageSize};
/// use fidkit_imgproc::color::rgb_from_gray;
/// use fidkit_imgproc::parallel::ExecutionStrategy;
///
/// let gray = ImageBatch::from_size_val(2, ImageSize { width: 4, height: 5 }, 1, 0.5);
/// let rgb = rgb_from_gray(&gray, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(rgb.num_channels(), 3);
/// assert_eq!(rgb.num_images(), 2);
/// ```
pub fn rgb_from_gray(
    src: &ImageBatch,
    strategy: ExecutionStrategy,
) -> Result<ImageBatch, ImageError> {
    if src.num_channels() != 1 {
        return Err(ImageError::UnsupportedChannels(src.num_channels()));
    }

    let mut dst = ImageBatch::from_size_val(src.num_images(), src.size(), 3, 0.0);

    let src_stride = src.image_numel();
    let dst_stride = dst.image_numel();

    parallel::iter_images(
        src.as_slice(),
        src_stride,
        dst.as_slice_mut(),
        dst_stride,
        strategy,
        |src_image, dst_image| {
            src_image
                .iter()
                .zip(dst_image.chunks_exact_mut(3))
                .for_each(|(&gray, rgb)| rgb.fill(gray));
        },
    );

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use fidkit_image::{ImageBatch, ImageError, ImageSize};

    use crate::parallel::ExecutionStrategy;

    #[test]
    fn rgb_from_gray() -> Result<(), ImageError> {
        let gray = ImageBatch::new(1, ImageSize { width: 2, height: 1 }, 1, vec![0.25, 1.0])?;
        let rgb = super::rgb_from_gray(&gray, ExecutionStrategy::Serial)?;
        assert_eq!(rgb.as_slice(), &[0.25, 0.25, 0.25, 1.0, 1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn rgb_from_gray_strategies_agree() -> Result<(), ImageError> {
        let data = (0..3 * 4 * 2).map(|x| x as f32 / 24.0).collect();
        let gray = ImageBatch::new(3, ImageSize { width: 4, height: 2 }, 1, data)?;
        let serial = super::rgb_from_gray(&gray, ExecutionStrategy::Serial)?;
        let parallel = super::rgb_from_gray(&gray, ExecutionStrategy::ParallelImages)?;
        assert_eq!(serial, parallel);
        assert_eq!(serial.as_slice()[9..12], [gray.as_slice()[3]; 3]);
        Ok(())
    }

    #[test]
    fn rgb_from_rgb_fails() {
        let rgb = ImageBatch::from_size_val(1, ImageSize { width: 2, height: 1 }, 3, 0.0);
        assert_eq!(
            super::rgb_from_gray(&rgb, ExecutionStrategy::Serial),
            Err(ImageError::UnsupportedChannels(3))
        );
    }
}
