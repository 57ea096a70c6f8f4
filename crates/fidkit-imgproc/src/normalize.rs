//! Pixel value normalization for image batches.
//!
//! Feature extractors expect their inputs in a fixed value distribution (for InceptionV3,
//! `[-1, 1]`), while image batches enter the pipeline in `[0, 1]`. The functions here find
//! the value range of a buffer and apply element-wise maps to a batch in place.

use num_traits::Float;

use fidkit_image::{ImageBatch, ImageError};

use crate::parallel::{self, ExecutionStrategy};

/// Find the minimum and maximum values in a pixel buffer.
///
/// # Errors
///
/// If the buffer is empty, [`ImageError::ImageDataNotInitialized`] is returned.
///
/// # Example
///
/// ```
/// use fidkit_imgproc::normalize::find_min_max;
///
/// let (min, max) = find_min_max(&[0.5f32, 0.0, 1.0, 0.25]).unwrap();
/// assert_eq!(min, 0.0);
/// assert_eq!(max, 1.0);
/// ```
pub fn find_min_max<T>(data: &[T]) -> Result<(T, T), ImageError>
where
    T: Copy + PartialOrd,
{
    let first_element = match data.first() {
        Some(x) => x,
        None => return Err(ImageError::ImageDataNotInitialized),
    };

    let mut min = first_element;
    let mut max = first_element;

    for x in data.iter() {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }

    Ok((*min, *max))
}

/// Index of the first NaN or infinite value in a buffer, if any.
pub fn find_non_finite<T: Float>(data: &[T]) -> Option<usize> {
    data.iter().position(|x| !x.is_finite())
}

/// Apply an element-wise map to every pixel of a batch in place.
///
/// # Example
///
/// ```
/// use fidkit_image::{ImageBatch, ImageSize};
/// use fidkit_imgproc::normalize::map_pixels_inplace;
/// use fidkit_imgproc::parallel::ExecutionStrategy;
///
/// let mut batch = ImageBatch::from_size_val(1, ImageSize { width: 2, height: 2 }, 1, 0.5);
/// map_pixels_inplace(&mut batch, ExecutionStrategy::Serial, |x| x * 2.0);
/// assert_eq!(batch.as_slice(), &[1.0; 4]);
/// ```
pub fn map_pixels_inplace<F>(batch: &mut ImageBatch, strategy: ExecutionStrategy, f: F)
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    parallel::map_inplace(batch.as_slice_mut(), strategy, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fidkit_image::ImageSize;

    #[test]
    fn find_min_max() -> Result<(), ImageError> {
        let (min, max) = super::find_min_max(&[0u8, 1, 0, 1, 2, 3, 0, 1, 0, 1, 2, 3])?;
        assert_eq!(min, 0);
        assert_eq!(max, 3);

        let empty: [f32; 0] = [];
        assert_eq!(
            super::find_min_max(&empty),
            Err(ImageError::ImageDataNotInitialized)
        );
        Ok(())
    }

    #[test]
    fn find_non_finite() {
        assert_eq!(super::find_non_finite(&[0.0f32, 1.0]), None);
        assert_eq!(super::find_non_finite(&[0.0f32, f32::NAN, 1.0]), Some(1));
        assert_eq!(super::find_non_finite(&[f64::INFINITY]), Some(0));
    }

    #[test]
    fn map_pixels() -> Result<(), ImageError> {
        let mut batch =
            ImageBatch::new(1, ImageSize { width: 3, height: 1 }, 1, vec![0.0, 0.5, 1.0])?;
        map_pixels_inplace(&mut batch, ExecutionStrategy::ParallelImages, |x| x * 2.0 - 1.0);

        let expected = [-1.0f32, 0.0, 1.0];
        batch
            .as_slice()
            .iter()
            .zip(expected.iter())
            .for_each(|(a, b)| assert_relative_eq!(a, b));
        Ok(())
    }
}
