//! A weight-free extractor built from average pooling.
//!
//! Each image is split into a `grid x grid` lattice of cells and every cell is reduced to
//! the mean of each channel. The embedding has `grid * grid * channels` entries. It needs
//! no model file, so it serves for quick comparisons of low-level image statistics and for
//! exercising the pipeline in tests.

use rayon::prelude::*;

use fidkit_image::{ImageBatch, ImageSize};
use fidkit_tensor::Tensor2;

use crate::{
    error::DnnError,
    extractor::{check_input, FeatureExtractor},
};

/// Feature extractor averaging a fixed grid of patches per channel.
#[derive(Debug, Clone)]
pub struct PooledPatchExtractor {
    input_size: ImageSize,
    num_channels: usize,
    grid: usize,
}

impl PooledPatchExtractor {
    /// Create a new extractor.
    ///
    /// # Arguments
    ///
    /// * `input_size` - The spatial size of the accepted images.
    /// * `num_channels` - The number of channels of the accepted images.
    /// * `grid` - The number of cells along each axis.
    ///
    /// # Errors
    ///
    /// The grid must be non-zero and no larger than the image along either axis.
    ///
    /// # Example
    ///
    /// ```
    /// use fidkit_dnn::{FeatureExtractor, PooledPatchExtractor};
    /// use fidkit_image::ImageSize;
    ///
    /// let extractor = PooledPatchExtractor::new(ImageSize { width: 8, height: 8 }, 3, 2).unwrap();
    /// assert_eq!(extractor.embedding_dim(), 12);
    /// ```
    pub fn new(input_size: ImageSize, num_channels: usize, grid: usize) -> Result<Self, DnnError> {
        if grid == 0 || grid > input_size.width || grid > input_size.height {
            return Err(DnnError::InvalidConfig(format!(
                "grid {} does not fit an image of size {}",
                grid, input_size
            )));
        }
        if num_channels == 0 {
            return Err(DnnError::InvalidConfig(
                "the number of channels must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            input_size,
            num_channels,
            grid,
        })
    }

    fn pool_image(&self, src: &[f32], dst: &mut [f32]) {
        let (rows, cols) = (self.input_size.height, self.input_size.width);
        let channels = self.num_channels;
        let grid = self.grid;

        for gy in 0..grid {
            let (y0, y1) = (gy * rows / grid, (gy + 1) * rows / grid);
            for gx in 0..grid {
                let (x0, x1) = (gx * cols / grid, (gx + 1) * cols / grid);
                let cell = &mut dst[(gy * grid + gx) * channels..][..channels];
                cell.fill(0.0);

                for y in y0..y1 {
                    let row = &src[(y * cols + x0) * channels..(y * cols + x1) * channels];
                    for pixel in row.chunks_exact(channels) {
                        cell.iter_mut().zip(pixel).for_each(|(acc, &v)| *acc += v);
                    }
                }

                let inv_area = 1.0 / ((y1 - y0) * (x1 - x0)) as f32;
                cell.iter_mut().for_each(|acc| *acc *= inv_area);
            }
        }
    }
}

impl FeatureExtractor for PooledPatchExtractor {
    fn input_size(&self) -> ImageSize {
        self.input_size
    }

    fn num_channels(&self) -> usize {
        self.num_channels
    }

    fn embedding_dim(&self) -> usize {
        self.grid * self.grid * self.num_channels
    }

    fn extract(&self, batch: &ImageBatch) -> Result<Tensor2<f32>, DnnError> {
        check_input(self, batch)?;

        let dim = self.embedding_dim();
        let mut features = Tensor2::zeros([batch.num_images(), dim]);

        features
            .as_slice_mut()
            .par_chunks_exact_mut(dim)
            .zip(batch.as_slice().par_chunks_exact(batch.image_numel()))
            .for_each(|(dst, src)| self.pool_image(src, dst));

        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pool_constant() -> Result<(), DnnError> {
        let size = ImageSize {
            width: 6,
            height: 4,
        };
        let extractor = PooledPatchExtractor::new(size, 3, 2)?;
        let batch = ImageBatch::from_size_val(5, size, 3, 0.25);

        let features = extractor.extract(&batch)?;
        assert_eq!(features.shape, [5, 12]);
        features
            .as_slice()
            .iter()
            .for_each(|&v| assert_relative_eq!(v, 0.25));
        Ok(())
    }

    #[test]
    fn pool_cells() -> Result<(), DnnError> {
        // 2x2 gray image, one cell per pixel
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let extractor = PooledPatchExtractor::new(size, 1, 2)?;
        let batch = ImageBatch::new(1, size, 1, vec![0.0, 1.0, 2.0, 3.0])?;
        let features = extractor.extract(&batch)?;
        assert_eq!(features.as_slice(), &[0.0, 1.0, 2.0, 3.0]);

        // one cell for the whole image
        let extractor = PooledPatchExtractor::new(size, 1, 1)?;
        let features = extractor.extract(&batch)?;
        assert_relative_eq!(features.as_slice()[0], 1.5);
        Ok(())
    }

    #[test]
    fn uneven_cells() -> Result<(), DnnError> {
        // a single cell over three columns
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        let extractor = PooledPatchExtractor::new(size, 1, 1)?;
        let batch = ImageBatch::new(1, size, 1, vec![1.0, 2.0, 6.0])?;
        assert_relative_eq!(extractor.extract(&batch)?.as_slice()[0], 3.0);
        Ok(())
    }

    #[test]
    fn rejects_wrong_input() -> Result<(), DnnError> {
        let extractor = PooledPatchExtractor::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            3,
            2,
        )?;
        let batch = ImageBatch::from_size_val(
            1,
            ImageSize {
                width: 4,
                height: 4,
            },
            1,
            0.0,
        );
        assert!(matches!(
            extractor.extract(&batch),
            Err(DnnError::InvalidInputShape {
                expected_channels: 3,
                actual_channels: 1,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn rejects_large_grid() {
        let size = ImageSize {
            width: 4,
            height: 2,
        };
        assert!(matches!(
            PooledPatchExtractor::new(size, 3, 3),
            Err(DnnError::InvalidConfig(_))
        ));
        assert!(PooledPatchExtractor::new(size, 3, 0).is_err());
    }

    #[test]
    fn normalize_default() -> Result<(), DnnError> {
        let extractor = PooledPatchExtractor::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            3,
            1,
        )?;
        assert_relative_eq!(extractor.normalize(0.0), -1.0);
        assert_relative_eq!(extractor.normalize(255.0), 1.0);
        assert_relative_eq!(extractor.normalize(127.5), 0.0);
        Ok(())
    }
}
