use std::ops;

use fidkit_tensor::Tensor4;

use crate::error::ImageError;

/// Image size in pixels
///
/// # Examples
///
/// ```
/// use fidkit_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

/// A batch of images stored as one `(N, H, W, C)` tensor of `f32`.
///
/// All images of a batch share the same size and number of channels. Pixel values are
/// expected in `[0, 1]` when the batch enters the FID pipeline; the range is checked by the
/// caller, not by the constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch(pub Tensor4<f32>);

/// helper to deference the inner tensor
impl ops::Deref for ImageBatch {
    type Target = Tensor4<f32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// helper to deference the inner tensor
impl ops::DerefMut for ImageBatch {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ImageBatch {
    /// Create a new image batch from pixel data laid out as `(N, H, W, C)`.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the batch shape, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use fidkit_image::{ImageBatch, ImageSize};
    ///
    /// let batch = ImageBatch::new(
    ///     2,
    ///     ImageSize { width: 4, height: 3 },
    ///     1,
    ///     vec![0.5f32; 2 * 4 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(batch.num_images(), 2);
    /// assert_eq!(batch.size().width, 4);
    /// assert_eq!(batch.num_channels(), 1);
    /// ```
    pub fn new(
        num_images: usize,
        size: ImageSize,
        num_channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, ImageError> {
        let expected = num_images * size.height * size.width * num_channels;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self(Tensor4::from_shape_vec(
            [num_images, size.height, size.width, num_channels],
            data,
        )?))
    }

    /// Create a new image batch filled with `val`.
    pub fn from_size_val(
        num_images: usize,
        size: ImageSize,
        num_channels: usize,
        val: f32,
    ) -> Self {
        Self(Tensor4::from_shape_val(
            [num_images, size.height, size.width, num_channels],
            val,
        ))
    }

    /// Create a new image batch from a shape given as a slice, as it arrives from a loader.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidRank`] if the shape does not have exactly 4 dimensions.
    pub fn from_shape_vec(shape: &[usize], data: Vec<f32>) -> Result<Self, ImageError> {
        let &[n, h, w, c] = shape else {
            return Err(ImageError::InvalidRank(shape.len()));
        };
        Self::new(n, ImageSize { width: w, height: h }, c, data)
    }

    /// Number of images in the batch.
    #[inline]
    pub fn num_images(&self) -> usize {
        self.shape[0]
    }

    /// Spatial size shared by all images.
    #[inline]
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.shape[2],
            height: self.shape[1],
        }
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.shape[3]
    }

    /// Borrow the whole batch as a view.
    pub fn as_view(&self) -> ImageBatchView<'_> {
        ImageBatchView {
            data: self.as_slice(),
            num_images: self.num_images(),
            size: self.size(),
            num_channels: self.num_channels(),
        }
    }

    /// Borrow `len` consecutive images starting at image `start`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::BatchOutOfBounds`] if the range exceeds the batch.
    pub fn view(&self, start: usize, len: usize) -> Result<ImageBatchView<'_>, ImageError> {
        let end = start + len;
        if end > self.num_images() {
            return Err(ImageError::BatchOutOfBounds {
                start,
                end,
                num_images: self.num_images(),
            });
        }

        let image_numel = self.image_numel();
        Ok(ImageBatchView {
            data: &self.as_slice()[start * image_numel..end * image_numel],
            num_images: len,
            size: self.size(),
            num_channels: self.num_channels(),
        })
    }

    /// Number of elements of a single image.
    #[inline]
    pub fn image_numel(&self) -> usize {
        self.shape[1] * self.shape[2] * self.shape[3]
    }
}

/// A borrowed, contiguous run of images from an [`ImageBatch`].
#[derive(Clone, Copy, Debug)]
pub struct ImageBatchView<'a> {
    data: &'a [f32],
    num_images: usize,
    size: ImageSize,
    num_channels: usize,
}

impl<'a> ImageBatchView<'a> {
    /// Number of images in the view.
    #[inline]
    pub fn num_images(&self) -> usize {
        self.num_images
    }

    /// Spatial size shared by all images.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Pixel data of the view in `(N, H, W, C)` order.
    #[inline]
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Number of elements of a single image.
    #[inline]
    pub fn image_numel(&self) -> usize {
        self.size.width * self.size.height * self.num_channels
    }

    /// Copy the viewed images into an owned batch.
    pub fn to_owned(&self) -> Result<ImageBatch, ImageError> {
        ImageBatch::new(
            self.num_images,
            self.size,
            self.num_channels,
            self.data.to_vec(),
        )
    }
}
