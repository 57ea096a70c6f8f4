use crate::{batch::ImageBatch, error::ImageError};

/// Pixel element types a loader can hand over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dtype {
    /// 8-bit unsigned integer.
    U8,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Dtype::U8 => "u8",
            Dtype::F32 => "f32",
            Dtype::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// A homogeneous pixel buffer whose element type is known at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelData {
    /// 8-bit unsigned pixels.
    U8(Vec<u8>),
    /// 32-bit float pixels.
    F32(Vec<f32>),
    /// 64-bit float pixels.
    F64(Vec<f64>),
}

impl PixelData {
    /// Element type of the buffer.
    pub fn dtype(&self) -> Dtype {
        match self {
            PixelData::U8(_) => Dtype::U8,
            PixelData::F32(_) => Dtype::F32,
            PixelData::F64(_) => Dtype::F64,
        }
    }
}

impl From<Vec<u8>> for PixelData {
    fn from(v: Vec<u8>) -> Self {
        PixelData::U8(v)
    }
}

impl From<Vec<f32>> for PixelData {
    fn from(v: Vec<f32>) -> Self {
        PixelData::F32(v)
    }
}

impl From<Vec<f64>> for PixelData {
    fn from(v: Vec<f64>) -> Self {
        PixelData::F64(v)
    }
}

/// An image batch whose rank and element type are only known at runtime.
///
/// This is the shape data takes when it comes from a decoder or an array exchanged with
/// another runtime. [`DynamicImageBatch::into_image_batch`] checks that it is a 4-D `f32`
/// batch before any processing happens.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicImageBatch {
    /// Shape of the data, expected to be `(N, H, W, C)`.
    pub shape: Vec<usize>,
    /// Pixel buffer in row-major order.
    pub data: PixelData,
}

impl DynamicImageBatch {
    /// Create a new runtime-typed batch.
    pub fn new(shape: Vec<usize>, data: impl Into<PixelData>) -> Self {
        Self {
            shape,
            data: data.into(),
        }
    }

    /// Number of dimensions of the shape.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Element type of the pixel buffer.
    ///
    /// The buffer is homogeneous, so the type of any one element is the type of all of them.
    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }

    /// Check the rank and the element type without converting.
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidRank`] when the shape is not 4-D, [`ImageError::InvalidDtype`]
    /// when the pixels are not `f32`.
    pub fn check(&self) -> Result<(), ImageError> {
        if self.rank() != 4 {
            return Err(ImageError::InvalidRank(self.rank()));
        }
        if self.dtype() != Dtype::F32 {
            return Err(ImageError::InvalidDtype {
                expected: Dtype::F32,
                actual: self.dtype(),
            });
        }
        Ok(())
    }

    /// Convert into a typed [`ImageBatch`].
    ///
    /// # Errors
    ///
    /// Same as [`DynamicImageBatch::check`], plus a length mismatch between shape and data.
    pub fn into_image_batch(self) -> Result<ImageBatch, ImageError> {
        self.check()?;
        match self.data {
            PixelData::F32(data) => ImageBatch::from_shape_vec(&self.shape, data),
            other => Err(ImageError::InvalidDtype {
                expected: Dtype::F32,
                actual: other.dtype(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_f32_converts() -> Result<(), ImageError> {
        let dynamic = DynamicImageBatch::new(vec![2, 2, 2, 1], vec![0.25f32; 8]);
        assert_eq!(dynamic.dtype(), Dtype::F32);
        let batch = dynamic.into_image_batch()?;
        assert_eq!(batch.num_images(), 2);
        Ok(())
    }

    #[test]
    fn dynamic_wrong_rank() {
        let dynamic = DynamicImageBatch::new(vec![4, 2], vec![0.0f32; 8]);
        assert_eq!(dynamic.check(), Err(ImageError::InvalidRank(2)));
    }

    #[test]
    fn dynamic_wrong_dtype() {
        let dynamic = DynamicImageBatch::new(vec![1, 2, 2, 1], vec![0u8; 4]);
        assert_eq!(
            dynamic.into_image_batch(),
            Err(ImageError::InvalidDtype {
                expected: Dtype::F32,
                actual: Dtype::U8
            })
        );

        let dynamic = DynamicImageBatch::new(vec![1, 2, 2, 1], vec![0f64; 4]);
        assert!(matches!(
            dynamic.check(),
            Err(ImageError::InvalidDtype { actual: Dtype::F64, .. })
        ));
    }

    #[test]
    fn dynamic_wrong_len() {
        let dynamic = DynamicImageBatch::new(vec![1, 2, 2, 1], vec![0f32; 3]);
        assert_eq!(
            dynamic.into_image_batch(),
            Err(ImageError::InvalidChannelShape(3, 4))
        );
    }
}
