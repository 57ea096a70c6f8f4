use crate::dynamic::Dtype;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the batch shape.
    #[error("Data length ({0}) does not match the batch size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid.
    #[error("Invalid image size ({0}, {1}), expected ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the number of channels is not supported by an operation.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    /// Error when an operation needs pixel data but the batch is empty.
    #[error("Image data is not initialized")]
    ImageDataNotInitialized,

    /// Error when a runtime shape is not `(N, H, W, C)`.
    #[error("Invalid rank: expected a 4-D (N, H, W, C) batch, got {0} dimensions")]
    InvalidRank(usize),

    /// Error when the pixel element type is not the expected one.
    #[error("Invalid element type: expected {expected}, got {actual}")]
    InvalidDtype {
        /// The element type the operation requires.
        expected: Dtype,
        /// The element type that was provided.
        actual: Dtype,
    },

    /// Error when a sub-batch range exceeds the batch.
    #[error("Images {start}..{end} out of bounds for a batch of {num_images}")]
    BatchOutOfBounds {
        /// First requested image.
        start: usize,
        /// One past the last requested image.
        end: usize,
        /// Number of images in the batch.
        num_images: usize,
    },

    /// Error from the underlying tensor.
    #[error(transparent)]
    TensorError(#[from] fidkit_tensor::TensorError),
}
