use fidkit_image::ImageSize;

/// An error type for the dnn module.
#[derive(thiserror::Error, Debug)]
pub enum DnnError {
    /// Error from the onnx runtime.
    #[cfg(feature = "ort")]
    #[error("Failed to run the onnx runtime")]
    OrtError(#[from] ort::Error),

    /// The ORT dylib could not be located.
    #[error("Failed to locate the ORT dylib: {0}")]
    OrtDylibError(String),

    /// Error from the image module.
    #[error("Image error")]
    ImageError(#[from] fidkit_image::ImageError),

    /// Error from the tensor module.
    #[error("Tensor error")]
    TensorError(#[from] fidkit_tensor::TensorError),

    /// The batch does not have the size or channels the extractor expects.
    #[error(
        "Invalid input: expected {expected_size} with {expected_channels} channels, \
         got {actual_size} with {actual_channels} channels"
    )]
    InvalidInputShape {
        /// Size expected by the extractor.
        expected_size: ImageSize,
        /// Channels expected by the extractor.
        expected_channels: usize,
        /// Size of the batch.
        actual_size: ImageSize,
        /// Channels of the batch.
        actual_channels: usize,
    },

    /// The model produced an output that is not one embedding per image.
    #[error("Invalid output shape {shape:?} for {num_images} images of dimension {embedding_dim}")]
    InvalidOutputShape {
        /// Shape reported by the model.
        shape: Vec<i64>,
        /// Number of images in the batch.
        num_images: usize,
        /// Expected embedding dimension.
        embedding_dim: usize,
    },

    /// The extractor was configured with invalid parameters.
    #[error("Invalid extractor configuration: {0}")]
    InvalidConfig(String),
}
