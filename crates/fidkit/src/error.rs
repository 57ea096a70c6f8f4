use fidkit_image::Dtype;

/// An input image batch violates the value contract.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    /// The batch is not 4-D.
    #[error("Expected a 4-D (N, H, W, C) batch, got {0} dimensions")]
    InvalidRank(usize),

    /// The pixels are not single precision floats.
    #[error("Expected {expected} pixels, got {actual}")]
    InvalidDtype {
        /// Required element type.
        expected: Dtype,
        /// Provided element type.
        actual: Dtype,
    },

    /// A pixel lies outside `[0, 1]`.
    #[error("Pixel values must lie in [0, 1], got range [{min}, {max}]")]
    OutOfRange {
        /// Smallest pixel value.
        min: f32,
        /// Largest pixel value.
        max: f32,
    },

    /// A pixel is NaN or infinite.
    #[error("Non-finite pixel value at offset {0}")]
    NonFinite(usize),

    /// The batch holds no pixels.
    #[error("The image batch is empty")]
    Empty,
}

/// The two image sets do not fit together or do not fit the extractor.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ShapeError {
    /// The two sets have different channel counts.
    #[error("Channel mismatch between the image sets: {0} vs {1}")]
    ChannelMismatch(usize, usize),

    /// Only gray and RGB images are supported.
    #[error("Unsupported number of channels {0}, expected 1 or 3")]
    UnsupportedChannels(usize),

    /// The two sets have different numbers of images.
    #[error("Image count mismatch between the image sets: {0} vs {1}")]
    ImageCountMismatch(usize, usize),

    /// Not a single full batch fits in the set.
    #[error("{num_images} images do not fill a single batch of {batch_size}")]
    NotEnoughImages {
        /// Number of images per set.
        num_images: usize,
        /// Configured batch size.
        batch_size: usize,
    },

    /// The extractor returned a feature matrix of the wrong shape.
    #[error("Expected features of shape [{expected_rows}, {expected_cols}], got {actual:?}")]
    FeatureShape {
        /// Images in the batch.
        expected_rows: usize,
        /// Embedding dimension of the extractor.
        expected_cols: usize,
        /// Shape returned by the extractor.
        actual: [usize; 2],
    },
}

/// An error type for the fid module.
#[derive(thiserror::Error, Debug)]
pub enum FidError {
    /// Invalid input values.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Incompatible input shapes.
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The requested operation exists but is not implemented.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Error from the image module.
    #[error(transparent)]
    Image(#[from] fidkit_image::ImageError),

    /// Error from the tensor module.
    #[error(transparent)]
    Tensor(#[from] fidkit_tensor::TensorError),

    /// Error from the linalg module.
    #[error(transparent)]
    Linalg(#[from] fidkit_linalg::LinalgError),

    /// Error from the feature extractor.
    #[error(transparent)]
    Dnn(#[from] fidkit_dnn::DnnError),
}
