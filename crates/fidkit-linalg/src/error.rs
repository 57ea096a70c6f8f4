/// An error type for the linalg module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LinalgError {
    /// The unbiased covariance needs at least two observations.
    #[error("At least 2 observations are required, got {0}")]
    NotEnoughSamples(usize),

    /// Two operands do not have the same dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// The matrix is not square.
    #[error("Matrix of shape ({0}, {1}) is not square")]
    NotSquare(usize, usize),

    /// A NaN or infinite value reached the computation.
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}
