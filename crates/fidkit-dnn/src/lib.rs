#![deny(missing_docs)]
//! # fidkit DNN
//!
//! Feature extractors mapping image batches to pooled embeddings.

/// Error type for the dnn module.
pub mod error;

/// The feature extractor interface.
pub mod extractor;

/// A weight-free extractor for tests and quick checks.
pub mod pooled;

/// The InceptionV3 extractor backed by the onnx runtime.
#[cfg(feature = "ort")]
pub mod inception;

pub use crate::error::DnnError;
pub use crate::extractor::{check_input, FeatureExtractor};
pub use crate::pooled::PooledPatchExtractor;

#[cfg(feature = "ort")]
pub use crate::inception::{InceptionV3, InceptionV3Builder, InputLayout};
