#![deny(missing_docs)]
//! # fidkit
//!
//! Frechet Inception Distance (FID) between two sets of images.
//!
//! Both sets are validated, mapped to the input distribution of a feature extractor,
//! resized to its input size and embedded batch by batch. A Gaussian is fitted to each set
//! of embeddings and the closed-form Frechet distance between the two Gaussians is the
//! result.
//!
//! Two numeric backends are available, see [`Backend`].

/// Batched feature extraction over two image sets.
pub mod accumulator;

mod backend;

/// Configuration of the calculator.
pub mod config;

/// Error types for the fid module.
pub mod error;

/// The Gaussian fit and the closed-form distance.
pub mod frechet;

/// Input validation and per-batch image preparation.
pub mod preprocess;

mod calculator;

pub use crate::calculator::FidCalculator;
pub use crate::config::{Backend, FidConfig};
pub use crate::error::{FidError, ShapeError, ValidationError};
pub use crate::frechet::{FrechetTerms, GaussianStats};

#[doc(inline)]
pub use fidkit_dnn as dnn;

#[doc(inline)]
pub use fidkit_image as image;

#[doc(inline)]
pub use fidkit_imgproc as imgproc;

#[doc(inline)]
pub use fidkit_linalg as linalg;

#[doc(inline)]
pub use fidkit_tensor as tensor;
