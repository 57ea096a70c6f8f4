#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! All computations are carried out in `f64` on [`faer::Mat`] matrices. Feature matrices
//! come in as `f32` [`fidkit_tensor::Tensor2`] with one observation per row.

/// Error types for the linalg module.
pub mod error;

/// small matrix helpers.
pub mod ops;

/// principal square roots of positive semi-definite matrices.
pub mod sqrtm;

/// mean and covariance of observation matrices.
pub mod stats;

pub use crate::error::LinalgError;
pub use faer::Parallelism;
