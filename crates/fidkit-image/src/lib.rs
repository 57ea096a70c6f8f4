#![deny(missing_docs)]
//! Image batch types for the fidkit feature pipeline.
//!
//! An [`ImageBatch`] is a stack of equally sized images stored as a single
//! `(N, H, W, C)` tensor of `f32` values. A [`DynamicImageBatch`] carries data whose rank
//! and element type are only known at runtime and is converted into an [`ImageBatch`]
//! once both have been checked.

/// image batch representation.
pub mod batch;

/// runtime-typed image batches.
pub mod dynamic;

/// Error types for the image module.
pub mod error;

pub use crate::batch::{ImageBatch, ImageBatchView, ImageSize};
pub use crate::dynamic::{Dtype, DynamicImageBatch, PixelData};
pub use crate::error::ImageError;
