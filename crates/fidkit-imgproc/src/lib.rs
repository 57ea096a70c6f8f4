#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// channel conversion module.
pub mod color;

/// utilities for interpolation.
pub mod interpolation;

/// operations to normalize images.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing image batches.
pub mod resize;
