#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `fidkit-tensor` provides the owned, contiguous, row-major [`Tensor`] used by the rest of
//! the workspace: image batches are stored as [`Tensor4`] with shape `(N, H, W, C)` and
//! feature matrices as [`Tensor2`] with shape `(N, D)`.
//!
//! ```rust
//! use fidkit_tensor::Tensor2;
//!
//! let tensor = Tensor2::<f32>::from_shape_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(tensor.rows(), 2);
//! assert_eq!(tensor.row_iter().nth(1), Some(&[4.0, 5.0, 6.0][..]));
//! ```

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;
