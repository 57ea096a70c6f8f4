use rayon::prelude::*;

/// Controls how per-image operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool and process images in parallel.
    #[default]
    ParallelImages,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small batches and debugging.
    Serial,
}

/// Apply a function to each pair of (source image, destination image) chunks.
///
/// `src_stride` and `dst_stride` are the number of elements of one image in each buffer.
pub fn iter_images<F>(
    src: &[f32],
    src_stride: usize,
    dst: &mut [f32],
    dst_stride: usize,
    strategy: ExecutionStrategy,
    f: F,
) where
    F: Fn(&[f32], &mut [f32]) + Send + Sync,
{
    if src_stride == 0 || dst_stride == 0 {
        return;
    }

    match strategy {
        ExecutionStrategy::ParallelImages => {
            src.par_chunks_exact(src_stride)
                .zip(dst.par_chunks_exact_mut(dst_stride))
                .for_each(|(src_image, dst_image)| f(src_image, dst_image));
        }
        ExecutionStrategy::Serial => {
            src.chunks_exact(src_stride)
                .zip(dst.chunks_exact_mut(dst_stride))
                .for_each(|(src_image, dst_image)| f(src_image, dst_image));
        }
    }
}

/// Apply a function to each element of a buffer in place.
pub fn map_inplace<F>(data: &mut [f32], strategy: ExecutionStrategy, f: F)
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    match strategy {
        ExecutionStrategy::ParallelImages => data.par_iter_mut().for_each(|x| *x = f(*x)),
        ExecutionStrategy::Serial => data.iter_mut().for_each(|x| *x = f(*x)),
    }
}
