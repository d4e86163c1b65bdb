use rayon::prelude::*;
use thiserror::Error;

use pixlab_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the independent operations passed to [`join_with`] are scheduled.
///
/// The strategy only covers the joined operations themselves. Kernels running inside
/// them keep their own row parallelism on the current Rayon pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run the joined operations one after the other on the calling thread.
    ///
    /// Row-parallel kernels inside each operation still use the global Rayon pool.
    /// Useful for debugging or reproducible profiling of a single operation.
    Serial,

    /// Use the global Rayon thread pool.
    #[default]
    Parallel,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// The strategy to use for work spawned from inside an operation already running
    /// under `self`.
    ///
    /// A fixed pool is entered once; nested joins reuse it through the current pool.
    pub fn nested(self) -> Self {
        match self {
            ExecutionStrategy::Serial => ExecutionStrategy::Serial,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => {
                ExecutionStrategy::Parallel
            }
        }
    }
}

/// Run two independent closures according to the execution strategy.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `oper_a` - The first operation.
/// * `oper_b` - The second operation.
///
/// # Returns
///
/// The results of both operations, in argument order.
///
/// # Errors
///
/// Returns an error if a fixed-size pool is requested with zero threads or cannot be
/// built.
pub fn join_with<A, B, RA, RB>(
    strategy: ExecutionStrategy,
    oper_a: A,
    oper_b: B,
) -> Result<(RA, RB), ParallelError>
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    match strategy {
        ExecutionStrategy::Serial => Ok((oper_a(), oper_b())),
        ExecutionStrategy::Parallel => Ok(rayon::join(oper_a, oper_b)),
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            Ok(pool.install(|| rayon::join(oper_a, oper_b)))
        }
    }
}

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel value in the image in parallel.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each destination pixel in parallel, passing its (x, y) coordinates.
///
/// Used by the geometric warps, where every output pixel is sampled from a source
/// position derived from its own coordinates.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, dst_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, dst_pixel)| {
                    f(x, y, dst_pixel);
                });
        });
}
