use rayon::prelude::*;

use crate::error::BlurError;

/// Image area at which [`ExecutionStrategy::Auto`] switches to parallel rows.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Controls how the image-level drivers distribute output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Parallel rows for large images, serial otherwise.
    #[default]
    Auto,

    /// Use the global Rayon thread pool to process rows in parallel.
    Parallel,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels is processed in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Serial => false,
        }
    }
}

/// Apply `op(row_index, row)` to every row of an interleaved buffer.
///
/// # Arguments
///
/// * `data` - The destination buffer.
/// * `row_len` - Elements per row, width times channels.
/// * `strategy` - The execution strategy.
/// * `op` - The per-row operation.
///
/// # Errors
///
/// Returns [`BlurError::ThreadPool`] if a [`ExecutionStrategy::Fixed`] pool cannot be
/// built.
pub fn for_each_row<T, F>(
    data: &mut [T],
    row_len: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), BlurError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return Ok(());
    }
    let rows = data.len() / row_len;

    match strategy {
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| BlurError::ThreadPool(e.to_string()))?;
            pool.install(|| {
                data.par_chunks_mut(row_len)
                    .enumerate()
                    .for_each(|(r, row)| op(r, row));
            });
        }
        s if s.is_parallel(rows * row_len) => {
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        }
        _ => {
            data.chunks_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rows(strategy: ExecutionStrategy) -> Result<Vec<usize>, BlurError> {
        let mut data = vec![0usize; 12];
        for_each_row(&mut data, 4, strategy, |r, row| {
            row.iter_mut().enumerate().for_each(|(c, v)| *v = r * 10 + c)
        })?;
        Ok(data)
    }

    #[test]
    fn strategies_agree() -> Result<(), BlurError> {
        let expected = vec![0, 1, 2, 3, 10, 11, 12, 13, 20, 21, 22, 23];
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::Parallel,
            ExecutionStrategy::Auto,
            ExecutionStrategy::Fixed(2),
        ] {
            assert_eq!(fill_rows(strategy)?, expected);
        }
        Ok(())
    }

    #[test]
    fn auto_threshold() {
        assert!(!ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_MIN_PIXELS - 1));
        assert!(ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_MIN_PIXELS));
        assert!(!ExecutionStrategy::Serial.is_parallel(usize::MAX));
    }
}
