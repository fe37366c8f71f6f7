//! Worker pool for per-mesh extraction jobs.
//!
//! Thin wrapper over a dedicated `rayon` pool. Work submitted through
//! [`WorkerPool::install`] blocks the caller until every job has finished;
//! there is no polling of job handles.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::util::{Error, Result};

/// Dedicated rayon pool, or the global one when no thread count is configured.
pub struct WorkerPool {
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// Create a pool with `threads` workers; 0 uses rayon's global pool.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Ok(Self::global());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("photon-worker-{i}"))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    /// Use rayon's global pool.
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Number of worker threads jobs will be spread over.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Run `op` inside the pool and wait for it.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::global()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("dedicated", &self.pool.is_some())
            .field("threads", &self.threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_dedicated_pool() {
        let pool = WorkerPool::new(2).unwrap();
        assert_eq!(pool.threads(), 2);
        let sum: u64 = pool.install(|| (0..1000u64).into_par_iter().sum());
        assert_eq!(sum, 499_500);
    }

    #[test]
    fn test_global_pool() {
        let pool = WorkerPool::new(0).unwrap();
        assert!(pool.threads() >= 1);
        assert_eq!(pool.install(|| 7), 7);
    }
}
