//! Rayon thread pool sizing for strategy scoring.
//!
//! Use [WorkerPool::install] to score candidates on a fixed number of threads,
//! or rely on Rayon's global pool (all CPU cores).

use rayon::ThreadPoolBuilder;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the global Rayon pool.
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run `f` on a pool of [workers](WorkerPool::workers) threads. Falls back to
    /// the global pool when `workers` is 0 or a dedicated pool cannot be built.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(workers = self.workers, %err, "could not build scoring pool; using global pool");
                f()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_pool_uses_requested_thread_count() {
        let threads = WorkerPool::with_workers(2).install(rayon::current_num_threads);
        assert_eq!(threads, 2);
    }

    #[test]
    fn zero_workers_runs_on_global_pool() {
        let threads = WorkerPool::default().install(rayon::current_num_threads);
        assert_eq!(threads, rayon::current_num_threads());
    }
}
