//! Compilation cache options

use std::time::Duration;

/// Options for the [`CompilationCache`](super::CompilationCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a caller waits for a build before giving up with
    /// `BuildTimeout`. The build itself keeps running.
    pub build_timeout: Duration,
    /// Parse the documents of a project in parallel instead of one by one
    pub parallel_parse: bool,
    /// Threads in the cache's build pool. 0 lets rayon pick (one per CPU).
    pub build_threads: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            build_timeout: Duration::from_secs(30),
            parallel_parse: true,
            build_threads: 0,
        }
    }
}

impl CacheConfig {
    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    pub fn with_parallel_parse(mut self, parallel: bool) -> Self {
        self.parallel_parse = parallel;
        self
    }

    pub fn with_build_threads(mut self, threads: usize) -> Self {
        self.build_threads = threads;
        self
    }
}
