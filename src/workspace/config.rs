use std::time::Duration;

use crate::compile::CacheConfig;

/// Options for a [`Workspace`](super::Workspace).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceConfig {
    pub cache: CacheConfig,
    /// When opening a solution, read documents the store does not hold yet
    /// from disk. Off by default: hosts usually fill the store themselves.
    pub load_from_disk: bool,
}

impl WorkspaceConfig {
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.cache.build_timeout = timeout;
        self
    }

    pub fn with_load_from_disk(mut self, load: bool) -> Self {
        self.load_from_disk = load;
        self
    }
}
