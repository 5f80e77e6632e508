//! Compilation snapshots and the cache that builds them.
//!
//! A [`CompilationSnapshot`] is immutable. The [`CompilationCache`] keeps one
//! live snapshot per project and rebuilds only when the digest of the
//! project's document closure changes.

mod cache;
mod config;
mod snapshot;

pub use cache::{CacheStats, CompilationCache};
pub use config::CacheConfig;
pub use snapshot::{CompilationSnapshot, ParsedDocument};
