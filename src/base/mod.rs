//! Foundation types for quarry.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column locations
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`Digest`], [`DigestBuilder`] - Content fingerprints for cache keys
//!
//! This module has NO dependencies on other quarry modules.

mod digest;
mod line_index;
mod position;

pub use digest::{Digest, DigestBuilder};
pub use line_index::{LineIndex, text_offset};
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
