//! Source documents and their versions.
//!
//! [`SourceDocumentStore`] is the single owner of document text. Every write
//! bumps the path's version; the compilation cache fingerprints those
//! versions to decide when a snapshot is stale.

mod document;
mod store;

pub use document::Document;
pub use store::SourceDocumentStore;
