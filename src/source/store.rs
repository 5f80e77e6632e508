use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Document;
use crate::error::{Result, WorkspaceError};

#[derive(Debug, Default)]
struct StoreInner {
    documents: FxHashMap<PathBuf, Document>,
    /// Last version handed out for evicted paths, so a re-added path keeps
    /// counting upwards.
    retired: FxHashMap<PathBuf, u64>,
}

/// Owns the text of every document in a session.
///
/// Reads take a shared lock, writes an exclusive one; a `put_document` is
/// visible to every reader as soon as it returns.
#[derive(Debug, Default)]
pub struct SourceDocumentStore {
    inner: RwLock<StoreInner>,
}

impl SourceDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_document(&self, path: &Path) -> Result<Document> {
        self.inner
            .read()
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| WorkspaceError::document_not_found(path))
    }

    /// Stores new text for `path` and returns its version.
    ///
    /// The first write of a path yields version 1; every later write yields
    /// a strictly greater version, even across [`evict`](Self::evict).
    pub fn put_document(&self, path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> u64 {
        let path = path.into();
        let text = text.into();
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let previous = match inner.documents.get(&path) {
            Some(doc) => doc.version(),
            None => inner.retired.remove(&path).unwrap_or(0),
        };
        let version = previous + 1;

        tracing::trace!(path = %path.display(), version, "document updated");
        let document = Document::new(Arc::from(path.as_path()), text, version);
        inner.documents.insert(path, document);
        version
    }

    pub fn current_version(&self, path: &Path) -> Result<u64> {
        self.inner
            .read()
            .documents
            .get(path)
            .map(Document::version)
            .ok_or_else(|| WorkspaceError::document_not_found(path))
    }

    /// Drops a document from the session. Returns `false` if it was not present.
    pub fn evict(&self, path: &Path) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        match inner.documents.remove(path) {
            Some(doc) => {
                inner.retired.insert(path.to_path_buf(), doc.version());
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.inner.read().documents.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.inner.read().documents.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Reads several documents under one lock, so the result reflects a
    /// single point in time. Fails on the first missing path.
    pub fn capture<'a, I>(&self, paths: I) -> Result<Vec<Document>>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let inner = self.inner.read();
        paths
            .into_iter()
            .map(|path| {
                inner
                    .documents
                    .get(path)
                    .cloned()
                    .ok_or_else(|| WorkspaceError::document_not_found(path))
            })
            .collect()
    }
}
