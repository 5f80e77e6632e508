//! Document values handed out by the store

use std::path::Path;
use std::sync::Arc;

/// One version of a source document.
///
/// Cloning is cheap: path and text are shared. A `Document` never changes
/// after it leaves the store; a later edit produces a new value with a
/// higher version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: Arc<Path>,
    text: Arc<str>,
    version: u64,
}

impl Document {
    pub(crate) fn new(path: Arc<Path>, text: Arc<str>, version: u64) -> Self {
        Self {
            path,
            text,
            version,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared handle to the path, for values that outlive the document.
    pub fn path_arc(&self) -> Arc<Path> {
        Arc::clone(&self.path)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
