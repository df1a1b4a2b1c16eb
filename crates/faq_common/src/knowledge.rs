//! Knowledge document loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Text used when the knowledge file cannot be read
pub const UNAVAILABLE_TEXT: &str = "College information is currently unavailable.";

/// The plain-text document every answer must be grounded in
#[derive(Debug, Clone)]
pub struct KnowledgeDocument {
    text: Arc<str>,
    source: Option<PathBuf>,
}

impl KnowledgeDocument {
    /// Read `path`. A missing or unreadable file yields the placeholder
    /// text so the assistant still starts.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                info!(path = %path.display(), chars = content.chars().count(), "knowledge loaded");
                Self {
                    text: Arc::from(content),
                    source: Some(path.to_path_buf()),
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "knowledge file unavailable, using placeholder");
                Self::placeholder()
            }
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Arc::from(text.into()),
            source: None,
        }
    }

    pub fn placeholder() -> Self {
        Self::from_text(UNAVAILABLE_TEXT)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle for the gate
    pub fn shared(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// File the text came from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.source.is_none() && &*self.text == UNAVAILABLE_TEXT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.txt");
        fs::write(&path, "BIS fees: 3650 EGP").unwrap();

        let doc = KnowledgeDocument::load(&path);
        assert_eq!(doc.text(), "BIS fees: 3650 EGP");
        assert_eq!(doc.source(), Some(path.as_path()));
        assert!(!doc.is_placeholder());
    }

    #[test]
    fn test_missing_file_uses_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let doc = KnowledgeDocument::load(&dir.path().join("missing.txt"));
        assert_eq!(doc.text(), UNAVAILABLE_TEXT);
        assert!(doc.is_placeholder());
        assert!(doc.source().is_none());
    }

    #[test]
    fn test_shared_points_at_same_text() {
        let doc = KnowledgeDocument::from_text("x");
        let a = doc.shared();
        let b = doc.shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
