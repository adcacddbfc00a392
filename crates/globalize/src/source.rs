//! Where declaration text comes from.

use crate::error::BundleError;
use std::collections::HashMap;
use std::path::PathBuf;

/// Loads the text of a module by canonical path.
pub trait SourceProvider {
    fn load(&self, canonical_path: &str) -> Result<String, BundleError>;
}

impl<T: SourceProvider + ?Sized> SourceProvider for &T {
    fn load(&self, canonical_path: &str) -> Result<String, BundleError> {
        (**self).load(canonical_path)
    }
}

/// Reads `<root>/<path>.d.ts`.
///
/// Directory imports reach this point already resolved to `dir/index`.
#[derive(Debug, Clone)]
pub struct FsSourceProvider {
    root: PathBuf,
}

impl FsSourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn file_path(&self, canonical_path: &str) -> PathBuf {
        self.root.join(format!("{canonical_path}.d.ts"))
    }
}

impl SourceProvider for FsSourceProvider {
    fn load(&self, canonical_path: &str) -> Result<String, BundleError> {
        let file = self.file_path(canonical_path);
        match std::fs::read_to_string(&file) {
            Ok(text) => {
                tracing::debug!(module = canonical_path, file = %file.display(), "loaded");
                Ok(text)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(BundleError::SourceUnavailable {
                    path: canonical_path.to_string(),
                    tried: vec![file],
                })
            }
            Err(source) => Err(BundleError::Io { path: file, source }),
        }
    }
}

/// Declaration text held in memory, keyed by canonical path.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceProvider {
    files: HashMap<String, String>,
}

impl MemorySourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, builder style.
    pub fn with(mut self, canonical_path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(canonical_path, text);
        self
    }

    pub fn insert(&mut self, canonical_path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(canonical_path.into(), text.into());
    }
}

impl SourceProvider for MemorySourceProvider {
    fn load(&self, canonical_path: &str) -> Result<String, BundleError> {
        self.files
            .get(canonical_path)
            .cloned()
            .ok_or_else(|| BundleError::SourceUnavailable {
                path: canonical_path.to_string(),
                tried: vec![PathBuf::from(canonical_path)],
            })
    }
}
