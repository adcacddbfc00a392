//! Bundling entry points.

use crate::emit::emit;
use crate::error::BundleError;
use crate::graph::{FileMap, GraphBuilder};
use crate::source::{FsSourceProvider, SourceProvider};
use globalize_path_resolve::{entry_module, is_namespace_name};
use globalize_syntax::{DeclarationReader, TYPESCRIPT_READER};
use std::collections::BTreeMap;
use std::path::Path;

/// Bundle the declaration file at `entry_point` and everything it imports
/// into one declaration file exposing `global_name`.
///
/// `externals` maps non-relative module names to the globals they are
/// available as (`"react"` → `"React"`).
pub fn bundle_typings(
    global_name: &str,
    entry_point: impl AsRef<Path>,
    externals: &BTreeMap<String, String>,
) -> Result<String, BundleError> {
    let (root, entry) = entry_module(entry_point.as_ref());
    let sources = FsSourceProvider::new(root);
    Bundler::new(&sources, global_name, externals).bundle(&entry)
}

/// Bundling over any [`SourceProvider`].
pub struct Bundler<'a, S: ?Sized> {
    sources: &'a S,
    reader: &'a dyn DeclarationReader,
    global_name: &'a str,
    externals: &'a BTreeMap<String, String>,
}

impl<'a, S: SourceProvider + ?Sized> Bundler<'a, S> {
    pub fn new(
        sources: &'a S,
        global_name: &'a str,
        externals: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            sources,
            reader: &TYPESCRIPT_READER,
            global_name,
            externals,
        }
    }

    pub fn with_reader(mut self, reader: &'a dyn DeclarationReader) -> Self {
        self.reader = reader;
        self
    }

    /// Discover and parse every module reachable from `entry`.
    pub fn graph(&self, entry: &str) -> Result<FileMap, BundleError> {
        if !is_namespace_name(self.global_name) {
            return Err(BundleError::InvalidGlobalName(self.global_name.to_string()));
        }
        GraphBuilder::new(self.sources, self.global_name, self.externals)
            .with_reader(self.reader)
            .build(entry)
    }

    /// Produce the bundled declaration text for `entry`.
    pub fn bundle(&self, entry: &str) -> Result<String, BundleError> {
        let files = self.graph(entry)?;
        tracing::debug!(entry, modules = files.len(), "graph built");
        emit(&files, entry, self.global_name, self.externals)
    }
}
