//! Dependency graph discovery.
//!
//! Starting from the entry module, every internal dependency is loaded,
//! parsed once and recorded in a [`FileMap`] keyed by canonical path. The
//! map's insertion order is discovery order.

use crate::error::BundleError;
use crate::source::SourceProvider;
use globalize_facts_core::{ExportFact, ImportFact, ModuleRef, TextSpans};
use globalize_path_resolve::{is_relative, namespace_for_path, resolve};
use globalize_syntax::{DeclarationReader, TYPESCRIPT_READER};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything known about one bundled module.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Unmodified source text; span offsets refer to it
    #[serde(skip)]
    pub contents: String,
    /// Global name for the entry module, derived name for the rest
    pub namespace_name: String,
    /// Canonical paths of internal dependencies, first reference first
    pub dependencies: IndexSet<String>,
    pub imports: Vec<ImportFact<ModuleRef>>,
    pub exports: Vec<ExportFact<ModuleRef>>,
    pub text_spans_to_delete: TextSpans,
}

/// Canonical path → record, in discovery order.
pub type FileMap = IndexMap<String, FileRecord>;

#[derive(Default)]
struct Discovered {
    files: FileMap,
    /// Namespace name → path that claimed it. The entry lives under the
    /// global name and claims nothing.
    namespaces: IndexMap<String, String>,
}

fn claim_namespace(
    path: &str,
    record: &FileRecord,
    namespaces: &mut IndexMap<String, String>,
) -> Result<(), BundleError> {
    match namespaces.entry(record.namespace_name.clone()) {
        Entry::Occupied(first) => Err(BundleError::NamespaceCollision {
            namespace: record.namespace_name.clone(),
            first: first.get().clone(),
            second: path.to_string(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(path.to_string());
            Ok(())
        }
    }
}

/// Walks the module graph depth-first from an entry module.
pub struct GraphBuilder<'a, S: ?Sized> {
    sources: &'a S,
    reader: &'a dyn DeclarationReader,
    global_name: &'a str,
    externals: &'a BTreeMap<String, String>,
}

impl<'a, S: SourceProvider + ?Sized> GraphBuilder<'a, S> {
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

    /// Use a different declaration reader.
    pub fn with_reader(mut self, reader: &'a dyn DeclarationReader) -> Self {
        self.reader = reader;
        self
    }

    /// Parse the entry module and everything it reaches.
    pub fn build(&self, entry: &str) -> Result<FileMap, BundleError> {
        let mut found = Discovered::default();
        let record = self.parse_file(entry, self.global_name.to_string())?;
        self.insert(entry, record, &mut found)?;
        Ok(found.files)
    }

    fn visit(&self, path: &str, found: &mut Discovered) -> Result<(), BundleError> {
        if found.files.contains_key(path) {
            return Ok(());
        }
        let record = self.parse_file(path, namespace_for_path(path))?;
        claim_namespace(path, &record, &mut found.namespaces)?;
        self.insert(path, record, found)
    }

    fn insert(
        &self,
        path: &str,
        record: FileRecord,
        found: &mut Discovered,
    ) -> Result<(), BundleError> {
        let dependencies: Vec<String> = record.dependencies.iter().cloned().collect();
        found.files.insert(path.to_string(), record);
        for dependency in dependencies {
            tracing::debug!(from = path, to = %dependency, "dependency");
            self.visit(&dependency, found)?;
        }
        Ok(())
    }

    fn parse_file(&self, path: &str, namespace_name: String) -> Result<FileRecord, BundleError> {
        let contents = self.sources.load(path)?;
        let facts = self
            .reader
            .read(&contents)
            .map_err(|err| BundleError::from_syntax(path, err))?;
        tracing::debug!(
            module = path,
            language = self.reader.language(),
            imports = facts.imports.len(),
            exports = facts.exports.len(),
            "parsed"
        );

        let mut dependencies = IndexSet::new();
        let imports = facts
            .imports
            .into_iter()
            .map(|import| {
                let module = self.module_ref(path, &import.import_path, &mut dependencies)?;
                Ok(import.map_path(|_| module))
            })
            .collect::<Result<Vec<_>, BundleError>>()?;
        let exports = facts
            .exports
            .into_iter()
            .map(|export| {
                let module = self.module_ref(path, &export.from_path, &mut dependencies)?;
                Ok(export.map_path(|_| module))
            })
            .collect::<Result<Vec<_>, BundleError>>()?;

        Ok(FileRecord {
            contents,
            namespace_name,
            dependencies,
            imports,
            exports,
            text_spans_to_delete: facts.spans,
        })
    }

    /// Resolve a reference made by `path`, recording internal ones as dependencies.
    fn module_ref(
        &self,
        path: &str,
        reference: &str,
        dependencies: &mut IndexSet<String>,
    ) -> Result<ModuleRef, BundleError> {
        if is_relative(reference) {
            let canonical = resolve(path, reference);
            dependencies.insert(canonical.clone());
            return Ok(ModuleRef::Internal(canonical));
        }
        if !self.externals.contains_key(reference) {
            return Err(BundleError::UndeclaredExternal {
                module: reference.to_string(),
                path: path.to_string(),
            });
        }
        Ok(ModuleRef::External(reference.to_string()))
    }
}
