//! Module path resolution for declaration bundling.
//!
//! Canonical paths are `/`-separated, extensionless and relative to the
//! bundle root (the directory holding the entry file). They double as graph
//! keys, so everything here is a pure function of its arguments: no
//! filesystem access and no dependence on the process working directory.

use std::path::{Path, PathBuf};

/// Extensions stripped from relative references (`./b.js` and `./b` name one module).
pub const STRIPPED_EXTENSIONS: &[&str] = &[".d.ts", ".ts", ".js"];

/// Module name used when a reference names a directory.
pub const INDEX_MODULE: &str = "index";

/// True if the reference is relative to the referencing file.
pub fn is_relative(reference: &str) -> bool {
    reference.starts_with('.')
}

/// Resolve `reference` as written in the file at canonical path `referencing`.
///
/// Relative references are joined against the referencing file's directory
/// and normalized. Anything else is an external module name and comes back
/// untouched.
pub fn resolve(referencing: &str, reference: &str) -> String {
    if !is_relative(reference) {
        return reference.to_string();
    }

    let mut segments: Vec<&str> = referencing.split('/').filter(|s| !s.is_empty()).collect();
    // Drop the file name; what remains is its directory.
    segments.pop();

    let names_directory = reference.ends_with('/')
        || reference
            .rsplit('/')
            .next()
            .is_some_and(|last| last == "." || last == "..");

    let reference = strip_extension(reference);
    for segment in reference.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            name => segments.push(name),
        }
    }

    if names_directory || segments.is_empty() || segments.last() == Some(&"..") {
        segments.push(INDEX_MODULE);
    }

    segments.join("/")
}

fn strip_extension(reference: &str) -> &str {
    STRIPPED_EXTENSIONS
        .iter()
        .find_map(|ext| reference.strip_suffix(ext))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/') && !stem.ends_with('.'))
        .unwrap_or(reference)
}

/// Split an entry file path into the bundle root and the entry's canonical path.
///
/// `build/index.d.ts` → (`build`, `index`).
pub fn entry_module(entry_point: &Path) -> (PathBuf, String) {
    let root = entry_point
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let file_name = entry_point
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let module = STRIPPED_EXTENSIONS
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(&file_name)
        .to_string();
    (root, module)
}

// ============================================================================
// Namespace naming
// ============================================================================

/// Derive the pseudo-namespace name of a bundled file from its canonical path.
///
/// Each path segment becomes one `__`-prefixed namespace level with its
/// `-`-separated words capitalized: `utils/string-helpers` →
/// `__Utils.__StringHelpers`.
pub fn namespace_for_path(canonical: &str) -> String {
    canonical
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|segment| format!("__{}", segment_identifier(segment)))
        .collect::<Vec<_>>()
        .join(".")
}

fn segment_identifier(segment: &str) -> String {
    if segment == ".." {
        return "Parent".to_string();
    }
    segment
        .split('-')
        .map(capitalize_first)
        .collect::<String>()
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect()
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// True if `name` is a dot-separated list of identifiers usable as a namespace.
pub fn is_namespace_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                    chars.all(is_identifier_char)
                }
                _ => false,
            }
        })
}
