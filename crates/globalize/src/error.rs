//! Errors raised while bundling.

use globalize_syntax::{SyntaxError, UnsupportedForm};
use std::path::PathBuf;

/// Every way a bundle can fail. All of them are fatal: no partial output.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("{path}: {form} are not supported")]
    UnsupportedSyntax {
        path: String,
        form: UnsupportedForm,
    },

    #[error("must define an external identifier for module \"{module}\" (referenced from {path})")]
    UndeclaredExternal { module: String, path: String },

    #[error("{path}: expected exactly one `{kind}` node, found {found}")]
    AmbiguousNodeMatch {
        path: String,
        kind: &'static str,
        found: usize,
    },

    #[error("{path}: cannot alias `{local}` to its own namespace `{}`", qualified(.namespace, .property))]
    SelfReferentialAlias {
        path: String,
        local: String,
        namespace: String,
        property: Option<String>,
    },

    #[error("module `{path}` not found (tried {})", display_paths(.tried))]
    SourceUnavailable { path: String, tried: Vec<PathBuf> },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: {message}")]
    Parse { path: String, message: String },

    #[error("circular dependency: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    #[error("modules `{first}` and `{second}` both map to namespace `{namespace}`")]
    NamespaceCollision {
        namespace: String,
        first: String,
        second: String,
    },

    #[error("no parsed record for module `{path}`")]
    MissingRecord { path: String },

    #[error("invalid global name `{0}`: expected dot-separated identifiers")]
    InvalidGlobalName(String),
}

impl BundleError {
    /// Attach the failing file to a syntax error.
    pub fn from_syntax(path: &str, err: SyntaxError) -> Self {
        let path = path.to_string();
        match err {
            SyntaxError::Unsupported(form) => BundleError::UnsupportedSyntax { path, form },
            SyntaxError::AmbiguousNodeMatch { kind, found } => {
                BundleError::AmbiguousNodeMatch { path, kind, found }
            }
            SyntaxError::Parse(message) => BundleError::Parse { path, message },
            err @ SyntaxError::Malformed(_) => BundleError::Parse {
                path,
                message: err.to_string(),
            },
        }
    }
}

fn qualified(namespace: &str, property: &Option<String>) -> String {
    match property {
        Some(property) => format!("{namespace}.{property}"),
        None => namespace.to_string(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
