//! Reader trait and errors for declaration syntax.

use crate::extract::FileFacts;

/// Error that can occur when reading a declaration file.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0} are not supported")]
    Unsupported(UnsupportedForm),

    #[error("expected exactly one `{kind}` node, found {found}")]
    AmbiguousNodeMatch { kind: &'static str, found: usize },

    #[error("malformed {0}")]
    Malformed(String),
}

/// Import/export forms that cannot be expressed as a namespace alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedForm {
    /// `export * from "./m"`
    ReExportAll,
    /// `export { a, b as c };`
    ExportWithoutSource,
}

impl std::fmt::Display for UnsupportedForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedForm::ReExportAll => f.write_str("`export * from ...` exports"),
            UnsupportedForm::ExportWithoutSource => {
                f.write_str("`export {name}` exports without a `from` clause")
            }
        }
    }
}

/// A reader turns declaration source text into import/export facts.
pub trait DeclarationReader: Send + Sync {
    /// Language identifier (e.g., "typescript").
    fn language(&self) -> &'static str;

    /// Extract every import, export and ambient marker of one file.
    fn read(&self, source: &str) -> Result<FileFacts, SyntaxError>;
}
