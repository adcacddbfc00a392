//! Import/export extraction for TypeScript declaration files.
//!
//! A declaration file is parsed with tree-sitter and reduced to three things:
//!
//! - [`ImportFact`]s, one per imported binding
//! - [`ExportFact`]s, one per re-exported binding
//! - the [`TextSpans`] of every import statement, export declaration and
//!   ambient `declare` keyword, which the bundler cuts out of the file body
//!
//! # Example
//!
//! ```ignore
//! use globalize_syntax::extract_file_facts;
//!
//! let facts = extract_file_facts("import * as B from \"./b\";\ndeclare const x: B.T;\n")?;
//! assert_eq!(facts.imports[0].local_name, "B");
//! assert_eq!(facts.spans.delete_from(source), "const x: B.T;\n");
//! ```

pub mod extract;
pub mod nodes;
pub mod statement;
pub mod traits;

pub use extract::{FileFacts, extract_export, extract_file_facts, extract_import};
pub use statement::{DeclarationFile, Statement};
pub use traits::{DeclarationReader, SyntaxError, UnsupportedForm};

pub use globalize_facts_core::{ExportFact, ImportFact, TextSpan, TextSpans};

/// Static instance of the TypeScript declaration reader.
pub static TYPESCRIPT_READER: TypeScriptReader = TypeScriptReader;

/// Declaration reader for `.d.ts` files.
pub struct TypeScriptReader;

impl DeclarationReader for TypeScriptReader {
    fn language(&self) -> &'static str {
        "typescript"
    }

    fn read(&self, source: &str) -> Result<FileFacts, SyntaxError> {
        extract_file_facts(source)
    }
}
