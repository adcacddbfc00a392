//! Declaration-statement extraction.
//!
//! Turns import statements, export declarations and ambient `declare`
//! keywords into facts plus the byte spans the bundler deletes from the
//! file body. Extraction is pure: the tree is only read.

use crate::nodes::{
    child_of_kind, children_of_kind, descendants_of_kind, find_single, has_descendant, node_text,
    unquoted_text,
};
use crate::statement::{DeclarationFile, Statement};
use crate::traits::{SyntaxError, UnsupportedForm};
use globalize_facts_core::{ExportFact, ImportFact, TextSpan, TextSpans};
use tree_sitter::Node;

/// Everything the bundler needs from one file.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    pub imports: Vec<ImportFact>,
    pub exports: Vec<ExportFact>,
    /// Import statements, export declarations and ambient markers
    pub spans: TextSpans,
}

/// Parse `source` and extract its facts.
pub fn extract_file_facts(source: &str) -> Result<FileFacts, SyntaxError> {
    let file = DeclarationFile::parse(source)?;
    extract_from(&file)
}

/// Extract facts from an already parsed file.
pub fn extract_from(file: &DeclarationFile<'_>) -> Result<FileFacts, SyntaxError> {
    let source = file.source();
    let mut facts = FileFacts::default();
    let mut spans = Vec::new();

    for statement in file.statements() {
        match statement {
            Statement::Import(node) => {
                ensure_parsed(node, source)?;
                facts.imports.extend(extract_import(node, source)?);
                spans.push(statement_span(node, source));
            }
            Statement::Export(node) => {
                ensure_parsed(node, source)?;
                facts.exports.extend(extract_export(node, source)?);
                spans.push(statement_span(node, source));
            }
            Statement::AmbientMarker(node) => spans.push(keyword_span(node, source)),
            Statement::Other(_) => {}
        }
    }

    if file.has_error() {
        ensure_module_syntax_recovered(file)?;
        if let Some(error) = first_error(file.root()) {
            let text = node_text(error, source);
            tracing::warn!(
                start = error.start_byte(),
                end = error.end_byte(),
                "syntax error outside import/export statements in `{}`",
                text.lines().next().unwrap_or(text)
            );
        }
    }

    facts.spans = TextSpans::from_unsorted(spans);
    Ok(facts)
}

fn ensure_parsed(node: Node<'_>, source: &str) -> Result<(), SyntaxError> {
    if node.has_error() {
        let text = node_text(node, source);
        let first_line = text.lines().next().unwrap_or(text);
        return Err(SyntaxError::Parse(format!("syntax error in `{first_line}`")));
    }
    Ok(())
}

/// Error recovery sometimes swallows a broken import or export into an
/// `ERROR` node instead of a statement node.
fn ensure_module_syntax_recovered(file: &DeclarationFile<'_>) -> Result<(), SyntaxError> {
    let root = file.root();
    let mut errors = descendants_of_kind(root, "ERROR");
    if root.kind() == "ERROR" {
        errors.insert(0, root);
    }
    for error in errors {
        let text = node_text(error, file.source()).trim_start();
        if text.starts_with("import") || text.starts_with("export") {
            return ensure_parsed(error, file.source());
        }
    }
    Ok(())
}

/// The first `ERROR` or missing node in source order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

// ============================================================================
// Imports
// ============================================================================

/// Extract facts from one `import_statement` node.
///
/// - `import * as X from "m"` → one whole-module fact
/// - `import { a, b as c } from "m"` → one fact per binding
/// - `import D from "m"` → one fact with property `default`
/// - `import X = require("m")` → one whole-module fact
/// - `import "m"` → nothing
pub fn extract_import(node: Node<'_>, source: &str) -> Result<Vec<ImportFact>, SyntaxError> {
    let start_position = node.start_byte();
    let fact = |local_name: String, property_name: Option<String>, import_path: &str| ImportFact {
        local_name,
        property_name,
        import_path: import_path.to_string(),
        start_position,
    };

    if let Some(require) = child_of_kind(node, "import_require_clause") {
        let local = child_of_kind(require, "identifier")
            .ok_or_else(|| SyntaxError::Malformed("import-require clause without a name".into()))?;
        let module = require
            .child_by_field_name("source")
            .or_else(|| child_of_kind(require, "string"))
            .ok_or_else(|| SyntaxError::Malformed("import-require clause without a module".into()))?;
        return Ok(vec![fact(
            node_text(local, source).to_string(),
            None,
            &unquoted_text(module, source),
        )]);
    }

    let module = node
        .child_by_field_name("source")
        .ok_or_else(|| SyntaxError::Malformed("import statement without a module".into()))?;
    let import_path = unquoted_text(module, source);

    if !has_descendant(node, "import_clause") {
        return Ok(Vec::new());
    }
    let clause = find_single(node, "import_clause")?;

    let mut imports = Vec::new();

    // import Default, ... from "m"
    for default in children_of_kind(clause, "identifier") {
        imports.push(fact(
            node_text(default, source).to_string(),
            Some("default".to_string()),
            &import_path,
        ));
    }

    if has_descendant(clause, "namespace_import") {
        // import * as Foo from "m"
        let namespace_import = find_single(clause, "namespace_import")?;
        let name = child_of_kind(namespace_import, "identifier")
            .ok_or_else(|| SyntaxError::Malformed("namespace import without a name".into()))?;
        imports.push(fact(node_text(name, source).to_string(), None, &import_path));
    } else if has_descendant(clause, "named_imports") {
        // import { foo, bar as car } from "m"
        let named = find_single(clause, "named_imports")?;
        for specifier in descendants_of_kind(named, "import_specifier") {
            let name = specifier
                .child_by_field_name("name")
                .ok_or_else(|| SyntaxError::Malformed("import specifier without a name".into()))?;
            let property_name = unquoted_text(name, source);
            let local_name = specifier
                .child_by_field_name("alias")
                .map(|alias| node_text(alias, source).to_string())
                .unwrap_or_else(|| property_name.clone());
            imports.push(fact(local_name, Some(property_name), &import_path));
        }
    }

    Ok(imports)
}

// ============================================================================
// Exports
// ============================================================================

/// Extract facts from one export declaration.
///
/// Only re-exports with a source module can be expressed as namespace
/// aliases; `export * from "m"` and `export { a }` are rejected.
pub fn extract_export(node: Node<'_>, source: &str) -> Result<Vec<ExportFact>, SyntaxError> {
    let start_position = node.start_byte();
    let from_path = node
        .child_by_field_name("source")
        .map(|module| unquoted_text(module, source));

    if let Some(namespace_export) = child_of_kind(node, "namespace_export") {
        // export * as ns from "m"
        let from_path = from_path.ok_or_else(|| {
            SyntaxError::Malformed("namespace export without a `from` clause".into())
        })?;
        let name = last_named_child(namespace_export)
            .ok_or_else(|| SyntaxError::Malformed("namespace export without a name".into()))?;
        return Ok(vec![ExportFact {
            from_path,
            export_name: unquoted_text(name, source),
            property_name: None,
            start_position,
        }]);
    }

    let has_clause = child_of_kind(node, "export_clause").is_some();
    match (has_clause, from_path) {
        (false, Some(_)) => Err(SyntaxError::Unsupported(UnsupportedForm::ReExportAll)),
        (true, None) => Err(SyntaxError::Unsupported(UnsupportedForm::ExportWithoutSource)),
        (true, Some(from_path)) => {
            let clause = find_single(node, "export_clause")?;
            let mut exports = Vec::new();
            for specifier in children_of_kind(clause, "export_specifier") {
                let name = specifier.child_by_field_name("name").ok_or_else(|| {
                    SyntaxError::Malformed("export specifier without a name".into())
                })?;
                let property_name = unquoted_text(name, source);
                let export_name = specifier
                    .child_by_field_name("alias")
                    .map(|alias| unquoted_text(alias, source))
                    .unwrap_or_else(|| property_name.clone());
                exports.push(ExportFact {
                    from_path: from_path.clone(),
                    export_name,
                    property_name: Some(property_name),
                    start_position,
                });
            }
            Ok(exports)
        }
        (false, None) => Err(SyntaxError::Malformed(format!(
            "export declaration `{}`",
            node_text(node, source)
        ))),
    }
}

fn last_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let last = node.named_children(&mut cursor).last();
    last
}

// ============================================================================
// Spans
// ============================================================================

/// A whole statement plus the rest of its line, if that is only whitespace.
fn statement_span(node: Node<'_>, source: &str) -> TextSpan {
    let end = skip_horizontal_whitespace(source, node.end_byte());
    let end = if source[end..].starts_with("\r\n") {
        end + 2
    } else if source[end..].starts_with('\n') {
        end + 1
    } else {
        end
    };
    TextSpan::new(node.start_byte(), end)
}

/// A keyword plus the spaces that separated it from the next token.
fn keyword_span(node: Node<'_>, source: &str) -> TextSpan {
    TextSpan::new(
        node.start_byte(),
        skip_horizontal_whitespace(source, node.end_byte()),
    )
}

fn skip_horizontal_whitespace(source: &str, from: usize) -> usize {
    let from = from.min(source.len());
    let rest = &source[from..];
    from + (rest.len() - rest.trim_start_matches([' ', '\t']).len())
}
