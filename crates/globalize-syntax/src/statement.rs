//! Parsing declaration files and classifying the statements the bundler rewrites.

use crate::nodes::child_of_kind;
use crate::traits::SyntaxError;
use tree_sitter::{Node, Parser, Tree};

/// A statement (or token) the bundler cares about, tagged by what it is.
#[derive(Debug, Clone, Copy)]
pub enum Statement<'t> {
    /// `import ... from "m"`, `import "m"`, `import X = require("m")`
    Import(Node<'t>),
    /// Export declarations that name another module, or that the bundler
    /// must reject (`export { a }`, `export * from "m"`)
    Export(Node<'t>),
    /// The `declare` keyword of an ambient declaration
    AmbientMarker(Node<'t>),
    /// Anything else; left in the body untouched
    Other(Node<'t>),
}

impl<'t> Statement<'t> {
    pub fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "import_statement" => Statement::Import(node),
            "export_statement" if is_export_declaration(node) => Statement::Export(node),
            "declare" if is_ambient_marker(node) => Statement::AmbientMarker(node),
            _ => Statement::Other(node),
        }
    }
}

/// `export { .. }`, `export { .. } from`, `export * from` and `export * as ns from`.
///
/// Exported declarations (`export declare function f(): void;`), `export default`,
/// `export =` and `export as namespace` are ordinary body text.
fn is_export_declaration(node: Node<'_>) -> bool {
    if node.child_by_field_name("declaration").is_some() || child_of_kind(node, "default").is_some()
    {
        return false;
    }
    child_of_kind(node, "export_clause").is_some()
        || child_of_kind(node, "namespace_export").is_some()
        || child_of_kind(node, "*").is_some()
}

fn is_ambient_marker(node: Node<'_>) -> bool {
    !node.is_named() && node.parent().is_some_and(|p| p.kind() == "ambient_declaration")
}

/// A parsed declaration file.
pub struct DeclarationFile<'s> {
    source: &'s str,
    tree: Tree,
}

impl<'s> DeclarationFile<'s> {
    /// Parse TypeScript declaration source.
    pub fn parse(source: &'s str) -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&arborium_typescript::language().into())
            .map_err(|err| SyntaxError::Parse(err.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SyntaxError::Parse("failed to parse".into()))?;

        Ok(Self { source, tree })
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_error(&self) -> bool {
        self.root().has_error()
    }

    /// Every import, export and ambient marker, at any depth, in source order.
    ///
    /// The walk does not descend into import or export declarations; other
    /// statements are searched recursively, so imports inside
    /// `declare module "m" { ... }` blocks are found too.
    pub fn statements(&self) -> Vec<Statement<'_>> {
        let mut statements = Vec::new();
        collect_statements(self.root(), &mut statements);
        statements
    }
}

fn collect_statements<'t>(node: Node<'t>, statements: &mut Vec<Statement<'t>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match Statement::classify(child) {
            Statement::Other(other) => collect_statements(other, statements),
            statement => statements.push(statement),
        }
    }
}
