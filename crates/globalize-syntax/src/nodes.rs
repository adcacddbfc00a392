//! Small structural queries over tree-sitter nodes.

use crate::traits::SyntaxError;
use tree_sitter::Node;

/// All descendants of `node` (excluding `node` itself) with the given kind, in source order.
pub fn descendants_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut matches = Vec::new();
    collect_descendants(node, kind, &mut matches);
    matches
}

fn collect_descendants<'t>(node: Node<'t>, kind: &str, matches: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            matches.push(child);
        }
        collect_descendants(child, kind, matches);
    }
}

pub fn has_descendant(node: Node<'_>, kind: &str) -> bool {
    !descendants_of_kind(node, kind).is_empty()
}

/// The single descendant of the given kind.
///
/// Fails with `AmbiguousNodeMatch` when there is not exactly one.
pub fn find_single<'t>(node: Node<'t>, kind: &'static str) -> Result<Node<'t>, SyntaxError> {
    let mut matches = descendants_of_kind(node, kind);
    if matches.len() != 1 {
        return Err(SyntaxError::AmbiguousNodeMatch {
            kind,
            found: matches.len(),
        });
    }
    Ok(matches.remove(0))
}

/// First direct child with the given kind.
pub fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Direct children with the given kind.
pub fn children_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let matches = node
        .children(&mut cursor)
        .filter(|c| c.kind() == kind)
        .collect();
    matches
}

pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Text of a string literal or identifier, without surrounding quotes.
pub fn unquoted_text(node: Node<'_>, source: &str) -> String {
    node_text(node, source)
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::DeclarationFile;

    #[test]
    fn find_single_requires_exactly_one_match() {
        let file = DeclarationFile::parse("import { a, b } from \"./m\";\n").unwrap();
        let root = file.root();

        assert!(matches!(
            find_single(root, "import_specifier"),
            Err(SyntaxError::AmbiguousNodeMatch {
                kind: "import_specifier",
                found: 2
            })
        ));
        assert!(matches!(
            find_single(root, "namespace_import"),
            Err(SyntaxError::AmbiguousNodeMatch { found: 0, .. })
        ));
        assert_eq!(
            find_single(root, "named_imports").unwrap().kind(),
            "named_imports"
        );
    }

    #[test]
    fn ambiguous_match_message() {
        let err = SyntaxError::AmbiguousNodeMatch {
            kind: "import_clause",
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "expected exactly one `import_clause` node, found 2"
        );
    }
}
