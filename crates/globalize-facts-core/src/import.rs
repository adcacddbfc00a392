//! Import and export facts extracted from declaration files.

use serde::{Deserialize, Serialize};

/// One imported binding.
///
/// `P` is the module path type: the raw specifier text (`String`) as
/// extracted, or a [`ModuleRef`] once the graph builder has resolved it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFact<P = String> {
    /// Identifier bound in the importing file
    pub local_name: String,
    /// Name on the source module; `None` binds the whole module
    pub property_name: Option<String>,
    pub import_path: P,
    /// Byte offset of the import statement
    pub start_position: usize,
}

impl<P> ImportFact<P> {
    /// Replace the module path, keeping the binding.
    pub fn map_path<Q>(self, f: impl FnOnce(P) -> Q) -> ImportFact<Q> {
        ImportFact {
            local_name: self.local_name,
            property_name: self.property_name,
            import_path: f(self.import_path),
            start_position: self.start_position,
        }
    }
}

/// One re-exported binding (`export { a as b } from "./m"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFact<P = String> {
    pub from_path: P,
    /// Name visible to consumers
    pub export_name: String,
    /// Name within the source module; `None` re-exports the whole module
    /// (`export * as ns from "./m"`)
    pub property_name: Option<String>,
    /// Byte offset of the export statement
    pub start_position: usize,
}

impl<P> ExportFact<P> {
    /// Replace the module path, keeping the binding.
    pub fn map_path<Q>(self, f: impl FnOnce(P) -> Q) -> ExportFact<Q> {
        ExportFact {
            from_path: f(self.from_path),
            export_name: self.export_name,
            property_name: self.property_name,
            start_position: self.start_position,
        }
    }
}

/// A module reference after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum ModuleRef {
    /// Canonical path of a bundled file
    Internal(String),
    /// Module supplied by the host environment, keyed by its specifier
    External(String),
}

impl ModuleRef {
    pub fn as_str(&self) -> &str {
        match self {
            ModuleRef::Internal(path) | ModuleRef::External(path) => path,
        }
    }
}

impl std::fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_path_keeps_binding() {
        let fact = ImportFact {
            local_name: "B".to_string(),
            property_name: None,
            import_path: "./b".to_string(),
            start_position: 12,
        };
        let resolved = fact.map_path(|_| ModuleRef::Internal("b".to_string()));
        assert_eq!(resolved.local_name, "B");
        assert_eq!(resolved.property_name, None);
        assert_eq!(resolved.import_path, ModuleRef::Internal("b".to_string()));
        assert_eq!(resolved.start_position, 12);
    }

    #[test]
    fn module_ref_displays_its_path() {
        let external = ModuleRef::External("react".to_string());
        assert_eq!(external.to_string(), "react");
        assert_eq!(ModuleRef::Internal("utils/a".to_string()).as_str(), "utils/a");
    }
}
