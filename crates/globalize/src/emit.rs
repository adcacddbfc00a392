//! Namespace block emission.
//!
//! Every module becomes one `declare namespace` block. The entry module is
//! emitted under the global name and everything else under the private
//! pseudo-namespace `__<global>`. Blocks come out in post-order, so a
//! module's dependencies always precede it.

use crate::error::BundleError;
use crate::graph::{FileMap, FileRecord};
use globalize_facts_core::ModuleRef;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

/// Emit the bundle for `entry` and every module it depends on.
pub fn emit(
    files: &FileMap,
    entry: &str,
    global_name: &str,
    externals: &BTreeMap<String, String>,
) -> Result<String, BundleError> {
    let emitter = Emitter {
        files,
        entry,
        global_name,
        pseudo_namespace: format!("__{global_name}"),
        externals,
    };
    let mut state = EmitState::default();
    emitter.emit_module(entry, &mut state)?;
    Ok(state.output)
}

struct Emitter<'a> {
    files: &'a FileMap,
    entry: &'a str,
    global_name: &'a str,
    pseudo_namespace: String,
    externals: &'a BTreeMap<String, String>,
}

#[derive(Default)]
struct EmitState {
    output: String,
    processed: HashSet<String>,
    /// Modules whose dependencies are being emitted, outermost first
    in_progress: Vec<String>,
}

impl Emitter<'_> {
    fn emit_module(&self, path: &str, state: &mut EmitState) -> Result<(), BundleError> {
        if state.processed.contains(path) {
            return Ok(());
        }
        if let Some(start) = state.in_progress.iter().position(|p| p == path) {
            let mut cycle = state.in_progress[start..].to_vec();
            cycle.push(path.to_string());
            return Err(BundleError::CircularDependency { cycle });
        }

        let record = self.record(path)?;
        state.in_progress.push(path.to_string());
        for dependency in &record.dependencies {
            self.emit_module(dependency, state)?;
        }
        state.in_progress.pop();

        let block = self.block(path, record)?;
        tracing::debug!(module = path, bytes = block.len(), "emitted");
        state.output.push_str(&block);
        state.processed.insert(path.to_string());
        Ok(())
    }

    fn record(&self, path: &str) -> Result<&FileRecord, BundleError> {
        self.files
            .get(path)
            .ok_or_else(|| BundleError::MissingRecord {
                path: path.to_string(),
            })
    }

    /// The fully qualified namespace a module is declared under.
    fn declared_namespace(&self, path: &str) -> Result<String, BundleError> {
        if path == self.entry {
            return Ok(self.global_name.to_string());
        }
        let record = self.record(path)?;
        Ok(format!("{}.{}", self.pseudo_namespace, record.namespace_name))
    }

    /// The identifier a reference to `module` resolves to.
    fn target_namespace(&self, path: &str, module: &ModuleRef) -> Result<String, BundleError> {
        match module {
            ModuleRef::Internal(dependency) => self.declared_namespace(dependency),
            ModuleRef::External(name) => {
                self.externals
                    .get(name)
                    .cloned()
                    .ok_or_else(|| BundleError::UndeclaredExternal {
                        module: name.clone(),
                        path: path.to_string(),
                    })
            }
        }
    }

    fn block(&self, path: &str, record: &FileRecord) -> Result<String, BundleError> {
        let mut out = String::new();
        let _ = writeln!(out, "declare namespace {} {{", self.declared_namespace(path)?);

        for import in &record.imports {
            let namespace = self.target_namespace(path, &import.import_path)?;
            let property = import.property_name.as_deref();
            if first_identifier(&namespace) == import.local_name {
                if property.is_none() && namespace == import.local_name {
                    // `import React = React;` says nothing.
                    continue;
                }
                return Err(BundleError::SelfReferentialAlias {
                    path: path.to_string(),
                    local: import.local_name.clone(),
                    namespace,
                    property: import.property_name.clone(),
                });
            }
            let _ = writeln!(
                out,
                "import {} = {};",
                import.local_name,
                qualify(&namespace, property)
            );
        }

        let body = record.text_spans_to_delete.delete_from(&record.contents);
        out.push_str(&body);
        if !body.is_empty() && !body.ends_with('\n') {
            out.push('\n');
        }

        for export in &record.exports {
            let namespace = self.target_namespace(path, &export.from_path)?;
            if first_identifier(&namespace) == export.export_name {
                return Err(BundleError::SelfReferentialAlias {
                    path: path.to_string(),
                    local: export.export_name.clone(),
                    namespace,
                    property: export.property_name.clone(),
                });
            }
            let _ = writeln!(
                out,
                "export import {} = {};",
                export.export_name,
                qualify(&namespace, export.property_name.as_deref())
            );
        }

        out.push_str("}\n");
        Ok(out)
    }
}

fn first_identifier(namespace: &str) -> &str {
    namespace.split('.').next().unwrap_or(namespace)
}

fn qualify(namespace: &str, property: Option<&str>) -> String {
    match property {
        Some(property) => format!("{namespace}.{property}"),
        None => namespace.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::source::MemorySourceProvider;

    fn bundle(
        sources: &MemorySourceProvider,
        externals: &BTreeMap<String, String>,
    ) -> Result<String, BundleError> {
        let files = GraphBuilder::new(sources, "Lib", externals).build("a")?;
        emit(&files, "a", "Lib", externals)
    }

    fn react() -> BTreeMap<String, String> {
        BTreeMap::from([("react".to_string(), "React".to_string())])
    }

    #[test]
    fn entry_imports_and_reexports_dependency() {
        let sources = MemorySourceProvider::new()
            .with(
                "a",
                "import * as B from \"./b\";\nexport { x } from \"./b\";\ndeclare const y: B.T;\n",
            )
            .with("b", "export declare const x: number;\nexport interface T {}\n");
        let output = bundle(&sources, &BTreeMap::new()).unwrap();

        insta::assert_snapshot!(output, @r"
        declare namespace __Lib.__B {
        export const x: number;
        export interface T {}
        }
        declare namespace Lib {
        import B = __Lib.__B;
        const y: B.T;
        export import x = __Lib.__B.x;
        }
        ");
    }

    #[test]
    fn diamond_emits_shared_dependency_once_and_first() {
        let sources = MemorySourceProvider::new()
            .with("a", "import * as B from \"./b\";\nimport * as C from \"./c\";\n")
            .with("b", "import * as D from \"./d\";\n")
            .with("c", "import * as D from \"./d\";\n")
            .with("d", "declare const d: number;\n");
        let output = bundle(&sources, &BTreeMap::new()).unwrap();

        let headers: Vec<&str> = output
            .lines()
            .filter(|l| l.starts_with("declare namespace"))
            .collect();
        assert_eq!(
            headers,
            vec![
                "declare namespace __Lib.__D {",
                "declare namespace __Lib.__B {",
                "declare namespace __Lib.__C {",
                "declare namespace Lib {",
            ]
        );
    }

    #[test]
    fn local_names_survive_aliasing() {
        let sources = MemorySourceProvider::new()
            .with("a", "import { foo as bar, baz } from \"./m\";\nimport R from \"react\";\n")
            .with("m", "export declare const foo: 1;\nexport declare const baz: 2;\n");
        let output = bundle(&sources, &react()).unwrap();

        assert!(output.contains("import bar = __Lib.__M.foo;\n"));
        assert!(output.contains("import baz = __Lib.__M.baz;\n"));
        assert!(output.contains("import R = React.default;\n"));
    }

    #[test]
    fn redundant_whole_module_alias_is_skipped() {
        let sources = MemorySourceProvider::new()
            .with("a", "import * as React from \"react\";\ndeclare const e: React.Element;\n");
        let output = bundle(&sources, &react()).unwrap();

        insta::assert_snapshot!(output, @r"
        declare namespace Lib {
        const e: React.Element;
        }
        ");
    }

    #[test]
    fn alias_to_own_property_is_rejected() {
        let sources = MemorySourceProvider::new().with("a", "import React from \"react\";\n");
        match bundle(&sources, &react()) {
            Err(BundleError::SelfReferentialAlias {
                local,
                namespace,
                property,
                ..
            }) => {
                assert_eq!(local, "React");
                assert_eq!(namespace, "React");
                assert_eq!(property.as_deref(), Some("default"));
            }
            other => panic!("expected SelfReferentialAlias, got {other:?}"),
        }
    }

    #[test]
    fn alias_into_own_nested_namespace_is_rejected() {
        let sources =
            MemorySourceProvider::new().with("a", "import * as React from \"react-addons\";\n");
        let externals =
            BTreeMap::from([("react-addons".to_string(), "React.Addons".to_string())]);
        assert!(matches!(
            bundle(&sources, &externals),
            Err(BundleError::SelfReferentialAlias { .. })
        ));
    }

    #[test]
    fn export_named_like_its_target_is_rejected() {
        let sources = MemorySourceProvider::new().with("a", "export { React } from \"react\";\n");
        assert!(matches!(
            bundle(&sources, &react()),
            Err(BundleError::SelfReferentialAlias { .. })
        ));
    }

    #[test]
    fn namespace_reexport_has_no_property() {
        let sources = MemorySourceProvider::new()
            .with("a", "export * as utils from \"./utils/index\";\n")
            .with("utils/index", "export declare function f(): void;\n");
        let output = bundle(&sources, &BTreeMap::new()).unwrap();

        assert!(output.contains("export import utils = __Lib.__Utils.__Index;\n"));
    }

    #[test]
    fn cycle_is_reported_with_its_path() {
        let sources = MemorySourceProvider::new()
            .with("a", "import * as B from \"./b\";\n")
            .with("b", "import * as C from \"./c\";\n")
            .with("c", "import * as B from \"./b\";\n");
        match bundle(&sources, &BTreeMap::new()) {
            Err(BundleError::CircularDependency { cycle }) => {
                assert_eq!(cycle, vec!["b", "c", "b"]);
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn body_without_trailing_newline_is_terminated() {
        let sources = MemorySourceProvider::new().with("a", "declare const a: 1;");
        let output = bundle(&sources, &BTreeMap::new()).unwrap();
        assert_eq!(output, "declare namespace Lib {\nconst a: 1;\n}\n");
    }

    #[test]
    fn missing_record_is_an_error() {
        let files = FileMap::new();
        assert!(matches!(
            emit(&files, "a", "Lib", &BTreeMap::new()),
            Err(BundleError::MissingRecord { path }) if path == "a"
        ));
    }
}
