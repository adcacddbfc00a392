//! Fixture-based bundle tests.
//!
//! Structure:
//!   tests/fixtures/<case>/params.json   — `[globalName, entry, externals?]`, entry relative to the case
//!   tests/fixtures/<case>/expected.d.ts — exact bundle output
//!   tests/fixtures/<case>/error.txt     — or: text the bundle error must contain

use globalize::{BundleConfig, bundle_typings};
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn case_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
        .expect("fixtures directory must exist")
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.join("params.json").is_file())
        .collect();
    dirs.sort(); // deterministic order
    dirs
}

fn case_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[test]
fn test_bundle_fixtures() {
    let mut failures: Vec<String> = Vec::new();
    let cases = case_dirs(&fixtures_dir());

    for dir in &cases {
        let name = case_name(dir);
        let config = BundleConfig::load(&dir.join("params.json"))
            .and_then(BundleConfig::resolve)
            .unwrap_or_else(|e| panic!("{name}: bad params.json: {e}"));
        let result = bundle_typings(&config.global_name, &config.entry, &config.externals);

        let expected_error = std::fs::read_to_string(dir.join("error.txt")).ok();
        match (result, expected_error) {
            (Ok(output), None) => {
                let expected = std::fs::read_to_string(dir.join("expected.d.ts"))
                    .unwrap_or_else(|e| panic!("{name}: missing expected.d.ts: {e}"));
                if output != expected {
                    failures.push(format!(
                        "{name}: output differs\n--- expected\n{expected}--- actual\n{output}"
                    ));
                }
            }
            (Ok(output), Some(error)) => failures.push(format!(
                "{name}: expected error `{}`, got output\n{output}",
                error.trim()
            )),
            (Err(err), Some(error)) => {
                if !err.to_string().contains(error.trim()) {
                    failures.push(format!(
                        "{name}: expected error containing `{}`, got `{err}`",
                        error.trim()
                    ));
                }
            }
            (Err(err), None) => failures.push(format!("{name}: unexpected error: {err}")),
        }
    }

    assert!(!cases.is_empty(), "no fixture cases found");
    if !failures.is_empty() {
        panic!(
            "{} of {} fixtures failed:\n\n{}",
            failures.len(),
            cases.len(),
            failures.join("\n\n")
        );
    }
}
