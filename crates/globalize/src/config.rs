//! Bundle configuration.
//!
//! Loads from either of:
//! 1. TOML (`globalize.toml`)
//! 2. A JSON parameter array (`params.json`): `["Lib", "index.d.ts", {"react": "React"}]`
//!
//! Example globalize.toml:
//! ```toml
//! global_name = "Lib"
//! entry = "build/index.d.ts"
//! out = "dist/lib.d.ts"
//!
//! [externals]
//! react = "React"
//! ```
//!
//! Relative `entry` and `out` paths are resolved against the directory
//! holding the config file.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid parameter JSON in {}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("missing `{0}`: set it in the config file or on the command line")]
    Missing(&'static str),

    #[error("invalid external `{0}`: expected MODULE=GLOBAL")]
    InvalidExternal(String),
}

/// Configuration as written in a file. Every field may be left out and
/// supplied on the command line instead.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BundleConfig {
    pub global_name: Option<String>,
    pub entry: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub externals: BTreeMap<String, String>,
}

/// The `params.json` shape: `[globalName, entryPoint, externals?]`.
#[derive(Deserialize)]
struct Params(String, PathBuf, #[serde(default)] BTreeMap<String, String>);

/// A fully specified bundle job.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub global_name: String,
    pub entry: PathBuf,
    pub out: Option<PathBuf>,
    pub externals: BTreeMap<String, String>,
}

impl BundleConfig {
    /// Load a config file; `.json` files are read as a parameter array,
    /// anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_params_json(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    fn from_params_json(content: &str) -> Result<Self, serde_json::Error> {
        let Params(global_name, entry, externals) = serde_json::from_str(content)?;
        Ok(Self {
            global_name: Some(global_name),
            entry: Some(entry),
            out: None,
            externals,
        })
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.entry = self.entry.map(|p| base.join(p));
        self.out = self.out.map(|p| base.join(p));
        self
    }

    /// Overlay values from `other`; set fields in `other` win, externals are merged.
    pub fn merge(mut self, other: Self) -> Self {
        self.global_name = other.global_name.or(self.global_name);
        self.entry = other.entry.or(self.entry);
        self.out = other.out.or(self.out);
        self.externals.extend(other.externals);
        self
    }

    /// Check that the required fields are present.
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        Ok(ResolvedConfig {
            global_name: self.global_name.ok_or(ConfigError::Missing("global_name"))?,
            entry: self.entry.ok_or(ConfigError::Missing("entry"))?,
            out: self.out,
            externals: self.externals,
        })
    }
}

/// Parse a `MODULE=GLOBAL` pair.
pub fn parse_external(arg: &str) -> Result<(String, String), ConfigError> {
    match arg.split_once('=') {
        Some((module, global)) if !module.is_empty() && !global.is_empty() => {
            Ok((module.to_string(), global.to_string()))
        }
        _ => Err(ConfigError::InvalidExternal(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("globalize.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
global_name = "Lib"
entry = "build/index.d.ts"
out = "dist/lib.d.ts"

[externals]
react = "React"
"#
        )
        .unwrap();

        let config = BundleConfig::load(&config_path).unwrap();
        assert_eq!(config.global_name.as_deref(), Some("Lib"));
        assert_eq!(config.entry, Some(dir.path().join("build/index.d.ts")));
        assert_eq!(config.out, Some(dir.path().join("dist/lib.d.ts")));
        assert_eq!(config.externals["react"], "React");
    }

    #[test]
    fn test_load_params_json() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("params.json");
        std::fs::write(
            &config_path,
            r#"["Lib", "index.d.ts", {"react": "React"}]"#,
        )
        .unwrap();

        let config = BundleConfig::load(&config_path).unwrap();
        assert_eq!(config.global_name.as_deref(), Some("Lib"));
        assert_eq!(config.entry, Some(dir.path().join("index.d.ts")));
        assert_eq!(config.out, None);
        assert_eq!(config.externals.len(), 1);
    }

    #[test]
    fn test_params_json_without_externals() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("params.json");
        std::fs::write(&config_path, r#"["Lib", "index.d.ts"]"#).unwrap();

        let config = BundleConfig::load(&config_path).unwrap();
        assert!(config.externals.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("globalize.toml");
        std::fs::write(&config_path, "[externals]\nreact = \"React\"\n").unwrap();

        let config = BundleConfig::load(&config_path).unwrap();
        assert_eq!(config.global_name, None);
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Missing("global_name"))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("globalize.toml");
        std::fs::write(&config_path, "global_name = \n").unwrap();

        assert!(matches!(
            BundleConfig::load(&config_path),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = BundleConfig {
            global_name: Some("Lib".into()),
            entry: Some("a.d.ts".into()),
            out: None,
            externals: BTreeMap::from([("react".into(), "React".into())]),
        };
        let flags = BundleConfig {
            global_name: Some("Other".into()),
            externals: BTreeMap::from([("vue".into(), "Vue".into())]),
            ..Default::default()
        };

        let resolved = file.merge(flags).resolve().unwrap();
        assert_eq!(resolved.global_name, "Other");
        assert_eq!(resolved.entry, PathBuf::from("a.d.ts"));
        assert_eq!(resolved.externals.len(), 2);
    }

    #[test]
    fn test_parse_external() {
        assert_eq!(
            parse_external("react=React").unwrap(),
            ("react".to_string(), "React".to_string())
        );
        assert_eq!(
            parse_external("react-dom=React.DOM").unwrap().1,
            "React.DOM"
        );
        assert!(matches!(
            parse_external("react"),
            Err(ConfigError::InvalidExternal(_))
        ));
    }
}
