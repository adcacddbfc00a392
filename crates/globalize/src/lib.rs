//! Bundle TypeScript module declaration files into a single declaration
//! file exposing one global namespace.
//!
//! Libraries shipped as a plain `<script>` need typings that describe a
//! global (`Lib.run()`), not a module (`import { run } from "lib"`). This
//! crate walks the `.d.ts` files reachable from an entry point and rewrites
//! them into nested `declare namespace` blocks:
//!
//! ```text
//! index.d.ts ─┐                       declare namespace __Lib.__B { ... }
//! b.d.ts     ─┼─> graph ─> emit ─>    declare namespace Lib {
//! c.d.ts     ─┘                       import B = __Lib.__B; ... }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::collections::BTreeMap;
//!
//! let externals = BTreeMap::from([("react".to_string(), "React".to_string())]);
//! let typings = globalize::bundle_typings("Lib", "build/index.d.ts", &externals)?;
//! ```
//!
//! The entry module is emitted under the global name; every other module
//! lives in the private `__<global>` namespace and is reached through
//! `import x = ...` aliases.

pub mod bundle;
pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod source;

pub use bundle::{Bundler, bundle_typings};
pub use config::{BundleConfig, ConfigError, ResolvedConfig};
pub use emit::emit;
pub use error::BundleError;
pub use graph::{FileMap, FileRecord, GraphBuilder};
pub use source::{FsSourceProvider, MemorySourceProvider, SourceProvider};
