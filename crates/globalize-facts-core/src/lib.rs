//! Core data types for globalize facts.
//!
//! This crate defines the vocabulary shared by the bundling pipeline:
//! - `globalize-syntax` produces import/export facts and deletion spans
//! - `globalize` resolves fact paths into [`ModuleRef`]s and rewrites file text

mod import;
mod span;

pub use import::{ExportFact, ImportFact, ModuleRef};
pub use span::{TextSpan, TextSpans};
