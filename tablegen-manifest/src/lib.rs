//! Configuration and schema parsing for tablegen.
//!
//! `tablegen.toml` says where generated files go and which imports they get;
//! `schema.toml` lists the tables to generate files for. Both are validated
//! after parsing and report problems as [`miette`] diagnostics pointing into
//! the source.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;
mod schema;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    Language, Manifest, OutputConfig, SINGLETON_DIR, TEST_DIR, TablegenToml, TemplatesConfig,
};
pub use schema::{SCHEMA_FILE, Schema};
pub use tablegen_core::{Column, ImportRegistry, ImportSet, Table};
pub use validate::ParseContext;

/// Default configuration file name.
pub const MANIFEST_FILE: &str = "tablegen.toml";
