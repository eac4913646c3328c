//! Output stage of the tablegen code generator.
//!
//! Takes template fragments for a table (or table-independent singleton
//! templates) and turns them into complete, syntactically valid source files:
//! disclaimer banner, package declaration, deduplicated imports, rendered
//! body.
//!
//! # Module Organization
//!
//! - [`dialect`] - Target language abstraction ([`Dialect`])
//! - [`header`] - Disclaimer, namespace and import block writers
//! - [`template`] - Template loading and fault-isolated execution ([`TemplateSet`])
//! - [`format`] - Syntax validation and line-anchored diagnostics
//! - [`output`] - Per-table and singleton file assembly ([`Assembler`])
//! - [`testing`] - Test utilities (feature-gated)

mod error;

pub mod dialect;
pub mod format;
pub mod header;
pub mod output;
pub mod template;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dialect::{Dialect, FormatError};
pub use error::{Error, Result};
pub use output::{Assembler, EntityPlan, SingletonPlan};
pub use tablegen_core::{ImportRegistry, ImportSet, Table};
pub use template::{TemplateData, TemplateSet};
