//! Core utilities and types for the tablegen code generator.
//!
//! This crate provides the entity descriptors handed over by schema
//! introspection, the import model, file persistence, and naming helpers
//! shared across the tablegen crates.

mod file;
mod imports;
mod naming;
mod table;
mod utils;

// File operations
pub use file::{File, write_file};
// Import model
pub use imports::{ImportRegistry, ImportSet, with_type_imports};
// Output naming
pub use naming::{singleton_name, strip_extension, strip_order_prefix};
// Entity descriptors
pub use table::{Column, Table};
// String utilities
pub use utils::{to_camel_case, to_pascal_case, to_snake_case};
