//! Rust dialect for tablegen.
//!
//! Generated files are parsed with [`syn`] for located syntax errors, then
//! formatted by `rustfmt`, which must be on `PATH` wherever Rust output is
//! generated.

mod dialect;
mod format;
mod render;

pub use dialect::RustDialect;
pub use format::{DEFAULT_RUSTFMT, check_syntax, format_rust, format_rust_with};
pub use render::render_imports;
