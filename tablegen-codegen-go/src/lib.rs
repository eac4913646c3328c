//! Go dialect for tablegen.
//!
//! Generated files are validated and formatted by piping them through
//! `gofmt`, which must be installed wherever Go output is generated.

mod dialect;
mod render;

pub use dialect::{DEFAULT_GOFMT, GoDialect};
pub use render::render_imports;
