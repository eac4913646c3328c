use tablegen_codegen::{Dialect, FormatError};
use tablegen_core::ImportSet;

use crate::{format::format_rust, render::render_imports};

/// Emits Rust modules.
///
/// A generated module has no package clause; its namespace line is an inner
/// doc comment naming the package, which keeps it through formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustDialect;

impl Dialect for RustDialect {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn extension(&self) -> &'static str {
        ".rs"
    }

    fn test_suffix(&self) -> &'static str {
        "_test.rs"
    }

    fn namespace(&self, package: &str) -> String {
        format!("//! Package `{}`.", package)
    }

    fn render_imports(&self, imports: &ImportSet) -> String {
        render_imports(imports)
    }

    fn format_source(&self, source: &str) -> Result<String, FormatError> {
        format_rust(source)
    }
}
