use std::path::PathBuf;

use tablegen_codegen::{Dialect, FormatError, format::run_formatter};
use tablegen_core::ImportSet;

use crate::render::render_imports;

/// Formatter binary looked up on `PATH` by default.
pub const DEFAULT_GOFMT: &str = "gofmt";

/// Emits Go source files, formatted by `gofmt`.
#[derive(Debug, Clone)]
pub struct GoDialect {
    gofmt: PathBuf,
}

impl GoDialect {
    pub fn new() -> Self {
        Self {
            gofmt: PathBuf::from(DEFAULT_GOFMT),
        }
    }

    /// Use a specific formatter binary.
    pub fn with_gofmt(gofmt: impl Into<PathBuf>) -> Self {
        Self {
            gofmt: gofmt.into(),
        }
    }

    pub fn gofmt(&self) -> &PathBuf {
        &self.gofmt
    }
}

impl Default for GoDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for GoDialect {
    fn name(&self) -> &'static str {
        "go"
    }

    fn extension(&self) -> &'static str {
        ".go"
    }

    fn test_suffix(&self) -> &'static str {
        "_test.go"
    }

    fn namespace(&self, package: &str) -> String {
        format!("package {}", package)
    }

    fn render_imports(&self, imports: &ImportSet) -> String {
        render_imports(imports)
    }

    fn format_source(&self, source: &str) -> Result<String, FormatError> {
        let output = run_formatter(&self.gofmt, &[], source).map_err(|e| {
            FormatError::new(format!(
                "failed to run {}: {}",
                self.gofmt.display(),
                e
            ))
        })?;

        if output.status.success() {
            return String::from_utf8(output.stdout)
                .map_err(|e| FormatError::new(format!("gofmt produced invalid UTF-8: {}", e)));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(status = %output.status, stderr = %stderr, "gofmt rejected source");
        // gofmt lists every error; the first one anchors the excerpt.
        let message = stderr
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("gofmt failed without output");
        Err(FormatError::new(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let dialect = GoDialect::new();
        assert_eq!(dialect.name(), "go");
        assert_eq!(dialect.extension(), ".go");
        assert_eq!(dialect.test_suffix(), "_test.go");
        assert_eq!(dialect.namespace("models"), "package models");
    }

    #[test]
    fn test_missing_formatter_is_a_format_error() {
        let dialect = GoDialect::with_gofmt("/nonexistent/bin/gofmt");
        let err = dialect.format_source("package models\n").unwrap_err();

        assert!(err.message.starts_with("failed to run /nonexistent/bin/gofmt"));
        assert!(tablegen_codegen::format::error_line(&err.message).is_none());
    }
}
