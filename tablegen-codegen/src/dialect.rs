//! Target language abstraction.
//!
//! A [`Dialect`] knows how a generated file of one language declares its
//! package, spells its imports and gets canonically formatted. Everything
//! else about assembling a file is language-agnostic.

use thiserror::Error;

use crate::ImportSet;

/// Failure reported by a dialect's formatter.
///
/// When the formatter can locate the problem, `message` carries a
/// `line:column: ` prefix (1-based line) that the diagnostic formatter uses
/// to build its excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormatError {
    pub message: String,
}

impl FormatError {
    /// A formatter error that could not be pinned to a location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A formatter error at the given 1-based line and column.
    pub fn at(line: usize, column: usize, message: impl std::fmt::Display) -> Self {
        Self {
            message: format!("{}:{}: {}", line, column, message),
        }
    }
}

/// Trait for target languages.
///
/// Implement this trait to emit generated files in a new language.
/// Implementations must be shareable across threads: one dialect instance
/// serves every assembly of a run.
pub trait Dialect: Send + Sync {
    /// Language identifier (e.g., "go", "rust")
    fn name(&self) -> &'static str;

    /// Suffix of generated source files, dot included (e.g., ".go")
    fn extension(&self) -> &'static str;

    /// Suffix of generated test files (e.g., "_test.go")
    fn test_suffix(&self) -> &'static str;

    /// The package/namespace declaration line, without trailing newline.
    fn namespace(&self, package: &str) -> String;

    /// Render an import set as import declarations.
    ///
    /// Must return an empty string for an empty set so no blank import block
    /// is ever emitted.
    fn render_imports(&self, imports: &ImportSet) -> String;

    /// Parse and canonically format a complete source file.
    fn format_source(&self, source: &str) -> Result<String, FormatError>;
}
