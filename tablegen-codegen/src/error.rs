use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Result type for output assembly.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling, validating or writing generated files.
///
/// None of these are retried: they come from a bad template, bad input data
/// or a bad output path, and running again would fail the same way.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to execute template: {name}")]
    #[diagnostic(code(tablegen::template))]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to execute template: {name}\npanic: {payload}")]
    #[diagnostic(
        code(tablegen::template_panic),
        help("a helper called from the template panicked; nothing was written for this file")
    )]
    TemplatePanic { name: String, payload: String },

    #[error("failed to load templates from '{path}'")]
    #[diagnostic(code(tablegen::template_load))]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to format {file}: {message}{}", render_excerpt(.excerpt))]
    #[diagnostic(
        code(tablegen::format),
        help("the rendered templates do not form valid source code; the marked line is where the formatter gave up")
    )]
    Format {
        file: String,
        message: String,
        excerpt: Option<String>,
    },

    #[error("table name '{name}' cannot be used as a file name")]
    #[diagnostic(
        code(tablegen::invalid_file_name),
        help("table names must be plain identifiers; path separators and '..' are not allowed")
    )]
    InvalidFileName { name: String },

    #[error("failed to write output file {path}")]
    #[diagnostic(code(tablegen::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} files failed to generate:\n{}", .errors.len(), render_all(.errors))]
    #[diagnostic(code(tablegen::multiple))]
    Multiple {
        #[related]
        errors: Vec<Error>,
    },
}

impl Error {
    /// Collapse a list of errors: a single error stays as is, several become
    /// [`Error::Multiple`]. Returns `None` for an empty list.
    pub fn from_many(mut errors: Vec<Error>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Error::Multiple { errors }),
        }
    }

    /// Check if this error came out of template execution.
    pub fn is_template_fault(&self) -> bool {
        matches!(self, Error::Template { .. } | Error::TemplatePanic { .. })
    }

    /// The formatter excerpt, if this is a format error that located its line.
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Error::Format { excerpt, .. } => excerpt.as_deref(),
            _ => None,
        }
    }
}

fn render_excerpt(excerpt: &Option<String>) -> String {
    match excerpt {
        Some(excerpt) => format!("\n\n{}", excerpt),
        None => String::new(),
    }
}

fn render_all(errors: &[Error]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", error_chain(e)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an error followed by its sources, colon separated.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panic_error(name: &str) -> Error {
        Error::TemplatePanic {
            name: name.to_string(),
            payload: "attempt to divide by zero".to_string(),
        }
    }

    #[test]
    fn test_from_many() {
        assert!(Error::from_many(Vec::new()).is_none());

        let single = Error::from_many(vec![panic_error("a.tpl")]).unwrap();
        assert!(matches!(single, Error::TemplatePanic { .. }));

        let many = Error::from_many(vec![panic_error("a.tpl"), panic_error("b.tpl")]).unwrap();
        assert!(matches!(many, Error::Multiple { ref errors } if errors.len() == 2));
    }

    #[test]
    fn test_multiple_display_lists_every_error() {
        let err = Error::Multiple {
            errors: vec![panic_error("a.tpl"), panic_error("b.tpl")],
        };
        let message = err.to_string();

        assert!(message.starts_with("2 files failed to generate"));
        assert!(message.contains("a.tpl"));
        assert!(message.contains("b.tpl"));
    }

    #[test]
    fn test_format_display_with_excerpt() {
        let err = Error::Format {
            file: "users.go".to_string(),
            message: "3:1: expected declaration".to_string(),
            excerpt: Some(">>>> oops\n".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "failed to format users.go: 3:1: expected declaration\n\n>>>> oops\n"
        );
        assert_eq!(err.excerpt(), Some(">>>> oops\n"));
    }

    #[test]
    fn test_format_display_without_excerpt() {
        let err = Error::Format {
            file: "users.go".to_string(),
            message: "formatter crashed".to_string(),
            excerpt: None,
        };

        assert_eq!(err.to_string(), "failed to format users.go: formatter crashed");
        assert!(err.excerpt().is_none());
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = Error::Write {
            path: PathBuf::from("/nope/users.go"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };

        assert_eq!(
            error_chain(&err),
            "failed to write output file /nope/users.go: No such file or directory"
        );
    }
}
