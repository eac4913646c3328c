use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for tablegen-manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the source content and filename so validation code can build
/// spanned diagnostics without threading both through every call.
///
/// # Example
///
/// ```ignore
/// let ctx = SourceContext::new(content, "tablegen.toml");
/// ctx.validation_error("missing required field", None);
/// ctx.duplicate_table_error("users", first, second);
/// ```
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            filename: self.filename.clone(),
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a validation error, optionally pointing at a span.
    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    pub fn reserved_keyword_error(
        &self,
        name: impl Into<String>,
        context: impl Into<String>,
        language: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::ReservedKeyword {
            src: self.named_source(),
            span,
            name: name.into(),
            context: context.into(),
            language: language.into(),
        })
    }

    pub fn invalid_identifier_error(
        &self,
        name: impl Into<String>,
        context: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidIdentifier {
            src: self.named_source(),
            span,
            name: name.into(),
            context: context.into(),
            reason: reason.into(),
        })
    }

    pub fn duplicate_table_error(
        &self,
        name: impl Into<String>,
        first_span: Option<SourceSpan>,
        second_span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateTable {
            src: self.named_source(),
            first_span,
            second_span,
            name: name.into(),
        })
    }

    pub fn duplicate_column_error(
        &self,
        table: impl Into<String>,
        name: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::DuplicateColumn {
            src: self.named_source(),
            span,
            table: table.into(),
            name: name.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("create a tablegen.toml next to your schema.toml, or pass --config"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(tablegen::parse_error))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(tablegen::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("'{name}' is a {language} reserved keyword")]
    #[diagnostic(
        code(tablegen::reserved_keyword),
        help("rename the {context} to something else, e.g. '{name}s'")
    )]
    ReservedKeyword {
        #[source_code]
        src: NamedSource<String>,
        #[label("reserved keyword used here")]
        span: Option<SourceSpan>,
        name: String,
        context: String,
        language: String,
    },

    #[error("invalid {context} name '{name}'")]
    #[diagnostic(
        code(tablegen::invalid_identifier),
        help(
            "{reason}. Use only letters, numbers, and underscores, starting with a letter or underscore."
        )
    )]
    InvalidIdentifier {
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid identifier")]
        span: Option<SourceSpan>,
        name: String,
        context: String,
        reason: String,
    },

    #[error("duplicate table '{name}'")]
    #[diagnostic(
        code(tablegen::duplicate_table),
        help("every table must appear once in the schema")
    )]
    DuplicateTable {
        #[source_code]
        src: NamedSource<String>,
        #[label("first defined here")]
        first_span: Option<SourceSpan>,
        #[label("defined again here")]
        second_span: Option<SourceSpan>,
        name: String,
    },

    #[error("duplicate column '{name}' in table '{table}'")]
    #[diagnostic(code(tablegen::duplicate_column))]
    DuplicateColumn {
        #[source_code]
        src: NamedSource<String>,
        #[label("defined again here")]
        span: Option<SourceSpan>,
        table: String,
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_has_span() {
        let ctx = SourceContext::new("[output\n", "tablegen.toml");
        let toml_err = toml::from_str::<toml::Table>(ctx.src()).unwrap_err();

        let err = ctx.parse_error(toml_err);

        assert_eq!(err.to_string(), "failed to parse tablegen.toml");
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }

    #[test]
    fn test_duplicate_table_message() {
        let ctx = SourceContext::new("", "schema.toml");
        let err = ctx.duplicate_table_error("users", None, None);
        assert_eq!(err.to_string(), "duplicate table 'users'");
    }
}
