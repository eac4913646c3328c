//! Validation context and identifier rules.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Language, Result, error::SourceContext};

/// Validation context that carries source information.
///
/// Shares one [`SourceContext`] across nested contexts and tracks the path
/// through the document (e.g. `tables.users`) for error messages.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "schema.toml");
/// ctx.validate_name("users", "table", Language::Go)?;
///
/// let table = ctx.push("users");
/// table.context_for("column"); // "column in 'users'"
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    source: Arc<SourceContext>,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        self.source.src()
    }

    pub fn filename(&self) -> &str {
        self.source.filename()
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Describe `kind` at the current path, e.g. "column in 'users'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Find the span of a name in the source.
    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_span(self.source.src(), name)
    }

    /// Validate that a name is usable as an identifier in `language`.
    pub fn validate_name(&self, name: &str, kind: &str, language: Language) -> Result<()> {
        if is_keyword(name, language) {
            return Err(self.source.reserved_keyword_error(
                name,
                self.context_for(kind),
                language.display_name(),
                self.find_span(name),
            ));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_span(name),
            ));
        }

        Ok(())
    }
}

/// Rust reserved keywords that cannot be used as identifiers
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // Strict keywords
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // Reserved keywords
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

/// Go keywords that cannot be used as identifiers
pub(crate) const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

/// Check if a name is a reserved keyword of `language`
pub(crate) fn is_keyword(name: &str, language: Language) -> bool {
    match language {
        Language::Rust => RUST_KEYWORDS.contains(&name),
        Language::Go => GO_KEYWORDS.contains(&name),
    }
}

/// Find the span of a name in the TOML source.
///
/// Looks for `name = "value"` (the shape of `[[tables]]` entries) and for
/// dotted table headers such as `[imports.singleton.name]`.
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    find_name_spans(src, name).into_iter().next().or_else(|| {
        [format!(".{}]", name), format!(".{}.", name)]
            .iter()
            .find_map(|pattern| src.find(pattern.as_str()))
            .map(|pos| SourceSpan::from((pos + 1, name.len())))
    })
}

/// Find every `name = "value"` occurrence of a name, in source order.
pub(crate) fn find_name_spans(src: &str, name: &str) -> Vec<SourceSpan> {
    let mut spans = Vec::new();
    for quote in ['"', '\''] {
        let pattern = format!("name = {quote}{name}{quote}");
        spans.extend(
            src.match_indices(&pattern)
                // The name starts after 'name = "' (8 characters)
                .map(|(pos, _)| SourceSpan::from((pos + 8, name.len()))),
        );
    }
    spans.sort_by_key(|span| span.offset());
    spans
}

/// Validate that a name is a plain identifier.
///
/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}
