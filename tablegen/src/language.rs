//! Unified language dispatch.
//!
//! Maps the configured [`Language`] to the dialect that emits it.

use tablegen_codegen::Dialect;
use tablegen_codegen_go::GoDialect;
use tablegen_codegen_rust::RustDialect;
use tablegen_manifest::Language;

/// Language-specific support for generation.
pub struct LanguageSupport {
    language: Language,
    dialect: Box<dyn Dialect>,
}

impl LanguageSupport {
    /// Get language support for the given language.
    pub fn get(language: Language) -> Self {
        let dialect: Box<dyn Dialect> = match language {
            Language::Go => Box::new(GoDialect::new()),
            Language::Rust => Box::new(RustDialect),
        };
        Self { language, dialect }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_matches_language() {
        for language in [Language::Go, Language::Rust] {
            let support = LanguageSupport::get(language);
            assert_eq!(support.dialect().name(), language.as_str());
        }
    }
}
