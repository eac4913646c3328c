//! Configuration types and parsing for tablegen.toml files.

mod file;
mod language;
mod parse;

use std::path::{Path, PathBuf};

pub use file::TablegenToml;
pub use language::Language;
use serde::Deserialize;
use tablegen_core::ImportRegistry;

/// Subdirectory of the template root holding singleton templates.
pub const SINGLETON_DIR: &str = "singleton";
/// Subdirectory of the template root holding test templates.
pub const TEST_DIR: &str = "test";

/// Root configuration for tablegen.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Where and what to generate
    pub output: OutputConfig,

    /// Template locations
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Import rules for generated files
    #[serde(default)]
    pub imports: ImportRegistry,
}

/// The `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Package/namespace of every generated file
    pub package: String,

    /// Output directory, relative to the configuration file
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Target language
    #[serde(default)]
    pub language: Language,

    /// Skip test templates
    #[serde(default)]
    pub no_tests: bool,
}

/// The `[templates]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Template root, relative to the configuration file
    #[serde(default = "default_templates_dir")]
    pub dir: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
        }
    }
}

impl TemplatesConfig {
    /// Per-table templates.
    pub fn entity_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.dir)
    }

    /// Singleton templates.
    pub fn singleton_dir(&self, base: &Path) -> PathBuf {
        self.entity_dir(base).join(SINGLETON_DIR)
    }

    /// Per-table test templates.
    pub fn test_dir(&self, base: &Path) -> PathBuf {
        self.entity_dir(base).join(TEST_DIR)
    }

    /// Singleton test templates.
    pub fn test_singleton_dir(&self, base: &Path) -> PathBuf {
        self.test_dir(base).join(SINGLETON_DIR)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}
