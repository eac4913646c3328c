//! Check command report data structures.

use std::path::PathBuf;

use super::{
    Failure,
    output::{Output, Report},
};

/// Report data from validating configuration, schema and templates.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Number of tables in the schema.
    pub table_count: usize,
    /// Number of templates loaded.
    pub template_count: usize,
    /// Number of files that assembled and formatted cleanly.
    pub file_count: usize,
    /// Everything that failed.
    pub failures: Vec<Failure>,
}

impl CheckReport {
    /// Whether the check passed (no failures).
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for failure in &self.failures {
            out.warning(&format!("{} is invalid", failure.target));
            out.diagnostic(&failure.error);
        }

        if !self.failures.is_empty() {
            out.newline();
        }

        if self.is_valid() {
            out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        }
        out.key_value("Tables", &self.table_count.to_string());
        out.key_value("Templates", &self.template_count.to_string());
        out.key_value("Valid files", &self.file_count.to_string());
    }
}
