//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// A file, or group of files, that failed to generate.
#[derive(Debug)]
pub struct Failure {
    /// What was being generated, e.g. "table users" or "singleton templates".
    pub target: String,
    pub error: tablegen_codegen::Error,
}

/// Report data from a generation run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Package of the generated files.
    pub package: String,
    /// Target language.
    pub language: String,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Whether files were only validated, not written.
    pub dry_run: bool,
    /// Files written, or that would be written in a dry run.
    pub files: Vec<PathBuf>,
    /// Join tables, which get no files.
    pub skipped: Vec<String>,
    /// Everything that failed.
    pub failures: Vec<Failure>,
    /// Tables left unprocessed because the run was cancelled.
    pub cancelled: Option<usize>,
}

impl GenerateReport {
    /// Whether every file was generated.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled.is_none()
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for failure in &self.failures {
            out.warning(&format!("failed to generate {}", failure.target));
            out.diagnostic(&failure.error);
        }

        if let Some(remaining) = self.cancelled {
            out.warning(&format!("cancelled with {} tables left", remaining));
        }

        if self.dry_run {
            out.section("Would generate");
        } else {
            out.section("Generated");
        }
        for file in &self.files {
            out.added_item(&file.display().to_string());
        }

        if !self.skipped.is_empty() {
            out.newline();
            out.section("Skipped join tables");
            for table in &self.skipped {
                out.list_item(table);
            }
        }

        out.newline();
        let verb = if self.dry_run { "would be generated" } else { "generated" };
        out.preformatted(&format!(
            "{} {} files {} in {} (package {})",
            self.files.len(),
            self.language,
            verb,
            self.output_dir.display(),
            self.package
        ));
        if !self.failures.is_empty() {
            out.preformatted(&format!("{} failed", self.failures.len()));
        }
    }
}
