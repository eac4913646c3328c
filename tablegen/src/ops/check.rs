//! Check operation - validate everything without writing.

use eyre::Result;
use tablegen_manifest::{Schema, TablegenToml};

use super::generate::{GenerateOptions, Templates, generate};
use crate::{
    language::LanguageSupport,
    reports::{CheckReport, Failure},
};

/// Execute the check operation.
///
/// Loads every template and assembles and formats every file the generate
/// operation would write, collecting every failure.
pub fn check(toml: &TablegenToml, schema: &Schema, lang: &LanguageSupport) -> Result<CheckReport> {
    let manifest = toml.manifest();
    let mut report = CheckReport {
        config_path: toml.path().to_path_buf(),
        table_count: schema.tables.len(),
        template_count: 0,
        file_count: 0,
        failures: Vec::new(),
    };

    let templates = match Templates::load(manifest, toml.base_dir()) {
        Ok(templates) => templates,
        Err(error) => {
            report.failures.push(Failure {
                target: "templates".to_string(),
                error,
            });
            return Ok(report);
        }
    };
    report.template_count = templates.len();

    let output_dir = toml.output_dir();
    let generated = generate(
        manifest,
        schema,
        &templates,
        lang,
        GenerateOptions {
            output_dir: &output_dir,
            dry_run: true,
            keep_going: true,
            cancel: None,
        },
    )?;

    report.file_count = generated.files.len();
    report.failures = generated.failures;
    Ok(report)
}
