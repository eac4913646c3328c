use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use tablegen_manifest::{Language, MANIFEST_FILE, SCHEMA_FILE, Schema, TablegenToml};

use super::UnwrapOrExit;
use crate::{
    language::LanguageSupport,
    ops::{self, GenerateOptions, Templates},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to tablegen.toml
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,

    /// Path to the schema file [default: schema.toml next to the config]
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Output directory (overrides tablegen.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target language (overrides tablegen.toml)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Assemble and validate every file without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Keep generating after a failure and report every failure at the end
    #[arg(long)]
    pub keep_going: bool,

    /// Skip test templates
    #[arg(long)]
    pub no_tests: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let mut toml = TablegenToml::open(&self.config).unwrap_or_exit();
        if let Some(language) = self.language {
            toml.override_language(language).unwrap_or_exit();
        }
        let schema_path = match &self.schema {
            Some(path) => path.clone(),
            None => toml.resolve(SCHEMA_FILE),
        };
        let schema = Schema::from_file(&schema_path).unwrap_or_exit();

        let mut manifest = toml.manifest().clone();
        manifest.output.no_tests |= self.no_tests;
        let language = manifest.output.language;
        let output_dir = self.output.clone().unwrap_or_else(|| toml.output_dir());

        let templates = Templates::load(&manifest, toml.base_dir()).unwrap_or_exit();
        let report = ops::generate(
            &manifest,
            &schema,
            &templates,
            &LanguageSupport::get(language),
            GenerateOptions {
                output_dir: &output_dir,
                dry_run: self.dry_run,
                keep_going: self.keep_going,
                cancel: None,
            },
        )?;

        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
