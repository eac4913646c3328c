use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use tablegen_manifest::{MANIFEST_FILE, SCHEMA_FILE, Schema, TablegenToml};

use super::UnwrapOrExit;
use crate::{
    language::LanguageSupport,
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to tablegen.toml
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,

    /// Path to the schema file [default: schema.toml next to the config]
    #[arg(short, long)]
    pub schema: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let toml = TablegenToml::open(&self.config).unwrap_or_exit();
        let schema_path = match &self.schema {
            Some(path) => path.clone(),
            None => toml.resolve(SCHEMA_FILE),
        };
        let schema = Schema::from_file(&schema_path).unwrap_or_exit();
        let lang = LanguageSupport::get(toml.manifest().output.language);

        let report = ops::check(&toml, &schema, &lang)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
