//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use super::Manifest;
use crate::{Error, MANIFEST_FILE, Result, error::SourceContext, validate::ParseContext};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, MANIFEST_FILE)
    }
}

impl Manifest {
    /// Parse a tablegen.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a tablegen.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, content, filename)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &Manifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);
    let language = manifest.output.language;

    ctx.validate_name(&manifest.output.package, "package", language)?;

    let imports = &manifest.imports;
    let keyed = imports
        .based_on_type
        .iter()
        .chain(&imports.singleton)
        .chain(&imports.test_singleton);
    let sets = [("all", &imports.all), ("test", &imports.test)]
        .into_iter()
        .chain(keyed.map(|(key, set)| (key.as_str(), set)));

    for (key, set) in sets {
        if set.standard.iter().chain(&set.third_party).any(|i| i.trim().is_empty()) {
            return Err(ctx.source_context().validation_error(
                format!("empty import in '{}'", key),
                ctx.find_span(key),
            ));
        }
    }

    Ok(())
}
