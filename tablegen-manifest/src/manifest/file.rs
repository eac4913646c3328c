use std::path::{Path, PathBuf};

use super::Manifest;
use crate::{Error, Language, Result, validate::ParseContext};

/// A tablegen.toml on disk: its location, raw content and parsed manifest.
///
/// Relative paths in the manifest resolve against the directory holding the
/// file.
#[derive(Debug)]
pub struct TablegenToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl TablegenToml {
    /// Open and parse a tablegen.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    /// Generate for `language` instead of the configured one.
    ///
    /// The package name is checked again, since a name that is fine in one
    /// language can be a keyword in another.
    pub fn override_language(&mut self, language: Language) -> Result<()> {
        let filename = self.path.display().to_string();
        ParseContext::new(&self.content, &filename).validate_name(
            &self.manifest.output.package,
            "package",
            language,
        )?;
        self.manifest.output.language = language;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Resolve a manifest-relative path.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_dir().join(path)
    }

    /// The configured output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.manifest.output.dir)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_open_resolves_relative_paths() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tablegen.toml");
        fs::write(&path, "[output]\npackage = \"models\"\ndir = \"gen\"\n").unwrap();

        let toml = TablegenToml::open(&path).unwrap();

        assert_eq!(toml.base_dir(), temp.path());
        assert_eq!(toml.output_dir(), temp.path().join("gen"));
        assert_eq!(
            toml.manifest().templates.singleton_dir(toml.base_dir()),
            temp.path().join("templates").join("singleton")
        );
        assert!(toml.content().contains("models"));
    }

    #[test]
    fn test_open_missing() {
        let temp = TempDir::new().unwrap();
        let err = TablegenToml::open(temp.path().join("tablegen.toml")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_override_language_checks_package() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tablegen.toml");
        fs::write(&path, "[output]\npackage = \"func\"\nlanguage = \"rust\"\n").unwrap();
        let mut toml = TablegenToml::open(&path).unwrap();

        let err = toml.override_language(Language::Go).unwrap_err();

        assert_eq!(err.to_string(), "'func' is a Go reserved keyword");
        assert!(matches!(*err, Error::ReservedKeyword { .. }));
        assert_eq!(toml.manifest().output.language, Language::Rust);
    }

    #[test]
    fn test_override_language() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tablegen.toml");
        fs::write(&path, "[output]\npackage = \"models\"\n").unwrap();
        let mut toml = TablegenToml::open(&path).unwrap();

        toml.override_language(Language::Go).unwrap();

        assert_eq!(toml.manifest().output.language, Language::Go);
    }

    #[test]
    fn test_bare_file_name_resolves_to_cwd() {
        let toml = TablegenToml {
            path: PathBuf::from("tablegen.toml"),
            content: String::new(),
            manifest: "[output]\npackage = \"m\"\n".parse().unwrap(),
        };
        assert_eq!(toml.base_dir(), Path::new("."));
    }
}
