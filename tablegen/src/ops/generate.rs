//! Generate operation - the run driver.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use eyre::{Context, Result};
use tablegen_codegen::{Assembler, EntityPlan, SingletonPlan, Table, TemplateSet};
use tablegen_manifest::{Manifest, Schema};

use crate::{
    language::LanguageSupport,
    reports::{Failure, GenerateReport},
};

/// Every template group of a project.
#[derive(Debug, Default)]
pub struct Templates {
    pub entity: TemplateSet,
    pub singleton: TemplateSet,
    pub test: TemplateSet,
    pub test_singleton: TemplateSet,
}

impl Templates {
    /// Load the template groups configured in `manifest`.
    ///
    /// The per-table directory must exist; the others are optional. Test
    /// groups are left empty when tests are disabled.
    pub fn load(manifest: &Manifest, base_dir: &Path) -> tablegen_codegen::Result<Self> {
        let dirs = &manifest.templates;
        let mut templates = Self {
            entity: TemplateSet::from_dir(&dirs.entity_dir(base_dir))?,
            singleton: TemplateSet::from_dir_if_exists(&dirs.singleton_dir(base_dir))?,
            ..Default::default()
        };

        if !manifest.output.no_tests {
            templates.test = TemplateSet::from_dir_if_exists(&dirs.test_dir(base_dir))?;
            templates.test_singleton =
                TemplateSet::from_dir_if_exists(&dirs.test_singleton_dir(base_dir))?;
        }

        Ok(templates)
    }

    /// Total number of templates.
    pub fn len(&self) -> usize {
        self.entity.len() + self.singleton.len() + self.test.len() + self.test_singleton.len()
    }
}

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Output directory for generated files.
    pub output_dir: &'a Path,
    /// Assemble and validate everything, write nothing.
    pub dry_run: bool,
    /// Keep going after a failure and report every failure at the end.
    pub keep_going: bool,
    /// Checked between tables; once set, remaining tables are skipped.
    pub cancel: Option<&'a AtomicBool>,
}

/// Execute the generate operation.
///
/// Generates singleton files, singleton test files, then the file and test
/// file of every table, in schema order.
pub fn generate(
    manifest: &Manifest,
    schema: &Schema,
    templates: &Templates,
    lang: &LanguageSupport,
    opts: GenerateOptions<'_>,
) -> Result<GenerateReport> {
    if !opts.dry_run {
        std::fs::create_dir_all(opts.output_dir).wrap_err_with(|| {
            format!(
                "Failed to create output directory {}",
                opts.output_dir.display()
            )
        })?;
    }

    let assembler = Assembler::new(
        lang.dialect(),
        &manifest.output.package,
        opts.output_dir,
        &manifest.imports,
    )
    .with_tables(&schema.tables);

    let mut run = Run {
        assembler,
        dry_run: opts.dry_run,
        report: GenerateReport {
            package: manifest.output.package.clone(),
            language: lang.language().to_string(),
            output_dir: opts.output_dir.to_path_buf(),
            dry_run: opts.dry_run,
            ..Default::default()
        },
    };

    let singleton_plans = [
        assembler.singleton_plan(&templates.singleton),
        assembler.singleton_test_plan(&templates.test_singleton),
    ];
    for plan in &singleton_plans {
        for template in plan.templates.names() {
            if !run.singleton(plan, template) && !opts.keep_going {
                return Ok(run.finish());
            }
        }
    }

    let entity_plans: Vec<EntityPlan<'_>> = [
        assembler.output_plan(&templates.entity),
        assembler.test_output_plan(&templates.test),
    ]
    .into_iter()
    .filter(|plan| !plan.templates.is_empty())
    .collect();

    for (index, table) in schema.tables.iter().enumerate() {
        if opts.cancel.is_some_and(|cancel| cancel.load(Ordering::Relaxed)) {
            let remaining = schema.tables.len() - index;
            tracing::warn!(remaining, "generation cancelled");
            run.report.cancelled = Some(remaining);
            break;
        }

        for plan in &entity_plans {
            if !run.entity(plan, table) && !opts.keep_going {
                return Ok(run.finish());
            }
        }
    }

    Ok(run.finish())
}

struct Run<'a> {
    assembler: Assembler<'a>,
    dry_run: bool,
    report: GenerateReport,
}

impl Run<'_> {
    /// Generate one table's file; false on failure.
    fn entity(&mut self, plan: &EntityPlan<'_>, table: &Table) -> bool {
        let result = if self.dry_run {
            self.assembler
                .assemble_entity(plan, table)
                .map(|file| file.map(|f| f.path().to_path_buf()))
        } else {
            self.assembler.execute_templates(plan, table)
        };

        match result {
            Ok(Some(path)) => self.written(path),
            Ok(None) => {
                if !self.report.skipped.contains(&table.name) {
                    self.report.skipped.push(table.name.clone());
                }
            }
            Err(error) => return self.failed(format!("table {}", table.name), error),
        }
        true
    }

    /// Generate one singleton template's file; false on failure.
    fn singleton(&mut self, plan: &SingletonPlan<'_>, template: &str) -> bool {
        let result = if self.dry_run {
            self.assembler
                .assemble_singleton(plan, template)
                .map(|file| file.path().to_path_buf())
        } else {
            self.assembler.execute_singleton_template(plan, template)
        };

        match result {
            Ok(path) => {
                self.written(path);
                true
            }
            Err(error) => self.failed(format!("singleton {}", template), error),
        }
    }

    fn written(&mut self, path: PathBuf) {
        self.report.files.push(path);
    }

    fn failed(&mut self, target: String, error: tablegen_codegen::Error) -> bool {
        tracing::warn!(item = %target, error = %error, "generation failed");
        self.report.failures.push(Failure { target, error });
        false
    }

    fn finish(self) -> GenerateReport {
        tracing::info!(
            files = self.report.files.len(),
            failures = self.report.failures.len(),
            dry_run = self.dry_run,
            "generation finished"
        );
        self.report
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tablegen_manifest::Language;
    use tempfile::TempDir;

    use super::*;

    const CONFIG: &str = "[output]\npackage = \"models\"\ndir = \"out\"\n";
    const SCHEMA: &str = r#"
[[tables]]
name = "users"
[[tables.columns]]
name = "id"
type = "i64"

[[tables]]
name = "user_roles"
join_table = true

[[tables]]
name = "posts"
[[tables.columns]]
name = "title"
type = "String"
"#;

    struct Project {
        dir: TempDir,
        manifest: Manifest,
        schema: Schema,
    }

    impl Project {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = TempDir::new().unwrap();
            for (path, content) in files {
                let path = dir.path().join(path);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }
            Self {
                dir,
                manifest: CONFIG.parse().unwrap(),
                schema: SCHEMA.parse().unwrap(),
            }
        }

        fn templates(&self) -> Templates {
            Templates::load(&self.manifest, self.dir.path()).unwrap()
        }

        fn out(&self) -> PathBuf {
            self.dir.path().join("out")
        }

        fn run(&self, dry_run: bool, keep_going: bool, cancel: Option<&AtomicBool>) -> GenerateReport {
            let out = self.out();
            generate(
                &self.manifest,
                &self.schema,
                &self.templates(),
                &LanguageSupport::get(Language::Rust),
                GenerateOptions {
                    output_dir: &out,
                    dry_run,
                    keep_going,
                    cancel,
                },
            )
            .unwrap()
        }
    }

    const MODEL: (&str, &str) = (
        "templates/00_model.tpl",
        "pub struct {{ table.name | pascal }} {\n{% for c in table.columns %}pub {{ c.name }}: {{ c.type }},\n{% endfor %}}\n",
    );

    #[test]
    fn test_generates_every_group() {
        let project = Project::new(&[
            MODEL,
            (
                "templates/singleton/01_tables.tpl",
                "pub const COUNT: usize = {{ tables | length }};\n",
            ),
            ("templates/test/model.tpl", "#[test]\nfn {{ table.name }}() {}\n"),
        ]);

        let report = project.run(false, false, None);

        assert!(report.is_success());
        assert_eq!(report.skipped, vec!["user_roles"]);
        let out = project.out();
        assert_eq!(
            report.files,
            vec![
                out.join("tables.rs"),
                out.join("users.rs"),
                out.join("users_test.rs"),
                out.join("posts.rs"),
                out.join("posts_test.rs"),
            ]
        );
        let tables = fs::read_to_string(out.join("tables.rs")).unwrap();
        assert!(tables.contains("pub const COUNT: usize = 3;"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let project = Project::new(&[MODEL]);

        let report = project.run(true, false, None);

        assert_eq!(report.files.len(), 2);
        assert!(!project.out().exists());
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let project = Project::new(&[
            MODEL,
            (
                "templates/01_check.tpl",
                "{% if table.name == 'users' %}fn broken({% endif %}\n",
            ),
        ]);

        let report = project.run(false, false, None);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].target, "table users");
        assert!(report.files.is_empty());
        assert!(!project.out().join("posts.rs").exists());
    }

    #[test]
    fn test_keep_going_collects_failures() {
        let project = Project::new(&[
            MODEL,
            (
                "templates/01_check.tpl",
                "{% if table.name == 'users' %}fn broken({% endif %}\n",
            ),
        ]);

        let report = project.run(false, true, None);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.files, vec![project.out().join("posts.rs")]);
        assert!(!project.out().join("users.rs").exists());
    }

    #[test]
    fn test_cancel_skips_remaining_tables() {
        let project = Project::new(&[MODEL]);
        let cancel = AtomicBool::new(true);

        let report = project.run(false, false, Some(&cancel));

        assert_eq!(report.cancelled, Some(3));
        assert!(report.files.is_empty());
        assert!(!report.is_success());
    }

    #[test]
    fn test_no_tests_skips_test_templates() {
        let mut project = Project::new(&[MODEL, ("templates/test/model.tpl", "fn t() {}\n")]);
        project.manifest.output.no_tests = true;

        let templates = project.templates();

        assert!(templates.test.is_empty());
        assert_eq!(templates.len(), 1);
    }

    #[test]
    fn test_missing_template_dir() {
        let project = Project::new(&[]);
        let err = Templates::load(&project.manifest, project.dir.path()).unwrap_err();
        assert!(matches!(err, tablegen_codegen::Error::TemplateLoad { .. }));
    }
}
