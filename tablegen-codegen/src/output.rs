//! Per-table and singleton file assembly.
//!
//! Assembly of one file goes: fresh buffer, header (disclaimer, namespace,
//! imports), rendered templates, syntax validation, write. Every step that
//! can fail aborts the file before anything touches the disk, so a written
//! file is always complete and canonically formatted.
//!
//! Each assembly allocates its own buffer, so an [`Assembler`] can be shared
//! by threads generating distinct tables.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tablegen_core::{File, ImportRegistry, ImportSet, Table, singleton_name, with_type_imports};

use crate::{
    Dialect, Error, Result, TemplateSet, format::format_buffer, header::write_header,
    template::TemplateData,
};

/// How to generate one file per table.
#[derive(Debug, Clone, Copy)]
pub struct EntityPlan<'a> {
    /// Templates to run, in order, into each table's file.
    pub templates: &'a TemplateSet,
    /// Base imports of every file.
    pub imports: &'a ImportSet,
    /// Whether to add imports registered for the table's column types.
    pub combine_imports_on_type: bool,
    /// Appended to the table name to form the file name.
    pub suffix: &'a str,
}

/// How to generate one file per singleton template.
#[derive(Debug, Clone, Copy)]
pub struct SingletonPlan<'a> {
    pub templates: &'a TemplateSet,
    /// Imports keyed by derived template name.
    pub imports: &'a IndexMap<String, ImportSet>,
    pub suffix: &'a str,
}

/// Assembles, validates and writes generated files for one package.
#[derive(Clone, Copy)]
pub struct Assembler<'a> {
    dialect: &'a dyn Dialect,
    package: &'a str,
    out_dir: &'a Path,
    imports: &'a ImportRegistry,
    tables: &'a [Table],
}

impl<'a> Assembler<'a> {
    pub fn new(
        dialect: &'a dyn Dialect,
        package: &'a str,
        out_dir: &'a Path,
        imports: &'a ImportRegistry,
    ) -> Self {
        Self {
            dialect,
            package,
            out_dir,
            imports,
            tables: &[],
        }
    }

    /// Expose every table of the schema to templates as `tables`.
    pub fn with_tables(mut self, tables: &'a [Table]) -> Self {
        self.tables = tables;
        self
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn out_dir(&self) -> &'a Path {
        self.out_dir
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    /// Plan for regular per-table files: default imports widened by column
    /// types, dialect extension.
    pub fn output_plan<'t>(&self, templates: &'t TemplateSet) -> EntityPlan<'t>
    where
        'a: 't,
    {
        EntityPlan {
            templates,
            imports: &self.imports.all,
            combine_imports_on_type: true,
            suffix: self.dialect.extension(),
        }
    }

    /// Plan for per-table test files: test imports only, test suffix.
    pub fn test_output_plan<'t>(&self, templates: &'t TemplateSet) -> EntityPlan<'t>
    where
        'a: 't,
    {
        EntityPlan {
            templates,
            imports: &self.imports.test,
            combine_imports_on_type: false,
            suffix: self.dialect.test_suffix(),
        }
    }

    pub fn singleton_plan<'t>(&self, templates: &'t TemplateSet) -> SingletonPlan<'t>
    where
        'a: 't,
    {
        SingletonPlan {
            templates,
            imports: &self.imports.singleton,
            suffix: self.dialect.extension(),
        }
    }

    /// Plan for singleton test files. The derived template name already
    /// carries its test marker (`boil_main_test.tpl` -> `boil_main_test`), so
    /// the plain extension is used.
    pub fn singleton_test_plan<'t>(&self, templates: &'t TemplateSet) -> SingletonPlan<'t>
    where
        'a: 't,
    {
        SingletonPlan {
            templates,
            imports: &self.imports.test_singleton,
            suffix: self.dialect.extension(),
        }
    }

    // ------------------------------------------------------------------
    // Per-table output
    // ------------------------------------------------------------------

    /// Generate the regular file of a table.
    pub fn generate_output(&self, templates: &TemplateSet, table: &Table) -> Result<Option<PathBuf>> {
        self.execute_templates(&self.output_plan(templates), table)
    }

    /// Generate the test file of a table.
    pub fn generate_test_output(
        &self,
        templates: &TemplateSet,
        table: &Table,
    ) -> Result<Option<PathBuf>> {
        self.execute_templates(&self.test_output_plan(templates), table)
    }

    /// Assemble, validate and write the file of `table`.
    ///
    /// Returns the written path, or `None` for join tables, which are
    /// skipped without error.
    pub fn execute_templates(&self, plan: &EntityPlan<'_>, table: &Table) -> Result<Option<PathBuf>> {
        match self.assemble_entity(plan, table)? {
            Some(file) => self.write(&file).map(Some),
            None => {
                tracing::debug!(table = %table.name, "skipping join table");
                Ok(None)
            }
        }
    }

    /// Assemble and validate the file of `table` without writing it.
    pub fn assemble_entity(&self, plan: &EntityPlan<'_>, table: &Table) -> Result<Option<File>> {
        let Some(buffer) = self.render_entity(plan, table)? else {
            return Ok(None);
        };

        if !is_plain_file_stem(&table.name) {
            return Err(Error::InvalidFileName {
                name: table.name.clone(),
            });
        }

        let file_name = format!("{}{}", table.name, plan.suffix);
        let formatted = format_buffer(self.dialect, &file_name, &buffer)?;
        Ok(Some(File::new(self.out_dir.join(file_name), formatted)))
    }

    /// Build the unformatted buffer of `table`'s file.
    pub fn render_entity(&self, plan: &EntityPlan<'_>, table: &Table) -> Result<Option<Vec<u8>>> {
        if table.is_join_table {
            return Ok(None);
        }

        let imports = if plan.combine_imports_on_type {
            with_type_imports(
                plan.imports,
                &self.imports.based_on_type,
                table.column_types(),
            )
        } else {
            plan.imports.clone()
        };

        let mut out = Vec::new();
        write_header(&mut out, self.dialect, self.package, &imports);

        let data = self.data(Some(table));
        for name in plan.templates.names() {
            plan.templates.execute(name, &data, &mut out)?;
        }

        Ok(Some(out))
    }

    // ------------------------------------------------------------------
    // Singleton output
    // ------------------------------------------------------------------

    /// Generate every singleton file.
    pub fn generate_singleton_output(&self, templates: &TemplateSet) -> Result<Vec<PathBuf>> {
        self.execute_singleton_templates(&self.singleton_plan(templates))
    }

    /// Generate every singleton test file.
    pub fn generate_singleton_test_output(&self, templates: &TemplateSet) -> Result<Vec<PathBuf>> {
        self.execute_singleton_templates(&self.singleton_test_plan(templates))
    }

    /// Generate one file per template of the plan.
    ///
    /// Every template is attempted even after a failure. Files that assemble
    /// cleanly are written; all failures are returned together.
    pub fn execute_singleton_templates(&self, plan: &SingletonPlan<'_>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        let mut errors = Vec::new();

        for template in plan.templates.names() {
            match self.execute_singleton_template(plan, template) {
                Ok(path) => written.push(path),
                Err(err) => {
                    tracing::warn!(template = %template, error = %err, "singleton template failed");
                    errors.push(err);
                }
            }
        }

        match Error::from_many(errors) {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }

    /// Assemble, validate and write the file of one singleton template.
    pub fn execute_singleton_template(&self, plan: &SingletonPlan<'_>, template: &str) -> Result<PathBuf> {
        let file = self.assemble_singleton(plan, template)?;
        self.write(&file)
    }

    /// Assemble and validate the file of one singleton template without
    /// writing it.
    pub fn assemble_singleton(&self, plan: &SingletonPlan<'_>, template: &str) -> Result<File> {
        let buffer = self.render_singleton(plan, template)?;
        let file_name = format!("{}{}", singleton_name(template), plan.suffix);
        let formatted = format_buffer(self.dialect, &file_name, &buffer)?;
        Ok(File::new(self.out_dir.join(file_name), formatted))
    }

    /// Build the unformatted buffer of one singleton template's file.
    pub fn render_singleton(&self, plan: &SingletonPlan<'_>, template: &str) -> Result<Vec<u8>> {
        let empty = ImportSet::new();
        let imports = plan
            .imports
            .get(singleton_name(template))
            .unwrap_or(&empty);

        let mut out = Vec::new();
        write_header(&mut out, self.dialect, self.package, imports);
        plan.templates
            .execute(template, &self.data(None), &mut out)?;

        Ok(out)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn data<'t>(&self, table: Option<&'t Table>) -> TemplateData<'t>
    where
        'a: 't,
    {
        TemplateData {
            package: self.package,
            dialect: self.dialect.name(),
            table,
            tables: self.tables,
        }
    }

    fn write(&self, file: &File) -> Result<PathBuf> {
        file.write().map_err(|source| Error::Write {
            path: file.path().to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %file.path().display(), bytes = file.content().len(), "wrote file");
        Ok(file.path().to_path_buf())
    }
}

/// Whether `name` stays inside the output directory when used as a file
/// stem: non-empty, no separators, not a `.` or `..` component.
fn is_plain_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !Path::new(name).is_absolute()
}

impl std::fmt::Debug for Assembler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assembler")
            .field("dialect", &self.dialect.name())
            .field("package", &self.package)
            .field("out_dir", &self.out_dir)
            .finish()
    }
}
