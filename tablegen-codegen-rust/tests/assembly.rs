//! End-to-end assembly of Rust modules.

use std::fs;

use tablegen_codegen::{Assembler, Error, ImportRegistry, ImportSet, TemplateSet, testing::list_files};
use tablegen_codegen_rust::RustDialect;
use tablegen_core::{Column, Table};
use tempfile::TempDir;

const MODEL: &str = "\
/// Row of `{{ table.name }}`.
#[derive(Debug, Clone)]
pub struct {{ table.name | pascal }} {
{%- for column in table.columns %}
    pub {{ column.name }}: {{ column.type }},
{%- endfor %}
}
";

fn registry() -> ImportRegistry {
    let mut registry = ImportRegistry {
        all: ImportSet::new().third_party(["serde::Serialize"]),
        ..Default::default()
    };
    registry.based_on_type.insert(
        "DateTime<Utc>".to_string(),
        ImportSet::new().third_party(["chrono::{DateTime, Utc}"]),
    );
    registry
}

fn users() -> Table {
    Table::new("users")
        .column(Column::new("id", "i64"))
        .column(Column::new("created_at", "DateTime<Utc>"))
        .column(Column::new("updated_at", "DateTime<Utc>"))
}

#[test]
fn test_buffer_before_formatting() {
    let registry = registry();
    let assembler = Assembler::new(&RustDialect, "models", std::path::Path::new("."), &registry);
    let templates = TemplateSet::new().with("00_model.tpl", MODEL).unwrap();

    let buffer = assembler
        .render_entity(&assembler.output_plan(&templates), &users())
        .unwrap()
        .unwrap();

    insta::assert_snapshot!(String::from_utf8(buffer).unwrap(), @r#"
    // Code generated by tablegen. DO NOT EDIT.
    // This file is meant to be re-generated in place and/or deleted at any time.

    //! Package `models`.

    use chrono::{DateTime, Utc};
    use serde::Serialize;

    /// Row of `users`.
    #[derive(Debug, Clone)]
    pub struct Users {
        pub id: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
    "#);
}

#[test]
fn test_generates_formatted_module() {
    let temp = TempDir::new().unwrap();
    let registry = registry();
    let assembler = Assembler::new(&RustDialect, "models", temp.path(), &registry);
    let templates = TemplateSet::new().with("00_model.tpl", MODEL).unwrap();

    let path = assembler.generate_output(&templates, &users()).unwrap().unwrap();

    assert_eq!(path, temp.path().join("users.rs"));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(
        "// Code generated by tablegen. DO NOT EDIT.\n\
         // This file is meant to be re-generated in place and/or deleted at any time.\n\n\
         //! Package `models`.\n"
    ));
    assert_eq!(content.matches("use chrono::{DateTime, Utc};").count(), 1);
    assert!(content.contains("use serde::Serialize;"));
    assert!(content.contains("/// Row of `users`."));
    assert!(content.contains("pub struct Users {\n    pub id: i64,\n    pub created_at: DateTime<Utc>,\n"));
}

#[test]
fn test_template_comments_survive_formatting() {
    let temp = TempDir::new().unwrap();
    let registry = ImportRegistry {
        all: ImportSet::new().standard(["std::fmt"]),
        ..Default::default()
    };
    let assembler = Assembler::new(&RustDialect, "models", temp.path(), &registry);
    let templates = TemplateSet::new()
        .with(
            "00_model.tpl",
            "// user model\npub struct Users {\n    // SAFETY: keep in sync\n    pub id: i64,\n}\n",
        )
        .unwrap();

    let path = assembler
        .generate_output(&templates, &Table::new("users"))
        .unwrap()
        .unwrap();

    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("\n// user model\npub struct Users {\n"), "{content}");
    assert!(content.contains("    // SAFETY: keep in sync\n    pub id: i64,\n"), "{content}");
}

#[test]
fn test_users_model_file() {
    let temp = TempDir::new().unwrap();
    let mut registry = ImportRegistry::default();
    registry
        .based_on_type
        .insert("string".to_string(), ImportSet::new().standard(["strings"]));
    let assembler = Assembler::new(&RustDialect, "models", temp.path(), &registry);
    let templates = TemplateSet::new()
        .with("00_model.tpl", "// user model\n")
        .unwrap();
    let users = Table::new("users")
        .column(Column::new("id", "int"))
        .column(Column::new("email", "string"));

    let path = assembler.generate_output(&templates, &users).unwrap().unwrap();

    assert_eq!(path, temp.path().join("users.rs"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "// Code generated by tablegen. DO NOT EDIT.\n\
         // This file is meant to be re-generated in place and/or deleted at any time.\n\
         \n\
         //! Package `models`.\n\
         \n\
         use strings;\n\
         \n\
         // user model\n"
    );
}

#[test]
fn test_regeneration_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    let registry = registry();
    let assembler = Assembler::new(&RustDialect, "models", temp.path(), &registry);
    let templates = TemplateSet::new().with("00_model.tpl", MODEL).unwrap();

    assembler.generate_output(&templates, &users()).unwrap();
    let first = fs::read(temp.path().join("users.rs")).unwrap();
    assembler.generate_output(&templates, &users()).unwrap();
    let second = fs::read(temp.path().join("users.rs")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_invalid_module_reports_excerpt() {
    let temp = TempDir::new().unwrap();
    let registry = ImportRegistry::default();
    let assembler = Assembler::new(&RustDialect, "models", temp.path(), &registry);
    let templates = TemplateSet::new()
        .with("00_model.tpl", MODEL)
        .unwrap()
        .with("01_broken.tpl", "let count = 1;\n")
        .unwrap();

    let err = assembler.generate_output(&templates, &users()).unwrap_err();

    let Error::Format { file, excerpt, .. } = &err else {
        panic!("expected a format error, got {err:?}");
    };
    assert_eq!(file, "users.rs");
    let excerpt = excerpt.as_deref().expect("located error");
    assert!(excerpt.contains(">>>> let count = 1;"), "excerpt:\n{excerpt}");
    assert!(list_files(temp.path()).is_empty());
}

#[test]
fn test_singleton_and_test_files() {
    let temp = TempDir::new().unwrap();
    let mut registry = registry();
    registry.test = ImportSet::new().standard(["super::*"]);
    let tables = vec![users(), Table::new("posts")];
    let assembler =
        Assembler::new(&RustDialect, "models", temp.path(), &registry).with_tables(&tables);

    let singletons = TemplateSet::new()
        .with(
            "00_tables.tpl",
            "pub const TABLES: &[&str] = &[{% for t in tables %}\"{{ t.name }}\", {% endfor %}];\n",
        )
        .unwrap();
    let tests = TemplateSet::new()
        .with(
            "model_test.tpl",
            "#[test]\nfn {{ table.name }}_name() { assert_eq!(\"{{ table.name }}\", \"{{ table.name }}\"); }\n",
        )
        .unwrap();

    assembler.generate_singleton_output(&singletons).unwrap();
    assembler.generate_test_output(&tests, &users()).unwrap();

    assert_eq!(list_files(temp.path()), vec!["tables.rs", "users_test.rs"]);
    let tables_file = fs::read_to_string(temp.path().join("tables.rs")).unwrap();
    assert!(tables_file.contains("pub const TABLES: &[&str] = &[\"users\", \"posts\"];"));
    let test_file = fs::read_to_string(temp.path().join("users_test.rs")).unwrap();
    assert!(test_file.contains("use super::*;"));
    assert!(!test_file.contains("chrono"));
}
