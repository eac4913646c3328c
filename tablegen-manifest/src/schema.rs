//! Table descriptions read from schema.toml.
//!
//! ```toml
//! [[tables]]
//! name = "users"
//!
//! [[tables.columns]]
//! name = "id"
//! type = "int"
//!
//! [[tables]]
//! name = "user_roles"
//! join_table = true
//! ```

use std::{collections::HashSet, path::Path, str::FromStr};

use serde::Deserialize;
use tablegen_core::Table;

use crate::{
    Error, Result,
    error::SourceContext,
    validate::{ParseContext, find_name_spans, validate_identifier},
};

/// Default schema file name.
pub const SCHEMA_FILE: &str = "schema.toml";

/// Every table the generator produces files for, in schema order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl FromStr for Schema {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_schema(s, SCHEMA_FILE)
    }
}

impl Schema {
    /// Parse a schema file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_schema(&content, &path.display().to_string())
    }

    /// Parse a schema from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_schema(content, filename)
    }
}

fn parse_schema(content: &str, filename: &str) -> Result<Schema> {
    let source_ctx = SourceContext::new(content, filename);
    let schema: Schema = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_schema(&schema, &ParseContext::new(content, filename))?;
    Ok(schema)
}

fn validate_schema<'a>(schema: &'a Schema, ctx: &ParseContext<'a>) -> Result<()> {
    let source = ctx.source_context();
    let mut seen = HashSet::new();

    for table in &schema.tables {
        if table.name.trim().is_empty() {
            return Err(source.validation_error(
                "table name cannot be empty",
                find_name_spans(ctx.src(), &table.name).first().copied(),
            ));
        }

        // Table names become file names in the output directory.
        if let Some(reason) = validate_identifier(&table.name) {
            return Err(source.invalid_identifier_error(
                &table.name,
                "table",
                reason,
                find_name_spans(ctx.src(), &table.name).first().copied(),
            ));
        }

        if !seen.insert(table.name.as_str()) {
            let spans = find_name_spans(ctx.src(), &table.name);
            return Err(source.duplicate_table_error(
                &table.name,
                spans.first().copied(),
                spans.get(1).copied(),
            ));
        }

        validate_columns(table, &ctx.push(&table.name))?;
    }

    Ok(())
}

fn validate_columns(table: &Table, ctx: &ParseContext<'_>) -> Result<()> {
    let source = ctx.source_context();
    let table_offset = find_name_spans(ctx.src(), &table.name)
        .first()
        .map(|span| span.offset())
        .unwrap_or(0);
    // Occurrences of a column name after the table's own entry.
    let spans_in_table = |name: &str| {
        find_name_spans(ctx.src(), name)
            .into_iter()
            .filter(|span| span.offset() > table_offset)
            .collect::<Vec<_>>()
    };

    let mut seen = HashSet::new();
    for column in &table.columns {
        if column.name.trim().is_empty() {
            return Err(source.validation_error(
                format!("{} cannot have an empty name", ctx.context_for("column")),
                spans_in_table(&column.name).first().copied(),
            ));
        }

        if column.ty.trim().is_empty() {
            return Err(source.validation_error(
                format!(
                    "{} '{}' has an empty type",
                    ctx.context_for("column"),
                    column.name
                ),
                spans_in_table(&column.name).first().copied(),
            ));
        }

        if !seen.insert(column.name.as_str()) {
            return Err(source.duplicate_column_error(
                &table.name,
                &column.name,
                spans_in_table(&column.name).get(1).copied(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = r#"
[[tables]]
name = "users"

[[tables.columns]]
name = "id"
type = "int"

[[tables.columns]]
name = "email"
type = "string"
nullable = true

[[tables]]
name = "user_roles"
join_table = true
"#;

    #[test]
    fn test_parse() {
        let schema = Schema::from_str(USERS).unwrap();

        assert_eq!(schema.tables.len(), 2);
        let users = &schema.tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.columns.len(), 2);
        assert_eq!(users.columns[0].ty, "int");
        assert!(users.columns[1].nullable);
        assert!(!users.is_join_table);
        assert!(schema.tables[1].is_join_table);
    }

    #[test]
    fn test_empty_schema() {
        assert!(Schema::from_str("").unwrap().tables.is_empty());
    }

    #[test]
    fn test_duplicate_table() {
        let src = "[[tables]]\nname = \"users\"\n\n[[tables]]\nname = \"users\"\n";
        let err = Schema::from_str(src).unwrap_err();

        match *err {
            Error::DuplicateTable {
                ref name,
                first_span,
                second_span,
                ..
            } => {
                assert_eq!(name, "users");
                assert_eq!(first_span.unwrap().offset(), 19);
                assert_eq!(second_span.unwrap().offset(), 46);
            }
            ref other => panic!("expected duplicate table, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_column_points_inside_table() {
        let src = r#"
[[tables]]
name = "posts"
[[tables.columns]]
name = "id"
type = "int"

[[tables]]
name = "users"
[[tables.columns]]
name = "id"
type = "int"
[[tables.columns]]
name = "id"
type = "string"
"#;
        let err = Schema::from_str(src).unwrap_err();

        match *err {
            Error::DuplicateColumn {
                ref table,
                ref name,
                span,
                ..
            } => {
                assert_eq!(table, "users");
                assert_eq!(name, "id");
                let offset = span.unwrap().offset();
                assert_eq!(&src[offset..offset + 2], "id");
                assert!(offset > src.rfind("type = \"int\"").unwrap());
            }
            ref other => panic!("expected duplicate column, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_names() {
        let err = Schema::from_str("[[tables]]\nname = \"\"\n").unwrap_err();
        assert_eq!(err.to_string(), "table name cannot be empty");

        let err = Schema::from_str(
            "[[tables]]\nname = \"users\"\n[[tables.columns]]\nname = \"\"\ntype = \"int\"\n",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "column in 'users' cannot have an empty name");
    }

    #[test]
    fn test_table_name_must_be_identifier() {
        for name in ["../escaped", "nested/users", "/abs/users", "user roles", "1users"] {
            let src = format!("[[tables]]\nname = \"{name}\"\n");
            let err = Schema::from_str(&src).unwrap_err();

            match *err {
                Error::InvalidIdentifier {
                    name: ref found,
                    ref context,
                    span,
                    ..
                } => {
                    assert_eq!(found, name);
                    assert_eq!(context, "table");
                    assert_eq!(span.unwrap().offset(), 19);
                }
                ref other => panic!("expected invalid identifier for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_column_type() {
        let err = Schema::from_str("[[tables]]\nname = \"users\"\n[[tables.columns]]\nname = \"id\"\n")
            .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }
}
