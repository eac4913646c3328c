//! Entity descriptors produced by schema introspection.

use serde::{Deserialize, Serialize};

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as it appears in the database
    pub name: String,
    /// Semantic type (e.g. "int", "string", "time.Time")
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
        }
    }

    /// Mark the column as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A table to generate code for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Pure join tables carry no business logic and are never emitted.
    #[serde(default, alias = "join_table")]
    pub is_join_table: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            is_join_table: false,
        }
    }

    /// Append a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Mark the table as a join table.
    pub fn join_table(mut self) -> Self {
        self.is_join_table = true;
        self
    }

    /// Column types in column order, duplicates included.
    pub fn column_types(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.ty.as_str())
    }
}
