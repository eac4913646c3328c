//! Test utilities for output assembly.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::path::Path;

use crate::{Dialect, FormatError, ImportSet};

/// A minimal in-process dialect for exercising assembly without a real
/// formatter.
///
/// - namespace: `package <name>`
/// - imports: one `import <path>` line each, a blank line between tiers
/// - formatting: braces must balance; trailing whitespace is trimmed, runs
///   of blank lines collapse to one, leading and trailing blank lines are
///   dropped
///
/// Unbalanced braces are reported as `line:column: ...`, like a real
/// formatter would.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceDialect;

impl Dialect for BraceDialect {
    fn name(&self) -> &'static str {
        "brace"
    }

    fn extension(&self) -> &'static str {
        ".src"
    }

    fn test_suffix(&self) -> &'static str {
        "_test.src"
    }

    fn namespace(&self, package: &str) -> String {
        format!("package {}", package)
    }

    fn render_imports(&self, imports: &ImportSet) -> String {
        let tiers: Vec<String> = [&imports.standard, &imports.third_party]
            .into_iter()
            .filter(|tier| !tier.is_empty())
            .map(|tier| {
                tier.iter()
                    .map(|import| format!("import {}", import))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();
        tiers.join("\n\n")
    }

    fn format_source(&self, source: &str) -> std::result::Result<String, FormatError> {
        let mut open: Vec<(usize, usize)> = Vec::new();
        for (index, line) in source.lines().enumerate() {
            for (column, c) in line.chars().enumerate() {
                match c {
                    '{' => open.push((index + 1, column + 1)),
                    '}' => {
                        if open.pop().is_none() {
                            return Err(FormatError::at(
                                index + 1,
                                column + 1,
                                "unmatched closing brace",
                            ));
                        }
                    }
                    _ => {}
                }
            }
        }
        if let Some((line, column)) = open.pop() {
            return Err(FormatError::at(line, column, "unclosed brace"));
        }

        let mut formatted = String::with_capacity(source.len());
        let mut pending_blank = false;
        for line in source.lines().map(str::trim_end) {
            if line.is_empty() {
                pending_blank = !formatted.is_empty();
                continue;
            }
            if pending_blank {
                formatted.push('\n');
                pending_blank = false;
            }
            formatted.push_str(line);
            formatted.push('\n');
        }
        Ok(formatted)
    }
}

/// List the file names in a directory, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
