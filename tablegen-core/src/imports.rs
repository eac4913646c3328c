//! Import sets and the registry that decides which file gets which imports.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Imports required by one generated file.
///
/// Imports are split into two tiers: the language's standard library and
/// third-party packages. Both tiers are kept sorted and deduplicated so the
/// rendered import block is stable across runs.
///
/// # Example
///
/// ```
/// use tablegen_core::ImportSet;
///
/// let mut imports = ImportSet::new().standard(["fmt", "strings"]);
/// imports.merge(&ImportSet::new().standard(["fmt"]).third_party(["github.com/pkg/errors"]));
///
/// assert_eq!(imports.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSet {
    /// Standard library imports.
    pub standard: BTreeSet<String>,
    /// Third-party package imports.
    pub third_party: BTreeSet<String>,
}

impl ImportSet {
    /// Create a new empty import set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add standard library imports.
    pub fn standard(mut self, imports: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.standard.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Add third-party imports.
    pub fn third_party(mut self, imports: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.third_party.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Merge another set into this one, tier by tier.
    pub fn merge(&mut self, other: &ImportSet) {
        self.standard.extend(other.standard.iter().cloned());
        self.third_party.extend(other.third_party.iter().cloned());
    }

    /// Check if both tiers are empty.
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.third_party.is_empty()
    }

    /// Total number of imports across both tiers.
    pub fn len(&self) -> usize {
        self.standard.len() + self.third_party.len()
    }
}

/// Extend `base` with the imports registered for each distinct column type.
///
/// Types without a rule contribute nothing. A type shared by several columns
/// is only looked up once, and imports already present in `base` collapse.
pub fn with_type_imports<'a>(
    base: &ImportSet,
    rules: &IndexMap<String, ImportSet>,
    column_types: impl IntoIterator<Item = &'a str>,
) -> ImportSet {
    let mut imports = base.clone();
    let distinct: BTreeSet<&str> = column_types.into_iter().collect();
    for ty in distinct {
        if let Some(extra) = rules.get(ty) {
            imports.merge(extra);
        }
    }
    imports
}

/// Every import rule known to a generation run.
///
/// Deserialized from the `[imports]` table of `tablegen.toml`:
///
/// ```toml
/// [imports.all]
/// standard = ["fmt"]
///
/// [imports.based_on_type."time.Time"]
/// standard = ["time"]
///
/// [imports.singleton.helpers]
/// standard = ["strings"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRegistry {
    /// Applied to every generated per-table file.
    pub all: ImportSet,
    /// Applied to every generated per-table test file.
    pub test: ImportSet,
    /// Extra imports keyed by semantic column type.
    pub based_on_type: IndexMap<String, ImportSet>,
    /// Imports for singleton files, keyed by derived template name.
    pub singleton: IndexMap<String, ImportSet>,
    /// Imports for singleton test files, keyed by derived template name.
    pub test_singleton: IndexMap<String, ImportSet>,
}
