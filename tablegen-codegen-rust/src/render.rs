//! Rust-specific rendering of import sets.

use tablegen_core::ImportSet;

/// Render imports as Rust `use` declarations.
///
/// Each entry becomes `use <entry>;`. Entries that already end in `;` are
/// complete declarations and are kept as written. Standard and third-party
/// imports are separated by a blank line.
///
/// # Example
///
/// ```
/// use tablegen_codegen_rust::render_imports;
/// use tablegen_core::ImportSet;
///
/// let imports = ImportSet::new()
///     .standard(["std::fmt"])
///     .third_party(["serde::Serialize", "pub use crate::prelude::*;"]);
///
/// assert_eq!(
///     render_imports(&imports),
///     "use std::fmt;\n\npub use crate::prelude::*;\nuse serde::Serialize;"
/// );
/// ```
pub fn render_imports(imports: &ImportSet) -> String {
    [&imports.standard, &imports.third_party]
        .into_iter()
        .filter(|tier| !tier.is_empty())
        .map(|tier| {
            tier.iter()
                .map(|import| render_use(import))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_use(import: &str) -> String {
    let import = import.trim();
    if import.ends_with(';') {
        import.to_string()
    } else {
        format!("use {};", import)
    }
}
