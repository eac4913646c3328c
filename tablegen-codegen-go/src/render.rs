//! Go-specific rendering of import sets.

use tablegen_core::ImportSet;

/// Render imports as a Go import declaration.
///
/// A lone import uses the single-line form. Several imports form a
/// parenthesized block with standard and third-party groups separated by a
/// blank line. Entries are quoted unless they already carry quotes, which
/// lets named imports such as `sq "github.com/acme/squirrel"` through.
///
/// ```
/// use tablegen_codegen_go::render_imports;
/// use tablegen_core::ImportSet;
///
/// let imports = ImportSet::new().standard(["fmt"]);
/// assert_eq!(render_imports(&imports), "import \"fmt\"");
/// ```
pub fn render_imports(imports: &ImportSet) -> String {
    match imports.len() {
        0 => String::new(),
        1 => {
            let import = imports
                .standard
                .iter()
                .chain(&imports.third_party)
                .map(|import| quote(import))
                .collect::<String>();
            format!("import {}", import)
        }
        _ => {
            let groups: Vec<String> = [&imports.standard, &imports.third_party]
                .into_iter()
                .filter(|group| !group.is_empty())
                .map(|group| {
                    group
                        .iter()
                        .map(|import| format!("\t{}", quote(import)))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect();
            format!("import (\n{}\n)", groups.join("\n\n"))
        }
    }
}

fn quote(import: &str) -> String {
    if import.contains('"') {
        import.to_string()
    } else {
        format!("\"{}\"", import)
    }
}
