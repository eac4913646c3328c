//! File header: disclaimer banner, namespace declaration, import block.

use crate::{Dialect, ImportSet};

/// Banner placed at the top of every generated file, followed by a blank
/// line so the namespace declaration does not attach to it.
pub const DISCLAIMER: &str = "// Code generated by tablegen. DO NOT EDIT.
// This file is meant to be re-generated in place and/or deleted at any time.

";

/// Write the disclaimer banner.
pub fn write_disclaimer(out: &mut Vec<u8>) {
    out.extend_from_slice(DISCLAIMER.as_bytes());
}

/// Write the namespace declaration followed by a blank line.
pub fn write_namespace(out: &mut Vec<u8>, dialect: &dyn Dialect, package: &str) {
    out.extend_from_slice(dialect.namespace(package).as_bytes());
    out.extend_from_slice(b"\n\n");
}

/// Write the import block followed by a blank line. Writes nothing for an
/// empty set.
pub fn write_imports(out: &mut Vec<u8>, dialect: &dyn Dialect, imports: &ImportSet) {
    let rendered = dialect.render_imports(imports);
    if !rendered.is_empty() {
        out.extend_from_slice(rendered.as_bytes());
        out.extend_from_slice(b"\n\n");
    }
}

/// Write the complete header: disclaimer, namespace, imports.
pub fn write_header(out: &mut Vec<u8>, dialect: &dyn Dialect, package: &str, imports: &ImportSet) {
    write_disclaimer(out);
    write_namespace(out, dialect, package);
    write_imports(out, dialect, imports);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BraceDialect;

    fn render(imports: &ImportSet) -> String {
        let mut out = Vec::new();
        write_header(&mut out, &BraceDialect, "models", imports);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_without_imports() {
        insta::assert_snapshot!(render(&ImportSet::new()), @r"
        // Code generated by tablegen. DO NOT EDIT.
        // This file is meant to be re-generated in place and/or deleted at any time.

        package models
        ");
    }

    #[test]
    fn test_header_with_imports() {
        let imports = ImportSet::new().standard(["fmt"]).third_party(["acme/db"]);
        let header = render(&imports);

        assert!(header.ends_with("package models\n\nimport fmt\n\nimport acme/db\n\n"));
    }

    #[test]
    fn test_disclaimer_is_two_lines_and_blank() {
        let lines: Vec<_> = DISCLAIMER.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("DO NOT EDIT"));
        assert_eq!(lines[2], "");
    }
}
