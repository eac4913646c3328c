//! Output file naming.

/// Strip the file extension from a template name.
///
/// Only the final path component is considered, so dots in directory names
/// are left alone. A name without an extension is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    let file_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[file_start..].rfind('.') {
        Some(dot) => &name[..file_start + dot],
        None => name,
    }
}

/// Strip a leading ordering prefix (`<digits>_`) from a name.
///
/// ```
/// use tablegen_core::strip_order_prefix;
///
/// assert_eq!(strip_order_prefix("01_helpers"), "helpers");
/// assert_eq!(strip_order_prefix("_helpers"), "_helpers");
/// assert_eq!(strip_order_prefix("2fast"), "2fast");
/// ```
pub fn strip_order_prefix(name: &str) -> &str {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && name.as_bytes().get(digits) == Some(&b'_') {
        &name[digits + 1..]
    } else {
        name
    }
}

/// Derive the output name of a singleton template.
///
/// The extension is removed first, then the ordering prefix, which only
/// controls execution order and never reaches the output file name.
///
/// ```
/// use tablegen_core::singleton_name;
///
/// assert_eq!(singleton_name("01_helpers.tpl"), "helpers");
/// assert_eq!(singleton_name("99_foo_bar.tpl"), "foo_bar");
/// assert_eq!(singleton_name("nohelp.tpl"), "nohelp");
/// ```
pub fn singleton_name(template: &str) -> &str {
    strip_order_prefix(strip_extension(template))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_name() {
        assert_eq!(singleton_name("01_helpers.tpl"), "helpers");
        assert_eq!(singleton_name("99_foo_bar.tpl"), "foo_bar");
        assert_eq!(singleton_name("nohelp.tpl"), "nohelp");
    }

    #[test]
    fn test_singleton_name_is_idempotent() {
        for name in ["01_helpers.tpl", "99_foo_bar.tpl", "nohelp.tpl", "7_x"] {
            let once = singleton_name(name);
            assert_eq!(singleton_name(once), once);
        }
    }

    #[test]
    fn test_only_one_prefix_is_stripped() {
        assert_eq!(singleton_name("01_02_nested.tpl"), "02_nested");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("helpers.tpl"), "helpers");
        assert_eq!(strip_extension("archive.tar.tpl"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension("v1.2/noext"), "v1.2/noext");
    }

    #[test]
    fn test_strip_order_prefix_requires_underscore() {
        assert_eq!(strip_order_prefix("123"), "123");
        assert_eq!(strip_order_prefix("123_"), "");
        assert_eq!(strip_order_prefix("a1_b"), "a1_b");
    }
}
