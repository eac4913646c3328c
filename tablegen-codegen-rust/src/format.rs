//! Validation and formatting of Rust sources.
//!
//! A source is first parsed with [`syn`] so syntax errors carry an exact
//! `line:column`, then piped through `rustfmt`, which keeps every comment.

use std::path::Path;

use tablegen_codegen::{FormatError, format::run_formatter};

/// Formatter binary looked up on `PATH` by default.
pub const DEFAULT_RUSTFMT: &str = "rustfmt";

const RUSTFMT_ARGS: &[&str] = &["--edition", "2024", "--emit", "stdout"];

/// Check `source` and format it with `rustfmt` from `PATH`.
pub fn format_rust(source: &str) -> Result<String, FormatError> {
    format_rust_with(Path::new(DEFAULT_RUSTFMT), source)
}

/// Check `source` and format it with a specific `rustfmt` binary.
pub fn format_rust_with(rustfmt: &Path, source: &str) -> Result<String, FormatError> {
    check_syntax(source)?;

    let output = run_formatter(rustfmt, RUSTFMT_ARGS, source).map_err(|e| {
        FormatError::new(format!("failed to run {}: {}", rustfmt.display(), e))
    })?;

    if output.status.success() {
        return String::from_utf8(output.stdout)
            .map_err(|e| FormatError::new(format!("rustfmt produced invalid UTF-8: {}", e)));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    tracing::debug!(status = %output.status, stderr = %stderr, "rustfmt rejected source");
    Err(rustfmt_error(&stderr))
}

/// Parse `source` as a Rust file.
///
/// Errors are reported as `line:column: message`, or as the bare message
/// when the parser has no location (e.g. unexpected end of input).
pub fn check_syntax(source: &str) -> Result<(), FormatError> {
    syn::parse_file(source).map(|_| ()).map_err(|err| {
        let start = err.span().start();
        if start.line == 0 {
            FormatError::new(err.to_string())
        } else {
            FormatError::at(start.line, start.column + 1, err)
        }
    })
}

/// Turn rustfmt's stderr into a located error where possible.
///
/// rustfmt prints `error: <message>` followed by ` --> <stdin>:<line>:<col>`.
fn rustfmt_error(stderr: &str) -> FormatError {
    let message = stderr
        .lines()
        .find_map(|line| line.strip_prefix("error: "))
        .or_else(|| stderr.lines().find(|line| !line.trim().is_empty()))
        .unwrap_or("rustfmt failed without output");

    let location = stderr.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix("--> ")?;
        let mut parts = rest.rsplitn(3, ':');
        let column = parts.next()?.parse::<usize>().ok()?;
        let line = parts.next()?.parse::<usize>().ok()?;
        Some((line, column))
    });

    match location {
        Some((line, column)) => FormatError::at(line, column, message),
        None => FormatError::new(message),
    }
}
