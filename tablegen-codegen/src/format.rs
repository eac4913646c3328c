//! Syntax validation and line-anchored diagnostics.
//!
//! Every assembled buffer goes through the dialect's formatter before it is
//! written. The formatted output is what lands on disk; a formatter failure
//! is turned into an [`Error::Format`] carrying an excerpt of the offending
//! region of the *unformatted* buffer.

use std::{
    fmt::Write as _,
    io::{self, Write as _},
    path::Path,
    process::{Command, Output, Stdio},
    sync::LazyLock,
};

use regex::Regex;

use crate::{Dialect, Error, Result};

/// Number of context lines shown on each side of the failing line.
pub const EXCERPT_RADIUS: usize = 5;

static SYNTAX_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):\d+: ").expect("syntax error pattern is valid"));

/// Validate and canonically format an assembled buffer.
///
/// `file` names the output in diagnostics.
pub fn format_buffer(dialect: &dyn Dialect, file: &str, buffer: &[u8]) -> Result<Vec<u8>> {
    let source = std::str::from_utf8(buffer).map_err(|e| Error::Format {
        file: file.to_string(),
        message: format!("generated output is not valid UTF-8: {}", e),
        excerpt: None,
    })?;

    match dialect.format_source(source) {
        Ok(formatted) => Ok(formatted.into_bytes()),
        Err(err) => {
            let excerpt = error_line(&err.message).map(|line| excerpt(source, line));
            Err(Error::Format {
                file: file.to_string(),
                message: err.message,
                excerpt,
            })
        }
    }
}

/// Pipe `source` through an external formatter and collect its output.
///
/// Nothing is inspected here: callers decide what a non-zero exit means.
pub fn run_formatter(program: &Path, args: &[&str], source: &str) -> io::Result<Output> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin from another thread so a large file cannot deadlock
    // against a full stdout pipe.
    let mut stdin = child.stdin.take();
    std::thread::scope(|scope| {
        let writer = scope.spawn(move || match stdin.as_mut() {
            Some(stdin) => stdin.write_all(source.as_bytes()),
            None => Ok(()),
        });
        let output = child.wait_with_output();
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("formatter stdin writer panicked")));
        let output = output?;
        // A formatter that rejects the input may close stdin early.
        if output.status.success() {
            written?;
        }
        Ok(output)
    })
}

/// Extract the failing line from a formatter message of the form
/// `...<line>:<column>: ...`.
pub fn error_line(message: &str) -> Option<usize> {
    SYNTAX_ERROR
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

/// Render the lines of `source` within [`EXCERPT_RADIUS`] of `line`.
///
/// The failing line is marked with `>>>> `, every other line is prefixed
/// with its number right-aligned to four columns.
///
/// ```
/// use tablegen_codegen::format::excerpt;
///
/// let source = "package models\n\nfunc broken( {\n}\n";
/// assert_eq!(
///     excerpt(source, 3),
///     "   1 package models\n   2 \n>>>> func broken( {\n   4 }\n"
/// );
/// ```
pub fn excerpt(source: &str, line: usize) -> String {
    let mut out = String::new();
    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        if number.abs_diff(line) > EXCERPT_RADIUS {
            continue;
        }

        if number == line {
            out.push_str(">>>> ");
        } else {
            let _ = write!(out, "{:>4} ", number);
        }
        out.push_str(text);
        out.push('\n');
    }
    out
}
