//! Where reports go: the terminal, or a recorder in tests.

use miette::{Diagnostic, GraphicalReportHandler};

/// Sink for report lines.
///
/// Reports only name the kind of each line; the sink picks markers and
/// streams.
pub trait Output {
    /// Heading line, e.g. `Generated:`.
    fn section(&mut self, name: &str);

    /// `key: value` line.
    fn key_value(&mut self, key: &str, value: &str);

    fn list_item(&mut self, text: &str);

    /// A file that was, or would be, written.
    fn added_item(&mut self, text: &str);

    /// Goes to stderr.
    fn warning(&mut self, msg: &str);

    /// A generation error with its source chain and help text.
    fn diagnostic(&mut self, diagnostic: &dyn Diagnostic);

    fn preformatted(&mut self, text: &str);

    fn newline(&mut self);
}

/// Anything the CLI prints after an operation.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Prints to stdout, with warnings and diagnostics on stderr.
pub struct TerminalOutput {
    handler: GraphicalReportHandler,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            handler: GraphicalReportHandler::new(),
        }
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for TerminalOutput {
    fn section(&mut self, name: &str) {
        println!("{}:", name);
    }

    fn key_value(&mut self, key: &str, value: &str) {
        println!("{}: {}", key, value);
    }

    fn list_item(&mut self, text: &str) {
        println!("  - {}", text);
    }

    fn added_item(&mut self, text: &str) {
        println!("  + {}", text);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("warning: {}", msg);
    }

    fn diagnostic(&mut self, diagnostic: &dyn Diagnostic) {
        let mut rendered = String::new();
        if self.handler.render_report(&mut rendered, diagnostic).is_err() {
            rendered = format!("error: {}", diagnostic);
        }
        eprintln!("{}", rendered);
    }

    fn preformatted(&mut self, text: &str) {
        println!("{}", text);
    }

    fn newline(&mut self) {
        println!();
    }
}

/// Collects rendered lines, for asserting on report output.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl RecordingOutput {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
impl Output for RecordingOutput {
    fn section(&mut self, name: &str) {
        self.lines.push(format!("{}:", name));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.lines.push(format!("{}: {}", key, value));
    }

    fn list_item(&mut self, text: &str) {
        self.lines.push(format!("  - {}", text));
    }

    fn added_item(&mut self, text: &str) {
        self.lines.push(format!("  + {}", text));
    }

    fn warning(&mut self, msg: &str) {
        self.lines.push(format!("warning: {}", msg));
    }

    fn diagnostic(&mut self, diagnostic: &dyn Diagnostic) {
        self.lines.push(format!("error: {}", diagnostic));
    }

    fn preformatted(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn newline(&mut self) {
        self.lines.push(String::new());
    }
}
