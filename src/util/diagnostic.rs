//! User-friendly diagnostic messages.
//!
//! Every fatal error surfaced by the CLI names the offending path or module
//! and, where one exists, the command that fixes it.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// No host descriptor found in the directory tree.
    pub const NO_HOST: &str = "Run gah from a directory containing `gah-host.json`";

    /// A manifest path in a dependency reference is wrong.
    pub const CHECK_DEPENDENCY_PATH: &str =
        "Check the `path` of the dependency reference pointing at this manifest";

    /// A module's `baseDir` points nowhere.
    pub const CHECK_BASE_DIR: &str =
        "Check the `baseDir` of the module, it is relative to its gah-module.json";

    /// A package install failed.
    pub const RERUN_INSTALL: &str =
        "Fix the package manager error, then run `gah install` again";

    /// Circular module references.
    pub const BREAK_CYCLE: &str =
        "Break the cycle by removing one of the module references";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related file
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m",
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m",
            (false, Severity::Error) => "error",
            (false, Severity::Warning) => "warning",
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// A JSON document that failed to parse, with the failing location labeled.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("invalid JSON in `{path}`: {message}")]
#[diagnostic(code(gah::manifest::invalid_json))]
pub struct InvalidJsonError {
    pub path: String,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("{message}")]
    pub span: SourceSpan,
}

impl InvalidJsonError {
    /// Build from a `serde_json` error, translating its line/column into a span.
    pub fn new(path: &Path, contents: String, err: &serde_json::Error) -> Self {
        let offset = line_col_to_offset(&contents, err.line(), err.column());
        let path_str = path.display().to_string();
        InvalidJsonError {
            message: err.to_string(),
            src: NamedSource::new(path_str.clone(), contents),
            span: SourceSpan::from((offset, 0)),
            path: path_str,
        }
    }
}

/// Convert a 1-based line/column pair to a byte offset, clamped to the input.
fn line_col_to_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
