//! User-friendly diagnostic messages.
//!
//! Every error shown to the user names what went wrong, where it came from
//! and what to change.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no project configuration is found.
    pub const NO_CONFIG: &str = "help: Create a `libplan.toml` declaring `[collection] libraries`";

    /// Suggestion when a reference cannot be attributed to a library.
    pub const UNRESOLVABLE: &str =
        "Declare the library that owns this file in `[collection] libraries`";

    /// Suggestion when a reference looks like a typo in the manifest.
    pub const FIX_MANIFEST: &str =
        "Or correct the manifest entry so it points into a known library";
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
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (manifest path, optionally with a line)
    pub location: Option<(PathBuf, Option<usize>)>,
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

    pub fn with_location(mut self, path: impl Into<PathBuf>, line: Option<usize>) -> Self {
        self.location = Some((path.into(), line));
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m".to_string(),
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m".to_string(),
            (false, severity) => severity.to_string(),
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        match &self.location {
            Some((path, Some(line))) => {
                output.push_str(&format!("  --> {}:{}\n", path.display(), line))
            }
            Some((path, None)) => output.push_str(&format!("  --> {}\n", path.display())),
            None => {}
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

/// A manifest reference no classification rule could attribute to a library.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("cannot determine the library owning `{reference}`")]
#[diagnostic(
    code(libplan::resolve::unresolvable_ownership),
    help("declare the owning library in `[collection] libraries` or fix the manifest entry")
)]
pub struct UnresolvableOwnershipError {
    pub reference: String,
    pub library: String,
    pub line: usize,
    #[source_code]
    pub src: Option<NamedSource<String>>,
    #[label("listed here")]
    pub span: Option<SourceSpan>,
}

/// Byte span of a 1-based line in `contents`, without its line terminator.
pub fn line_span(contents: &str, line: usize) -> Option<SourceSpan> {
    let mut offset = 0;
    for (index, text) in contents.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let trimmed = text.trim_end_matches(['\n', '\r']);
            return Some(SourceSpan::new(offset.into(), trimmed.len()));
        }
        offset += text.len();
    }
    None
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
