//! Error types and diagnostics
//!
//! This module provides error handling and diagnostic reporting
//! for the declaration extractor. Fatal conditions are [`EtchError`]s;
//! non-fatal ones (such as unknown JSDoc tags) are [`Diagnostic`]s that
//! accumulate and get reported at the end of a build.

use std::io::{self, Write};
use std::path::PathBuf;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

/// Result type for dts-etch operations
pub type EtchResult<T> = Result<T, EtchError>;

/// Main error type for dts-etch
#[derive(Debug, Error)]
pub enum EtchError {
    /// A declaration file could not be loaded
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A declaration could not be classified or named
    #[error("Malformed declaration in module `{module}`: {message}")]
    MalformedSource { module: String, message: String },

    /// A render request named a module absent from the catalog
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// A render request named a declaration absent from its module
    #[error("Declaration not found: {name} (in module `{module}`)")]
    DeclarationNotFound { module: String, name: String },

    /// TypeScript parse error
    #[error("TypeScript parse error: {0}")]
    TypeScriptParse(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snippet formatter failure
    #[error("Formatter error: {0}")]
    Format(String),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EtchError {
    /// Create a read error for a path
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EtchError::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-source error
    pub fn malformed(module: impl Into<String>, message: impl Into<String>) -> Self {
        EtchError::MalformedSource {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        EtchError::Config(message.into())
    }

    /// Whether this error is a failed catalog lookup
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            EtchError::ModuleNotFound(_) | EtchError::DeclarationNotFound { .. }
        )
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error - prevents doc generation
    Error,
    /// Warning - doc generation continues
    Warning,
    /// Info - informational message
    Info,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }

    fn color(&self) -> Color {
        match self {
            DiagnosticSeverity::Error => Color::Red,
            DiagnosticSeverity::Warning => Color::Yellow,
            DiagnosticSeverity::Info => Color::Blue,
        }
    }
}

/// Diagnostic code attached to unknown-tag warnings
pub const UNKNOWN_TAG: &str = "unknown-tag";

/// A diagnostic message
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Diagnostic code (for categorization)
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            code: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Warning for a JSDoc tag outside the rendered vocabulary
    pub fn unknown_tag(tag: &str) -> Self {
        Self::warning(format!("unhandled JSDoc tag: {}", tag)).with_code(UNKNOWN_TAG)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            result.push_str(": ");
        }

        result.push_str(self.severity.display());

        if let Some(ref code) = self.code {
            result.push('[');
            result.push_str(code);
            result.push(']');
        }

        result.push_str(": ");
        result.push_str(&self.message);

        result
    }

    /// Write the diagnostic with colors
    fn write_colored(&self, out: &mut impl WriteColor) -> io::Result<()> {
        if let Some(ref file) = self.file {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "{}", file.display())?;
            out.reset()?;
            write!(out, ": ")?;
        }

        out.set_color(ColorSpec::new().set_fg(Some(self.severity.color())).set_bold(true))?;
        write!(out, "{}", self.severity.display())?;
        out.reset()?;

        if let Some(ref code) = self.code {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "[{}]", code)?;
            out.reset()?;
        }

        writeln!(out, ": {}", self.message)
    }
}

/// Collector for diagnostics during doc generation
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add every diagnostic from an iterator
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Add a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// Add an info message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::info(message));
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Get all diagnostics carrying the given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.code.as_deref() == Some(code))
    }

    /// Print all warnings and errors to stderr
    pub fn print(&self, use_color: bool) -> io::Result<()> {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);

        for diagnostic in &self.diagnostics {
            if diagnostic.severity != DiagnosticSeverity::Info {
                diagnostic.write_colored(&mut stderr)?;
            }
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(stderr, "\n{} warning(s)", warnings)?;
        }
        Ok(())
    }
}
