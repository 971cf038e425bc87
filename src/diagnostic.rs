use log::{info, warn};
use serde::Serialize;

use crate::ast::GrammarCase;
use crate::source::SourceSpan;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Note,
}

impl DiagnosticLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Note => "note",
        }
    }
}

/// One recoverable issue found during lowering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub location: SourceSpan,
    /// Grammar production and case the lowering declined to model
    pub code: Option<GrammarCase>,
}

/// Constructs that are recognised but intentionally not modelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedConstruct {
    #[error("bit-field members are not supported; member skipped")]
    BitField,
    #[error("enumeration specifiers are not supported; base type left unset")]
    Enumeration,
    #[error("old-style identifier lists are not supported; parameters skipped")]
    OldStyleParameters,
    #[error("abstract declarators are not supported; parameter skipped")]
    AbstractDeclarator,
    #[error("function specifiers are not supported; specifier ignored")]
    FunctionSpecifier,
    #[error("`static` in array bounds is not supported; qualifier ignored")]
    StaticArrayQualifier,
    #[error("variable length array markers are not supported; dimension left unsized")]
    VariableLengthArray,
    #[error("`_Atomic` qualifiers are not supported; qualifier ignored")]
    AtomicQualifier,
    #[error("brace initializers are not supported; value left unset")]
    InitializerList,
    #[error("old-style parameter declarations are not supported; declarations ignored")]
    KnrDeclarationList,
}

/// Collects the diagnostics of one lowering run
#[derive(Debug, Clone, Default)]
pub struct DiagnosticEngine {
    pub diagnostics: Vec<Diagnostic>,
    pub warnings_as_errors: bool,
    pub disable_all_warnings: bool,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
            warnings_as_errors: false,
            disable_all_warnings: false,
        }
    }

    pub fn from_warnings(warnings: &[String]) -> Self {
        let warnings_as_errors = warnings.iter().any(|w| w == "error");
        let disable_all_warnings = warnings.iter().any(|w| w == "no-warnings");
        Self {
            diagnostics: Vec::new(),
            warnings_as_errors,
            disable_all_warnings,
        }
    }

    /// Record an unsupported construct. Always logged, even when warnings are
    /// disabled for the collected list.
    pub fn report_unsupported(&mut self, kind: UnsupportedConstruct, code: GrammarCase, location: SourceSpan) {
        warn!("{}: {} ({})", location, kind, code);

        if self.disable_all_warnings && !self.warnings_as_errors {
            return;
        }

        let level = if self.warnings_as_errors {
            DiagnosticLevel::Error
        } else {
            DiagnosticLevel::Warning
        };
        self.diagnostics.push(Diagnostic {
            level,
            message: kind.to_string(),
            location,
            code: Some(code),
        });
    }

    pub fn report_note(&mut self, message: String, location: SourceSpan) {
        info!("{}: {}", location, message);
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Note,
            message,
            location,
            code: None,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Line-oriented diagnostic formatter
#[derive(Debug, Clone)]
pub struct ErrorFormatter {
    pub show_notes: bool,
    pub show_code: bool,
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        ErrorFormatter {
            show_notes: true,
            show_code: true,
        }
    }
}

impl ErrorFormatter {
    /// Format a single diagnostic as `path:start..end: level: message [code]`
    pub fn format_diagnostic(&self, diag: &Diagnostic, path: Option<&str>) -> String {
        let mut result = match path {
            Some(path) if !diag.location.is_empty() => format!(
                "{}:{}..{}: ",
                path,
                diag.location.start_offset(),
                diag.location.end_offset()
            ),
            Some(path) => format!("{}: ", path),
            None if !diag.location.is_empty() => format!("{}: ", diag.location),
            None => String::new(),
        };
        result.push_str(&format!("{}: {}", diag.level.as_str(), diag.message));

        if self.show_code
            && let Some(code) = diag.code
        {
            result.push_str(&format!(" [{}]", code));
        }
        result
    }

    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic], path: Option<&str>) -> String {
        diagnostics
            .iter()
            .filter(|diag| self.show_notes || diag.level != DiagnosticLevel::Note)
            .map(|diag| self.format_diagnostic(diag, path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic], path: Option<&str>) {
        for diag in diagnostics {
            if self.show_notes || diag.level != DiagnosticLevel::Note {
                eprintln!("{}", self.format_diagnostic(diag, path));
            }
        }
    }
}
