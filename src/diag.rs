//! Structured compile-time findings shared by all stages.
//!
//! Errors abort compilation; warnings and info never do. Every diagnostic
//! carries the offending step id and/or field so the editor layer can point
//! at the exact spot in the workflow document.

use serde::{Deserialize, Serialize};

/// Compiler stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Ordering,
    Translating,
    Mapping,
    Scanning,
    Emitting,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Ordering => write!(f, "Ordering"),
            Stage::Translating => write!(f, "Translating"),
            Stage::Mapping => write!(f, "Mapping"),
            Stage::Scanning => write!(f, "Scanning"),
            Stage::Emitting => write!(f, "Emitting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    DuplicateStepId,
    UnknownStepReference,
    IncompleteOrder,
    ForwardOrUnknownReference,
    UnresolvedSourcePath,
    UnmappedRequiredField,
    CoercibleTypeMismatch,
    UnknownTypeMismatch,
    PermissiveTypeFallback,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::DuplicateStepId => "DuplicateStepId",
            DiagnosticKind::UnknownStepReference => "UnknownStepReference",
            DiagnosticKind::IncompleteOrder => "IncompleteOrder",
            DiagnosticKind::ForwardOrUnknownReference => "ForwardOrUnknownReference",
            DiagnosticKind::UnresolvedSourcePath => "UnresolvedSourcePath",
            DiagnosticKind::UnmappedRequiredField => "UnmappedRequiredField",
            DiagnosticKind::CoercibleTypeMismatch => "CoercibleTypeMismatch",
            DiagnosticKind::UnknownTypeMismatch => "UnknownTypeMismatch",
            DiagnosticKind::PermissiveTypeFallback => "PermissiveTypeFallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
    pub step_id: Option<String>,
    pub field: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}] {}",
            self.stage,
            self.kind.as_str(),
            self.message
        )?;
        match (&self.step_id, &self.field) {
            (Some(step), Some(field)) => write!(f, " (step '{}', field '{}')", step, field),
            (Some(step), None) => write!(f, " (step '{}')", step),
            (None, Some(field)) => write!(f, " (field '{}')", field),
            (None, None) => Ok(()),
        }
    }
}

impl Diagnostic {
    pub fn error(
        stage: Stage,
        kind: DiagnosticKind,
        message: impl Into<String>,
        step_id: Option<String>,
    ) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Error,
            stage,
            message: message.into(),
            step_id,
            field: None,
        }
    }

    pub fn warning(
        stage: Stage,
        kind: DiagnosticKind,
        message: impl Into<String>,
        step_id: Option<String>,
    ) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Warning,
            stage,
            message: message.into(),
            step_id,
            field: None,
        }
    }

    pub fn info(
        stage: Stage,
        kind: DiagnosticKind,
        message: impl Into<String>,
        step_id: Option<String>,
    ) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Info,
            stage,
            message: message.into(),
            step_id,
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// True if any diagnostic in the slice is error-severity.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
