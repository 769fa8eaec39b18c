//! WASM entry points for the browser editor.

use wasm_bindgen::prelude::*;

use crate::compile;
use crate::diag::Diagnostic;
use crate::emit::render;
use crate::model;

/// Parse and compile a workflow JSON, returning diagnostics only.
/// Used by the editor for on-keystroke checking.
#[wasm_bindgen]
pub fn check_workflow(json: &str) -> JsValue {
    let result = check_workflow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn check_workflow_inner(json: &str) -> Vec<DiagnosticDto> {
    let workflow = match model::parse(json) {
        Ok(w) => w,
        Err(e) => return vec![DiagnosticDto::parse_failure(&e)],
    };
    compile::compile(&workflow)
        .diagnostics
        .into_iter()
        .map(DiagnosticDto::from)
        .collect()
}

/// Full pipeline: parse → compile → render.
/// Returns `{ status: "success", source, diagnostics }` or
/// `{ status: "errors", diagnostics }`.
#[wasm_bindgen]
pub fn compile_workflow(json: &str) -> JsValue {
    let result = compile_workflow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn compile_workflow_inner(json: &str) -> CompileResultDto {
    let workflow = match model::parse(json) {
        Ok(w) => w,
        Err(e) => {
            return CompileResultDto::Errors {
                diagnostics: vec![DiagnosticDto::parse_failure(&e)],
            };
        }
    };

    let output = compile::compile(&workflow);
    let diagnostics: Vec<DiagnosticDto> = output
        .diagnostics
        .into_iter()
        .map(DiagnosticDto::from)
        .collect();

    match output.pipeline {
        Some(pipeline) => CompileResultDto::Success {
            source: render::render(&pipeline),
            diagnostics,
        },
        None => CompileResultDto::Errors { diagnostics },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct DiagnosticDto {
    kind: String,
    severity: String,
    stage: String,
    message: String,
    step_id: Option<String>,
    field: Option<String>,
}

impl DiagnosticDto {
    fn parse_failure(e: &model::ParseError) -> Self {
        DiagnosticDto {
            kind: "InvalidDocument".into(),
            severity: "error".into(),
            stage: "Parse".into(),
            message: e.to_string(),
            step_id: None,
            field: None,
        }
    }
}

impl From<Diagnostic> for DiagnosticDto {
    fn from(d: Diagnostic) -> Self {
        DiagnosticDto {
            kind: d.kind.as_str().into(),
            severity: match d.severity {
                crate::diag::Severity::Error => "error".into(),
                crate::diag::Severity::Warning => "warning".into(),
                crate::diag::Severity::Info => "info".into(),
            },
            stage: d.stage.to_string(),
            message: d.message,
            step_id: d.step_id,
            field: d.field,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(tag = "status")]
enum CompileResultDto {
    #[serde(rename = "success")]
    Success {
        source: String,
        diagnostics: Vec<DiagnosticDto>,
    },
    #[serde(rename = "errors")]
    Errors { diagnostics: Vec<DiagnosticDto> },
}
