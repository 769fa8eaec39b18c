//! Field mapping resolution — the core of the compiler.
//!
//! For every step in the resolved order, every top-level input field is
//! resolved to a producer: a prior step's output field, a workflow runtime
//! input, a configuration value, or a static literal. This is the only stage
//! that enforces dependency direction and the only stage that surfaces type
//! mismatches.

use std::collections::HashMap;

use serde::Serialize;

use crate::diag::{Diagnostic, DiagnosticKind, Stage};
use crate::model::{
    ConfigDecl, DataMapping, FieldType, RUNTIME_INPUT_SOURCE, RuntimeInput, SchemaNode, Step,
    TypeMatch,
};

// =============================================================================
// RESOLVED OUTPUT
// =============================================================================

/// Where a target field's value comes from at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source")]
pub enum SourceExpr {
    /// Dot-path into a prior step's output. Empty path = the entire output.
    StepOutput { step_id: String, path: String },
    RuntimeInput { key: String },
    ConfigValue { key: String },
    Literal { value: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedField {
    pub target_field: String,
    pub source: SourceExpr,
    pub type_match: TypeMatch,
}

/// Field → source table for one step, in input-schema field order.
#[derive(Debug, Clone, Serialize)]
pub struct StepMappings {
    pub step_id: String,
    pub fields: Vec<ResolvedField>,
}

/// Per-step tables, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedMappings {
    pub steps: Vec<StepMappings>,
}

impl ResolvedMappings {
    pub fn for_step(&self, step_id: &str) -> Option<&StepMappings> {
        self.steps.iter().find(|m| m.step_id == step_id)
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve all data mappings against the ordered step sequence.
///
/// Always returns a best-effort table; the caller aborts on error-severity
/// diagnostics (forward or unknown step references).
pub fn resolve(
    ordered_steps: &[&Step],
    data_mappings: &[DataMapping],
    runtime_inputs: &[RuntimeInput],
    configs: &[ConfigDecl],
) -> (ResolvedMappings, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let positions: HashMap<&str, usize> = ordered_steps
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    let mut resolved = ResolvedMappings::default();

    for (position, step) in ordered_steps.iter().enumerate() {
        let rows = valid_rows_for_step(
            step,
            position,
            data_mappings,
            &positions,
            &mut diagnostics,
        );
        let fields = resolve_step_fields(
            step,
            &rows,
            ordered_steps,
            &positions,
            runtime_inputs,
            configs,
            &mut diagnostics,
        );
        resolved.steps.push(StepMappings {
            step_id: step.id.clone(),
            fields,
        });
    }

    (resolved, diagnostics)
}

/// Mapping rows targeting `step`, in declaration order, with forward and
/// unknown source references rejected.
fn valid_rows_for_step<'a>(
    step: &Step,
    position: usize,
    data_mappings: &'a [DataMapping],
    positions: &HashMap<&str, usize>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<&'a DataMapping> {
    let mut rows = Vec::new();
    for mapping in data_mappings
        .iter()
        .filter(|m| m.target_step_id == step.id)
    {
        if mapping.source_step_id == RUNTIME_INPUT_SOURCE {
            rows.push(mapping);
            continue;
        }
        match positions.get(mapping.source_step_id.as_str()) {
            Some(&source_pos) if source_pos < position => rows.push(mapping),
            Some(_) => {
                diagnostics.push(Diagnostic::error(
                    Stage::Mapping,
                    DiagnosticKind::ForwardOrUnknownReference,
                    format!(
                        "mapping into step '{}' references step '{}' which does not run before it",
                        step.id, mapping.source_step_id
                    ),
                    Some(step.id.clone()),
                ));
            }
            None => {
                diagnostics.push(Diagnostic::error(
                    Stage::Mapping,
                    DiagnosticKind::ForwardOrUnknownReference,
                    format!(
                        "mapping into step '{}' references unknown step '{}'",
                        step.id, mapping.source_step_id
                    ),
                    Some(step.id.clone()),
                ));
            }
        }
    }
    rows
}

fn resolve_step_fields(
    step: &Step,
    rows: &[&DataMapping],
    ordered_steps: &[&Step],
    positions: &HashMap<&str, usize>,
    runtime_inputs: &[RuntimeInput],
    configs: &[ConfigDecl],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ResolvedField> {
    // Only first-level fields of the input schema are directly mappable.
    let SchemaNode::Object { fields, required } = &step.input_schema else {
        return Vec::new();
    };

    let mut resolved = Vec::new();
    for field in fields {
        // Last declared wins when several mappings target the same field.
        let winner = rows.iter().flat_map(|row| {
            row.fields
                .iter()
                .filter(|fm| fm.target_field == field.name)
                .map(move |fm| (*row, fm))
        });
        let Some((row, field_mapping)) = winner.last() else {
            if required.iter().any(|r| r == &field.name) {
                diagnostics.push(
                    Diagnostic::warning(
                        Stage::Mapping,
                        DiagnosticKind::UnmappedRequiredField,
                        format!(
                            "required field '{}' of step '{}' has no mapping",
                            field.name, step.id
                        ),
                        Some(step.id.clone()),
                    )
                    .with_field(field.name.clone()),
                );
            }
            continue;
        };

        let (source, source_type) = if row.source_step_id == RUNTIME_INPUT_SOURCE {
            resolve_input_source(&field_mapping.source_path, runtime_inputs, configs)
        } else {
            resolve_step_source(
                step,
                &row.source_step_id,
                &field_mapping.source_path,
                ordered_steps,
                positions,
                diagnostics,
            )
        };
        let source_type = source_type.or(field_mapping.source_type);
        let target_type = field.schema.field_type().or(field_mapping.target_type);

        let type_match = classify(source_type, target_type);
        record_type_diagnostic(
            step,
            &field.name,
            source_type,
            target_type,
            type_match,
            diagnostics,
        );

        resolved.push(ResolvedField {
            target_field: field.name.clone(),
            source,
            type_match,
        });
    }
    resolved
}

/// `__input__` sources resolve against runtime inputs first, then configs,
/// then fall back to a static literal.
fn resolve_input_source(
    source_path: &str,
    runtime_inputs: &[RuntimeInput],
    configs: &[ConfigDecl],
) -> (SourceExpr, Option<FieldType>) {
    if let Some(input) = runtime_inputs.iter().find(|i| i.key == source_path) {
        return (
            SourceExpr::RuntimeInput {
                key: input.key.clone(),
            },
            Some(input.value_type),
        );
    }
    if let Some(config) = configs.iter().find(|c| c.key == source_path) {
        return (
            SourceExpr::ConfigValue {
                key: config.key.clone(),
            },
            Some(config.value_type),
        );
    }
    (
        SourceExpr::Literal {
            value: source_path.to_string(),
        },
        None,
    )
}

fn resolve_step_source(
    target_step: &Step,
    source_step_id: &str,
    source_path: &str,
    ordered_steps: &[&Step],
    positions: &HashMap<&str, usize>,
    diagnostics: &mut Vec<Diagnostic>,
) -> (SourceExpr, Option<FieldType>) {
    // Row validation already guaranteed the source exists and runs earlier.
    let source_step = ordered_steps[positions[source_step_id]];
    let node = resolve_path(&source_step.output_schema, source_path);
    if node.is_none() {
        diagnostics.push(
            Diagnostic::warning(
                Stage::Mapping,
                DiagnosticKind::UnresolvedSourcePath,
                format!(
                    "path '{}' does not resolve in the output of step '{}'",
                    source_path, source_step_id
                ),
                Some(target_step.id.clone()),
            )
            .with_field(source_path.to_string()),
        );
    }
    (
        SourceExpr::StepOutput {
            step_id: source_step_id.to_string(),
            path: source_path.to_string(),
        },
        node.and_then(SchemaNode::field_type),
    )
}

/// Walk a dot-separated path through object fields. Empty path is the node
/// itself (the entire step output).
fn resolve_path<'a>(schema: &'a SchemaNode, path: &str) -> Option<&'a SchemaNode> {
    if path.is_empty() {
        return Some(schema);
    }
    let mut current = schema;
    for segment in path.split('.') {
        let SchemaNode::Object { fields, .. } = current else {
            return None;
        };
        current = &fields.iter().find(|f| f.name == segment)?.schema;
    }
    Some(current)
}

// =============================================================================
// TYPE MATCH CLASSIFICATION
// =============================================================================

fn classify(source: Option<FieldType>, target: Option<FieldType>) -> TypeMatch {
    match (source, target) {
        (Some(s), Some(t)) if s == t => TypeMatch::Exact,
        (Some(s), Some(t)) if s.is_scalar() && t.is_scalar() => TypeMatch::Coercible,
        _ => TypeMatch::Unknown,
    }
}

/// Mismatches are advisory: coercible is info; unknown is a warning only
/// when both sides are known (a real shape mismatch), info when a side's
/// type is simply absent.
fn record_type_diagnostic(
    step: &Step,
    field: &str,
    source: Option<FieldType>,
    target: Option<FieldType>,
    type_match: TypeMatch,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match type_match {
        TypeMatch::Exact => {}
        TypeMatch::Coercible => {
            diagnostics.push(
                Diagnostic::info(
                    Stage::Mapping,
                    DiagnosticKind::CoercibleTypeMismatch,
                    format!(
                        "field '{}' of step '{}' maps {} into {}; no coercion is inserted",
                        field,
                        step.id,
                        source.map_or("unknown", |t| t.as_str()),
                        target.map_or("unknown", |t| t.as_str()),
                    ),
                    Some(step.id.clone()),
                )
                .with_field(field.to_string()),
            );
        }
        TypeMatch::Unknown => {
            let diag = if source.is_some() && target.is_some() {
                Diagnostic::warning(
                    Stage::Mapping,
                    DiagnosticKind::UnknownTypeMismatch,
                    format!(
                        "field '{}' of step '{}' maps {} into {}",
                        field,
                        step.id,
                        source.map_or("unknown", |t| t.as_str()),
                        target.map_or("unknown", |t| t.as_str()),
                    ),
                    Some(step.id.clone()),
                )
            } else {
                Diagnostic::info(
                    Stage::Mapping,
                    DiagnosticKind::UnknownTypeMismatch,
                    format!(
                        "type of field '{}' of step '{}' cannot be determined",
                        field, step.id
                    ),
                    Some(step.id.clone()),
                )
            };
            diagnostics.push(diag.with_field(field.to_string()));
        }
    }
}
