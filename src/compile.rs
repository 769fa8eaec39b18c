//! Compile driver: orchestrates the stages and decides abort vs. emit.
//!
//! Stages run strictly in sequence: Ordering → Translating → Mapping →
//! Scanning → Emitting → Done, with Aborted reachable from Ordering or
//! Mapping on any error-severity diagnostic. Warnings and info never abort;
//! on success the full diagnostics list rides along with the pipeline.

use crate::diag::{self, Diagnostic, DiagnosticKind, Stage};
use crate::emit::{self, CompiledPipeline};
use crate::mapping;
use crate::model::{Step, WorkflowDefinition};
use crate::order;
use crate::requirements;
use crate::schema::{self, ValidationExpr};

/// Result of one compile invocation. `pipeline` is `None` iff the compile
/// aborted on an error diagnostic.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub pipeline: Option<CompiledPipeline>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn succeeded(&self) -> bool {
        self.pipeline.is_some()
    }

    fn aborted(diagnostics: Vec<Diagnostic>) -> Self {
        CompileOutput {
            pipeline: None,
            diagnostics,
        }
    }
}

/// Compile a workflow definition into a pipeline artifact plus diagnostics.
///
/// Pure and deterministic: the same definition always produces structurally
/// identical output, so callers may memoize on a content hash.
pub fn compile(workflow: &WorkflowDefinition) -> CompileOutput {
    // Ordering
    let order = match order::resolve(&workflow.steps, workflow.step_order.as_deref()) {
        Ok(order) => order,
        Err(diagnostics) => return CompileOutput::aborted(diagnostics),
    };
    let ordered_steps: Vec<&Step> = order.iter().map(|&i| &workflow.steps[i]).collect();

    // Translating — total; permissive fallbacks are surfaced as info.
    let mut diagnostics = Vec::new();
    let translated: Vec<(ValidationExpr, ValidationExpr)> = ordered_steps
        .iter()
        .map(|step| {
            if step.input_schema.contains_unknown() || step.output_schema.contains_unknown() {
                diagnostics.push(Diagnostic::info(
                    Stage::Translating,
                    DiagnosticKind::PermissiveTypeFallback,
                    format!(
                        "schema of step '{}' contains unknown-typed nodes; validating permissively",
                        step.id
                    ),
                    Some(step.id.clone()),
                ));
            }
            (
                schema::translate(&step.input_schema),
                schema::translate(&step.output_schema),
            )
        })
        .collect();

    // Mapping — the only stage that enforces dependency direction.
    let (resolved, mapping_diags) = mapping::resolve(
        &ordered_steps,
        &workflow.data_mappings,
        &workflow.runtime_inputs,
        &workflow.configs,
    );
    diagnostics.extend(mapping_diags);
    if diag::has_errors(&diagnostics) {
        return CompileOutput::aborted(diagnostics);
    }

    // Scanning
    let toolkit_requirements = requirements::scan(&ordered_steps);

    // Emitting
    let pipeline = emit::emit(
        workflow,
        &ordered_steps,
        &translated,
        &resolved,
        toolkit_requirements,
    );

    CompileOutput {
        pipeline: Some(pipeline),
        diagnostics,
    }
}
