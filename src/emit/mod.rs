//! Pipeline emission: assembles the compiled artifact.
//!
//! The artifact is a value object (`CompiledPipeline`); `render` turns it
//! into preview source text for the editor. Consumers may persist either.

pub mod render;
pub mod validation;
pub mod writer;

use serde::Serialize;

use crate::mapping::{ResolvedMappings, SourceExpr};
use crate::model::{Step, StepPayload, WorkflowDefinition};
use crate::requirements::ToolkitRequirement;
use crate::schema::ValidationExpr;

/// The compiled, executable representation of a workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledPipeline {
    pub workflow_id: String,
    pub workflow_name: String,
    pub steps: Vec<StepBlock>,
    pub chain: Vec<ChainLink>,
    pub requirements: Vec<ToolkitRequirement>,
    /// Declared workflow output, translated. None when undeclared.
    pub output_schema: Option<ValidationExpr>,
}

/// One step of the pipeline: schemas plus the execution body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepBlock {
    pub id: String,
    pub label: Option<String>,
    pub input: ValidationExpr,
    pub output: ValidationExpr,
    pub body: StepBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "body")]
pub enum StepBody {
    /// Invocation template resolved against the live tool catalog at run time.
    ToolInvocation {
        toolkit_slug: String,
        tool_id: String,
        arguments: Vec<ArgumentBinding>,
    },
    /// Opaque user code, embedded verbatim.
    CustomCode { code: String },
    /// Table reference placeholders are resolved by the runtime.
    TableQuery { table_id: String },
    TableWrite { table_id: String },
    Passthrough,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgumentBinding {
    pub field: String,
    pub source: SourceExpr,
}

/// The composition chain: steps in execution order, with a mapping link
/// inserted immediately before any step whose resolved mappings are
/// non-empty.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "link")]
pub enum ChainLink {
    Mapping {
        target_step_id: String,
        assignments: Vec<ArgumentBinding>,
    },
    Step {
        step_id: String,
    },
}

/// Assemble the compiled pipeline from the outputs of the earlier stages.
///
/// `translated` holds (input, output) validation expressions per ordered step.
pub fn emit(
    workflow: &WorkflowDefinition,
    ordered_steps: &[&Step],
    translated: &[(ValidationExpr, ValidationExpr)],
    resolved: &ResolvedMappings,
    requirements: Vec<ToolkitRequirement>,
) -> CompiledPipeline {
    let mut steps = Vec::with_capacity(ordered_steps.len());
    let mut chain = Vec::new();

    for (step, (input, output)) in ordered_steps.iter().zip(translated) {
        let bindings: Vec<ArgumentBinding> = resolved
            .for_step(&step.id)
            .map(|m| {
                m.fields
                    .iter()
                    .map(|f| ArgumentBinding {
                        field: f.target_field.clone(),
                        source: f.source.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if !bindings.is_empty() {
            chain.push(ChainLink::Mapping {
                target_step_id: step.id.clone(),
                assignments: bindings.clone(),
            });
        }
        chain.push(ChainLink::Step {
            step_id: step.id.clone(),
        });

        steps.push(StepBlock {
            id: step.id.clone(),
            label: step.label.clone(),
            input: input.clone(),
            output: output.clone(),
            body: step_body(step, bindings),
        });
    }

    CompiledPipeline {
        workflow_id: workflow.id.clone(),
        workflow_name: workflow.name.clone(),
        steps,
        chain,
        requirements,
        output_schema: workflow.output_schema.as_ref().map(crate::schema::translate),
    }
}

fn step_body(step: &Step, arguments: Vec<ArgumentBinding>) -> StepBody {
    match &step.payload {
        StepPayload::IntegrationCall {
            toolkit_slug,
            tool_id,
            ..
        } => StepBody::ToolInvocation {
            toolkit_slug: toolkit_slug.clone(),
            tool_id: tool_id.clone(),
            arguments,
        },
        StepPayload::CustomCode { code } => StepBody::CustomCode { code: code.clone() },
        StepPayload::TableQuery { table } => StepBody::TableQuery {
            table_id: table.table_id.clone(),
        },
        StepPayload::TableWrite { table } => StepBody::TableWrite {
            table_id: table.table_id.clone(),
        },
        StepPayload::Passthrough => StepBody::Passthrough,
    }
}
