//! Workflow document model: serde types + JSON input boundary.

pub mod types;

pub use types::*;

/// Error at the document input boundary. Compile-stage findings are
/// [`crate::diag::Diagnostic`]s, not errors.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to parse workflow JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deserialize a workflow JSON document into a `WorkflowDefinition`.
pub fn parse(json: &str) -> Result<WorkflowDefinition, ParseError> {
    Ok(serde_json::from_str::<WorkflowDefinition>(json)?)
}
