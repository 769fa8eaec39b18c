//! Toolkit requirement scan.
//!
//! Derives the set of external integrations a compiled workflow depends on.
//! Informational only: connection existence is checked by the editor's
//! connection manager, not here.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Step, StepPayload};

/// One external toolkit the workflow calls into, with the distinct tool ids
/// it uses. Derived per compile, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolkitRequirement {
    pub toolkit_slug: String,
    pub display_name: String,
    pub tool_ids: Vec<String>,
}

/// Group integration-call steps by toolkit slug. Output is sorted by slug,
/// tool ids sorted and de-duplicated, for deterministic artifacts.
pub fn scan(ordered_steps: &[&Step]) -> Vec<ToolkitRequirement> {
    let mut by_slug: BTreeMap<&str, (Option<&str>, Vec<&str>)> = BTreeMap::new();

    for step in ordered_steps {
        if let StepPayload::IntegrationCall {
            toolkit_slug,
            tool_id,
            toolkit_name,
        } = &step.payload
        {
            let entry = by_slug.entry(toolkit_slug).or_default();
            if entry.0.is_none() {
                entry.0 = toolkit_name.as_deref();
            }
            entry.1.push(tool_id);
        }
    }

    by_slug
        .into_iter()
        .map(|(slug, (name, mut tool_ids))| {
            tool_ids.sort_unstable();
            tool_ids.dedup();
            ToolkitRequirement {
                toolkit_slug: slug.to_string(),
                display_name: name.unwrap_or(slug).to_string(),
                tool_ids: tool_ids.into_iter().map(String::from).collect(),
            }
        })
        .collect()
}
