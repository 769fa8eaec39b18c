//! Step order resolution.
//!
//! Workflows are strict linear chains, never DAGs: the resolved sequence is
//! the single execution order consumed by every downstream stage, and step
//! *i* may only receive data from positions < *i* or from the runtime input.

use std::collections::{HashMap, HashSet};

use crate::diag::{Diagnostic, DiagnosticKind, Stage};
use crate::model::Step;

/// Resolve the canonical linear order for `steps`.
///
/// Returns indices into `steps`. An explicit order must be a permutation of
/// the step id set; absent an explicit order, document order is used.
pub fn resolve(
    steps: &[Step],
    explicit_order: Option<&[String]>,
) -> Result<Vec<usize>, Vec<Diagnostic>> {
    let mut errors = Vec::new();

    let positions = check_unique_ids(steps, &mut errors);

    let order = match explicit_order {
        Some(order) => resolve_explicit(steps, order, &positions, &mut errors),
        None => (0..steps.len()).collect(),
    };

    if errors.is_empty() { Ok(order) } else { Err(errors) }
}

/// Position of each step id in document order. Duplicates keep the first
/// occurrence and are reported.
fn check_unique_ids(steps: &[Step], errors: &mut Vec<Diagnostic>) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (idx, step) in steps.iter().enumerate() {
        if positions.contains_key(&step.id) {
            errors.push(Diagnostic::error(
                Stage::Ordering,
                DiagnosticKind::DuplicateStepId,
                format!("step id '{}' is declared more than once", step.id),
                Some(step.id.clone()),
            ));
        } else {
            positions.insert(step.id.clone(), idx);
        }
    }
    positions
}

fn resolve_explicit(
    steps: &[Step],
    order: &[String],
    positions: &HashMap<String, usize>,
    errors: &mut Vec<Diagnostic>,
) -> Vec<usize> {
    let mut resolved = Vec::with_capacity(order.len());
    let mut seen = HashSet::new();

    for id in order {
        match positions.get(id) {
            Some(&idx) => {
                if !seen.insert(id.as_str()) {
                    errors.push(Diagnostic::error(
                        Stage::Ordering,
                        DiagnosticKind::IncompleteOrder,
                        format!("explicit order lists step '{}' more than once", id),
                        Some(id.clone()),
                    ));
                } else {
                    resolved.push(idx);
                }
            }
            None => {
                errors.push(Diagnostic::error(
                    Stage::Ordering,
                    DiagnosticKind::UnknownStepReference,
                    format!("explicit order references unknown step '{}'", id),
                    Some(id.clone()),
                ));
            }
        }
    }

    for step in steps {
        if !seen.contains(step.id.as_str()) {
            errors.push(Diagnostic::error(
                Stage::Ordering,
                DiagnosticKind::IncompleteOrder,
                format!("explicit order is missing step '{}'", step.id),
                Some(step.id.clone()),
            ));
        }
    }

    resolved
}
