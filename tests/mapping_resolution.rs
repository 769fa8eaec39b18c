//! Field mapping resolver behavior: source classification, precedence,
//! and type-match diagnostics.

mod helpers;

use flowpipe_compiler::diag::{DiagnosticKind, Severity};
use flowpipe_compiler::mapping::{self, SourceExpr};
use flowpipe_compiler::model::{FieldType, SchemaNode, Step, TypeMatch};
use helpers::*;

fn resolve_one(
    steps: Vec<Step>,
    mappings: Vec<flowpipe_compiler::model::DataMapping>,
    inputs: Vec<flowpipe_compiler::model::RuntimeInput>,
    configs: Vec<flowpipe_compiler::model::ConfigDecl>,
) -> (
    mapping::ResolvedMappings,
    Vec<flowpipe_compiler::diag::Diagnostic>,
) {
    let refs: Vec<&Step> = steps.iter().collect();
    mapping::resolve(&refs, &mappings, &inputs, &configs)
}

#[test]
fn input_sentinel_prefers_runtime_inputs_over_configs() {
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("to", str_schema())], &["to"]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![target],
        vec![mapping("__input__", "send", vec![("to", "to")])],
        vec![runtime_input("to", FieldType::String, true)],
        vec![config("to", FieldType::String)],
    );

    assert!(diags.is_empty());
    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(field.source, SourceExpr::RuntimeInput { key: "to".into() });
    assert_eq!(field.type_match, TypeMatch::Exact);
}

#[test]
fn input_sentinel_falls_back_to_config() {
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("region", str_schema())], &[]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![target],
        vec![mapping("__input__", "send", vec![("region", "region")])],
        vec![],
        vec![config("region", FieldType::String)],
    );

    assert!(diags.is_empty());
    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(
        field.source,
        SourceExpr::ConfigValue {
            key: "region".into()
        }
    );
}

#[test]
fn input_sentinel_falls_back_to_literal() {
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("subject", str_schema())], &[]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![target],
        vec![mapping("__input__", "send", vec![("Weekly report", "subject")])],
        vec![],
        vec![],
    );

    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(
        field.source,
        SourceExpr::Literal {
            value: "Weekly report".into()
        }
    );
    // Literal type is indeterminate: advisory info only, never a warning.
    assert_eq!(field.type_match, TypeMatch::Unknown);
    assert!(
        diags
            .iter()
            .all(|d| d.severity == Severity::Info),
        "got: {:?}",
        diags
    );
}

#[test]
fn last_declared_mapping_wins() {
    let source = integration_step(
        "fetch",
        "github",
        "GITHUB_GET_ISSUE",
        obj(vec![], &[]),
        obj(
            vec![("title", str_schema()), ("url", str_schema())],
            &["title", "url"],
        ),
    );
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("body", str_schema())], &["body"]),
        obj(vec![], &[]),
    );
    let (resolved, _) = resolve_one(
        vec![source, target],
        vec![mapping(
            "fetch",
            "send",
            vec![("title", "body"), ("url", "body")],
        )],
        vec![],
        vec![],
    );

    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(
        field.source,
        SourceExpr::StepOutput {
            step_id: "fetch".into(),
            path: "url".into()
        }
    );
}

#[test]
fn dot_path_resolves_nested_output() {
    let source = integration_step(
        "fetch",
        "github",
        "GITHUB_GET_ISSUE",
        obj(vec![], &[]),
        obj(
            vec![(
                "issue",
                obj(vec![("author", obj(vec![("email", str_schema())], &[]))], &[]),
            )],
            &[],
        ),
    );
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("to", str_schema())], &["to"]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![source, target],
        vec![mapping("fetch", "send", vec![("issue.author.email", "to")])],
        vec![],
        vec![],
    );

    assert!(diags.is_empty(), "got: {:?}", diags);
    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(field.type_match, TypeMatch::Exact);
    assert_eq!(
        field.source,
        SourceExpr::StepOutput {
            step_id: "fetch".into(),
            path: "issue.author.email".into()
        }
    );
}

#[test]
fn coercible_scalars_record_info_only() {
    let source = integration_step(
        "count",
        "stats",
        "STATS_COUNT",
        obj(vec![], &[]),
        obj(vec![("total", SchemaNode::Number)], &["total"]),
    );
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("body", str_schema())], &["body"]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![source, target],
        vec![mapping("count", "send", vec![("total", "body")])],
        vec![],
        vec![],
    );

    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(field.type_match, TypeMatch::Coercible);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::CoercibleTypeMismatch);
    assert_eq!(diags[0].severity, Severity::Info);
}

#[test]
fn shape_mismatch_records_warning() {
    let source = integration_step(
        "fetch",
        "github",
        "GITHUB_GET_ISSUE",
        obj(vec![], &[]),
        obj(vec![("issue", obj(vec![], &[]))], &["issue"]),
    );
    let target = integration_step(
        "send",
        "gmail",
        "GMAIL_SEND_EMAIL",
        obj(vec![("body", str_schema())], &["body"]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![source, target],
        vec![mapping("fetch", "send", vec![("issue", "body")])],
        vec![],
        vec![],
    );

    let field = &resolved.for_step("send").unwrap().fields[0];
    assert_eq!(field.type_match, TypeMatch::Unknown);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::UnknownTypeMismatch);
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn empty_source_path_is_entire_output() {
    let source = integration_step(
        "fetch",
        "github",
        "GITHUB_GET_ISSUE",
        obj(vec![], &[]),
        obj(vec![("title", str_schema())], &["title"]),
    );
    let target = code_step(
        "transform",
        "return input.payload;",
        obj(vec![("payload", obj(vec![], &[]))], &["payload"]),
        obj(vec![], &[]),
    );
    let (resolved, diags) = resolve_one(
        vec![source, target],
        vec![mapping("fetch", "transform", vec![("", "payload")])],
        vec![],
        vec![],
    );

    assert!(diags.is_empty(), "got: {:?}", diags);
    let field = &resolved.for_step("transform").unwrap().fields[0];
    assert_eq!(field.type_match, TypeMatch::Exact);
    assert_eq!(
        field.source,
        SourceExpr::StepOutput {
            step_id: "fetch".into(),
            path: "".into()
        }
    );
}

#[test]
fn non_object_input_schema_has_no_mappable_fields() {
    let mut target = passthrough_step("sink");
    target.input_schema = SchemaNode::Unknown;
    let (resolved, diags) = resolve_one(vec![target], vec![], vec![], vec![]);

    assert!(diags.is_empty());
    assert!(resolved.for_step("sink").unwrap().fields.is_empty());
}
