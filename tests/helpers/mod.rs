use flowpipe_compiler::model::*;

// =============================================================================
// Schema builders
// =============================================================================

pub fn str_schema() -> SchemaNode {
    SchemaNode::String {
        format: None,
        enum_values: None,
    }
}

pub fn obj(fields: Vec<(&str, SchemaNode)>, required: &[&str]) -> SchemaNode {
    SchemaNode::Object {
        fields: fields
            .into_iter()
            .map(|(name, schema)| ObjectField {
                name: name.into(),
                schema,
            })
            .collect(),
        required: required.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// Step builders
// =============================================================================

pub fn integration_step(
    id: &str,
    toolkit: &str,
    tool: &str,
    input: SchemaNode,
    output: SchemaNode,
) -> Step {
    Step {
        id: id.into(),
        label: None,
        payload: StepPayload::IntegrationCall {
            toolkit_slug: toolkit.into(),
            tool_id: tool.into(),
            toolkit_name: None,
        },
        input_schema: input,
        output_schema: output,
    }
}

pub fn code_step(id: &str, code: &str, input: SchemaNode, output: SchemaNode) -> Step {
    Step {
        id: id.into(),
        label: None,
        payload: StepPayload::CustomCode { code: code.into() },
        input_schema: input,
        output_schema: output,
    }
}

pub fn table_query_step(id: &str, table_id: &str, output: SchemaNode) -> Step {
    Step {
        id: id.into(),
        label: None,
        payload: StepPayload::TableQuery {
            table: TableRef {
                table_id: table_id.into(),
                name: None,
            },
        },
        input_schema: SchemaNode::empty_object(),
        output_schema: output,
    }
}

pub fn passthrough_step(id: &str) -> Step {
    Step {
        id: id.into(),
        label: None,
        payload: StepPayload::Passthrough,
        input_schema: SchemaNode::empty_object(),
        output_schema: SchemaNode::empty_object(),
    }
}

// =============================================================================
// Workflow + mapping builders
// =============================================================================

pub fn workflow(id: &str, steps: Vec<Step>) -> WorkflowDefinition {
    WorkflowDefinition {
        id: id.into(),
        name: format!("Workflow {}", id),
        description: None,
        steps,
        step_order: None,
        data_mappings: vec![],
        runtime_inputs: vec![],
        configs: vec![],
        output_schema: None,
    }
}

pub fn mapping(source: &str, target: &str, fields: Vec<(&str, &str)>) -> DataMapping {
    DataMapping {
        source_step_id: source.into(),
        target_step_id: target.into(),
        fields: fields
            .into_iter()
            .map(|(source_path, target_field)| FieldMapping {
                source_path: source_path.into(),
                target_field: target_field.into(),
                source_type: None,
                target_type: None,
                type_match: None,
            })
            .collect(),
    }
}

pub fn runtime_input(key: &str, value_type: FieldType, required: bool) -> RuntimeInput {
    RuntimeInput {
        key: key.into(),
        value_type,
        required,
        description: None,
    }
}

pub fn config(key: &str, value_type: FieldType) -> ConfigDecl {
    ConfigDecl {
        key: key.into(),
        value_type,
        options: None,
        default: None,
    }
}
