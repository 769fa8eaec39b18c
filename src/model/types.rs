//! Rust types for the workflow document supplied by the editor.
//!
//! These types are the serde target for the builder's workflow JSON. The
//! compiler receives a fully-materialized `WorkflowDefinition` and never
//! mutates it; structural validation of the document itself is the caller's
//! responsibility.

use serde::{Deserialize, Serialize};

/// Sentinel `sourceStepId` meaning "workflow runtime input" rather than a
/// prior step's output.
pub const RUNTIME_INPUT_SOURCE: &str = "__input__";

// =============================================================================
// TOP-LEVEL WORKFLOW
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<Step>,
    /// Explicit execution order (list of step ids). When absent, steps run
    /// in document order.
    #[serde(default)]
    pub step_order: Option<Vec<String>>,
    #[serde(default)]
    pub data_mappings: Vec<DataMapping>,
    #[serde(default)]
    pub runtime_inputs: Vec<RuntimeInput>,
    #[serde(default)]
    pub configs: Vec<ConfigDecl>,
    /// Declared shape of the workflow's overall output.
    #[serde(default)]
    pub output_schema: Option<SchemaNode>,
}

// =============================================================================
// STEPS — tagged union over the five step kinds
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub label: Option<String>,
    #[serde(flatten)]
    pub payload: StepPayload,
    pub input_schema: SchemaNode,
    pub output_schema: SchemaNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StepPayload {
    #[serde(rename = "integrationCall", rename_all = "camelCase")]
    IntegrationCall {
        toolkit_slug: String,
        tool_id: String,
        /// Human-readable toolkit name from the catalog, if known.
        toolkit_name: Option<String>,
    },
    #[serde(rename = "customCode")]
    CustomCode {
        /// Opaque code block, embedded verbatim at emission. Never parsed.
        code: String,
    },
    #[serde(rename = "tableQuery")]
    TableQuery { table: TableRef },
    #[serde(rename = "tableWrite")]
    TableWrite { table: TableRef },
    #[serde(rename = "passthrough")]
    Passthrough,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub table_id: String,
    pub name: Option<String>,
}

impl Step {
    pub fn kind_name(&self) -> &'static str {
        match &self.payload {
            StepPayload::IntegrationCall { .. } => "integrationCall",
            StepPayload::CustomCode { .. } => "customCode",
            StepPayload::TableQuery { .. } => "tableQuery",
            StepPayload::TableWrite { .. } => "tableWrite",
            StepPayload::Passthrough => "passthrough",
        }
    }
}

// =============================================================================
// SCHEMA NODES — recursive structural shape description
// =============================================================================

/// Recursive description of a value's shape. Closed variant set so every
/// translation and mapping branch is exhaustively matchable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SchemaNode {
    #[serde(rename = "string")]
    String {
        #[serde(default)]
        format: Option<StringFormat>,
        /// Closed value set; replaces the bare string type when present.
        #[serde(default, rename = "enum")]
        enum_values: Option<Vec<String>>,
    },
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "array")]
    Array {
        #[serde(default)]
        items: Option<Box<SchemaNode>>,
    },
    #[serde(rename = "object")]
    Object {
        /// Ordered: field order is significant for deterministic output.
        #[serde(default)]
        fields: Vec<ObjectField>,
        #[serde(default)]
        required: Vec<String>,
    },
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectField {
    pub name: String,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringFormat {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "date")]
    Date,
}

impl SchemaNode {
    /// Empty object schema, the default for steps with no declared fields.
    pub fn empty_object() -> Self {
        SchemaNode::Object {
            fields: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::String { .. } => "string",
            SchemaNode::Number => "number",
            SchemaNode::Boolean => "boolean",
            SchemaNode::Array { .. } => "array",
            SchemaNode::Object { .. } => "object",
            SchemaNode::Unknown => "unknown",
        }
    }

    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            SchemaNode::String { .. } => Some(FieldType::String),
            SchemaNode::Number => Some(FieldType::Number),
            SchemaNode::Boolean => Some(FieldType::Boolean),
            SchemaNode::Array { .. } => Some(FieldType::Array),
            SchemaNode::Object { .. } => Some(FieldType::Object),
            SchemaNode::Unknown => None,
        }
    }

    /// True if any node in this tree is `Unknown` (falls back to a
    /// permissive validation expression).
    pub fn contains_unknown(&self) -> bool {
        match self {
            SchemaNode::Unknown => true,
            SchemaNode::Array { items } => {
                items.as_ref().is_some_and(|i| i.contains_unknown())
            }
            SchemaNode::Object { fields, .. } => {
                fields.iter().any(|f| f.schema.contains_unknown())
            }
            _ => false,
        }
    }
}

// =============================================================================
// DATA MAPPINGS — field-level wiring between steps
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMapping {
    /// A step id, or [`RUNTIME_INPUT_SOURCE`].
    pub source_step_id: String,
    pub target_step_id: String,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    /// Dot-path into the source step's output schema, or a runtime-input /
    /// config key, or a static literal value.
    pub source_path: String,
    /// Direct child field of the target step's input schema.
    pub target_field: String,
    /// Producer-declared types. Fallbacks only; the compiler recomputes the
    /// match from the schemas it holds.
    #[serde(default)]
    pub source_type: Option<FieldType>,
    #[serde(default)]
    pub target_type: Option<FieldType>,
    #[serde(default)]
    pub type_match: Option<TypeMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "object")]
    Object,
}

impl FieldType {
    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Number | FieldType::Boolean)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeMatch {
    #[serde(rename = "exact")]
    Exact,
    #[serde(rename = "coercible")]
    Coercible,
    #[serde(rename = "unknown")]
    Unknown,
}

// =============================================================================
// RUNTIME INPUTS & CONFIG
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInput {
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: FieldType,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDecl {
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: FieldType,
    /// Closed option set, when the config is an enumeration.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub default: Option<String>,
}
