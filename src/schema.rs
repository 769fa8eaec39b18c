//! Schema translation: `SchemaNode` trees → validation expressions.
//!
//! Pure and total: malformed or unknown-typed nodes fall back to a
//! permissive `Any` expression rather than erroring. Rendering to schema
//! source text lives in `emit::validation`.

use serde::Serialize;

use crate::model::{SchemaNode, StringFormat};

/// Validation-schema expression consumed by the pipeline runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "expr")]
pub enum ValidationExpr {
    Any,
    String { format: Option<StringFormat> },
    /// Closed value set; replaces the bare string expression.
    OneOf { values: Vec<String> },
    Number,
    Boolean,
    Array { items: Box<ValidationExpr> },
    Object { fields: Vec<FieldExpr> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldExpr {
    pub name: String,
    pub expr: ValidationExpr,
    pub optional: bool,
}

/// Translate a schema tree into a validation expression. Never fails.
pub fn translate(node: &SchemaNode) -> ValidationExpr {
    match node {
        SchemaNode::String {
            format,
            enum_values,
        } => match enum_values {
            Some(values) if !values.is_empty() => ValidationExpr::OneOf {
                values: values.clone(),
            },
            _ => ValidationExpr::String { format: *format },
        },
        SchemaNode::Number => ValidationExpr::Number,
        SchemaNode::Boolean => ValidationExpr::Boolean,
        SchemaNode::Array { items } => ValidationExpr::Array {
            items: Box::new(match items {
                Some(item) => translate(item),
                None => ValidationExpr::Any,
            }),
        },
        SchemaNode::Object { fields, required } => ValidationExpr::Object {
            fields: fields
                .iter()
                .map(|f| FieldExpr {
                    name: f.name.clone(),
                    expr: translate(&f.schema),
                    optional: !required.iter().any(|r| r == &f.name),
                })
                .collect(),
        },
        SchemaNode::Unknown => ValidationExpr::Any,
    }
}
