//! ValidationExpr → Zod-style schema source text.

use crate::model::StringFormat;
use crate::schema::{FieldExpr, ValidationExpr};

/// Render a validation expression as a single-line schema expression.
pub fn render_expr(expr: &ValidationExpr) -> String {
    match expr {
        ValidationExpr::Any => "z.any()".into(),
        ValidationExpr::String { format } => match format {
            None => "z.string()".into(),
            Some(StringFormat::Email) => "z.string().email()".into(),
            Some(StringFormat::Url) => "z.string().url()".into(),
            Some(StringFormat::Date) => "z.string().date()".into(),
        },
        ValidationExpr::OneOf { values } => {
            let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("z.enum([{}])", quoted.join(", "))
        }
        ValidationExpr::Number => "z.number()".into(),
        ValidationExpr::Boolean => "z.boolean()".into(),
        ValidationExpr::Array { items } => format!("z.array({})", render_expr(items)),
        ValidationExpr::Object { fields } => render_object(fields),
    }
}

fn render_object(fields: &[FieldExpr]) -> String {
    if fields.is_empty() {
        return "z.object({})".into();
    }
    let rendered: Vec<String> = fields
        .iter()
        .map(|f| {
            let mut expr = render_expr(&f.expr);
            if f.optional {
                expr.push_str(".optional()");
            }
            format!("{}: {}", f.name, expr)
        })
        .collect();
    format!("z.object({{ {} }})", rendered.join(", "))
}

pub fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("\"{}\"", escaped)
}
