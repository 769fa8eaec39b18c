//! CompiledPipeline → pipeline source text.
//!
//! The rendered text is the live-preview representation of the artifact:
//! one step definition per step block, then the composition chain.

use super::validation::{quote, render_expr};
use super::writer::SourceWriter;
use super::{ArgumentBinding, ChainLink, CompiledPipeline, StepBlock, StepBody};
use crate::mapping::SourceExpr;

/// Render the full pipeline source.
pub fn render(pipeline: &CompiledPipeline) -> String {
    let mut w = SourceWriter::new();

    w.line(&format!(
        "// Pipeline: {} ({})",
        pipeline.workflow_name, pipeline.workflow_id
    ));
    if !pipeline.requirements.is_empty() {
        let toolkits: Vec<String> = pipeline
            .requirements
            .iter()
            .map(|r| format!("{} [{}]", r.toolkit_slug, r.tool_ids.join(", ")))
            .collect();
        w.line(&format!("// Toolkits: {}", toolkits.join(", ")));
    }
    w.blank();

    for block in &pipeline.steps {
        write_step_block(block, &mut w);
        w.blank();
    }

    write_chain(pipeline, &mut w);
    w.finish()
}

/// Step id → pipeline-source variable name. `-` is not a valid identifier
/// character in the target language.
pub fn step_var(step_id: &str) -> String {
    format!("step_{}", step_id.replace('-', "_"))
}

fn step_ref(step_id: &str) -> String {
    format!("steps.{}", step_id.replace('-', "_"))
}

/// Render a resolved source expression as a run-time access expression.
pub fn source_text(source: &SourceExpr) -> String {
    match source {
        SourceExpr::StepOutput { step_id, path } => {
            if path.is_empty() {
                step_ref(step_id)
            } else {
                format!("{}.{}", step_ref(step_id), path)
            }
        }
        SourceExpr::RuntimeInput { key } => format!("input.{}", key),
        SourceExpr::ConfigValue { key } => format!("config.{}", key),
        SourceExpr::Literal { value } => quote(value),
    }
}

fn write_step_block(block: &StepBlock, w: &mut SourceWriter) {
    w.block_open(&format!(
        "const {} = defineStep({},",
        step_var(&block.id),
        quote(&block.id)
    ));
    w.line(&format!("input: {},", render_expr(&block.input)));
    w.line(&format!("output: {},", render_expr(&block.output)));
    write_body(&block.body, w);
    w.block_close("});");
}

fn write_body(body: &StepBody, w: &mut SourceWriter) {
    match body {
        StepBody::ToolInvocation {
            toolkit_slug,
            tool_id,
            arguments,
        } => {
            if arguments.is_empty() {
                w.line(&format!(
                    "run: invokeTool({}, {}),",
                    quote(toolkit_slug),
                    quote(tool_id)
                ));
            } else {
                w.block_open(&format!(
                    "run: invokeTool({}, {},",
                    quote(toolkit_slug),
                    quote(tool_id)
                ));
                write_assignments(arguments, w);
                w.block_close("}),");
            }
        }
        StepBody::CustomCode { code } => {
            // Verbatim embed: the payload is opaque and never reformatted.
            w.block_open("run: async (input) =>");
            for line in code.lines() {
                w.raw_line(line);
            }
            w.block_close("},");
        }
        StepBody::TableQuery { table_id } => {
            w.line(&format!("run: tableQuery(table({})),", quote(table_id)));
        }
        StepBody::TableWrite { table_id } => {
            w.line(&format!("run: tableWrite(table({})),", quote(table_id)));
        }
        StepBody::Passthrough => {
            w.line("run: passthrough(),");
        }
    }
}

fn write_assignments(assignments: &[ArgumentBinding], w: &mut SourceWriter) {
    for binding in assignments {
        w.line(&format!(
            "{}: {},",
            binding.field,
            source_text(&binding.source)
        ));
    }
}

fn write_chain(pipeline: &CompiledPipeline, w: &mut SourceWriter) {
    let header = format!(
        "export const pipeline = definePipeline({})",
        quote(&pipeline.workflow_id)
    );
    if pipeline.chain.is_empty() && pipeline.output_schema.is_none() {
        w.line(&format!("{};", header));
        return;
    }

    w.line(&header);
    w.indent();
    let last = pipeline.chain.len().saturating_sub(1);
    for (i, link) in pipeline.chain.iter().enumerate() {
        let terminal = i == last && pipeline.output_schema.is_none();
        match link {
            ChainLink::Step { step_id } => {
                let semi = if terminal { ";" } else { "" };
                w.line(&format!(".then({}){}", step_var(step_id), semi));
            }
            ChainLink::Mapping {
                target_step_id,
                assignments,
            } => {
                w.block_open(&format!(".then(mapInto({},", quote(target_step_id)));
                write_assignments(assignments, w);
                w.block_close("}))");
            }
        }
    }
    if let Some(output) = &pipeline.output_schema {
        w.line(&format!(".returns({});", render_expr(output)));
    }
    w.dedent();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_text_variants() {
        assert_eq!(
            source_text(&SourceExpr::StepOutput {
                step_id: "fetch-1".into(),
                path: "title".into()
            }),
            "steps.fetch_1.title"
        );
        assert_eq!(
            source_text(&SourceExpr::StepOutput {
                step_id: "fetch".into(),
                path: "".into()
            }),
            "steps.fetch"
        );
        assert_eq!(
            source_text(&SourceExpr::RuntimeInput { key: "url".into() }),
            "input.url"
        );
        assert_eq!(
            source_text(&SourceExpr::ConfigValue {
                key: "apiKey".into()
            }),
            "config.apiKey"
        );
        assert_eq!(
            source_text(&SourceExpr::Literal {
                value: "hello".into()
            }),
            "\"hello\""
        );
    }

    #[test]
    fn step_var_sanitizes_dashes() {
        assert_eq!(step_var("fetch-issue-1"), "step_fetch_issue_1");
    }
}
