use crate::app::command_support::load_recipe_file;
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::engine::{run_pipeline_with_limits, ExecutionState, RunReport};
use crate::pipeline::Pipeline;
use crate::shared::logging::append_run_log;
use std::io::Read;
use std::path::Path;

const USAGE: &str = "usage: run <recipe> [--input <text>] [--trace]";

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunArgs {
    recipe: String,
    input: Option<String>,
    trace: bool,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs, String> {
    let mut recipe = None;
    let mut input = None;
    let mut trace = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--input" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "missing value for `--input`".to_string())?;
                input = Some(value.clone());
            }
            "--trace" => trace = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option `{flag}`")),
            _ if recipe.is_none() => recipe = Some(arg.clone()),
            _ => return Err(USAGE.to_string()),
        }
    }
    Ok(RunArgs {
        recipe: recipe.ok_or_else(|| USAGE.to_string())?,
        input,
        trace,
    })
}

pub fn cmd_run(args: &[String], settings: &Settings, stdin: &mut dyn Read) -> Result<String, String> {
    let run_args = parse_run_args(args)?;
    let catalog = Catalog::builtin();
    let pipeline = load_recipe_file(catalog, Path::new(&run_args.recipe))?;
    let input = match run_args.input {
        Some(input) => input,
        None => {
            let mut buffer = String::new();
            stdin
                .read_to_string(&mut buffer)
                .map_err(|err| format!("failed to read input from stdin: {err}"))?;
            buffer
        }
    };

    let report = run_pipeline_with_limits(catalog, &input, &pipeline, settings.execution_limits());
    let failure = failure_summary(&pipeline, &report);
    if let Some(run_log) = settings.run_log.as_deref() {
        let (level, message) = match &failure {
            Some(failure) => ("error", format!("recipe={} {failure}", run_args.recipe)),
            None => (
                "info",
                format!(
                    "recipe={} steps={} output_bytes={}",
                    run_args.recipe,
                    pipeline.len(),
                    report.output.len()
                ),
            ),
        };
        append_run_log(run_log, level, "pipeline.run", &message);
    }

    if run_args.trace {
        return Ok(render_trace(&pipeline, &report));
    }
    match failure {
        Some(failure) => Err(failure),
        None => Ok(report.output),
    }
}

fn failure_summary(pipeline: &Pipeline, report: &RunReport) -> Option<String> {
    pipeline
        .steps()
        .iter()
        .enumerate()
        .find_map(|(index, step)| {
            report.state(step.id()).and_then(ExecutionState::error).map(|error| {
                format!(
                    "step {} `{}` failed: {error}",
                    index + 1,
                    step.operation_id()
                )
            })
        })
}

fn render_trace(pipeline: &Pipeline, report: &RunReport) -> String {
    let mut lines = Vec::with_capacity(pipeline.len() + 2);
    for (index, step) in pipeline.steps().iter().enumerate() {
        let line = match report.state(step.id()) {
            Some(ExecutionState::Output(output)) => format!(
                "step {} {} ok: {output}",
                index + 1,
                step.operation_id()
            ),
            Some(ExecutionState::Error(error)) => format!(
                "step {} {} error: {error}",
                index + 1,
                step.operation_id()
            ),
            None => format!("step {} {} skipped", index + 1, step.operation_id()),
        };
        lines.push(line);
    }
    lines.push(String::new());
    lines.push(report.output.clone());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn run_args_accept_flags_in_any_order() {
        let parsed =
            parse_run_args(&args(&["--trace", "recipe.json", "--input", "hi"])).expect("parse");
        assert_eq!(
            parsed,
            RunArgs {
                recipe: "recipe.json".to_string(),
                input: Some("hi".to_string()),
                trace: true,
            }
        );
    }

    #[test]
    fn run_args_reject_missing_recipe_and_unknown_flags() {
        assert_eq!(parse_run_args(&args(&["--trace"])), Err(USAGE.to_string()));
        assert!(parse_run_args(&args(&["r.json", "--json"]))
            .expect_err("unknown flag")
            .contains("unknown option `--json`"));
        assert!(parse_run_args(&args(&["r.json", "--input"]))
            .expect_err("missing value")
            .contains("--input"));
    }
}
