use std::process::ExitCode;

use anyhow::Result;

use crate::changes::ChangeSet;
use crate::cli::{Inputs, Output};
use crate::error::Error;
use crate::filter::{self, Evaluation};
use crate::output::{ListFormat, OutputSink, Outputs};

pub fn execute(inputs: &Inputs, output: &Output) -> Result<ExitCode> {
    // Every input is validated before the repository is touched
    let declaration = inputs
        .filters
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| Error::configuration("filters input is required"))?;
    let list_format: ListFormat = inputs.list_files.parse()?;
    let filters = filter::declaration::load(declaration)?;
    inputs.resolve.backend()?;

    let changes = inputs.resolve.resolve()?;
    tracing::info!(
        "Comparing {} to {} ({}): {} changed file(s)",
        changes.base.as_deref().unwrap_or("-"),
        changes.head.as_deref().unwrap_or("working tree"),
        changes.precision,
        changes.paths.len()
    );

    let evaluation = filter::evaluate(&filters, &changes.paths);
    let outputs = Outputs::from_evaluation(&evaluation, list_format)?;
    outputs.flush(&OutputSink::new(inputs.output_file.clone()))?;

    print_summary(&changes, &evaluation, output);
    Ok(ExitCode::SUCCESS)
}

fn print_summary(changes: &ChangeSet, evaluation: &Evaluation, output: &Output) {
    output.header("Changes");
    output.key_value("base", changes.base.as_deref().unwrap_or("(none)"), false);
    output.key_value("ref", changes.head.as_deref().unwrap_or("(working tree)"), false);
    output.key_value("diff", &changes.precision.to_string(), changes.precision.is_degraded());
    output.key_value("files", &changes.paths.len().to_string(), false);

    if changes.precision.is_degraded() {
        output.warning("merge-base unavailable, results may include changes made only on the base branch");
    }

    output.header("Filters");
    for (name, result) in evaluation.iter() {
        let status = if result.matched() { "matched" } else { "unchanged" };
        output.status_indicator(status, &format!("{name} ({} file(s))", result.count()), result.matched());
        for path in result.files() {
            output.match_line(path);
        }
    }

    let matched = evaluation.matched_names();
    if matched.is_empty() {
        output.info("No filter matched");
    } else {
        output.success(&format!("{} of {} filter(s) matched", matched.len(), evaluation.len()));
    }
}
