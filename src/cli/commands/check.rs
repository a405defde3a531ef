use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::cli::Output;
use crate::filter::glob;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Glob pattern to test
    pub pattern: String,

    /// Paths to test against the pattern
    #[arg(required = true)]
    pub paths: Vec<String>,
}

pub fn execute(args: &CheckArgs, output: &Output) -> Result<ExitCode> {
    let matcher = glob::compile(&args.pattern);
    tracing::debug!("Pattern '{}' compiled to {}", args.pattern, glob::glob_to_regex(&args.pattern));

    let mut matched = 0usize;
    for path in &args.paths {
        let is_match = matcher.is_match(path);
        if is_match {
            matched += 1;
            println!("{path}");
        }
        let status = if is_match { "match" } else { "no match" };
        output.status_indicator(status, path, is_match);
    }

    if matched == 0 {
        output.warning(&format!("No path matches '{}'", args.pattern));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
