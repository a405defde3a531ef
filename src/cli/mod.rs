//! Command-line interface for pathgate
//!
//! With no subcommand the binary behaves as the CI step: it reads its inputs
//! from flags or the step environment, evaluates the filters and writes outputs.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

pub mod args;
mod commands;
pub mod logging;
mod output;

pub use args::{Inputs, ResolveArgs};
pub use commands::check::CheckArgs;
pub use output::Output;

use crate::error::Error;

#[derive(Parser, Debug)]
#[command(
    name = "pathgate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Report which named path filters match the files changed in a commit range",
    long_about = None
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub inputs: Inputs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the filters and write step outputs (default)
    Run,
    /// Print the changed paths, one per line
    Changed,
    /// Test paths against a single pattern
    Check(CheckArgs),
}

impl Cli {
    pub fn run(self) -> ExitCode {
        let actions = logging::is_github_actions();
        logging::setup_logging(self.verbose, self.quiet, actions);
        let output = Output::new(self.quiet, actions);

        match self.execute(&output) {
            Ok(code) => code,
            Err(err) => {
                output.error(&format!("{err:#}"));
                let (kind, code) = err
                    .downcast_ref::<Error>()
                    .map_or(("internal", 1), |e| (e.kind(), e.exit_code()));
                tracing::debug!("Exiting with status {} after a {} error", code, kind);
                ExitCode::from(code)
            }
        }
    }

    fn execute(self, output: &Output) -> anyhow::Result<ExitCode> {
        let Cli { inputs, command, .. } = self;

        match command.unwrap_or(Commands::Run) {
            Commands::Run => commands::run::execute(&inputs, output),
            Commands::Changed => commands::changed::execute(&inputs.resolve, output),
            Commands::Check(args) => commands::check::execute(&args, output),
        }
    }
}
