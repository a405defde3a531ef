use std::process::ExitCode;

use clap::Parser;
use pathgate::Cli;

fn main() -> ExitCode {
    Cli::parse().run()
}
