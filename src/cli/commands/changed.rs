use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;

use crate::cli::{Output, ResolveArgs};
use crate::error::Error;

pub fn execute(args: &ResolveArgs, output: &Output) -> Result<ExitCode> {
    let changes = args.resolve()?;

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    for path in &changes.paths {
        writeln!(lock, "{path}").map_err(Error::from)?;
    }
    lock.flush().map_err(Error::from)?;

    if changes.precision.is_degraded() {
        output.warning("merge-base unavailable, diffed base and ref directly");
    }
    Ok(ExitCode::SUCCESS)
}
