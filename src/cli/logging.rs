//! Logging setup
//!
//! Outside CI, logs are plain `tracing` lines on stderr whose level follows `-v`.
//! Inside GitHub Actions they are rendered as workflow commands (`::debug::`,
//! `::notice::`, `::warning::`, `::error::`) so the runner annotates the step.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::output::escape_data;

/// True when running as a GitHub Actions step
pub fn is_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// True when the workflow was re-run with debug logging enabled
fn runner_debug() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}

fn default_directive(verbose: u8, actions: bool) -> &'static str {
    if actions && runner_debug() {
        return "debug";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn setup_logging(verbose: u8, quiet: bool, actions: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, actions)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if actions {
        builder.event_format(WorkflowCommands).init();
    } else {
        builder.with_target(false).init();
    }
}

/// Formats each event as a single workflow command line
pub struct WorkflowCommands;

impl WorkflowCommands {
    fn command(level: &Level) -> &'static str {
        match *level {
            Level::ERROR => "::error::",
            Level::WARN => "::warning::",
            Level::INFO => "::notice::",
            _ => "::debug::",
        }
    }
}

impl<S, N> FormatEvent<S, N> for WorkflowCommands
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let mut message = String::new();
        ctx.field_format().format_fields(Writer::new(&mut message), event)?;

        let command = Self::command(event.metadata().level());
        writeln!(writer, "{command}{}", escape_data(&message))
    }
}
