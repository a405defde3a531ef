//! Run inputs
//!
//! Every input can be given as a flag or through the environment variable a
//! GitHub Actions step sets for it, so the binary works unchanged as an action
//! entrypoint and from a shell.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::changes::{self, ChangeSet, Event, EventKind, EventPayload};
use crate::error::Error;
use crate::git::Backend;

/// Inputs of the `run` command
#[derive(Args, Debug, Clone, Default)]
pub struct Inputs {
    /// Filter declaration (JSON or YAML), or @FILE to read it from a file
    #[arg(long, env = "INPUT_FILTERS", global = true, hide_env_values = true)]
    pub filters: Option<String>,

    /// How to list matched files: none, json, csv, shell, escape
    #[arg(long, env = "INPUT_LIST_FILES", global = true, default_value = "none")]
    pub list_files: String,

    /// File to append outputs to; prints ::set-output commands when unset
    #[arg(long, env = "GITHUB_OUTPUT", global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

/// Inputs that decide which commits are compared
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Base revision to compare against
    #[arg(long, env = "INPUT_BASE", global = true)]
    pub base: Option<String>,

    /// Revision to compare
    #[arg(long = "ref", env = "INPUT_REF", global = true, value_name = "REF")]
    pub git_ref: Option<String>,

    /// Repository working directory
    #[arg(long, env = "INPUT_WORKING_DIRECTORY", global = true, default_value = ".")]
    pub working_directory: PathBuf,

    /// Diff backend: git (run the git executable) or libgit2
    #[arg(long, env = "INPUT_BACKEND", global = true, default_value = "git")]
    pub backend: String,

    /// Name of the triggering event (push, pull_request, ...)
    #[arg(long, env = "GITHUB_EVENT_NAME", global = true)]
    pub event_name: Option<String>,

    /// Path of the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH", global = true, value_name = "FILE")]
    pub event_path: Option<PathBuf>,

    /// Commit that triggered the run
    #[arg(long, env = "GITHUB_SHA", global = true)]
    pub sha: Option<String>,
}

impl ResolveArgs {
    pub fn working_directory(&self) -> &Path {
        if self.working_directory.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.working_directory
        }
    }

    pub fn backend(&self) -> Result<Backend, Error> {
        self.backend.parse().map_err(Error::configuration)
    }

    /// The triggering event, read from the payload file when there is one
    pub fn event(&self) -> Event {
        let kind = EventKind::from_name(self.event_name.as_deref());
        if kind == EventKind::Other {
            return Event::Other;
        }

        let event_path = self.event_path.as_deref().filter(|p| !p.as_os_str().is_empty());
        let payload = EventPayload::load(event_path);
        let sha = self.sha.clone().filter(|s| !s.trim().is_empty());
        Event::new(kind, payload, sha)
    }

    /// Resolve the change set described by these inputs
    pub fn resolve(&self) -> Result<ChangeSet, Error> {
        let backend = self.backend()?;
        changes::resolve(
            &self.event(),
            self.base.as_deref(),
            self.git_ref.as_deref(),
            self.working_directory(),
            backend,
        )
    }
}
