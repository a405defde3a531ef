//! Git integration layer for pathgate
//!
//! The change-set resolver only needs three questions answered by a repository,
//! captured by [`DiffProvider`]. Two backends implement it:
//!
//! - [`GitCommand`] runs the `git` executable (default, matches what CI runners ship)
//! - [`GitRepo`] uses libgit2 in-process through `git2`

pub mod command;
pub mod repo;

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

pub use command::GitCommand;
pub use repo::GitRepo;

/// Object id of the tree with no entries. Diffing against it lists every tracked file.
///
/// This is the SHA-1 id. Backends treat it as a marker and substitute the empty
/// tree of the repository's own object format.
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Failure reported by a git backend
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("invalid revision '{0}'")]
    InvalidRevision(String),

    #[error(transparent)]
    Git2(#[from] git2::Error),
}

/// The narrow view of a repository the change-set resolver depends on
pub trait DiffProvider {
    /// Nearest common ancestor of two revisions
    fn merge_base(&self, a: &str, b: &str) -> Result<String, GitError>;

    /// Paths that differ between `from` and `to`. `to = None` compares against the working tree.
    fn diff_name_only(&self, from: &str, to: Option<&str>) -> Result<Vec<String>, GitError>;

    /// Whether the revision resolves to a commit with at least one parent
    fn has_parent(&self, commit: &str) -> bool;
}

/// Which [`DiffProvider`] implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Run the `git` executable
    #[default]
    Git,
    /// Use libgit2 in-process
    Libgit2,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "git" => Ok(Backend::Git),
            "libgit2" | "git2" => Ok(Backend::Libgit2),
            other => Err(format!("unknown backend '{other}', expected 'git' or 'libgit2'")),
        }
    }
}

impl Backend {
    /// Open a provider for the repository at `dir`
    pub fn open(self, dir: &Path) -> Result<Box<dyn DiffProvider>, GitError> {
        let provider: Box<dyn DiffProvider> = match self {
            Backend::Git => Box::new(GitCommand::new(dir)?),
            Backend::Libgit2 => Box::new(GitRepo::open(dir)?),
        };
        Ok(provider)
    }
}

/// Reject revisions that a git command line would read as an option
pub(crate) fn check_revision(rev: &str) -> Result<&str, GitError> {
    if rev.is_empty() || rev.starts_with('-') {
        return Err(GitError::InvalidRevision(rev.to_string()));
    }
    Ok(rev)
}
