//! `git` executable backend

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{DiffProvider, EMPTY_TREE, GitError, check_revision};

/// Answers diff questions by running `git` in a working directory
pub struct GitCommand {
    dir: PathBuf,
}

impl GitCommand {
    /// Create a backend for `dir`. Fails when `git` is not on `PATH`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, GitError> {
        which::which("git").map_err(|e| GitError::Spawn {
            command: "git".to_string(),
            source: std::io::Error::other(e),
        })?;

        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    /// Id of the empty tree in this repository's object format
    pub fn empty_tree(&self) -> Result<String, GitError> {
        // stdin is null, so this hashes zero bytes
        let stdout = self.run(&["hash-object", "-t", "tree", "--stdin"])?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    /// [`EMPTY_TREE`] is swapped for the repository's own id, SHA-256 repositories use a different one
    fn revision<'a>(&self, rev: &'a str) -> Result<Cow<'a, str>, GitError> {
        if rev == EMPTY_TREE {
            return self.empty_tree().map(Cow::Owned);
        }
        check_revision(rev).map(Cow::Borrowed)
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, GitError> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!("Running command: {}", command);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!("Command failed: {}", stderr);
            return Err(GitError::Command { command, stderr });
        }

        Ok(output.stdout)
    }
}

impl DiffProvider for GitCommand {
    fn merge_base(&self, a: &str, b: &str) -> Result<String, GitError> {
        let stdout = self.run(&["merge-base", check_revision(a)?, check_revision(b)?])?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    fn diff_name_only(&self, from: &str, to: Option<&str>) -> Result<Vec<String>, GitError> {
        let from = self.revision(from)?;
        let to = to.map(|to| self.revision(to)).transpose()?;

        // Renames are split into delete + add so both sides reach the filters
        let mut args = vec!["diff", "--name-only", "--no-renames", "-z", &*from];
        if let Some(to) = to.as_deref() {
            args.push(to);
        }

        let stdout = self.run(&args)?;
        Ok(stdout
            .split(|b| *b == 0)
            .filter(|path| !path.is_empty())
            .map(|path| String::from_utf8_lossy(path).into_owned())
            .collect())
    }

    fn has_parent(&self, commit: &str) -> bool {
        let Ok(commit) = check_revision(commit) else {
            return false;
        };
        self.run(&["rev-parse", "--verify", "--quiet", &format!("{commit}^")])
            .is_ok()
    }
}
