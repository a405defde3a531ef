//! libgit2 backend

use std::path::Path;

use git2::{Repository, Tree};
use indexmap::IndexSet;

use super::{DiffProvider, EMPTY_TREE, GitError, check_revision};

/// Answers diff questions in-process through libgit2
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover and open the repository containing `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    /// Tree for a revision. The empty tree is `None`, which libgit2 diffs as "no files".
    fn tree(&self, rev: &str) -> Result<Option<Tree<'_>>, GitError> {
        if rev == EMPTY_TREE {
            return Ok(None);
        }
        let object = self.repo.revparse_single(check_revision(rev)?)?;
        Ok(Some(object.peel_to_tree()?))
    }
}

impl DiffProvider for GitRepo {
    fn merge_base(&self, a: &str, b: &str) -> Result<String, GitError> {
        let a = self.repo.revparse_single(check_revision(a)?)?.peel_to_commit()?;
        let b = self.repo.revparse_single(check_revision(b)?)?.peel_to_commit()?;
        Ok(self.repo.merge_base(a.id(), b.id())?.to_string())
    }

    fn diff_name_only(&self, from: &str, to: Option<&str>) -> Result<Vec<String>, GitError> {
        let old_tree = self.tree(from)?;
        let diff = match to {
            Some(to) => {
                let new_tree = self.tree(to)?;
                self.repo
                    .diff_tree_to_tree(old_tree.as_ref(), new_tree.as_ref(), None)?
            }
            None => self.repo.diff_tree_to_workdir_with_index(old_tree.as_ref(), None)?,
        };

        let mut paths = IndexSet::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path_bytes() {
                    paths.insert(String::from_utf8_lossy(path).into_owned());
                }
            }
        }

        Ok(paths.into_iter().collect())
    }

    fn has_parent(&self, commit: &str) -> bool {
        check_revision(commit)
            .ok()
            .and_then(|rev| self.repo.revparse_single(rev).ok())
            .and_then(|object| object.peel_to_commit().ok())
            .is_some_and(|commit| commit.parent_count() > 0)
    }
}
