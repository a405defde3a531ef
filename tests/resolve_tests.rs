//! Change-set resolution against real repositories, through both git backends

use std::fs;
use std::path::Path;

use anyhow::Result;
use git2::build::CheckoutBuilder;
use git2::{Commit, IndexAddOption, Oid, Repository, Signature};
use pathgate::changes::{self, Event, Precision};
use pathgate::git::Backend;
use pathgate::Error;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const NULL_SHA: &str = "0000000000000000000000000000000000000000";

/// Backends available on this machine. The subprocess backend needs `git` on PATH.
fn backends() -> Vec<Backend> {
    let mut backends = vec![Backend::Libgit2];
    if which::which("git").is_ok() {
        backends.push(Backend::Git);
    } else {
        eprintln!("git not found on PATH, skipping the subprocess backend");
    }
    backends
}

fn init() -> Result<(TempDir, Repository)> {
    let dir = TempDir::new()?;
    let repo = Repository::init(dir.path())?;
    Ok((dir, repo))
}

/// Write `files` (None deletes), stage everything and commit on top of HEAD
fn commit(repo: &Repository, files: &[(&str, Option<&str>)], message: &str) -> Result<Oid> {
    let workdir = repo.workdir().ok_or_else(|| anyhow::anyhow!("bare repository"))?;
    for (path, content) in files {
        let full = workdir.join(path);
        match content {
            Some(content) => {
                if let Some(parent) = full.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&full, content)?;
            }
            None => fs::remove_file(&full)?,
        }
    }

    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;

    let signature = Signature::now("Test", "test@example.com")?;
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&Commit> = parent.iter().collect();
    Ok(repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?)
}

/// Move HEAD (detached) to `oid` and make the working tree match it
fn checkout(repo: &Repository, oid: Oid) -> Result<()> {
    repo.set_head_detached(oid)?;
    repo.checkout_head(Some(CheckoutBuilder::new().force().remove_untracked(true)))?;
    Ok(())
}

fn sorted(mut paths: Vec<String>) -> Vec<String> {
    paths.sort();
    paths
}

#[test]
fn test_root_commit_push_lists_every_tracked_file() -> Result<()> {
    let (dir, repo) = init()?;
    let root = commit(
        &repo,
        &[("README.md", Some("hello\n")), ("src/main.rs", Some("fn main() {}\n"))],
        "initial",
    )?;

    let event = Event::Push {
        before: Some(NULL_SHA.to_string()),
        current: Some(root.to_string()),
    };

    for backend in backends() {
        let changes = changes::resolve(&event, None, None, dir.path(), backend)?;
        assert_eq!(changes.precision, Precision::RootCommit, "{backend:?}");
        assert_eq!(
            sorted(changes.paths),
            vec!["README.md".to_string(), "src/main.rs".to_string()],
            "{backend:?}"
        );
    }
    Ok(())
}

#[test]
fn test_merge_base_excludes_base_only_changes() -> Result<()> {
    let (dir, repo) = init()?;
    let fork = commit(&repo, &[("shared.txt", Some("v1\n"))], "fork point")?;
    let main = commit(&repo, &[("main_only.txt", Some("main\n"))], "main work")?;

    checkout(&repo, fork)?;
    let feature = commit(&repo, &[("feature/new.rs", Some("// new\n"))], "feature work")?;

    let (base, head) = (main.to_string(), feature.to_string());
    for backend in backends() {
        let changes = changes::resolve(&Event::Other, Some(&base), Some(&head), dir.path(), backend)?;
        assert_eq!(changes.precision, Precision::MergeBase, "{backend:?}");
        assert_eq!(changes.paths, vec!["feature/new.rs".to_string()], "{backend:?}");
    }
    Ok(())
}

#[test]
fn test_pull_request_payload_overrides_explicit_base() -> Result<()> {
    let (dir, repo) = init()?;
    let base = commit(&repo, &[("a.txt", Some("a\n"))], "base")?;
    let head = commit(&repo, &[("b.txt", Some("b\n"))], "head")?;

    let event = Event::PullRequest {
        base: Some(base.to_string()),
        head: Some(head.to_string()),
    };

    for backend in backends() {
        let changes = changes::resolve(&event, Some("wrong"), None, dir.path(), backend)?;
        assert_eq!(changes.base.as_deref(), Some(base.to_string().as_str()));
        assert_eq!(changes.paths, vec!["b.txt".to_string()], "{backend:?}");
    }
    Ok(())
}

#[test]
fn test_ref_without_base_diffs_against_parent() -> Result<()> {
    let (dir, repo) = init()?;
    commit(&repo, &[("keep.txt", Some("1\n")), ("old.txt", Some("old\n"))], "first")?;
    let second = commit(
        &repo,
        &[("keep.txt", Some("2\n")), ("old.txt", None)],
        "second",
    )?;

    let head = second.to_string();
    for backend in backends() {
        let changes = changes::resolve(&Event::Other, None, Some(&head), dir.path(), backend)?;
        assert_eq!(changes.precision, Precision::Parent, "{backend:?}");
        assert_eq!(
            sorted(changes.paths),
            vec!["keep.txt".to_string(), "old.txt".to_string()],
            "{backend:?}"
        );
    }
    Ok(())
}

#[test]
fn test_no_inputs_diffs_head_against_its_parent() -> Result<()> {
    let (dir, repo) = init()?;
    commit(&repo, &[("a.txt", Some("a\n"))], "first")?;
    commit(&repo, &[("docs/guide.md", Some("guide\n"))], "second")?;

    for backend in backends() {
        let changes = changes::resolve(&Event::Other, None, None, dir.path(), backend)?;
        assert_eq!(changes.head, None);
        assert_eq!(changes.paths, vec!["docs/guide.md".to_string()], "{backend:?}");
    }
    Ok(())
}

#[test]
fn test_base_without_ref_diffs_working_tree() -> Result<()> {
    let (dir, repo) = init()?;
    let base = commit(&repo, &[("tracked.txt", Some("before\n")), ("same.txt", Some("same\n"))], "base")?;
    fs::write(dir.path().join("tracked.txt"), "after\n")?;

    let base = base.to_string();
    for backend in backends() {
        let changes = changes::resolve(&Event::Other, Some(&base), None, dir.path(), backend)?;
        assert_eq!(changes.precision, Precision::WorkingTree, "{backend:?}");
        assert_eq!(changes.paths, vec!["tracked.txt".to_string()], "{backend:?}");
    }
    Ok(())
}

#[test]
fn test_rename_reports_both_paths() -> Result<()> {
    let (dir, repo) = init()?;
    commit(&repo, &[("lib/old_name.rs", Some("pub fn f() {}\n"))], "first")?;
    commit(
        &repo,
        &[("lib/old_name.rs", None), ("lib/new_name.rs", Some("pub fn f() {}\n"))],
        "rename",
    )?;

    for backend in backends() {
        let changes = changes::resolve(&Event::Other, None, None, dir.path(), backend)?;
        assert_eq!(
            sorted(changes.paths),
            vec!["lib/new_name.rs".to_string(), "lib/old_name.rs".to_string()],
            "{backend:?}"
        );
    }
    Ok(())
}

#[test]
fn test_unknown_revisions_fail_resolution() -> Result<()> {
    let (dir, repo) = init()?;
    commit(&repo, &[("a.txt", Some("a\n"))], "first")?;

    for backend in backends() {
        let result = changes::resolve(&Event::Other, Some("no-such-branch"), Some("HEAD"), dir.path(), backend);
        let err = result.expect_err("resolution should fail");
        assert!(matches!(err, Error::Resolution(_)), "{backend:?}: {err}");
        assert_eq!(err.exit_code(), 1);
    }
    Ok(())
}

#[test]
fn test_outside_a_repository_fails_resolution() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nowhere");
    fs::create_dir_all(&missing)?;

    let result = changes::resolve(&Event::Other, Some("main"), Some("HEAD"), Path::new(&missing), Backend::Libgit2);
    assert!(matches!(result, Err(Error::Resolution(_))));
    Ok(())
}

fn git(dir: &Path, args: &[&str]) -> Result<bool> {
    let status = std::process::Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com", "-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .output()?
        .status;
    Ok(status.success())
}

#[test]
fn test_root_commit_in_sha256_repository() -> Result<()> {
    if which::which("git").is_err() {
        eprintln!("git not found on PATH, skipping");
        return Ok(());
    }
    let dir = TempDir::new()?;
    if !git(dir.path(), &["init", "--object-format=sha256", "."])? {
        eprintln!("git does not support sha256 repositories, skipping");
        return Ok(());
    }
    fs::write(dir.path().join("only.txt"), "one\n")?;
    assert!(git(dir.path(), &["add", "only.txt"])?);
    assert!(git(dir.path(), &["commit", "-q", "-m", "root"])?);

    let changes = changes::resolve(&Event::Other, None, Some("HEAD"), dir.path(), Backend::Git)?;
    assert_eq!(changes.precision, Precision::RootCommit);
    assert_eq!(changes.paths, vec!["only.txt".to_string()]);
    Ok(())
}
