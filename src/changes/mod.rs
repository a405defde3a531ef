//! Change-set resolution
//!
//! Decides which two repository states to compare for a run and collects the
//! paths that differ between them.
//!
//! Resolution happens in two steps:
//!
//! 1. [`resolve_refs`] turns the triggering [`Event`] plus explicit inputs into a
//!    [`ResolutionContext`] (base, ref, working directory).
//! 2. [`ChangeSet::collect`] picks a [`DiffPlan`] for that context and runs it
//!    against a [`DiffProvider`].
//!
//! Edge cases handled by the plan:
//!
//! - shallow clones where the merge-base is unknown fall back to a direct diff
//! - branch creation pushes (all-zero `before`) diff the pushed commit against its parent
//! - root commits diff against the empty tree so every tracked file is reported

pub mod event;

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::error::Error;
use crate::git::{Backend, DiffProvider, EMPTY_TREE, GitError};

pub use event::{Event, EventKind, EventPayload};

/// The base/ref pair to diff and where the repository lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    pub base: Option<String>,
    pub head: Option<String>,
    pub working_directory: PathBuf,
}

/// True for the all-zero object id a push reports when the branch did not exist before
pub fn is_null_sha(sha: &str) -> bool {
    !sha.is_empty() && sha.bytes().all(|b| b == b'0')
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Derive the base and ref to diff from the event and the explicit inputs.
///
/// Pull request events always use the PR's base and head commits. Pushes honour
/// explicit inputs and fall back to the event's `before` and current commit. Any
/// other event uses the explicit inputs as given.
pub fn resolve_refs(
    event: &Event,
    explicit_base: Option<&str>,
    explicit_ref: Option<&str>,
    working_directory: impl Into<PathBuf>,
) -> ResolutionContext {
    let explicit_base = non_empty(explicit_base);
    let explicit_ref = non_empty(explicit_ref);

    let (base, head) = match event {
        Event::PullRequest { base, head } => {
            tracing::debug!("Detected pull_request event, using PR base/head");
            (non_empty(base.as_deref()), non_empty(head.as_deref()))
        }
        Event::Push { before, current } => {
            tracing::debug!("Detected push event");
            let base = explicit_base.or_else(|| {
                non_empty(before.as_deref()).filter(|sha| {
                    let usable = !is_null_sha(sha);
                    if !usable {
                        tracing::debug!("Push created the branch, no previous commit to diff against");
                    }
                    usable
                })
            });
            let head = explicit_ref.or_else(|| non_empty(current.as_deref()));
            (base, head)
        }
        Event::Other => (explicit_base, explicit_ref),
    };

    tracing::debug!(
        "Resolved base: {}, ref: {}",
        base.as_deref().unwrap_or("<none>"),
        head.as_deref().unwrap_or("<none>")
    );

    ResolutionContext {
        base,
        head,
        working_directory: working_directory.into(),
    }
}

/// One way of diffing a base/ref range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStrategy {
    /// Diff from the merge-base of base and ref, so base-side changes are excluded
    PreferMergeBase,
    /// Diff base against ref as-is
    DirectDiff,
}

/// Strategies tried, in order, when both base and ref are known
pub const RANGE_STRATEGIES: [DiffStrategy; 2] = [DiffStrategy::PreferMergeBase, DiffStrategy::DirectDiff];

impl DiffStrategy {
    fn run(self, provider: &dyn DiffProvider, base: &str, head: &str) -> Result<(Vec<String>, Precision), GitError> {
        match self {
            DiffStrategy::PreferMergeBase => {
                tracing::debug!("Resolving merge-base between {} and {}", base, head);
                let ancestor = provider.merge_base(base, head)?;
                tracing::debug!("Merge base is {}", ancestor);
                let paths = provider.diff_name_only(&ancestor, Some(head))?;
                Ok((paths, Precision::MergeBase))
            }
            DiffStrategy::DirectDiff => {
                let paths = provider.diff_name_only(base, Some(head))?;
                Ok((paths, Precision::Direct))
            }
        }
    }
}

/// What to compare, derived from a [`ResolutionContext`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffPlan {
    /// Base and ref known: try [`RANGE_STRATEGIES`] in order
    Range { base: String, head: String },
    /// Only base known: compare it with the working tree
    WorkingTree { base: String },
    /// No base: compare the target with its parent, or with the empty tree for a root commit
    Parent { head: String },
}

impl DiffPlan {
    pub fn for_context(ctx: &ResolutionContext) -> Self {
        match (&ctx.base, &ctx.head) {
            (Some(base), Some(head)) => DiffPlan::Range {
                base: base.clone(),
                head: head.clone(),
            },
            (Some(base), None) => DiffPlan::WorkingTree { base: base.clone() },
            (None, head) => DiffPlan::Parent {
                head: head.clone().unwrap_or_else(|| "HEAD".to_string()),
            },
        }
    }
}

/// How the reported paths were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// merge-base..ref
    MergeBase,
    /// base..ref, used when the merge-base could not be determined
    Direct,
    /// base..working tree
    WorkingTree,
    /// ref^..ref
    Parent,
    /// empty tree..ref
    RootCommit,
}

impl Precision {
    /// Whether the diff may include changes that only happened on the base side
    pub fn is_degraded(self) -> bool {
        self == Precision::Direct
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Precision::MergeBase => "merge-base",
            Precision::Direct => "direct (merge-base unavailable)",
            Precision::WorkingTree => "working tree",
            Precision::Parent => "parent commit",
            Precision::RootCommit => "root commit",
        };
        f.write_str(label)
    }
}

/// Paths changed between the two resolved repository states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub base: Option<String>,
    pub head: Option<String>,
    pub paths: Vec<String>,
    pub precision: Precision,
}

impl ChangeSet {
    /// Run the diff plan for `ctx` against `provider`
    pub fn collect(ctx: ResolutionContext, provider: &dyn DiffProvider) -> Result<Self, Error> {
        let plan = DiffPlan::for_context(&ctx);
        let (raw, precision) = run_plan(&plan, provider)?;

        let paths: IndexSet<String> = raw.into_iter().filter(|path| !path.trim().is_empty()).collect();
        tracing::debug!("Changed files: {:?}", paths);

        Ok(ChangeSet {
            base: ctx.base,
            head: ctx.head,
            paths: paths.into_iter().collect(),
            precision,
        })
    }
}

fn run_plan(plan: &DiffPlan, provider: &dyn DiffProvider) -> Result<(Vec<String>, Precision), Error> {
    match plan {
        DiffPlan::Range { base, head } => {
            let mut last_error = None;
            for strategy in RANGE_STRATEGIES {
                match strategy.run(provider, base, head) {
                    Ok(outcome) => return Ok(outcome),
                    Err(e) => {
                        if strategy == DiffStrategy::PreferMergeBase {
                            tracing::warn!(
                                "Could not determine merge-base ({}), diffing {} and {} directly",
                                e,
                                base,
                                head
                            );
                        }
                        last_error = Some(e);
                    }
                }
            }
            Err(Error::resolution(
                last_error.map(|e| e.to_string()).unwrap_or_default(),
            ))
        }
        DiffPlan::WorkingTree { base } => {
            tracing::debug!("Diffing {} against the working tree", base);
            let paths = provider.diff_name_only(base, None).map_err(into_resolution)?;
            Ok((paths, Precision::WorkingTree))
        }
        DiffPlan::Parent { head } => {
            if provider.has_parent(head) {
                tracing::debug!("No base provided, diffing {}^ and {}", head, head);
                let parent = format!("{head}^");
                let paths = provider.diff_name_only(&parent, Some(head)).map_err(into_resolution)?;
                Ok((paths, Precision::Parent))
            } else {
                tracing::debug!("{}^ not found, assuming root commit. Diffing against the empty tree", head);
                let paths = provider.diff_name_only(EMPTY_TREE, Some(head)).map_err(into_resolution)?;
                Ok((paths, Precision::RootCommit))
            }
        }
    }
}

fn into_resolution(e: GitError) -> Error {
    Error::resolution(e.to_string())
}

/// Resolve the change set for an event end to end, opening the repository with `backend`
pub fn resolve(
    event: &Event,
    explicit_base: Option<&str>,
    explicit_ref: Option<&str>,
    working_directory: &Path,
    backend: Backend,
) -> Result<ChangeSet, Error> {
    let ctx = resolve_refs(event, explicit_base, explicit_ref, working_directory);
    let provider = backend.open(&ctx.working_directory).map_err(into_resolution)?;
    ChangeSet::collect(ctx, provider.as_ref())
}
