//! CI event payloads
//!
//! Only the handful of fields needed to pick diff boundaries are read. Missing or
//! malformed payloads degrade to an empty payload rather than failing the run.

use std::path::Path;

use serde::Deserialize;

/// Kind of event that triggered the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PullRequest,
    Push,
    Other,
}

impl EventKind {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some("pull_request" | "pull_request_target") => EventKind::PullRequest,
            Some("push") => EventKind::Push,
            _ => EventKind::Other,
        }
    }
}

/// The subset of a webhook payload pathgate understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
    /// Commit the branch pointed at before a push
    #[serde(default)]
    pub before: Option<String>,
    /// Commit the branch points at after a push
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub base: Option<CommitRef>,
    #[serde(default)]
    pub head: Option<CommitRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommitRef {
    #[serde(default)]
    pub sha: Option<String>,
}

impl EventPayload {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read the payload file. Absent or unreadable payloads yield an empty payload.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Cannot read event payload {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&text) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("Failed to parse event payload {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// An event reduced to the commit ids that matter for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PullRequest {
        base: Option<String>,
        head: Option<String>,
    },
    Push {
        before: Option<String>,
        /// The pushed commit
        current: Option<String>,
    },
    Other,
}

impl Event {
    /// Build the event from its kind and payload.
    ///
    /// `current_sha` is the commit the runner checked out; for pushes it takes
    /// precedence over the payload's `after`.
    pub fn new(kind: EventKind, payload: EventPayload, current_sha: Option<String>) -> Self {
        match kind {
            EventKind::PullRequest => {
                let pull_request = payload.pull_request.unwrap_or_default();
                Event::PullRequest {
                    base: pull_request.base.and_then(|r| r.sha),
                    head: pull_request.head.and_then(|r| r.sha),
                }
            }
            EventKind::Push => Event::Push {
                before: payload.before,
                current: current_sha.or(payload.after),
            },
            EventKind::Other => Event::Other,
        }
    }
}
