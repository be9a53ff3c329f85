//! Errors returned when building record instances.

use std::fmt;

/// Why a single field was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueKind {
    /// A required field was absent or null.
    Missing,
    /// The value had the wrong JSON shape for the field.
    WrongType { expected: &'static str },
    /// The `language` value did not match the language tag grammar.
    InvalidLanguageTag,
    /// A timestamp string was not RFC 3339.
    InvalidTimestamp,
    /// A count was below zero.
    Negative,
    /// The key is not declared by the model.
    UnknownField,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Missing => write!(f, "field required"),
            IssueKind::WrongType { expected } => write!(f, "expected {expected}"),
            IssueKind::InvalidLanguageTag => write!(f, "invalid language tag"),
            IssueKind::InvalidTimestamp => write!(f, "invalid RFC 3339 timestamp"),
            IssueKind::Negative => write!(f, "must not be negative"),
            IssueKind::UnknownField => write!(f, "unknown field"),
        }
    }
}

/// A `(field path, reason)` pair. Nested paths are dotted, e.g. `ratings.accuracy`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

fn summarise(issues: &[FieldIssue]) -> String {
    let listed = issues
        .iter()
        .map(FieldIssue::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} issue(s): {listed}", issues.len())
}

/// Returned by validating construction. Carries every violated field, not just the first.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{model} failed validation, {}", summarise(.issues))]
pub struct ValidationError {
    pub model: &'static str,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Returns the issues reported for `path`.
    pub fn issues_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues.iter().filter(move |issue| issue.path == path)
    }

    /// Returns `true` if any issue was reported for `path`.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues_at(path).next().is_some()
    }
}

/// Returned by trusted construction when the input cannot occupy the model's slots at all
/// (not a mapping, or a value of the wrong JSON shape). Value content is never checked.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{model}: malformed input at {path}: {reason}")]
pub struct StructureError {
    pub model: &'static str,
    pub path: String,
    pub reason: String,
}

/// Errors returned by the mode-selecting entry points.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("unknown construct mode: {0} (expected 'trusted' or 'validating')")]
    UnknownMode(String),
}

/// Type alias for Results that can fail with a [`SchemaError`].
pub type SchemaResult<T> = Result<T, SchemaError>;
