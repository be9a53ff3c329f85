//! Typed access to field mappings.
//!
//! [`FieldReader`] pulls typed values out of a [`FieldMap`] for one model and accumulates
//! [`FieldIssue`]s instead of stopping at the first failure. Issues come in two classes:
//! - *structural*: the value's JSON shape cannot occupy the field (recorded in both modes)
//! - *semantic*: missing required fields, bad tags or timestamps, negative counts and scores
//!   (validating mode only)
//!
//! [`FieldWriter`] is the inverse and renders an instance back into a mapping with the same keys.

use crate::error::{FieldIssue, IssueKind, StructureError, ValidationError};
use crate::model::ConstructMode;
use carefield_types::LanguageTag;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// In-memory mapping of field name to value.
pub type FieldMap = serde_json::Map<String, Value>;

/// A timestamp slot.
///
/// Trusted construction keeps text that does not parse as RFC 3339 so it can be rendered back
/// and flagged later by validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Timestamp {
    Parsed(DateTime<Utc>),
    Unparsed(String),
}

impl Timestamp {
    /// The parsed instant, or `None` for unparsed text.
    pub fn parsed(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Parsed(instant) => Some(*instant),
            Timestamp::Unparsed(_) => None,
        }
    }

    /// RFC 3339 text with a `Z` suffix, or the unparsed text verbatim.
    pub fn to_text(&self) -> String {
        match self {
            Timestamp::Parsed(instant) => instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Timestamp::Unparsed(raw) => raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::Parsed(instant)
    }
}

/// Reads declared fields of one model out of a [`FieldMap`].
#[derive(Debug)]
pub struct FieldReader<'a> {
    model: &'static str,
    declared: &'static [&'static str],
    mode: ConstructMode,
    fields: &'a FieldMap,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    pub fn new(
        model: &'static str,
        declared: &'static [&'static str],
        mode: ConstructMode,
        fields: &'a FieldMap,
    ) -> Self {
        Self {
            model,
            declared,
            mode,
            fields,
            issues: Vec::new(),
        }
    }

    pub fn mode(&self) -> ConstructMode {
        self.mode
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Records a shape failure. Reported in both modes.
    pub fn structural(&mut self, path: impl Into<String>, expected: &'static str) {
        self.issues
            .push(FieldIssue::new(path, IssueKind::WrongType { expected }));
    }

    /// Records a value-level failure. Ignored in trusted mode.
    pub fn reject(&mut self, path: impl Into<String>, kind: IssueKind) {
        if self.mode.is_validating() {
            self.issues.push(FieldIssue::new(path, kind));
        }
    }

    // Null is treated as absent.
    fn lookup(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    fn present(&mut self, key: &str, required: bool) -> Option<&'a Value> {
        let value = self.lookup(key);
        if value.is_none() && required {
            self.reject(key, IssueKind::Missing);
        }
        value
    }

    fn string(&mut self, key: &str, required: bool) -> Option<String> {
        match self.present(key, required)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.structural(key, "string");
                None
            }
        }
    }

    pub fn required_string(&mut self, key: &str) -> Option<String> {
        self.string(key, true)
    }

    pub fn optional_string(&mut self, key: &str) -> Option<String> {
        self.string(key, false)
    }

    /// Reads an RFC 3339 timestamp and normalises it to UTC.
    ///
    /// Text that does not parse is rejected when validating and kept verbatim when trusted.
    pub fn required_timestamp(&mut self, key: &str) -> Option<Timestamp> {
        let raw = self.string(key, true)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Some(Timestamp::Parsed(parsed.with_timezone(&Utc))),
            Err(_) if self.mode.is_validating() => {
                self.reject(key, IssueKind::InvalidTimestamp);
                None
            }
            Err(_) => Some(Timestamp::Unparsed(raw)),
        }
    }

    /// Reads an integer count. Negative counts are kept in trusted mode.
    pub fn required_count(&mut self, key: &str) -> Option<i64> {
        let value = self.present(key, true)?;
        let Some(count) = value.as_i64() else {
            self.structural(key, "integer");
            return None;
        };
        if count < 0 {
            self.reject(key, IssueKind::Negative);
        }
        Some(count)
    }

    /// Reads a mapping of category to integer score. Each entry is checked on its own, so
    /// every bad score is reported at `key.category`. Negative scores are kept in trusted mode.
    pub fn required_scores(&mut self, key: &str) -> Option<BTreeMap<String, i64>> {
        let value = self.present(key, true)?;
        let Value::Object(entries) = value else {
            self.structural(key, "mapping");
            return None;
        };

        let mut scores = BTreeMap::new();
        for (category, score) in entries {
            match score.as_i64() {
                Some(score) => {
                    if score < 0 {
                        self.reject(format!("{key}.{category}"), IssueKind::Negative);
                    }
                    scores.insert(category.clone(), score);
                }
                None => self.structural(format!("{key}.{category}"), "integer"),
            }
        }
        Some(scores)
    }

    fn unknown_keys(&mut self) {
        let unknown: Vec<String> = self
            .fields
            .keys()
            .filter(|key| !self.declared.iter().any(|d| *d == key.as_str()))
            .cloned()
            .collect();
        for key in unknown {
            self.reject(key, IssueKind::UnknownField);
        }
    }

    /// Ends a trusted read. The first structural issue, if any, becomes the error.
    pub fn finish_trusted(self) -> Result<(), StructureError> {
        match self.issues.into_iter().next() {
            None => Ok(()),
            Some(issue) => Err(StructureError {
                model: self.model,
                reason: issue.kind.to_string(),
                path: issue.path,
            }),
        }
    }

    /// Ends a validating read, reporting every issue collected, unknown keys last.
    pub fn finish_validating(mut self) -> Result<(), ValidationError> {
        self.unknown_keys();
        if self.issues.is_empty() {
            return Ok(());
        }
        Err(ValidationError {
            model: self.model,
            issues: self.issues,
        })
    }
}

/// Renders model fields into a [`FieldMap`]. Absent values are omitted.
#[derive(Debug, Default)]
pub struct FieldWriter {
    fields: FieldMap,
}

impl FieldWriter {
    pub fn string(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.fields
                .insert(key.to_owned(), Value::String(value.to_owned()));
        }
    }

    pub fn language(&mut self, key: &str, value: Option<&LanguageTag>) {
        self.string(key, value.map(LanguageTag::as_str));
    }

    pub fn timestamp(&mut self, key: &str, value: Option<&Timestamp>) {
        if let Some(value) = value {
            self.fields
                .insert(key.to_owned(), Value::String(value.to_text()));
        }
    }

    pub fn count(&mut self, key: &str, value: Option<i64>) {
        if let Some(value) = value {
            self.fields.insert(key.to_owned(), Value::from(value));
        }
    }

    pub fn scores(&mut self, key: &str, value: Option<&BTreeMap<String, i64>>) {
        if let Some(scores) = value {
            let rendered = scores
                .iter()
                .map(|(category, score)| (category.clone(), Value::from(*score)))
                .collect();
            self.fields.insert(key.to_owned(), Value::Object(rendered));
        }
    }

    pub fn into_fields(self) -> FieldMap {
        self.fields
    }
}
