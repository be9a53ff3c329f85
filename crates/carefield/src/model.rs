//! The dual-mode construction contract shared by every record variant.
//!
//! Each variant declares its fields once (`read`/`write`) and inherits:
//! - [`Model::construct`]: trusted construction, no field validation
//! - [`Model::validate`]: validating construction, every validator plus required fields
//! - [`Model::build`]: either of the above, selected by an explicit [`ConstructMode`]
//!
//! Instances are immutable; [`Model::rebuild`] produces a new instance from changed fields.

use crate::error::{
    FieldIssue, IssueKind, SchemaError, SchemaResult, StructureError, ValidationError,
};
use crate::fields::{FieldMap, FieldReader, FieldWriter};
use crate::language::HasLanguage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Selects which construction path runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructMode {
    /// Store values as supplied; only shape mismatches fail.
    Trusted,
    /// Run every field validator and enforce required fields.
    Validating,
}

impl ConstructMode {
    pub fn is_validating(self) -> bool {
        matches!(self, ConstructMode::Validating)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConstructMode::Trusted => "trusted",
            ConstructMode::Validating => "validating",
        }
    }
}

impl std::fmt::Display for ConstructMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConstructMode {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trusted" => Ok(ConstructMode::Trusted),
            "validating" => Ok(ConstructMode::Validating),
            other => Err(SchemaError::UnknownMode(other.to_owned())),
        }
    }
}

/// A record variant with declared fields and both construction paths.
pub trait Model: HasLanguage + Sized {
    /// Name used in errors and by the registry.
    const NAME: &'static str;

    /// Every key the variant declares, including `language`.
    const FIELDS: &'static [&'static str];

    /// Reads every declared field. Failures are recorded on the reader, never returned here.
    fn read(reader: &mut FieldReader<'_>) -> Self;

    /// Writes every present field.
    fn write(&self, writer: &mut FieldWriter);

    /// Trusted construction: populates the instance directly without running validators.
    ///
    /// Required fields may be missing (they read as their type's empty value). Unknown keys
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError`] if `input` is not a mapping or a value has a JSON shape the
    /// field cannot hold.
    fn construct(input: &Value) -> Result<Self, StructureError> {
        let Some(fields) = input.as_object() else {
            return Err(StructureError {
                model: Self::NAME,
                path: "<root>".into(),
                reason: "expected a mapping of field names to values".into(),
            });
        };

        let mut reader =
            FieldReader::new(Self::NAME, Self::FIELDS, ConstructMode::Trusted, fields);
        let model = Self::read(&mut reader);
        reader.finish_trusted()?;

        tracing::trace!(model = Self::NAME, "constructed without validation");
        Ok(model)
    }

    /// Validating construction.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violated field: missing required fields,
    /// malformed language tags, bad timestamps, negative counts, wrong shapes and unknown keys.
    fn validate(input: &Value) -> Result<Self, ValidationError> {
        let Some(fields) = input.as_object() else {
            return Err(ValidationError {
                model: Self::NAME,
                issues: vec![FieldIssue::new(
                    "<root>",
                    IssueKind::WrongType {
                        expected: "mapping",
                    },
                )],
            });
        };

        let mut reader =
            FieldReader::new(Self::NAME, Self::FIELDS, ConstructMode::Validating, fields);
        let model = Self::read(&mut reader);
        if let Err(err) = reader.finish_validating() {
            tracing::debug!(
                model = Self::NAME,
                issues = err.issues.len(),
                "validation failed: {err}"
            );
            return Err(err);
        }
        Ok(model)
    }

    /// Single entry point with an explicit mode.
    fn build(input: &Value, mode: ConstructMode) -> SchemaResult<Self> {
        match mode {
            ConstructMode::Trusted => Ok(Self::construct(input)?),
            ConstructMode::Validating => Ok(Self::validate(input)?),
        }
    }

    /// Renders the instance back into a mapping keyed by wire names.
    fn to_fields(&self) -> FieldMap {
        let mut writer = FieldWriter::default();
        self.write(&mut writer);
        writer.into_fields()
    }

    /// Builds a new instance from this one's fields with `changes` applied.
    ///
    /// A `null` change removes the field.
    fn rebuild(&self, changes: FieldMap, mode: ConstructMode) -> SchemaResult<Self> {
        let mut fields = self.to_fields();
        for (key, value) in changes {
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
        Self::build(&Value::Object(fields), mode)
    }

    /// Runs validating construction over this instance's own fields.
    ///
    /// Useful for auditing instances that came through the trusted path.
    fn check(&self) -> Result<(), ValidationError> {
        Self::validate(&Value::Object(self.to_fields())).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fhir::Patient;
    use serde_json::json;

    #[test]
    fn validating_a_non_mapping_reports_the_root() {
        for input in [json!([1, 2]), json!("en-US"), json!(null)] {
            let err = Patient::validate(&input).expect_err("not a mapping");
            assert_eq!(err.model, "Patient");
            assert_eq!(
                err.issues,
                vec![FieldIssue::new(
                    "<root>",
                    IssueKind::WrongType {
                        expected: "mapping"
                    }
                )]
            );
        }
    }

    #[test]
    fn mode_parses_and_prints() {
        assert_eq!(
            "trusted".parse::<ConstructMode>().expect("valid"),
            ConstructMode::Trusted
        );
        assert_eq!(
            "validating".parse::<ConstructMode>().expect("valid"),
            ConstructMode::Validating
        );
        assert_eq!(ConstructMode::Validating.to_string(), "validating");

        let err = "strict".parse::<ConstructMode>().expect_err("unknown mode");
        assert!(matches!(err, SchemaError::UnknownMode(mode) if mode == "strict"));
    }

    #[test]
    fn mode_uses_lowercase_wire_names() {
        let json = serde_json::to_string(&ConstructMode::Trusted).expect("serialise");
        assert_eq!(json, "\"trusted\"");

        let mode: ConstructMode = serde_json::from_str("\"validating\"").expect("deserialise");
        assert_eq!(mode, ConstructMode::Validating);
    }
}
