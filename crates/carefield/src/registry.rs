//! Name-based dispatch over every record variant.

use crate::error::{SchemaError, SchemaResult};
use crate::evaluations::{AiOutput, DeIdentifiedDatasetDescriptor, Evaluation};
use crate::fhir::{
    Annotation, ClinicalImpression, Condition, Encounter, Observation, Patient, Procedure,
};
use crate::fields::FieldMap;
use crate::language::{BaseLanguage, HasLanguage};
use crate::model::{ConstructMode, Model};
use serde_json::Value;

/// Every record variant known to the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Patient,
    Encounter,
    Observation,
    Condition,
    Procedure,
    ClinicalImpression,
    Annotation,
    AiOutput,
    Evaluation,
    DeIdentifiedDatasetDescriptor,
}

impl ModelKind {
    pub const ALL: [ModelKind; 10] = [
        ModelKind::Patient,
        ModelKind::Encounter,
        ModelKind::Observation,
        ModelKind::Condition,
        ModelKind::Procedure,
        ModelKind::ClinicalImpression,
        ModelKind::Annotation,
        ModelKind::AiOutput,
        ModelKind::Evaluation,
        ModelKind::DeIdentifiedDatasetDescriptor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Patient => Patient::NAME,
            ModelKind::Encounter => Encounter::NAME,
            ModelKind::Observation => Observation::NAME,
            ModelKind::Condition => Condition::NAME,
            ModelKind::Procedure => Procedure::NAME,
            ModelKind::ClinicalImpression => ClinicalImpression::NAME,
            ModelKind::Annotation => Annotation::NAME,
            ModelKind::AiOutput => AiOutput::NAME,
            ModelKind::Evaluation => Evaluation::NAME,
            ModelKind::DeIdentifiedDatasetDescriptor => DeIdentifiedDatasetDescriptor::NAME,
        }
    }

    /// Declared wire keys of the variant.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ModelKind::Patient => Patient::FIELDS,
            ModelKind::Encounter => Encounter::FIELDS,
            ModelKind::Observation => Observation::FIELDS,
            ModelKind::Condition => Condition::FIELDS,
            ModelKind::Procedure => Procedure::FIELDS,
            ModelKind::ClinicalImpression => ClinicalImpression::FIELDS,
            ModelKind::Annotation => Annotation::FIELDS,
            ModelKind::AiOutput => AiOutput::FIELDS,
            ModelKind::Evaluation => Evaluation::FIELDS,
            ModelKind::DeIdentifiedDatasetDescriptor => DeIdentifiedDatasetDescriptor::FIELDS,
        }
    }

    /// Builds an instance of this variant in the given mode.
    pub fn build(self, input: &Value, mode: ConstructMode) -> SchemaResult<AnyModel> {
        Ok(match self {
            ModelKind::Patient => AnyModel::Patient(Patient::build(input, mode)?),
            ModelKind::Encounter => AnyModel::Encounter(Encounter::build(input, mode)?),
            ModelKind::Observation => AnyModel::Observation(Observation::build(input, mode)?),
            ModelKind::Condition => AnyModel::Condition(Condition::build(input, mode)?),
            ModelKind::Procedure => AnyModel::Procedure(Procedure::build(input, mode)?),
            ModelKind::ClinicalImpression => {
                AnyModel::ClinicalImpression(ClinicalImpression::build(input, mode)?)
            }
            ModelKind::Annotation => AnyModel::Annotation(Annotation::build(input, mode)?),
            ModelKind::AiOutput => AnyModel::AiOutput(AiOutput::build(input, mode)?),
            ModelKind::Evaluation => AnyModel::Evaluation(Evaluation::build(input, mode)?),
            ModelKind::DeIdentifiedDatasetDescriptor => AnyModel::DeIdentifiedDatasetDescriptor(
                DeIdentifiedDatasetDescriptor::build(input, mode)?,
            ),
        })
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ModelKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SchemaError::UnknownModel(s.to_owned()))
    }
}

/// An instance of any record variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyModel {
    Patient(Patient),
    Encounter(Encounter),
    Observation(Observation),
    Condition(Condition),
    Procedure(Procedure),
    ClinicalImpression(ClinicalImpression),
    Annotation(Annotation),
    AiOutput(AiOutput),
    Evaluation(Evaluation),
    DeIdentifiedDatasetDescriptor(DeIdentifiedDatasetDescriptor),
}

impl AnyModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            AnyModel::Patient(_) => ModelKind::Patient,
            AnyModel::Encounter(_) => ModelKind::Encounter,
            AnyModel::Observation(_) => ModelKind::Observation,
            AnyModel::Condition(_) => ModelKind::Condition,
            AnyModel::Procedure(_) => ModelKind::Procedure,
            AnyModel::ClinicalImpression(_) => ModelKind::ClinicalImpression,
            AnyModel::Annotation(_) => ModelKind::Annotation,
            AnyModel::AiOutput(_) => ModelKind::AiOutput,
            AnyModel::Evaluation(_) => ModelKind::Evaluation,
            AnyModel::DeIdentifiedDatasetDescriptor(_) => {
                ModelKind::DeIdentifiedDatasetDescriptor
            }
        }
    }

    pub fn to_fields(&self) -> FieldMap {
        match self {
            AnyModel::Patient(m) => m.to_fields(),
            AnyModel::Encounter(m) => m.to_fields(),
            AnyModel::Observation(m) => m.to_fields(),
            AnyModel::Condition(m) => m.to_fields(),
            AnyModel::Procedure(m) => m.to_fields(),
            AnyModel::ClinicalImpression(m) => m.to_fields(),
            AnyModel::Annotation(m) => m.to_fields(),
            AnyModel::AiOutput(m) => m.to_fields(),
            AnyModel::Evaluation(m) => m.to_fields(),
            AnyModel::DeIdentifiedDatasetDescriptor(m) => m.to_fields(),
        }
    }
}

impl HasLanguage for AnyModel {
    fn base_language(&self) -> &BaseLanguage {
        match self {
            AnyModel::Patient(m) => m.base_language(),
            AnyModel::Encounter(m) => m.base_language(),
            AnyModel::Observation(m) => m.base_language(),
            AnyModel::Condition(m) => m.base_language(),
            AnyModel::Procedure(m) => m.base_language(),
            AnyModel::ClinicalImpression(m) => m.base_language(),
            AnyModel::Annotation(m) => m.base_language(),
            AnyModel::AiOutput(m) => m.base_language(),
            AnyModel::Evaluation(m) => m.base_language(),
            AnyModel::DeIdentifiedDatasetDescriptor(m) => m.base_language(),
        }
    }
}

/// Looks up a variant by name and builds it.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownModel`] for an unrecognised name, otherwise whatever the
/// selected construction path returns.
pub fn build_named(name: &str, input: &Value, mode: ConstructMode) -> SchemaResult<AnyModel> {
    name.parse::<ModelKind>()?.build(input, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use serde_json::json;

    /// Smallest mapping that passes validation for `kind`, with `language` set.
    fn valid_fields(kind: ModelKind, language: &str) -> Value {
        let mut fields = match kind {
            ModelKind::AiOutput => json!({
                "id": "out-1",
                "encounter_id": "enc-9",
                "type": "diagnosis",
                "content": "Diagnosis text",
                "model_version": "gpt-v1",
                "timestamp": "2024-01-01T00:00:00Z",
            }),
            ModelKind::Evaluation => json!({
                "id": "eval-1",
                "aioutput_id": "out-1",
                "output_type": "diagnosis",
                "ratings": {"accuracy": 5},
                "safety": "safe",
                "timestamp": "2024-01-01T00:00:00Z",
            }),
            ModelKind::DeIdentifiedDatasetDescriptor => json!({
                "dataset_id": "ds-1",
                "generation_date": "2024-01-01T00:00:00Z",
                "version": "2024.01",
                "records": 12,
                "license": "CC-BY-4.0",
                "url": "https://example.com/datasets/ds-1",
            }),
            _ => json!({}),
        };
        fields["language"] = json!(language);
        fields
    }

    #[test]
    fn every_variant_keeps_a_valid_language() {
        for kind in ModelKind::ALL {
            for tag in ["es-MX", "en-US", "ja-JP", "de"] {
                let model = kind
                    .build(&valid_fields(kind, tag), ConstructMode::Validating)
                    .unwrap_or_else(|e| panic!("{kind} with {tag}: {e}"));
                assert_eq!(model.kind(), kind);
                assert_eq!(model.language().expect("language set"), tag);
            }
        }
    }

    #[test]
    fn every_variant_rejects_a_malformed_language() {
        for kind in ModelKind::ALL {
            let err = kind
                .build(&valid_fields(kind, "not-a-valid-tag"), ConstructMode::Validating)
                .expect_err("malformed tag");
            match err {
                SchemaError::Validation(err) => {
                    assert_eq!(err.model, kind.name());
                    assert_eq!(err.issues.len(), 1, "{kind}: {err}");
                    assert_eq!(err.issues[0].kind, IssueKind::InvalidLanguageTag);
                }
                other => panic!("expected Validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn trusted_construction_never_checks_language() {
        for kind in ModelKind::ALL {
            for raw in ["not-a-valid-tag", "", "???", "en_US"] {
                let model = kind
                    .build(&json!({"language": raw}), ConstructMode::Trusted)
                    .unwrap_or_else(|e| panic!("{kind} with {raw:?}: {e}"));
                assert_eq!(model.language().expect("stored verbatim"), raw);
            }
        }
    }

    #[test]
    fn names_parse_back_to_kinds() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.name().parse::<ModelKind>().expect("known"), kind);
            assert!(kind.fields().contains(&"language"));
        }
        assert_eq!(ModelKind::AiOutput.to_string(), "AIOutput");

        let err = "Medication".parse::<ModelKind>().expect_err("unknown");
        assert!(matches!(err, SchemaError::UnknownModel(name) if name == "Medication"));
    }

    #[test]
    fn build_named_dispatches_and_renders() {
        let model = build_named(
            "Encounter",
            &json!({"language": "en-US", "canonicalEpisodeId": "episode-123"}),
            ConstructMode::Validating,
        )
        .expect("valid encounter");

        let AnyModel::Encounter(encounter) = &model else {
            panic!("expected Encounter, got {model:?}");
        };
        assert_eq!(encounter.canonical_episode_id(), Some("episode-123"));
        assert_eq!(
            Value::Object(model.to_fields()),
            json!({"language": "en-US", "canonicalEpisodeId": "episode-123"})
        );
    }

    #[test]
    fn trusted_build_surfaces_structure_errors() {
        let err = build_named("Patient", &json!([1, 2]), ConstructMode::Trusted)
            .expect_err("not a mapping");
        assert!(matches!(err, SchemaError::Structure(e) if e.path == "<root>"));
    }
}
