//! FHIR-aligned clinical record variants.
//!
//! These resources carry the shared `language` field and, for `Encounter`, the
//! `canonicalEpisodeId` extension. Full FHIR resource semantics are not modelled.

use crate::fields::{FieldReader, FieldWriter};
use crate::language::{BaseLanguage, HasLanguage, LANGUAGE_FIELD};
use crate::model::Model;

/// Generates a resource whose only field is the shared `language`.
macro_rules! language_only_resource {
    ($(#[$meta:meta])* $name:ident => $wire:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            base: BaseLanguage,
        }

        impl HasLanguage for $name {
            fn base_language(&self) -> &BaseLanguage {
                &self.base
            }
        }

        impl Model for $name {
            const NAME: &'static str = $wire;
            const FIELDS: &'static [&'static str] = &[LANGUAGE_FIELD];

            fn read(reader: &mut FieldReader<'_>) -> Self {
                Self {
                    base: BaseLanguage::read(reader),
                }
            }

            fn write(&self, writer: &mut FieldWriter) {
                self.base.write(writer);
            }
        }
    };
}

language_only_resource!(
    /// Patient demographics resource.
    Patient => "Patient"
);
language_only_resource!(
    /// A measurement or assertion about a patient.
    Observation => "Observation"
);
language_only_resource!(
    /// A clinical condition, problem or diagnosis.
    Condition => "Condition"
);
language_only_resource!(
    /// An action performed on or for a patient.
    Procedure => "Procedure"
);
language_only_resource!(
    /// A clinician's assessment of a patient's situation.
    ClinicalImpression => "ClinicalImpression"
);
language_only_resource!(
    /// A free-text note attached to a resource.
    Annotation => "Annotation"
);

/// Wire key of the episode identifier carried by [`Encounter`].
pub const CANONICAL_EPISODE_ID_FIELD: &str = "canonicalEpisodeId";

/// An interaction between a patient and a care provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Encounter {
    base: BaseLanguage,
    canonical_episode_id: Option<String>,
}

impl Encounter {
    /// Identifier grouping encounters that belong to the same care episode.
    pub fn canonical_episode_id(&self) -> Option<&str> {
        self.canonical_episode_id.as_deref()
    }
}

impl HasLanguage for Encounter {
    fn base_language(&self) -> &BaseLanguage {
        &self.base
    }
}

impl Model for Encounter {
    const NAME: &'static str = "Encounter";
    const FIELDS: &'static [&'static str] = &[LANGUAGE_FIELD, CANONICAL_EPISODE_ID_FIELD];

    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            base: BaseLanguage::read(reader),
            canonical_episode_id: reader.optional_string(CANONICAL_EPISODE_ID_FIELD),
        }
    }

    fn write(&self, writer: &mut FieldWriter) {
        self.base.write(writer);
        writer.string(
            CANONICAL_EPISODE_ID_FIELD,
            self.canonical_episode_id.as_deref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use crate::model::ConstructMode;
    use serde_json::json;

    #[test]
    fn patient_keeps_language_through_trusted_construction() {
        let patient = Patient::construct(&json!({"language": "es-MX"})).expect("construct");
        assert_eq!(patient.language().expect("language set"), "es-MX");
    }

    #[test]
    fn patient_validating_construction_accepts_valid_tag() {
        let patient = Patient::validate(&json!({"language": "es-MX"})).expect("valid patient");
        assert_eq!(patient.language().expect("language set"), "es-MX");
    }

    #[test]
    fn patient_validating_construction_rejects_bad_tag() {
        let err = Patient::validate(&json!({"language": "not-a-valid-tag"}))
            .expect_err("should reject malformed tag");
        assert_eq!(err.model, "Patient");
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "language");
        assert_eq!(err.issues[0].kind, IssueKind::InvalidLanguageTag);
    }

    #[test]
    fn patient_without_language_is_valid() {
        let patient = Patient::validate(&json!({})).expect("language is optional");
        assert!(patient.language().is_none());
    }

    #[test]
    fn encounter_carries_episode_and_language() {
        let encounter = Encounter::construct(&json!({
            "language": "en-US",
            "canonicalEpisodeId": "episode-123",
        }))
        .expect("construct");

        assert_eq!(encounter.language().expect("language set"), "en-US");
        assert_eq!(encounter.canonical_episode_id(), Some("episode-123"));

        let validated = Encounter::validate(&json!({
            "language": "en-US",
            "canonicalEpisodeId": "episode-123",
        }))
        .expect("valid encounter");
        assert_eq!(validated, encounter);
    }

    #[test]
    fn remaining_resources_share_language_field() {
        let observation = Observation::construct(&json!({"language": "fr-FR"})).expect("obs");
        let condition = Condition::construct(&json!({"language": "pt-BR"})).expect("condition");
        let procedure = Procedure::construct(&json!({"language": "de-DE"})).expect("procedure");
        let clinical_impression =
            ClinicalImpression::construct(&json!({"language": "it-IT"})).expect("impression");
        let annotation = Annotation::construct(&json!({"language": "ja-JP"})).expect("annotation");

        assert_eq!(observation.language().expect("set"), "fr-FR");
        assert_eq!(condition.language().expect("set"), "pt-BR");
        assert_eq!(procedure.language().expect("set"), "de-DE");
        assert_eq!(clinical_impression.language().expect("set"), "it-IT");
        assert_eq!(annotation.language().expect("set"), "ja-JP");
    }

    #[test]
    fn validating_construction_rejects_undeclared_keys() {
        let err = Observation::validate(&json!({"language": "fr-FR", "status": "final"}))
            .expect_err("status is not declared");
        assert!(err.has_issue_at("status"));

        // Trusted construction ignores them.
        let observation =
            Observation::construct(&json!({"language": "fr-FR", "status": "final"}))
                .expect("construct");
        assert!(!observation.to_fields().contains_key("status"));
    }

    #[test]
    fn encounter_episode_must_be_a_string() {
        let err = Encounter::construct(&json!({"canonicalEpisodeId": 123}))
            .expect_err("number cannot fill a string slot");
        assert_eq!(err.path, CANONICAL_EPISODE_ID_FIELD);
    }

    #[test]
    fn rebuild_changes_language_without_mutation() {
        let original = Encounter::validate(&json!({
            "language": "en-US",
            "canonicalEpisodeId": "episode-123",
        }))
        .expect("valid");

        let mut changes = crate::FieldMap::new();
        changes.insert(LANGUAGE_FIELD.into(), json!("en-GB"));
        let rebuilt = original
            .rebuild(changes, ConstructMode::Validating)
            .expect("rebuild");

        assert_eq!(original.language().expect("set"), "en-US");
        assert_eq!(rebuilt.language().expect("set"), "en-GB");
        assert_eq!(rebuilt.canonical_episode_id(), Some("episode-123"));

        let mut clear = crate::FieldMap::new();
        clear.insert(LANGUAGE_FIELD.into(), serde_json::Value::Null);
        let cleared = rebuilt
            .rebuild(clear, ConstructMode::Validating)
            .expect("rebuild");
        assert!(cleared.language().is_none());
    }

    #[test]
    fn check_flags_malformed_trusted_language() {
        let patient = Patient::construct(&json!({"language": "not-a-valid-tag"})).expect("trusted");
        let err = patient.check().expect_err("tag is malformed");
        assert!(err.has_issue_at(LANGUAGE_FIELD));

        let fine = Patient::construct(&json!({"language": "es-MX"})).expect("trusted");
        fine.check().expect("tag is well formed");
    }
}
