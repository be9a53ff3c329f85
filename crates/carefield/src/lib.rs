//! Carefield record schemas.
//!
//! This crate defines clinical (FHIR-aligned) and human-evaluation record variants that all embed
//! one shared optional field, `language`, validated against a language tag grammar.
//!
//! Every variant supports two explicit construction paths:
//! - [`Model::construct`]: trusted, stores supplied values unchecked (rehydrating storage that
//!   is already known to be valid, partial fixtures)
//! - [`Model::validate`]: validating, runs every field validator, enforces required fields and
//!   reports all violations at once
//!
//! Input is an in-memory field mapping ([`serde_json::Value`] objects). Turning wire or storage
//! text into such a mapping is the caller's concern.
//!
//! ```
//! use carefield::{HasLanguage, Model, Patient};
//! use serde_json::json;
//!
//! let patient = Patient::validate(&json!({"language": "es-MX"})).unwrap();
//! assert_eq!(patient.language().unwrap(), "es-MX");
//!
//! assert!(Patient::validate(&json!({"language": "not-a-valid-tag"})).is_err());
//! assert!(Patient::construct(&json!({"language": "not-a-valid-tag"})).is_ok());
//! ```

pub mod error;
pub mod evaluations;
pub mod fhir;
pub mod fields;
pub mod language;
pub mod model;
pub mod registry;

pub use error::{FieldIssue, IssueKind, SchemaError, SchemaResult, StructureError, ValidationError};
pub use evaluations::{AiOutput, DeIdentifiedDatasetDescriptor, Evaluation};
pub use fhir::{
    Annotation, ClinicalImpression, Condition, Encounter, Observation, Patient, Procedure,
};
pub use fields::{FieldMap, FieldReader, FieldWriter, Timestamp};
pub use language::{BaseLanguage, HasLanguage, LANGUAGE_FIELD};
pub use model::{ConstructMode, Model};
pub use registry::{build_named, AnyModel, ModelKind};

// Re-export the tag type so callers need only this crate.
pub use carefield_types::{LanguageTag, TagError};
