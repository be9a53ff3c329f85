//! Human-evaluation records: AI outputs, the ratings clinicians give them, and descriptors of
//! de-identified datasets built from both.
//!
//! Required fields are enforced only by validating construction. A trusted instance may be
//! partial; its missing required fields read as the empty value of their type (empty string,
//! Unix epoch, zero, empty mapping) and are omitted from [`Model::to_fields`].

use crate::fields::{FieldReader, FieldWriter, Timestamp};
use crate::language::{BaseLanguage, HasLanguage, LANGUAGE_FIELD};
use crate::model::Model;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

static NO_SCORES: BTreeMap<String, i64> = BTreeMap::new();

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn instant(value: Option<&Timestamp>) -> DateTime<Utc> {
    value.and_then(Timestamp::parsed).unwrap_or_default()
}

// ============================================================================
// AIOutput
// ============================================================================

/// Text produced by a model for an encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiOutput {
    base: BaseLanguage,
    id: Option<String>,
    encounter_id: Option<String>,
    output_type: Option<String>,
    content: Option<String>,
    model_version: Option<String>,
    timestamp: Option<Timestamp>,
}

impl AiOutput {
    pub fn id(&self) -> &str {
        text(&self.id)
    }

    pub fn encounter_id(&self) -> &str {
        text(&self.encounter_id)
    }

    /// Kind of output, e.g. `diagnosis`. Wire key `type`.
    pub fn output_type(&self) -> &str {
        text(&self.output_type)
    }

    pub fn content(&self) -> &str {
        text(&self.content)
    }

    pub fn model_version(&self) -> &str {
        text(&self.model_version)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        instant(self.timestamp.as_ref())
    }
}

impl HasLanguage for AiOutput {
    fn base_language(&self) -> &BaseLanguage {
        &self.base
    }
}

impl Model for AiOutput {
    const NAME: &'static str = "AIOutput";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "encounter_id",
        "type",
        "content",
        "model_version",
        "timestamp",
        LANGUAGE_FIELD,
    ];

    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.required_string("id"),
            encounter_id: reader.required_string("encounter_id"),
            output_type: reader.required_string("type"),
            content: reader.required_string("content"),
            model_version: reader.required_string("model_version"),
            timestamp: reader.required_timestamp("timestamp"),
            base: BaseLanguage::read(reader),
        }
    }

    fn write(&self, writer: &mut FieldWriter) {
        writer.string("id", self.id.as_deref());
        writer.string("encounter_id", self.encounter_id.as_deref());
        writer.string("type", self.output_type.as_deref());
        writer.string("content", self.content.as_deref());
        writer.string("model_version", self.model_version.as_deref());
        writer.timestamp("timestamp", self.timestamp.as_ref());
        self.base.write(writer);
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// A human rating of one [`AiOutput`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    base: BaseLanguage,
    id: Option<String>,
    aioutput_id: Option<String>,
    output_type: Option<String>,
    ratings: Option<BTreeMap<String, i64>>,
    safety: Option<String>,
    comments: Option<String>,
    timestamp: Option<Timestamp>,
}

impl Evaluation {
    pub fn id(&self) -> &str {
        text(&self.id)
    }

    pub fn aioutput_id(&self) -> &str {
        text(&self.aioutput_id)
    }

    pub fn output_type(&self) -> &str {
        text(&self.output_type)
    }

    /// Score per rating category, e.g. `accuracy -> 5`.
    pub fn ratings(&self) -> &BTreeMap<String, i64> {
        self.ratings.as_ref().unwrap_or(&NO_SCORES)
    }

    pub fn rating(&self, category: &str) -> Option<i64> {
        self.ratings().get(category).copied()
    }

    pub fn safety(&self) -> &str {
        text(&self.safety)
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        instant(self.timestamp.as_ref())
    }
}

impl HasLanguage for Evaluation {
    fn base_language(&self) -> &BaseLanguage {
        &self.base
    }
}

impl Model for Evaluation {
    const NAME: &'static str = "Evaluation";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "aioutput_id",
        "output_type",
        "ratings",
        "safety",
        "comments",
        "timestamp",
        LANGUAGE_FIELD,
    ];

    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.required_string("id"),
            aioutput_id: reader.required_string("aioutput_id"),
            output_type: reader.required_string("output_type"),
            ratings: reader.required_scores("ratings"),
            safety: reader.required_string("safety"),
            comments: reader.optional_string("comments"),
            timestamp: reader.required_timestamp("timestamp"),
            base: BaseLanguage::read(reader),
        }
    }

    fn write(&self, writer: &mut FieldWriter) {
        writer.string("id", self.id.as_deref());
        writer.string("aioutput_id", self.aioutput_id.as_deref());
        writer.string("output_type", self.output_type.as_deref());
        writer.scores("ratings", self.ratings.as_ref());
        writer.string("safety", self.safety.as_deref());
        writer.string("comments", self.comments.as_deref());
        writer.timestamp("timestamp", self.timestamp.as_ref());
        self.base.write(writer);
    }
}

// ============================================================================
// DeIdentifiedDatasetDescriptor
// ============================================================================

/// Describes a released de-identified dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeIdentifiedDatasetDescriptor {
    base: BaseLanguage,
    dataset_id: Option<String>,
    generation_date: Option<Timestamp>,
    version: Option<String>,
    records: Option<i64>,
    license: Option<String>,
    url: Option<String>,
}

impl DeIdentifiedDatasetDescriptor {
    pub fn dataset_id(&self) -> &str {
        text(&self.dataset_id)
    }

    pub fn generation_date(&self) -> DateTime<Utc> {
        instant(self.generation_date.as_ref())
    }

    pub fn version(&self) -> &str {
        text(&self.version)
    }

    /// Number of records in the dataset.
    pub fn records(&self) -> i64 {
        self.records.unwrap_or_default()
    }

    pub fn license(&self) -> &str {
        text(&self.license)
    }

    /// Download location, stored verbatim.
    pub fn url(&self) -> &str {
        text(&self.url)
    }
}

impl HasLanguage for DeIdentifiedDatasetDescriptor {
    fn base_language(&self) -> &BaseLanguage {
        &self.base
    }
}

impl Model for DeIdentifiedDatasetDescriptor {
    const NAME: &'static str = "DeIdentifiedDatasetDescriptor";
    const FIELDS: &'static [&'static str] = &[
        "dataset_id",
        "generation_date",
        "version",
        "records",
        "license",
        "url",
        LANGUAGE_FIELD,
    ];

    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            dataset_id: reader.required_string("dataset_id"),
            generation_date: reader.required_timestamp("generation_date"),
            version: reader.required_string("version"),
            records: reader.required_count("records"),
            license: reader.required_string("license"),
            url: reader.required_string("url"),
            base: BaseLanguage::read(reader),
        }
    }

    fn write(&self, writer: &mut FieldWriter) {
        writer.string("dataset_id", self.dataset_id.as_deref());
        writer.timestamp("generation_date", self.generation_date.as_ref());
        writer.string("version", self.version.as_deref());
        writer.count("records", self.records);
        writer.string("license", self.license.as_deref());
        writer.string("url", self.url.as_deref());
        self.base.write(writer);
    }
}
