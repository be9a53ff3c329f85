//! The shared `language` field-set.
//!
//! [`BaseLanguage`] is embedded by value into every record variant. It contributes exactly one
//! optional field, `language`, and its validator: the language tag grammar runs only on the
//! validating path. On the trusted path the raw string is kept as-is.

use crate::error::IssueKind;
use crate::fields::{FieldReader, FieldWriter};
use carefield_types::LanguageTag;

/// Wire key of the shared field.
pub const LANGUAGE_FIELD: &str = "language";

/// Optional language carried by every record variant. Absent by default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BaseLanguage {
    language: Option<LanguageTag>,
}

impl BaseLanguage {
    pub fn new(language: Option<LanguageTag>) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Option<&LanguageTag> {
        self.language.as_ref()
    }

    pub fn read(reader: &mut FieldReader<'_>) -> Self {
        let language = match reader.optional_string(LANGUAGE_FIELD) {
            None => None,
            Some(raw) if !reader.mode().is_validating() => Some(LanguageTag::new_unchecked(raw)),
            Some(raw) => match LanguageTag::new(&raw) {
                Ok(tag) => Some(tag),
                Err(_) => {
                    reader.reject(LANGUAGE_FIELD, IssueKind::InvalidLanguageTag);
                    None
                }
            },
        };
        Self { language }
    }

    pub fn write(&self, writer: &mut FieldWriter) {
        writer.language(LANGUAGE_FIELD, self.language.as_ref());
    }
}

/// Implemented by every type that embeds [`BaseLanguage`].
pub trait HasLanguage {
    /// The embedded field-set.
    fn base_language(&self) -> &BaseLanguage;

    /// The record's language tag, if one was supplied.
    fn language(&self) -> Option<&LanguageTag> {
        self.base_language().language()
    }
}

impl HasLanguage for BaseLanguage {
    fn base_language(&self) -> &BaseLanguage {
        self
    }
}
