//! Validated primitive types shared by the Carefield record schemas.
//!
//! The only primitive today is [`LanguageTag`], the locale identifier carried by every record
//! variant through the shared `language` field.

use regex::Regex;
use std::sync::LazyLock;

/// Accepted language tag grammar: a 2-3 letter primary subtag, optionally followed by a single
/// hyphen-separated region or script subtag of 2-8 alphanumerics.
///
/// Case is accepted as supplied (`en-US`, `pt-BR`, `EN-us` are all well formed).
pub const LANGUAGE_TAG_PATTERN: &str = r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})?$";

static LANGUAGE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(LANGUAGE_TAG_PATTERN).expect("language tag pattern is a valid regex")
});

/// Errors that can occur when creating a validated [`LanguageTag`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// The input was empty or contained only whitespace.
    #[error("invalid language tag: value cannot be empty")]
    Empty,

    /// The input did not match [`LANGUAGE_TAG_PATTERN`].
    #[error("invalid language tag: {0:?}")]
    Invalid(String),
}

/// A locale/language identifier such as `en-US`.
///
/// A tag created through [`LanguageTag::new`] is guaranteed to match
/// [`LANGUAGE_TAG_PATTERN`]. Trusted code paths that rehydrate records already known to be valid
/// may use [`LanguageTag::new_unchecked`], which stores the value verbatim without running the
/// grammar; [`LanguageTag::is_well_formed`] reports whether such a value would have passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Validates `input` and wraps it.
    ///
    /// The value is stored exactly as supplied: no trimming and no case normalisation.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Empty`] for empty or whitespace-only input, and [`TagError::Invalid`]
    /// when the input does not match [`LANGUAGE_TAG_PATTERN`].
    pub fn new(input: impl AsRef<str>) -> Result<Self, TagError> {
        let input = input.as_ref();
        if input.trim().is_empty() {
            return Err(TagError::Empty);
        }
        if !Self::matches_grammar(input) {
            return Err(TagError::Invalid(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    /// Wraps `input` without validating it.
    ///
    /// Only for trusted construction; the result may not be well formed.
    pub fn new_unchecked(input: impl Into<String>) -> Self {
        Self(input.into())
    }

    /// Returns `true` when `input` matches the accepted tag grammar.
    pub fn matches_grammar(input: &str) -> bool {
        LANGUAGE_TAG_RE.is_match(input)
    }

    /// Returns `true` when the stored value matches the accepted tag grammar.
    pub fn is_well_formed(&self) -> bool {
        Self::matches_grammar(&self.0)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the first hyphen (`en` for `en-US`).
    pub fn primary_subtag(&self) -> &str {
        self.0.split_once('-').map_or(self.0.as_str(), |(primary, _)| primary)
    }

    /// The part after the first hyphen (`US` for `en-US`), if any.
    pub fn region_subtag(&self) -> Option<&str> {
        self.0.split_once('-').map(|(_, region)| region)
    }

    /// Consumes the tag and returns the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LanguageTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LanguageTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl serde::Serialize for LanguageTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for LanguageTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LanguageTag::new(&s).map_err(serde::de::Error::custom)
    }
}
