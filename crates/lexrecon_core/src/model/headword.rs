//! Headword identity and canonicalization.
//!
//! # Responsibility
//! - Define the canonical string key for one vocabulary unit.
//! - Normalize raw adapter tokens into that key.
//!
//! # Invariants
//! - A `Headword` is never empty.
//! - Two headwords are equal iff their normalized strings are equal.
//! - Empty-after-normalization input is an error, never a silent drop.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Result type for headword canonicalization.
pub type HeadwordResult<T> = Result<T, HeadwordError>;

/// Canonicalization error for raw headword input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadwordError {
    /// Input normalizes to the empty string.
    ///
    /// Surfaced to the caller because a dropped entry would corrupt
    /// downstream coverage counts.
    Malformed { raw: String },
}

impl Display for HeadwordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { raw } => {
                write!(f, "malformed headword: `{raw}` normalizes to empty")
            }
        }
    }
}

impl Error for HeadwordError {}

/// Canonical string key identifying one vocabulary item.
///
/// A headword may be a single word or a multi-word phrase. Distinct surface
/// forms can map to the same headword upstream; the engine treats the
/// normalized string as an opaque unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headword(String);

impl Headword {
    /// Returns the normalized key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Headword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case handling applied during canonicalization.
///
/// Default is `Preserve`: capitalization is meaningful in the target
/// language domain (German nouns), so callers wanting case-insensitive
/// matching must fold upstream or opt into `Lower`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFolding {
    #[default]
    Preserve,
    Lower,
}

/// Canonicalizer shared by reference-list ingestion, note ingestion and
/// audio matching.
///
/// Normalization is purely textual: trim surrounding whitespace, collapse
/// internal whitespace runs to single spaces, apply the case policy. No
/// stemming or linguistic analysis; identity is string equality afterward.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadwordIndex {
    folding: CaseFolding,
}

impl HeadwordIndex {
    /// Creates an index with the given case policy.
    pub fn new(folding: CaseFolding) -> Self {
        Self { folding }
    }

    /// Canonicalizes one raw string into a headword.
    ///
    /// # Errors
    /// - `HeadwordError::Malformed` when the input normalizes to empty.
    pub fn canonicalize(&self, raw: &str) -> HeadwordResult<Headword> {
        let collapsed = WHITESPACE_RUN_RE.replace_all(raw.trim(), " ");
        if collapsed.is_empty() {
            return Err(HeadwordError::Malformed {
                raw: raw.to_string(),
            });
        }
        let key = match self.folding {
            CaseFolding::Preserve => collapsed.into_owned(),
            CaseFolding::Lower => collapsed.to_lowercase(),
        };
        Ok(Headword(key))
    }

    /// Canonicalizes a sequence of raw tokens into one headword.
    ///
    /// Tokens are joined with single spaces before normalization, so
    /// `["der", "Professor"]` and `"der  Professor"` yield the same key.
    pub fn canonicalize_tokens<'a, I>(&self, tokens: I) -> HeadwordResult<Headword>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined = tokens.into_iter().collect::<Vec<_>>().join(" ");
        self.canonicalize(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::{CaseFolding, Headword, HeadwordError, HeadwordIndex};

    #[test]
    fn canonicalize_trims_and_collapses_whitespace() {
        let index = HeadwordIndex::default();
        let headword = index
            .canonicalize("  der \t Professor  ")
            .expect("valid headword");
        assert_eq!(headword.as_str(), "der Professor");
    }

    #[test]
    fn canonicalize_preserves_case_by_default() {
        let index = HeadwordIndex::default();
        let headword = index.canonicalize("Italien").expect("valid headword");
        assert_eq!(headword.as_str(), "Italien");
    }

    #[test]
    fn canonicalize_lower_folds_case() {
        let index = HeadwordIndex::new(CaseFolding::Lower);
        let headword = index.canonicalize("Italien").expect("valid headword");
        assert_eq!(headword.as_str(), "italien");
    }

    #[test]
    fn canonicalize_rejects_blank_input() {
        let index = HeadwordIndex::default();
        let err = index.canonicalize(" \t ").expect_err("blank must be rejected");
        assert_eq!(
            err,
            HeadwordError::Malformed {
                raw: " \t ".to_string()
            }
        );
    }

    #[test]
    fn canonicalize_tokens_joins_with_single_spaces() {
        let index = HeadwordIndex::default();
        let from_tokens = index
            .canonicalize_tokens(["der", "Esel"])
            .expect("valid headword");
        let from_string = index.canonicalize("der   Esel").expect("valid headword");
        assert_eq!(from_tokens, from_string);
    }

    #[test]
    fn equal_normalized_strings_are_equal_headwords() {
        let index = HeadwordIndex::default();
        let a = index.canonicalize("acht ").expect("valid headword");
        let b = index.canonicalize("  acht").expect("valid headword");
        assert_eq!(a, b);
    }

    #[test]
    fn headword_serializes_transparently() {
        let index = HeadwordIndex::default();
        let headword = index.canonicalize("teuer").expect("valid headword");
        let json = serde_json::to_value(&headword).expect("serializable");
        assert_eq!(json, serde_json::json!("teuer"));
        let decoded: Headword = serde_json::from_value(json).expect("deserializable");
        assert_eq!(decoded, headword);
    }
}
