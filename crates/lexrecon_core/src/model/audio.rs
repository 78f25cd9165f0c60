//! Audio asset records.
//!
//! # Responsibility
//! - Define the shape handed over by audio-filename adapters.
//!
//! # Invariants
//! - The file identifier is opaque; the engine never touches the filesystem.

use crate::model::headword::Headword;
use serde::{Deserialize, Serialize};

/// One audio asset and the headword(s) its filename is believed to
/// represent.
///
/// A filename convention may yield more than one candidate (e.g. the stem
/// both with and without an article); any candidate matching any note
/// headword counts as a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRecord {
    /// File identifier, typically the relative path or stem.
    pub file_id: String,
    /// Candidate headwords derived from the filename.
    pub candidates: Vec<Headword>,
}

impl AudioRecord {
    pub fn new(file_id: impl Into<String>, candidates: Vec<Headword>) -> Self {
        Self {
            file_id: file_id.into(),
            candidates,
        }
    }
}
