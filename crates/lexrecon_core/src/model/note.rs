//! Note records and the per-run note collection.
//!
//! # Responsibility
//! - Define the flashcard note shape handed over by the note loader.
//! - Enforce note-id uniqueness at ingestion time.
//!
//! # Invariants
//! - A note carries at least one headword.
//! - Note ids are unique within one `NoteSet`.
//! - Notes are never mutated by the engine; metadata is opaque passthrough.

use crate::model::headword::Headword;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable external identifier of one note.
///
/// Note ids come from the note loader as opaque strings; the engine never
/// generates or rewrites them.
pub type NoteId = String;

/// Result type for note-set ingestion.
pub type NoteSetResult<T> = Result<T, NoteSetError>;

/// Ingestion error for the note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSetError {
    /// A note id was seen twice; aborts the run.
    DuplicateNoteId(NoteId),
    /// A note arrived without any headword.
    NoteWithoutHeadwords(NoteId),
}

impl Display for NoteSetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNoteId(id) => write!(f, "duplicate note id: `{id}`"),
            Self::NoteWithoutHeadwords(id) => {
                write!(f, "note `{id}` has no headwords")
            }
        }
    }
}

impl Error for NoteSetError {}

/// One flashcard unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// External id from the note loader.
    pub id: NoteId,
    /// Ordered headwords this note is about (a note may encode several
    /// words, e.g. a noun and its plural form).
    pub headwords: Vec<Headword>,
    /// Chapter the note file itself claims, if any. Participates in chapter
    /// assignment as one more minimum candidate.
    pub chapter_hint: Option<u32>,
    /// Opaque fields passed through untouched.
    pub metadata: BTreeMap<String, String>,
}

impl Note {
    /// Creates a note with no chapter hint and empty metadata.
    pub fn new(id: impl Into<NoteId>, headwords: Vec<Headword>) -> Self {
        Self {
            id: id.into(),
            headwords,
            chapter_hint: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the chapter hint from the note file.
    pub fn with_chapter_hint(mut self, chapter: u32) -> Self {
        self.chapter_hint = Some(chapter);
        self
    }
}

/// Ordered, id-unique collection of notes for one run.
///
/// Built through `push` only, so the id-uniqueness invariant cannot be
/// bypassed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSet {
    notes: Vec<Note>,
}

impl NoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a note, rejecting duplicate ids and headword-less notes.
    ///
    /// # Errors
    /// - `NoteSetError::DuplicateNoteId` when the id is already present.
    /// - `NoteSetError::NoteWithoutHeadwords` when the headword list is
    ///   empty.
    pub fn push(&mut self, note: Note) -> NoteSetResult<()> {
        if note.headwords.is_empty() {
            return Err(NoteSetError::NoteWithoutHeadwords(note.id));
        }
        if self.notes.iter().any(|existing| existing.id == note.id) {
            return Err(NoteSetError::DuplicateNoteId(note.id));
        }
        self.notes.push(note);
        Ok(())
    }

    /// Iterates notes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Returns the set of every headword appearing in any note.
    ///
    /// Backs the missing report and audio matching.
    pub fn all_headwords(&self) -> HashSet<&Headword> {
        self.notes
            .iter()
            .flat_map(|note| note.headwords.iter())
            .collect()
    }
}
