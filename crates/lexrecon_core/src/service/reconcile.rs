//! One end-to-end reconciliation pass.
//!
//! # Responsibility
//! - Join the note set against the catalog and the audio inventory.
//! - Collect every report into one immutable result bundle.
//!
//! # Invariants
//! - `run` is a pure function of its inputs; no state survives between
//!   runs, so independent runs may execute in parallel.
//! - Report steps are independent; no step's output feeds another.
//! - Errors abort the run; partial results are never returned.

use crate::audio::inventory::AudioInventory;
use crate::catalog::reference_catalog::{
    CatalogError, FrequencyTable, MissingPolicy, ReferenceCatalog,
};
use crate::model::headword::{Headword, HeadwordError};
use crate::model::note::{NoteId, NoteSet, NoteSetError};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Umbrella error for one reconciliation run.
///
/// Every variant is fatal: coverage and frequency numbers are only
/// meaningful over a complete, consistent input set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    Headword(HeadwordError),
    Notes(NoteSetError),
    Catalog(CatalogError),
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Headword(err) => write!(f, "{err}"),
            Self::Notes(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Headword(err) => Some(err),
            Self::Notes(err) => Some(err),
            Self::Catalog(err) => Some(err),
        }
    }
}

impl From<HeadwordError> for ReconcileError {
    fn from(value: HeadwordError) -> Self {
        Self::Headword(value)
    }
}

impl From<NoteSetError> for ReconcileError {
    fn from(value: NoteSetError) -> Self {
        Self::Notes(value)
    }
}

impl From<CatalogError> for ReconcileError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

/// Knobs for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Largest intersection subset to compute; `None` computes every
    /// subset of the catalog. Subsets beyond the limit are omitted up
    /// front, not computed and discarded.
    pub max_subset_size: Option<usize>,
    /// Cross-list suppression policy for missing reports.
    pub missing_policy: MissingPolicy,
}

/// Chapter assignment and list coverage for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteReconciliation {
    pub note_id: NoteId,
    /// Minimum over the note's chapter hint and every offset-adjusted
    /// reference chapter; `None` when nothing covers the note.
    pub chapter: Option<i64>,
    /// Catalog lists containing at least one of the note's headwords, in
    /// catalog order.
    pub in_lists: Vec<String>,
}

/// Missing-from-notes report for one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReport {
    pub list: String,
    /// Headwords with at least one entry, not okay-listed, covered by no
    /// note; first-seen entry order.
    pub headwords: Vec<Headword>,
}

/// Output bundle of one reconciliation run. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Per-note assignments, in note order.
    pub notes: Vec<NoteReconciliation>,
    /// Per-list missing reports, in catalog order.
    pub missing: Vec<MissingReport>,
    /// Ids of notes with no matching audio, in note order.
    pub notes_without_audio: Vec<NoteId>,
    /// File ids of audio matching no note, in record order.
    pub audio_without_match: Vec<String>,
    /// Intersection frequencies for every computed subset.
    pub frequency: FrequencyTable,
}

/// Runs one reconciliation pass over fully materialized inputs.
///
/// # Errors
/// - `CatalogError` variants when a report references a list the catalog
///   does not hold (cannot happen for catalog-derived names, but the
///   contract surfaces it rather than masking it).
pub fn run(
    catalog: &ReferenceCatalog,
    inventory: &AudioInventory,
    notes: &NoteSet,
    config: &RunConfig,
) -> ReconcileResult<ReconciliationResult> {
    info!(
        "event=reconcile_run module=service status=start notes={} lists={} audio_records={}",
        notes.len(),
        catalog.len(),
        inventory.len()
    );

    let note_reports = notes
        .iter()
        .map(|note| {
            let reference_chapter = catalog.assign_chapter(note);
            let hint = note.chapter_hint.map(i64::from);
            let chapter = match (reference_chapter, hint) {
                (Some(reference), Some(hint)) => Some(reference.min(hint)),
                (reference, hint) => reference.or(hint),
            };
            NoteReconciliation {
                note_id: note.id.clone(),
                chapter,
                in_lists: catalog
                    .covering_lists(note)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect();

    let mut missing = Vec::with_capacity(catalog.len());
    for list in catalog.iter() {
        let headwords = catalog.missing_report(list.name(), notes, config.missing_policy)?;
        missing.push(MissingReport {
            list: list.name().to_string(),
            headwords,
        });
    }

    let audio_report = inventory.match_notes(notes);

    let subset_limit = config.max_subset_size.unwrap_or(catalog.len());
    let frequency = catalog.frequency_table(subset_limit);

    let result = ReconciliationResult {
        notes: note_reports,
        missing,
        notes_without_audio: audio_report.notes_without_audio,
        audio_without_match: audio_report.audio_without_match,
        frequency,
    };

    info!(
        "event=reconcile_run module=service status=ok unassigned={} frequency_rows={}",
        result
            .notes
            .iter()
            .filter(|note| note.chapter.is_none())
            .count(),
        result.frequency.rows.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{run, ReconcileError, RunConfig};
    use crate::audio::inventory::AudioInventory;
    use crate::catalog::reference_catalog::{CatalogError, ReferenceCatalog};
    use crate::catalog::reference_list::{ReferenceEntry, ReferenceList};
    use crate::model::headword::{Headword, HeadwordIndex};
    use crate::model::note::{Note, NoteSet};

    fn headword(raw: &str) -> Headword {
        HeadwordIndex::default()
            .canonicalize(raw)
            .expect("valid headword")
    }

    #[test]
    fn chapter_hint_participates_as_minimum_candidate() {
        let mut catalog = ReferenceCatalog::new();
        let mut la = ReferenceList::new("LA", 0);
        la.add_entry(ReferenceEntry::new(headword("acht"), Some(5)));
        catalog.add_list(la).expect("add LA");

        let mut notes = NoteSet::new();
        notes
            .push(Note::new("hinted", vec![headword("acht")]).with_chapter_hint(3))
            .expect("insert");
        notes
            .push(Note::new("unhinted", vec![headword("acht")]))
            .expect("insert");
        notes
            .push(Note::new("hint-only", vec![headword("zehn")]).with_chapter_hint(7))
            .expect("insert");

        let result = run(
            &catalog,
            &AudioInventory::new(),
            &notes,
            &RunConfig::default(),
        )
        .expect("run succeeds");

        assert_eq!(result.notes[0].chapter, Some(3));
        assert_eq!(result.notes[1].chapter, Some(5));
        assert_eq!(result.notes[2].chapter, Some(7));
    }

    #[test]
    fn ingestion_errors_wrap_into_reconcile_error() {
        let err: ReconcileError = CatalogError::UnknownList("LX".to_string()).into();
        assert_eq!(
            err,
            ReconcileError::Catalog(CatalogError::UnknownList("LX".to_string()))
        );
        assert!(err.to_string().contains("LX"));

        let err: ReconcileError = crate::model::headword::HeadwordError::Malformed {
            raw: " ".to_string(),
        }
        .into();
        assert!(err.to_string().contains("malformed headword"));

        let err: ReconcileError =
            crate::model::note::NoteSetError::DuplicateNoteId("n1".to_string()).into();
        assert!(err.to_string().contains("duplicate note id"));
    }
}
