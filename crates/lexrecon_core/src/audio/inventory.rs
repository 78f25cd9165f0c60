//! Audio-file inventory and two-direction match reporting.
//!
//! # Responsibility
//! - Hold the run's audio records and the known-no-audio exception set.
//! - Report notes without audio and audio without a matching note.
//!
//! # Invariants
//! - A note has audio when any of its headwords equals any candidate of any
//!   record.
//! - Known-no-audio headwords suppress reports on both sides.
//! - Matching never touches the filesystem; file ids are opaque.

use crate::model::audio::AudioRecord;
use crate::model::headword::Headword;
use crate::model::note::{NoteId, NoteSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Both directions of audio mismatch for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioMatchReport {
    /// Ids of notes with no matching audio record, in note order. Notes
    /// whose every headword is known to have no audio are suppressed.
    pub notes_without_audio: Vec<NoteId>,
    /// File ids of records matching no note, in record order. Records whose
    /// every candidate is known to have no audio are suppressed.
    pub audio_without_match: Vec<String>,
}

/// All audio records for one run plus the known-no-audio set.
#[derive(Debug, Clone, Default)]
pub struct AudioInventory {
    records: Vec<AudioRecord>,
    known_no_audio: HashSet<Headword>,
}

impl AudioInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record.
    ///
    /// A candidate headword already present on another record is legitimate
    /// (regional-variant pronunciations share a headword) and only logged.
    pub fn add_record(&mut self, record: AudioRecord) {
        for candidate in &record.candidates {
            if self
                .records
                .iter()
                .any(|existing| existing.candidates.contains(candidate))
            {
                debug!(
                    "event=duplicate_audio_headword module=audio status=ok headword={} file_id={}",
                    candidate, record.file_id
                );
            }
        }
        self.records.push(record);
    }

    /// Exempts a headword from missing-audio reporting on both sides.
    pub fn mark_known_no_audio(&mut self, headword: Headword) {
        self.known_no_audio.insert(headword);
    }

    pub fn records(&self) -> &[AudioRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matches notes against the inventory in both directions.
    pub fn match_notes(&self, notes: &NoteSet) -> AudioMatchReport {
        let note_headwords = notes.all_headwords();
        let candidates: HashSet<&Headword> = self
            .records
            .iter()
            .flat_map(|record| record.candidates.iter())
            .collect();

        let notes_without_audio = notes
            .iter()
            .filter(|note| {
                !note
                    .headwords
                    .iter()
                    .any(|headword| candidates.contains(headword))
            })
            .filter(|note| {
                !note
                    .headwords
                    .iter()
                    .all(|headword| self.known_no_audio.contains(headword))
            })
            .map(|note| note.id.clone())
            .collect();

        let audio_without_match = self
            .records
            .iter()
            .filter(|record| {
                !record
                    .candidates
                    .iter()
                    .any(|candidate| note_headwords.contains(candidate))
            })
            .filter(|record| {
                !record
                    .candidates
                    .iter()
                    .all(|candidate| self.known_no_audio.contains(candidate))
            })
            .map(|record| record.file_id.clone())
            .collect();

        AudioMatchReport {
            notes_without_audio,
            audio_without_match,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AudioInventory;
    use crate::model::audio::AudioRecord;
    use crate::model::headword::{Headword, HeadwordIndex};
    use crate::model::note::{Note, NoteSet};

    fn headword(raw: &str) -> Headword {
        HeadwordIndex::default()
            .canonicalize(raw)
            .expect("valid headword")
    }

    fn notes_with(entries: &[(&str, &[&str])]) -> NoteSet {
        let mut notes = NoteSet::new();
        for (id, raws) in entries {
            let headwords = raws.iter().map(|raw| headword(raw)).collect();
            notes.push(Note::new(*id, headwords)).expect("unique note id");
        }
        notes
    }

    #[test]
    fn any_headword_matching_any_candidate_counts_as_audio() {
        let mut inventory = AudioInventory::new();
        inventory.add_record(AudioRecord::new(
            "De-acht.ogg",
            vec![headword("acht"), headword("die acht")],
        ));
        let notes = notes_with(&[("n1", &["acht", "Nacht"])]);

        let report = inventory.match_notes(&notes);
        assert!(report.notes_without_audio.is_empty());
        assert!(report.audio_without_match.is_empty());
    }

    #[test]
    fn unmatched_sides_are_reported_in_order() {
        let mut inventory = AudioInventory::new();
        inventory.add_record(AudioRecord::new("DiB-D01_zug.mp3", vec![headword("Zug")]));
        inventory.add_record(AudioRecord::new("De-acht.ogg", vec![headword("acht")]));
        let notes = notes_with(&[("n1", &["Italien"]), ("n2", &["acht"])]);

        let report = inventory.match_notes(&notes);
        assert_eq!(report.notes_without_audio, vec!["n1".to_string()]);
        assert_eq!(report.audio_without_match, vec!["DiB-D01_zug.mp3".to_string()]);
    }

    #[test]
    fn known_no_audio_suppresses_note_report() {
        let mut inventory = AudioInventory::new();
        inventory.add_record(AudioRecord::new(
            "De-Professor.ogg",
            vec![headword("Professor")],
        ));
        inventory.mark_known_no_audio(headword("Professorin"));
        let notes = notes_with(&[("n1", &["Professorin"])]);

        let report = inventory.match_notes(&notes);
        assert!(report.notes_without_audio.is_empty());
    }

    #[test]
    fn known_no_audio_only_suppresses_fully_covered_notes() {
        let mut inventory = AudioInventory::new();
        inventory.mark_known_no_audio(headword("Professorin"));
        let notes = notes_with(&[("n1", &["Professorin", "Italien"])]);

        let report = inventory.match_notes(&notes);
        assert_eq!(report.notes_without_audio, vec!["n1".to_string()]);
    }

    #[test]
    fn known_no_audio_suppresses_record_report() {
        let mut inventory = AudioInventory::new();
        inventory.add_record(AudioRecord::new(
            "De-Beamtin.ogg",
            vec![headword("Beamtin")],
        ));
        inventory.mark_known_no_audio(headword("Beamtin"));
        let notes = notes_with(&[("n1", &["acht"])]);

        let report = inventory.match_notes(&notes);
        assert!(report.audio_without_match.is_empty());
    }

    #[test]
    fn several_records_may_match_one_note() {
        let mut inventory = AudioInventory::new();
        inventory.add_record(AudioRecord::new("De-acht.ogg", vec![headword("acht")]));
        inventory.add_record(AudioRecord::new("De-acht2.ogg", vec![headword("acht")]));
        let notes = notes_with(&[("n1", &["acht"])]);

        let report = inventory.match_notes(&notes);
        assert!(report.notes_without_audio.is_empty());
        assert!(report.audio_without_match.is_empty());
    }
}
