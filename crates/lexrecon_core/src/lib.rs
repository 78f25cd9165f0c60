//! Reconciliation engine for flashcard notes, vocabulary reference lists
//! and audio inventories.
//!
//! One run joins a set of notes against a catalog of reference lists and an
//! audio inventory, assigning each note the earliest chapter any of its
//! headwords appears in, and reporting coverage gaps in every direction:
//! reference words missing from the notes, notes without audio, audio
//! without a note, and headword-overlap frequencies across list subsets.
//!
//! Raw-format parsing (chapter-grouped files, spreadsheet exports, audio
//! filename conventions) lives in adapters outside this crate; the engine
//! only sees normalized records.

pub mod audio;
pub mod catalog;
pub mod logging;
pub mod model;
pub mod service;

pub use audio::inventory::{AudioInventory, AudioMatchReport};
pub use catalog::reference_catalog::{
    CatalogError, CatalogResult, FrequencyRow, FrequencyTable, MissingPolicy, ReferenceCatalog,
};
pub use catalog::reference_list::{ReferenceEntry, ReferenceList};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::audio::AudioRecord;
pub use model::headword::{CaseFolding, Headword, HeadwordError, HeadwordIndex, HeadwordResult};
pub use model::note::{Note, NoteId, NoteSet, NoteSetError, NoteSetResult};
pub use service::reconcile::{
    run, MissingReport, NoteReconciliation, ReconcileError, ReconcileResult, ReconciliationResult,
    RunConfig,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
