//! One normalized vocabulary reference list.
//!
//! # Responsibility
//! - Own the (headword, chapter) entries of one named source.
//! - Answer chapter and membership lookups with the list offset applied.
//!
//! # Invariants
//! - Entries are immutable once added; lists are read-only after ingestion.
//! - `min_chapter_for` always returns the smallest offset-adjusted chapter
//!   among a headword's chapter-bearing entries.
//! - Distinct-headword order is first-seen entry order.

use crate::model::headword::Headword;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One ingested reference-list row.
///
/// The same headword may appear in several entries (a word reappearing in a
/// later chapter); chapterless entries still count as "referenced" but never
/// contribute to chapter computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub headword: Headword,
    /// Raw chapter as printed in the source, before the list offset.
    pub chapter: Option<u32>,
    /// Full source form the entry was derived from, passed through.
    pub source_form: String,
    /// Example sentences attached to the entry, passed through.
    pub examples: Vec<String>,
}

impl ReferenceEntry {
    pub fn new(headword: Headword, chapter: Option<u32>) -> Self {
        Self {
            headword,
            chapter,
            source_form: String::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_source_form(mut self, source_form: impl Into<String>) -> Self {
        self.source_form = source_form.into();
        self
    }

    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }
}

/// Named, ordered collection of reference entries plus the list-level
/// chapter offset and okay-set.
///
/// The offset is added to every raw chapter before comparison, so lists
/// that start numbering at 1 can be aligned onto one shared chapter axis.
#[derive(Debug, Clone)]
pub struct ReferenceList {
    name: String,
    chapter_offset: i64,
    entries: Vec<ReferenceEntry>,
    /// Distinct headwords in first-seen order; backs the missing report.
    first_seen: Vec<Headword>,
    members: HashSet<Headword>,
    min_raw_chapter: HashMap<Headword, u32>,
    okay_set: HashSet<Headword>,
}

impl ReferenceList {
    pub fn new(name: impl Into<String>, chapter_offset: i64) -> Self {
        Self {
            name: name.into(),
            chapter_offset,
            entries: Vec::new(),
            first_seen: Vec::new(),
            members: HashSet::new(),
            min_raw_chapter: HashMap::new(),
            okay_set: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chapter_offset(&self) -> i64 {
        self.chapter_offset
    }

    /// Stores one entry, keeping the smallest raw chapter per headword.
    pub fn add_entry(&mut self, entry: ReferenceEntry) {
        if self.members.insert(entry.headword.clone()) {
            self.first_seen.push(entry.headword.clone());
        }
        if let Some(raw) = entry.chapter {
            self.min_raw_chapter
                .entry(entry.headword.clone())
                .and_modify(|current| *current = (*current).min(raw))
                .or_insert(raw);
        }
        self.entries.push(entry);
    }

    /// Smallest offset-adjusted chapter for a headword, or `None` when the
    /// headword never appears with a chapter.
    pub fn min_chapter_for(&self, headword: &Headword) -> Option<i64> {
        self.min_raw_chapter
            .get(headword)
            .map(|raw| i64::from(*raw) + self.chapter_offset)
    }

    /// True when the headword appears with or without a chapter.
    pub fn contains(&self, headword: &Headword) -> bool {
        self.members.contains(headword)
    }

    /// Exempts a headword from the missing report.
    pub fn mark_okay(&mut self, headword: Headword) {
        self.okay_set.insert(headword);
    }

    pub fn is_okay(&self, headword: &Headword) -> bool {
        self.okay_set.contains(headword)
    }

    /// Distinct headwords in first-seen order.
    pub fn distinct_headwords(&self) -> &[Headword] {
        &self.first_seen
    }

    /// Number of distinct headwords, chapter-bearing or not.
    pub fn distinct_len(&self) -> usize {
        self.first_seen.len()
    }

    /// All stored entries in insertion order.
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Example sentences attached to a headword, across all its entries.
    pub fn examples_for(&self, headword: &Headword) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.headword == *headword)
            .flat_map(|entry| entry.examples.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferenceEntry, ReferenceList};
    use crate::model::headword::{Headword, HeadwordIndex};

    fn headword(raw: &str) -> Headword {
        HeadwordIndex::default()
            .canonicalize(raw)
            .expect("valid headword")
    }

    #[test]
    fn min_chapter_applies_offset_and_keeps_smallest() {
        let mut list = ReferenceList::new("LC", 5);
        list.add_entry(ReferenceEntry::new(headword("teuer"), Some(3)));
        list.add_entry(ReferenceEntry::new(headword("teuer"), Some(1)));

        assert_eq!(list.min_chapter_for(&headword("teuer")), Some(6));
    }

    #[test]
    fn chapterless_entries_count_as_referenced_only() {
        let mut list = ReferenceList::new("LA", 0);
        list.add_entry(ReferenceEntry::new(headword("sich freuen"), None));

        assert!(list.contains(&headword("sich freuen")));
        assert_eq!(list.min_chapter_for(&headword("sich freuen")), None);
    }

    #[test]
    fn negative_offset_shifts_chapters_down() {
        let mut list = ReferenceList::new("LB", -2);
        list.add_entry(ReferenceEntry::new(headword("acht"), Some(1)));

        assert_eq!(list.min_chapter_for(&headword("acht")), Some(-1));
    }

    #[test]
    fn distinct_headwords_keep_first_seen_order() {
        let mut list = ReferenceList::new("LA", 0);
        list.add_entry(ReferenceEntry::new(headword("acht"), Some(1)));
        list.add_entry(ReferenceEntry::new(headword("Italien"), Some(1)));
        list.add_entry(ReferenceEntry::new(headword("acht"), Some(4)));

        let order: Vec<_> = list
            .distinct_headwords()
            .iter()
            .map(Headword::as_str)
            .collect();
        assert_eq!(order, vec!["acht", "Italien"]);
        assert_eq!(list.distinct_len(), 2);
        // Entry storage keeps duplicates; only the distinct view collapses.
        assert_eq!(list.entries().len(), 3);
    }

    #[test]
    fn okay_set_membership_is_tracked() {
        let mut list = ReferenceList::new("LA", 0);
        list.add_entry(ReferenceEntry::new(headword("sechsundsechzig"), Some(1)));
        list.mark_okay(headword("sechsundsechzig"));

        assert!(list.is_okay(&headword("sechsundsechzig")));
        assert!(!list.is_okay(&headword("acht")));
    }

    #[test]
    fn examples_concatenate_across_entries() {
        let mut list = ReferenceList::new("LC", 0);
        list.add_entry(
            ReferenceEntry::new(headword("teuer"), Some(1))
                .with_examples(vec!["Das ist teuer.".to_string()]),
        );
        list.add_entry(
            ReferenceEntry::new(headword("teuer"), Some(3))
                .with_examples(vec!["Zu teuer!".to_string()]),
        );

        assert_eq!(
            list.examples_for(&headword("teuer")),
            vec!["Das ist teuer.", "Zu teuer!"]
        );
    }
}
