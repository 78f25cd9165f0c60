//! Named collection of reference lists and the set queries over them.
//!
//! # Responsibility
//! - Own the run's reference lists in insertion order.
//! - Derive per-note chapter assignment as the global minimum across lists.
//! - Produce missing-from-notes reports and intersection frequencies.
//!
//! # Invariants
//! - List names are unique; insertion order is report order.
//! - Frequency counts are derived from one headword-to-lists membership
//!   mapping, never by rescanning source lists per query.

use crate::catalog::reference_list::ReferenceList;
use crate::model::headword::Headword;
use crate::model::note::{Note, NoteSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for catalog queries.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level ingestion and query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A list with this name is already in the catalog.
    DuplicateListName(String),
    /// A query referenced a list name not present in the catalog.
    UnknownList(String),
    /// An intersection query was given no lists.
    EmptySubset,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateListName(name) => {
                write!(f, "duplicate reference list name: `{name}`")
            }
            Self::UnknownList(name) => write!(f, "unknown reference list: `{name}`"),
            Self::EmptySubset => write!(f, "intersection query requires at least one list"),
        }
    }
}

impl Error for CatalogError {}

/// Policy for the missing-from-notes report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Report each list on its own; coverage in another list does not
    /// suppress a headword.
    #[default]
    PerList,
    /// Suppress headwords that appear in any other list of the catalog.
    SuppressCoveredElsewhere,
}

/// One row of the intersection-frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRow {
    /// List names of the subset, in catalog order.
    pub lists: Vec<String>,
    /// Distinct headwords present in every list of the subset.
    pub count: usize,
}

/// Intersection-frequency counts for every computed subset.
///
/// Rows are ordered by subset size, then by catalog position, so two runs
/// over the same inputs emit identical tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub rows: Vec<FrequencyRow>,
}

/// Ordered mapping from list name to reference list.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    lists: Vec<ReferenceList>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a list, rejecting duplicate names.
    ///
    /// # Errors
    /// - `CatalogError::DuplicateListName` when the name is taken.
    pub fn add_list(&mut self, list: ReferenceList) -> CatalogResult<()> {
        if self.index_of(list.name()).is_some() {
            return Err(CatalogError::DuplicateListName(list.name().to_string()));
        }
        self.lists.push(list);
        Ok(())
    }

    pub fn get(&self, name: &str) -> CatalogResult<&ReferenceList> {
        self.index_of(name)
            .map(|idx| &self.lists[idx])
            .ok_or_else(|| CatalogError::UnknownList(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> CatalogResult<&mut ReferenceList> {
        match self.index_of(name) {
            Some(idx) => Ok(&mut self.lists[idx]),
            None => Err(CatalogError::UnknownList(name.to_string())),
        }
    }

    /// List names in insertion (= report) order.
    pub fn list_names(&self) -> Vec<&str> {
        self.lists.iter().map(ReferenceList::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceList> {
        self.lists.iter()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Assigns the note's chapter: the global minimum of
    /// `min_chapter_for` over every (list, headword) pair.
    ///
    /// `None` means no list covers any of the note's headwords with a
    /// chapter; that is reported, not an error. The note's own chapter hint
    /// is merged by the reconciliation run, not here.
    pub fn assign_chapter(&self, note: &Note) -> Option<i64> {
        self.lists
            .iter()
            .flat_map(|list| {
                note.headwords
                    .iter()
                    .filter_map(|headword| list.min_chapter_for(headword))
            })
            .min()
    }

    /// Names of the lists containing at least one of the note's headwords,
    /// in catalog order.
    pub fn covering_lists(&self, note: &Note) -> Vec<&str> {
        self.lists
            .iter()
            .filter(|list| {
                note.headwords
                    .iter()
                    .any(|headword| list.contains(headword))
            })
            .map(ReferenceList::name)
            .collect()
    }

    /// Distinct headwords of the named list that have at least one entry,
    /// are not in its okay-set and appear in no note, in first-seen order.
    ///
    /// With `MissingPolicy::SuppressCoveredElsewhere`, headwords present in
    /// any other catalog list are also excluded.
    ///
    /// # Errors
    /// - `CatalogError::UnknownList` for a name not in the catalog.
    pub fn missing_report(
        &self,
        list_name: &str,
        notes: &NoteSet,
        policy: MissingPolicy,
    ) -> CatalogResult<Vec<Headword>> {
        let list = self.get(list_name)?;
        let note_headwords = notes.all_headwords();

        let missing = list
            .distinct_headwords()
            .iter()
            .filter(|headword| !list.is_okay(headword))
            .filter(|headword| !note_headwords.contains(headword))
            .filter(|headword| match policy {
                MissingPolicy::PerList => true,
                MissingPolicy::SuppressCoveredElsewhere => !self
                    .lists
                    .iter()
                    .any(|other| other.name() != list_name && other.contains(headword)),
            })
            .cloned()
            .collect();
        Ok(missing)
    }

    /// The headword-to-list-names mapping every frequency count derives
    /// from, built in one pass over all entries.
    pub fn membership_map(&self) -> BTreeMap<Headword, BTreeSet<String>> {
        let mut map: BTreeMap<Headword, BTreeSet<String>> = BTreeMap::new();
        for list in &self.lists {
            for headword in list.distinct_headwords() {
                map.entry(headword.clone())
                    .or_default()
                    .insert(list.name().to_string());
            }
        }
        map
    }

    /// Number of distinct headwords present in every named list.
    ///
    /// Symmetric in its arguments; a singleton equals the list's distinct
    /// size. Duplicated names are counted once.
    ///
    /// # Errors
    /// - `CatalogError::EmptySubset` when no names are given.
    /// - `CatalogError::UnknownList` for a name not in the catalog.
    pub fn intersection_frequency(&self, list_names: &[&str]) -> CatalogResult<usize> {
        let subset = self.resolve_subset(list_names)?;
        let memberships = self.membership_indices();
        Ok(Self::count_superset(&memberships, &subset))
    }

    /// Frequency counts for every non-empty subset of lists with at most
    /// `max_subset_size` members.
    ///
    /// Subsets beyond the limit are omitted, not computed and discarded.
    /// All counts derive from one membership pass.
    pub fn frequency_table(&self, max_subset_size: usize) -> FrequencyTable {
        let memberships = self.membership_indices();
        let limit = max_subset_size.min(self.lists.len());
        let mut rows = Vec::new();
        for size in 1..=limit {
            let mut subset = Vec::with_capacity(size);
            self.push_subset_rows(&memberships, size, 0, &mut subset, &mut rows);
        }
        FrequencyTable { rows }
    }

    fn push_subset_rows(
        &self,
        memberships: &[HashSet<usize>],
        size: usize,
        start: usize,
        subset: &mut Vec<usize>,
        rows: &mut Vec<FrequencyRow>,
    ) {
        if subset.len() == size {
            rows.push(FrequencyRow {
                lists: subset
                    .iter()
                    .map(|idx| self.lists[*idx].name().to_string())
                    .collect(),
                count: Self::count_superset(memberships, subset),
            });
            return;
        }
        for idx in start..self.lists.len() {
            subset.push(idx);
            self.push_subset_rows(memberships, size, idx + 1, subset, rows);
            subset.pop();
        }
    }

    /// One membership set per distinct headword, over list indices.
    fn membership_indices(&self) -> Vec<HashSet<usize>> {
        let mut by_headword: HashMap<&Headword, HashSet<usize>> = HashMap::new();
        for (idx, list) in self.lists.iter().enumerate() {
            for headword in list.distinct_headwords() {
                by_headword.entry(headword).or_default().insert(idx);
            }
        }
        by_headword.into_values().collect()
    }

    fn count_superset(memberships: &[HashSet<usize>], subset: &[usize]) -> usize {
        memberships
            .iter()
            .filter(|lists| subset.iter().all(|idx| lists.contains(idx)))
            .count()
    }

    fn resolve_subset(&self, list_names: &[&str]) -> CatalogResult<Vec<usize>> {
        if list_names.is_empty() {
            return Err(CatalogError::EmptySubset);
        }
        let mut subset = Vec::with_capacity(list_names.len());
        for name in list_names {
            let idx = self
                .index_of(name)
                .ok_or_else(|| CatalogError::UnknownList((*name).to_string()))?;
            if !subset.contains(&idx) {
                subset.push(idx);
            }
        }
        Ok(subset)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.lists.iter().position(|list| list.name() == name)
    }
}
