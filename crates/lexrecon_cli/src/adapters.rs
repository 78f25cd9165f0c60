//! Example adapters for the raw formats the engine's inputs come in.
//!
//! # Responsibility
//! - Turn source files and filenames into normalized engine records.
//! - Recover from malformed source lines by skipping them (with a warning);
//!   the engine itself never skips.
//!
//! Each reader matches one concrete format observed in real decks:
//! chapter-grouped textbook lists, tab-delimited spreadsheet exports, a
//! sentence-column export, single-column exception lists, and two audio
//! filename conventions. None of this is engine logic; a deck with other
//! formats brings its own adapters.

use lexrecon_core::{AudioRecord, Headword, HeadwordIndex, Note, NoteSet, ReferenceEntry};
use log::warn;
use std::io::{self, BufRead};
use std::path::Path;

const CHAPTER_HEADER_PREFIX: &str = "^Chapter ";

/// Filename convention of one audio directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingConvention {
    /// `DiB-Dnn_<headword>.<ext>`: the headword starts at byte 8 of the
    /// stem.
    DibPrefix,
    /// `De-<headword>.<ext>` with optional trailing numbering and
    /// underscores for spaces, the common Wiktionary convention.
    NumberedWiki,
}

/// Derives the headword portion of a reference-list line: the text before
/// the first comma or parenthesis, minus a leading definite article.
fn reference_headword_source(line: &str) -> &str {
    let cut = line
        .find([',', '('])
        .map_or(line, |position| &line[..position]);
    let cut = cut.trim();
    for article in ["der ", "die ", "das "] {
        if let Some(rest) = cut.strip_prefix(article) {
            return rest.trim();
        }
    }
    cut
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Reads a chapter-grouped list: `^Chapter n` lines open the section for
/// chapter `n`, every following line is one entry of that chapter.
///
/// Lines before the first header yield chapterless entries. Comment (`#`)
/// and blank lines are skipped, as are lines whose headword cannot be
/// normalized.
pub fn read_chapter_grouped<R: BufRead>(
    reader: R,
    index: &HeadwordIndex,
) -> io::Result<Vec<ReferenceEntry>> {
    let mut chapter: Option<u32> = None;
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if is_skippable(line) {
            continue;
        }
        if let Some(rest) = line.strip_prefix(CHAPTER_HEADER_PREFIX) {
            match rest.trim().parse::<u32>() {
                Ok(number) => chapter = Some(number),
                Err(_) => {
                    warn!(
                        "event=adapter_skip module=cli status=ok reason=bad_chapter_header line={line}"
                    );
                }
            }
            continue;
        }
        match index.canonicalize(reference_headword_source(line)) {
            Ok(headword) => {
                entries.push(ReferenceEntry::new(headword, chapter).with_source_form(line));
            }
            Err(err) => {
                warn!("event=adapter_skip module=cli status=ok reason={err} line={line}");
            }
        }
    }
    Ok(entries)
}

/// Reads a tab-delimited list: `word<TAB>chapter/section` rows, where the
/// chapter is the integer before the slash.
pub fn read_tab_delimited<R: BufRead>(
    reader: R,
    index: &HeadwordIndex,
) -> io::Result<Vec<ReferenceEntry>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if is_skippable(line) {
            continue;
        }
        let mut columns = line.split('\t');
        let word = columns.next().unwrap_or_default();
        let chapter = columns
            .next()
            .and_then(|cell| cell.split('/').next())
            .and_then(|cell| cell.trim().parse::<u32>().ok());
        match index.canonicalize(reference_headword_source(word)) {
            Ok(headword) => {
                entries.push(ReferenceEntry::new(headword, chapter).with_source_form(word));
            }
            Err(err) => {
                warn!("event=adapter_skip module=cli status=ok reason={err} line={line}");
            }
        }
    }
    Ok(entries)
}

/// Reads a sentence-column export: a header row, then
/// `base<TAB>full<TAB>chapter<TAB>sentence...` rows. Non-empty trailing
/// cells become example sentences; an empty chapter cell yields a
/// chapterless entry.
pub fn read_sentence_table<R: BufRead>(
    reader: R,
    index: &HeadwordIndex,
) -> io::Result<Vec<ReferenceEntry>> {
    let mut entries = Vec::new();
    let mut lines = reader.lines();
    // Header row with column names.
    if let Some(header) = lines.next() {
        header?;
    }
    for line in lines {
        let line = line?;
        if is_skippable(line.trim()) {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        let base = columns.first().copied().unwrap_or_default();
        let full = columns.get(1).copied().unwrap_or_default();
        let chapter = columns
            .get(2)
            .and_then(|cell| cell.trim().parse::<u32>().ok());
        let examples: Vec<String> = columns
            .iter()
            .skip(3)
            .filter(|cell| !cell.trim().is_empty())
            .map(|cell| cell.trim().to_string())
            .collect();
        match index.canonicalize(reference_headword_source(base)) {
            Ok(headword) => {
                entries.push(
                    ReferenceEntry::new(headword, chapter)
                        .with_source_form(full)
                        .with_examples(examples),
                );
            }
            Err(err) => {
                warn!("event=adapter_skip module=cli status=ok reason={err} line={line}");
            }
        }
    }
    Ok(entries)
}

/// Reads the first tab-delimited column of each line into headwords, for
/// okay-lists and the known-no-audio list.
pub fn read_word_column<R: BufRead>(
    reader: R,
    index: &HeadwordIndex,
    skip_header: bool,
) -> io::Result<Vec<Headword>> {
    let mut words = Vec::new();
    let mut lines = reader.lines();
    if skip_header {
        if let Some(header) = lines.next() {
            header?;
        }
    }
    for line in lines {
        let line = line?;
        let line = line.trim();
        if is_skippable(line) {
            continue;
        }
        let word = line.split('\t').next().unwrap_or_default();
        match index.canonicalize(reference_headword_source(word)) {
            Ok(headword) => words.push(headword),
            Err(err) => {
                warn!("event=adapter_skip module=cli status=ok reason={err} line={line}");
            }
        }
    }
    Ok(words)
}

/// Reads the notes export: a header row naming the columns, then one
/// tab-delimited row per note with `note_id`, a comma-delimited headword
/// cell and an optional chapter cell. Any further columns are carried as
/// opaque metadata under their header names.
///
/// Duplicate note ids are not an adapter concern; they surface as the
/// engine's ingestion error.
pub fn read_notes<R: BufRead>(
    reader: R,
    index: &HeadwordIndex,
) -> Result<NoteSet, Box<dyn std::error::Error>> {
    let mut notes = NoteSet::new();
    let mut lines = reader.lines();
    let header: Vec<String> = match lines.next() {
        Some(line) => line?.split('\t').map(str::to_string).collect(),
        None => return Ok(notes),
    };
    for line in lines {
        let line = line?;
        if is_skippable(line.trim()) {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        let id = columns.first().copied().unwrap_or_default().trim();
        if id.is_empty() {
            warn!("event=adapter_skip module=cli status=ok reason=missing_note_id line={line}");
            continue;
        }
        let mut headwords = Vec::new();
        for token in columns.get(1).copied().unwrap_or_default().split(',') {
            match index.canonicalize(token) {
                Ok(headword) => headwords.push(headword),
                Err(err) => {
                    warn!("event=adapter_skip module=cli status=ok reason={err} note_id={id}");
                }
            }
        }
        if headwords.is_empty() {
            warn!("event=adapter_skip module=cli status=ok reason=no_headwords note_id={id}");
            continue;
        }
        let mut note = Note::new(id, headwords);
        if let Some(chapter) = columns
            .get(2)
            .and_then(|cell| cell.trim().parse::<u32>().ok())
        {
            note = note.with_chapter_hint(chapter);
        }
        for (name, value) in header.iter().skip(3).zip(columns.iter().skip(3)) {
            note.metadata.insert(name.clone(), (*value).to_string());
        }
        notes.push(note)?;
    }
    Ok(notes)
}

/// Derives the candidate headword from an audio file stem per convention.
pub fn stem_headword(
    stem: &str,
    convention: NamingConvention,
    index: &HeadwordIndex,
) -> Option<Headword> {
    let raw = match convention {
        NamingConvention::DibPrefix => stem.get(8..)?.to_string(),
        NamingConvention::NumberedWiki => stem
            .get(3..)?
            .chars()
            .filter(|ch| !ch.is_ascii_digit())
            .map(|ch| if ch == '_' { ' ' } else { ch })
            .collect(),
    };
    index.canonicalize(&raw).ok()
}

/// Scans one audio directory, turning every file with the given extension
/// into an `AudioRecord` named by the directory's convention.
pub fn scan_audio_dir(
    dir: &Path,
    extension: &str,
    convention: NamingConvention,
    index: &HeadwordIndex,
) -> io::Result<Vec<AudioRecord>> {
    let mut records = Vec::new();
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    // Directory order is filesystem-dependent.
    paths.sort();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        match stem_headword(stem, convention, index) {
            Some(headword) => {
                records.push(AudioRecord::new(file_name, vec![headword]));
            }
            None => {
                warn!("event=adapter_skip module=cli status=ok reason=unnameable_stem stem={stem}");
            }
        }
    }
    Ok(records)
}
