//! Command-line wiring for one reconciliation pass.
//!
//! # Responsibility
//! - Load a data directory through the example adapters.
//! - Run the engine once and print every report.
//!
//! Reads the directory named by `LEXRECON_DATA`; without it, a small
//! built-in dataset keeps the output deterministic for quick sanity
//! checks. `LEXRECON_LOG_DIR` optionally enables file logging.

mod adapters;

use adapters::NamingConvention;
use lexrecon_core::{
    default_log_level, init_logging, run, AudioInventory, HeadwordIndex, NoteSet,
    ReconciliationResult, ReferenceCatalog, ReferenceEntry, ReferenceList, RunConfig,
};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn main() {
    if let Err(err) = try_main() {
        eprintln!("lexrecon: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    if let Ok(dir) = std::env::var("LEXRECON_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &dir) {
            eprintln!("lexrecon: logging disabled: {err}");
        }
    }

    let index = HeadwordIndex::default();
    let (catalog, inventory, notes) = match std::env::var("LEXRECON_DATA") {
        Ok(dir) => load_data(Path::new(&dir), &index)?,
        Err(_) => demo_data(&index)?,
    };

    println!("lexrecon core {}", lexrecon_core::core_version());
    let result = run(&catalog, &inventory, &notes, &RunConfig::default())?;
    print_result(&result);
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, Box<dyn Error>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| format!("cannot open `{}`: {err}", path.display()).into())
}

type ListReader = fn(BufReader<File>, &HeadwordIndex) -> std::io::Result<Vec<ReferenceEntry>>;

fn load_data(
    dir: &Path,
    index: &HeadwordIndex,
) -> Result<(ReferenceCatalog, AudioInventory, NoteSet), Box<dyn Error>> {
    let mut catalog = ReferenceCatalog::new();

    let readers: [(&str, i64, ListReader); 3] = [
        ("LA", 0, |reader, index| {
            adapters::read_chapter_grouped(reader, index)
        }),
        ("LB", 3, |reader, index| {
            adapters::read_tab_delimited(reader, index)
        }),
        ("LC", 5, |reader, index| {
            adapters::read_sentence_table(reader, index)
        }),
    ];
    for (name, offset, read) in readers {
        let mut list = ReferenceList::new(name, offset);
        for entry in read(open(&dir.join(format!("reflist_{name}.txt")))?, index)? {
            list.add_entry(entry);
        }
        catalog.add_list(list)?;

        let okay_path = dir.join(format!("okaylist_{name}.txt"));
        if okay_path.exists() {
            let list = catalog.get_mut(name)?;
            for word in adapters::read_word_column(open(&okay_path)?, index, false)? {
                list.mark_okay(word);
            }
        }
    }

    let mut inventory = AudioInventory::new();
    let dib_dir = dir.join("audio").join("DiB");
    if dib_dir.is_dir() {
        for record in
            adapters::scan_audio_dir(&dib_dir, "mp3", NamingConvention::DibPrefix, index)?
        {
            inventory.add_record(record);
        }
    }
    let wiki_dir = dir.join("audio").join("numbered_ogg");
    if wiki_dir.is_dir() {
        for record in
            adapters::scan_audio_dir(&wiki_dir, "ogg", NamingConvention::NumberedWiki, index)?
        {
            inventory.add_record(record);
        }
    }
    let known_path = dir.join("known_no_audio.txt");
    if known_path.exists() {
        for word in adapters::read_word_column(open(&known_path)?, index, true)? {
            inventory.mark_known_no_audio(word);
        }
    }

    let notes = adapters::read_notes(open(&dir.join("input_notes.txt"))?, index)?;
    Ok((catalog, inventory, notes))
}

/// Deterministic built-in dataset, fed through the same adapters as real
/// files.
fn demo_data(
    index: &HeadwordIndex,
) -> Result<(ReferenceCatalog, AudioInventory, NoteSet), Box<dyn Error>> {
    const LA: &str = "^Chapter 1\nacht\nItalien\nsechsundsechzig\n^Chapter 2\nteuer\n";
    const LB: &str = "der Zug\t1/A\nteuer\t2/B\n";
    const NOTES: &str = "note_id\theadwords\tchapter\n\
                         DEMO_1\tacht\t\n\
                         DEMO_2\tteuer\t1\n\
                         DEMO_3\tProfessorin\t\n";

    let mut catalog = ReferenceCatalog::new();
    let mut la = ReferenceList::new("LA", 0);
    for entry in adapters::read_chapter_grouped(LA.as_bytes(), index)? {
        la.add_entry(entry);
    }
    la.mark_okay(index.canonicalize("sechsundsechzig")?);
    catalog.add_list(la)?;

    let mut lb = ReferenceList::new("LB", 3);
    for entry in adapters::read_tab_delimited(LB.as_bytes(), index)? {
        lb.add_entry(entry);
    }
    catalog.add_list(lb)?;

    let mut inventory = AudioInventory::new();
    for stem in ["De-acht", "De-Zug"] {
        if let Some(headword) = adapters::stem_headword(stem, NamingConvention::NumberedWiki, index)
        {
            inventory.add_record(lexrecon_core::AudioRecord::new(
                format!("{stem}.ogg"),
                vec![headword],
            ));
        }
    }
    inventory.mark_known_no_audio(index.canonicalize("Professorin")?);

    let notes = adapters::read_notes(NOTES.as_bytes(), index)?;
    Ok((catalog, inventory, notes))
}

fn print_result(result: &ReconciliationResult) {
    println!("== chapter assignment ==");
    for note in &result.notes {
        let chapter = note
            .chapter
            .map_or_else(|| "-".to_string(), |chapter| chapter.to_string());
        let lists = if note.in_lists.is_empty() {
            "-".to_string()
        } else {
            note.in_lists.join("+")
        };
        println!("{}\t{}\t{}", note.note_id, chapter, lists);
    }

    for report in &result.missing {
        println!(
            "== missing from notes: {} ({}) ==",
            report.list,
            report.headwords.len()
        );
        for headword in &report.headwords {
            println!("{headword}");
        }
    }

    println!(
        "== notes without audio ({}) ==",
        result.notes_without_audio.len()
    );
    for id in &result.notes_without_audio {
        println!("{id}");
    }

    println!(
        "== audio without note ({}) ==",
        result.audio_without_match.len()
    );
    for file_id in &result.audio_without_match {
        println!("{file_id}");
    }

    println!("== list overlap ==");
    for row in &result.frequency.rows {
        println!("{}\t{}", row.lists.join("+"), row.count);
    }
}
