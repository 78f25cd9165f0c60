use lexrecon_core::{
    run, AudioInventory, AudioRecord, Headword, HeadwordIndex, Note, NoteSet, ReconciliationResult,
    ReferenceCatalog, ReferenceEntry, ReferenceList, RunConfig,
};

fn headword(raw: &str) -> Headword {
    HeadwordIndex::default()
        .canonicalize(raw)
        .expect("valid headword")
}

#[test]
fn result_serializes_with_expected_wire_fields() {
    let mut catalog = ReferenceCatalog::new();
    let mut la = ReferenceList::new("LA", 0);
    la.add_entry(ReferenceEntry::new(headword("acht"), Some(1)));
    la.add_entry(ReferenceEntry::new(headword("Italien"), Some(2)));
    catalog.add_list(la).expect("add LA");

    let mut inventory = AudioInventory::new();
    inventory.add_record(AudioRecord::new("De-acht.ogg", vec![headword("acht")]));

    let mut notes = NoteSet::new();
    notes
        .push(Note::new("n1", vec![headword("acht")]).with_chapter_hint(4))
        .expect("insert");

    let result = run(&catalog, &inventory, &notes, &RunConfig::default()).expect("run succeeds");
    let json = serde_json::to_value(&result).expect("serializable");

    assert_eq!(json["notes"][0]["note_id"], "n1");
    assert_eq!(json["notes"][0]["chapter"], 1);
    assert_eq!(json["notes"][0]["in_lists"][0], "LA");
    assert_eq!(json["missing"][0]["list"], "LA");
    assert_eq!(json["missing"][0]["headwords"][0], "Italien");
    assert_eq!(json["notes_without_audio"], serde_json::json!([]));
    assert_eq!(json["audio_without_match"], serde_json::json!([]));
    assert_eq!(json["frequency"]["rows"][0]["lists"][0], "LA");
    assert_eq!(json["frequency"]["rows"][0]["count"], 2);

    let decoded: ReconciliationResult = serde_json::from_value(json).expect("deserializable");
    assert_eq!(decoded, result);
}

#[test]
fn unassigned_chapter_serializes_as_null() {
    let catalog = ReferenceCatalog::new();
    let inventory = AudioInventory::new();
    let mut notes = NoteSet::new();
    notes
        .push(Note::new("n1", vec![headword("Wolkenkratzer")]))
        .expect("insert");

    let result = run(&catalog, &inventory, &notes, &RunConfig::default()).expect("run succeeds");
    let json = serde_json::to_value(&result).expect("serializable");
    assert_eq!(json["notes"][0]["chapter"], serde_json::Value::Null);
}
