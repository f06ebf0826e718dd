//! End-to-end integration tests for the lexaurus workbench.
//!
//! These tests exercise the full save pipeline: validation, relation
//! classification against a loaded taxonomy, target resolution, reverse
//! synchronization, and persistence through the repository.

use std::sync::Arc;

use lexaurus::entry::{Entry, Relation, Sense};
use lexaurus::repo::{EntryRepository, MemoryLexicon, SaveOptions};
use lexaurus::taxonomy::{RangeValue, StaticRangeSource, LEXICAL_RELATION, VARIANT_TYPE};
use lexaurus::workbench::{Workbench, WorkbenchConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_ranges() -> StaticRangeSource {
    StaticRangeSource::new()
        .with_axis(
            LEXICAL_RELATION,
            vec![
                RangeValue::new("relacja").with_label("en", "relation"),
                RangeValue::new("synonym")
                    .with_parent("relacja")
                    .with_label("en", "synonym"),
                RangeValue::new("hiperonim")
                    .with_parent("relacja")
                    .with_label("en", "hypernym")
                    .with_reverse_label("en", "hyponym of"),
                RangeValue::new("hiponim")
                    .with_parent("relacja")
                    .with_label("en", "hyponym")
                    .with_reverse_label("en", "hypernym of"),
            ],
        )
        .with_axis(
            VARIANT_TYPE,
            vec![
                RangeValue::new("variant").with_label("en", "variant"),
                RangeValue::new("spelling").with_parent("variant"),
            ],
        )
}

fn test_workbench() -> (Arc<MemoryLexicon>, Workbench) {
    init_tracing();
    let lexicon = Arc::new(MemoryLexicon::new());
    let workbench = Workbench::new(
        WorkbenchConfig::default(),
        lexicon.clone(),
        Box::new(test_ranges()),
    )
    .unwrap();
    (lexicon, workbench)
}

#[test]
fn end_to_end_hypernym_save() {
    let (lexicon, workbench) = test_workbench();
    lexicon.insert(Entry::new("animal", "animal")).unwrap();

    // "dog" declares its hypernym; saving must mirror it onto "animal".
    let mut dog = Entry::new("dog", "dog").with_relation(Relation::new("hiperonim", "animal"));
    let report = workbench
        .save_entry(&mut dog, SaveOptions::default())
        .unwrap();
    assert_eq!(report.applied_count(), 1);
    assert!(report.is_clean());

    let animal = lexicon.entry("animal").unwrap();
    assert_eq!(animal.relations.len(), 1);
    assert!(animal.has_relation("hiponim", "dog"));

    // Saving again changes nothing on either side.
    let mut dog = lexicon.entry("dog").unwrap();
    let report = workbench
        .save_entry(&mut dog, SaveOptions::default())
        .unwrap();
    assert_eq!(report.applied_count(), 0);
    assert_eq!(lexicon.entry("animal").unwrap().relations.len(), 1);
    assert_eq!(lexicon.entry("dog").unwrap().relations.len(), 1);

    // And syncing the mirrored side does not bounce a third relation back.
    let mut animal = lexicon.entry("animal").unwrap();
    workbench
        .save_entry(&mut animal, SaveOptions::default())
        .unwrap();
    assert_eq!(lexicon.entry("dog").unwrap().relations.len(), 1);
}

#[test]
fn sense_reference_gains_reverse_on_that_sense() {
    let (lexicon, workbench) = test_workbench();
    lexicon
        .insert(
            Entry::new("bank", "bank")
                .with_sense(Sense::new("bank-s1").with_gloss("river edge"))
                .with_sense(Sense::new("bank-s2").with_gloss("institution")),
        )
        .unwrap();

    let mut inst = Entry::new("instytucja", "instytucja")
        .with_relation(Relation::new("synonym", "bank#bank-s2"));
    let report = workbench
        .save_entry(&mut inst, SaveOptions::default())
        .unwrap();
    assert_eq!(report.applied_count(), 1);

    let bank = lexicon.entry("bank").unwrap();
    assert!(bank.relations.is_empty());
    assert!(bank.sense("bank-s1").unwrap().relations.is_empty());
    assert!(bank
        .sense("bank-s2")
        .unwrap()
        .has_relation("synonym", "instytucja"));

    // no duplicate on a second pass
    let mut inst = lexicon.entry("instytucja").unwrap();
    workbench
        .save_entry(&mut inst, SaveOptions::default())
        .unwrap();
    assert_eq!(
        lexicon
            .entry("bank")
            .unwrap()
            .sense("bank-s2")
            .unwrap()
            .relations
            .len(),
        1
    );
}

#[test]
fn sense_level_relation_uses_composite_source_ref() {
    let (lexicon, workbench) = test_workbench();
    lexicon.insert(Entry::new("kot", "kot")).unwrap();

    let mut dog = Entry::new("pies", "pies").with_sense(
        Sense::new("pies-s1").with_relation(Relation::new("synonym", "kot")),
    );
    workbench
        .save_entry(&mut dog, SaveOptions::default())
        .unwrap();

    assert!(lexicon
        .entry("kot")
        .unwrap()
        .has_relation("synonym", "pies#pies-s1"));
}

#[test]
fn missing_target_never_fails_the_save() {
    let (lexicon, workbench) = test_workbench();
    lexicon.insert(Entry::new("kot", "kot")).unwrap();

    let mut dog = Entry::new("pies", "pies")
        .with_relation(Relation::new("synonym", "nie-ma-takiego"))
        .with_relation(Relation::new("synonym", "kot"));
    let report = workbench
        .save_entry(&mut dog, SaveOptions::default())
        .unwrap();

    // the save itself went through, with the broken relation reported
    assert!(lexicon.entry("pies").is_ok());
    assert_eq!(report.applied_count(), 1);
    assert_eq!(report.failures().count(), 1);
    assert!(lexicon.entry("kot").unwrap().has_relation("synonym", "pies"));
}

#[test]
fn component_lexeme_stays_one_way() {
    let (lexicon, workbench) = test_workbench();
    lexicon.insert(Entry::new("board", "board")).unwrap();

    let mut compound = Entry::new("blackboard", "blackboard")
        .with_relation(Relation::new("_component-lexeme", "board"));
    let report = workbench
        .save_entry(&mut compound, SaveOptions::default())
        .unwrap();

    assert_eq!(report.applied_count(), 0);
    assert!(report.is_clean());
    assert!(lexicon.entry("board").unwrap().relations.is_empty());
}

#[test]
fn batch_save_converges_mutual_relations() {
    let (lexicon, workbench) = test_workbench();
    lexicon.insert(Entry::new("auto", "auto")).unwrap();
    lexicon.insert(Entry::new("samochod", "samochód")).unwrap();

    let mut batch = vec![
        Entry::new("auto", "auto").with_relation(Relation::new("synonym", "samochod")),
        Entry::new("samochod", "samochód").with_relation(Relation::new("synonym", "auto")),
    ];
    let reports = workbench
        .save_entries(&mut batch, SaveOptions::default())
        .unwrap();
    assert_eq!(reports.len(), 2);

    // exactly one relation on each side, no ping-pong
    assert_eq!(lexicon.entry("auto").unwrap().relations.len(), 1);
    assert_eq!(lexicon.entry("samochod").unwrap().relations.len(), 1);
    assert!(lexicon
        .entry("auto")
        .unwrap()
        .has_relation("synonym", "samochod"));
    assert!(lexicon
        .entry("samochod")
        .unwrap()
        .has_relation("synonym", "auto"));
}

#[test]
fn legacy_sense_reference_heals_through_the_scan() {
    let (lexicon, workbench) = test_workbench();
    lexicon
        .insert(Entry::new("mysz", "mysz").with_sense(Sense::new("legacy-sense-41")))
        .unwrap();

    // a bare sense id with no separator and no gleanable entry prefix
    let mut dog = Entry::new("pies", "pies")
        .with_relation(Relation::new("synonym", "legacy-sense-41"));
    let report = workbench
        .save_entry(&mut dog, SaveOptions::default())
        .unwrap();

    assert_eq!(report.applied_count(), 1);
    let mysz = lexicon.entry("mysz").unwrap();
    assert!(mysz
        .sense("legacy-sense-41")
        .unwrap()
        .has_relation("synonym", "pies"));
}

#[test]
fn display_labels_resolve_against_loaded_axes() {
    let (_, workbench) = test_workbench();

    assert_eq!(workbench.relation_label("hiperonim"), "hypernym");
    // "spelling" has no label of its own and inherits from its parent
    assert_eq!(workbench.range_label(VARIANT_TYPE, "spelling"), "variant");
    // unknown ids come back unchanged
    assert_eq!(workbench.relation_label("zupelnie-nieznany"), "zupelnie-nieznany");

    let info = workbench.info();
    assert_eq!(info.axes, [LEXICAL_RELATION, VARIANT_TYPE]);
}

#[test]
fn validation_failures_reach_the_caller() {
    let (lexicon, workbench) = test_workbench();

    let mut bad = Entry::new("x#y", "broken");
    assert!(workbench.save_entry(&mut bad, SaveOptions::default()).is_err());
    assert_eq!(lexicon.entry_count(), 0);

    // skip_validation lets the write through for repair tooling
    workbench
        .save_entry(
            &mut bad,
            SaveOptions {
                skip_validation: true,
                skip_reverse_sync: true,
            },
        )
        .unwrap();
    assert_eq!(lexicon.entry_count(), 1);
}
