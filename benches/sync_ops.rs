//! Benchmarks for relation synchronization and taxonomy lookups.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lexaurus::classify::RelationClassifier;
use lexaurus::entry::{Entry, Relation, Sense};
use lexaurus::locate::SenseLocator;
use lexaurus::repo::MemoryLexicon;
use lexaurus::sync::{ReverseSynchronizer, SyncContext};
use lexaurus::taxonomy::{RangeTree, RangeValue, TaxonomyStore};

fn populated_lexicon(entries: usize) -> Arc<MemoryLexicon> {
    let lexicon = Arc::new(MemoryLexicon::new());
    for i in 0..entries {
        let id = format!("entry-{i:04}");
        let sense = Sense::new(format!("entry-{i:04}-s1"));
        lexicon.insert(Entry::new(&id, &id).with_sense(sense)).unwrap();
    }
    lexicon
}

fn synchronizer(lexicon: Arc<MemoryLexicon>) -> ReverseSynchronizer {
    ReverseSynchronizer::new(
        RelationClassifier::new(Arc::new(TaxonomyStore::empty())),
        SenseLocator::new(lexicon.clone(), 10_000),
        lexicon,
    )
}

fn bench_reverse_sync(c: &mut Criterion) {
    let lexicon = populated_lexicon(1_000);
    let sync = synchronizer(lexicon.clone());

    let mut source = Entry::new("src", "src");
    for i in 0..100 {
        source = source.with_relation(Relation::new("synonym", format!("entry-{i:04}")));
    }
    // first run applies the reverses; measured runs hit the idempotence check
    sync.run(&mut source, &mut SyncContext::new());

    c.bench_function("sync_idempotent_100rel", |bench| {
        bench.iter(|| {
            let mut ctx = SyncContext::new();
            black_box(sync.run(&mut source, &mut ctx))
        })
    });
}

fn bench_effective_label(c: &mut Criterion) {
    let mut values = vec![RangeValue::new("n000").with_label("en", "root label")];
    for i in 1..64 {
        values.push(RangeValue::new(format!("n{i:03}")).with_parent(format!("n{:03}", i - 1)));
    }
    let tree = RangeTree::build("lexical-relation", values).unwrap();

    c.bench_function("label_inheritance_64deep", |bench| {
        bench.iter(|| black_box(tree.effective_label("n063", "en")))
    });
}

fn bench_fallback_scan(c: &mut Criterion) {
    let lexicon = populated_lexicon(1_000);
    let locator = SenseLocator::new(lexicon, 10_000);

    // a bare sense id held by the last entry in scan order
    c.bench_function("locate_scan_1k", |bench| {
        bench.iter(|| black_box(locator.resolve("entry-0999-s1").unwrap()))
    });
}

criterion_group!(benches, bench_reverse_sync, bench_effective_label, bench_fallback_scan);
criterion_main!(benches);
