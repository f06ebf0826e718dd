//! # lexaurus
//!
//! Taxonomy resolution and bidirectional relation consistency for a
//! lexicography workbench: when an entry declares "A is a synonym of B",
//! entry B transparently gains the reverse relation back to A, without
//! duplication, without re-entry, and while tolerating missing targets.
//!
//! ## Architecture
//!
//! - **Data model** (`entry`): entries, senses, and relations with `entry#sense` references
//! - **Taxonomy** (`taxonomy`): range axes as validated trees with label/abbreviation inheritance
//! - **Classification** (`classify`): relation direction and reverse kind, taxonomy-first with a curated pair table fallback
//! - **Location** (`locate`): reference resolution with a GUID-suffix heuristic and a bounded fallback scan
//! - **Synchronization** (`sync`): idempotent reverse-relation maintenance with per-relation reporting
//! - **Facade** (`workbench`): the save pipeline and taxonomy reload in one place
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lexaurus::entry::{Entry, Relation};
//! use lexaurus::repo::{MemoryLexicon, SaveOptions};
//! use lexaurus::taxonomy::{RangeValue, StaticRangeSource, LEXICAL_RELATION};
//! use lexaurus::workbench::{Workbench, WorkbenchConfig};
//!
//! let ranges = StaticRangeSource::new().with_axis(
//!     LEXICAL_RELATION,
//!     vec![RangeValue::new("hiperonim").with_reverse_label("en", "hyponym of")],
//! );
//! let lexicon = Arc::new(MemoryLexicon::new());
//! lexicon.insert(Entry::new("animal", "animal")).unwrap();
//!
//! let workbench =
//!     Workbench::new(WorkbenchConfig::default(), lexicon.clone(), Box::new(ranges)).unwrap();
//! let mut dog = Entry::new("dog", "dog").with_relation(Relation::new("hiperonim", "animal"));
//! let report = workbench.save_entry(&mut dog, SaveOptions::default()).unwrap();
//! assert_eq!(report.applied_count(), 1);
//! ```

pub mod classify;
pub mod entry;
pub mod error;
pub mod locate;
pub mod repo;
pub mod sync;
pub mod taxonomy;
pub mod workbench;
