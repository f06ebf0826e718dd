//! Workbench facade: taxonomy snapshots and the entry save pipeline.
//!
//! The `Workbench` owns the loaded range taxonomies and the repository
//! handle, and wires the classifier, locator, and synchronizer together for
//! each save. Saving an entry validates it, mirrors its bidirectional
//! relations onto their targets, persists it, and returns the sync report.

use std::sync::{Arc, RwLock};

use crate::classify::RelationClassifier;
use crate::entry::Entry;
use crate::error::LexResult;
use crate::locate::SenseLocator;
use crate::repo::{EntryRepository, SaveOptions};
use crate::sync::{ReverseSynchronizer, SyncContext, SyncReport};
use crate::taxonomy::{RangeSource, RangeTree, TaxonomyStore, LEXICAL_RELATION, VARIANT_TYPE};

/// Configuration for a lexaurus workbench.
#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    /// Range axes to load from the source.
    pub axes: Vec<String>,
    /// Ceiling for the sense locator's fallback scan.
    pub max_scan_entries: usize,
    /// Locale used by the display helpers.
    pub display_locale: String,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            axes: vec![LEXICAL_RELATION.to_string(), VARIANT_TYPE.to_string()],
            max_scan_entries: 10_000,
            display_locale: "en".into(),
        }
    }
}

/// Summary of the workbench state.
#[derive(Debug, Clone)]
pub struct WorkbenchInfo {
    pub axes: Vec<String>,
    pub entry_count: usize,
    pub display_locale: String,
}

/// The lexicography workbench core.
///
/// Holds the current taxonomy snapshot behind a lock; reads clone the `Arc`
/// so lookups keep a consistent view while a reload swaps in a new snapshot.
pub struct Workbench {
    config: WorkbenchConfig,
    repo: Arc<dyn EntryRepository>,
    ranges: RwLock<Arc<TaxonomyStore>>,
    source: Box<dyn RangeSource>,
}

impl Workbench {
    /// Create a workbench, loading the configured axes from the source.
    ///
    /// A missing axis is tolerated (the classifier falls back to its pair
    /// table); a malformed one fails construction.
    pub fn new(
        config: WorkbenchConfig,
        repo: Arc<dyn EntryRepository>,
        source: Box<dyn RangeSource>,
    ) -> LexResult<Self> {
        let store = Arc::new(TaxonomyStore::load(source.as_ref(), &config.axes)?);
        tracing::info!(
            axes = store.len(),
            entries = repo.entry_count(),
            locale = %config.display_locale,
            "initializing lexaurus workbench"
        );
        Ok(Self {
            config,
            repo,
            ranges: RwLock::new(store),
            source,
        })
    }

    /// The current taxonomy snapshot.
    pub fn ranges(&self) -> Arc<TaxonomyStore> {
        self.ranges.read().expect("range store lock poisoned").clone()
    }

    /// Rebuild the taxonomy from the range source and swap it in, returning
    /// the new snapshot. Lookups already holding the old snapshot finish
    /// against it.
    pub fn reload_ranges(&self) -> LexResult<Arc<TaxonomyStore>> {
        let store = Arc::new(TaxonomyStore::load(self.source.as_ref(), &self.config.axes)?);
        *self.ranges.write().expect("range store lock poisoned") = store.clone();
        tracing::info!(axes = store.len(), "range taxonomies reloaded");
        Ok(store)
    }

    /// Validate, synchronize, and persist one entry.
    ///
    /// Reverse-relation maintenance is best effort: failures for individual
    /// relations are reported, never raised, and the entry's own save goes
    /// through regardless.
    pub fn save_entry(&self, entry: &mut Entry, options: SaveOptions) -> LexResult<SyncReport> {
        let sync = (!options.skip_reverse_sync).then(|| self.synchronizer());
        let mut ctx = SyncContext::new();
        self.save_with(entry, options, sync.as_ref(), &mut ctx)
    }

    /// Save a batch of entries through one synchronization context, so
    /// relation chains across the batch are each handled exactly once.
    pub fn save_entries(
        &self,
        entries: &mut [Entry],
        options: SaveOptions,
    ) -> LexResult<Vec<SyncReport>> {
        let sync = (!options.skip_reverse_sync).then(|| self.synchronizer());
        let mut ctx = SyncContext::new();
        let mut reports = Vec::with_capacity(entries.len());
        for entry in entries.iter_mut() {
            reports.push(self.save_with(entry, options, sync.as_ref(), &mut ctx)?);
        }
        Ok(reports)
    }

    fn save_with(
        &self,
        entry: &mut Entry,
        options: SaveOptions,
        sync: Option<&ReverseSynchronizer>,
        ctx: &mut SyncContext,
    ) -> LexResult<SyncReport> {
        if !options.skip_validation {
            entry.validate()?;
        }
        let report = match sync {
            Some(sync) => sync.run(entry, ctx),
            None => SyncReport::default(),
        };
        self.repo.save(entry, options)?;

        if report.is_clean() {
            tracing::debug!(
                entry = %entry.id,
                applied = report.applied_count(),
                "entry saved"
            );
        } else {
            tracing::warn!(
                entry = %entry.id,
                failures = report.failures().count(),
                "entry saved with unsynchronized relations"
            );
        }
        Ok(report)
    }

    /// Fetch an entry by id.
    pub fn entry(&self, id: &str) -> LexResult<Entry> {
        Ok(self.repo.entry(id)?)
    }

    /// Effective label of a range value in the configured display locale.
    pub fn range_label(&self, axis: &str, id: &str) -> String {
        match self.ranges().tree(axis) {
            Some(tree) => tree.effective_label(id, &self.config.display_locale),
            None => id.to_string(),
        }
    }

    /// Effective abbreviation of a range value in the configured display
    /// locale.
    pub fn range_abbreviation(&self, axis: &str, id: &str) -> String {
        match self.ranges().tree(axis) {
            Some(tree) => tree.effective_abbreviation(id, &self.config.display_locale),
            None => id.to_string(),
        }
    }

    /// Display label for a relation kind.
    ///
    /// Relation kinds may come from any configured axis (semantic relations
    /// from "lexical-relation", variant links from "variant-type"), so the
    /// axes are tried in configuration order; the raw kind is the last
    /// resort.
    pub fn relation_label(&self, kind: &str) -> String {
        self.resolve_kind(kind, RangeTree::effective_label)
    }

    /// Display abbreviation for a relation kind, with the same axis fallback
    /// as [`relation_label`](Self::relation_label).
    pub fn relation_abbreviation(&self, kind: &str) -> String {
        self.resolve_kind(kind, RangeTree::effective_abbreviation)
    }

    fn resolve_kind(&self, kind: &str, text: fn(&RangeTree, &str, &str) -> String) -> String {
        let ranges = self.ranges();
        for axis in &self.config.axes {
            if let Some(tree) = ranges.tree(axis) {
                if tree.contains(kind) {
                    return text(tree, kind, &self.config.display_locale);
                }
            }
        }
        kind.to_string()
    }

    /// The workbench configuration.
    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    /// Summary of loaded axes and stored entries.
    pub fn info(&self) -> WorkbenchInfo {
        let ranges = self.ranges();
        WorkbenchInfo {
            axes: ranges.axes().iter().map(|axis| axis.to_string()).collect(),
            entry_count: self.repo.entry_count(),
            display_locale: self.config.display_locale.clone(),
        }
    }

    fn synchronizer(&self) -> ReverseSynchronizer {
        ReverseSynchronizer::new(
            RelationClassifier::new(self.ranges()),
            SenseLocator::new(self.repo.clone(), self.config.max_scan_entries),
            self.repo.clone(),
        )
    }
}
