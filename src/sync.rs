//! Reverse-relation synchronization across entries.
//!
//! When an entry is saved, every bidirectional relation it declares must have
//! a matching reverse relation on its target. The synchronizer walks the
//! entry's relations (entry-level and per-sense), classifies each, resolves
//! the target, and appends the reverse where it is missing. Each relation is
//! handled in isolation: an unresolvable target or a failed target write is
//! recorded and the run continues, because partial consistency beats none in
//! a curation tool. Nothing here ever blocks or rolls back the source entry's
//! own save.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::classify::RelationClassifier;
use crate::entry::{compose_ref, Entry, Relation, REF_SEPARATOR};
use crate::error::LocateError;
use crate::locate::{Located, SenseLocator};
use crate::repo::{EntryRepository, SaveOptions};

// ---------------------------------------------------------------------------
// Run context and report
// ---------------------------------------------------------------------------

/// Tracks `(source ref, kind, target ref)` triples already handled, so a
/// relation is processed at most once per context.
///
/// A context normally lives for one save; sharing one across a batch of
/// saves extends the guarantee to relation chains spanning several entries,
/// which is what makes re-entry impossible no matter how entries link back
/// to each other.
#[derive(Debug, Default)]
pub struct SyncContext {
    visited: HashSet<(String, String, String)>,
}

impl SyncContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of relation triples recorded so far.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Record a triple; `false` when it was already present.
    fn enter(&mut self, source_ref: &str, kind: &str, target: &str) -> bool {
        self.visited.insert((
            source_ref.to_string(),
            kind.to_string(),
            target.to_string(),
        ))
    }

    fn mark(&mut self, source_ref: &str, kind: &str, target: &str) {
        self.enter(source_ref, kind, target);
    }
}

/// A reverse relation the synchronizer wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedReverse {
    /// Entry that received the reverse relation.
    pub target_entry: String,
    /// Sense within the target it was attached to, if the reference named one.
    pub target_sense: Option<String>,
    /// Kind of the written reverse relation.
    pub kind: String,
    /// Reference back to the source entry or sense.
    pub source_ref: String,
}

/// A relation the synchronizer did not mirror, and why.
#[derive(Debug, Clone)]
pub struct SkippedRelation {
    pub relation: Relation,
    pub source_ref: String,
    pub reason: SkipReason,
}

/// Why a relation produced no reverse write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The kind is in the fixed unidirectional set.
    Unidirectional,
    /// The context already handled this triple.
    AlreadyProcessed,
    /// The target already carries the reverse relation.
    AlreadyConsistent,
    /// The target reference resolved to nothing.
    TargetNotFound { detail: String },
    /// The target reference matched several entries.
    AmbiguousTarget { detail: String },
    /// The target was mutated but its save failed.
    PersistFailed { detail: String },
}

impl SkipReason {
    /// Whether this skip is a failure, as opposed to an expected no-op.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SkipReason::TargetNotFound { .. }
                | SkipReason::AmbiguousTarget { .. }
                | SkipReason::PersistFailed { .. }
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unidirectional => write!(f, "relation kind is unidirectional"),
            SkipReason::AlreadyProcessed => write!(f, "already handled in this run"),
            SkipReason::AlreadyConsistent => write!(f, "reverse relation already present"),
            SkipReason::TargetNotFound { detail } => {
                write!(f, "target could not be resolved: {detail}")
            }
            SkipReason::AmbiguousTarget { detail } => write!(f, "target is ambiguous: {detail}"),
            SkipReason::PersistFailed { detail } => {
                write!(f, "failed to persist target: {detail}")
            }
        }
    }
}

/// Outcome of one synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Reverse relations written (or staged on the source for self references).
    pub applied: Vec<AppliedReverse>,
    /// Relations that produced no write, with reasons.
    pub skipped: Vec<SkippedRelation>,
}

impl SyncReport {
    /// Number of reverse relations written.
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// Skips that represent failures rather than expected no-ops.
    pub fn failures(&self) -> impl Iterator<Item = &SkippedRelation> {
        self.skipped.iter().filter(|s| s.reason.is_failure())
    }

    /// Whether the run finished without failures.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// One relation to mirror: the relation itself plus the reference the reverse
/// will point back to (`entry` or `entry#sense`).
struct SyncJob {
    relation: Relation,
    source_ref: String,
}

/// Maintains reverse relations for the bidirectional relations of an entry.
pub struct ReverseSynchronizer {
    classifier: RelationClassifier,
    locator: SenseLocator,
    repo: Arc<dyn EntryRepository>,
}

impl ReverseSynchronizer {
    /// Create a synchronizer over one taxonomy snapshot and repository.
    pub fn new(
        classifier: RelationClassifier,
        locator: SenseLocator,
        repo: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            classifier,
            locator,
            repo,
        }
    }

    /// Mirror every bidirectional relation of `entry` onto its target.
    ///
    /// Targets are fetched, mutated, and saved back with
    /// [`SaveOptions::reverse_write`]. A target that turns out to be the
    /// source entry itself is mutated in place instead and left for the
    /// caller's own save. The run never fails as a whole; per-relation
    /// problems are logged and collected in the report.
    pub fn run(&self, entry: &mut Entry, ctx: &mut SyncContext) -> SyncReport {
        let jobs = collect_jobs(entry);
        tracing::debug!(
            entry = %entry.id,
            relations = jobs.len(),
            "reverse synchronization started"
        );

        let mut report = SyncReport::default();
        for job in jobs {
            match self.apply_one(entry, &job, ctx) {
                Ok(applied) => report.applied.push(applied),
                Err(reason) => {
                    if reason.is_failure() {
                        tracing::warn!(
                            entry = %entry.id,
                            relation = %job.relation,
                            reason = %reason,
                            "reverse sync skipped a relation, continuing"
                        );
                    }
                    report.skipped.push(SkippedRelation {
                        relation: job.relation,
                        source_ref: job.source_ref,
                        reason,
                    });
                }
            }
        }

        tracing::debug!(
            entry = %entry.id,
            applied = report.applied_count(),
            skipped = report.skipped.len(),
            "reverse synchronization finished"
        );
        report
    }

    fn apply_one(
        &self,
        source: &mut Entry,
        job: &SyncJob,
        ctx: &mut SyncContext,
    ) -> Result<AppliedReverse, SkipReason> {
        let relation = &job.relation;
        if !self.classifier.is_bidirectional(&relation.kind) {
            return Err(SkipReason::Unidirectional);
        }
        if !ctx.enter(&job.source_ref, &relation.kind, &relation.target) {
            return Err(SkipReason::AlreadyProcessed);
        }
        let reverse_kind = self.classifier.reverse_kind(&relation.kind);

        let (target_entry_id, target_sense_id) = match relation.target.split_once(REF_SEPARATOR) {
            Some((entry_id, sense_id)) => (entry_id, Some(sense_id)),
            None => (relation.target.as_str(), None),
        };

        // A reference into the entry being saved must use the in-memory state,
        // not a possibly stale stored copy.
        let applied = if target_entry_id == source.id {
            self.apply_to_source(source, target_sense_id, &reverse_kind, &job.source_ref)?
        } else {
            let located = self
                .locator
                .resolve(&relation.target)
                .map_err(locate_skip)?;
            if located.entry.id == source.id {
                self.apply_to_source(
                    source,
                    located.sense_id.as_deref(),
                    &reverse_kind,
                    &job.source_ref,
                )?
            } else {
                self.apply_to_target(located, &reverse_kind, &job.source_ref)?
            }
        };

        // Mark the mirrored triple so a batch sharing this context does not
        // re-resolve it from the target's side.
        let mirror_ref = match &applied.target_sense {
            Some(sense_id) => compose_ref(&applied.target_entry, sense_id),
            None => applied.target_entry.clone(),
        };
        ctx.mark(&mirror_ref, &applied.kind, &applied.source_ref);

        Ok(applied)
    }

    fn apply_to_target(
        &self,
        located: Located,
        reverse_kind: &str,
        source_ref: &str,
    ) -> Result<AppliedReverse, SkipReason> {
        let Located {
            entry: mut target,
            sense_id,
        } = located;

        if has_anywhere(&target, reverse_kind, source_ref) {
            return Err(SkipReason::AlreadyConsistent);
        }
        attach(&mut target, sense_id.as_deref(), reverse_kind, source_ref)?;

        self.repo
            .save(&target, SaveOptions::reverse_write())
            .map_err(|e| SkipReason::PersistFailed {
                detail: e.to_string(),
            })?;
        tracing::debug!(
            target = %target.id,
            kind = %reverse_kind,
            source = %source_ref,
            "reverse relation written"
        );

        Ok(AppliedReverse {
            target_entry: target.id,
            target_sense: sense_id,
            kind: reverse_kind.to_string(),
            source_ref: source_ref.to_string(),
        })
    }

    /// Self-referential target: mutate the source in memory and leave
    /// persistence to the caller's own save.
    fn apply_to_source(
        &self,
        source: &mut Entry,
        sense_id: Option<&str>,
        reverse_kind: &str,
        source_ref: &str,
    ) -> Result<AppliedReverse, SkipReason> {
        if has_anywhere(source, reverse_kind, source_ref) {
            return Err(SkipReason::AlreadyConsistent);
        }
        attach(source, sense_id, reverse_kind, source_ref)?;
        tracing::debug!(
            target = %source.id,
            kind = %reverse_kind,
            "self-referential reverse staged on the source entry"
        );

        Ok(AppliedReverse {
            target_entry: source.id.clone(),
            target_sense: sense_id.map(String::from),
            kind: reverse_kind.to_string(),
            source_ref: source_ref.to_string(),
        })
    }
}

/// Snapshot the entry's relations before any mutation: entry-level first,
/// then each sense's, with the source ref the reverse will point back to.
fn collect_jobs(entry: &Entry) -> Vec<SyncJob> {
    let mut jobs = Vec::with_capacity(entry.relation_count());
    for relation in &entry.relations {
        jobs.push(SyncJob {
            relation: relation.clone(),
            source_ref: entry.id.clone(),
        });
    }
    for sense in &entry.senses {
        for relation in &sense.relations {
            jobs.push(SyncJob {
                relation: relation.clone(),
                source_ref: compose_ref(&entry.id, &sense.id),
            });
        }
    }
    jobs
}

/// The idempotence check spans the whole target: a reverse already present at
/// entry level or on any sense counts as consistent regardless of where this
/// run would have attached it.
fn has_anywhere(entry: &Entry, kind: &str, target: &str) -> bool {
    entry.has_relation(kind, target) || entry.senses.iter().any(|s| s.has_relation(kind, target))
}

fn attach(
    entry: &mut Entry,
    sense_id: Option<&str>,
    kind: &str,
    target_ref: &str,
) -> Result<(), SkipReason> {
    match sense_id {
        Some(sid) => {
            let Some(sense) = entry.sense_mut(sid) else {
                return Err(SkipReason::TargetNotFound {
                    detail: format!("entry \"{}\" has no sense \"{sid}\"", entry.id),
                });
            };
            let order = sense.relations.len() as u32;
            sense
                .relations
                .push(Relation::new(kind, target_ref).with_order(order));
        }
        None => {
            let order = entry.relations.len() as u32;
            entry
                .relations
                .push(Relation::new(kind, target_ref).with_order(order));
        }
    }
    Ok(())
}

fn locate_skip(err: LocateError) -> SkipReason {
    let detail = err.to_string();
    match err {
        LocateError::AmbiguousSense { .. } => SkipReason::AmbiguousTarget { detail },
        _ => SkipReason::TargetNotFound { detail },
    }
}
