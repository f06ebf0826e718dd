//! Resolution of relation references to an entry, and optionally one sense.
//!
//! References come in several shapes accumulated over a lexicon's life:
//! `entry#sense` composites, bare entry ids, and legacy bare sense ids whose
//! GUID-suffixed form (`entry_xxxx`) hints at the owning entry. The locator
//! tries targeted lookups in that order and only then scans the whole
//! lexicon for a matching sense id. That scan is O(entries) and bounded by a
//! caller-supplied ceiling; it exists for malformed and legacy references,
//! not as a routine path.

use std::sync::Arc;

use crate::entry::{Entry, REF_SEPARATOR};
use crate::error::{LocateError, RepoError};
use crate::repo::EntryRepository;

/// A resolved reference: the owning entry and, when the reference named one,
/// the sense id within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub entry: Entry,
    pub sense_id: Option<String>,
}

/// Resolves relation references against an entry repository.
#[derive(Clone)]
pub struct SenseLocator {
    repo: Arc<dyn EntryRepository>,
    max_scan: usize,
}

impl SenseLocator {
    /// Create a locator. `max_scan` caps the fallback scan's entry count.
    pub fn new(repo: Arc<dyn EntryRepository>, max_scan: usize) -> Self {
        Self { repo, max_scan }
    }

    /// Resolve a reference to its entry and sense.
    ///
    /// Strategy order: `entry#sense` composite, bare entry id, GUID-suffix
    /// heuristic (strip the last `_` segment to get a candidate entry whose
    /// senses are searched for the full reference), then the bounded
    /// whole-lexicon sense scan.
    pub fn resolve(&self, reference: &str) -> Result<Located, LocateError> {
        if let Some((entry_id, sense_id)) = reference.split_once(REF_SEPARATOR) {
            if let Some(entry) = self.fetch(entry_id)? {
                if entry.sense(sense_id).is_some() {
                    return Ok(Located {
                        entry,
                        sense_id: Some(sense_id.to_string()),
                    });
                }
            }
            // Entry or sense gone; the sense may live elsewhere after a move.
            return self.scan_for_sense(reference, sense_id);
        }

        if let Some(entry) = self.fetch(reference)? {
            return Ok(Located {
                entry,
                sense_id: None,
            });
        }

        if let Some((candidate, _)) = reference.rsplit_once('_') {
            if let Some(entry) = self.fetch(candidate)? {
                if entry.sense(reference).is_some() {
                    return Ok(Located {
                        entry,
                        sense_id: Some(reference.to_string()),
                    });
                }
            }
        }

        self.scan_for_sense(reference, reference)
    }

    /// Fetch an entry, mapping "not found" to `None` and passing other
    /// repository failures through.
    fn fetch(&self, id: &str) -> Result<Option<Entry>, LocateError> {
        match self.repo.entry(id) {
            Ok(entry) => Ok(Some(entry)),
            Err(RepoError::NotFound { .. }) => Ok(None),
            Err(e) => Err(LocateError::Repo(e)),
        }
    }

    fn scan_for_sense(&self, reference: &str, sense_id: &str) -> Result<Located, LocateError> {
        let total = self.repo.entry_count();
        tracing::debug!(
            reference = %reference,
            entries = total,
            "reference needs a fallback sense scan"
        );

        let mut matches: Vec<Entry> = Vec::new();
        for entry in self
            .repo
            .entries()
            .map_err(LocateError::Repo)?
            .into_iter()
            .take(self.max_scan)
        {
            if entry.sense(sense_id).is_some() {
                matches.push(entry);
            }
        }

        match matches.len() {
            0 => {
                if total > self.max_scan {
                    Err(LocateError::ScanTruncated {
                        reference: reference.to_string(),
                        limit: self.max_scan,
                    })
                } else {
                    Err(LocateError::NotFound {
                        reference: reference.to_string(),
                    })
                }
            }
            1 => Ok(Located {
                entry: matches.remove(0),
                sense_id: Some(sense_id.to_string()),
            }),
            _ => Err(LocateError::AmbiguousSense {
                reference: reference.to_string(),
                candidates: matches.into_iter().map(|e| e.id).collect(),
            }),
        }
    }
}
