//! Entry storage contract and the bundled in-memory implementation.
//!
//! The consistency engine never owns persistence: it reads and writes entries
//! through [`EntryRepository`], implemented by whatever backs the lexicon.
//! One implementation ships with the crate:
//!
//! - [`MemoryLexicon`] — entries in concurrent hashmaps (DashMap), with a
//!   normalized headword index
//!
//! Reverse-sync writes always pass [`SaveOptions::reverse_write`], which a
//! facade honors by not re-entering synchronization for that save.

pub mod mem;

pub use mem::MemoryLexicon;

use crate::entry::Entry;
use crate::error::RepoError;

/// Flags threaded through an entry save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Skip structural validation before the write.
    pub skip_validation: bool,
    /// Do not run reverse-relation synchronization as part of this save.
    pub skip_reverse_sync: bool,
}

impl SaveOptions {
    /// Options for persisting a target the synchronizer just mutated: the
    /// write must neither re-validate nor re-enter synchronization.
    pub fn reverse_write() -> Self {
        Self {
            skip_validation: true,
            skip_reverse_sync: true,
        }
    }
}

/// Storage collaborator for dictionary entries.
///
/// Implementations persist whole entries keyed by id. The engine only ever
/// round-trips entries it fetched through the same repository, mutating them
/// in memory and saving them back.
pub trait EntryRepository: Send + Sync {
    /// Fetch an entry by id.
    fn entry(&self, id: &str) -> Result<Entry, RepoError>;

    /// Persist an entry, honoring the save flags.
    fn save(&self, entry: &Entry, options: SaveOptions) -> Result<(), RepoError>;

    /// Snapshot of all entries, ordered by id. Used only by the sense
    /// locator's fallback scan.
    fn entries(&self) -> Result<Vec<Entry>, RepoError>;

    /// Number of stored entries.
    fn entry_count(&self) -> usize;
}
