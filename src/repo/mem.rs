//! In-memory entry repository backed by concurrent hashmaps.

use dashmap::DashMap;
use unicode_normalization::UnicodeNormalization;

use crate::entry::Entry;
use crate::error::RepoError;
use crate::repo::{EntryRepository, SaveOptions};

/// Entries in a DashMap keyed by id, plus a headword index normalized to NFC
/// lowercase so lookups survive composed/decomposed and case differences.
#[derive(Debug, Default)]
pub struct MemoryLexicon {
    entries: DashMap<String, Entry>,
    /// normalized headword -> entry ids carrying it
    headwords: DashMap<String, Vec<String>>,
}

impl MemoryLexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store an entry. Shorthand for [`save`](EntryRepository::save)
    /// with default options, handy when seeding a lexicon.
    pub fn insert(&self, entry: Entry) -> Result<(), RepoError> {
        self.save(&entry, SaveOptions::default())
    }

    /// All entries whose headword matches after normalization.
    pub fn find_by_headword(&self, headword: &str) -> Vec<Entry> {
        let key = normalize_headword(headword);
        let Some(bucket) = self.headwords.get(&key) else {
            return Vec::new();
        };
        bucket
            .iter()
            .filter_map(|id| self.entries.get(id).map(|kv| kv.clone()))
            .collect()
    }

    fn reindex(&self, id: &str, old_headword: Option<&str>, new_headword: &str) {
        let new_key = normalize_headword(new_headword);
        if let Some(old) = old_headword {
            let old_key = normalize_headword(old);
            if old_key != new_key {
                if let Some(mut bucket) = self.headwords.get_mut(&old_key) {
                    bucket.retain(|entry_id| entry_id != id);
                }
            }
        }
        let mut bucket = self.headwords.entry(new_key).or_default();
        if !bucket.iter().any(|entry_id| entry_id == id) {
            bucket.push(id.to_string());
        }
    }
}

impl EntryRepository for MemoryLexicon {
    fn entry(&self, id: &str) -> Result<Entry, RepoError> {
        self.entries
            .get(id)
            .map(|kv| kv.clone())
            .ok_or_else(|| RepoError::NotFound { id: id.to_string() })
    }

    fn save(&self, entry: &Entry, options: SaveOptions) -> Result<(), RepoError> {
        if !options.skip_validation {
            entry.validate()?;
        }
        // skip_reverse_sync is a facade concern; the store itself never syncs.
        let previous_headword = self.entries.get(&entry.id).map(|kv| kv.headword.clone());
        self.reindex(&entry.id, previous_headword.as_deref(), &entry.headword);
        self.entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    fn entries(&self) -> Result<Vec<Entry>, RepoError> {
        let mut all: Vec<Entry> = self.entries.iter().map(|kv| kv.value().clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn normalize_headword(headword: &str) -> String {
    headword.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_fetch_roundtrip() {
        let lexicon = MemoryLexicon::new();
        lexicon.insert(Entry::new("pies", "pies")).unwrap();

        let fetched = lexicon.entry("pies").unwrap();
        assert_eq!(fetched.id, "pies");
        assert_eq!(lexicon.entry_count(), 1);
    }

    #[test]
    fn missing_entry_is_not_found() {
        let lexicon = MemoryLexicon::new();
        assert!(matches!(
            lexicon.entry("ghost"),
            Err(RepoError::NotFound { .. })
        ));
    }

    #[test]
    fn save_validates_unless_skipped() {
        let lexicon = MemoryLexicon::new();
        let bad = Entry::new("", "empty");

        let err = lexicon.save(&bad, SaveOptions::default()).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        lexicon
            .save(
                &bad,
                SaveOptions {
                    skip_validation: true,
                    ..SaveOptions::default()
                },
            )
            .unwrap();
        assert_eq!(lexicon.entry_count(), 1);
    }

    #[test]
    fn headword_lookup_normalizes_case_and_form() {
        let lexicon = MemoryLexicon::new();
        // decomposed e + combining acute
        lexicon
            .insert(Entry::new("cafe-1", "Cafe\u{301}"))
            .unwrap();

        // composed é, lowercased
        let hits = lexicon.find_by_headword("caf\u{e9}");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "cafe-1");
    }

    #[test]
    fn headword_index_follows_renames() {
        let lexicon = MemoryLexicon::new();
        lexicon.insert(Entry::new("w1", "hund")).unwrap();
        lexicon.insert(Entry::new("w1", "pies")).unwrap();

        assert!(lexicon.find_by_headword("hund").is_empty());
        let hits = lexicon.find_by_headword("PIES");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "w1");
    }

    #[test]
    fn shared_headwords_return_all_entries() {
        let lexicon = MemoryLexicon::new();
        lexicon.insert(Entry::new("bank-river", "bank")).unwrap();
        lexicon.insert(Entry::new("bank-money", "bank")).unwrap();

        let mut ids: Vec<String> = lexicon
            .find_by_headword("bank")
            .into_iter()
            .map(|e| e.id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["bank-money", "bank-river"]);
    }

    #[test]
    fn entries_come_back_sorted_by_id() {
        let lexicon = MemoryLexicon::new();
        lexicon.insert(Entry::new("zebra", "zebra")).unwrap();
        lexicon.insert(Entry::new("ant", "ant")).unwrap();
        lexicon.insert(Entry::new("mole", "mole")).unwrap();

        let ids: Vec<String> = lexicon.entries().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["ant", "mole", "zebra"]);
    }
}
