//! Core dictionary data model for the lexaurus engine.
//!
//! An [`Entry`] is the unit of storage: one headword with its [`Sense`]s and
//! outgoing [`Relation`]s. Relations reference other entries either by bare
//! entry id or by an `entry#sense` composite; the engine never deletes them,
//! only appends reverse counterparts.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Separator between entry and sense ids inside a relation reference.
pub const REF_SEPARATOR: char = '#';

/// Compose an `entry#sense` reference from its parts.
pub fn compose_ref(entry_id: &str, sense_id: &str) -> String {
    format!("{entry_id}{REF_SEPARATOR}{sense_id}")
}

/// A semantic or structural link from one entry (or sense) to another.
///
/// `kind` names a range value from the "lexical-relation" or "variant-type"
/// axis. For consistency purposes relations behave as an unordered set keyed
/// by `(kind, target)`; `traits` and `order` are display metadata and never
/// participate in the duplicate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Range value id classifying this relation.
    #[serde(rename = "type")]
    pub kind: String,
    /// Target reference: a bare entry id or an `entry#sense` composite.
    pub target: String,
    /// Optional sub-classification traits (e.g. "variant-type").
    #[serde(default)]
    pub traits: BTreeMap<String, String>,
    /// Display order within the owning entry or sense; not semantically
    /// significant.
    #[serde(default)]
    pub order: u32,
}

impl Relation {
    /// Create a new relation with empty traits and display order 0.
    pub fn new(kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: target.into(),
            traits: BTreeMap::new(),
            order: 0,
        }
    }

    /// Attach a trait key/value pair.
    pub fn with_trait(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.insert(key.into(), value.into());
        self
    }

    /// Set the display order.
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Whether this relation links the given `(kind, target)` pair.
    pub fn links(&self, kind: &str, target: &str) -> bool {
        self.kind == kind && self.target == target
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.kind, self.target)
    }
}

/// One sense of an entry: a distinct meaning carrying its own relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Sense id, unique within the owning entry.
    pub id: String,
    /// Optional short definition text.
    #[serde(default)]
    pub gloss: Option<String>,
    /// Outgoing relations declared at sense level.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Sense {
    /// Create a new sense with no gloss and no relations.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            gloss: None,
            relations: Vec::new(),
        }
    }

    /// Set the gloss text.
    pub fn with_gloss(mut self, gloss: impl Into<String>) -> Self {
        self.gloss = Some(gloss.into());
        self
    }

    /// Append a relation.
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Whether this sense already declares a `(kind, target)` relation.
    pub fn has_relation(&self, kind: &str, target: &str) -> bool {
        relations_contain(&self.relations, kind, target)
    }
}

/// A dictionary entry: headword, senses, and entry-level relations.
///
/// Entry ids are globally unique and immutable after creation. Entries are
/// created and persisted through the repository; the engine only ever appends
/// reverse relations to already-loaded entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Globally unique entry id.
    pub id: String,
    /// Citation form shown to the user.
    pub headword: String,
    /// Senses in display order.
    #[serde(default)]
    pub senses: Vec<Sense>,
    /// Outgoing relations declared at entry level.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Entry {
    /// Create a new entry with no senses and no relations.
    pub fn new(id: impl Into<String>, headword: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headword: headword.into(),
            senses: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Append a sense.
    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.senses.push(sense);
        self
    }

    /// Append an entry-level relation.
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Look up a sense by id.
    pub fn sense(&self, sense_id: &str) -> Option<&Sense> {
        self.senses.iter().find(|s| s.id == sense_id)
    }

    /// Look up a sense by id, mutably.
    pub fn sense_mut(&mut self, sense_id: &str) -> Option<&mut Sense> {
        self.senses.iter_mut().find(|s| s.id == sense_id)
    }

    /// Whether the entry-level relations already hold a `(kind, target)` pair.
    pub fn has_relation(&self, kind: &str, target: &str) -> bool {
        relations_contain(&self.relations, kind, target)
    }

    /// Total relation count across the entry and all of its senses.
    pub fn relation_count(&self) -> usize {
        self.relations.len() + self.senses.iter().map(|s| s.relations.len()).sum::<usize>()
    }

    /// Check structural invariants before persistence.
    ///
    /// Ids must be non-empty and free of the `#` reference separator; sense
    /// ids must be unique within the entry; every relation needs a non-empty
    /// kind and target.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyEntryId);
        }
        if self.id.contains(REF_SEPARATOR) {
            return Err(ValidationError::ReservedIdChar {
                id: self.id.clone(),
            });
        }

        let mut seen = HashSet::new();
        for sense in &self.senses {
            if sense.id.contains(REF_SEPARATOR) {
                return Err(ValidationError::ReservedIdChar {
                    id: sense.id.clone(),
                });
            }
            if !seen.insert(sense.id.as_str()) {
                return Err(ValidationError::DuplicateSenseId {
                    entry: self.id.clone(),
                    sense: sense.id.clone(),
                });
            }
        }

        let sense_relations = self.senses.iter().flat_map(|s| s.relations.iter());
        for relation in self.relations.iter().chain(sense_relations) {
            if relation.kind.is_empty() {
                return Err(ValidationError::EmptyRelationKind {
                    entry: self.id.clone(),
                });
            }
            if relation.target.is_empty() {
                return Err(ValidationError::EmptyRelationTarget {
                    entry: self.id.clone(),
                    kind: relation.kind.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Set-membership check shared by [`Entry`] and [`Sense`]: traits and order
/// never participate.
fn relations_contain(relations: &[Relation], kind: &str, target: &str) -> bool {
    relations.iter().any(|r| r.links(kind, target))
}
