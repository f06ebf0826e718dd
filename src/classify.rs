//! Relation kind classification: direction and reverse kind.
//!
//! Almost every relation kind is bidirectional; the engine keeps a reverse
//! link on the target for each of them. The reverse kind comes from the
//! loaded taxonomy when it carries antisymmetry metadata, and from a fixed
//! curated pair table otherwise.

use std::sync::Arc;

use crate::taxonomy::{TaxonomyStore, LEXICAL_RELATION};

/// Structural component-of-complex-form links are inherently one-way; the
/// target must never gain a mirror of them.
pub const COMPONENT_LEXEME: &str = "_component-lexeme";

const UNIDIRECTIONAL_KINDS: &[&str] = &[COMPONENT_LEXEME];

/// Decides relation direction and reverse kind against one taxonomy snapshot.
#[derive(Debug, Clone)]
pub struct RelationClassifier {
    store: Arc<TaxonomyStore>,
}

impl RelationClassifier {
    /// Create a classifier over a taxonomy snapshot. An empty store is valid;
    /// classification then runs entirely on the built-in pair table.
    pub fn new(store: Arc<TaxonomyStore>) -> Self {
        Self { store }
    }

    /// Whether relations of this kind need a reverse link on their target.
    ///
    /// Only the fixed exclusion set is unidirectional; every other kind is
    /// bidirectional regardless of taxonomy content.
    pub fn is_bidirectional(&self, kind: &str) -> bool {
        !UNIDIRECTIONAL_KINDS.contains(&kind)
    }

    /// The relation kind to write on the target as the reverse link.
    ///
    /// When the lexical-relation axis classifies `kind`, the axis decides:
    /// a reverse label on the value (or an ancestor) marks it antisymmetric
    /// and the paired kind is used, while a classified value without any
    /// reverse label is symmetric. Kinds the axis does not know, or a missing
    /// axis altogether, fall back to the pair table directly.
    pub fn reverse_kind(&self, kind: &str) -> String {
        if let Some(tree) = self.store.tree(LEXICAL_RELATION) {
            if tree.contains(kind) {
                if tree.declares_reverse(kind) {
                    return antisymmetric_reverse(kind).unwrap_or(kind).to_string();
                }
                return kind.to_string();
            }
        }
        antisymmetric_reverse(kind).unwrap_or(kind).to_string()
    }
}

/// Curated antisymmetric pairs, both directions. Kinds outside this table are
/// symmetric by default.
fn antisymmetric_reverse(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "hypernym" => "hyponym",
        "hyponym" => "hypernym",
        "hiperonim" => "hiponim",
        "hiponim" => "hiperonim",
        "holonym" => "meronym",
        "meronym" => "holonym",
        "whole" => "part",
        "part" => "whole",
        "specific" => "generic",
        "generic" => "specific",
        "causes" => "is-caused-by",
        "is-caused-by" => "causes",
        _ => return None,
    })
}
