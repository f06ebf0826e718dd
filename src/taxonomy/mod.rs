//! Range taxonomies: hierarchical classification axes for relations and
//! variants.
//!
//! An axis (e.g. "lexical-relation") is a tree of [`RangeValue`] nodes loaded
//! from an external [`RangeSource`]. Labels and abbreviations inherit down the
//! tree: a value without its own label displays the nearest ancestor's. A
//! `reverse-label` on a value marks its relation kind as antisymmetric for the
//! classifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod file;
mod store;
mod tree;

pub use file::FileRangeSource;
pub use store::{RangeSource, StaticRangeSource, TaxonomyStore};
pub use tree::RangeTree;

/// Axis classifying cross-entry semantic relations (synonym, hypernym, ...).
pub const LEXICAL_RELATION: &str = "lexical-relation";

/// Axis classifying variant forms (spelling, dialectal, ...).
pub const VARIANT_TYPE: &str = "variant-type";

/// One node of a range axis, in its raw unresolved form.
///
/// `parent` links values into a tree; an absent or empty parent marks a root.
/// The three text maps are keyed by locale ("en", "pl", ...) and may each be
/// empty, in which case display text is inherited from ancestors by
/// [`RangeTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValue {
    /// Value id, unique within its axis.
    pub id: String,
    /// Parent value id; `None` or `""` for roots.
    #[serde(default)]
    pub parent: Option<String>,
    /// Display label per locale.
    #[serde(default)]
    pub label: BTreeMap<String, String>,
    /// Short display form per locale.
    #[serde(default)]
    pub abbreviation: BTreeMap<String, String>,
    /// Label of the reverse relation per locale. Presence of any non-empty
    /// reverse label marks the relation kind antisymmetric.
    #[serde(default, rename = "reverse-label", alias = "reverseLabel")]
    pub reverse_label: BTreeMap<String, String>,
}

impl RangeValue {
    /// Create a root value with no display text.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the parent value id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add a label for one locale.
    pub fn with_label(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.label.insert(locale.into(), text.into());
        self
    }

    /// Add an abbreviation for one locale.
    pub fn with_abbreviation(
        mut self,
        locale: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.abbreviation.insert(locale.into(), text.into());
        self
    }

    /// Add a reverse label for one locale.
    pub fn with_reverse_label(
        mut self,
        locale: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.reverse_label.insert(locale.into(), text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_locale_maps() {
        let value = RangeValue::new("hiperonim")
            .with_parent("relation")
            .with_label("en", "hypernym")
            .with_label("pl", "hiperonim")
            .with_abbreviation("en", "hyper.")
            .with_reverse_label("en", "hyponym of");

        assert_eq!(value.id, "hiperonim");
        assert_eq!(value.parent.as_deref(), Some("relation"));
        assert_eq!(value.label.get("pl").map(String::as_str), Some("hiperonim"));
        assert_eq!(
            value.abbreviation.get("en").map(String::as_str),
            Some("hyper.")
        );
        assert_eq!(
            value.reverse_label.get("en").map(String::as_str),
            Some("hyponym of")
        );
    }

    #[test]
    fn serde_accepts_both_reverse_label_spellings() {
        let kebab: RangeValue =
            serde_json::from_str(r#"{"id": "whole", "reverse-label": {"en": "part of"}}"#).unwrap();
        let camel: RangeValue =
            serde_json::from_str(r#"{"id": "whole", "reverseLabel": {"en": "part of"}}"#).unwrap();
        assert_eq!(kebab, camel);
        assert_eq!(
            kebab.reverse_label.get("en").map(String::as_str),
            Some("part of")
        );
    }
}
