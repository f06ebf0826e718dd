//! One resolved classification axis: validated tree plus inheritance walks.
//!
//! [`RangeTree::build`] turns the flat value list from a range source into an
//! indexed tree, rejecting duplicate ids, dangling parents, and parent cycles
//! up front. After that every lookup is O(depth): effective labels and
//! abbreviations walk from a value toward the root and return the first text
//! found, so sparse taxonomies inherit display text from their ancestors.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::TaxonomyError;
use crate::taxonomy::RangeValue;

/// A validated range axis with an id index and child adjacency.
///
/// Immutable after construction: a reload builds a whole new tree rather than
/// patching this one in place.
#[derive(Debug, Clone)]
pub struct RangeTree {
    axis: String,
    nodes: HashMap<String, RangeValue>,
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl RangeTree {
    /// Build a tree for one axis from its flat value list.
    ///
    /// Fails on a duplicate value id, a parent referencing no value in the
    /// same axis, or a cyclic parent chain. An empty `parent` string is
    /// treated the same as no parent at all, matching how range files encode
    /// roots.
    pub fn build(
        axis: impl Into<String>,
        values: Vec<RangeValue>,
    ) -> Result<Self, TaxonomyError> {
        let axis = axis.into();

        let mut nodes: HashMap<String, RangeValue> = HashMap::with_capacity(values.len());
        let mut order: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            let id = value.id.clone();
            if nodes.insert(id.clone(), value).is_some() {
                return Err(TaxonomyError::DuplicateNode { axis, id });
            }
            order.push(id);
        }

        for id in &order {
            if let Some(parent) = parent_of(&nodes, id) {
                if !nodes.contains_key(parent) {
                    return Err(TaxonomyError::UnknownParent {
                        axis,
                        id: id.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        // Ancestor walk from every value; anything already cleared on a
        // previous walk is known to reach a root.
        let mut cleared: HashSet<String> = HashSet::with_capacity(order.len());
        for id in &order {
            let mut visited: HashSet<&str> = HashSet::new();
            let mut current: &str = id.as_str();
            loop {
                if cleared.contains(current) {
                    break;
                }
                if !visited.insert(current) {
                    return Err(TaxonomyError::CyclicAxis {
                        axis,
                        id: current.to_string(),
                    });
                }
                match parent_of(&nodes, current) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
            for seen in visited {
                cleared.insert(seen.to_string());
            }
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut roots = Vec::new();
        for id in &order {
            match parent_of(&nodes, id) {
                Some(parent) => children.entry(parent.to_string()).or_default().push(id.clone()),
                None => roots.push(id.clone()),
            }
        }

        Ok(Self {
            axis,
            nodes,
            children,
            roots,
        })
    }

    /// The axis id this tree classifies.
    pub fn axis(&self) -> &str {
        &self.axis
    }

    /// Number of values in the axis.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the axis holds no values.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a value by id.
    pub fn get(&self, id: &str) -> Option<&RangeValue> {
        self.nodes.get(id)
    }

    /// Whether the axis defines this value id.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Root value ids in source order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Direct child ids of a value, in source order.
    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// Parent id of a value, if it has one.
    pub fn parent(&self, id: &str) -> Option<&str> {
        parent_of(&self.nodes, id)
    }

    // -----------------------------------------------------------------------
    // Inheritance walks
    // -----------------------------------------------------------------------

    /// Display label for a value in one locale, inherited from the nearest
    /// ancestor that defines it. Falls back to the value id itself when no
    /// ancestor up to the root carries a label for the locale, or when the id
    /// is not in this axis at all.
    pub fn effective_label(&self, id: &str, locale: &str) -> String {
        self.walk(id, |value| localized(&value.label, locale))
            .unwrap_or_else(|| id.to_string())
    }

    /// Abbreviation for a value in one locale, with the same inheritance and
    /// id fallback as [`effective_label`](Self::effective_label).
    pub fn effective_abbreviation(&self, id: &str, locale: &str) -> String {
        self.walk(id, |value| localized(&value.abbreviation, locale))
            .unwrap_or_else(|| id.to_string())
    }

    /// Reverse-relation label for a value in one locale, from the nearest
    /// ancestor (including the value itself) that defines one.
    pub fn reverse_label(&self, id: &str, locale: &str) -> Option<String> {
        self.walk(id, |value| localized(&value.reverse_label, locale))
    }

    /// Whether the value, or any ancestor, declares a reverse label in any
    /// locale. This is the taxonomy's antisymmetry signal for the relation
    /// classifier.
    pub fn declares_reverse(&self, id: &str) -> bool {
        self.walk(id, |value| {
            value
                .reverse_label
                .values()
                .any(|text| !text.is_empty())
                .then_some(())
        })
        .is_some()
    }

    /// Walk from `id` toward the root, returning the first probe hit.
    ///
    /// `build` rejects cycles, so the visited set only guards the walk if the
    /// tree is ever constructed through a future unchecked path; it breaks
    /// the loop rather than hanging.
    fn walk<'a, T>(
        &'a self,
        id: &'a str,
        mut probe: impl FnMut(&RangeValue) -> Option<T>,
    ) -> Option<T> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = id;
        while let Some(value) = self.nodes.get(current) {
            if !visited.insert(current) {
                break;
            }
            if let Some(found) = probe(value) {
                return Some(found);
            }
            match value.parent.as_deref().filter(|p| !p.is_empty()) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        None
    }
}

fn parent_of<'a>(nodes: &'a HashMap<String, RangeValue>, id: &str) -> Option<&'a str> {
    nodes
        .get(id)
        .and_then(|value| value.parent.as_deref())
        .filter(|parent| !parent.is_empty())
}

fn localized(map: &BTreeMap<String, String>, locale: &str) -> Option<String> {
    map.get(locale).filter(|text| !text.is_empty()).cloned()
}
