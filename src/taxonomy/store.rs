//! Taxonomy snapshots and the range-source contract that feeds them.

use std::collections::HashMap;

use crate::error::TaxonomyError;
use crate::taxonomy::{RangeTree, RangeValue};

/// Supplier of raw range axes, implemented by whatever backs the taxonomy
/// (files, an application database, test fixtures).
///
/// `load_axis` returns [`TaxonomyError::UnknownAxis`] for an axis the source
/// does not define; the store treats that as a skippable condition, unlike a
/// malformed axis which is fatal.
pub trait RangeSource: Send + Sync {
    /// Load the flat, unresolved value list of one axis.
    fn load_axis(&self, axis: &str) -> Result<Vec<RangeValue>, TaxonomyError>;
}

/// In-memory range source, mainly for tests and embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct StaticRangeSource {
    axes: HashMap<String, Vec<RangeValue>>,
}

impl StaticRangeSource {
    /// Create a source with no axes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one axis with its values.
    pub fn with_axis(mut self, axis: impl Into<String>, values: Vec<RangeValue>) -> Self {
        self.axes.insert(axis.into(), values);
        self
    }
}

impl RangeSource for StaticRangeSource {
    fn load_axis(&self, axis: &str) -> Result<Vec<RangeValue>, TaxonomyError> {
        self.axes
            .get(axis)
            .cloned()
            .ok_or_else(|| TaxonomyError::UnknownAxis {
                axis: axis.to_string(),
            })
    }
}

/// An immutable snapshot of all loaded range axes.
///
/// Built once per load and shared behind an `Arc`; a reload produces a whole
/// new store rather than mutating this one, so readers mid-lookup keep a
/// consistent view.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyStore {
    trees: HashMap<String, RangeTree>,
}

impl TaxonomyStore {
    /// A store with no axes. The relation classifier still works against it
    /// through its built-in pair table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the requested axes from a source.
    ///
    /// An axis the source does not define is logged and skipped; a defined
    /// axis that fails to build (duplicate ids, dangling parents, cycles) is
    /// fatal and aborts the whole load.
    pub fn load(source: &dyn RangeSource, axes: &[String]) -> Result<Self, TaxonomyError> {
        let mut trees = HashMap::with_capacity(axes.len());
        for axis in axes {
            match source.load_axis(axis) {
                Ok(values) => {
                    let tree = RangeTree::build(axis.clone(), values)?;
                    tracing::debug!(axis = %axis, values = tree.len(), "range axis loaded");
                    trees.insert(axis.clone(), tree);
                }
                Err(TaxonomyError::UnknownAxis { .. }) => {
                    tracing::warn!(axis = %axis, "range axis not defined by source, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Self { trees })
    }

    /// Assemble a store from already-built trees.
    pub fn from_trees(trees: impl IntoIterator<Item = RangeTree>) -> Self {
        Self {
            trees: trees
                .into_iter()
                .map(|tree| (tree.axis().to_string(), tree))
                .collect(),
        }
    }

    /// Look up one axis.
    pub fn tree(&self, axis: &str) -> Option<&RangeTree> {
        self.trees.get(axis)
    }

    /// Loaded axis ids, sorted.
    pub fn axes(&self) -> Vec<&str> {
        let mut axes: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        axes.sort_unstable();
        axes
    }

    /// Number of loaded axes.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether no axes are loaded.
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
