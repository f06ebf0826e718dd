//! File-backed range source: one TOML or JSON document per axis.
//!
//! Axis `lexical-relation` is looked up as `lexical-relation.toml`, then
//! `lexical-relation.json`, inside the source directory. Both formats share
//! one shape, a top-level `values` list:
//!
//! ```toml
//! [[values]]
//! id = "hiperonim"
//!
//! [values.label]
//! en = "hypernym"
//!
//! [values.reverse-label]
//! en = "hyponym of"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TaxonomyError;
use crate::taxonomy::{RangeSource, RangeValue};

/// Range source reading per-axis files from one directory.
#[derive(Debug, Clone)]
pub struct FileRangeSource {
    dir: PathBuf,
}

impl FileRangeSource {
    /// Create a source over a ranges directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RangeSource for FileRangeSource {
    fn load_axis(&self, axis: &str) -> Result<Vec<RangeValue>, TaxonomyError> {
        let toml_path = self.dir.join(format!("{axis}.toml"));
        if toml_path.is_file() {
            return read_values(&toml_path, Format::Toml);
        }
        let json_path = self.dir.join(format!("{axis}.json"));
        if json_path.is_file() {
            return read_values(&json_path, Format::Json);
        }
        Err(TaxonomyError::UnknownAxis {
            axis: axis.to_string(),
        })
    }
}

enum Format {
    Toml,
    Json,
}

/// Deserialization envelope for a ranges file.
#[derive(Debug, Deserialize)]
struct RangeFile {
    #[serde(default)]
    values: Vec<RangeValue>,
}

fn read_values(path: &Path, format: Format) -> Result<Vec<RangeValue>, TaxonomyError> {
    let raw = std::fs::read_to_string(path).map_err(|e| TaxonomyError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let parsed: RangeFile = match format {
        Format::Toml => toml::from_str(&raw).map_err(|e| TaxonomyError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        Format::Json => serde_json::from_str(&raw).map_err(|e| TaxonomyError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
    };
    Ok(parsed.values)
}
