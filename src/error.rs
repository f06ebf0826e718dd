//! Rich diagnostic error types for the lexaurus engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so curators know exactly what went wrong
//! in their data or range files and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the lexaurus engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum LexError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Locate(#[from] LocateError),
}

// ---------------------------------------------------------------------------
// Taxonomy errors
// ---------------------------------------------------------------------------

/// Errors raised while loading range axes or walking a range tree.
///
/// Construction errors are fatal: a malformed or cyclic axis is rejected
/// wholesale rather than silently degraded.
#[derive(Debug, Error, Diagnostic)]
pub enum TaxonomyError {
    #[error("duplicate range id \"{id}\" in axis \"{axis}\"")]
    #[diagnostic(
        code(lexaurus::taxonomy::duplicate_node),
        help(
            "Range ids must be unique within one axis. Remove or rename the \
             second definition in the ranges file."
        )
    )]
    DuplicateNode { axis: String, id: String },

    #[error("range \"{id}\" in axis \"{axis}\" references unknown parent \"{parent}\"")]
    #[diagnostic(
        code(lexaurus::taxonomy::unknown_parent),
        help(
            "Every parent id must name another range in the same axis. Check the \
             ranges file for a typo or a value defined under a different axis."
        )
    )]
    UnknownParent {
        axis: String,
        id: String,
        parent: String,
    },

    #[error("cyclic parent chain in axis \"{axis}\" involving range \"{id}\"")]
    #[diagnostic(
        code(lexaurus::taxonomy::cycle),
        help(
            "A range axis is a tree: following parent links from any value must \
             reach a root. Break the cycle by removing one of the parent \
             references."
        )
    )]
    CyclicAxis { axis: String, id: String },

    #[error("range axis not found: \"{axis}\"")]
    #[diagnostic(
        code(lexaurus::taxonomy::unknown_axis),
        help(
            "The range source does not define this axis. Either add it to the \
             ranges file or drop the axis from the workbench configuration; the \
             relation classifier falls back to its built-in pair table when an \
             axis is missing."
        )
    )]
    UnknownAxis { axis: String },

    #[error("failed to read ranges file: {path}")]
    #[diagnostic(
        code(lexaurus::taxonomy::io),
        help("Ensure the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ranges file \"{path}\": {message}")]
    #[diagnostic(
        code(lexaurus::taxonomy::parse),
        help(
            "Check the document syntax. A ranges file holds one axis as a \
             top-level `values` list; each value carries an `id`, an optional \
             `parent`, and `label`/`abbreviation`/`reverse-label` locale maps."
        )
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Structural problems in an entry about to be persisted.
#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("entry has an empty id")]
    #[diagnostic(
        code(lexaurus::validate::empty_entry_id),
        help("Assign the entry a unique, non-empty id before saving it.")
    )]
    EmptyEntryId,

    #[error("id \"{id}\" contains the reserved character '#'")]
    #[diagnostic(
        code(lexaurus::validate::reserved_id_char),
        help(
            "'#' separates entry and sense ids inside relation references, so it \
             cannot appear in an id itself. Rename the entry or sense."
        )
    )]
    ReservedIdChar { id: String },

    #[error("entry \"{entry}\" defines sense id \"{sense}\" more than once")]
    #[diagnostic(
        code(lexaurus::validate::duplicate_sense_id),
        help("Sense ids must be unique within their owning entry.")
    )]
    DuplicateSenseId { entry: String, sense: String },

    #[error("entry \"{entry}\" carries a relation with an empty type")]
    #[diagnostic(
        code(lexaurus::validate::empty_relation_kind),
        help(
            "Every relation must name a range value from the lexical-relation or \
             variant-type axis."
        )
    )]
    EmptyRelationKind { entry: String },

    #[error("entry \"{entry}\" carries a \"{kind}\" relation with an empty target")]
    #[diagnostic(
        code(lexaurus::validate::empty_relation_target),
        help("Every relation must reference a target entry id or entry#sense pair.")
    )]
    EmptyRelationTarget { entry: String, kind: String },
}

// ---------------------------------------------------------------------------
// Repository errors
// ---------------------------------------------------------------------------

/// Errors surfaced by an [`EntryRepository`](crate::repo::EntryRepository)
/// implementation.
#[derive(Debug, Error, Diagnostic)]
pub enum RepoError {
    #[error("entry not found: \"{id}\"")]
    #[diagnostic(
        code(lexaurus::repo::not_found),
        help("No entry with this id exists in the lexicon. Verify the id is correct.")
    )]
    NotFound { id: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {message}")]
    #[diagnostic(
        code(lexaurus::repo::storage),
        help(
            "The backing store rejected the write. Check the repository's own \
             diagnostics; the entry in memory is unchanged."
        )
    )]
    Storage { message: String },
}

// ---------------------------------------------------------------------------
// Locator errors
// ---------------------------------------------------------------------------

/// Errors raised while resolving a relation reference to an entry or sense.
#[derive(Debug, Error, Diagnostic)]
pub enum LocateError {
    #[error("relation target not found: \"{reference}\"")]
    #[diagnostic(
        code(lexaurus::locate::not_found),
        help(
            "The reference matches no entry id, entry#sense pair, or sense id in \
             the lexicon. The relation is skipped; it will heal on a later save \
             once the target exists."
        )
    )]
    NotFound { reference: String },

    #[error(
        "sense reference \"{reference}\" is ambiguous: {} candidate entries",
        .candidates.len()
    )]
    #[diagnostic(
        code(lexaurus::locate::ambiguous_sense),
        help(
            "Sense ids are only unique within one entry, and this bare sense id \
             appears in several. Qualify the reference as entry#sense."
        )
    )]
    AmbiguousSense {
        reference: String,
        candidates: Vec<String>,
    },

    #[error("scan for \"{reference}\" stopped after {limit} entries")]
    #[diagnostic(
        code(lexaurus::locate::scan_truncated),
        help(
            "The fallback sense scan hit the configured ceiling before covering \
             the whole lexicon. Raise `max_scan_entries` in the workbench \
             configuration, or repair the reference so a targeted lookup works."
        )
    )]
    ScanTruncated { reference: String, limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Repo(#[from] RepoError),
}

/// Convenience alias for functions returning lexaurus results.
pub type LexResult<T> = std::result::Result<T, LexError>;
