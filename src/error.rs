//! Error taxonomy for the retrieval pipeline.
//!
//! Only [`MsgError::Config`] and [`MsgError::EmptyCorpus`] are fatal.
//! `Load` and `Validation` are recovered where they occur: the offending
//! source or record is skipped and the error is carried in the load report
//! as a warning, so a best-effort result can still be shown.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MsgError {
    /// Malformed or unreadable configuration. Aborts before any source loads.
    #[error("configuration error: {0}")]
    Config(String),

    /// A single source file could not be read or parsed. The source is
    /// skipped; the run continues with the remaining sources.
    #[error("failed to load {path}: {reason}", path = .path.display())]
    Load { path: PathBuf, reason: String },

    /// A single record failed validation and was skipped.
    #[error("skipped record '{id}' in {path}: {reason}", path = .path.display())]
    Validation {
        path: PathBuf,
        /// The record's id, or `?` when the id itself is missing.
        id: String,
        reason: String,
    },

    /// No valid entries were loaded from any source. Nothing to search.
    #[error("no valid entries loaded from any source")]
    EmptyCorpus,
}
