//! Fatal pipeline errors.
//!
//! Every variant aborts the run; none are retried. Messages always name the
//! file involved so the single report printed by `main` is actionable.
use std::path::PathBuf;
use thiserror::Error;

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("malformed document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error(
        "constant not found: {name} (category {category} in {}, missing from {})",
        doc.display(),
        dump.display()
    )]
    UnresolvedConstant {
        name: String,
        category: String,
        doc: PathBuf,
        dump: PathBuf,
    },

    #[error("duplicate category label {label:?} in {}", path.display())]
    DuplicateLabel { path: PathBuf, label: String },

    #[error(
        "duplicate ordinal entry {name:?} in {} (line {line}, was {previous}, now {value})",
        path.display()
    )]
    DuplicateOrdinal {
        path: PathBuf,
        name: String,
        line: usize,
        previous: u64,
        value: u64,
    },

    #[error(
        "constant {name:?} listed in both {first} and {second} in {}",
        path.display()
    )]
    DuplicateConstant {
        path: PathBuf,
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("fetch {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("io error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        PipelineError::MalformedDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
