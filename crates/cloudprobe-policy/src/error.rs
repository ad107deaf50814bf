//! Error types for rule loading.
//!
//! Only whole-file problems are errors. A malformed individual rule is
//! skipped with a warning and never surfaces here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Rules file could not be read.
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rules document is not valid YAML or has the wrong top-level shape.
    #[error("invalid rules document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A process-wide policy was already installed.
    #[error("policy already installed")]
    AlreadyInstalled,
}

pub type PolicyResult<T> = Result<T, PolicyError>;
