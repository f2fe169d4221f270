//! Error types for a reconciliation run.
//!
//! Every variant is fatal: the tool only answers correctly when it has seen
//! 100% of its inputs, so there is no partial-success mode and no retry.
//! Ambiguous identity tokens are deliberately *not* errors — they degrade to
//! an empty resolved name with a warning (see `identity`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollcallError {
    #[error("no attendance log files found in {}", dir.display())]
    MissingInput { dir: PathBuf },

    #[error("duplicate roster id {id:?} (first seen in {first_source}, again in {second_source})")]
    DuplicateIdentity {
        id: String,
        first_source: String,
        second_source: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {message}", path.display())]
    Sheet { path: PathBuf, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("output directory {} already exists, try again later", dir.display())]
    OutputExists { dir: PathBuf },
}
