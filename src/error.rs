//! Error types for seismic.
//!
//! Per-file problems (missing files, unreadable content, parse failures) are
//! soft: the affected file is simply excluded from analysis. These variants
//! cover the session-level operations that can genuinely fail.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by session-level operations.
#[derive(Debug, Error)]
pub enum SeismicError {
    /// A file or directory could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension maps to no known grammar.
    #[error("unsupported language for '{0}'")]
    UnsupportedLanguage(PathBuf),

    /// `seismic.toml` exists but does not parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// An include/exclude glob in the configuration is malformed.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] ignore::Error),

    /// The worker pool could not be constructed.
    #[error("worker pool initialization failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SeismicError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeismicError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SeismicError>;
