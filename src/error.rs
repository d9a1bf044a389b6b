//! Engine error types.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by processor failures.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by lookup, resolution and build.
///
/// None of these are retried; every variant aborts the current build.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no search paths have been configured")]
    NoSearchPathConfigured,

    #[error("logical path `{0}` has no extension")]
    MissingExtension(String),

    #[error("could not find a file matching `{path}` in {}", display_paths(.searched))]
    AssetNotFound { path: String, searched: Vec<PathBuf> },

    #[error("no processor registered for filter `{0}`")]
    UnknownFilter(String),

    #[error("filter `{tag}` failed on `{}`", .path.display())]
    ProcessorFailure {
        tag: String,
        path: PathBuf,
        #[source]
        source: BoxedCause,
    },

    #[error("processor for filter `{tag}` is unavailable")]
    ProcessorUnavailable {
        tag: String,
        #[source]
        source: BoxedCause,
    },

    #[error("circular dependency detected: {from} <-> {to}")]
    CircularDependency { from: String, to: String },

    #[error("dependency chain of `{0}` exceeds {1} levels")]
    DependencyTooDeep(String, usize),

    #[error("asset `{0}` was resolved but is missing from the store")]
    NotCached(String),

    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

impl AssetError {
    /// Whether the error means "nothing matched", as opposed to a broken asset.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. } | Self::MissingExtension(_) | Self::NoSearchPathConfigured
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    let joined: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", joined.join(", "))
}

pub type AssetResult<T> = Result<T, AssetError>;
