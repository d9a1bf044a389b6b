//! Assets: lookup, directive extraction, processing and fingerprints.

mod directive;
pub mod fingerprint;
mod locate;
mod store;
mod url;

pub use directive::extract_dependencies;
pub use fingerprint::FingerprintCache;
pub use locate::{Located, Locator, output_extension};
pub use store::AssetStore;
pub use url::UrlResolver;

use crate::fs::FileMeta;
use std::path::{Path, PathBuf};

/// A fully processed asset. Immutable once built.
#[derive(Debug, Clone)]
pub struct Asset {
    source: FileMeta,
    path: PathBuf,
    content: String,
    dependencies: Vec<String>,
}

impl Asset {
    /// Metadata of the backing file.
    pub fn source(&self) -> &FileMeta {
        &self.source
    }

    /// Absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content with directives stripped and all filters applied.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Required logical paths in declaration order, wildcards expanded.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}
