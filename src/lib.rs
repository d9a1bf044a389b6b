//! Quire - an asset bundler.
//!
//! Given a logical name such as `app.js`, quire finds the backing file across
//! a list of search paths, follows its `//= require` directives, runs every
//! file through its filter chain and concatenates the results:
//!
//! ```ignore
//! let registry = ProcessorRegistry::builtin()?;
//! let mut store = AssetStore::new(Arc::new(DiskFs), Arc::new(registry), EngineConfig::default());
//! store.search_path("assets")?;
//!
//! let mut resolution = Resolution::new();
//! resolution.resolve("app.js", &store)?;
//! let bundle = build(&resolution, &store)?;
//! ```

pub mod logger;

pub mod asset;
pub mod bundle;
pub mod config;
pub mod error;
pub mod fs;
pub mod processor;
pub mod resolve;
pub mod utils;

pub use asset::{Asset, AssetStore};
pub use bundle::build;
pub use config::{EngineConfig, ProjectConfig};
pub use error::{AssetError, AssetResult};
pub use fs::{DiskFs, FileMeta, FileSystem, MemoryFs};
pub use processor::{ProcessContext, Processor, ProcessorRegistry};
pub use resolve::Resolution;
