//! Store setup shared across CLI commands.

use super::args::SearchArgs;
use anyhow::{Context, Result, bail};
use quire::{AssetStore, DiskFs, EngineConfig, ProcessorRegistry, ProjectConfig, Resolution};
use std::path::PathBuf;
use std::sync::Arc;

/// Config file search paths followed by the `-s` ones.
pub fn search_paths(project: &ProjectConfig, search: &SearchArgs) -> Vec<PathBuf> {
    let mut paths = project.search_paths();
    paths.extend(search.search_paths.iter().cloned());
    paths
}

/// Disk-backed store over `paths`.
pub fn open_store(
    paths: &[PathBuf],
    registry: Arc<ProcessorRegistry>,
    config: EngineConfig,
) -> Result<AssetStore> {
    if paths.is_empty() {
        bail!("no search paths: pass at least one with -s or set [assets] paths");
    }

    let mut store = AssetStore::new(Arc::new(DiskFs), registry, config);
    for path in paths {
        store
            .search_path(path)
            .with_context(|| format!("invalid search path {}", path.display()))?;
    }
    Ok(store)
}

/// Resolve `asset` and its dependencies through `store`.
pub fn resolve(store: &AssetStore, asset: &str) -> quire::AssetResult<Resolution> {
    let mut resolution = Resolution::new();
    resolution.resolve(asset, store)?;
    Ok(resolution)
}
