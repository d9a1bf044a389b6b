//! The asset store: logical path → processed [`Asset`], memoized.

use super::directive::extract_dependencies;
use super::fingerprint::FingerprintCache;
use super::locate::{Located, Locator, output_extension};
use super::url::UrlResolver;
use super::Asset;
use crate::config::EngineConfig;
use crate::debug;
use crate::error::{AssetError, AssetResult};
use crate::fs::FileSystem;
use crate::processor::{ProcessContext, ProcessorRegistry};
use crate::utils::path::{clean_logical, normalize_path};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Holds search paths, configuration and the asset cache.
///
/// Assets are built once per logical path and never rebuilt: a later change
/// to the backing file is not observed by the same store.
pub struct AssetStore {
    locator: Locator,
    processors: Arc<ProcessorRegistry>,
    config: EngineConfig,
    fingerprints: Arc<FingerprintCache>,
    assets: Mutex<FxHashMap<String, Arc<Asset>>>,
}

impl AssetStore {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        processors: Arc<ProcessorRegistry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            locator: Locator::new(fs),
            processors,
            config,
            fingerprints: Arc::new(FingerprintCache::new()),
            assets: Mutex::new(FxHashMap::default()),
        }
    }

    /// Append a directory to the search list. Relative paths are taken from
    /// the current directory.
    pub fn search_path(&mut self, dir: impl AsRef<Path>) -> AssetResult<&mut Self> {
        let dir = dir.as_ref();
        let normalized = normalize_path(dir).map_err(|e| AssetError::Io(dir.to_path_buf(), e))?;
        debug!("store"; "search path {}", normalized.display());
        self.locator.push(normalized);
        Ok(self)
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        self.locator.paths()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    /// The processed asset for `logical`, built on first request.
    ///
    /// Spellings of the same path (`/b.js`, `./b.js`) share one cache entry.
    pub fn lookup(&self, logical: &str) -> AssetResult<Arc<Asset>> {
        let logical = clean_logical(logical);
        if let Some(asset) = self.assets.lock().get(&logical) {
            return Ok(Arc::clone(asset));
        }

        let located = self.locator.locate(&logical)?;
        debug!("store"; "{} -> {}", logical, located.path.display());
        let asset = Arc::new(self.create_asset(&logical, located)?);

        // Two concurrent misses may both build; the first insert wins.
        let mut assets = self.assets.lock();
        Ok(Arc::clone(assets.entry(logical).or_insert(asset)))
    }

    /// Cached asset, without touching the filesystem.
    pub fn cached(&self, logical: &str) -> Option<Arc<Asset>> {
        self.assets.lock().get(&clean_logical(logical)).cloned()
    }

    /// Find the backing file of `logical` without building it.
    pub fn locate(&self, logical: &str) -> AssetResult<Located> {
        self.locator.locate(logical)
    }

    /// Public URL of `logical` under the current configuration.
    pub fn asset_url(&self, logical: &str) -> AssetResult<String> {
        self.url_resolver().url_for(logical)
    }

    /// Detached URL resolver sharing this store's fingerprint cache.
    pub fn url_resolver(&self) -> UrlResolver {
        UrlResolver::new(
            self.locator.clone(),
            Arc::clone(&self.fingerprints),
            self.config.clone(),
        )
    }

    fn create_asset(&self, logical: &str, located: Located) -> AssetResult<Asset> {
        let bytes = self
            .locator
            .fs()
            .read_file(&located.path)
            .map_err(|e| AssetError::Io(located.path.clone(), e))?;
        let raw = String::from_utf8(bytes).map_err(|e| {
            AssetError::Io(
                located.path.clone(),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })?;

        let (stripped, declared) = extract_dependencies(&raw);

        // `locate` rejects logical paths without an extension
        let ext = output_extension(logical).unwrap_or_default();
        let dependencies = self.expand_dependencies(&located.root, declared, ext)?;

        let content = self.apply_filters(&located, stripped)?;

        Ok(Asset {
            source: located.meta,
            path: located.path,
            content,
            dependencies,
        })
    }

    /// Canonicalize names, infer missing extensions and expand `dir/*`
    /// wildcards.
    fn expand_dependencies(
        &self,
        root: &Path,
        declared: Vec<String>,
        ext: &str,
    ) -> AssetResult<Vec<String>> {
        let mut dependencies = Vec::with_capacity(declared.len());

        for dep in declared.iter().map(|dep| clean_logical(dep)) {
            if let Some(dir) = dep.strip_suffix("/*") {
                let dir_path = root.join(dir);
                let mut entries = match self.locator.fs().read_dir(&dir_path) {
                    Ok(entries) => entries,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(AssetError::AssetNotFound {
                            path: dep,
                            searched: vec![root.to_path_buf()],
                        });
                    }
                    Err(e) => return Err(AssetError::Io(dir_path, e)),
                };
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                dependencies.extend(
                    entries
                        .into_iter()
                        .filter(|meta| !meta.is_dir)
                        .map(|meta| format!("{dir}/{}", meta.name)),
                );
            } else if output_extension(&dep).is_none() {
                dependencies.push(format!("{dep}.{ext}"));
            } else {
                dependencies.push(dep);
            }
        }

        Ok(dependencies)
    }

    /// Run the filter tags of the backing file name, innermost first.
    ///
    /// In `name.js.tmpl.coffee` the first two segments are the base name and
    /// output extension; `coffee` runs, then `tmpl`.
    fn apply_filters(&self, located: &Located, mut content: String) -> AssetResult<String> {
        let tags: Vec<&str> = located.meta.name.split('.').skip(2).collect();
        if tags.is_empty() {
            return Ok(content);
        }

        let cx = ProcessContext {
            store: self,
            path: &located.path,
        };
        for tag in tags.into_iter().rev() {
            debug!("filter"; "{} on {}", tag, located.meta.name);
            content = self.processors.apply(&cx, &content, tag)?;
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests;
