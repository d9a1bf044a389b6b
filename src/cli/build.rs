//! `build` and `resolve` commands.

use super::args::SearchArgs;
use super::common::{open_store, resolve, search_paths};
use anyhow::{Context, Result};
use quire::{EngineConfig, ProjectConfig, log};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Options of `quire build` beyond the search paths.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub output: Option<PathBuf>,
    pub fingerprint: Option<bool>,
    pub asset_root: Option<String>,
}

impl BuildOptions {
    /// Engine settings: config file values, overridden by the CLI.
    fn engine_config(&self, project: &ProjectConfig) -> EngineConfig {
        let mut config = project.engine_config();
        if let Some(fingerprint) = self.fingerprint {
            config.fingerprint = fingerprint;
        }
        if let Some(root) = &self.asset_root {
            config.asset_root = root.clone();
        }
        config
    }
}

/// Resolve `asset`, build the bundle and write it out.
pub fn build_bundle(
    project: &ProjectConfig,
    asset: &str,
    search: &SearchArgs,
    options: &BuildOptions,
) -> Result<()> {
    let registry = Arc::new(project.build_registry()?);
    let store = open_store(
        &search_paths(project, search),
        registry,
        options.engine_config(project),
    )?;

    let resolution = resolve(&store, asset).with_context(|| format!("failed to resolve {asset}"))?;
    let bundle = quire::build(&resolution, &store)?;
    let count = resolution.resolved().len();

    match &options.output {
        Some(path) => {
            fs::write(path, &bundle)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("build"; "{} assets -> {}", count, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bundle.as_bytes())?;
            stdout.flush()?;
            log!("build"; "{} assets", count);
        }
    }
    Ok(())
}

/// Print the load order of `asset`, one logical path per line.
pub fn print_order(project: &ProjectConfig, asset: &str, search: &SearchArgs) -> Result<()> {
    let registry = Arc::new(project.build_registry()?);
    let store = open_store(&search_paths(project, search), registry, project.engine_config())?;
    let resolution = resolve(&store, asset).with_context(|| format!("failed to resolve {asset}"))?;

    let mut stdout = io::stdout().lock();
    for logical in resolution.resolved() {
        writeln!(stdout, "{logical}")?;
    }
    Ok(())
}
