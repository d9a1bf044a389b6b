//! Dependency resolution: depth-first walk producing a load order.
//!
//! Every asset lands in [`Resolution::resolved`] after all of its
//! dependencies, exactly once. Siblings keep their declaration order.

use crate::asset::AssetStore;
use crate::debug;
use crate::error::{AssetError, AssetResult};
use crate::utils::path::clean_logical;
use rustc_hash::FxHashSet;

/// Deepest dependency chain followed before giving up.
pub const MAX_DEPTH: usize = 256;

/// State of one resolution. Not reusable across unrelated builds.
#[derive(Debug, Default)]
pub struct Resolution {
    resolved: Vec<String>,
    done: FxHashSet<String>,
    /// Current DFS stack, for cycle detection.
    seen: Vec<String>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `path` and its transitive dependencies through `store`.
    ///
    /// Lookup and processing failures abort the walk, as does a cycle.
    /// Assets finished before the failure stay resolved.
    pub fn resolve(&mut self, path: &str, store: &AssetStore) -> AssetResult<()> {
        // An aborted walk leaves its stack behind
        self.seen.clear();
        let path = clean_logical(path);
        self.visit(&path, store)?;
        debug!("resolve"; "{} -> [{}]", path, self.resolved.join(", "));
        Ok(())
    }

    fn visit(&mut self, path: &str, store: &AssetStore) -> AssetResult<()> {
        if self.done.contains(path) {
            return Ok(());
        }
        if self.seen.len() >= MAX_DEPTH {
            return Err(AssetError::DependencyTooDeep(
                self.seen.first().cloned().unwrap_or_default(),
                MAX_DEPTH,
            ));
        }

        self.seen.push(path.to_string());
        let asset = store.lookup(path)?;

        for dep in asset.dependencies() {
            if self.done.contains(dep) {
                continue;
            }
            if self.seen.iter().any(|s| s == dep) {
                return Err(AssetError::CircularDependency {
                    from: path.to_string(),
                    to: dep.clone(),
                });
            }
            self.visit(dep, store)?;
        }

        self.seen.pop();
        self.done.insert(path.to_string());
        self.resolved.push(path.to_string());
        Ok(())
    }

    /// Logical paths in load order, dependencies first.
    pub fn resolved(&self) -> &[String] {
        &self.resolved
    }

    pub fn is_resolved(&self, path: &str) -> bool {
        self.done.contains(&clean_logical(path))
    }
}
